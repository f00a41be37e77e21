// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Usage and key specifications assembled from runtime parameter sets.

use uks_check::Algorithm;
use uks_check::BlockMode;
use uks_check::Digest;
use uks_check::Padding;
use uks_check::ParamSet;
use uks_check::Purpose;
use uks_check::Tag;
use uks_check::UksError;
use uks_check::UksResult;

/// Everything a primitive backend needs to run one cipher/sign operation.
#[derive(Debug, Clone, Default)]
pub struct UsageSpec {
    /// Algorithm identifier.
    pub algorithm: Option<Algorithm>,
    /// Purpose bits of the operation.
    pub purpose: Purpose,
    /// Selected block mode, if any.
    pub mode: Option<BlockMode>,
    /// Selected padding; absent behaves as none.
    pub padding: Padding,
    /// Selected digest, if any.
    pub digest: Option<Digest>,
    /// Key size in bits, if carried by the parameter set.
    pub key_len: Option<u32>,
    /// CBC initialization vector.
    pub iv: Option<Vec<u8>>,
    /// AE nonce.
    pub nonce: Option<Vec<u8>>,
    /// AE associated data.
    pub aad: Option<Vec<u8>>,
}

impl UsageSpec {
    /// Fills the spec from whatever tags the parameter set carries.
    ///
    /// No field is mandatory here; the validation entry points have already
    /// decided which tags must exist for the operation.
    pub fn from_params(params: &ParamSet) -> UksResult<Self> {
        let mut spec = UsageSpec::default();
        if let Ok(value) = params.get_u32(Tag::Algorithm) {
            spec.algorithm = Some(Algorithm::try_from(value)?);
        }
        if let Ok(value) = params.get_u32(Tag::Purpose) {
            spec.purpose = Purpose::try_from(value)?;
        }
        if let Ok(value) = params.get_u32(Tag::BlockMode) {
            spec.mode = Some(BlockMode::try_from(value)?);
        }
        if let Ok(value) = params.get_u32(Tag::Padding) {
            spec.padding = Padding::try_from(value)?;
        }
        if let Ok(value) = params.get_u32(Tag::Digest) {
            spec.digest = Some(Digest::try_from(value)?);
        }
        if let Ok(value) = params.get_u32(Tag::KeySize) {
            spec.key_len = Some(value);
        }
        if let Ok(bytes) = params.get_bytes(Tag::Iv) {
            spec.iv = Some(bytes.to_vec());
        }
        if let Ok(bytes) = params.get_bytes(Tag::Nonce) {
            spec.nonce = Some(bytes.to_vec());
        }
        if let Ok(bytes) = params.get_bytes(Tag::AssociatedData) {
            spec.aad = Some(bytes.to_vec());
        }
        Ok(spec)
    }

    /// The digest as dispatch logic sees it: absent means `Digest::None`.
    pub fn digest_or_none(&self) -> Digest {
        self.digest.unwrap_or(Digest::None)
    }
}

/// Parameters of a derivation or agreement.
#[derive(Debug, Clone, Default)]
pub struct KeySpec {
    /// Algorithm identifier.
    pub algorithm: Option<Algorithm>,
    /// Target key length in bits, if carried by the parameter set.
    pub key_len: Option<u32>,
    /// Derivation salt.
    pub salt: Option<Vec<u8>>,
    /// Derivation context info.
    pub info: Option<Vec<u8>>,
    /// PBKDF2 iteration count.
    pub iteration: Option<u32>,
    /// Derivation digest.
    pub digest: Option<Digest>,
}

impl KeySpec {
    /// Fills the spec from whatever tags the parameter set carries.
    pub fn from_params(params: &ParamSet) -> UksResult<Self> {
        let mut spec = KeySpec::default();
        if let Ok(value) = params.get_u32(Tag::Algorithm) {
            spec.algorithm = Some(Algorithm::try_from(value)?);
        }
        if let Ok(value) = params.get_u32(Tag::KeySize) {
            spec.key_len = Some(value);
        }
        if let Ok(bytes) = params.get_bytes(Tag::Salt) {
            spec.salt = Some(bytes.to_vec());
        }
        if let Ok(bytes) = params.get_bytes(Tag::Info) {
            spec.info = Some(bytes.to_vec());
        }
        if let Ok(value) = params.get_u32(Tag::Iteration) {
            spec.iteration = Some(value);
        }
        if let Ok(value) = params.get_u32(Tag::Digest) {
            spec.digest = Some(Digest::try_from(value)?);
        }
        Ok(spec)
    }
}

/// Reads the algorithm tag that selects a session's dispatch family.
pub(crate) fn session_algorithm(params: &ParamSet) -> UksResult<Algorithm> {
    let raw = params.get_u32(Tag::Algorithm).map_err(|_| {
        tracing::error!("session algorithm tag missing");
        UksError::CheckGetAlgFail
    })?;
    Algorithm::try_from(raw)
}

/// Reads the digest tag; a missing tag means the caller prehashed.
pub(crate) fn session_digest(params: &ParamSet) -> Digest {
    params
        .get_u32(Tag::Digest)
        .ok()
        .and_then(|raw| Digest::try_from(raw).ok())
        .unwrap_or(Digest::None)
}
