// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Top-level per-operation parameter checks.
//!
//! These are the entry points the service layer calls before starting an
//! operation: each one resolves the algorithm against the operation's
//! whitelist, extracts the validated field values and runs the fixed,
//! mutable and material checks that apply.

use crate::digest_len;
use crate::key_bytes;
use crate::tables;
use crate::Algorithm;
use crate::CheckType;
use crate::CmdId;
use crate::Digest;
use crate::ParamSet;
use crate::ParamsValues;
use crate::Purpose;
use crate::Tag;
use crate::UksError;
use crate::UksResult;

use super::ParamValidator;

/// PBKDF2 lower bounds.
const PBKDF2_MIN_ITERATION: u32 = 1000;
const PBKDF2_MIN_SALT_SIZE: usize = 16;

impl ParamValidator {
    /// Validates a key-generation parameter set.
    ///
    /// MAC and derivation keys take their own table rows and are restricted
    /// to AES, HMAC and SM3; everything else goes through the general
    /// gen-key row plus the purpose and padding rules.
    pub fn check_gen_key_params(&self, params: &ParamSet) -> UksResult<ParamsValues> {
        params.validate()?;
        let alg = self.check_and_get_algorithm(params, tables::GEN_KEY_ALGS)?;
        let purpose_bits = params.get_u32(Tag::Purpose).map_err(|_| {
            tracing::error!("gen key purpose tag missing");
            UksError::CheckGetPurposeFail
        })?;
        let purpose = Purpose::try_from(purpose_bits)?;

        if purpose.intersects(Purpose::DERIVE.union(Purpose::MAC)) {
            return self.check_gen_key_mac_derive_params(alg, purpose, params);
        }

        let input = self.get_input_params(alg, CheckType::GenKey, params)?;
        self.check_fixed_params(alg, CheckType::GenKey, &input)?;
        self.check_gen_key_purpose(alg, purpose)?;
        self.check_gen_key_mutable_params(alg, &input)?;
        Ok(input)
    }

    fn check_gen_key_mac_derive_params(
        &self,
        alg: Algorithm,
        purpose: Purpose,
        params: &ParamSet,
    ) -> UksResult<ParamsValues> {
        if !matches!(alg, Algorithm::Aes | Algorithm::Hmac | Algorithm::Sm3) {
            tracing::error!(?alg, "mac/derive key generation limited to aes, hmac and sm3");
            return Err(UksError::InvalidPurpose);
        }
        self.check_gen_key_purpose(alg, purpose)?;

        let check_type = if purpose == Purpose::MAC {
            CheckType::GenMacKey
        } else {
            CheckType::GenDeriveKey
        };
        let input = self.get_input_params(alg, check_type, params)?;
        self.check_fixed_params(alg, check_type, &input)?;
        Ok(input)
    }

    /// Validates a cipher operation's parameters and buffer sizes.
    ///
    /// `key_params` is the parameter set stored with the key; for RSA and SM4
    /// the authoritative key size comes from there rather than the caller.
    pub fn check_cipher_params(
        &self,
        cmd: CmdId,
        key_params: &ParamSet,
        params: &ParamSet,
        in_data: &[u8],
        out_data: &[u8],
    ) -> UksResult<ParamsValues> {
        let alg = self.check_and_get_algorithm(params, tables::CIPHER_ALGS)?;
        let mut input = self.get_input_params(alg, CheckType::UseKey, params)?;

        if matches!(alg, Algorithm::Rsa | Algorithm::Sm4) {
            let key_size = self.get_key_size(alg, key_params)?;
            input.key_len = crate::FieldValue::Present(key_size);
        }

        self.check_fixed_params(alg, CheckType::UseKey, &input)?;
        self.check_cipher_mutable_params(cmd, alg, &input)?;
        self.check_cipher_material_params(alg, &input, params)?;
        self.check_cipher_data(cmd, alg, &input, in_data, out_data)?;
        Ok(input)
    }

    /// Validates a sign/verify operation's parameters and signature sizing.
    pub fn check_sign_verify_params(
        &self,
        cmd: CmdId,
        key_params: &ParamSet,
        params: &ParamSet,
        signature: &[u8],
    ) -> UksResult<ParamsValues> {
        let alg = self.check_and_get_algorithm(params, tables::SIGN_ALGS)?;
        let input = self.get_input_params(alg, CheckType::UseKey, params)?;
        self.check_fixed_params(alg, CheckType::UseKey, &input)?;
        self.check_sign_verify_mutable_params(cmd, alg, &input)?;

        let key_size = self.get_key_size(alg, key_params)?;
        self.check_signature(cmd, alg, key_size, signature)?;
        Ok(input)
    }

    /// Validates a key-agreement request and the agreed-secret buffer size.
    pub fn check_agree_key_params(
        &self,
        params: &ParamSet,
        private_key_params: &ParamSet,
        agreed_out_len: usize,
    ) -> UksResult<()> {
        let alg = self.check_and_get_algorithm(params, tables::AGREE_ALGS)?;
        let key_size = self.get_key_size(alg, private_key_params)?;
        let size = key_bytes(key_size) as usize;
        if agreed_out_len < size {
            tracing::error!(agreed_out_len, need = size, "agreed key buffer too small");
            return Err(UksError::BufferTooSmall);
        }
        Ok(())
    }

    /// Validates a key-derivation request.
    pub fn check_derive_key_params(&self, params: &ParamSet) -> UksResult<()> {
        let alg = self.check_and_get_algorithm(params, tables::DERIVE_ALGS)?;

        let purpose_bits = params.get_u32(Tag::Purpose).map_err(|_| {
            tracing::error!("derive purpose tag missing");
            UksError::CheckGetPurposeFail
        })?;
        if Purpose::try_from(purpose_bits)? != Purpose::DERIVE {
            return Err(UksError::InvalidPurpose);
        }

        // HKDF needs no salt or info checks; the digest whitelist applies to
        // both derivation algorithms.
        self.check_and_get_digest(params, tables::DERIVE_DIGESTS)?;

        if alg == Algorithm::Pbkdf2 {
            return self.check_pbkdf2_params(params);
        }
        Ok(())
    }

    /// Validates a MAC request and its output buffer size.
    pub fn check_mac_params(&self, params: &ParamSet, mac_out_len: usize) -> UksResult<()> {
        let purpose_bits = params.get_u32(Tag::Purpose).map_err(|_| {
            tracing::error!("mac purpose tag missing");
            UksError::CheckGetPurposeFail
        })?;
        if Purpose::try_from(purpose_bits)? != Purpose::MAC {
            return Err(UksError::InvalidPurpose);
        }

        let digest = self.check_and_get_digest(params, tables::MAC_DIGESTS)?;
        let len = digest_len(digest)?;
        if mac_out_len < len as usize {
            tracing::error!(mac_out_len, need = len, "mac buffer too small");
            return Err(UksError::BufferTooSmall);
        }
        Ok(())
    }

    fn check_pbkdf2_params(&self, params: &ParamSet) -> UksResult<()> {
        let iteration = params
            .get_u32(Tag::Iteration)
            .map_err(|_| UksError::CheckGetIterationFail)?;
        if iteration < PBKDF2_MIN_ITERATION {
            return Err(UksError::InvalidIteration);
        }

        let salt = params
            .get(Tag::Salt)
            .map_err(|_| UksError::CheckGetSaltFail)?;
        let salt = salt.as_bytes().map_err(|_| UksError::InvalidSalt)?;
        if salt.len() < PBKDF2_MIN_SALT_SIZE {
            return Err(UksError::InvalidSalt);
        }
        Ok(())
    }

    fn check_and_get_algorithm(
        &self,
        params: &ParamSet,
        expected: &[Algorithm],
    ) -> UksResult<Algorithm> {
        let raw = params.get_u32(Tag::Algorithm).map_err(|_| {
            tracing::error!("algorithm tag missing");
            UksError::CheckGetAlgFail
        })?;
        let alg = Algorithm::try_from(raw)?;
        if !expected.contains(&alg) {
            tracing::error!(?alg, "algorithm not expected for operation");
            return Err(UksError::InvalidAlgorithm);
        }
        if !self.capabilities().supports(alg) {
            return Err(UksError::NotSupported);
        }
        Ok(alg)
    }

    fn check_and_get_digest(&self, params: &ParamSet, expected: &[Digest]) -> UksResult<Digest> {
        let raw = params.get_u32(Tag::Digest).map_err(|_| {
            tracing::error!("digest tag missing");
            UksError::CheckGetDigestFail
        })?;
        let digest = Digest::try_from(raw)?;
        if !expected.contains(&digest) {
            tracing::error!(?digest, "digest not expected for operation");
            return Err(UksError::InvalidDigest);
        }
        Ok(digest)
    }
}
