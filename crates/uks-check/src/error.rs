// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared error taxonomy for the key store core.
//!
//! Every check in this crate and every stage of the session engine reports a
//! specific error identifying the field or operation that failed; nothing is
//! collapsed into a generic failure. The numeric codes returned by
//! [`UksError::code`] are stable and mirror the key store's wire-level error
//! table, so service layers can translate without a second mapping.

use thiserror::Error;

/// Result alias used across the key store core.
pub type UksResult<T> = Result<T, UksError>;

/// Key store core error.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum UksError {
    /// Generic failure used only where no richer code applies.
    #[error("operation failed")]
    Failure,

    /// Session state does not permit the requested call.
    #[error("bad session state")]
    BadState,

    /// Malformed input (null/empty blob, out-of-range numeric value).
    #[error("invalid argument")]
    InvalidArgument,

    /// The algorithm/check-type combination has no table entry.
    #[error("not supported")]
    NotSupported,

    /// Caller-provided output buffer is too small for the computed size.
    #[error("buffer too small")]
    BufferTooSmall,

    /// An accumulation or output size limit was exceeded.
    #[error("insufficient memory")]
    InsufficientMemory,

    /// A required resource handle was unexpectedly absent.
    #[error("null pointer")]
    NullPointer,

    /// A key's stored parameter set is malformed.
    #[error("invalid key file")]
    InvalidKeyFile,

    /// Imported or referenced key material is inconsistent.
    #[error("invalid key info")]
    InvalidKeyInfo,

    /// The requested tag does not exist in the parameter set.
    #[error("param not exist")]
    ParamNotExist,

    /// The crypto primitive backend reported a failure.
    #[error("crypto engine error")]
    CryptoEngine,

    /// The authorization gate rejected the operation.
    #[error("key auth failed")]
    KeyAuthFailed,

    /// Mandatory algorithm tag missing from the parameter set.
    #[error("get algorithm param failed")]
    CheckGetAlgFail,

    /// Mandatory key-size tag missing from the parameter set.
    #[error("get key size param failed")]
    CheckGetKeySizeFail,

    /// Padding tag missing or rejected during generation checks.
    #[error("get padding param failed")]
    CheckGetPaddingFail,

    /// Mandatory purpose tag missing from the parameter set.
    #[error("get purpose param failed")]
    CheckGetPurposeFail,

    /// Digest tag missing or rejected during generation checks.
    #[error("get digest param failed")]
    CheckGetDigestFail,

    /// Block-mode tag missing or rejected during generation checks.
    #[error("get block mode param failed")]
    CheckGetModeFail,

    /// Nonce tag missing for an AE cipher operation.
    #[error("get nonce param failed")]
    CheckGetNonceFail,

    /// Associated-data tag missing for an AE cipher operation.
    #[error("get aad param failed")]
    CheckGetAadFail,

    /// IV tag missing for a CBC cipher operation.
    #[error("get iv param failed")]
    CheckGetIvFail,

    /// AE tag parameter missing for an authenticated decrypt.
    #[error("get ae tag param failed")]
    CheckGetAeTagFail,

    /// Salt tag missing for a PBKDF2 derivation.
    #[error("get salt param failed")]
    CheckGetSaltFail,

    /// Iteration tag missing for a PBKDF2 derivation.
    #[error("get iteration param failed")]
    CheckGetIterationFail,

    /// Algorithm value outside the supported enumeration or operation list.
    #[error("invalid algorithm")]
    InvalidAlgorithm,

    /// Key size outside the algorithm's whitelist.
    #[error("invalid key size")]
    InvalidKeySize,

    /// Padding outside the algorithm's whitelist.
    #[error("invalid padding")]
    InvalidPadding,

    /// Purpose bits are not unique to one capability group or are forbidden
    /// for the algorithm.
    #[error("invalid purpose")]
    InvalidPurpose,

    /// Block mode outside the algorithm's whitelist.
    #[error("invalid mode")]
    InvalidMode,

    /// Digest outside the algorithm's whitelist.
    #[error("invalid digest")]
    InvalidDigest,

    /// Signature length violates the algorithm's size constraint.
    #[error("invalid signature size")]
    InvalidSignatureSize,

    /// IV material has the wrong length.
    #[error("invalid iv")]
    InvalidIv,

    /// Associated data violates the mode's length constraint.
    #[error("invalid aad")]
    InvalidAad,

    /// Nonce violates the mode's length constraint.
    #[error("invalid nonce")]
    InvalidNonce,

    /// AE tag material is malformed.
    #[error("invalid ae tag")]
    InvalidAeTag,

    /// PBKDF2 salt shorter than the minimum.
    #[error("invalid salt")]
    InvalidSalt,

    /// PBKDF2 iteration count below the minimum.
    #[error("invalid iteration")]
    InvalidIteration,

    /// Length-prefixed wrapped key data is malformed.
    #[error("invalid wrapped data format")]
    InvalidWrappedFormat,

    /// User-auth type outside the supported combinations.
    #[error("invalid auth type")]
    InvalidAuthType,

    /// Challenge type outside the supported enumeration.
    #[error("invalid challenge type")]
    InvalidChallengeType,

    /// Auth access type incompatible with the user-auth type.
    #[error("invalid access type")]
    InvalidAccessType,

    /// Secure-sign type outside the supported enumeration.
    #[error("invalid secure sign type")]
    InvalidSecureSignType,
}

impl UksError {
    /// Maps the error to its stable numeric code.
    pub fn code(&self) -> i32 {
        match self {
            UksError::Failure => -1,
            UksError::BadState => -2,
            UksError::InvalidArgument => -3,
            UksError::NotSupported => -4,
            UksError::BufferTooSmall => -7,
            UksError::InsufficientMemory => -8,
            UksError::NullPointer => -14,
            UksError::InvalidKeyInfo => -19,
            UksError::InvalidKeyFile => -27,
            UksError::ParamNotExist => -30,
            UksError::CryptoEngine => -31,
            UksError::KeyAuthFailed => -43,
            UksError::CheckGetAlgFail => -100,
            UksError::CheckGetKeySizeFail => -101,
            UksError::CheckGetPaddingFail => -102,
            UksError::CheckGetPurposeFail => -103,
            UksError::CheckGetDigestFail => -104,
            UksError::CheckGetModeFail => -105,
            UksError::CheckGetNonceFail => -106,
            UksError::CheckGetAadFail => -107,
            UksError::CheckGetIvFail => -108,
            UksError::CheckGetAeTagFail => -109,
            UksError::CheckGetSaltFail => -110,
            UksError::CheckGetIterationFail => -111,
            UksError::InvalidAlgorithm => -112,
            UksError::InvalidKeySize => -113,
            UksError::InvalidPadding => -114,
            UksError::InvalidPurpose => -115,
            UksError::InvalidMode => -116,
            UksError::InvalidDigest => -117,
            UksError::InvalidSignatureSize => -118,
            UksError::InvalidIv => -119,
            UksError::InvalidAad => -120,
            UksError::InvalidNonce => -121,
            UksError::InvalidAeTag => -122,
            UksError::InvalidSalt => -123,
            UksError::InvalidIteration => -124,
            UksError::InvalidWrappedFormat => -126,
            UksError::InvalidAuthType => -133,
            UksError::InvalidChallengeType => -134,
            UksError::InvalidAccessType => -135,
            UksError::InvalidSecureSignType => -137,
        }
    }
}
