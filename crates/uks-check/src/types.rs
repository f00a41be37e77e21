// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Algorithm identifiers and derived-size helpers.
//!
//! The numeric discriminants are part of the key store's stable interface:
//! parameter sets carry them as raw `u32` values, so every enum here converts
//! from `u32` with a field-specific error on unknown values.

use crate::UksError;
use crate::UksResult;

/// Authentication tag length for GCM/CCM ciphertext, in bytes.
pub const AE_TAG_LEN: u32 = 16;

/// Block length shared by AES and SM4, in bytes.
pub const BLOCK_CIPHER_BLOCK_SIZE: u32 = 16;

/// IV length required by CBC mode, in bytes.
pub const BLOCK_CIPHER_IV_LEN: u32 = 16;

/// Minimum associated-data length accepted by CCM mode.
pub const AES_CCM_AAD_LEN_MIN: u32 = 4;

/// CCM nonce length bounds.
pub const AES_CCM_NONCE_LEN_MIN: u32 = 7;
/// CCM nonce length bounds.
pub const AES_CCM_NONCE_LEN_MAX: u32 = 13;

/// Minimum GCM nonce length.
pub const AES_GCM_NONCE_LEN_MIN: u32 = 12;

/// OAEP reserves two digest blocks plus two bytes of the modulus.
pub const RSA_OAEP_DIGEST_NUM: u32 = 2;

/// Worst-case DER tag/length overhead of an ECDSA signature.
pub const ECC_SIGN_MAX_TL_SIZE: u32 = 8;

/// Minimum (and exact) ED25519 signature length.
pub const SIGNATURE_MIN_SIZE: u32 = 64;

/// Converts a key length in bits to whole bytes, rounding up.
pub fn key_bytes(key_size_bits: u32) -> u32 {
    key_size_bits / 8 + u32::from(key_size_bits % 8 != 0)
}

/// Cryptographic algorithm identifier.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    /// RSA cipher and signature.
    Rsa = 1,
    /// NIST elliptic-curve signature.
    Ecc = 2,
    /// DSA signature.
    Dsa = 3,
    /// AES block cipher.
    Aes = 20,
    /// Keyed-hash message authentication.
    Hmac = 50,
    /// HKDF key derivation.
    Hkdf = 51,
    /// PBKDF2 key derivation.
    Pbkdf2 = 52,
    /// Elliptic-curve Diffie-Hellman agreement.
    Ecdh = 100,
    /// Curve25519 agreement.
    X25519 = 101,
    /// Edwards25519 signature.
    Ed25519 = 102,
    /// Finite-field Diffie-Hellman agreement.
    Dh = 103,
    /// ShangMi elliptic-curve signature.
    Sm2 = 150,
    /// ShangMi hash.
    Sm3 = 151,
    /// ShangMi block cipher.
    Sm4 = 152,
}

impl TryFrom<u32> for Algorithm {
    type Error = UksError;

    fn try_from(value: u32) -> UksResult<Self> {
        match value {
            1 => Ok(Algorithm::Rsa),
            2 => Ok(Algorithm::Ecc),
            3 => Ok(Algorithm::Dsa),
            20 => Ok(Algorithm::Aes),
            50 => Ok(Algorithm::Hmac),
            51 => Ok(Algorithm::Hkdf),
            52 => Ok(Algorithm::Pbkdf2),
            100 => Ok(Algorithm::Ecdh),
            101 => Ok(Algorithm::X25519),
            102 => Ok(Algorithm::Ed25519),
            103 => Ok(Algorithm::Dh),
            150 => Ok(Algorithm::Sm2),
            151 => Ok(Algorithm::Sm3),
            152 => Ok(Algorithm::Sm4),
            _ => Err(UksError::InvalidAlgorithm),
        }
    }
}

/// Digest algorithm identifier.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Digest {
    /// No digest; the caller supplies a prehashed value.
    None = 0,
    /// MD5 (compatibility only).
    Md5 = 1,
    /// SM3.
    Sm3 = 2,
    /// SHA-1 (compatibility only).
    Sha1 = 10,
    /// SHA-224.
    Sha224 = 11,
    /// SHA-256.
    Sha256 = 12,
    /// SHA-384.
    Sha384 = 13,
    /// SHA-512.
    Sha512 = 14,
}

impl TryFrom<u32> for Digest {
    type Error = UksError;

    fn try_from(value: u32) -> UksResult<Self> {
        match value {
            0 => Ok(Digest::None),
            1 => Ok(Digest::Md5),
            2 => Ok(Digest::Sm3),
            10 => Ok(Digest::Sha1),
            11 => Ok(Digest::Sha224),
            12 => Ok(Digest::Sha256),
            13 => Ok(Digest::Sha384),
            14 => Ok(Digest::Sha512),
            _ => Err(UksError::InvalidDigest),
        }
    }
}

/// Returns the digest output length in bytes.
///
/// `Digest::None` has no length and fails with [`UksError::InvalidDigest`];
/// callers that allow a prehashed input must handle it before asking.
pub fn digest_len(digest: Digest) -> UksResult<u32> {
    match digest {
        Digest::Md5 => Ok(16),
        Digest::Sha1 => Ok(20),
        Digest::Sha224 => Ok(28),
        Digest::Sha256 => Ok(32),
        Digest::Sha384 => Ok(48),
        Digest::Sha512 => Ok(64),
        Digest::Sm3 => Ok(32),
        Digest::None => Err(UksError::InvalidDigest),
    }
}

/// Cipher padding scheme identifier.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Padding {
    /// No padding.
    #[default]
    None = 0,
    /// RSA OAEP.
    Oaep = 1,
    /// RSA PSS.
    Pss = 2,
    /// RSA PKCS#1 v1.5.
    Pkcs1V15 = 3,
    /// PKCS#5.
    Pkcs5 = 4,
    /// PKCS#7 block padding.
    Pkcs7 = 5,
}

impl TryFrom<u32> for Padding {
    type Error = UksError;

    fn try_from(value: u32) -> UksResult<Self> {
        match value {
            0 => Ok(Padding::None),
            1 => Ok(Padding::Oaep),
            2 => Ok(Padding::Pss),
            3 => Ok(Padding::Pkcs1V15),
            4 => Ok(Padding::Pkcs5),
            5 => Ok(Padding::Pkcs7),
            _ => Err(UksError::InvalidPadding),
        }
    }
}

/// Block cipher mode identifier.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlockMode {
    /// Electronic codebook.
    Ecb = 1,
    /// Cipher block chaining.
    Cbc = 2,
    /// Counter mode.
    Ctr = 3,
    /// Output feedback.
    Ofb = 4,
    /// Counter with CBC-MAC (authenticated).
    Ccm = 31,
    /// Galois/counter mode (authenticated).
    Gcm = 32,
}

impl BlockMode {
    /// True for the authenticated-encryption modes.
    pub fn is_ae(self) -> bool {
        matches!(self, BlockMode::Ccm | BlockMode::Gcm)
    }
}

impl TryFrom<u32> for BlockMode {
    type Error = UksError;

    fn try_from(value: u32) -> UksResult<Self> {
        match value {
            1 => Ok(BlockMode::Ecb),
            2 => Ok(BlockMode::Cbc),
            3 => Ok(BlockMode::Ctr),
            4 => Ok(BlockMode::Ofb),
            31 => Ok(BlockMode::Ccm),
            32 => Ok(BlockMode::Gcm),
            _ => Err(UksError::InvalidMode),
        }
    }
}

bitflags::bitflags! {
    /// Key usage bitmask.
    ///
    /// The bits partition into six mutually exclusive capability groups:
    /// cipher (encrypt|decrypt), sign (sign|verify), derive, wrap
    /// (wrap|unwrap), mac and agree. Generation rejects masks that touch
    /// more than one group.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct Purpose: u32 {
        /// Encrypt data.
        const ENCRYPT = 1;
        /// Decrypt data.
        const DECRYPT = 2;
        /// Produce signatures.
        const SIGN = 4;
        /// Verify signatures.
        const VERIFY = 8;
        /// Derive keys.
        const DERIVE = 16;
        /// Wrap keys.
        const WRAP = 32;
        /// Unwrap keys.
        const UNWRAP = 64;
        /// Compute MACs.
        const MAC = 128;
        /// Agree shared secrets.
        const AGREE = 256;
    }
}

impl TryFrom<u32> for Purpose {
    type Error = UksError;

    fn try_from(value: u32) -> UksResult<Self> {
        Purpose::from_bits(value).ok_or(UksError::InvalidPurpose)
    }
}

/// Operation context a parameter set is validated for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckType {
    /// Generating a general-purpose key.
    GenKey,
    /// Using an existing key.
    UseKey,
    /// Generating a MAC key.
    GenMacKey,
    /// Generating a derivation key.
    GenDeriveKey,
}

/// Direction of the operation being checked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmdId {
    /// Encrypt.
    Encrypt,
    /// Decrypt.
    Decrypt,
    /// Sign.
    Sign,
    /// Verify.
    Verify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_len_table() {
        assert_eq!(digest_len(Digest::Md5), Ok(16));
        assert_eq!(digest_len(Digest::Sha1), Ok(20));
        assert_eq!(digest_len(Digest::Sha224), Ok(28));
        assert_eq!(digest_len(Digest::Sha256), Ok(32));
        assert_eq!(digest_len(Digest::Sha384), Ok(48));
        assert_eq!(digest_len(Digest::Sha512), Ok(64));
        assert_eq!(digest_len(Digest::Sm3), Ok(32));
        assert_eq!(digest_len(Digest::None), Err(UksError::InvalidDigest));
    }

    #[test]
    fn key_bytes_rounds_up() {
        assert_eq!(key_bytes(2048), 256);
        assert_eq!(key_bytes(521), 66);
        assert_eq!(key_bytes(0), 0);
    }

    #[test]
    fn unknown_discriminants_map_to_field_errors() {
        assert_eq!(Algorithm::try_from(77), Err(UksError::InvalidAlgorithm));
        assert_eq!(Digest::try_from(99), Err(UksError::InvalidDigest));
        assert_eq!(Padding::try_from(9), Err(UksError::InvalidPadding));
        assert_eq!(BlockMode::try_from(5), Err(UksError::InvalidMode));
        assert_eq!(Purpose::try_from(1 << 20), Err(UksError::InvalidPurpose));
    }
}
