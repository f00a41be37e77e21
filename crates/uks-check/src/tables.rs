// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Static expectation tables, keyed by (algorithm, check type).

use crate::Algorithm;
use crate::BlockMode;
use crate::CheckType;
use crate::Digest;
use crate::ExpectParamsValues;
use crate::ExpectValues;
use crate::Padding;
use crate::ParamsShape;
use crate::Purpose;

pub(crate) const RSA_KEY_SIZES: &[u32] = &[512, 768, 1024, 2048, 3072, 4096];
pub(crate) const RSA_PADDINGS: &[Padding] = &[
    Padding::None,
    Padding::Oaep,
    Padding::Pss,
    Padding::Pkcs1V15,
];
pub(crate) const RSA_DIGESTS: &[Digest] = &[
    Digest::Md5,
    Digest::None,
    Digest::Sha1,
    Digest::Sha224,
    Digest::Sha256,
    Digest::Sha384,
    Digest::Sha512,
];
pub(crate) const RSA_SIGN_PADDINGS: &[Padding] = &[Padding::Pss, Padding::Pkcs1V15];
pub(crate) const RSA_CIPHER_PADDINGS: &[Padding] =
    &[Padding::None, Padding::Oaep, Padding::Pkcs1V15];

pub(crate) const AES_KEY_SIZES: &[u32] = &[128, 192, 256];
pub(crate) const AES_MAC_KEY_SIZES: &[u32] = &[256];
pub(crate) const AES_PADDINGS: &[Padding] = &[Padding::None, Padding::Pkcs7];
pub(crate) const AES_MODES: &[BlockMode] = &[
    BlockMode::Cbc,
    BlockMode::Ccm,
    BlockMode::Ctr,
    BlockMode::Ecb,
    BlockMode::Gcm,
];
pub(crate) const AES_CBC_PADDINGS: &[Padding] = &[Padding::None, Padding::Pkcs7];
pub(crate) const AES_AEAD_PADDINGS: &[Padding] = &[Padding::None];
pub(crate) const AES_CTR_PADDINGS: &[Padding] = &[Padding::None];
pub(crate) const AES_ECB_PADDINGS: &[Padding] = &[Padding::None, Padding::Pkcs7];

pub(crate) const SM4_KEY_SIZES: &[u32] = &[128];
pub(crate) const SM4_PADDINGS: &[Padding] = &[Padding::None, Padding::Pkcs7];
pub(crate) const SM4_PURPOSES: &[Purpose] = &[
    Purpose::ENCRYPT,
    Purpose::DECRYPT,
    Purpose::ENCRYPT.union(Purpose::DECRYPT),
];
pub(crate) const SM4_MODES: &[BlockMode] = &[BlockMode::Cbc, BlockMode::Ctr, BlockMode::Ecb];
pub(crate) const SM4_CBC_PADDINGS: &[Padding] = &[Padding::None, Padding::Pkcs7];
pub(crate) const SM4_CTR_PADDINGS: &[Padding] = &[Padding::None];
pub(crate) const SM4_ECB_PADDINGS: &[Padding] = &[Padding::None, Padding::Pkcs7];

pub(crate) const ECC_KEY_SIZES: &[u32] = &[224, 256, 384, 521];
pub(crate) const ECC_DIGESTS: &[Digest] = &[
    Digest::None,
    Digest::Sha1,
    Digest::Sha224,
    Digest::Sha256,
    Digest::Sha384,
    Digest::Sha512,
];

pub(crate) const SM2_KEY_SIZES: &[u32] = &[256];
pub(crate) const SM2_DIGESTS: &[Digest] = &[Digest::Sm3, Digest::None];
pub(crate) const SM3_DIGESTS: &[Digest] = &[Digest::Sm3];

pub(crate) const DERIVE_DIGESTS: &[Digest] = &[Digest::Sha256, Digest::Sha384, Digest::Sha512];
pub(crate) const MAC_GEN_DIGESTS: &[Digest] = &[Digest::Sha256];
pub(crate) const MAC_DIGESTS: &[Digest] = &[
    Digest::Sha1,
    Digest::Sha224,
    Digest::Sha256,
    Digest::Sha384,
    Digest::Sha512,
    Digest::Sm3,
];

pub(crate) const ECDH_KEY_SIZES: &[u32] = &[224, 256, 384, 521];
pub(crate) const CURVE25519_KEY_SIZES: &[u32] = &[256];
pub(crate) const HMAC_DIGESTS: &[Digest] = &[
    Digest::Sha1,
    Digest::Sha224,
    Digest::Sha256,
    Digest::Sha384,
    Digest::Sha512,
    Digest::Sm3,
];
pub(crate) const DSA_DIGESTS: &[Digest] = &[
    Digest::None,
    Digest::Sha1,
    Digest::Sha224,
    Digest::Sha256,
    Digest::Sha384,
    Digest::Sha512,
];
pub(crate) const DH_KEY_SIZES: &[u32] = &[2048, 3072, 4096];

/// Purpose bits an algorithm must not carry at generation time.
pub(crate) const INVALID_PURPOSES: &[(Algorithm, Purpose)] = &[
    (
        Algorithm::Rsa,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::AGREE),
    ),
    (
        Algorithm::Ecc,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT),
    ),
    (
        Algorithm::Sm2,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT),
    ),
    (
        Algorithm::Sm3,
        Purpose::DERIVE
            .union(Purpose::SIGN)
            .union(Purpose::VERIFY)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT)
            .union(Purpose::AGREE),
    ),
    (
        Algorithm::Sm4,
        Purpose::SIGN
            .union(Purpose::VERIFY)
            .union(Purpose::DERIVE)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::MAC)
            .union(Purpose::AGREE),
    ),
    (
        Algorithm::Aes,
        Purpose::SIGN
            .union(Purpose::VERIFY)
            .union(Purpose::AGREE)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP),
    ),
    (
        Algorithm::Ed25519,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT),
    ),
    (
        Algorithm::X25519,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT)
            .union(Purpose::WRAP),
    ),
    (
        Algorithm::Hmac,
        Purpose::DERIVE
            .union(Purpose::SIGN)
            .union(Purpose::VERIFY)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT)
            .union(Purpose::AGREE),
    ),
    (
        Algorithm::Dsa,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT)
            .union(Purpose::AGREE),
    ),
    (
        Algorithm::Dh,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT)
            .union(Purpose::SIGN)
            .union(Purpose::VERIFY),
    ),
    (
        Algorithm::Ecdh,
        Purpose::DERIVE
            .union(Purpose::MAC)
            .union(Purpose::WRAP)
            .union(Purpose::UNWRAP)
            .union(Purpose::ENCRYPT)
            .union(Purpose::DECRYPT)
            .union(Purpose::SIGN)
            .union(Purpose::VERIFY),
    ),
];

/// Algorithms accepted by each operation entry point.
pub(crate) const GEN_KEY_ALGS: &[Algorithm] = &[
    Algorithm::Rsa,
    Algorithm::Aes,
    Algorithm::Ecc,
    Algorithm::Hmac,
    Algorithm::X25519,
    Algorithm::Ed25519,
    Algorithm::Dsa,
    Algorithm::Dh,
    Algorithm::Ecdh,
    Algorithm::Sm2,
    Algorithm::Sm3,
    Algorithm::Sm4,
];
pub(crate) const CIPHER_ALGS: &[Algorithm] = &[Algorithm::Rsa, Algorithm::Aes];
pub(crate) const SIGN_ALGS: &[Algorithm] = &[
    Algorithm::Rsa,
    Algorithm::Dsa,
    Algorithm::Ecc,
    Algorithm::Ed25519,
];
pub(crate) const AGREE_ALGS: &[Algorithm] = &[Algorithm::Ecdh, Algorithm::X25519, Algorithm::Dh];
pub(crate) const DERIVE_ALGS: &[Algorithm] = &[Algorithm::Hkdf, Algorithm::Pbkdf2];

/// User authentication constants.
pub(crate) const USER_AUTH_TYPE_FINGERPRINT: u32 = 1 << 0;
pub(crate) const USER_AUTH_TYPE_FACE: u32 = 1 << 1;
pub(crate) const USER_AUTH_TYPE_PIN: u32 = 1 << 2;

pub(crate) const AUTH_ACCESS_INVALID_CLEAR_PASSWORD: u32 = 1 << 0;
pub(crate) const AUTH_ACCESS_INVALID_NEW_BIO_ENROLL: u32 = 1 << 1;

pub(crate) const USER_AUTH_TYPES: &[u32] = &[
    USER_AUTH_TYPE_PIN,
    USER_AUTH_TYPE_FINGERPRINT,
    USER_AUTH_TYPE_FACE,
    USER_AUTH_TYPE_PIN | USER_AUTH_TYPE_FINGERPRINT,
    USER_AUTH_TYPE_PIN | USER_AUTH_TYPE_FACE,
    USER_AUTH_TYPE_FACE | USER_AUTH_TYPE_FINGERPRINT,
    USER_AUTH_TYPE_PIN | USER_AUTH_TYPE_FACE | USER_AUTH_TYPE_FINGERPRINT,
];
pub(crate) const CHALLENGE_TYPES: &[u32] = &[0, 1, 2];
pub(crate) const BIOMETRIC_ACCESS_TYPES: &[u32] = &[
    AUTH_ACCESS_INVALID_NEW_BIO_ENROLL,
    AUTH_ACCESS_INVALID_CLEAR_PASSWORD,
];
pub(crate) const PIN_ACCESS_TYPES: &[u32] = &[AUTH_ACCESS_INVALID_CLEAR_PASSWORD];
pub(crate) const AUTH_ACCESS_CHECKERS: &[(u32, &[u32])] = &[
    (USER_AUTH_TYPE_FACE, BIOMETRIC_ACCESS_TYPES),
    (USER_AUTH_TYPE_FINGERPRINT, BIOMETRIC_ACCESS_TYPES),
    (USER_AUTH_TYPE_PIN, PIN_ACCESS_TYPES),
];
pub(crate) const SECURE_SIGN_TYPES: &[u32] = &[1];

const fn shape(key_len: bool, padding: bool, purpose: bool, digest: bool, mode: bool) -> ParamsShape {
    ParamsShape {
        key_len,
        padding,
        purpose,
        digest,
        mode,
    }
}

/// Input-extraction shapes per algorithm and check type.
pub(crate) fn input_shape(alg: Algorithm, check_type: CheckType) -> Option<ParamsShape> {
    use CheckType::*;
    let shape = match (alg, check_type) {
        (Algorithm::Rsa, GenKey | UseKey) => shape(true, true, true, true, false),
        (Algorithm::Aes, GenKey) => shape(true, true, true, false, true),
        (Algorithm::Aes, UseKey) => shape(false, true, true, false, true),
        (Algorithm::Aes, GenMacKey | GenDeriveKey) => shape(true, false, false, true, false),
        (Algorithm::Ecc | Algorithm::Sm2, GenKey) => shape(true, false, true, true, false),
        (Algorithm::Ecc | Algorithm::Sm2, UseKey) => shape(false, false, true, true, false),
        (Algorithm::Sm3, GenKey | GenMacKey) => shape(true, false, true, true, false),
        (Algorithm::Sm4, GenKey | UseKey) => shape(true, true, true, false, true),
        (Algorithm::X25519 | Algorithm::Ed25519, GenKey) => shape(true, false, true, false, false),
        (Algorithm::X25519 | Algorithm::Ed25519, UseKey) => {
            shape(false, false, true, false, false)
        }
        (Algorithm::Hmac, GenKey | GenMacKey) => shape(true, false, true, true, false),
        (Algorithm::Hmac, UseKey) => shape(false, false, true, true, false),
        (Algorithm::Dsa, GenKey) => shape(true, false, true, true, false),
        (Algorithm::Dsa, UseKey) => shape(false, false, true, true, false),
        (Algorithm::Dh | Algorithm::Ecdh, GenKey | UseKey) => {
            shape(true, false, true, false, false)
        }
        _ => return None,
    };
    Some(shape)
}

/// Expected-value rows per algorithm and check type.
pub(crate) fn expect_params(alg: Algorithm, check_type: CheckType) -> Option<ExpectParamsValues> {
    use CheckType::*;
    let row = match (alg, check_type) {
        (Algorithm::Rsa, GenKey | UseKey) => ExpectParamsValues {
            key_len: ExpectValues::check(RSA_KEY_SIZES),
            padding: ExpectValues::check(RSA_PADDINGS),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(RSA_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Aes, GenKey) => ExpectParamsValues {
            key_len: ExpectValues::check(AES_KEY_SIZES),
            padding: ExpectValues::check(AES_PADDINGS),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::skip(),
            mode: ExpectValues::check(AES_MODES),
        },
        (Algorithm::Aes, UseKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::check(AES_PADDINGS),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::skip(),
            mode: ExpectValues::check(AES_MODES),
        },
        (Algorithm::Aes, GenMacKey) => ExpectParamsValues {
            key_len: ExpectValues::check(AES_MAC_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(MAC_GEN_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Aes, GenDeriveKey) => ExpectParamsValues {
            key_len: ExpectValues::check(AES_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(DERIVE_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Ecc, GenKey) => ExpectParamsValues {
            key_len: ExpectValues::check(ECC_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(ECC_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Ecc, UseKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(ECC_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Sm2, GenKey) => ExpectParamsValues {
            key_len: ExpectValues::check(SM2_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(SM2_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Sm2, UseKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(SM2_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Sm3, GenKey | GenMacKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(SM3_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Sm4, GenKey | UseKey) => ExpectParamsValues {
            key_len: ExpectValues::check(SM4_KEY_SIZES),
            padding: ExpectValues::check(SM4_PADDINGS),
            purpose: ExpectValues::check(SM4_PURPOSES),
            digest: ExpectValues::skip(),
            mode: ExpectValues::check(SM4_MODES),
        },
        (Algorithm::X25519 | Algorithm::Ed25519, GenKey) => ExpectParamsValues {
            key_len: ExpectValues::check(CURVE25519_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::skip(),
            mode: ExpectValues::skip(),
        },
        (Algorithm::X25519 | Algorithm::Ed25519, UseKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::skip(),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Hmac, GenKey | UseKey | GenMacKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(HMAC_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Dsa, GenKey | UseKey) => ExpectParamsValues {
            key_len: ExpectValues::skip(),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::check(DSA_DIGESTS),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Dh, GenKey | UseKey) => ExpectParamsValues {
            key_len: ExpectValues::check(DH_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::skip(),
            mode: ExpectValues::skip(),
        },
        (Algorithm::Ecdh, GenKey | UseKey) => ExpectParamsValues {
            key_len: ExpectValues::check(ECDH_KEY_SIZES),
            padding: ExpectValues::skip(),
            purpose: ExpectValues::skip(),
            digest: ExpectValues::skip(),
            mode: ExpectValues::skip(),
        },
        _ => return None,
    };
    Some(row)
}

/// Key-size whitelists used when reading a key's stored parameter set.
pub(crate) fn key_size_whitelist(alg: Algorithm) -> Option<&'static [u32]> {
    match alg {
        Algorithm::Rsa => Some(RSA_KEY_SIZES),
        Algorithm::Ecc => Some(ECC_KEY_SIZES),
        Algorithm::Ecdh => Some(ECDH_KEY_SIZES),
        Algorithm::X25519 | Algorithm::Ed25519 => Some(CURVE25519_KEY_SIZES),
        Algorithm::Dh => Some(DH_KEY_SIZES),
        Algorithm::Sm4 => Some(SM4_KEY_SIZES),
        _ => None,
    }
}
