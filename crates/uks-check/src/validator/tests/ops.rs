// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;

#[test]
fn gen_key_aes_cipher() {
    let v = validator();
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, (Purpose::ENCRYPT | Purpose::DECRYPT).bits()),
        u32p(Tag::KeySize, 256),
        u32p(Tag::Padding, Padding::Pkcs7 as u32),
        u32p(Tag::BlockMode, BlockMode::Cbc as u32),
    ]);
    let input = v.check_gen_key_params(&set).unwrap();
    assert_eq!(input.key_len, FieldValue::Present(256));

    // CTR rejects PKCS7 through the mutable padding rule.
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::ENCRYPT.bits()),
        u32p(Tag::KeySize, 256),
        u32p(Tag::Padding, Padding::Pkcs7 as u32),
        u32p(Tag::BlockMode, BlockMode::Ctr as u32),
    ]);
    assert_eq!(v.check_gen_key_params(&set), Err(UksError::InvalidPadding));
}

#[test]
fn gen_key_mac_path() {
    let v = validator();
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::MAC.bits()),
        u32p(Tag::KeySize, 256),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    v.check_gen_key_params(&set).unwrap();

    // MAC keys must be 256 bits.
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::MAC.bits()),
        u32p(Tag::KeySize, 128),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    assert_eq!(v.check_gen_key_params(&set), Err(UksError::InvalidKeySize));

    // MAC generation is limited to AES, HMAC and SM3.
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Ecc as u32),
        u32p(Tag::Purpose, Purpose::MAC.bits()),
        u32p(Tag::KeySize, 256),
    ]);
    assert_eq!(v.check_gen_key_params(&set), Err(UksError::InvalidPurpose));
}

#[test]
fn gen_key_derive_path() {
    let v = validator();
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::DERIVE.bits()),
        u32p(Tag::KeySize, 192),
        u32p(Tag::Digest, Digest::Sha384 as u32),
    ]);
    v.check_gen_key_params(&set).unwrap();

    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::DERIVE.bits()),
        u32p(Tag::KeySize, 192),
        u32p(Tag::Digest, Digest::Sha1 as u32),
    ]);
    assert_eq!(v.check_gen_key_params(&set), Err(UksError::InvalidDigest));
}

#[test]
fn gen_key_rsa_padding_depends_on_purpose() {
    let v = validator();
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Rsa as u32),
        u32p(Tag::Purpose, (Purpose::SIGN | Purpose::VERIFY).bits()),
        u32p(Tag::KeySize, 2048),
        u32p(Tag::Padding, Padding::Pss as u32),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    v.check_gen_key_params(&set).unwrap();

    // OAEP is a cipher padding, not a sign padding.
    let set = params(vec![
        u32p(Tag::Algorithm, Algorithm::Rsa as u32),
        u32p(Tag::Purpose, (Purpose::SIGN | Purpose::VERIFY).bits()),
        u32p(Tag::KeySize, 2048),
        u32p(Tag::Padding, Padding::Oaep as u32),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    assert_eq!(v.check_gen_key_params(&set), Err(UksError::InvalidPadding));
}

#[test]
fn gen_key_missing_algorithm() {
    let v = validator();
    let set = params(vec![u32p(Tag::Purpose, Purpose::ENCRYPT.bits())]);
    assert_eq!(v.check_gen_key_params(&set), Err(UksError::CheckGetAlgFail));
}

#[test]
fn cipher_params_rsa_takes_key_size_from_key() {
    let v = validator();
    let key = params(vec![u32p(Tag::KeySize, 2048)]);
    let runtime = params(vec![
        u32p(Tag::Algorithm, Algorithm::Rsa as u32),
        u32p(Tag::Purpose, Purpose::ENCRYPT.bits()),
        u32p(Tag::KeySize, 512), // overridden by the key's own size
        u32p(Tag::Padding, Padding::Oaep as u32),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    v.check_cipher_params(CmdId::Encrypt, &key, &runtime, &[0; 190], &[0; 256])
        .unwrap();
    assert_eq!(
        v.check_cipher_params(CmdId::Encrypt, &key, &runtime, &[0; 191], &[0; 256]),
        Err(UksError::InvalidArgument)
    );
}

#[test]
fn cipher_params_aes_gcm_end_to_end() {
    let v = validator();
    let key = params(vec![u32p(Tag::KeySize, 256)]);
    let runtime = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::DECRYPT.bits()),
        u32p(Tag::Padding, Padding::None as u32),
        u32p(Tag::BlockMode, BlockMode::Gcm as u32),
        bytesp(Tag::Nonce, vec![0; 12]),
        bytesp(Tag::AssociatedData, vec![1; 4]),
    ]);
    v.check_cipher_params(CmdId::Decrypt, &key, &runtime, &[0; 116], &[0; 100])
        .unwrap();
    assert_eq!(
        v.check_cipher_params(CmdId::Decrypt, &key, &runtime, &[0; 116], &[0; 99]),
        Err(UksError::BufferTooSmall)
    );
    // Direction gate.
    assert_eq!(
        v.check_cipher_params(CmdId::Encrypt, &key, &runtime, &[0; 100], &[0; 116]),
        Err(UksError::InvalidPurpose)
    );
}

#[test]
fn cipher_params_rejects_non_cipher_algorithms() {
    let v = validator();
    let key = params(vec![u32p(Tag::KeySize, 256)]);
    let runtime = params(vec![u32p(Tag::Algorithm, Algorithm::Ecc as u32)]);
    assert_eq!(
        v.check_cipher_params(CmdId::Encrypt, &key, &runtime, &[0; 16], &[0; 16]),
        Err(UksError::InvalidAlgorithm)
    );
}

#[test]
fn sign_verify_params_ecc() {
    let v = validator();
    let key = params(vec![u32p(Tag::KeySize, 256)]);
    let runtime = params(vec![
        u32p(Tag::Algorithm, Algorithm::Ecc as u32),
        u32p(Tag::Purpose, Purpose::SIGN.bits()),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    v.check_sign_verify_params(CmdId::Sign, &key, &runtime, &[0; 72])
        .unwrap();
    assert_eq!(
        v.check_sign_verify_params(CmdId::Sign, &key, &runtime, &[0; 71]),
        Err(UksError::BufferTooSmall)
    );
    assert_eq!(
        v.check_sign_verify_params(CmdId::Verify, &key, &runtime, &[0; 72]),
        Err(UksError::InvalidPurpose)
    );
}

#[test]
fn agree_key_params() {
    let v = validator();
    let private_key = params(vec![u32p(Tag::KeySize, 256)]);
    let runtime = params(vec![u32p(Tag::Algorithm, Algorithm::Ecdh as u32)]);
    v.check_agree_key_params(&runtime, &private_key, 32).unwrap();
    assert_eq!(
        v.check_agree_key_params(&runtime, &private_key, 31),
        Err(UksError::BufferTooSmall)
    );

    let runtime = params(vec![u32p(Tag::Algorithm, Algorithm::Ecc as u32)]);
    assert_eq!(
        v.check_agree_key_params(&runtime, &private_key, 32),
        Err(UksError::InvalidAlgorithm)
    );
}

#[test]
fn derive_key_params() {
    let v = validator();
    let hkdf = params(vec![
        u32p(Tag::Algorithm, Algorithm::Hkdf as u32),
        u32p(Tag::Purpose, Purpose::DERIVE.bits()),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    v.check_derive_key_params(&hkdf).unwrap();

    let wrong_purpose = params(vec![
        u32p(Tag::Algorithm, Algorithm::Hkdf as u32),
        u32p(Tag::Purpose, Purpose::MAC.bits()),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    assert_eq!(
        v.check_derive_key_params(&wrong_purpose),
        Err(UksError::InvalidPurpose)
    );

    let pbkdf2 = |iteration: u32, salt_len: usize| {
        params(vec![
            u32p(Tag::Algorithm, Algorithm::Pbkdf2 as u32),
            u32p(Tag::Purpose, Purpose::DERIVE.bits()),
            u32p(Tag::Digest, Digest::Sha256 as u32),
            u32p(Tag::Iteration, iteration),
            bytesp(Tag::Salt, vec![0; salt_len]),
        ])
    };
    v.check_derive_key_params(&pbkdf2(1000, 16)).unwrap();
    assert_eq!(
        v.check_derive_key_params(&pbkdf2(999, 16)),
        Err(UksError::InvalidIteration)
    );
    assert_eq!(
        v.check_derive_key_params(&pbkdf2(1000, 15)),
        Err(UksError::InvalidSalt)
    );

    let no_salt = params(vec![
        u32p(Tag::Algorithm, Algorithm::Pbkdf2 as u32),
        u32p(Tag::Purpose, Purpose::DERIVE.bits()),
        u32p(Tag::Digest, Digest::Sha256 as u32),
        u32p(Tag::Iteration, 1000),
    ]);
    assert_eq!(
        v.check_derive_key_params(&no_salt),
        Err(UksError::CheckGetSaltFail)
    );
}

#[test]
fn mac_params() {
    let v = validator();
    let set = params(vec![
        u32p(Tag::Purpose, Purpose::MAC.bits()),
        u32p(Tag::Digest, Digest::Sha256 as u32),
    ]);
    v.check_mac_params(&set, 32).unwrap();
    assert_eq!(v.check_mac_params(&set, 31), Err(UksError::BufferTooSmall));

    let bad_digest = params(vec![
        u32p(Tag::Purpose, Purpose::MAC.bits()),
        u32p(Tag::Digest, Digest::None as u32),
    ]);
    assert_eq!(v.check_mac_params(&bad_digest, 32), Err(UksError::InvalidDigest));
}

#[test]
fn capability_set_disables_operations_at_runtime() {
    let v = ParamValidator::new(CapabilitySet::all().without(Algorithm::Aes));
    let key = params(vec![u32p(Tag::KeySize, 256)]);
    let runtime = params(vec![
        u32p(Tag::Algorithm, Algorithm::Aes as u32),
        u32p(Tag::Purpose, Purpose::ENCRYPT.bits()),
        u32p(Tag::BlockMode, BlockMode::Cbc as u32),
    ]);
    assert_eq!(
        v.check_cipher_params(CmdId::Encrypt, &key, &runtime, &[0; 16], &[0; 16]),
        Err(UksError::NotSupported)
    );
}
