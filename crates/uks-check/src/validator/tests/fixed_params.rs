// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;

#[test]
fn unknown_check_type_row_is_not_supported() {
    let v = validator();
    assert_eq!(
        v.get_expect_params(Algorithm::Rsa, CheckType::GenMacKey),
        Err(UksError::NotSupported)
    );
}

#[test]
fn capability_gating_is_uniform_not_supported() {
    let v = ParamValidator::new(CapabilitySet::all().without(Algorithm::Aes));
    assert_eq!(
        v.get_expect_params(Algorithm::Aes, CheckType::GenKey),
        Err(UksError::NotSupported)
    );
    let set = params(vec![u32p(Tag::KeySize, 256), u32p(Tag::Purpose, 128)]);
    assert_eq!(
        v.get_input_params(Algorithm::Aes, CheckType::GenMacKey, &set),
        Err(UksError::NotSupported)
    );
}

#[test]
fn mandatory_fields_fail_with_specific_codes() {
    let v = validator();
    let missing_key_size = params(vec![u32p(Tag::Purpose, 3)]);
    assert_eq!(
        v.get_input_params(Algorithm::Aes, CheckType::GenKey, &missing_key_size),
        Err(UksError::CheckGetKeySizeFail)
    );

    let missing_purpose = params(vec![u32p(Tag::KeySize, 256)]);
    assert_eq!(
        v.get_input_params(Algorithm::Aes, CheckType::GenKey, &missing_purpose),
        Err(UksError::CheckGetPurposeFail)
    );
}

#[test]
fn optional_fields_record_absence() {
    let v = validator();
    let set = params(vec![u32p(Tag::KeySize, 256), u32p(Tag::Purpose, 3)]);
    let input = v
        .get_input_params(Algorithm::Aes, CheckType::GenKey, &set)
        .unwrap();
    assert!(input.padding.is_absent());
    assert!(input.mode.is_absent());
    // Digest is not part of the AES gen-key shape at all.
    assert_eq!(input.digest, FieldValue::Unchecked);
    assert_eq!(input.key_len, FieldValue::Present(256));
}

#[test]
fn whitelist_membership_per_field() {
    let v = validator();
    let base = |key_size: u32, padding: u32, mode: u32| {
        params(vec![
            u32p(Tag::KeySize, key_size),
            u32p(Tag::Purpose, 3),
            u32p(Tag::Padding, padding),
            u32p(Tag::BlockMode, mode),
        ])
    };

    let good = v
        .get_input_params(Algorithm::Aes, CheckType::GenKey, &base(256, 0, 2))
        .unwrap();
    v.check_fixed_params(Algorithm::Aes, CheckType::GenKey, &good)
        .unwrap();

    let bad_key = v
        .get_input_params(Algorithm::Aes, CheckType::GenKey, &base(257, 0, 2))
        .unwrap();
    assert_eq!(
        v.check_fixed_params(Algorithm::Aes, CheckType::GenKey, &bad_key),
        Err(UksError::InvalidKeySize)
    );

    // OAEP is a valid padding value but not in the AES whitelist.
    let bad_padding = v
        .get_input_params(Algorithm::Aes, CheckType::GenKey, &base(256, 1, 2))
        .unwrap();
    assert_eq!(
        v.check_fixed_params(Algorithm::Aes, CheckType::GenKey, &bad_padding),
        Err(UksError::InvalidPadding)
    );

    // OFB parses as a block mode but no algorithm whitelists it.
    let bad_mode = v
        .get_input_params(Algorithm::Aes, CheckType::GenKey, &base(256, 0, 4))
        .unwrap();
    assert_eq!(
        v.check_fixed_params(Algorithm::Aes, CheckType::GenKey, &bad_mode),
        Err(UksError::InvalidMode)
    );
}

#[test]
fn sm4_purpose_whitelist() {
    let v = validator();
    let mut input = ParamsValues {
        key_len: FieldValue::Present(128),
        padding: FieldValue::Present(Padding::None),
        purpose: FieldValue::Present(Purpose::ENCRYPT | Purpose::DECRYPT),
        digest: FieldValue::Unchecked,
        mode: FieldValue::Present(BlockMode::Cbc),
    };
    v.check_fixed_params(Algorithm::Sm4, CheckType::GenKey, &input)
        .unwrap();

    input.purpose = FieldValue::Present(Purpose::SIGN);
    assert_eq!(
        v.check_fixed_params(Algorithm::Sm4, CheckType::GenKey, &input),
        Err(UksError::InvalidPurpose)
    );
}

#[test]
fn ecc_digest_whitelist() {
    let v = validator();
    let mut input = ParamsValues {
        digest: FieldValue::Present(Digest::Sha256),
        ..ParamsValues::default()
    };
    v.check_fixed_params(Algorithm::Ecc, CheckType::UseKey, &input)
        .unwrap();

    input.digest = FieldValue::Present(Digest::Sm3);
    assert_eq!(
        v.check_fixed_params(Algorithm::Ecc, CheckType::UseKey, &input),
        Err(UksError::InvalidDigest)
    );
}

#[test]
fn unrequired_field_is_never_examined() {
    let v = validator();
    // RSA has no mode rule; a supplied mode must not be rejected.
    let input = ParamsValues {
        key_len: FieldValue::Present(2048),
        padding: FieldValue::Present(Padding::Oaep),
        purpose: FieldValue::Present(Purpose::ENCRYPT),
        digest: FieldValue::Present(Digest::Sha256),
        mode: FieldValue::Present(BlockMode::Gcm),
    };
    v.check_fixed_params(Algorithm::Rsa, CheckType::UseKey, &input)
        .unwrap();
}

#[test]
fn absent_optional_field_is_compliant() {
    let v = validator();
    let input = ParamsValues {
        key_len: FieldValue::Present(2048),
        padding: FieldValue::Absent,
        purpose: FieldValue::Present(Purpose::ENCRYPT),
        digest: FieldValue::Absent,
        mode: FieldValue::Unchecked,
    };
    v.check_fixed_params(Algorithm::Rsa, CheckType::UseKey, &input)
        .unwrap();
}

#[test]
fn optional_param_check_reports_get_fail_codes() {
    let v = validator();
    let digest = u32p(Tag::Digest, Digest::Sha1 as u32);

    // AES MAC keys only allow SHA-256.
    assert_eq!(
        v.check_optional_param(Tag::Digest, Algorithm::Aes, Purpose::MAC, false, &digest),
        Err(UksError::CheckGetDigestFail)
    );
    let digest = u32p(Tag::Digest, Digest::Sha256 as u32);
    v.check_optional_param(Tag::Digest, Algorithm::Aes, Purpose::MAC, false, &digest)
        .unwrap();

    // Absent but required by the table.
    assert_eq!(
        v.check_optional_param(Tag::Digest, Algorithm::Aes, Purpose::MAC, true, &digest),
        Err(UksError::CheckGetDigestFail)
    );

    // MAC generation is limited to AES, HMAC and SM3.
    assert_eq!(
        v.check_optional_param(Tag::Digest, Algorithm::Rsa, Purpose::MAC, false, &digest),
        Err(UksError::InvalidPurpose)
    );
}

#[test]
fn key_size_from_key_params() {
    let v = validator();
    let key = params(vec![u32p(Tag::KeySize, 2048)]);
    assert_eq!(v.get_key_size(Algorithm::Rsa, &key).unwrap(), 2048);

    let odd = params(vec![u32p(Tag::KeySize, 1000)]);
    assert_eq!(
        v.get_key_size(Algorithm::Rsa, &odd),
        Err(UksError::InvalidKeyFile)
    );

    let empty = params(vec![]);
    assert_eq!(
        v.get_key_size(Algorithm::Rsa, &empty),
        Err(UksError::InvalidKeyFile)
    );

    // No stored key-size rule for AES keys through this path.
    assert_eq!(
        v.get_key_size(Algorithm::Aes, &key),
        Err(UksError::InvalidAlgorithm)
    );
}

#[test]
fn need_cache_predicate() {
    let v = validator();
    assert!(v.check_need_cache(Algorithm::Ed25519, Digest::Sha256));
    assert!(v.check_need_cache(Algorithm::Rsa, Digest::None));
    assert!(!v.check_need_cache(Algorithm::Rsa, Digest::Sha256));
    assert!(!v.check_need_cache(Algorithm::Ecc, Digest::Sha512));
}
