// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;

fn aes_gcm_node(purpose: Purpose, with_tag: bool) -> KeyNode {
    let mut runtime = vec![
        Param::u32(Tag::Algorithm, Algorithm::Aes as u32),
        Param::u32(Tag::Purpose, purpose.bits()),
        Param::u32(Tag::KeySize, 256),
        Param::u32(Tag::BlockMode, BlockMode::Gcm as u32),
        Param::bytes(Tag::Nonce, vec![0; 12]),
        Param::bytes(Tag::AssociatedData, vec![1; 4]),
    ];
    if with_tag {
        runtime.push(Param::bytes(Tag::AeTag, vec![TEST_TAG_BYTE; 16]));
    }
    node_with(vec![Param::u32(Tag::KeySize, 256)], runtime)
}

fn rsa_node(purpose: Purpose) -> KeyNode {
    node_with(
        vec![Param::u32(Tag::KeySize, 2048)],
        vec![
            Param::u32(Tag::Algorithm, Algorithm::Rsa as u32),
            Param::u32(Tag::Purpose, purpose.bits()),
            Param::u32(Tag::KeySize, 2048),
            Param::u32(Tag::Padding, Padding::Oaep as u32),
            Param::u32(Tag::Digest, Digest::Sha256 as u32),
        ],
    )
}

#[test]
fn aes_gcm_streaming_decrypt() {
    let engine = engine();
    let mut node = aes_gcm_node(Purpose::DECRYPT, true);

    engine.cipher_init(&mut node).unwrap();
    assert!(!node.ctx_is_empty());

    // Updates forward bytes one-to-one through the streaming context.
    let chunk = vec![0x10u8; 16];
    let mut out = vec![0u8; 16];
    assert_eq!(engine.cipher_update(&mut node, &chunk, &mut out).unwrap(), 16);
    assert_eq!(out, vec![0x10 ^ XOR_MASK; 16]);
    assert_eq!(engine.cipher_update(&mut node, &chunk, &mut out).unwrap(), 16);

    // Finish consumes the remaining ciphertext; the tag came in as a param.
    let mut final_out = vec![0u8; 20];
    let written = engine
        .decrypt_finish(&mut node, &[0x22; 20], &mut final_out)
        .unwrap();
    assert_eq!(written, 20);
    assert!(node.ctx_is_empty());
    assert_eq!(engine.engine().calls(), vec!["decrypt_init"]);
}

#[test]
fn aes_gcm_encrypt_finish_appends_tag() {
    let engine = engine();
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);

    engine.cipher_init(&mut node).unwrap();
    let mut out = vec![0u8; 26];
    let written = engine.encrypt_finish(&mut node, &[0x01; 10], &mut out).unwrap();
    assert_eq!(written, 26);
    assert_eq!(&out[10..], &[TEST_TAG_BYTE; 16]);
    assert!(node.ctx_is_empty());
}

#[test]
fn aes_encrypt_finish_output_too_small() {
    let engine = engine();
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);

    engine.cipher_init(&mut node).unwrap();
    let mut out = vec![0u8; 25];
    assert_eq!(
        engine.encrypt_finish(&mut node, &[0x01; 10], &mut out),
        Err(UksError::BufferTooSmall)
    );
    // The size check runs before the context is consumed; Abort still frees.
    assert!(!node.ctx_is_empty());
    engine.cipher_abort(&mut node).unwrap();
    assert!(node.ctx_is_empty());
}

#[test]
fn cipher_update_output_too_small_keeps_context() {
    let engine = engine();
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);

    engine.cipher_init(&mut node).unwrap();
    let mut out = vec![0u8; 8];
    assert_eq!(
        engine.cipher_update(&mut node, &[0; 16], &mut out),
        Err(UksError::BufferTooSmall)
    );
    assert!(!node.ctx_is_empty());
}

#[test]
fn missing_ae_tag_fails_decrypt_finish() {
    let engine = engine();
    let mut node = aes_gcm_node(Purpose::DECRYPT, false);

    engine.cipher_init(&mut node).unwrap();
    let mut out = vec![0u8; 20];
    assert_eq!(
        engine.decrypt_finish(&mut node, &[0x22; 20], &mut out),
        Err(UksError::CheckGetAeTagFail)
    );
}

#[test]
fn rsa_session_accumulates_and_runs_once() {
    let engine = engine();
    let mut node = rsa_node(Purpose::ENCRYPT);

    engine.cipher_init(&mut node).unwrap();
    assert!(!node.ctx_is_empty());

    // RSA updates buffer without producing output.
    let mut out = vec![0u8; 0];
    assert_eq!(engine.cipher_update(&mut node, &[0x01; 100], &mut out).unwrap(), 0);
    assert_eq!(engine.cipher_update(&mut node, &[0x02; 90], &mut out).unwrap(), 0);

    let mut final_out = vec![0u8; 256];
    let written = engine.encrypt_finish(&mut node, &[], &mut final_out).unwrap();
    assert_eq!(written, 256);
    assert!(node.ctx_is_empty());
    // The primitive ran exactly once, at finish.
    assert_eq!(engine.engine().calls(), vec!["encrypt"]);
}

#[test]
fn rsa_finish_output_too_small_clears_session() {
    let engine = engine();
    let mut node = rsa_node(Purpose::ENCRYPT);

    engine.cipher_init(&mut node).unwrap();
    engine
        .cipher_update(&mut node, &[0x01; 100], &mut [])
        .unwrap();

    let mut out = vec![0u8; 255];
    assert_eq!(
        engine.encrypt_finish(&mut node, &[], &mut out),
        Err(UksError::BufferTooSmall)
    );
    // The cache was drained before the size check; a later Abort is a no-op.
    assert!(node.ctx_is_empty());
    engine.cipher_abort(&mut node).unwrap();
}

#[test]
fn rsa_decrypt_finish_reports_plaintext_len() {
    let engine = engine();
    let mut node = rsa_node(Purpose::DECRYPT);

    engine.cipher_init(&mut node).unwrap();
    engine
        .cipher_update(&mut node, &[0x01; 100], &mut [])
        .unwrap();
    let mut out = vec![0u8; 190];
    let written = engine.decrypt_finish(&mut node, &[], &mut out).unwrap();
    assert_eq!(written, 100);
    assert_eq!(engine.engine().calls(), vec!["decrypt"]);
}

#[test]
fn init_failure_holds_no_resources() {
    let engine = engine_denying(AuthId::SymCipher);
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);
    assert_eq!(engine.cipher_init(&mut node), Err(UksError::KeyAuthFailed));
    assert!(node.ctx_is_empty());
    // The gate short-circuits before any engine call.
    assert!(engine.engine().calls().is_empty());

    let engine = engine_failing_cipher_init();
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);
    assert_eq!(engine.cipher_init(&mut node), Err(UksError::CryptoEngine));
    assert!(node.ctx_is_empty());
}

#[test]
fn rsa_uses_the_asymmetric_auth_gate() {
    let engine = engine_denying(AuthId::AsymCipher);
    let mut node = rsa_node(Purpose::ENCRYPT);
    assert_eq!(engine.cipher_init(&mut node), Err(UksError::KeyAuthFailed));

    let engine = engine_denying(AuthId::AsymCipher);
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);
    engine.cipher_init(&mut node).unwrap();
}

#[test]
fn update_before_init_is_an_error() {
    let engine = engine();
    let mut node = aes_gcm_node(Purpose::ENCRYPT, false);
    let mut out = vec![0u8; 16];
    assert_eq!(
        engine.cipher_update(&mut node, &[0; 16], &mut out),
        Err(UksError::NullPointer)
    );
}

#[test]
fn non_cipher_algorithm_is_rejected() {
    let engine = engine();
    let mut node = node_with(
        vec![Param::u32(Tag::KeySize, 256)],
        vec![
            Param::u32(Tag::Algorithm, Algorithm::Ecc as u32),
            Param::u32(Tag::Purpose, Purpose::ENCRYPT.bits()),
        ],
    );
    assert_eq!(engine.cipher_init(&mut node), Err(UksError::InvalidAlgorithm));
}
