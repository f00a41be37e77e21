// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;

fn agree_node(alg: Algorithm) -> KeyNode {
    node_with(
        vec![Param::u32(Tag::KeySize, 256)],
        vec![
            Param::u32(Tag::Algorithm, alg as u32),
            Param::u32(Tag::Purpose, Purpose::AGREE.bits()),
        ],
    )
}

#[test]
fn agree_computes_once_and_parks_the_secret() {
    let engine = engine();
    let mut node = agree_node(Algorithm::Ecdh);

    engine.agree_init(&mut node).unwrap();
    assert!(node.ctx_is_empty());

    engine.agree_update(&mut node, &[0x77; 65]).unwrap();
    assert!(!node.ctx_is_empty());
    assert_eq!(engine.engine().calls(), vec!["agree_key"]);

    let mut out = vec![0u8; 32];
    let written = engine.agree_finish(&mut node, &mut out).unwrap();
    assert_eq!(written, 32);
    assert_eq!(out, vec![TEST_AGREE_BYTE; 32]);
    assert!(node.ctx_is_empty());
}

#[test]
fn agree_update_is_single_call_only() {
    let engine = engine();
    let mut node = agree_node(Algorithm::X25519);

    engine.agree_init(&mut node).unwrap();
    engine.agree_update(&mut node, &[0x77; 32]).unwrap();
    assert_eq!(
        engine.agree_update(&mut node, &[0x77; 32]),
        Err(UksError::Failure)
    );
}

#[test]
fn agree_init_gates_on_algorithm() {
    let engine = engine();
    let mut node = agree_node(Algorithm::Rsa);
    assert_eq!(engine.agree_init(&mut node), Err(UksError::InvalidAlgorithm));

    let engine = engine_denying(AuthId::Agree);
    let mut node = agree_node(Algorithm::Dh);
    assert_eq!(engine.agree_init(&mut node), Err(UksError::KeyAuthFailed));
    assert!(node.ctx_is_empty());
}

#[test]
fn agree_persistent_storage_builds_a_key_blob() {
    let engine = engine();
    let mut node = node_with(
        vec![Param::u32(Tag::KeySize, 256)],
        vec![
            Param::u32(Tag::Algorithm, Algorithm::Ecdh as u32),
            Param::u32(Tag::Purpose, Purpose::AGREE.bits()),
            Param::u32(Tag::KeyStorageFlag, 1),
        ],
    );

    engine.agree_update(&mut node, &[0x77; 65]).unwrap();
    let mut out = vec![0u8; 64];
    let written = engine.agree_finish(&mut node, &mut out).unwrap();
    assert_eq!(written, 35);
    assert_eq!(&out[..3], &[b'K', b'B', 3]);
}

#[test]
fn agree_abort_requires_a_parked_secret() {
    let engine = engine();
    let mut node = agree_node(Algorithm::Ecdh);

    assert_eq!(engine.agree_abort(&mut node), Err(UksError::NullPointer));
    engine.agree_update(&mut node, &[0x77; 65]).unwrap();
    engine.agree_abort(&mut node).unwrap();
    assert!(node.ctx_is_empty());
}
