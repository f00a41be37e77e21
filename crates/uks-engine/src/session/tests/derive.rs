// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;

fn derive_node(extra: Vec<Param>) -> KeyNode {
    let mut runtime = vec![
        Param::u32(Tag::Algorithm, Algorithm::Hkdf as u32),
        Param::u32(Tag::Purpose, Purpose::DERIVE.bits()),
        Param::u32(Tag::Digest, Digest::Sha256 as u32),
        Param::u32(Tag::DeriveKeySize, 32),
    ];
    runtime.extend(extra);
    node_with(vec![Param::u32(Tag::KeySize, 256)], runtime)
}

#[test]
fn derive_runs_eagerly_at_update() {
    let engine = engine();
    let mut node = derive_node(vec![]);

    engine.derive_init(&mut node).unwrap();
    assert!(node.ctx_is_empty());

    engine.derive_update(&mut node).unwrap();
    assert!(!node.ctx_is_empty());
    assert_eq!(engine.engine().calls(), vec!["derive_key"]);

    let mut out = vec![0u8; 32];
    let written = engine.derive_finish(&mut node, &mut out).unwrap();
    assert_eq!(written, 32);
    assert_eq!(out, vec![TEST_DERIVE_BYTE; 32]);
    assert!(node.ctx_is_empty());
}

#[test]
fn derive_update_is_single_call_only() {
    let engine = engine();
    let mut node = derive_node(vec![]);

    engine.derive_update(&mut node).unwrap();
    assert_eq!(engine.derive_update(&mut node), Err(UksError::Failure));
    // The parked result survives the rejected re-entry.
    let mut out = vec![0u8; 32];
    engine.derive_finish(&mut node, &mut out).unwrap();
}

#[test]
fn derive_size_bounds() {
    let engine = engine();
    let mut node = derive_node(vec![]);
    engine.derive_init(&mut node).unwrap();

    let mut bad = node_with(
        vec![Param::u32(Tag::KeySize, 256)],
        vec![
            Param::u32(Tag::Algorithm, Algorithm::Hkdf as u32),
            Param::u32(Tag::Purpose, Purpose::DERIVE.bits()),
            Param::u32(Tag::DeriveKeySize, 0),
        ],
    );
    assert_eq!(engine.derive_update(&mut bad), Err(UksError::InvalidArgument));
    assert!(bad.ctx_is_empty());

    let mut missing = node_with(
        vec![Param::u32(Tag::KeySize, 256)],
        vec![
            Param::u32(Tag::Algorithm, Algorithm::Hkdf as u32),
            Param::u32(Tag::Purpose, Purpose::DERIVE.bits()),
        ],
    );
    assert_eq!(
        engine.derive_update(&mut missing),
        Err(UksError::InvalidArgument)
    );
}

#[test]
fn derive_auth_runs_at_update() {
    let engine = engine_denying(AuthId::Derive);
    let mut node = derive_node(vec![]);

    engine.derive_init(&mut node).unwrap();
    assert_eq!(engine.derive_update(&mut node), Err(UksError::KeyAuthFailed));
    assert!(node.ctx_is_empty());
    assert!(engine.engine().calls().is_empty());
}

#[test]
fn persistent_storage_builds_a_key_blob() {
    let engine = engine();
    let mut node = derive_node(vec![Param::u32(Tag::KeyStorageFlag, 1)]);

    engine.derive_update(&mut node).unwrap();
    let mut out = vec![0u8; 64];
    let written = engine.derive_finish(&mut node, &mut out).unwrap();
    assert_eq!(written, 35);
    assert_eq!(&out[..3], &[b'K', b'B', 4]);
    assert_eq!(&out[3..35], &[TEST_DERIVE_BYTE; 32]);
}

#[test]
fn temp_storage_output_must_fit() {
    let engine = engine();
    let mut node = derive_node(vec![]);

    engine.derive_update(&mut node).unwrap();
    let mut out = vec![0u8; 31];
    assert_eq!(
        engine.derive_finish(&mut node, &mut out),
        Err(UksError::BufferTooSmall)
    );
}

#[test]
fn finish_and_abort_require_a_parked_result() {
    let engine = engine();
    let mut node = derive_node(vec![]);

    let mut out = vec![0u8; 32];
    assert_eq!(
        engine.derive_finish(&mut node, &mut out),
        Err(UksError::NullPointer)
    );
    assert_eq!(engine.derive_abort(&mut node), Err(UksError::NullPointer));

    engine.derive_update(&mut node).unwrap();
    engine.derive_abort(&mut node).unwrap();
    assert!(node.ctx_is_empty());
    // Finish after Abort has nothing left to consume.
    assert_eq!(
        engine.derive_finish(&mut node, &mut out),
        Err(UksError::NullPointer)
    );
}
