// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod agree;
mod cipher;
mod derive;

use uks_check::Algorithm;
use uks_check::BlockMode;
use uks_check::CapabilitySet;
use uks_check::Digest;
use uks_check::Padding;
use uks_check::Param;
use uks_check::ParamSet;
use uks_check::Purpose;
use uks_check::Tag;
use uks_check::UksError;

use crate::test_support::*;
use crate::AuthId;
use crate::KeyNode;
use crate::SessionEngine;

type TestSessionEngine = SessionEngine<TestEngine, TestAuth, TestKeyStore>;

pub(crate) fn engine() -> TestSessionEngine {
    SessionEngine::new(
        CapabilitySet::all(),
        TestEngine::default(),
        TestAuth::default(),
        TestKeyStore,
    )
}

pub(crate) fn engine_denying(auth_id: AuthId) -> TestSessionEngine {
    SessionEngine::new(
        CapabilitySet::all(),
        TestEngine::default(),
        TestAuth {
            deny: Some(auth_id),
            ..TestAuth::default()
        },
        TestKeyStore,
    )
}

pub(crate) fn engine_failing_cipher_init() -> TestSessionEngine {
    SessionEngine::new(
        CapabilitySet::all(),
        TestEngine {
            fail_cipher_init: true,
            ..TestEngine::default()
        },
        TestAuth::default(),
        TestKeyStore,
    )
}

pub(crate) fn params(entries: Vec<Param>) -> ParamSet {
    ParamSet::from_params(entries).expect("build param set")
}

pub(crate) fn node_with(key_entries: Vec<Param>, runtime_entries: Vec<Param>) -> KeyNode {
    KeyNode::new(params(key_entries), params(runtime_entries))
}
