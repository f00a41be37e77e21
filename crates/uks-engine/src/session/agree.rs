// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Agree family.
//!
//! Like derivation, agreement is single-call: Update converts the peer
//! public key, computes the shared secret once and parks it for Finish.

use uks_check::UksError;
use uks_check::UksResult;
use zeroize::Zeroizing;

use crate::CryptoEngine;
use crate::KeyBlobStore;
use crate::KeyFlag;
use crate::KeySpec;
use crate::SessionCtx;
use crate::KeyNode;
use crate::ThreeStageAuth;

use super::agree_auth_id;
use super::SessionEngine;

impl<E, A, K> SessionEngine<E, A, K>
where
    E: CryptoEngine,
    A: ThreeStageAuth,
    K: KeyBlobStore,
{
    /// Initializes an agree session.
    pub fn agree_init(&self, node: &mut KeyNode) -> UksResult<()> {
        self.authorize(node, agree_auth_id)
    }

    /// Computes the shared secret from the peer public key and parks it.
    pub fn agree_update(&self, node: &mut KeyNode, peer_public_key: &[u8]) -> UksResult<()> {
        if !node.ctx_is_empty() {
            tracing::error!("agree update called more than once");
            return Err(UksError::Failure);
        }

        let public_key = self
            .keys()
            .public_key_inner_format(node.runtime_params(), peer_public_key)?;
        let raw_key = self.keys().raw_key(node.key_blob_params())?;
        let spec = KeySpec::from_params(node.runtime_params())?;

        tracing::info!("agree update");
        let secret = self.engine().agree_key(&raw_key, &public_key, &spec)?;
        node.set_ctx(SessionCtx::Cached(Zeroizing::new(secret)));
        Ok(())
    }

    /// Persists or copies out the agreed secret and ends the session.
    pub fn agree_finish(&self, node: &mut KeyNode, out: &mut [u8]) -> UksResult<usize> {
        self.restore_result(node, KeyFlag::AgreeKey, out)
    }

    /// Releases the parked secret without producing output.
    pub fn agree_abort(&self, node: &mut KeyNode) -> UksResult<()> {
        self.abort_result(node)
    }
}
