// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Derive family.
//!
//! Derivation runs eagerly at Update: the raw key is fetched, the derivation
//! executes once, and the result is parked in the session cache for Finish
//! to persist or copy out. A second Update is rejected, so the API shape is
//! streaming but the semantics are single-call.

use uks_check::Tag;
use uks_check::UksError;
use uks_check::UksResult;
use zeroize::Zeroizing;

use crate::AuthId;
use crate::CryptoEngine;
use crate::KeyBlobStore;
use crate::KeyFlag;
use crate::KeySpec;
use crate::SessionCtx;
use crate::KeyNode;
use crate::StorageFlag;
use crate::ThreeStageAuth;

use super::SessionEngine;

/// Upper bound on a derived or agreed result, 5 MiB.
const MAX_OUT_BLOB_SIZE: u32 = 5 * 1024 * 1024;

impl<E, A, K> SessionEngine<E, A, K>
where
    E: CryptoEngine,
    A: ThreeStageAuth,
    K: KeyBlobStore,
{
    /// Initializes a derive session. Authorization happens at Update.
    pub fn derive_init(&self, node: &mut KeyNode) -> UksResult<()> {
        let _ = node;
        tracing::debug!("derive init");
        Ok(())
    }

    /// Computes the derived key and parks it for Finish.
    pub fn derive_update(&self, node: &mut KeyNode) -> UksResult<()> {
        if !node.ctx_is_empty() {
            tracing::error!("derive update called more than once");
            return Err(UksError::Failure);
        }
        self.authorize(node, |_| Some(AuthId::Derive))?;

        let derive_size = node
            .runtime_params()
            .get_u32(Tag::DeriveKeySize)
            .map_err(|_| UksError::InvalidArgument)?;
        if derive_size == 0 || derive_size > MAX_OUT_BLOB_SIZE {
            tracing::error!(derive_size, "derive size invalid");
            return Err(UksError::InvalidArgument);
        }

        let raw_key = self.keys().raw_key(node.key_blob_params())?;
        let spec = KeySpec::from_params(node.runtime_params())?;

        tracing::info!(derive_size, "derive update");
        let mut derived = Zeroizing::new(vec![0u8; derive_size as usize]);
        self.engine().derive_key(&raw_key, &spec, &mut derived)?;
        node.set_ctx(SessionCtx::Cached(derived));
        Ok(())
    }

    /// Persists or copies out the derived key and ends the session.
    pub fn derive_finish(&self, node: &mut KeyNode, out: &mut [u8]) -> UksResult<usize> {
        self.restore_result(node, KeyFlag::DeriveKey, out)
    }

    /// Releases the parked result without producing output.
    pub fn derive_abort(&self, node: &mut KeyNode) -> UksResult<()> {
        self.abort_result(node)
    }

    /// Shared Finish path for derive and agree sessions.
    pub(crate) fn restore_result(
        &self,
        node: &mut KeyNode,
        key_flag: KeyFlag,
        out: &mut [u8],
    ) -> UksResult<usize> {
        if out.is_empty() {
            return Err(UksError::InvalidArgument);
        }
        let result = match node.take_ctx() {
            SessionCtx::Cached(result) => result,
            SessionCtx::Empty => {
                tracing::error!("finish without parked result");
                return Err(UksError::NullPointer);
            }
            _ => return Err(UksError::BadState),
        };

        let storage = node
            .runtime_params()
            .get_u32(Tag::KeyStorageFlag)
            .ok()
            .filter(|flag| *flag == StorageFlag::Persistent as u32);

        if storage.is_some() {
            let blob = self
                .keys()
                .build_key_blob(key_flag, node.runtime_params(), &result)?;
            if out.len() < blob.len() {
                tracing::error!(out_size = out.len(), "key blob output too small");
                return Err(UksError::BufferTooSmall);
            }
            out[..blob.len()].copy_from_slice(&blob);
            Ok(blob.len())
        } else {
            if out.len() < result.len() {
                tracing::error!(out_size = out.len(), "result output too small");
                return Err(UksError::BufferTooSmall);
            }
            out[..result.len()].copy_from_slice(&result);
            Ok(result.len())
        }
    }

    /// Shared Abort path for derive and agree sessions.
    pub(crate) fn abort_result(&self, node: &mut KeyNode) -> UksResult<()> {
        match node.take_ctx() {
            SessionCtx::Cached(_) => Ok(()),
            SessionCtx::Empty => {
                tracing::error!("abort without parked result");
                Err(UksError::NullPointer)
            }
            _ => Err(UksError::BadState),
        }
    }
}
