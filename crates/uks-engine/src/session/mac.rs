// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! MAC family: always streams through an incremental HMAC context.

use uks_check::digest_len;
use uks_check::Tag;
use uks_check::UksError;
use uks_check::UksResult;

use crate::CryptoEngine;
use crate::KeyBlobStore;
use crate::SessionCtx;
use crate::KeyNode;
use crate::ThreeStageAuth;

use super::mac_auth_id;
use super::SessionEngine;

impl<E, A, K> SessionEngine<E, A, K>
where
    E: CryptoEngine,
    A: ThreeStageAuth,
    K: KeyBlobStore,
{
    /// Initializes a MAC session.
    pub fn mac_init(&self, node: &mut KeyNode) -> UksResult<()> {
        self.authorize(node, mac_auth_id)?;

        let digest = node
            .runtime_params()
            .get_u32(Tag::Digest)
            .map_err(|_| UksError::CheckGetDigestFail)
            .and_then(|raw| raw.try_into())?;

        let raw_key = self.keys().raw_key(node.key_blob_params())?;
        tracing::info!(?digest, "hmac init");
        let ctx = self.engine().hmac_init(&raw_key, digest)?;
        node.set_ctx(SessionCtx::Mac(ctx));
        Ok(())
    }

    /// Absorbs one chunk of the message.
    pub fn mac_update(&self, node: &mut KeyNode, data: &[u8]) -> UksResult<()> {
        match node.take_ctx() {
            SessionCtx::Mac(mut ctx) => {
                ctx.update(data)?;
                node.set_ctx(SessionCtx::Mac(ctx));
                Ok(())
            }
            SessionCtx::Empty => {
                tracing::error!("mac update without context");
                Err(UksError::NullPointer)
            }
            other => {
                node.set_ctx(other);
                Err(UksError::BadState)
            }
        }
    }

    /// Absorbs the final chunk and writes the MAC into `out`.
    ///
    /// `out` must hold at least the digest length; the context is consumed
    /// either way. Returns the number of bytes written.
    pub fn mac_finish(&self, node: &mut KeyNode, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        let digest = node
            .runtime_params()
            .get_u32(Tag::Digest)
            .map_err(|_| UksError::CheckGetDigestFail)
            .and_then(|raw| raw.try_into())?;
        let mac_len = digest_len(digest)?;
        if out.is_empty() || out.len() < mac_len as usize {
            tracing::error!(out_size = out.len(), "mac buffer too small");
            return Err(UksError::BufferTooSmall);
        }

        tracing::info!("hmac finish");
        match node.take_ctx() {
            SessionCtx::Mac(ctx) => ctx.finish(data, out),
            SessionCtx::Empty => Err(UksError::NullPointer),
            _ => Err(UksError::BadState),
        }
    }

    /// Releases the MAC context without producing output.
    ///
    /// Unlike the cipher family, aborting a session that holds nothing is an
    /// error here.
    pub fn mac_abort(&self, node: &mut KeyNode) -> UksResult<()> {
        match node.take_ctx() {
            SessionCtx::Mac(_) => Ok(()),
            SessionCtx::Empty => Err(UksError::NullPointer),
            _ => Err(UksError::BadState),
        }
    }
}
