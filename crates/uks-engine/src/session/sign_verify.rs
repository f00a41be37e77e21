// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Sign/verify family.
//!
//! Algorithms that can hash incrementally stream through a hash context and
//! sign the digest at Finish. ED25519 signs the raw message, and a session
//! with `Digest::None` receives a caller-prehashed value, so both accumulate
//! instead.

use uks_check::CmdId;
use uks_check::Purpose;
use uks_check::Tag;
use uks_check::UksError;
use uks_check::UksResult;

use crate::spec::session_algorithm;
use crate::spec::session_digest;
use crate::CryptoEngine;
use crate::KeyBlobStore;
use crate::SessionCtx;
use crate::KeyNode;
use crate::ThreeStageAuth;
use crate::UsageSpec;

use super::sign_verify_auth_id;
use super::SessionEngine;

impl<E, A, K> SessionEngine<E, A, K>
where
    E: CryptoEngine,
    A: ThreeStageAuth,
    K: KeyBlobStore,
{
    /// Initializes a sign or verify session.
    pub fn sign_verify_init(&self, node: &mut KeyNode) -> UksResult<()> {
        self.authorize(node, sign_verify_auth_id)?;

        let alg = session_algorithm(node.runtime_params())?;
        let digest = session_digest(node.runtime_params());
        tracing::info!(?alg, ?digest, "sign/verify init");
        if self.validator().check_need_cache(alg, digest) {
            node.set_cache();
            Ok(())
        } else {
            let ctx = self.engine().hash_init(digest)?;
            node.set_ctx(SessionCtx::Hash(ctx));
            Ok(())
        }
    }

    /// Absorbs one chunk of the message.
    pub fn sign_verify_update(&self, node: &mut KeyNode, data: &[u8]) -> UksResult<()> {
        let alg = session_algorithm(node.runtime_params())?;
        let digest = session_digest(node.runtime_params());
        if self.validator().check_need_cache(alg, digest) {
            node.append_cache(data)
        } else {
            match node.take_ctx() {
                SessionCtx::Hash(mut ctx) => {
                    ctx.update(data)?;
                    node.set_ctx(SessionCtx::Hash(ctx));
                    Ok(())
                }
                SessionCtx::Empty => Err(UksError::BadState),
                other => {
                    node.set_ctx(other);
                    Err(UksError::BadState)
                }
            }
        }
    }

    /// Completes the session.
    ///
    /// When signing, `data` is the final message chunk and the signature is
    /// written into `out` (returning its length). When verifying, `data` is
    /// the caller's signature and `out` is unused; the accumulated message
    /// alone feeds the verification.
    pub fn sign_verify_finish(&self, node: &mut KeyNode, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        let purpose = self.sign_verify_purpose(node)?;
        // When verifying, `data` is the signature, not message material.
        let message_tail: &[u8] = if purpose == Purpose::SIGN { data } else { &[] };

        let alg = session_algorithm(node.runtime_params())?;
        let digest = session_digest(node.runtime_params());
        let message = if self.validator().check_need_cache(alg, digest) {
            node.drain_cache(message_tail)?
        } else {
            match node.take_ctx() {
                SessionCtx::Hash(ctx) => ctx.finish(message_tail)?.into(),
                SessionCtx::Empty => return Err(UksError::BadState),
                _ => return Err(UksError::BadState),
            }
        };

        if purpose == Purpose::SIGN {
            self.check_session_signature(node, purpose, out)?;
        } else {
            self.check_session_signature(node, purpose, data)?;
        }

        let spec = UsageSpec::from_params(node.runtime_params())?;
        let raw_key = self.keys().raw_key(node.key_blob_params())?;
        tracing::info!(?purpose, "sign/verify finish");
        if purpose == Purpose::SIGN {
            self.engine().sign(&raw_key, &spec, &message, out)
        } else {
            self.engine().verify(&raw_key, &spec, &message, data)?;
            Ok(0)
        }
    }

    /// Releases whatever the session holds without producing output.
    pub fn sign_verify_abort(&self, node: &mut KeyNode) -> UksResult<()> {
        // Cache and hash context free the same way here.
        let _ = node.take_ctx();
        Ok(())
    }

    fn check_session_signature(
        &self,
        node: &KeyNode,
        purpose: Purpose,
        signature: &[u8],
    ) -> UksResult<()> {
        if signature.is_empty() {
            return Err(UksError::InvalidArgument);
        }
        let key_alg = session_algorithm(node.key_blob_params())?;
        let key_size = node
            .key_blob_params()
            .get_u32(Tag::KeySize)
            .map_err(|_| UksError::CheckGetKeySizeFail)?;
        let cmd = if purpose == Purpose::SIGN {
            CmdId::Sign
        } else {
            CmdId::Verify
        };
        self.validator().check_signature(cmd, key_alg, key_size, signature)
    }

    fn sign_verify_purpose(&self, node: &KeyNode) -> UksResult<Purpose> {
        let raw = node
            .runtime_params()
            .get_u32(Tag::Purpose)
            .map_err(|_| UksError::CheckGetPurposeFail)?;
        Purpose::try_from(raw)
    }
}
