// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cipher family: streaming AES/SM4, accumulated RSA.
//!
//! RSA has no streaming semantics, so its sessions accumulate the whole
//! message and run one-shot at Finish; AES and SM4 hold a native streaming
//! context from Init onwards.

use uks_check::Algorithm;
use uks_check::Purpose;
use uks_check::Tag;
use uks_check::UksError;
use uks_check::UksResult;

use crate::spec::session_algorithm;
use crate::CryptoEngine;
use crate::KeyBlobStore;
use crate::SessionCtx;
use crate::KeyNode;
use crate::ThreeStageAuth;
use crate::UsageSpec;

use super::cipher_auth_id;
use super::SessionEngine;

impl<E, A, K> SessionEngine<E, A, K>
where
    E: CryptoEngine,
    A: ThreeStageAuth,
    K: KeyBlobStore,
{
    /// Initializes a cipher session.
    ///
    /// On any failure the session holds no resource and stays inactive.
    pub fn cipher_init(&self, node: &mut KeyNode) -> UksResult<()> {
        self.authorize(node, cipher_auth_id)?;

        match session_algorithm(node.runtime_params())? {
            Algorithm::Rsa => {
                node.set_cache();
                Ok(())
            }
            Algorithm::Aes | Algorithm::Sm4 => self.cipher_ctx_init(node),
            _ => Err(UksError::InvalidAlgorithm),
        }
    }

    fn cipher_ctx_init(&self, node: &mut KeyNode) -> UksResult<()> {
        let purpose = self.cipher_purpose(node)?;
        let spec = UsageSpec::from_params(node.runtime_params())?;
        let raw_key = self.keys().raw_key(node.key_blob_params())?;

        tracing::info!("cipher context init");
        let ctx = if purpose == Purpose::ENCRYPT {
            self.engine().encrypt_init(&raw_key, &spec)?
        } else {
            self.engine().decrypt_init(&raw_key, &spec)?
        };
        node.set_ctx(SessionCtx::Cipher(ctx));
        Ok(())
    }

    /// Feeds one chunk through the session.
    ///
    /// RSA accumulates and writes nothing; AES/SM4 stream one-to-one into
    /// `out`, which must be at least as large as `data`. Returns the number
    /// of bytes written.
    pub fn cipher_update(&self, node: &mut KeyNode, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        match session_algorithm(node.runtime_params())? {
            Algorithm::Rsa => {
                node.append_cache(data)?;
                Ok(0)
            }
            Algorithm::Aes | Algorithm::Sm4 => {
                if out.is_empty() {
                    return Err(UksError::InvalidArgument);
                }
                if out.len() < data.len() {
                    tracing::error!(
                        out_size = out.len(),
                        in_size = data.len(),
                        "cipher update output too small"
                    );
                    return Err(UksError::BufferTooSmall);
                }
                match node.take_ctx() {
                    SessionCtx::Cipher(mut ctx) => {
                        let written = ctx.update(data, out)?;
                        node.set_ctx(SessionCtx::Cipher(ctx));
                        Ok(written)
                    }
                    SessionCtx::Empty => Err(UksError::NullPointer),
                    other => {
                        node.set_ctx(other);
                        Err(UksError::BadState)
                    }
                }
            }
            _ => Err(UksError::InvalidAlgorithm),
        }
    }

    /// Completes an encryption session.
    ///
    /// The reported length includes the AE tag for GCM/CCM. The context is
    /// consumed whether or not the primitive call succeeds.
    pub fn encrypt_finish(&self, node: &mut KeyNode, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        if out.is_empty() {
            return Err(UksError::InvalidArgument);
        }
        match session_algorithm(node.runtime_params())? {
            Algorithm::Rsa => self.rsa_cipher_finish(node, data, out),
            Algorithm::Aes | Algorithm::Sm4 => self.block_cipher_finish(node, true, data, out),
            _ => Err(UksError::InvalidAlgorithm),
        }
    }

    /// Completes a decryption session.
    ///
    /// For AE modes the expected tag comes from the runtime parameter set;
    /// the remaining ciphertext in `data` no longer carries it.
    pub fn decrypt_finish(&self, node: &mut KeyNode, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        if out.is_empty() {
            return Err(UksError::InvalidArgument);
        }
        match session_algorithm(node.runtime_params())? {
            Algorithm::Rsa => self.rsa_cipher_finish(node, data, out),
            Algorithm::Aes | Algorithm::Sm4 => self.block_cipher_finish(node, false, data, out),
            _ => Err(UksError::InvalidAlgorithm),
        }
    }

    /// Releases whatever the session holds without producing output.
    pub fn cipher_abort(&self, node: &mut KeyNode) -> UksResult<()> {
        // Dropping the context or cache frees (and zeroizes) it.
        let _ = node.take_ctx();
        Ok(())
    }

    fn block_cipher_finish(
        &self,
        node: &mut KeyNode,
        is_encrypt: bool,
        data: &[u8],
        out: &mut [u8],
    ) -> UksResult<usize> {
        let alg = session_algorithm(node.runtime_params())?;
        let spec = UsageSpec::from_params(node.runtime_params())?;

        let tag = if !is_encrypt && alg == Algorithm::Aes && spec.mode.is_some_and(|m| m.is_ae())
        {
            let tag = node
                .runtime_params()
                .get_bytes(Tag::AeTag)
                .map_err(|_| {
                    tracing::error!("ae tag param missing at decrypt finish");
                    UksError::CheckGetAeTagFail
                })?
                .to_vec();
            Some(tag)
        } else {
            None
        };

        self.validator().check_finish_out_size(
            is_encrypt,
            alg,
            self.runtime_key_len(node).unwrap_or(0),
            spec.padding,
            spec.digest_or_none(),
            spec.mode,
            data,
            out,
        )?;

        tracing::info!(is_encrypt, "cipher finish");
        match node.take_ctx() {
            SessionCtx::Cipher(ctx) => ctx.finish(data, out, tag.as_deref()),
            SessionCtx::Empty => Err(UksError::NullPointer),
            // A cache here means the dispatch algorithm changed mid-session.
            _ => Err(UksError::BadState),
        }
    }

    fn rsa_cipher_finish(&self, node: &mut KeyNode, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        let message = node.drain_cache(data)?;

        let spec = UsageSpec::from_params(node.runtime_params())?;
        let is_encrypt = spec.purpose == Purpose::ENCRYPT;
        self.validator().check_finish_out_size(
            is_encrypt,
            Algorithm::Rsa,
            self.runtime_key_len(node).unwrap_or(0),
            spec.padding,
            spec.digest_or_none(),
            spec.mode,
            &message,
            out,
        )?;

        let raw_key = self.keys().raw_key(node.key_blob_params())?;
        tracing::info!(is_encrypt, "rsa cipher finish");
        if is_encrypt {
            self.engine().encrypt(&raw_key, &spec, &message, out)
        } else {
            self.engine().decrypt(&raw_key, &spec, &message, out)
        }
    }

    fn cipher_purpose(&self, node: &KeyNode) -> UksResult<Purpose> {
        let raw = node
            .runtime_params()
            .get_u32(Tag::Purpose)
            .map_err(|_| UksError::CheckGetPurposeFail)?;
        Purpose::try_from(raw)
    }
}
