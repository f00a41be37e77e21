// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-flight session state.

use zeroize::Zeroizing;

use uks_check::ParamSet;
use uks_check::UksError;
use uks_check::UksResult;

use crate::CipherCtx;
use crate::HashCtx;
use crate::MacCtx;

/// Accumulation growth limit, 5 MiB.
pub const MAX_BUF_SIZE: usize = 5 * 1024 * 1024;

/// Resource owned by an active session.
///
/// Exactly one variant is live between a successful Init and the Finish or
/// Abort that consumes it. Taking the context empties the slot, so cleanup
/// happens at most once per session; the cached buffer zeroizes on drop.
pub enum SessionCtx {
    /// No resource held.
    Empty,
    /// Accumulated message bytes, or a derived/agreed result awaiting Finish.
    Cached(Zeroizing<Vec<u8>>),
    /// Streaming hash context.
    Hash(Box<dyn HashCtx>),
    /// Streaming MAC context.
    Mac(Box<dyn MacCtx>),
    /// Streaming cipher context.
    Cipher(Box<dyn CipherCtx>),
}

impl SessionCtx {
    /// True when no resource is held.
    pub fn is_empty(&self) -> bool {
        matches!(self, SessionCtx::Empty)
    }
}

impl std::fmt::Debug for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionCtx::Empty => "Empty",
            SessionCtx::Cached(_) => "Cached",
            SessionCtx::Hash(_) => "Hash",
            SessionCtx::Mac(_) => "Mac",
            SessionCtx::Cipher(_) => "Cipher",
        };
        f.write_str(name)
    }
}

/// One in-flight three-stage session.
///
/// Pairs the immutable parameter set of the key in use with the mutable
/// runtime parameter set of the operation, and owns the session's crypto
/// context. All stage calls take `&mut`, which makes the single-threaded
/// per-session discipline a compile-time property.
#[derive(Debug)]
pub struct KeyNode {
    key_blob_params: ParamSet,
    runtime_params: ParamSet,
    ctx: SessionCtx,
}

impl KeyNode {
    /// Creates a session over a stored key and an operation parameter set.
    pub fn new(key_blob_params: ParamSet, runtime_params: ParamSet) -> Self {
        KeyNode {
            key_blob_params,
            runtime_params,
            ctx: SessionCtx::Empty,
        }
    }

    /// Parameter set describing the key being used.
    pub fn key_blob_params(&self) -> &ParamSet {
        &self.key_blob_params
    }

    /// Parameter set carrying the operation parameters.
    pub fn runtime_params(&self) -> &ParamSet {
        &self.runtime_params
    }

    /// True when the session holds no crypto context.
    pub fn ctx_is_empty(&self) -> bool {
        self.ctx.is_empty()
    }

    pub(crate) fn set_ctx(&mut self, ctx: SessionCtx) {
        self.ctx = ctx;
    }

    /// Moves the context out, leaving the slot empty.
    pub(crate) fn take_ctx(&mut self) -> SessionCtx {
        std::mem::replace(&mut self.ctx, SessionCtx::Empty)
    }

    /// Starts an empty accumulation buffer.
    pub(crate) fn set_cache(&mut self) {
        self.ctx = SessionCtx::Cached(Zeroizing::new(Vec::new()));
    }

    /// Appends to the accumulation buffer, bounded by [`MAX_BUF_SIZE`].
    pub(crate) fn append_cache(&mut self, data: &[u8]) -> UksResult<()> {
        let cached = match &mut self.ctx {
            SessionCtx::Cached(cached) => cached,
            SessionCtx::Empty => {
                tracing::error!("cache append without context");
                return Err(UksError::BadState);
            }
            _ => return Err(UksError::BadState),
        };
        if cached.len() > MAX_BUF_SIZE || data.len() > MAX_BUF_SIZE - cached.len() {
            tracing::error!(size = data.len(), "accumulated data size too large");
            return Err(UksError::InvalidArgument);
        }
        cached.extend_from_slice(data);
        Ok(())
    }

    /// Consumes the accumulation buffer plus a final chunk.
    pub(crate) fn drain_cache(&mut self, data: &[u8]) -> UksResult<Zeroizing<Vec<u8>>> {
        match self.take_ctx() {
            SessionCtx::Cached(mut cached) => {
                if cached.len() > MAX_BUF_SIZE || data.len() > MAX_BUF_SIZE - cached.len() {
                    tracing::error!(size = data.len(), "accumulated data size too large");
                    return Err(UksError::InvalidArgument);
                }
                cached.extend_from_slice(data);
                Ok(cached)
            }
            SessionCtx::Empty => {
                tracing::error!("cache drain without context");
                Err(UksError::BadState)
            }
            other => {
                // Restore so Abort can still free the real context.
                self.ctx = other;
                Err(UksError::BadState)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> KeyNode {
        KeyNode::new(ParamSet::new(), ParamSet::new())
    }

    #[test]
    fn cache_accumulates_across_appends() {
        let mut node = node();
        node.set_cache();
        node.append_cache(b"abc").unwrap();
        node.append_cache(b"").unwrap();
        node.append_cache(b"def").unwrap();
        let data = node.drain_cache(b"gh").unwrap();
        assert_eq!(&data[..], b"abcdefgh");
        assert!(node.ctx_is_empty());
    }

    #[test]
    fn cache_without_init_is_bad_state() {
        let mut node = node();
        assert_eq!(node.append_cache(b"abc"), Err(UksError::BadState));
        assert_eq!(node.drain_cache(b"abc").unwrap_err(), UksError::BadState);
    }

    #[test]
    fn cache_growth_is_bounded() {
        let mut node = node();
        node.set_cache();
        node.append_cache(&vec![0u8; MAX_BUF_SIZE]).unwrap();
        assert_eq!(node.append_cache(&[0u8; 1]), Err(UksError::InvalidArgument));
    }
}
