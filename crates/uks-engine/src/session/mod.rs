// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The three-stage session engine.
//!
//! One [`SessionEngine`] serves any number of concurrent sessions; all
//! per-session state lives in the caller's [`KeyNode`]. Each operation
//! family contributes its stage methods from a submodule.

mod agree;
mod cipher;
mod derive;
mod mac;
mod sign_verify;

use uks_check::Algorithm;
use uks_check::CapabilitySet;
use uks_check::ParamValidator;
use uks_check::Tag;
use uks_check::UksError;
use uks_check::UksResult;

use crate::spec::session_algorithm;
use crate::AuthId;
use crate::CryptoEngine;
use crate::KeyBlobStore;
use crate::KeyNode;
use crate::ThreeStageAuth;

/// Drives Init/Update/Finish/Abort for every operation family.
pub struct SessionEngine<E, A, K> {
    validator: ParamValidator,
    engine: E,
    auth: A,
    keys: K,
}

impl<E, A, K> SessionEngine<E, A, K>
where
    E: CryptoEngine,
    A: ThreeStageAuth,
    K: KeyBlobStore,
{
    /// Builds an engine over the given collaborators.
    pub fn new(caps: CapabilitySet, engine: E, auth: A, keys: K) -> Self {
        SessionEngine {
            validator: ParamValidator::new(caps),
            engine,
            auth,
            keys,
        }
    }

    /// The validator backing this engine's parameter checks.
    pub fn validator(&self) -> &ParamValidator {
        &self.validator
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn keys(&self) -> &K {
        &self.keys
    }

    /// Runs the authorization gate for the session's algorithm family.
    pub(crate) fn authorize(&self, node: &KeyNode, select: fn(Algorithm) -> Option<AuthId>)
        -> UksResult<()> {
        let alg = session_algorithm(node.runtime_params())?;
        let auth_id = select(alg).ok_or(UksError::InvalidAlgorithm)?;
        self.auth.auth(auth_id, node)
    }

    /// Key size recorded in the runtime parameter set, if any.
    pub(crate) fn runtime_key_len(&self, node: &KeyNode) -> Option<u32> {
        node.runtime_params().get_u32(Tag::KeySize).ok()
    }
}

pub(crate) fn cipher_auth_id(alg: Algorithm) -> Option<AuthId> {
    match alg {
        Algorithm::Aes | Algorithm::Sm4 => Some(AuthId::SymCipher),
        Algorithm::Rsa => Some(AuthId::AsymCipher),
        _ => None,
    }
}

pub(crate) fn sign_verify_auth_id(alg: Algorithm) -> Option<AuthId> {
    match alg {
        Algorithm::Ecc | Algorithm::Sm2 | Algorithm::Dsa => Some(AuthId::SignVerifyEcc),
        Algorithm::Rsa => Some(AuthId::SignVerifyRsa),
        Algorithm::Ed25519 => Some(AuthId::SignVerifyEd25519),
        _ => None,
    }
}

pub(crate) fn mac_auth_id(alg: Algorithm) -> Option<AuthId> {
    match alg {
        Algorithm::Hmac => Some(AuthId::MacHmac),
        Algorithm::Sm3 => Some(AuthId::MacSm3),
        _ => None,
    }
}

pub(crate) fn agree_auth_id(alg: Algorithm) -> Option<AuthId> {
    match alg {
        Algorithm::Ecdh | Algorithm::X25519 | Algorithm::Dh => Some(AuthId::Agree),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
