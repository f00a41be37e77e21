// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Collaborator interfaces of the session engine.
//!
//! The engine never implements cryptography, authorization policy or key
//! storage itself; it drives these three collaborators and owns only the
//! sequencing and resource lifecycle between the calls.

use zeroize::Zeroizing;

use uks_check::Digest;
use uks_check::ParamSet;
use uks_check::UksResult;

use crate::KeySpec;
use crate::KeyNode;
use crate::UsageSpec;

/// Streaming hash context.
///
/// Created by [`CryptoEngine::hash_init`]; the engine stores it opaquely and
/// never inspects its representation.
pub trait HashCtx {
    /// Absorbs a chunk of message data.
    fn update(&mut self, data: &[u8]) -> UksResult<()>;

    /// Absorbs a final chunk and returns the digest.
    fn finish(self: Box<Self>, data: &[u8]) -> UksResult<Vec<u8>>;
}

/// Streaming MAC context.
pub trait MacCtx {
    /// Absorbs a chunk of message data.
    fn update(&mut self, data: &[u8]) -> UksResult<()>;

    /// Absorbs a final chunk and writes the MAC into `out`.
    ///
    /// `out` has already been checked against the digest length; returns the
    /// number of bytes written.
    fn finish(self: Box<Self>, data: &[u8], out: &mut [u8]) -> UksResult<usize>;
}

/// Streaming cipher context, one direction per instance.
pub trait CipherCtx {
    /// Transforms a chunk; `out` is at least as large as `data`.
    ///
    /// Returns the number of bytes written.
    fn update(&mut self, data: &[u8], out: &mut [u8]) -> UksResult<usize>;

    /// Transforms the final chunk and completes the operation.
    ///
    /// For authenticated encryption the tag is appended to `out` and counted
    /// in the returned length; for authenticated decryption the caller
    /// passes the expected tag in `tag`.
    fn finish(self: Box<Self>, data: &[u8], out: &mut [u8], tag: Option<&[u8]>)
        -> UksResult<usize>;
}

/// Crypto primitive backend.
///
/// Implementations take raw key material plus a usage specification and
/// perform the actual math; all sizing has been validated before any of
/// these methods is called.
pub trait CryptoEngine {
    /// Starts a streaming hash.
    fn hash_init(&self, digest: Digest) -> UksResult<Box<dyn HashCtx>>;

    /// Starts a streaming MAC over the given key.
    fn hmac_init(&self, key: &[u8], digest: Digest) -> UksResult<Box<dyn MacCtx>>;

    /// Starts a streaming encryption.
    fn encrypt_init(&self, key: &[u8], spec: &UsageSpec) -> UksResult<Box<dyn CipherCtx>>;

    /// Starts a streaming decryption.
    fn decrypt_init(&self, key: &[u8], spec: &UsageSpec) -> UksResult<Box<dyn CipherCtx>>;

    /// One-shot encryption; returns the number of bytes written.
    fn encrypt(&self, key: &[u8], spec: &UsageSpec, data: &[u8], out: &mut [u8])
        -> UksResult<usize>;

    /// One-shot decryption; returns the number of bytes written.
    fn decrypt(&self, key: &[u8], spec: &UsageSpec, data: &[u8], out: &mut [u8])
        -> UksResult<usize>;

    /// Signs a message (or prehashed digest); returns the signature length.
    fn sign(&self, key: &[u8], spec: &UsageSpec, message: &[u8], signature: &mut [u8])
        -> UksResult<usize>;

    /// Verifies a signature over a message (or prehashed digest).
    fn verify(&self, key: &[u8], spec: &UsageSpec, message: &[u8], signature: &[u8])
        -> UksResult<()>;

    /// Computes a shared secret from a private key and a peer public key.
    fn agree_key(&self, private_key: &[u8], peer_public_key: &[u8], spec: &KeySpec)
        -> UksResult<Vec<u8>>;

    /// Derives key material into the pre-sized `derived` buffer.
    fn derive_key(&self, main_key: &[u8], spec: &KeySpec, derived: &mut [u8]) -> UksResult<()>;
}

/// Authorization identifiers, one per operation family and key class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthId {
    /// ECC, SM2 and DSA signing keys share one policy.
    SignVerifyEcc,
    /// RSA signing keys.
    SignVerifyRsa,
    /// ED25519 signing keys.
    SignVerifyEd25519,
    /// AES and SM4 cipher keys.
    SymCipher,
    /// RSA cipher keys.
    AsymCipher,
    /// HMAC keys.
    MacHmac,
    /// SM3 MAC keys.
    MacSm3,
    /// Agreement keys.
    Agree,
    /// Derivation keys.
    Derive,
}

/// Authorization gate consulted before a session acquires any resource.
pub trait ThreeStageAuth {
    /// Pass/fail access decision for the session's key.
    fn auth(&self, auth_id: AuthId, key_node: &KeyNode) -> UksResult<()>;
}

/// Flag recorded in a key blob built from a session result.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyFlag {
    /// Imported key material.
    ImportKey = 1,
    /// Locally generated key.
    GenerateKey = 2,
    /// Result of a key agreement.
    AgreeKey = 3,
    /// Result of a key derivation.
    DeriveKey = 4,
}

/// Storage selector for derived and agreed keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageFlag {
    /// Return the raw bytes to the caller.
    Temp = 0,
    /// Wrap the result in a persisted key blob.
    Persistent = 1,
}

/// Key material storage collaborator.
pub trait KeyBlobStore {
    /// Recovers the raw key bytes described by a key's parameter set.
    fn raw_key(&self, key_params: &ParamSet) -> UksResult<Zeroizing<Vec<u8>>>;

    /// Wraps freshly produced key material into a persistable key blob.
    fn build_key_blob(&self, flag: KeyFlag, params: &ParamSet, key: &[u8]) -> UksResult<Vec<u8>>;

    /// Converts a peer public key from its transport encoding into the
    /// internal format the primitive backend consumes.
    fn public_key_inner_format(&self, params: &ParamSet, public_key: &[u8])
        -> UksResult<Vec<u8>>;
}
