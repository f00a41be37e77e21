// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Deterministic collaborator fakes for session tests.
//!
//! The fake engine records every primitive call and applies trivial
//! reversible transforms, so tests can assert call sequences and byte
//! movement without any real cryptography.

use std::sync::Mutex;

use zeroize::Zeroizing;

use uks_check::digest_len;
use uks_check::Digest;
use uks_check::ParamSet;
use uks_check::UksError;
use uks_check::UksResult;
use uks_check::AE_TAG_LEN;

use crate::AuthId;
use crate::CipherCtx;
use crate::CryptoEngine;
use crate::HashCtx;
use crate::KeyBlobStore;
use crate::KeyFlag;
use crate::KeySpec;
use crate::MacCtx;
use crate::KeyNode;
use crate::ThreeStageAuth;
use crate::UsageSpec;

pub const XOR_MASK: u8 = 0x5a;
pub const TEST_TAG_BYTE: u8 = 0xa7;
pub const TEST_SIG_BYTE: u8 = 0xb4;
pub const TEST_AGREE_BYTE: u8 = 0x33;
pub const TEST_DERIVE_BYTE: u8 = 0x44;
pub const TEST_SIG_LEN: usize = 64;

#[derive(Default)]
pub struct TestEngine {
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_cipher_init: bool,
}

impl TestEngine {
    pub fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

struct TestHashCtx {
    digest: Digest,
    data: Vec<u8>,
}

impl HashCtx for TestHashCtx {
    fn update(&mut self, data: &[u8]) -> UksResult<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn finish(mut self: Box<Self>, data: &[u8]) -> UksResult<Vec<u8>> {
        self.data.extend_from_slice(data);
        let fold = self.data.iter().fold(0u8, |acc, byte| acc ^ byte);
        Ok(vec![fold; digest_len(self.digest)? as usize])
    }
}

struct TestMacCtx {
    digest: Digest,
    data: Vec<u8>,
}

impl MacCtx for TestMacCtx {
    fn update(&mut self, data: &[u8]) -> UksResult<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn finish(mut self: Box<Self>, data: &[u8], out: &mut [u8]) -> UksResult<usize> {
        self.data.extend_from_slice(data);
        let len = digest_len(self.digest)? as usize;
        let fold = self.data.iter().fold(0u8, |acc, byte| acc ^ byte);
        out[..len].fill(fold);
        Ok(len)
    }
}

struct TestCipherCtx {
    encrypt: bool,
    ae: bool,
}

fn xor_into(data: &[u8], out: &mut [u8]) {
    for (dst, src) in out.iter_mut().zip(data) {
        *dst = src ^ XOR_MASK;
    }
}

impl CipherCtx for TestCipherCtx {
    fn update(&mut self, data: &[u8], out: &mut [u8]) -> UksResult<usize> {
        xor_into(data, out);
        Ok(data.len())
    }

    fn finish(self: Box<Self>, data: &[u8], out: &mut [u8], tag: Option<&[u8]>)
        -> UksResult<usize> {
        xor_into(data, out);
        if self.ae {
            if self.encrypt {
                let tag_len = AE_TAG_LEN as usize;
                out[data.len()..data.len() + tag_len].fill(TEST_TAG_BYTE);
                return Ok(data.len() + tag_len);
            }
            match tag {
                Some(tag) if tag.iter().all(|byte| *byte == TEST_TAG_BYTE) => {}
                _ => return Err(UksError::CryptoEngine),
            }
        }
        Ok(data.len())
    }
}

impl CryptoEngine for TestEngine {
    fn hash_init(&self, digest: Digest) -> UksResult<Box<dyn HashCtx>> {
        self.record("hash_init");
        Ok(Box::new(TestHashCtx {
            digest,
            data: Vec::new(),
        }))
    }

    fn hmac_init(&self, _key: &[u8], digest: Digest) -> UksResult<Box<dyn MacCtx>> {
        self.record("hmac_init");
        Ok(Box::new(TestMacCtx {
            digest,
            data: Vec::new(),
        }))
    }

    fn encrypt_init(&self, _key: &[u8], spec: &UsageSpec) -> UksResult<Box<dyn CipherCtx>> {
        self.record("encrypt_init");
        if self.fail_cipher_init {
            return Err(UksError::CryptoEngine);
        }
        Ok(Box::new(TestCipherCtx {
            encrypt: true,
            ae: spec.mode.is_some_and(|mode| mode.is_ae()),
        }))
    }

    fn decrypt_init(&self, _key: &[u8], spec: &UsageSpec) -> UksResult<Box<dyn CipherCtx>> {
        self.record("decrypt_init");
        if self.fail_cipher_init {
            return Err(UksError::CryptoEngine);
        }
        Ok(Box::new(TestCipherCtx {
            encrypt: false,
            ae: spec.mode.is_some_and(|mode| mode.is_ae()),
        }))
    }

    fn encrypt(&self, _key: &[u8], _spec: &UsageSpec, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        self.record("encrypt");
        xor_into(data, out);
        Ok(out.len())
    }

    fn decrypt(&self, _key: &[u8], _spec: &UsageSpec, data: &[u8], out: &mut [u8])
        -> UksResult<usize> {
        self.record("decrypt");
        let len = data.len().min(out.len());
        xor_into(&data[..len], out);
        Ok(len)
    }

    fn sign(&self, _key: &[u8], _spec: &UsageSpec, _message: &[u8], signature: &mut [u8])
        -> UksResult<usize> {
        self.record("sign");
        signature[..TEST_SIG_LEN].fill(TEST_SIG_BYTE);
        Ok(TEST_SIG_LEN)
    }

    fn verify(&self, _key: &[u8], _spec: &UsageSpec, _message: &[u8], signature: &[u8])
        -> UksResult<()> {
        self.record("verify");
        if signature.iter().all(|byte| *byte == TEST_SIG_BYTE) {
            Ok(())
        } else {
            Err(UksError::CryptoEngine)
        }
    }

    fn agree_key(&self, _private_key: &[u8], _peer_public_key: &[u8], _spec: &KeySpec)
        -> UksResult<Vec<u8>> {
        self.record("agree_key");
        Ok(vec![TEST_AGREE_BYTE; 32])
    }

    fn derive_key(&self, _main_key: &[u8], _spec: &KeySpec, derived: &mut [u8]) -> UksResult<()> {
        self.record("derive_key");
        derived.fill(TEST_DERIVE_BYTE);
        Ok(())
    }
}

#[derive(Default)]
pub struct TestAuth {
    pub deny: Option<AuthId>,
}

impl ThreeStageAuth for TestAuth {
    fn auth(&self, auth_id: AuthId, _key_node: &KeyNode) -> UksResult<()> {
        if self.deny == Some(auth_id) {
            return Err(UksError::KeyAuthFailed);
        }
        Ok(())
    }
}

pub struct TestKeyStore;

impl KeyBlobStore for TestKeyStore {
    fn raw_key(&self, _key_params: &ParamSet) -> UksResult<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(vec![0x11; 32]))
    }

    fn build_key_blob(&self, flag: KeyFlag, _params: &ParamSet, key: &[u8])
        -> UksResult<Vec<u8>> {
        let mut blob = vec![b'K', b'B', flag as u8];
        blob.extend_from_slice(key);
        Ok(blob)
    }

    fn public_key_inner_format(&self, _params: &ParamSet, public_key: &[u8])
        -> UksResult<Vec<u8>> {
        Ok(public_key.to_vec())
    }
}
