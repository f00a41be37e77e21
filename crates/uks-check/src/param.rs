// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tagged parameter sets.
//!
//! A [`ParamSet`] is the universal carrier for operation configuration: an
//! ordered collection of typed parameters, unique per tag, with a running
//! byte-size total used for bounds checking. Serialization of parameter sets
//! belongs to the transport layer; this module only defines the in-memory
//! form and its structural validity rules.

use crate::UksError;
use crate::UksResult;

/// Upper bound on the byte size of one parameter set.
pub const MAX_PARAM_SET_SIZE: usize = 4 * 1024 * 1024;

/// Fixed per-parameter size overhead counted toward the set total.
const PARAM_HEADER_SIZE: usize = 8;

/// Parameter tag.
///
/// Discriminants are the key store's stable tag indices.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Algorithm identifier (`u32`).
    Algorithm = 1,
    /// Purpose bitmask (`u32`).
    Purpose = 2,
    /// Key size in bits (`u32`).
    KeySize = 3,
    /// Digest identifier (`u32`).
    Digest = 4,
    /// Padding identifier (`u32`).
    Padding = 5,
    /// Block mode identifier (`u32`).
    BlockMode = 6,
    /// Associated data for AE modes (bytes).
    AssociatedData = 8,
    /// AE nonce (bytes).
    Nonce = 9,
    /// CBC initialization vector (bytes).
    Iv = 10,
    /// Derivation info (bytes).
    Info = 11,
    /// Derivation salt (bytes).
    Salt = 12,
    /// PBKDF2 iteration count (`u32`).
    Iteration = 14,
    /// Derived key size in bytes (`u32`).
    DeriveKeySize = 24,
    /// Import key type selector (`u32`).
    ImportKeyType = 25,
    /// Wrapped-import algorithm suite (`u32`).
    UnwrapAlgorithmSuite = 26,
    /// User authentication type bitmask (`u32`).
    UserAuthType = 304,
    /// Key auth access type bitmask (`u32`).
    KeyAuthAccessType = 307,
    /// Secure sign type (`u32`).
    KeySecureSignType = 308,
    /// Challenge type (`u32`).
    ChallengeType = 309,
    /// Storage flag for derived/agreed keys (`u32`).
    KeyStorageFlag = 1002,
    /// Authentication tag for AE decryption (bytes).
    AeTag = 10009,
}

/// Parameter payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// 32-bit unsigned value.
    U32(u32),
    /// 64-bit unsigned value.
    U64(u64),
    /// Boolean value.
    Bool(bool),
    /// Opaque byte material.
    Bytes(Vec<u8>),
}

impl ParamValue {
    fn payload_size(&self) -> usize {
        match self {
            ParamValue::U32(_) => 4,
            ParamValue::U64(_) => 8,
            ParamValue::Bool(_) => 1,
            ParamValue::Bytes(bytes) => bytes.len(),
        }
    }
}

/// One tagged parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter tag.
    pub tag: Tag,
    /// Parameter payload.
    pub value: ParamValue,
}

impl Param {
    /// Builds a `u32` parameter.
    pub fn u32(tag: Tag, value: u32) -> Self {
        Param {
            tag,
            value: ParamValue::U32(value),
        }
    }

    /// Builds a byte-blob parameter.
    pub fn bytes(tag: Tag, value: impl Into<Vec<u8>>) -> Self {
        Param {
            tag,
            value: ParamValue::Bytes(value.into()),
        }
    }

    /// Returns the `u32` payload, or `InvalidArgument` for other payloads.
    pub fn as_u32(&self) -> UksResult<u32> {
        match &self.value {
            ParamValue::U32(value) => Ok(*value),
            _ => Err(UksError::InvalidArgument),
        }
    }

    /// Returns the byte payload, or `InvalidArgument` for other payloads.
    pub fn as_bytes(&self) -> UksResult<&[u8]> {
        match &self.value {
            ParamValue::Bytes(bytes) => Ok(bytes),
            _ => Err(UksError::InvalidArgument),
        }
    }

    fn size(&self) -> usize {
        PARAM_HEADER_SIZE + self.value.payload_size()
    }
}

/// Ordered, tag-unique parameter collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    params: Vec<Param>,
    size: usize,
}

impl ParamSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a list of parameters.
    ///
    /// Fails like repeated [`ParamSet::add`] on duplicate tags or oversize.
    pub fn from_params(params: impl IntoIterator<Item = Param>) -> UksResult<Self> {
        let mut set = ParamSet::new();
        for param in params {
            set.add(param)?;
        }
        Ok(set)
    }

    /// Appends a parameter.
    ///
    /// Rejects a duplicate tag and any addition that would push the set past
    /// [`MAX_PARAM_SET_SIZE`], both with `InvalidArgument`.
    pub fn add(&mut self, param: Param) -> UksResult<()> {
        if self.get(param.tag).is_ok() {
            tracing::error!(tag = ?param.tag, "duplicate tag in param set");
            return Err(UksError::InvalidArgument);
        }
        let new_size = self.size + param.size();
        if new_size > MAX_PARAM_SET_SIZE {
            tracing::error!(size = new_size, "param set size limit exceeded");
            return Err(UksError::InvalidArgument);
        }
        self.size = new_size;
        self.params.push(param);
        Ok(())
    }

    /// Looks up a parameter by tag.
    pub fn get(&self, tag: Tag) -> UksResult<&Param> {
        self.params
            .iter()
            .find(|param| param.tag == tag)
            .ok_or(UksError::ParamNotExist)
    }

    /// Looks up a `u32` parameter by tag.
    pub fn get_u32(&self, tag: Tag) -> UksResult<u32> {
        self.get(tag)?.as_u32()
    }

    /// Looks up a byte-blob parameter by tag.
    pub fn get_bytes(&self, tag: Tag) -> UksResult<&[u8]> {
        self.get(tag)?.as_bytes()
    }

    /// Total accounted byte size of the set.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// Re-checks structural validity: tag uniqueness and size accounting.
    ///
    /// `add` maintains both invariants; this exists for sets received from an
    /// untrusted constructor path.
    pub fn validate(&self) -> UksResult<()> {
        let mut computed = 0usize;
        for (index, param) in self.params.iter().enumerate() {
            if self.params[..index].iter().any(|prev| prev.tag == param.tag) {
                tracing::error!(tag = ?param.tag, "duplicate tag in param set");
                return Err(UksError::InvalidArgument);
            }
            computed += param.size();
        }
        if computed != self.size || computed > MAX_PARAM_SET_SIZE {
            tracing::error!(
                accounted = self.size,
                computed,
                "param set size accounting mismatch"
            );
            return Err(UksError::InvalidArgument);
        }
        Ok(())
    }
}
