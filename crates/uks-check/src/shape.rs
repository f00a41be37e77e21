// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-algorithm validation shapes.
//!
//! A [`ParamsValues`] is the fixed-shape record extracted from a caller's
//! parameter set: five fields, each either not examined for the algorithm,
//! legitimately absent, or present with a value. [`ExpectParamsValues`]
//! mirrors the shape with the whitelist of acceptable values per field.

use crate::BlockMode;
use crate::Digest;
use crate::Padding;
use crate::Purpose;
use crate::UksError;
use crate::UksResult;

/// Extraction state of one validated field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    /// The field is not examined for this algorithm/check-type.
    Unchecked,
    /// The tag was legitimately missing from the parameter set.
    Absent,
    /// The tag was present with this value.
    Present(T),
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Unchecked
    }
}

impl<T: Copy> FieldValue<T> {
    /// Returns the extracted value, if any.
    pub fn value(&self) -> Option<T> {
        match self {
            FieldValue::Present(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the extracted value or the field-specific error.
    pub fn require(&self, missing: UksError) -> UksResult<T> {
        self.value().ok_or(missing)
    }

    /// True when the tag was missing but allowed to be.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

/// The five fields extracted from a caller's parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsValues {
    /// Key length in bits.
    pub key_len: FieldValue<u32>,
    /// Padding scheme.
    pub padding: FieldValue<Padding>,
    /// Purpose bitmask.
    pub purpose: FieldValue<Purpose>,
    /// Digest algorithm.
    pub digest: FieldValue<Digest>,
    /// Block cipher mode.
    pub mode: FieldValue<BlockMode>,
}

impl ParamsValues {
    /// Padding as the cipher layer sees it: an absent or unexamined padding
    /// tag behaves as no padding.
    pub fn padding_or_none(&self) -> Padding {
        self.padding.value().unwrap_or(Padding::None)
    }

    /// Digest as the cipher layer sees it: absent behaves as `Digest::None`.
    pub fn digest_or_none(&self) -> Digest {
        self.digest.value().unwrap_or(Digest::None)
    }
}

/// Whitelist for one field of an expectation shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectValues<T: 'static> {
    /// Whether the field participates in fixed-param checking.
    pub need_check: bool,
    /// Acceptable values; empty when `need_check` is false.
    pub values: &'static [T],
}

impl<T> ExpectValues<T> {
    /// A field checked against the given whitelist.
    pub const fn check(values: &'static [T]) -> Self {
        ExpectValues {
            need_check: true,
            values,
        }
    }

    /// A field this algorithm never examines.
    pub const fn skip() -> Self {
        ExpectValues {
            need_check: false,
            values: &[],
        }
    }
}

/// Expected values for all five fields of one (algorithm, check-type) row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectParamsValues {
    /// Acceptable key lengths in bits.
    pub key_len: ExpectValues<u32>,
    /// Acceptable paddings.
    pub padding: ExpectValues<Padding>,
    /// Acceptable purpose masks.
    pub purpose: ExpectValues<Purpose>,
    /// Acceptable digests.
    pub digest: ExpectValues<Digest>,
    /// Acceptable block modes.
    pub mode: ExpectValues<BlockMode>,
}

/// Which tags the input extractor reads for one (algorithm, check-type) row.
///
/// Key length and purpose are mandatory when read; padding, digest and mode
/// may be absent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParamsShape {
    /// Read the key-size tag.
    pub key_len: bool,
    /// Read the padding tag.
    pub padding: bool,
    /// Read the purpose tag.
    pub purpose: bool,
    /// Read the digest tag.
    pub digest: bool,
    /// Read the block-mode tag.
    pub mode: bool,
}
