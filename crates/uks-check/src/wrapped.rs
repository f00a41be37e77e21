// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Length-prefixed wrapped key data.
//!
//! Wrapped key imports arrive as a flat concatenation of sub-blobs, each a
//! little-endian `u32` length followed by that many bytes. Validation walks
//! the buffer once and demands exact consumption; extraction returns a
//! borrowed view into the original buffer.

use crate::UksError;
use crate::UksResult;

/// Number of sub-blobs in a wrapped key import payload.
pub const IMPORT_WRAPPED_KEY_TOTAL_BLOBS: u32 = 10;

const LENGTH_PREFIX_SIZE: usize = 4;

/// Validates the structure of wrapped key data.
///
/// The buffer must contain exactly `valid_total_blobs` parts, every part
/// non-empty, with the final part ending exactly at the end of the buffer.
/// When `expected_part_lens` is given, each part must also match the
/// corresponding expected length.
pub fn check_wrapped_data_format(
    data: &[u8],
    valid_total_blobs: u32,
    expected_part_lens: Option<&[u32]>,
) -> UksResult<()> {
    if data.is_empty() {
        return Err(UksError::InvalidArgument);
    }
    if let Some(expected) = expected_part_lens {
        if expected.len() != valid_total_blobs as usize {
            return Err(UksError::InvalidArgument);
        }
    }

    let mut offset = 0usize;
    for index in 0..valid_total_blobs {
        let len = read_part_len(data, offset)?;
        if let Some(expected) = expected_part_lens {
            if len != expected[index as usize] as usize {
                tracing::error!(index, part_len = len, "wrapped data part length not expected");
                return Err(UksError::InvalidWrappedFormat);
            }
        }
        offset += LENGTH_PREFIX_SIZE + len;
    }

    if offset != data.len() {
        tracing::error!(
            consumed = offset,
            total = data.len(),
            "wrapped data not fully consumed"
        );
        return Err(UksError::InvalidWrappedFormat);
    }
    Ok(())
}

/// Returns a view of the `index`-th sub-blob of wrapped key data.
pub fn get_blob_from_wrapped_data(data: &[u8], index: u32) -> UksResult<&[u8]> {
    let mut offset = 0usize;
    let mut current = 0u32;
    loop {
        let len = read_part_len(data, offset)?;
        let start = offset + LENGTH_PREFIX_SIZE;
        if current == index {
            return Ok(&data[start..start + len]);
        }
        offset = start + len;
        current += 1;
    }
}

fn read_part_len(data: &[u8], offset: usize) -> UksResult<usize> {
    let prefix_end = offset
        .checked_add(LENGTH_PREFIX_SIZE)
        .ok_or(UksError::InvalidWrappedFormat)?;
    if prefix_end > data.len() {
        tracing::error!(offset, "wrapped data truncated in length prefix");
        return Err(UksError::InvalidWrappedFormat);
    }
    let bytes: [u8; LENGTH_PREFIX_SIZE] = data[offset..prefix_end].try_into().unwrap();
    let len = u32::from_le_bytes(bytes) as usize;
    if len == 0 {
        tracing::error!(offset, "wrapped data part is empty");
        return Err(UksError::InvalidWrappedFormat);
    }
    if len > data.len() - prefix_end {
        tracing::error!(offset, part_len = len, "wrapped data part overruns buffer");
        return Err(UksError::InvalidWrappedFormat);
    }
    Ok(len)
}
