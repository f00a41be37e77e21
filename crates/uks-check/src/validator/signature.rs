// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signature size constraints.

use crate::key_bytes;
use crate::tables;
use crate::Algorithm;
use crate::CmdId;
use crate::ParamsValues;
use crate::Purpose;
use crate::UksError;
use crate::UksResult;
use crate::ECC_SIGN_MAX_TL_SIZE;
use crate::SIGNATURE_MIN_SIZE;

use super::ParamValidator;

impl ParamValidator {
    /// Validates a signature buffer against the algorithm's size constraint.
    ///
    /// For signing the buffer must hold the largest signature the key can
    /// produce; for verification an oversized signature is itself invalid.
    pub fn check_signature(
        &self,
        cmd: CmdId,
        alg: Algorithm,
        key_size_bits: u32,
        signature: &[u8],
    ) -> UksResult<()> {
        match alg {
            Algorithm::Rsa => {
                check_key_size(tables::RSA_KEY_SIZES, key_size_bits)?;
                check_rsa_signature(cmd, key_size_bits, signature)
            }
            Algorithm::Ecc => {
                check_key_size(tables::ECC_KEY_SIZES, key_size_bits)?;
                check_ecc_signature(cmd, key_size_bits, signature)
            }
            Algorithm::Sm2 => {
                check_key_size(tables::SM2_KEY_SIZES, key_size_bits)?;
                check_ecc_signature(cmd, key_size_bits, signature)
            }
            Algorithm::Ed25519 => check_ed25519_signature(cmd, signature),
            Algorithm::Dsa => Ok(()),
            _ => Err(UksError::InvalidAlgorithm),
        }
    }

    /// Validates direction-specific purpose and padding for sign/verify.
    pub fn check_sign_verify_mutable_params(
        &self,
        cmd: CmdId,
        alg: Algorithm,
        input: &ParamsValues,
    ) -> UksResult<()> {
        let purpose = input.purpose.value().unwrap_or(Purpose::empty());
        match cmd {
            CmdId::Sign => {
                if !purpose.contains(Purpose::SIGN) {
                    return Err(UksError::InvalidPurpose);
                }
            }
            CmdId::Verify => {
                if !purpose.contains(Purpose::VERIFY) {
                    return Err(UksError::InvalidPurpose);
                }
            }
            _ => return Err(UksError::InvalidArgument),
        }

        if alg == Algorithm::Rsa
            && !tables::RSA_SIGN_PADDINGS.contains(&input.padding_or_none())
        {
            return Err(UksError::InvalidPadding);
        }
        Ok(())
    }
}

fn check_key_size(whitelist: &[u32], key_size_bits: u32) -> UksResult<()> {
    if whitelist.contains(&key_size_bits) {
        Ok(())
    } else {
        tracing::error!(key_size_bits, "key size not expected for signature");
        Err(UksError::InvalidArgument)
    }
}

fn check_rsa_signature(cmd: CmdId, key_size_bits: u32, signature: &[u8]) -> UksResult<()> {
    // k is the length of the RSA modulus n.
    // sign: signature no smaller than k; verify: signature no larger than k.
    let modulus = (key_size_bits / 8) as usize;
    match cmd {
        CmdId::Sign => {
            if signature.len() < modulus {
                tracing::error!(sig_size = signature.len(), "rsa signature buffer too small");
                return Err(UksError::BufferTooSmall);
            }
        }
        CmdId::Verify => {
            if signature.len() > modulus {
                tracing::error!(sig_size = signature.len(), "rsa signature size invalid");
                return Err(UksError::InvalidSignatureSize);
            }
        }
        _ => return Err(UksError::InvalidArgument),
    }
    Ok(())
}

fn check_ecc_signature(cmd: CmdId, key_size_bits: u32, signature: &[u8]) -> UksResult<()> {
    // DER form: 0x30 len 0x02 len [0x00] r 0x02 len [0x00] s.
    // sign: no smaller than 2*ceil(keySize/8) + 8; verify: no larger.
    let r_size = key_bytes(key_size_bits) as usize;
    let bound = r_size * 2 + ECC_SIGN_MAX_TL_SIZE as usize;
    match cmd {
        CmdId::Sign => {
            if signature.len() < bound {
                tracing::error!(sig_size = signature.len(), "ecc signature buffer too small");
                return Err(UksError::BufferTooSmall);
            }
        }
        CmdId::Verify => {
            if signature.len() > bound {
                tracing::error!(sig_size = signature.len(), "ecc signature size invalid");
                return Err(UksError::InvalidSignatureSize);
            }
        }
        _ => return Err(UksError::InvalidArgument),
    }
    Ok(())
}

fn check_ed25519_signature(cmd: CmdId, signature: &[u8]) -> UksResult<()> {
    let min = SIGNATURE_MIN_SIZE as usize;
    match cmd {
        CmdId::Sign => {
            if signature.len() < min {
                tracing::error!(sig_size = signature.len(), "ed25519 signature buffer too small");
                return Err(UksError::BufferTooSmall);
            }
        }
        CmdId::Verify => {
            if signature.len() < min {
                tracing::error!(sig_size = signature.len(), "ed25519 signature size invalid");
                return Err(UksError::InvalidSignatureSize);
            }
        }
        _ => return Err(UksError::InvalidArgument),
    }
    Ok(())
}
