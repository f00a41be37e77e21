// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cipher buffer-size arithmetic and material checks.
//!
//! The size rules here gate every cipher call before it reaches a primitive
//! backend. They are exact: an output buffer is either provably large enough
//! or the call fails with `BufferTooSmall`; nothing truncates silently.

use crate::digest_len;
use crate::tables;
use crate::Algorithm;
use crate::BlockMode;
use crate::CmdId;
use crate::Digest;
use crate::Padding;
use crate::ParamSet;
use crate::ParamsValues;
use crate::Purpose;
use crate::Tag;
use crate::UksError;
use crate::UksResult;
use crate::AES_CCM_AAD_LEN_MIN;
use crate::AES_CCM_NONCE_LEN_MAX;
use crate::AES_CCM_NONCE_LEN_MIN;
use crate::AES_GCM_NONCE_LEN_MIN;
use crate::AE_TAG_LEN;
use crate::BLOCK_CIPHER_BLOCK_SIZE;
use crate::BLOCK_CIPHER_IV_LEN;
use crate::RSA_OAEP_DIGEST_NUM;

use super::ParamValidator;

impl ParamValidator {
    /// Validates cipher input/output buffer sizes for one operation.
    pub fn check_cipher_data(
        &self,
        cmd: CmdId,
        alg: Algorithm,
        input: &ParamsValues,
        in_data: &[u8],
        out_data: &[u8],
    ) -> UksResult<()> {
        match alg {
            Algorithm::Rsa => check_rsa_cipher_data(cmd, input, in_data, out_data),
            Algorithm::Aes | Algorithm::Sm4 => {
                check_block_cipher_data(cmd, alg, input, in_data, out_data)
            }
            _ => Err(UksError::InvalidAlgorithm),
        }
    }

    /// Validates direction-specific purpose and padding for a cipher call.
    pub fn check_cipher_mutable_params(
        &self,
        cmd: CmdId,
        alg: Algorithm,
        input: &ParamsValues,
    ) -> UksResult<()> {
        let purpose = input.purpose.value().unwrap_or(Purpose::empty());
        match cmd {
            CmdId::Encrypt => {
                if !purpose.contains(Purpose::ENCRYPT) {
                    return Err(UksError::InvalidPurpose);
                }
            }
            CmdId::Decrypt => {
                if !purpose.contains(Purpose::DECRYPT) {
                    return Err(UksError::InvalidPurpose);
                }
            }
            _ => return Err(UksError::InvalidArgument),
        }

        let result = match alg {
            Algorithm::Rsa => {
                if tables::RSA_CIPHER_PADDINGS.contains(&input.padding_or_none()) {
                    Ok(())
                } else {
                    Err(UksError::InvalidPadding)
                }
            }
            Algorithm::Aes => check_aes_padding(input),
            Algorithm::Sm4 => check_sm4_padding(input),
            _ => return Err(UksError::InvalidAlgorithm),
        };
        result.map_err(|_| UksError::InvalidPadding)
    }

    /// Validates IV/nonce/AAD material for the selected mode.
    pub fn check_cipher_material_params(
        &self,
        alg: Algorithm,
        input: &ParamsValues,
        params: &ParamSet,
    ) -> UksResult<()> {
        if alg == Algorithm::Aes {
            match input.mode.value() {
                Some(BlockMode::Cbc) => return check_iv_material(params),
                Some(mode) if mode.is_ae() => return check_ae_material(mode, params),
                _ => {}
            }
        }
        if alg == Algorithm::Sm4 {
            if let Some(BlockMode::Cbc) = input.mode.value() {
                return check_iv_material(params);
            }
        }
        Ok(())
    }

    /// Validates generation-time padding rules that depend on other fields.
    pub fn check_gen_key_mutable_params(
        &self,
        alg: Algorithm,
        input: &ParamsValues,
    ) -> UksResult<()> {
        let result = match alg {
            Algorithm::Rsa => check_rsa_gen_key_padding(input),
            Algorithm::Aes => check_aes_padding(input),
            Algorithm::Sm4 => check_sm4_padding(input),
            // Other algorithms carry no gen-time padding rule.
            _ => return Ok(()),
        };
        result.map_err(|_| {
            tracing::error!(?alg, "gen key padding not expected");
            UksError::InvalidPadding
        })
    }
}

fn check_rsa_gen_key_padding(input: &ParamsValues) -> UksResult<()> {
    if input.padding.is_absent() {
        return Ok(());
    }
    let padding = input.padding_or_none();
    let purpose = input.purpose.value().unwrap_or(Purpose::empty());
    if purpose.intersects(Purpose::ENCRYPT.union(Purpose::DECRYPT)) {
        return contains(tables::RSA_CIPHER_PADDINGS, padding);
    }
    if purpose.intersects(Purpose::SIGN.union(Purpose::VERIFY)) {
        return contains(tables::RSA_SIGN_PADDINGS, padding);
    }
    Ok(())
}

fn check_aes_padding(input: &ParamsValues) -> UksResult<()> {
    if input.mode.is_absent() || input.padding.is_absent() {
        return Ok(());
    }
    let padding = input.padding_or_none();
    match input.mode.value() {
        Some(BlockMode::Cbc) => contains(tables::AES_CBC_PADDINGS, padding),
        Some(BlockMode::Ctr) => contains(tables::AES_CTR_PADDINGS, padding),
        Some(BlockMode::Ecb) => contains(tables::AES_ECB_PADDINGS, padding),
        Some(BlockMode::Gcm) | Some(BlockMode::Ccm) => {
            contains(tables::AES_AEAD_PADDINGS, padding)
        }
        _ => Ok(()),
    }
}

fn check_sm4_padding(input: &ParamsValues) -> UksResult<()> {
    if input.mode.is_absent() || input.padding.is_absent() {
        return Ok(());
    }
    let padding = input.padding_or_none();
    match input.mode.value() {
        Some(BlockMode::Cbc) => contains(tables::SM4_CBC_PADDINGS, padding),
        Some(BlockMode::Ctr) => contains(tables::SM4_CTR_PADDINGS, padding),
        Some(BlockMode::Ecb) => contains(tables::SM4_ECB_PADDINGS, padding),
        _ => Err(UksError::InvalidArgument),
    }
}

fn contains(whitelist: &[Padding], padding: Padding) -> UksResult<()> {
    if whitelist.contains(&padding) {
        Ok(())
    } else {
        Err(UksError::InvalidArgument)
    }
}

fn check_rsa_cipher_data(
    cmd: CmdId,
    input: &ParamsValues,
    in_data: &[u8],
    out_data: &[u8],
) -> UksResult<()> {
    let key_size = key_bytes_floor(input.key_len.require(UksError::CheckGetKeySizeFail)?);
    let result = match input.padding_or_none() {
        Padding::None => check_rsa_no_pad(key_size, in_data, out_data),
        Padding::Oaep => check_rsa_oaep(cmd, key_size, input.digest_or_none(), in_data, out_data),
        _ => Ok(()),
    };
    if let Err(err) = result {
        tracing::error!(
            ?cmd,
            key_size,
            in_size = in_data.len(),
            out_size = out_data.len(),
            "rsa cipher data check failed"
        );
        return Err(err);
    }
    Ok(())
}

// The original key sizes are multiples of 8 bits; truncating division keeps
// the modulus length exact.
fn key_bytes_floor(key_size_bits: u32) -> u32 {
    key_size_bits / 8
}

fn check_rsa_no_pad(key_size: u32, in_data: &[u8], out_data: &[u8]) -> UksResult<()> {
    // encrypt/decrypt: inSize no greater than keySize, outSize no less than keySize
    if in_data.len() > key_size as usize {
        tracing::error!(in_size = in_data.len(), key_size, "invalid input size");
        return Err(UksError::InvalidArgument);
    }
    if out_data.len() < key_size as usize {
        tracing::error!(out_size = out_data.len(), key_size, "output buffer too small");
        return Err(UksError::BufferTooSmall);
    }
    Ok(())
}

fn check_rsa_oaep(
    cmd: CmdId,
    key_size: u32,
    digest: Digest,
    in_data: &[u8],
    out_data: &[u8],
) -> UksResult<()> {
    let digest = if digest == Digest::None {
        Digest::Sha1
    } else {
        digest
    };
    let digest_len = digest_len(digest)?;

    // encrypt: inSize no greater than keySize - 2*digestLen - 2, outSize no
    // less than keySize (in: plain; out: cipher)
    // decrypt: inSize no greater than keySize, outSize no less than
    // keySize - 2*digestLen - 2 (in: cipher; out: plain)
    if key_size <= RSA_OAEP_DIGEST_NUM * digest_len + RSA_OAEP_DIGEST_NUM {
        return Err(UksError::InvalidKeyFile);
    }
    let size = key_size - RSA_OAEP_DIGEST_NUM * digest_len - RSA_OAEP_DIGEST_NUM;
    match cmd {
        CmdId::Encrypt => {
            if in_data.len() > size as usize {
                return Err(UksError::InvalidArgument);
            }
            if out_data.len() < key_size as usize {
                return Err(UksError::BufferTooSmall);
            }
        }
        CmdId::Decrypt => {
            if in_data.len() > key_size as usize {
                return Err(UksError::InvalidArgument);
            }
            if out_data.len() < size as usize {
                return Err(UksError::BufferTooSmall);
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_block_cipher_data(
    cmd: CmdId,
    alg: Algorithm,
    input: &ParamsValues,
    in_data: &[u8],
    out_data: &[u8],
) -> UksResult<()> {
    match input.mode.value() {
        Some(BlockMode::Cbc) | Some(BlockMode::Ctr) | Some(BlockMode::Ecb) => {
            check_block_mode_data(cmd, input.padding_or_none(), in_data, out_data)
        }
        Some(mode) if alg == Algorithm::Aes && mode.is_ae() => {
            check_ae_cipher_data(cmd, in_data, out_data)
        }
        _ => Err(UksError::InvalidMode),
    }
}

fn check_block_mode_data(
    cmd: CmdId,
    padding: Padding,
    in_data: &[u8],
    out_data: &[u8],
) -> UksResult<()> {
    let block = BLOCK_CIPHER_BLOCK_SIZE as usize;
    match cmd {
        CmdId::Encrypt => {
            let mut padding_size = 0usize;
            if padding == Padding::None {
                if in_data.len() % block != 0 {
                    tracing::error!(in_size = in_data.len(), "no-padding input not block aligned");
                    return Err(UksError::InvalidArgument);
                }
            } else {
                padding_size = block - in_data.len() % block;
                if in_data.len() > u32::MAX as usize - padding_size {
                    tracing::error!(in_size = in_data.len(), "padded input size overflows");
                    return Err(UksError::InvalidArgument);
                }
            }
            if out_data.len() < in_data.len() + padding_size {
                tracing::error!(
                    out_size = out_data.len(),
                    need = in_data.len() + padding_size,
                    "encrypt output buffer too small"
                );
                return Err(UksError::BufferTooSmall);
            }
            Ok(())
        }
        CmdId::Decrypt => {
            if in_data.len() % block != 0 {
                tracing::error!(in_size = in_data.len(), "ciphertext not block aligned");
                return Err(UksError::InvalidArgument);
            }
            if out_data.len() < in_data.len() {
                tracing::error!(out_size = out_data.len(), "decrypt output buffer too small");
                return Err(UksError::BufferTooSmall);
            }
            Ok(())
        }
        _ => Err(UksError::InvalidArgument),
    }
}

fn check_ae_cipher_data(cmd: CmdId, in_data: &[u8], out_data: &[u8]) -> UksResult<()> {
    let tag = AE_TAG_LEN as usize;
    match cmd {
        CmdId::Encrypt => {
            // outSize no less than inSize + 16 (tag), with overflow rejected
            if in_data.len() > u32::MAX as usize - tag {
                tracing::error!(in_size = in_data.len(), "input size overflows with tag");
                return Err(UksError::InvalidArgument);
            }
            if out_data.len() < in_data.len() + tag {
                tracing::error!(out_size = out_data.len(), "ae encrypt output too small");
                return Err(UksError::BufferTooSmall);
            }
            Ok(())
        }
        CmdId::Decrypt => {
            // inSize greater than 16 (tag), outSize no less than inSize - 16
            if in_data.len() < tag || out_data.len() < in_data.len() - tag {
                tracing::error!(
                    in_size = in_data.len(),
                    out_size = out_data.len(),
                    "ae decrypt buffer sizes invalid"
                );
                return Err(UksError::BufferTooSmall);
            }
            Ok(())
        }
        _ => Err(UksError::InvalidArgument),
    }
}

fn check_iv_material(params: &ParamSet) -> UksResult<()> {
    let iv = params.get(Tag::Iv).map_err(|_| {
        tracing::error!("cipher iv param missing");
        UksError::CheckGetIvFail
    })?;
    let iv = iv.as_bytes().map_err(|_| UksError::InvalidIv)?;
    if iv.len() != BLOCK_CIPHER_IV_LEN as usize {
        tracing::error!(iv_len = iv.len(), "cbc iv param invalid");
        return Err(UksError::InvalidIv);
    }
    Ok(())
}

fn check_ae_material(mode: BlockMode, params: &ParamSet) -> UksResult<()> {
    check_ae_aad_material(mode, params)?;
    check_ae_nonce_material(mode, params)
}

fn check_ae_aad_material(mode: BlockMode, params: &ParamSet) -> UksResult<()> {
    let aad = params.get(Tag::AssociatedData).map_err(|_| {
        tracing::error!("cipher aad param missing");
        UksError::CheckGetAadFail
    })?;
    let aad = aad.as_bytes().map_err(|_| UksError::InvalidAad)?;
    // gcm: any non-empty aad; ccm: no less than 4 bytes
    if aad.is_empty() {
        return Err(UksError::InvalidAad);
    }
    if mode == BlockMode::Ccm && aad.len() < AES_CCM_AAD_LEN_MIN as usize {
        tracing::error!(aad_len = aad.len(), "ccm aad too short");
        return Err(UksError::InvalidAad);
    }
    Ok(())
}

fn check_ae_nonce_material(mode: BlockMode, params: &ParamSet) -> UksResult<()> {
    let nonce = params.get(Tag::Nonce).map_err(|_| {
        tracing::error!("cipher nonce param missing");
        UksError::CheckGetNonceFail
    })?;
    let nonce = nonce.as_bytes().map_err(|_| UksError::InvalidNonce)?;
    if nonce.is_empty() {
        return Err(UksError::InvalidNonce);
    }
    match mode {
        BlockMode::Gcm => {
            if nonce.len() < AES_GCM_NONCE_LEN_MIN as usize {
                tracing::error!(nonce_len = nonce.len(), "gcm nonce too short");
                return Err(UksError::InvalidNonce);
            }
        }
        BlockMode::Ccm => {
            if nonce.len() < AES_CCM_NONCE_LEN_MIN as usize
                || nonce.len() > AES_CCM_NONCE_LEN_MAX as usize
            {
                tracing::error!(nonce_len = nonce.len(), "ccm nonce length invalid");
                return Err(UksError::InvalidNonce);
            }
        }
        _ => {}
    }
    Ok(())
}

impl ParamValidator {
    /// Finish-time output sizing for the three-stage cipher engine.
    ///
    /// Differs from [`ParamValidator::check_cipher_data`] in that an RSA
    /// input has already been accumulated across updates, so only the output
    /// bound applies, and an AE decrypt input no longer carries the tag.
    #[allow(clippy::too_many_arguments)]
    pub fn check_finish_out_size(
        &self,
        is_encrypt: bool,
        alg: Algorithm,
        key_size_bits: u32,
        padding: Padding,
        digest: Digest,
        mode: Option<BlockMode>,
        in_data: &[u8],
        out_data: &[u8],
    ) -> UksResult<()> {
        match alg {
            Algorithm::Rsa => {
                check_rsa_finish_out_size(is_encrypt, key_size_bits, padding, digest, out_data)
            }
            Algorithm::Aes | Algorithm::Sm4 => {
                check_block_finish_out_size(is_encrypt, alg, mode, padding, in_data, out_data)
            }
            _ => Err(UksError::InvalidAlgorithm),
        }
    }
}

fn check_rsa_finish_out_size(
    is_encrypt: bool,
    key_size_bits: u32,
    padding: Padding,
    digest: Digest,
    out_data: &[u8],
) -> UksResult<()> {
    let key_size = key_bytes_floor(key_size_bits);
    match padding {
        Padding::None => {
            if out_data.len() < key_size as usize {
                return Err(UksError::BufferTooSmall);
            }
            Ok(())
        }
        Padding::Oaep => {
            let digest = if digest == Digest::None {
                Digest::Sha1
            } else {
                digest
            };
            let digest_len = digest_len(digest)?;
            if key_size <= RSA_OAEP_DIGEST_NUM * digest_len + RSA_OAEP_DIGEST_NUM {
                return Err(UksError::InvalidKeyFile);
            }
            let size = key_size - RSA_OAEP_DIGEST_NUM * digest_len - RSA_OAEP_DIGEST_NUM;
            let need = if is_encrypt { key_size } else { size };
            if out_data.len() < need as usize {
                return Err(UksError::BufferTooSmall);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// Finish-time block cipher output bound; the AE decrypt input no longer
// carries the tag at this point, so the output must cover the full input.
fn check_block_finish_out_size(
    is_encrypt: bool,
    alg: Algorithm,
    mode: Option<BlockMode>,
    padding: Padding,
    in_data: &[u8],
    out_data: &[u8],
) -> UksResult<()> {
    match mode {
        Some(BlockMode::Cbc) | Some(BlockMode::Ctr) | Some(BlockMode::Ecb) => {
            let cmd = if is_encrypt {
                CmdId::Encrypt
            } else {
                CmdId::Decrypt
            };
            check_block_mode_data(cmd, padding, in_data, out_data)
        }
        Some(mode) if alg == Algorithm::Aes && mode.is_ae() => {
            if is_encrypt {
                check_ae_cipher_data(CmdId::Encrypt, in_data, out_data)
            } else if out_data.len() < in_data.len() {
                tracing::error!(out_size = out_data.len(), "ae final output too small");
                Err(UksError::BufferTooSmall)
            } else {
                Ok(())
            }
        }
        _ => Err(UksError::NotSupported),
    }
}
