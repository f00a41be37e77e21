// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Table-driven parameter validation.
//!
//! [`ParamValidator`] holds the immutable expectation tables for one
//! capability configuration. Lookups are keyed by (algorithm, check type);
//! an algorithm outside the capability set fails `NotSupported` at runtime
//! instead of being compiled away, so one binary covers every deployment
//! shape.

mod cipher;
mod ops;
mod signature;

use std::collections::BTreeMap;

use crate::tables;
use crate::Algorithm;
use crate::BlockMode;
use crate::CapabilitySet;
use crate::CheckType;
use crate::Digest;
use crate::ExpectParamsValues;
use crate::ExpectValues;
use crate::FieldValue;
use crate::Padding;
use crate::Param;
use crate::ParamSet;
use crate::ParamsShape;
use crate::ParamsValues;
use crate::Purpose;
use crate::Tag;
use crate::UksError;
use crate::UksResult;

const ALL_CHECK_TYPES: [CheckType; 4] = [
    CheckType::GenKey,
    CheckType::UseKey,
    CheckType::GenMacKey,
    CheckType::GenDeriveKey,
];

/// Validates caller-supplied parameter sets against per-algorithm tables.
///
/// Construction selects the table rows for the enabled algorithms; the
/// resulting value is immutable and safe to share between sessions.
#[derive(Debug, Clone)]
pub struct ParamValidator {
    caps: CapabilitySet,
    rules: BTreeMap<(Algorithm, CheckType), (ParamsShape, ExpectParamsValues)>,
}

impl ParamValidator {
    /// Builds the validator for one capability configuration.
    pub fn new(caps: CapabilitySet) -> Self {
        let mut rules = BTreeMap::new();
        for &alg in tables::GEN_KEY_ALGS {
            if !caps.supports(alg) {
                continue;
            }
            for check_type in ALL_CHECK_TYPES {
                if let (Some(shape), Some(expect)) = (
                    tables::input_shape(alg, check_type),
                    tables::expect_params(alg, check_type),
                ) {
                    rules.insert((alg, check_type), (shape, expect));
                }
            }
        }
        ParamValidator { caps, rules }
    }

    /// The capability set this validator was built for.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.caps
    }

    fn rules(&self, alg: Algorithm, check_type: CheckType) -> UksResult<&(ParamsShape, ExpectParamsValues)> {
        if !self.caps.supports(alg) {
            tracing::error!(?alg, "algorithm not in capability set");
            return Err(UksError::NotSupported);
        }
        self.rules.get(&(alg, check_type)).ok_or_else(|| {
            tracing::error!(?alg, ?check_type, "no expectation table row");
            UksError::NotSupported
        })
    }

    /// Returns the expected-value row for an (algorithm, check-type) pair.
    pub fn get_expect_params(
        &self,
        alg: Algorithm,
        check_type: CheckType,
    ) -> UksResult<ExpectParamsValues> {
        Ok(self.rules(alg, check_type)?.1)
    }

    /// Extracts the validated field values from a parameter set.
    ///
    /// Mandatory fields (key length, purpose) fail with their specific
    /// `CheckGet*Fail` code when absent; optional fields (padding, digest,
    /// mode) record absence and succeed.
    pub fn get_input_params(
        &self,
        alg: Algorithm,
        check_type: CheckType,
        params: &ParamSet,
    ) -> UksResult<ParamsValues> {
        let shape = self.rules(alg, check_type)?.0;
        let mut input = ParamsValues::default();

        if shape.key_len {
            let value = params.get_u32(Tag::KeySize).map_err(|_| {
                tracing::error!("key size tag missing");
                UksError::CheckGetKeySizeFail
            })?;
            input.key_len = FieldValue::Present(value);
        }
        if shape.purpose {
            let value = params.get_u32(Tag::Purpose).map_err(|_| {
                tracing::error!("purpose tag missing");
                UksError::CheckGetPurposeFail
            })?;
            input.purpose = FieldValue::Present(Purpose::try_from(value)?);
        }
        input.padding =
            optional_field::<Padding>(params, Tag::Padding, shape.padding, UksError::CheckGetPaddingFail)?;
        input.digest =
            optional_field::<Digest>(params, Tag::Digest, shape.digest, UksError::CheckGetDigestFail)?;
        input.mode =
            optional_field::<BlockMode>(params, Tag::BlockMode, shape.mode, UksError::CheckGetModeFail)?;
        Ok(input)
    }

    /// Checks every extracted field against the expectation whitelists.
    ///
    /// A field the table does not require is never examined, regardless of
    /// whether the caller supplied it; an absent optional field is compliant.
    pub fn check_fixed_params(
        &self,
        alg: Algorithm,
        check_type: CheckType,
        input: &ParamsValues,
    ) -> UksResult<()> {
        let expect = self.get_expect_params(alg, check_type)?;
        check_field(&expect.key_len, &input.key_len, UksError::InvalidKeySize)?;
        check_field(&expect.padding, &input.padding, UksError::InvalidPadding)?;
        check_field(&expect.purpose, &input.purpose, UksError::InvalidPurpose)?;
        check_field(&expect.digest, &input.digest, UksError::InvalidDigest)?;
        check_field(&expect.mode, &input.mode, UksError::InvalidMode)?;
        Ok(())
    }

    /// Validates a generation-time purpose mask.
    ///
    /// The mask must touch exactly one of the six capability groups and must
    /// not intersect the algorithm's forbidden-purpose mask.
    pub fn check_gen_key_purpose(&self, alg: Algorithm, purpose: Purpose) -> UksResult<()> {
        check_purpose_unique(purpose)?;
        let invalid = tables::INVALID_PURPOSES
            .iter()
            .find(|(entry, _)| *entry == alg)
            .map(|(_, mask)| *mask)
            .ok_or(UksError::InvalidAlgorithm)?;
        if purpose.intersects(invalid) {
            tracing::error!(?alg, ?purpose, "purpose forbidden for algorithm");
            return Err(UksError::InvalidPurpose);
        }
        Ok(())
    }

    /// Generation-time check of a single optional tag against the tables.
    ///
    /// Used when parameters arrive one at a time rather than as an extracted
    /// [`ParamsValues`]. Any failure reports the tag's `CheckGet*Fail` code.
    pub fn check_optional_param(
        &self,
        tag: Tag,
        alg: Algorithm,
        purpose: Purpose,
        is_absent: bool,
        param: &Param,
    ) -> UksResult<()> {
        let mut check_type = CheckType::GenKey;
        if purpose.intersects(Purpose::DERIVE.union(Purpose::MAC)) {
            if !matches!(alg, Algorithm::Aes | Algorithm::Hmac | Algorithm::Sm3) {
                tracing::error!(?alg, "mac/derive key generation limited to aes, hmac and sm3");
                return Err(UksError::InvalidPurpose);
            }
            check_type = if purpose == Purpose::DERIVE {
                CheckType::GenDeriveKey
            } else {
                CheckType::GenMacKey
            };
        }
        let expect = self.get_expect_params(alg, check_type)?;
        match tag {
            Tag::BlockMode => single_param_check::<BlockMode>(
                &expect.mode,
                is_absent,
                param,
                UksError::CheckGetModeFail,
            ),
            Tag::Digest => single_param_check::<Digest>(
                &expect.digest,
                is_absent,
                param,
                UksError::CheckGetDigestFail,
            ),
            Tag::Padding => single_param_check::<Padding>(
                &expect.padding,
                is_absent,
                param,
                UksError::CheckGetPaddingFail,
            ),
            _ => {
                tracing::error!(?tag, "tag has no optional-param rule");
                Err(UksError::Failure)
            }
        }
    }

    /// Reads and validates the key size stored in a key's parameter set.
    pub fn get_key_size(&self, alg: Algorithm, key_params: &ParamSet) -> UksResult<u32> {
        if !self.caps.supports(alg) {
            return Err(UksError::NotSupported);
        }
        key_params.validate().map_err(|_| UksError::InvalidKeyFile)?;
        let key_size = key_params
            .get_u32(Tag::KeySize)
            .map_err(|_| UksError::InvalidKeyFile)?;
        match tables::key_size_whitelist(alg) {
            Some(whitelist) => {
                if !whitelist.contains(&key_size) {
                    tracing::error!(key_size, "key size not expected");
                    return Err(UksError::InvalidKeyFile);
                }
            }
            // DSA keys carry arbitrary sizes; everything else has no stored
            // key-size rule and cannot be queried this way.
            None if alg == Algorithm::Dsa => {}
            None => return Err(UksError::InvalidAlgorithm),
        }
        Ok(key_size)
    }

    /// Whether the algorithm/digest combination requires whole-message
    /// buffering instead of incremental hashing.
    ///
    /// ED25519 signs the raw message, and with `Digest::None` the caller has
    /// already hashed, so both accumulate.
    pub fn check_need_cache(&self, alg: Algorithm, digest: Digest) -> bool {
        alg == Algorithm::Ed25519 || digest == Digest::None
    }

    /// Validates the user-authentication binding parameters.
    pub fn check_user_auth_params(
        &self,
        user_auth_type: u32,
        auth_access_type: u32,
        challenge_type: u32,
    ) -> UksResult<()> {
        if !tables::USER_AUTH_TYPES.contains(&user_auth_type) {
            return Err(UksError::InvalidAuthType);
        }
        if !tables::CHALLENGE_TYPES.contains(&challenge_type) {
            return Err(UksError::InvalidChallengeType);
        }
        for (auth_type, allowed) in tables::AUTH_ACCESS_CHECKERS {
            if (auth_type & user_auth_type) != 0
                && !allowed.iter().any(|bit| (bit & auth_access_type) != 0)
            {
                tracing::error!(user_auth_type, auth_access_type, "access type not valid");
                return Err(UksError::InvalidAccessType);
            }
        }
        Ok(())
    }

    /// Validates the secure-sign type parameter.
    pub fn check_secure_sign_params(&self, secure_sign_type: u32) -> UksResult<()> {
        if tables::SECURE_SIGN_TYPES.contains(&secure_sign_type) {
            Ok(())
        } else {
            Err(UksError::InvalidSecureSignType)
        }
    }
}

impl Default for ParamValidator {
    fn default() -> Self {
        ParamValidator::new(CapabilitySet::all())
    }
}

fn optional_field<T>(
    params: &ParamSet,
    tag: Tag,
    need_check: bool,
    get_fail: UksError,
) -> UksResult<FieldValue<T>>
where
    T: TryFrom<u32, Error = UksError>,
{
    if !need_check {
        return Ok(FieldValue::Unchecked);
    }
    match params.get(tag) {
        Ok(param) => {
            let raw = param.as_u32().map_err(|_| get_fail)?;
            Ok(FieldValue::Present(T::try_from(raw)?))
        }
        Err(UksError::ParamNotExist) => {
            tracing::info!(?tag, "optional tag absent, accepted");
            Ok(FieldValue::Absent)
        }
        Err(_) => Err(get_fail),
    }
}

fn check_field<T: Copy + PartialEq>(
    expect: &ExpectValues<T>,
    input: &FieldValue<T>,
    mismatch: UksError,
) -> UksResult<()> {
    if !expect.need_check {
        return Ok(());
    }
    if let FieldValue::Present(value) = input {
        if !expect.values.contains(value) {
            tracing::error!("fixed param value not expected");
            return Err(mismatch);
        }
    }
    Ok(())
}

fn single_param_check<T>(
    expect: &ExpectValues<T>,
    is_absent: bool,
    param: &Param,
    fail: UksError,
) -> UksResult<()>
where
    T: Copy + PartialEq + TryFrom<u32, Error = UksError>,
{
    if !expect.need_check {
        return Ok(());
    }
    if is_absent {
        tracing::error!("param absent but necessary");
        return Err(fail);
    }
    let value = T::try_from(param.as_u32().map_err(|_| fail)?).map_err(|_| fail)?;
    if !expect.values.contains(&value) {
        return Err(fail);
    }
    Ok(())
}

fn check_purpose_unique(purpose: Purpose) -> UksResult<()> {
    let groups = [
        Purpose::ENCRYPT.union(Purpose::DECRYPT),
        Purpose::SIGN.union(Purpose::VERIFY),
        Purpose::DERIVE,
        Purpose::WRAP.union(Purpose::UNWRAP),
        Purpose::MAC,
        Purpose::AGREE,
    ];
    let count = groups
        .iter()
        .filter(|group| purpose.intersects(**group))
        .count();
    if count == 1 {
        Ok(())
    } else {
        tracing::error!(?purpose, "purpose not unique to one capability group");
        Err(UksError::InvalidPurpose)
    }
}

#[cfg(test)]
mod tests;
