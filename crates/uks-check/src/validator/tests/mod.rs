// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod fixed_params;
mod ops;

use crate::*;

pub(crate) fn validator() -> ParamValidator {
    ParamValidator::default()
}

pub(crate) fn params(entries: Vec<Param>) -> ParamSet {
    ParamSet::from_params(entries).expect("build param set")
}

pub(crate) fn u32p(tag: Tag, value: u32) -> Param {
    Param::u32(tag, value)
}

pub(crate) fn bytesp(tag: Tag, value: Vec<u8>) -> Param {
    Param::bytes(tag, value)
}
