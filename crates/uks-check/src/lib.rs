// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parameter validation core for the universal key store engine.
//!
//! This crate decides, for a given algorithm and operation context, whether a
//! caller-supplied parameter set is well formed, and computes the derived
//! sizes (digest lengths, cipher buffer sizes, signature sizes) that gate
//! every cryptographic operation before it reaches a primitive backend.
//!
//! The crate is a leaf: it performs no cryptography and holds no session
//! state. Its expectation tables are built once from a [`CapabilitySet`] and
//! never mutated, so a [`ParamValidator`] can be shared freely between
//! concurrent sessions.

mod caps;
mod error;
mod param;
mod shape;
mod tables;
mod types;
mod validator;
mod wrapped;

pub use caps::*;
pub use error::*;
pub use param::*;
pub use shape::*;
pub use types::*;
pub use validator::*;
pub use wrapped::*;
