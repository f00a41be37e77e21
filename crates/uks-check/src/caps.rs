// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Build-time capability negotiation, expressed as a runtime value.
//!
//! Deployments compile the key store with different algorithm subsets. The
//! validator takes the enabled set as a constructor argument; a lookup for an
//! algorithm outside the set fails with `NotSupported`, keeping one testable
//! binary for every capability combination.

use std::collections::BTreeSet;

use crate::Algorithm;

/// The set of algorithms a validator instance supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    algorithms: BTreeSet<Algorithm>,
}

impl CapabilitySet {
    const ALL: [Algorithm; 14] = [
        Algorithm::Rsa,
        Algorithm::Ecc,
        Algorithm::Dsa,
        Algorithm::Aes,
        Algorithm::Hmac,
        Algorithm::Hkdf,
        Algorithm::Pbkdf2,
        Algorithm::Ecdh,
        Algorithm::X25519,
        Algorithm::Ed25519,
        Algorithm::Dh,
        Algorithm::Sm2,
        Algorithm::Sm3,
        Algorithm::Sm4,
    ];

    /// Every algorithm enabled.
    pub fn all() -> Self {
        CapabilitySet {
            algorithms: Self::ALL.into_iter().collect(),
        }
    }

    /// No algorithm enabled.
    pub fn none() -> Self {
        CapabilitySet {
            algorithms: BTreeSet::new(),
        }
    }

    /// Enables one algorithm.
    pub fn with(mut self, algorithm: Algorithm) -> Self {
        self.algorithms.insert(algorithm);
        self
    }

    /// Disables one algorithm.
    pub fn without(mut self, algorithm: Algorithm) -> Self {
        self.algorithms.remove(&algorithm);
        self
    }

    /// Whether an algorithm is enabled.
    pub fn supports(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        CapabilitySet::all()
    }
}
