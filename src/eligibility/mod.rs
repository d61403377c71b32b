//! Eligibility constraint set and proof-generation pipeline

pub mod circuit;
pub mod proof_system;
pub mod signals;

use std::fmt;
use std::str::FromStr;

use ark_ed_on_bn254::Fq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressError;

pub use circuit::EligibilityCircuit;
pub use proof_system::{EligibilityProofSystem, ProofArtifact, ProveRequest};
pub use signals::PublicSignals;

/// An eth-style 20-byte account address, used as the submitting-account
/// binding in the public signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EthAddress([u8; 20]);

impl EthAddress {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lift the address into the field (big-endian, as on-chain integers
    /// read). 160 bits always fit below the BN254 scalar modulus.
    pub fn to_field(&self) -> Fq {
        use ark_ff::PrimeField;
        Fq::from_be_bytes_mod_order(&self.0)
    }
}

impl FromStr for EthAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        let bytes: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Public election parameters, fixed at contract deployment and immutable for
/// the election's lifetime.
///
/// `min_birth_date` is a `YYYYMMDD` cutoff: a voter is eligible when their
/// numeric birth date is less than or equal to it (earlier date = older
/// voter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCriteria {
    pub allowed_city: u64,
    pub allowed_region: u64,
    pub min_birth_date: u32,
    pub election_id: u64,
    pub contract_address: EthAddress,
}

impl ElectionCriteria {
    pub fn allowed_city_field(&self) -> Fq {
        Fq::from(self.allowed_city)
    }

    pub fn allowed_region_field(&self) -> Fq {
        Fq::from(self.allowed_region)
    }

    pub fn min_birth_date_field(&self) -> Fq {
        Fq::from(self.min_birth_date as u64)
    }

    pub fn election_id_field(&self) -> Fq {
        Fq::from(self.election_id)
    }
}
