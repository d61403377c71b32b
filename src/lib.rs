//! Anonymous voter eligibility proofs
//!
//! A voter proves, without revealing identity, that an authority-issued
//! credential satisfies an election's residency and age rules and that the
//! vote is bound to one election and one submitting account. The pipeline:
//! raw voter record → attribute encoding → authority signature → Groth16
//! proof over BN254 with Baby Jubjub EdDSA inside the circuit.

pub mod attributes;
pub mod authority;
pub mod config;
pub mod credential;
pub mod eddsa;
pub mod eligibility;
pub mod error;
pub mod field_conversion;

pub use config::{credential_poseidon_config, poseidon_config};
pub use error::{
    BindingMismatchError, EncodingError, IneligibilityError, InfrastructureError, ProveError,
};
