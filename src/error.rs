//! Error taxonomy for the eligibility protocol
//!
//! The split matters to callers: an [`IneligibilityError`] is an expected,
//! first-class outcome ("you are not eligible"), while an
//! [`InfrastructureError`] means something in the proving machinery broke and
//! the call may be retried. Retrying an ineligibility failure without changing
//! the input is pointless, because proof generation is deterministic.

use ark_relations::gr1cs::SynthesisError;
use thiserror::Error;

/// Malformed raw voter record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("attribute vector must have exactly {expected} elements, got {got}")]
    WrongArity { expected: usize, got: usize },
}

/// No satisfying witness exists for the eligibility constraints.
///
/// Each variant names the first constraint the native pre-check found
/// violated; the circuit enforces the same predicate, so a request that fails
/// here would also fail witness generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IneligibilityError {
    #[error("voter secret key does not control the credential's public key")]
    KeyOwnership,

    #[error("authority signature does not cover this credential")]
    InvalidSignature,

    #[error("credential city does not match the election's allowed city")]
    CityMismatch,

    #[error("credential region does not match the election's allowed region")]
    RegionMismatch,

    #[error("voter was born after the eligibility cutoff date")]
    BornAfterCutoff,

    #[error("vote choice {choice} is out of range (candidates: {num_candidates})")]
    VoteChoiceOutOfRange { choice: u32, num_candidates: u32 },

    #[error("witness does not satisfy the eligibility constraint system")]
    UnsatisfiedConstraints,
}

/// Failures of the proving machinery itself: missing or corrupt key material,
/// I/O, constraint synthesis. Retryable by the caller.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] ark_serialize::SerializationError),

    #[error("constraint synthesis error: {0}")]
    Synthesis(SynthesisError),

    #[error("invalid key material: {0}")]
    KeyMaterial(#[from] hex::FromHexError),

    #[error("proving key not found at {0}")]
    ProvingKeyMissing(String),
}

/// Malformed eth-style account address.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("invalid hex in address: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("address must be 20 bytes, got {0}")]
    Length(usize),
}

/// Umbrella error for the proof-generation pipeline.
#[derive(Error, Debug)]
pub enum ProveError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("voter is not eligible: {0}")]
    Ineligible(#[from] IneligibilityError),

    #[error("proving infrastructure failure: {0}")]
    Infrastructure(#[from] InfrastructureError),
}

impl ProveError {
    /// Classify a synthesis error out of the prover. An unsatisfiable system
    /// or missing assignment means the witness could not be completed, which
    /// is an eligibility outcome; anything else is infrastructure.
    pub(crate) fn from_synthesis(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Unsatisfiable | SynthesisError::AssignmentMissing => {
                ProveError::Ineligible(IneligibilityError::UnsatisfiedConstraints)
            }
            other => ProveError::Infrastructure(InfrastructureError::Synthesis(other)),
        }
    }
}

/// Public signals presented with a proof do not match the verifier's own
/// stored election parameters. Detected by the verifying side, not the
/// prover; the named field is the first mismatch found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("public signals do not match verifier parameters: {field}")]
pub struct BindingMismatchError {
    pub field: &'static str,
}
