//! Deterministic EdDSA over Baby Jubjub, keyed to the Poseidon sponge
//!
//! The signature's internal hashing uses the same Poseidon family as the
//! credential hash it signs; the in-circuit verifier recomputes the identical
//! challenge, which is what makes signature verification expressible inside
//! the constraint system at all.

pub mod gadgets;
pub mod native;

use crate::poseidon_config;
use ark_crypto_primitives::sponge::poseidon::PoseidonSponge;
use ark_crypto_primitives::sponge::{
    Absorb, CryptographicSponge, FieldBasedCryptographicSponge,
};
use ark_ed_on_bn254::{EdwardsAffine, Fr};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

pub use native::{derive_public_key, sign, verify};

/// Domain separation tag for deterministic nonce derivation.
pub const DST_NONCE: &[u8] = b"BJJ-EDDSA-NONCE-v1";

/// Precomputed domain separation tag digest for nonce derivation
pub fn dst_nonce_digest<F: PrimeField + Absorb>() -> F {
    let config = poseidon_config::<F>();
    let mut sponge = PoseidonSponge::new(&config);
    for byte in DST_NONCE {
        sponge.absorb(&F::from(*byte as u64));
    }
    sponge.squeeze_native_field_elements(1)[0]
}

/// An EdDSA signature `(R8, S)` over a single base-field message element.
///
/// `R8` is the nonce commitment on the curve; `S = r + H(R8, A, msg) * sk`
/// in the prime-order subgroup's scalar field.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct EddsaSignature {
    pub r8: EdwardsAffine,
    pub s: Fr,
}
