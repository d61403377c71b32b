//! Conversions between the Baby Jubjub scalar field and its base field
//!
//! The circuit operates over the BN254 scalar field (the Baby Jubjub base
//! field), while signatures and secret keys live in the Baby Jubjub scalar
//! field. Scalars are smaller than the base field modulus, so lifting is
//! lossless; the reverse direction reduces modulo the scalar field order.

use ark_ff::{BigInteger, PrimeField};

/// Lift a scalar-field element into the base field. Lossless, because the
/// Baby Jubjub subgroup order is smaller than the BN254 scalar field modulus.
pub fn scalar_to_base_field<S: PrimeField, B: PrimeField>(scalar: &S) -> B {
    B::from_le_bytes_mod_order(&scalar.into_bigint().to_bytes_le())
}

/// Reduce a base-field element into the scalar field modulo the subgroup
/// order. Used to turn Poseidon sponge output (base field) into a signing
/// scalar.
pub fn base_to_scalar_field<B: PrimeField, S: PrimeField>(base: &B) -> S {
    S::from_le_bytes_mod_order(&base.into_bigint().to_bytes_le())
}
