use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ed_on_bn254::Fq;
use ark_ff::PrimeField;
use once_cell::sync::Lazy;

/// Returns a Poseidon configuration for the given field
///
/// Round numbers follow the standard recommendation for alpha = 5 at 128-bit
/// security with a width-3 state (rate 2, capacity 1). Round constants and the
/// MDS matrix are derived with the Grain LFSR, so two independently running
/// provers always agree on the permutation.
pub fn poseidon_config<F: PrimeField>() -> PoseidonConfig<F> {
    let full_rounds = 8;
    let partial_rounds = 57;
    let alpha = 5;
    let rate = 2;
    let capacity = 1;

    let (ark, mds) = find_poseidon_ark_and_mds::<F>(
        F::MODULUS_BIT_SIZE as u64,
        rate,
        full_rounds,
        partial_rounds,
        0, // skip_matrices
    );

    PoseidonConfig::new(
        full_rounds as usize,
        partial_rounds as usize,
        alpha,
        mds,
        ark,
        rate,
        capacity,
    )
}

static CREDENTIAL_POSEIDON: Lazy<PoseidonConfig<Fq>> = Lazy::new(poseidon_config::<Fq>);

/// The Poseidon configuration used for credential hashing and EdDSA challenges
/// over the BN254 scalar field (the Baby Jubjub base field).
///
/// Cached because Grain LFSR parameter generation is not free and every
/// component (issuer, native verifier, circuit) must use the same constants.
pub fn credential_poseidon_config() -> &'static PoseidonConfig<Fq> {
    &CREDENTIAL_POSEIDON
}
