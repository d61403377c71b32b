//! Native EdDSA implementation (off-circuit)

use super::{dst_nonce_digest, EddsaSignature};
use crate::field_conversion::{base_to_scalar_field, scalar_to_base_field};
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fq, Fr};

const LOG_TARGET: &str = "eddsa::native";

/// Derive the public key `sk * B` on the prime-order subgroup generator.
pub fn derive_public_key(sk: &Fr) -> EdwardsAffine {
    (EdwardsProjective::generator() * sk).into_affine()
}

/// Poseidon challenge `hm = H(R8.x, R8.y, A.x, A.y, msg)` over the base field.
///
/// The circuit gadget absorbs the same five elements in the same order; any
/// divergence here makes in-circuit verification impossible.
pub(crate) fn challenge(
    config: &PoseidonConfig<Fq>,
    r8: &EdwardsAffine,
    public_key: &EdwardsAffine,
    msg: &Fq,
) -> Fq {
    let mut sponge = PoseidonSponge::new(config);
    sponge.absorb(&r8.x);
    sponge.absorb(&r8.y);
    sponge.absorb(&public_key.x);
    sponge.absorb(&public_key.y);
    sponge.absorb(msg);
    sponge.squeeze_native_field_elements(1)[0]
}

/// Deterministic nonce `r = H(dst, sk, msg)` reduced into the scalar field.
///
/// Off-circuit only; the circuit never sees the nonce, only `R8`.
fn nonce(config: &PoseidonConfig<Fq>, sk: &Fr, msg: &Fq) -> Fr {
    let mut sponge = PoseidonSponge::new(config);
    sponge.absorb(&dst_nonce_digest::<Fq>());
    sponge.absorb(&scalar_to_base_field::<Fr, Fq>(sk));
    sponge.absorb(msg);
    base_to_scalar_field(&sponge.squeeze_native_field_elements(1)[0])
}

/// Sign a single base-field message element.
///
/// Deterministic: the same `(sk, msg)` pair always yields the same signature,
/// so re-issuing a credential is idempotent.
pub fn sign(config: &PoseidonConfig<Fq>, sk: &Fr, msg: &Fq) -> EddsaSignature {
    let public_key = derive_public_key(sk);

    let r = nonce(config, sk, msg);
    let r8 = (EdwardsProjective::generator() * r).into_affine();

    let hm = challenge(config, &r8, &public_key, msg);
    let s = r + base_to_scalar_field::<Fq, Fr>(&hm) * sk;

    tracing::trace!(target: LOG_TARGET, "signed message element");
    EddsaSignature { r8, s }
}

/// Verify `S * B == R8 + hm * A`.
///
/// Both sides live in the prime-order subgroup, so scalar-multiplying `A` by
/// the full-width challenge integer agrees with the subgroup-order reduction
/// used at signing time.
pub fn verify(
    config: &PoseidonConfig<Fq>,
    public_key: &EdwardsAffine,
    msg: &Fq,
    signature: &EddsaSignature,
) -> bool {
    let hm = challenge(config, &signature.r8, public_key, msg);
    let lhs = EdwardsProjective::generator() * signature.s;
    let rhs = *public_key * base_to_scalar_field::<Fq, Fr>(&hm) + signature.r8;

    let ok = lhs == rhs;
    if !ok {
        tracing::debug!(target: LOG_TARGET, "signature verification failed");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credential_poseidon_config;
    use ark_ff::UniformRand;

    #[test]
    fn sign_verify_roundtrip() {
        let mut rng = ark_std::test_rng();
        let cfg = credential_poseidon_config();

        let sk = Fr::rand(&mut rng);
        let pk = derive_public_key(&sk);
        let msg = Fq::rand(&mut rng);

        let sig = sign(cfg, &sk, &msg);
        assert!(verify(cfg, &pk, &msg, &sig));
    }

    #[test]
    fn signing_is_deterministic() {
        let mut rng = ark_std::test_rng();
        let cfg = credential_poseidon_config();

        let sk = Fr::rand(&mut rng);
        let msg = Fq::rand(&mut rng);

        assert_eq!(sign(cfg, &sk, &msg), sign(cfg, &sk, &msg));
    }

    #[test]
    fn tampered_message_fails() {
        let mut rng = ark_std::test_rng();
        let cfg = credential_poseidon_config();

        let sk = Fr::rand(&mut rng);
        let pk = derive_public_key(&sk);
        let msg = Fq::rand(&mut rng);

        let sig = sign(cfg, &sk, &msg);
        let other = msg + Fq::from(1u64);
        assert!(!verify(cfg, &pk, &other, &sig));
    }

    #[test]
    fn wrong_public_key_fails() {
        let mut rng = ark_std::test_rng();
        let cfg = credential_poseidon_config();

        let sk = Fr::rand(&mut rng);
        let other_pk = derive_public_key(&Fr::rand(&mut rng));
        let msg = Fq::rand(&mut rng);

        let sig = sign(cfg, &sk, &msg);
        assert!(!verify(cfg, &other_pk, &msg, &sig));
    }
}
