//! In-circuit EdDSA verification gadget

use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ec::PrimeGroup;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::{EdwardsProjective, Fq};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::gr1cs::{ConstraintSystemRef, SynthesisError};

/// Allocated form of an [`super::EddsaSignature`]: the nonce commitment as a
/// curve variable and `S` lifted into the base field (the subgroup order is
/// below the base-field modulus, so the lift is lossless).
pub struct EddsaSignatureVar {
    pub r8: EdwardsVar,
    pub s: FpVar<Fq>,
}

/// Enforce `S * B == R8 + hm * A` with `hm` recomputed by the in-circuit
/// Poseidon sponge, mirroring [`super::native::challenge`] element for
/// element.
///
/// Scalar multiplications run over little-endian bit decompositions; the
/// challenge is used at full field width, which agrees with the native
/// subgroup-order reduction because `A` and `B` have prime order.
pub fn enforce_signature(
    cs: ConstraintSystemRef<Fq>,
    config: &PoseidonConfig<Fq>,
    public_key: &EdwardsVar,
    msg: &FpVar<Fq>,
    signature: &EddsaSignatureVar,
) -> Result<(), SynthesisError> {
    let mut sponge = PoseidonSpongeVar::new(cs, config);
    sponge.absorb(&signature.r8.x)?;
    sponge.absorb(&signature.r8.y)?;
    sponge.absorb(&public_key.x)?;
    sponge.absorb(&public_key.y)?;
    sponge.absorb(msg)?;
    let hm = sponge.squeeze_field_elements(1)?[0].clone();

    let base = EdwardsVar::constant(EdwardsProjective::generator());

    let s_bits = signature.s.to_bits_le()?;
    let lhs = base.scalar_mul_le(s_bits.iter())?;

    let hm_bits = hm.to_bits_le()?;
    let rhs = signature.r8.clone() + public_key.scalar_mul_le(hm_bits.iter())?;

    lhs.enforce_equal(&rhs)
}

/// Enforce `sk * B == pk`: the prover controls the credential's bound key.
pub fn enforce_key_ownership(
    secret_key: &FpVar<Fq>,
    public_key: &EdwardsVar,
) -> Result<(), SynthesisError> {
    let base = EdwardsVar::constant(EdwardsProjective::generator());
    let sk_bits = secret_key.to_bits_le()?;
    let derived = base.scalar_mul_le(sk_bits.iter())?;
    derived.enforce_equal(public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credential_poseidon_config;
    use crate::eddsa::native::{derive_public_key, sign};
    use crate::field_conversion::scalar_to_base_field;
    use ark_ed_on_bn254::Fr;
    use ark_ff::UniformRand;
    use ark_relations::gr1cs::ConstraintSystem;

    fn allocate_signature(
        cs: ConstraintSystemRef<Fq>,
        sig: &crate::eddsa::EddsaSignature,
    ) -> EddsaSignatureVar {
        EddsaSignatureVar {
            r8: EdwardsVar::new_witness(cs.clone(), || Ok(EdwardsProjective::from(sig.r8)))
                .unwrap(),
            s: FpVar::new_witness(cs, || Ok(scalar_to_base_field::<Fr, Fq>(&sig.s))).unwrap(),
        }
    }

    #[test]
    fn valid_signature_satisfies_constraints() {
        let mut rng = ark_std::test_rng();
        let cfg = credential_poseidon_config();

        let sk = Fr::rand(&mut rng);
        let pk = derive_public_key(&sk);
        let msg = Fq::rand(&mut rng);
        let sig = sign(cfg, &sk, &msg);

        let cs = ConstraintSystem::<Fq>::new_ref();
        let pk_var =
            EdwardsVar::new_witness(cs.clone(), || Ok(EdwardsProjective::from(pk))).unwrap();
        let msg_var = FpVar::new_witness(cs.clone(), || Ok(msg)).unwrap();
        let sig_var = allocate_signature(cs.clone(), &sig);

        enforce_signature(cs.clone(), cfg, &pk_var, &msg_var, &sig_var).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn tampered_message_violates_constraints() {
        let mut rng = ark_std::test_rng();
        let cfg = credential_poseidon_config();

        let sk = Fr::rand(&mut rng);
        let pk = derive_public_key(&sk);
        let msg = Fq::rand(&mut rng);
        let sig = sign(cfg, &sk, &msg);

        let cs = ConstraintSystem::<Fq>::new_ref();
        let pk_var =
            EdwardsVar::new_witness(cs.clone(), || Ok(EdwardsProjective::from(pk))).unwrap();
        let other = msg + Fq::from(1u64);
        let msg_var = FpVar::new_witness(cs.clone(), || Ok(other)).unwrap();
        let sig_var = allocate_signature(cs.clone(), &sig);

        enforce_signature(cs.clone(), cfg, &pk_var, &msg_var, &sig_var).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn key_ownership_gadget_matches_native_derivation() {
        let mut rng = ark_std::test_rng();

        let sk = Fr::rand(&mut rng);
        let pk = derive_public_key(&sk);

        let cs = ConstraintSystem::<Fq>::new_ref();
        let sk_var =
            FpVar::new_witness(cs.clone(), || Ok(scalar_to_base_field::<Fr, Fq>(&sk))).unwrap();
        let pk_var =
            EdwardsVar::new_witness(cs.clone(), || Ok(EdwardsProjective::from(pk))).unwrap();

        enforce_key_ownership(&sk_var, &pk_var).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn key_ownership_rejects_foreign_key() {
        let mut rng = ark_std::test_rng();

        let sk = Fr::rand(&mut rng);
        let other_pk = derive_public_key(&Fr::rand(&mut rng));

        let cs = ConstraintSystem::<Fq>::new_ref();
        let sk_var =
            FpVar::new_witness(cs.clone(), || Ok(scalar_to_base_field::<Fr, Fq>(&sk))).unwrap();
        let pk_var =
            EdwardsVar::new_witness(cs.clone(), || Ok(EdwardsProjective::from(other_pk)))
                .unwrap();

        enforce_key_ownership(&sk_var, &pk_var).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
