//! The eligibility constraint system
//!
//! A pure one-shot predicate over a private witness (attribute vector, voter
//! secret key, authority signature) and public inputs (both public keys, the
//! election criteria, the binding values, the vote choice). A proof exists
//! exactly when every constraint holds; there is no partial outcome.
//!
//! Public input allocation order is part of the external verification
//! contract — see [`super::signals`].

use std::cmp::Ordering;

use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fq, Fr};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::gr1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, SynthesisError,
};

use crate::attributes::{ATTR_CITY, ATTR_DATE_OF_BIRTH, ATTR_REGION, NUM_ATTRIBUTES};
use crate::eddsa::gadgets::{enforce_key_ownership, enforce_signature, EddsaSignatureVar};
use crate::eddsa::EddsaSignature;
use crate::field_conversion::scalar_to_base_field;

const LOG_TARGET: &str = "eligibility::circuit";

/// Circuit instance for one proof attempt.
///
/// `num_candidates` is baked into the constraint system at setup time; a
/// different candidate count is a different circuit (and a different
/// proving key).
#[derive(Clone)]
pub struct EligibilityCircuit {
    pub poseidon: PoseidonConfig<Fq>,
    pub num_candidates: u32,

    // Public inputs, in allocation order.
    pub authority_pk: Option<EdwardsAffine>,
    pub voter_pk: Option<EdwardsAffine>,
    pub allowed_city: Option<Fq>,
    pub allowed_region: Option<Fq>,
    pub min_birth_date: Option<Fq>,
    pub election_id: Option<Fq>,
    pub submitting_address: Option<Fq>,
    pub vote_choice: Option<Fq>,

    // Private witness.
    pub attributes: Option<[Fq; NUM_ATTRIBUTES]>,
    pub voter_sk: Option<Fr>,
    pub signature: Option<EddsaSignature>,
}

impl ConstraintSynthesizer<Fq> for EligibilityCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fq>) -> Result<(), SynthesisError> {
        // ---- Public inputs (order is the versioned signal schema) ----
        let authority_pk = EdwardsVar::new_input(cs.clone(), || {
            self.authority_pk
                .map(EdwardsProjective::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let voter_pk = EdwardsVar::new_input(cs.clone(), || {
            self.voter_pk
                .map(EdwardsProjective::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let allowed_city = FpVar::new_input(cs.clone(), || {
            self.allowed_city.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let allowed_region = FpVar::new_input(cs.clone(), || {
            self.allowed_region.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let min_birth_date = FpVar::new_input(cs.clone(), || {
            self.min_birth_date.ok_or(SynthesisError::AssignmentMissing)
        })?;
        // The binding pair: allocated as first-class inputs so the verifier
        // matches them against its own stored election id and caller address.
        // No arithmetic constraint touches them; their soundness comes from
        // the verifier-side comparison.
        let _election_id = FpVar::new_input(cs.clone(), || {
            self.election_id.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let _submitting_address = FpVar::new_input(cs.clone(), || {
            self.submitting_address
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let vote_choice = FpVar::new_input(cs.clone(), || {
            self.vote_choice.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ---- Private witness ----
        let attributes = self
            .attributes
            .ok_or(SynthesisError::AssignmentMissing)
            .map(|a| a.to_vec());
        let attribute_vars = Vec::<FpVar<Fq>>::new_witness(cs.clone(), || attributes)?;
        if attribute_vars.len() != NUM_ATTRIBUTES {
            return Err(SynthesisError::Unsatisfiable);
        }

        let voter_sk = FpVar::new_witness(cs.clone(), || {
            self.voter_sk
                .map(|sk| scalar_to_base_field::<Fr, Fq>(&sk))
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let signature = EddsaSignatureVar {
            r8: EdwardsVar::new_witness(cs.clone(), || {
                self.signature
                    .as_ref()
                    .map(|sig| EdwardsProjective::from(sig.r8))
                    .ok_or(SynthesisError::AssignmentMissing)
            })?,
            s: FpVar::new_witness(cs.clone(), || {
                self.signature
                    .as_ref()
                    .map(|sig| scalar_to_base_field::<Fr, Fq>(&sig.s))
                    .ok_or(SynthesisError::AssignmentMissing)
            })?,
        };

        // 1. Key ownership: the prover controls the credential's bound key.
        enforce_key_ownership(&voter_sk, &voter_pk)?;

        // 2. Signature validity over the recomputed credential hash. The
        //    absorption sequence mirrors `credential_hash` exactly.
        let mut sponge = PoseidonSpongeVar::new(cs.clone(), &self.poseidon);
        for attribute in &attribute_vars {
            sponge.absorb(attribute)?;
        }
        sponge.absorb(&voter_pk.x)?;
        sponge.absorb(&voter_pk.y)?;
        let credential_hash = sponge.squeeze_field_elements(1)?[0].clone();

        enforce_signature(
            cs.clone(),
            &self.poseidon,
            &authority_pk,
            &credential_hash,
            &signature,
        )?;

        // 3 & 4. Residency: city and region must match the criteria.
        attribute_vars[ATTR_CITY].enforce_equal(&allowed_city)?;
        attribute_vars[ATTR_REGION].enforce_equal(&allowed_region)?;

        // 5. Age: dateOfBirth <= minBirthDate as unsigned integers. Field
        //    elements carry no order, so this decomposes into bits under the
        //    hood; both operands must sit below (p-1)/2, which YYYYMMDD
        //    encodings always do.
        attribute_vars[ATTR_DATE_OF_BIRTH].enforce_cmp(
            &min_birth_date,
            Ordering::Less,
            true,
        )?;

        // 7. Vote choice in [0, num_candidates).
        let num_candidates = FpVar::constant(Fq::from(self.num_candidates as u64));
        vote_choice.enforce_cmp(&num_candidates, Ordering::Less, false)?;

        tracing::debug!(
            target: LOG_TARGET,
            constraints = cs.num_constraints(),
            instance_variables = cs.num_instance_variables(),
            "synthesized eligibility circuit"
        );
        Ok(())
    }
}
