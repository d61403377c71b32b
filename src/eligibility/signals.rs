//! The versioned public-signal schema
//!
//! The verifying side (an on-chain contract holding the verification key)
//! re-derives these values from its own storage and the caller's address and
//! rejects any proof whose signal vector differs. The ordering below is a
//! contract between prover and verifier and must match the circuit's input
//! allocation order exactly; `signal_order_matches_circuit_allocation` in the
//! tests pins it.

use ark_ed_on_bn254::{EdwardsAffine, Fq};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::BindingMismatchError;

use super::{ElectionCriteria, EthAddress};

/// Number of public signals: two curve points (two coordinates each) plus six
/// scalar signals.
pub const NUM_PUBLIC_SIGNALS: usize = 10;

/// Public signals in schema order:
/// `[Ax, Ay, pkVCx, pkVCy, allowedCity, allowedRegion, minBirthDate,
/// electionId, submittingAddress, voteChoice]`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicSignals {
    pub authority_pk: EdwardsAffine,
    pub voter_pk: EdwardsAffine,
    pub allowed_city: Fq,
    pub allowed_region: Fq,
    pub min_birth_date: Fq,
    pub election_id: Fq,
    pub submitting_address: Fq,
    pub vote_choice: Fq,
}

impl PublicSignals {
    pub fn new(
        authority_pk: EdwardsAffine,
        voter_pk: EdwardsAffine,
        criteria: &ElectionCriteria,
        submitting_address: EthAddress,
        vote_choice: u32,
    ) -> Self {
        Self {
            authority_pk,
            voter_pk,
            allowed_city: criteria.allowed_city_field(),
            allowed_region: criteria.allowed_region_field(),
            min_birth_date: criteria.min_birth_date_field(),
            election_id: criteria.election_id_field(),
            submitting_address: submitting_address.to_field(),
            vote_choice: Fq::from(vote_choice as u64),
        }
    }

    /// Flatten into the field-element vector handed to the Groth16 verifier.
    pub fn to_field_elements(&self) -> Vec<Fq> {
        vec![
            self.authority_pk.x,
            self.authority_pk.y,
            self.voter_pk.x,
            self.voter_pk.y,
            self.allowed_city,
            self.allowed_region,
            self.min_birth_date,
            self.election_id,
            self.submitting_address,
            self.vote_choice,
        ]
    }

    /// Verifier-side binding check: compare the embedded election parameters
    /// and submitting account against locally stored values. Returns the
    /// first mismatching field, so a caller can distinguish a replayed proof
    /// from a merely invalid one before running the pairing check.
    pub fn ensure_binding(
        &self,
        criteria: &ElectionCriteria,
        submitting_address: EthAddress,
    ) -> Result<(), BindingMismatchError> {
        if self.allowed_city != criteria.allowed_city_field() {
            return Err(BindingMismatchError {
                field: "allowedCity",
            });
        }
        if self.allowed_region != criteria.allowed_region_field() {
            return Err(BindingMismatchError {
                field: "allowedRegion",
            });
        }
        if self.min_birth_date != criteria.min_birth_date_field() {
            return Err(BindingMismatchError {
                field: "minBirthDate",
            });
        }
        if self.election_id != criteria.election_id_field() {
            return Err(BindingMismatchError {
                field: "electionId",
            });
        }
        if self.submitting_address != submitting_address.to_field() {
            return Err(BindingMismatchError {
                field: "submittingAddress",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::encode;
    use crate::authority::AuthorityKey;
    use crate::config::credential_poseidon_config;
    use crate::credential::VoterKeyPair;
    use crate::eligibility::circuit::EligibilityCircuit;
    use ark_relations::gr1cs::{
        ConstraintSynthesizer, ConstraintSystem, SynthesisMode,
    };

    fn fixture() -> (EligibilityCircuit, PublicSignals) {
        let poseidon = credential_poseidon_config().clone();
        let authority = AuthorityKey::from_seed(&[42u8; 32]);
        let voter = VoterKeyPair::from_seed(&[5u8; 32]);
        let record = crate::attributes::VoterRecord {
            name: "Kay".to_string(),
            surname: "McNulty".to_string(),
            street_address: "6 Difference Engine Ln".to_string(),
            city: 100,
            district: 2,
            region: 10,
            country: 1,
            date_of_birth: 19900101,
        };
        let criteria = ElectionCriteria {
            allowed_city: 100,
            allowed_region: 10,
            min_birth_date: 20060101,
            election_id: 7,
            contract_address: EthAddress::new([0x22; 20]),
        };
        let attrs = encode(&record);
        let issued = authority.issue(&poseidon, &attrs, voter.public_key());

        let signals = PublicSignals::new(
            *authority.public_key(),
            *voter.public_key(),
            &criteria,
            criteria.contract_address,
            1,
        );

        let circuit = EligibilityCircuit {
            poseidon,
            num_candidates: 4,
            authority_pk: Some(*authority.public_key()),
            voter_pk: Some(*voter.public_key()),
            allowed_city: Some(signals.allowed_city),
            allowed_region: Some(signals.allowed_region),
            min_birth_date: Some(signals.min_birth_date),
            election_id: Some(signals.election_id),
            submitting_address: Some(signals.submitting_address),
            vote_choice: Some(signals.vote_choice),
            attributes: Some(*attrs.elements()),
            voter_sk: Some(*voter.secret_scalar()),
            signature: Some(issued.signature),
        };
        (circuit, signals)
    }

    #[test]
    fn signal_order_matches_circuit_allocation() {
        let (circuit, signals) = fixture();

        let cs = ConstraintSystem::<Fq>::new_ref();
        cs.set_mode(SynthesisMode::Prove {
            construct_matrices: false,
            generate_lc_assignments: true,
        });
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.finalize();

        let cs_borrowed = cs.borrow().unwrap();
        // First instance variable is the constant 1.
        let instance = cs_borrowed.instance_assignment().unwrap()[1..].to_vec();
        assert_eq!(instance, signals.to_field_elements());
        assert_eq!(instance.len(), NUM_PUBLIC_SIGNALS);
    }

    #[test]
    fn binding_check_passes_on_matching_parameters() {
        let (_, signals) = fixture();
        let criteria = ElectionCriteria {
            allowed_city: 100,
            allowed_region: 10,
            min_birth_date: 20060101,
            election_id: 7,
            contract_address: EthAddress::new([0x22; 20]),
        };
        assert!(signals
            .ensure_binding(&criteria, criteria.contract_address)
            .is_ok());
    }

    #[test]
    fn binding_check_flags_foreign_election() {
        let (_, signals) = fixture();
        let mut criteria = ElectionCriteria {
            allowed_city: 100,
            allowed_region: 10,
            min_birth_date: 20060101,
            election_id: 7,
            contract_address: EthAddress::new([0x22; 20]),
        };
        criteria.election_id = 8;
        let err = signals
            .ensure_binding(&criteria, criteria.contract_address)
            .unwrap_err();
        assert_eq!(err.field, "electionId");
    }

    #[test]
    fn binding_check_flags_foreign_submitter() {
        let (_, signals) = fixture();
        let criteria = ElectionCriteria {
            allowed_city: 100,
            allowed_region: 10,
            min_birth_date: 20060101,
            election_id: 7,
            contract_address: EthAddress::new([0x22; 20]),
        };
        let err = signals
            .ensure_binding(&criteria, EthAddress::new([0x33; 20]))
            .unwrap_err();
        assert_eq!(err.field, "submittingAddress");
    }
}
