//! Groth16 pipeline: witness assembly, proof generation, verification
//!
//! Stateless per call: the proving and verifying keys are loaded once and
//! only ever read, so independent prove calls can run concurrently without
//! locking. Each call produces a fresh one-shot [`ProofArtifact`]; artifacts
//! are never updated in place and are bound to one election id and one
//! submitting account.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ark_bn254::Bn254;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ed_on_bn254::Fq;
use ark_ff::PrimeField;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, ProvingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};

use crate::authority::{AuthorityKey, IssuedCredential};
use crate::config::credential_poseidon_config;
use crate::credential::{Credential, VoterKeyPair};
use crate::eddsa;
use crate::error::{IneligibilityError, InfrastructureError, ProveError};

use super::circuit::EligibilityCircuit;
use super::signals::PublicSignals;
use super::{ElectionCriteria, EthAddress};

const LOG_TARGET: &str = "eligibility::prover";

/// Everything one proof attempt needs. The voter secret key enters only as a
/// circuit witness; nothing here is retained after the call returns.
pub struct ProveRequest<'a> {
    pub credential: &'a Credential,
    pub voter_keys: &'a VoterKeyPair,
    pub issued: &'a IssuedCredential,
    pub criteria: &'a ElectionCriteria,
    pub submitting_address: EthAddress,
    pub vote_choice: u32,
}

/// A proof plus its public signals. One-shot: generated fresh per vote
/// attempt and discarded once submitted.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProofArtifact {
    pub proof: Proof<Bn254>,
    pub public_signals: PublicSignals,
}

impl ProofArtifact {
    /// Persist to a caller-chosen path. Concurrent provers must key paths by
    /// a unique request id; this function does not arbitrate collisions.
    pub fn write_to(&self, path: &Path) -> Result<(), InfrastructureError> {
        let mut file = File::create(path)?;
        self.serialize_compressed(&mut file)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, InfrastructureError> {
        let file = File::open(path)?;
        Ok(Self::deserialize_compressed(BufReader::new(file))?)
    }
}

/// The proof system for one circuit shape (one candidate count).
pub struct EligibilityProofSystem {
    poseidon: PoseidonConfig<Fq>,
    num_candidates: u32,
    proving_key: ProvingKey<Bn254>,
    prepared_vk: PreparedVerifyingKey<Bn254>,
}

impl EligibilityProofSystem {
    /// Circuit-specific Groth16 setup.
    ///
    /// The setup synthesizes the circuit once with a self-consistent fixture
    /// assignment (the constraint shape is assignment-independent; the
    /// fixture just keeps every allocation closure satisfied).
    pub fn setup<R: RngCore + CryptoRng>(
        rng: &mut R,
        num_candidates: u32,
    ) -> Result<Self, ProveError> {
        let poseidon = credential_poseidon_config().clone();
        let circuit = setup_fixture_circuit(&poseidon, num_candidates);

        tracing::info!(target: LOG_TARGET, num_candidates, "running Groth16 setup");
        let (proving_key, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
            .map_err(ProveError::from_synthesis)?;
        let prepared_vk = prepare_verifying_key(&vk);

        Ok(Self {
            poseidon,
            num_candidates,
            proving_key,
            prepared_vk,
        })
    }

    /// Generate a proof for one vote attempt.
    ///
    /// Runs the native constraint pre-check first, so an ineligible voter is
    /// reported as a precise [`IneligibilityError`] instead of an opaque
    /// prover failure; anything that goes wrong after the pre-check passes is
    /// infrastructure.
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        request: &ProveRequest<'_>,
    ) -> Result<ProofArtifact, ProveError> {
        self.precheck(request)?;

        let signals = PublicSignals::new(
            request.issued.authority_pk,
            request.credential.voter_pk,
            request.criteria,
            request.submitting_address,
            request.vote_choice,
        );

        let circuit = EligibilityCircuit {
            poseidon: self.poseidon.clone(),
            num_candidates: self.num_candidates,
            authority_pk: Some(request.issued.authority_pk),
            voter_pk: Some(request.credential.voter_pk),
            allowed_city: Some(signals.allowed_city),
            allowed_region: Some(signals.allowed_region),
            min_birth_date: Some(signals.min_birth_date),
            election_id: Some(signals.election_id),
            submitting_address: Some(signals.submitting_address),
            vote_choice: Some(signals.vote_choice),
            attributes: Some(*request.credential.attributes.elements()),
            voter_sk: Some(*request.voter_keys.secret_scalar()),
            signature: Some(request.issued.signature.clone()),
        };

        tracing::info!(
            target: LOG_TARGET,
            election_id = request.criteria.election_id,
            "generating eligibility proof"
        );
        let proof = Groth16::<Bn254>::prove(&self.proving_key, circuit, rng)
            .map_err(ProveError::from_synthesis)?;
        tracing::info!(target: LOG_TARGET, "proof generated");

        Ok(ProofArtifact {
            proof,
            public_signals: signals,
        })
    }

    /// Verify an artifact against this system's verification key.
    pub fn verify(&self, artifact: &ProofArtifact) -> Result<bool, InfrastructureError> {
        self.verify_signals(&artifact.proof, &artifact.public_signals.to_field_elements())
    }

    /// Verify a proof against an explicit signal vector. This is the entry a
    /// verifier uses after substituting its own stored election parameters
    /// for the prover-supplied ones.
    pub fn verify_signals(
        &self,
        proof: &Proof<Bn254>,
        public_signals: &[Fq],
    ) -> Result<bool, InfrastructureError> {
        Groth16::<Bn254>::verify_proof(&self.prepared_vk, proof, public_signals)
            .map_err(InfrastructureError::Synthesis)
    }

    pub fn num_candidates(&self) -> u32 {
        self.num_candidates
    }

    /// Persist the proving key (the verifying key travels inside it).
    pub fn save_proving_key(&self, path: &Path) -> Result<(), InfrastructureError> {
        let mut file = File::create(path)?;
        self.proving_key.serialize_compressed(&mut file)?;
        Ok(())
    }

    /// Rebuild a proof system from a previously saved proving key.
    pub fn load(path: &Path, num_candidates: u32) -> Result<Self, InfrastructureError> {
        let file = File::open(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                InfrastructureError::ProvingKeyMissing(path.display().to_string())
            } else {
                InfrastructureError::Io(err)
            }
        })?;
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(BufReader::new(file))?;
        let prepared_vk = prepare_verifying_key(&proving_key.vk);
        Ok(Self {
            poseidon: credential_poseidon_config().clone(),
            num_candidates,
            proving_key,
            prepared_vk,
        })
    }

    /// Native mirror of the circuit predicate. Each check maps to exactly one
    /// constraint family; the first violated one names the failure.
    fn precheck(&self, request: &ProveRequest<'_>) -> Result<(), IneligibilityError> {
        let credential = request.credential;
        let criteria = request.criteria;

        if request.voter_keys.public_key() != &credential.voter_pk {
            return Err(IneligibilityError::KeyOwnership);
        }

        let hash = credential.hash(&self.poseidon);
        if !eddsa::verify(
            &self.poseidon,
            &request.issued.authority_pk,
            &hash,
            &request.issued.signature,
        ) {
            return Err(IneligibilityError::InvalidSignature);
        }

        if credential.attributes.city() != criteria.allowed_city_field() {
            return Err(IneligibilityError::CityMismatch);
        }
        if credential.attributes.region() != criteria.allowed_region_field() {
            return Err(IneligibilityError::RegionMismatch);
        }

        // Unsigned integer comparison on the canonical representatives, the
        // native analogue of the circuit's bit-decomposed comparison.
        let dob = credential.attributes.date_of_birth().into_bigint();
        if dob > criteria.min_birth_date_field().into_bigint() {
            return Err(IneligibilityError::BornAfterCutoff);
        }

        if request.vote_choice >= self.num_candidates {
            return Err(IneligibilityError::VoteChoiceOutOfRange {
                choice: request.vote_choice,
                num_candidates: self.num_candidates,
            });
        }

        Ok(())
    }
}

/// Self-consistent fixture assignment for Groth16 setup.
fn setup_fixture_circuit(poseidon: &PoseidonConfig<Fq>, num_candidates: u32) -> EligibilityCircuit {
    use crate::attributes::{encode, VoterRecord};

    let record = VoterRecord {
        name: "setup".to_string(),
        surname: "fixture".to_string(),
        street_address: "n/a".to_string(),
        city: 1,
        district: 1,
        region: 1,
        country: 1,
        date_of_birth: 19700101,
    };
    let criteria = ElectionCriteria {
        allowed_city: 1,
        allowed_region: 1,
        min_birth_date: 20000101,
        election_id: 0,
        contract_address: EthAddress::new([0u8; 20]),
    };

    let authority = AuthorityKey::from_seed(&[1u8; 32]);
    let voter = VoterKeyPair::from_seed(&[2u8; 32]);
    let attributes = encode(&record);
    let issued = authority.issue(poseidon, &attributes, voter.public_key());

    EligibilityCircuit {
        poseidon: poseidon.clone(),
        num_candidates,
        authority_pk: Some(*authority.public_key()),
        voter_pk: Some(*voter.public_key()),
        allowed_city: Some(criteria.allowed_city_field()),
        allowed_region: Some(criteria.allowed_region_field()),
        min_birth_date: Some(criteria.min_birth_date_field()),
        election_id: Some(criteria.election_id_field()),
        submitting_address: Some(criteria.contract_address.to_field()),
        vote_choice: Some(Fq::from(0u64)),
        attributes: Some(*attributes.elements()),
        voter_sk: Some(*voter.secret_scalar()),
        signature: Some(issued.signature),
    }
}
