//! Credentials: a voter's attribute vector bound to their signing key

use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
use ark_ed_on_bn254::{EdwardsAffine, Fq, Fr};
use ark_ff::UniformRand;
use ark_std::rand::Rng;

use crate::attributes::AttributeVector;
use crate::eddsa::derive_public_key;

/// A voter's Baby Jubjub keypair. The secret scalar is a circuit-private
/// witness: it is only ever used to prove key ownership, never disclosed.
#[derive(Clone, Debug)]
pub struct VoterKeyPair {
    secret: Fr,
    public: EdwardsAffine,
}

impl VoterKeyPair {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let secret = Fr::rand(rng);
        Self {
            public: derive_public_key(&secret),
            secret,
        }
    }

    /// Deterministic derivation from seed bytes (reduced into the scalar
    /// field). Used by fixtures that need reproducible voters.
    pub fn from_seed(seed: &[u8]) -> Self {
        use ark_ff::PrimeField;
        let secret = Fr::from_le_bytes_mod_order(seed);
        Self {
            public: derive_public_key(&secret),
            secret,
        }
    }

    pub fn public_key(&self) -> &EdwardsAffine {
        &self.public
    }

    /// The secret scalar, exposed only for witness assembly.
    pub fn secret_scalar(&self) -> &Fr {
        &self.secret
    }
}

/// A credential is the pair (attribute vector, voter public key); the
/// authority signs its [`credential_hash`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub attributes: AttributeVector,
    pub voter_pk: EdwardsAffine,
}

impl Credential {
    pub fn new(attributes: AttributeVector, voter_pk: EdwardsAffine) -> Self {
        Self {
            attributes,
            voter_pk,
        }
    }

    pub fn hash(&self, config: &PoseidonConfig<Fq>) -> Fq {
        credential_hash(config, &self.attributes, &self.voter_pk)
    }
}

/// Poseidon sponge hash over `attributes ++ [pk.x, pk.y]` (ten elements).
///
/// The circuit recomputes this absorption sequence exactly; changing the
/// order or count here silently breaks every issued credential.
pub fn credential_hash(
    config: &PoseidonConfig<Fq>,
    attributes: &AttributeVector,
    voter_pk: &EdwardsAffine,
) -> Fq {
    let mut sponge = PoseidonSponge::new(config);
    for element in attributes.elements() {
        sponge.absorb(element);
    }
    sponge.absorb(&voter_pk.x);
    sponge.absorb(&voter_pk.y);
    sponge.squeeze_native_field_elements(1)[0]
}
