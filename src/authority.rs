//! Credential issuer: the authority's signing handle
//!
//! One long-lived keypair per election cycle, passed explicitly as a handle
//! rather than held in module-level state. The secret scalar lives in
//! zeroizing memory, is loaded once, is only ever used to sign, and is wiped
//! when the handle drops. Rotating the key invalidates every previously
//! issued credential.

use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ed_on_bn254::{EdwardsAffine, Fq, Fr};
use ark_ff::{BigInteger, PrimeField, UniformRand};
use ark_std::rand::Rng;
use zeroize::Zeroizing;

use crate::attributes::AttributeVector;
use crate::credential::credential_hash;
use crate::eddsa::{self, EddsaSignature};
use crate::error::InfrastructureError;

const LOG_TARGET: &str = "authority";

/// What the issuer hands back: the signature over the credential hash plus,
/// for convenience, the authority public key the verifier will check against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedCredential {
    pub signature: EddsaSignature,
    pub authority_pk: EdwardsAffine,
}

/// Key-store handle holding the authority's signing key.
pub struct AuthorityKey {
    // Reduced scalar, little-endian; zeroed on drop.
    secret_bytes: Zeroizing<[u8; 32]>,
    public: EdwardsAffine,
}

impl AuthorityKey {
    /// Build the handle from seed bytes (reduced into the scalar field).
    pub fn from_seed(seed: &[u8]) -> Self {
        Self::from_scalar(Fr::from_le_bytes_mod_order(seed))
    }

    /// Build the handle from a hex-encoded seed, e.g. out of a secret store.
    pub fn from_seed_hex(hex_seed: &str) -> Result<Self, InfrastructureError> {
        let bytes = hex::decode(hex_seed.trim_start_matches("0x"))?;
        Ok(Self::from_seed(&bytes))
    }

    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::from_scalar(Fr::rand(rng))
    }

    fn from_scalar(secret: Fr) -> Self {
        let mut secret_bytes = Zeroizing::new([0u8; 32]);
        let le = secret.into_bigint().to_bytes_le();
        secret_bytes[..le.len()].copy_from_slice(&le);
        Self {
            public: eddsa::derive_public_key(&secret),
            secret_bytes,
        }
    }

    fn secret_scalar(&self) -> Fr {
        Fr::from_le_bytes_mod_order(&self.secret_bytes[..])
    }

    pub fn public_key(&self) -> &EdwardsAffine {
        &self.public
    }

    /// Sign an already-computed credential hash.
    pub fn sign_hash(&self, config: &PoseidonConfig<Fq>, hash: &Fq) -> EddsaSignature {
        eddsa::sign(config, &self.secret_scalar(), hash)
    }

    /// Issue a credential: hash `attributes ++ voter_pk` and sign it.
    ///
    /// Never fails locally for well-arity input (arity is enforced by the
    /// [`AttributeVector`] type); a bogus voter key simply yields a signature
    /// that later fails circuit verification, which is the intended failure
    /// surface.
    pub fn issue(
        &self,
        config: &PoseidonConfig<Fq>,
        attributes: &AttributeVector,
        voter_pk: &EdwardsAffine,
    ) -> IssuedCredential {
        let hash = credential_hash(config, attributes, voter_pk);
        tracing::debug!(target: LOG_TARGET, %hash, "issuing credential");
        IssuedCredential {
            signature: self.sign_hash(config, &hash),
            authority_pk: self.public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{encode, VoterRecord, ATTR_REGION};
    use crate::config::credential_poseidon_config;
    use crate::credential::VoterKeyPair;

    fn sample_attributes() -> AttributeVector {
        encode(&VoterRecord {
            name: "Ida".to_string(),
            surname: "Rhodes".to_string(),
            street_address: "5 Tabulator Rd".to_string(),
            city: 100,
            district: 1,
            region: 10,
            country: 1,
            date_of_birth: 19000515,
        })
    }

    #[test]
    fn issued_signature_verifies_over_credential_hash() {
        let cfg = credential_poseidon_config();
        let authority = AuthorityKey::from_seed(&[42u8; 32]);
        let voter = VoterKeyPair::from_seed(&[5u8; 32]);
        let attrs = sample_attributes();

        let issued = authority.issue(cfg, &attrs, voter.public_key());
        let hash = credential_hash(cfg, &attrs, voter.public_key());

        assert_eq!(&issued.authority_pk, authority.public_key());
        assert!(eddsa::verify(
            cfg,
            &issued.authority_pk,
            &hash,
            &issued.signature
        ));
    }

    #[test]
    fn tampered_attribute_invalidates_signature() {
        let cfg = credential_poseidon_config();
        let authority = AuthorityKey::from_seed(&[42u8; 32]);
        let voter = VoterKeyPair::from_seed(&[5u8; 32]);
        let attrs = sample_attributes();

        let issued = authority.issue(cfg, &attrs, voter.public_key());

        let tampered = attrs.with_slot(ATTR_REGION, Fq::from(77u64));
        let tampered_hash = credential_hash(cfg, &tampered, voter.public_key());
        assert!(!eddsa::verify(
            cfg,
            &issued.authority_pk,
            &tampered_hash,
            &issued.signature
        ));
    }

    #[test]
    fn hex_seed_roundtrip() {
        let a = AuthorityKey::from_seed_hex(
            "0001020304050607080900010203040506070809000102030405060708090001",
        )
        .unwrap();
        let b = AuthorityKey::from_seed_hex(
            "0x0001020304050607080900010203040506070809000102030405060708090001",
        )
        .unwrap();
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn issuing_twice_yields_verifying_signatures() {
        let cfg = credential_poseidon_config();
        let authority = AuthorityKey::from_seed(&[42u8; 32]);
        let voter = VoterKeyPair::from_seed(&[5u8; 32]);
        let attrs = sample_attributes();

        let first = authority.issue(cfg, &attrs, voter.public_key());
        let second = authority.issue(cfg, &attrs, voter.public_key());
        // Deterministic scheme: identical issuance is idempotent.
        assert_eq!(first, second);
    }
}
