//! Canonical encoding of raw voter records into attribute vectors
//!
//! Every credential covers exactly eight field elements with fixed semantic
//! slots. Text fields are folded with a rolling polynomial hash; numeric
//! fields (city, district, region, country codes and the `YYYYMMDD` birth
//! date) are assigned out-of-band and lifted into the field unchanged. The
//! encoding is a pure function: the same record always produces the same
//! vector, which is what lets an independently-run issuer and prover agree on
//! the signed credential hash.

use ark_ed_on_bn254::Fq;
use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// Number of semantic slots in a credential.
pub const NUM_ATTRIBUTES: usize = 8;

pub const ATTR_NAME: usize = 0;
pub const ATTR_SURNAME: usize = 1;
pub const ATTR_STREET_ADDRESS: usize = 2;
pub const ATTR_CITY: usize = 3;
pub const ATTR_DISTRICT: usize = 4;
pub const ATTR_REGION: usize = 5;
pub const ATTR_COUNTRY: usize = 6;
pub const ATTR_DATE_OF_BIRTH: usize = 7;

/// A raw voter record before encoding.
///
/// Numeric codes come from a contract-agreed namespace (e.g. an 8-digit city
/// code); `date_of_birth` is `YYYYMMDD`. The encoder does not invent or
/// validate these, it only lifts them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub name: String,
    pub surname: String,
    pub street_address: String,
    pub city: u64,
    pub district: u64,
    pub region: u64,
    pub country: u64,
    pub date_of_birth: u32,
}

/// Ordered vector of exactly [`NUM_ATTRIBUTES`] field elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeVector([Fq; NUM_ATTRIBUTES]);

impl AttributeVector {
    pub fn new(elements: [Fq; NUM_ATTRIBUTES]) -> Self {
        Self(elements)
    }

    pub fn elements(&self) -> &[Fq; NUM_ATTRIBUTES] {
        &self.0
    }

    pub fn city(&self) -> Fq {
        self.0[ATTR_CITY]
    }

    pub fn region(&self) -> Fq {
        self.0[ATTR_REGION]
    }

    pub fn date_of_birth(&self) -> Fq {
        self.0[ATTR_DATE_OF_BIRTH]
    }

    /// Copy with a single slot replaced. Used by tamper-evidence tests and by
    /// callers that need to re-encode one field without rebuilding the record.
    pub fn with_slot(&self, slot: usize, value: Fq) -> Self {
        let mut elements = self.0;
        elements[slot] = value;
        Self(elements)
    }
}

impl TryFrom<&[Fq]> for AttributeVector {
    type Error = EncodingError;

    fn try_from(slice: &[Fq]) -> Result<Self, Self::Error> {
        let elements: [Fq; NUM_ATTRIBUTES] =
            slice.try_into().map_err(|_| EncodingError::WrongArity {
                expected: NUM_ATTRIBUTES,
                got: slice.len(),
            })?;
        Ok(Self(elements))
    }
}

/// Fold a text attribute into a field element with a rolling polynomial hash
/// (`h = h * 256 + byte`).
///
/// Deterministic and cheap, but not collision-resistant against adversarial
/// input: long strings wrap modulo the field. Acceptable here because text
/// slots are never matched against election criteria; the signature covers
/// them as opaque values.
pub fn text_to_field(text: &str) -> Fq {
    let radix = Fq::from(256u64);
    let mut acc = Fq::zero();
    for byte in text.bytes() {
        acc = acc * radix + Fq::from(byte as u64);
    }
    acc
}

/// Encode a raw voter record into its canonical attribute vector.
///
/// Total function: empty strings hash to the (defined) empty-string value,
/// zero codes lift to zero.
pub fn encode(record: &VoterRecord) -> AttributeVector {
    let mut elements = [Fq::zero(); NUM_ATTRIBUTES];
    elements[ATTR_NAME] = text_to_field(&record.name);
    elements[ATTR_SURNAME] = text_to_field(&record.surname);
    elements[ATTR_STREET_ADDRESS] = text_to_field(&record.street_address);
    elements[ATTR_CITY] = Fq::from(record.city);
    elements[ATTR_DISTRICT] = Fq::from(record.district);
    elements[ATTR_REGION] = Fq::from(record.region);
    elements[ATTR_COUNTRY] = Fq::from(record.country);
    elements[ATTR_DATE_OF_BIRTH] = Fq::from(record.date_of_birth as u64);
    AttributeVector::new(elements)
}
