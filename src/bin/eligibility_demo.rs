//! Scenario-driven demo of the eligibility proof pipeline
//!
//! Loads voter scenarios (from a JSON file or built-in defaults), issues a
//! credential for each, generates a proof against the election criteria,
//! verifies it, and classifies the observed outcome against the expected one.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use zk_ballot::attributes::{encode, VoterRecord};
use zk_ballot::authority::AuthorityKey;
use zk_ballot::credential::{Credential, VoterKeyPair};
use zk_ballot::credential_poseidon_config;
use zk_ballot::eligibility::{
    ElectionCriteria, EligibilityProofSystem, ProveRequest,
};
use zk_ballot::ProveError;

const LOG_TARGET: &str = "eligibility_demo";

#[derive(Parser)]
#[command(about = "Run eligibility proof scenarios end to end")]
struct Args {
    /// Path to a JSON scenario file; omit to run the built-in scenarios
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Number of candidates on the ballot
    #[arg(long, default_value_t = 4)]
    num_candidates: u32,

    /// RNG seed for setup and proving
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum Expected {
    Pass,
    Fail,
}

#[derive(Serialize, Deserialize)]
struct Scenario {
    name: String,
    voter: VoterRecord,
    vote_choice: u32,
    expected: Expected,
}

#[derive(Serialize, Deserialize)]
struct ScenarioFile {
    criteria: ElectionCriteria,
    scenarios: Vec<Scenario>,
}

fn builtin_scenarios() -> ScenarioFile {
    let criteria = ElectionCriteria {
        allowed_city: 100,
        allowed_region: 10,
        min_birth_date: 20060101,
        election_id: 1,
        contract_address: "0x00112233445566778899aabbccddeeff00112233"
            .parse()
            .expect("static address"),
    };
    let base = VoterRecord {
        name: "Alice".to_string(),
        surname: "Morgan".to_string(),
        street_address: "10 Ballot Street".to_string(),
        city: 100,
        district: 4,
        region: 10,
        country: 1,
        date_of_birth: 19900101,
    };

    let mut wrong_city = base.clone();
    wrong_city.city = 200;
    let mut wrong_region = base.clone();
    wrong_region.region = 99;
    let mut too_young = base.clone();
    too_young.date_of_birth = 20100101;

    ScenarioFile {
        criteria,
        scenarios: vec![
            Scenario {
                name: "eligible resident".to_string(),
                voter: base,
                vote_choice: 2,
                expected: Expected::Pass,
            },
            Scenario {
                name: "wrong city".to_string(),
                voter: wrong_city,
                vote_choice: 0,
                expected: Expected::Fail,
            },
            Scenario {
                name: "wrong region".to_string(),
                voter: wrong_region,
                vote_choice: 1,
                expected: Expected::Fail,
            },
            Scenario {
                name: "born after cutoff".to_string(),
                voter: too_young,
                vote_choice: 3,
                expected: Expected::Fail,
            },
        ],
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let file = match &args.scenarios {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario file {}", path.display()))?;
            serde_json::from_str(&data).context("parsing scenario file")?
        }
        None => builtin_scenarios(),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let poseidon = credential_poseidon_config();

    println!("Setting up proof system ({} candidates)...", args.num_candidates);
    let setup_start = Instant::now();
    let system = EligibilityProofSystem::setup(&mut rng, args.num_candidates)?;
    println!("Setup done in {:?}\n", setup_start.elapsed());

    let authority = AuthorityKey::from_seed_hex(
        "0001020304050607080900010203040506070809000102030405060708090001",
    )?;

    let mut passed = 0usize;
    let mut failed = 0usize;

    for (index, scenario) in file.scenarios.iter().enumerate() {
        println!("Scenario #{}: {}", index + 1, scenario.name);

        let voter_keys = VoterKeyPair::from_seed(&[(index + 1) as u8; 32]);
        let attributes = encode(&scenario.voter);
        let issued = authority.issue(poseidon, &attributes, voter_keys.public_key());
        let credential = Credential::new(attributes, *voter_keys.public_key());

        let request = ProveRequest {
            credential: &credential,
            voter_keys: &voter_keys,
            issued: &issued,
            criteria: &file.criteria,
            submitting_address: file.criteria.contract_address,
            vote_choice: scenario.vote_choice,
        };

        let prove_start = Instant::now();
        let observed = match system.prove(&mut rng, &request) {
            Ok(artifact) => {
                let verified = system.verify(&artifact)?;
                tracing::debug!(
                    target: LOG_TARGET,
                    verified,
                    elapsed = ?prove_start.elapsed(),
                    "proof generated"
                );
                if verified {
                    Expected::Pass
                } else {
                    Expected::Fail
                }
            }
            Err(ProveError::Ineligible(reason)) => {
                println!("   ineligible: {reason}");
                Expected::Fail
            }
            Err(other) => return Err(other.into()),
        };

        if observed == scenario.expected {
            println!("   OK ({:?} as expected)\n", scenario.expected);
            passed += 1;
        } else {
            println!(
                "   MISMATCH (expected {:?}, observed {:?})\n",
                scenario.expected, observed
            );
            failed += 1;
        }
    }

    println!("{} passed, {} failed", passed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
