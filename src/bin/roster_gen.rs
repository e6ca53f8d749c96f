use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use mealguard::models::{
    Allergy, ChronicDisease, DietTag, DietTagKind, DiseaseStatus, Resident, Severity,
};
use mealguard::state::{load_snapshot, save_snapshot, Snapshot};

const ALLERGENS: [&str; 8] = [
    "peanut", "shrimp", "egg", "milk", "soy", "wheat", "sesame", "fish",
];

const CONDITIONS: [&str; 4] = ["dysphagia", "diabetes", "hypertension", "gout"];

const TAG_KINDS: [DietTagKind; 5] = [
    DietTagKind::LowSugar,
    DietTagKind::LowSodium,
    DietTagKind::GlutenFree,
    DietTagKind::LactoseFree,
    DietTagKind::SoftTexture,
];

const SEVERITIES: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

#[derive(Parser, Debug)]
#[command(name = "roster-gen")]
#[command(about = "Generate a synthetic resident roster for load testing")]
struct Args {
    /// Number of residents to generate
    #[arg(long, default_value = "200")]
    residents: u64,

    /// Institution the residents belong to
    #[arg(long, default_value = "1")]
    institution: u64,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Existing snapshot to merge dishes and menus from
    #[arg(long)]
    base: Option<PathBuf>,

    /// Output snapshot file
    #[arg(long, default_value = "mealguard.json")]
    out: PathBuf,
}

fn random_severity(rng: &mut StdRng) -> Severity {
    *SEVERITIES.choose(rng).unwrap_or(&Severity::Mild)
}

fn random_resident(rng: &mut StdRng, id: u64, institution_id: u64, today: NaiveDate) -> Resident {
    let mut allergies = Vec::new();
    for substance in ALLERGENS {
        if rng.gen_bool(0.05) {
            allergies.push(Allergy {
                substance: substance.to_string(),
                severity: random_severity(rng),
                is_active: true,
            });
        }
    }

    let mut diet_tags = Vec::new();
    for kind in TAG_KINDS {
        if rng.gen_bool(0.15) {
            let expires_at = if rng.gen_bool(0.2) {
                today.checked_add_days(Days::new(rng.gen_range(1..90)))
            } else {
                None
            };
            diet_tags.push(DietTag {
                kind,
                is_active: true,
                expires_at,
            });
        }
    }

    let mut chronic_diseases = Vec::new();
    for name in CONDITIONS {
        if rng.gen_bool(0.1) {
            let severity = random_severity(rng);
            let status = if rng.gen_bool(0.9) {
                DiseaseStatus::Active
            } else {
                DiseaseStatus::Inactive
            };
            chronic_diseases.push(ChronicDisease {
                name: name.to_string(),
                severity,
                status,
            });
        }
    }

    Resident {
        id,
        name: format!("Resident {:04}", id),
        institution_id,
        allergies,
        diet_tags,
        chronic_diseases,
        admitted_on: None,
        discharged_on: None,
    }
}

/// Append `count` residents to `snapshot`, numbered after the highest existing id.
fn generate_roster(
    snapshot: &mut Snapshot,
    count: u64,
    institution_id: u64,
    seed: u64,
    today: NaiveDate,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    let first_id = snapshot.residents.iter().map(|r| r.id).max().unwrap_or(0) + 1;

    for id in first_id..first_id + count {
        let resident = random_resident(&mut rng, id, institution_id, today);
        snapshot.residents.push(resident);
    }
}

fn main() {
    let args = Args::parse();

    let mut snapshot = match &args.base {
        Some(path) => match load_snapshot(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading base snapshot {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Snapshot::default(),
    };

    let today = chrono::Local::now().date_naive();
    generate_roster(&mut snapshot, args.residents, args.institution, args.seed, today);

    if let Err(e) = save_snapshot(&args.out, &snapshot) {
        eprintln!("Error writing snapshot: {}", e);
        std::process::exit(1);
    }

    println!(
        "Wrote {} residents ({} generated) to {:?}",
        snapshot.residents.len(),
        args.residents,
        args.out
    );
}
