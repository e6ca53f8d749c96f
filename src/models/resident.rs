use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allergy {
    pub substance: String,
    pub severity: Severity,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietTagKind {
    LowSugar,
    LowSodium,
    GlutenFree,
    LactoseFree,
    SoftTexture,
}

impl DietTagKind {
    pub fn label(&self) -> &'static str {
        match self {
            DietTagKind::LowSugar => "low-sugar",
            DietTagKind::LowSodium => "low-sodium",
            DietTagKind::GlutenFree => "gluten-free",
            DietTagKind::LactoseFree => "lactose-free",
            DietTagKind::SoftTexture => "soft-texture",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietTag {
    pub kind: DietTagKind,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
}

impl DietTag {
    /// Active on `date`: flagged active and not yet expired.
    ///
    /// A tag expiring on `date` itself is no longer active.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.expires_at.is_none_or(|expiry| expiry > date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronicDisease {
    pub name: String,
    pub severity: Severity,
    pub status: DiseaseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub institution_id: u64,
    #[serde(default)]
    pub allergies: Vec<Allergy>,
    #[serde(default)]
    pub diet_tags: Vec<DietTag>,
    #[serde(default)]
    pub chronic_diseases: Vec<ChronicDisease>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admitted_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharged_on: Option<NaiveDate>,
}

impl Resident {
    /// Whether the resident has an active tag of `kind` on `date`.
    pub fn has_active_tag(&self, kind: DietTagKind, date: NaiveDate) -> bool {
        self.diet_tags
            .iter()
            .any(|t| t.kind == kind && t.is_active_on(date))
    }

    pub fn active_allergies(&self) -> impl Iterator<Item = &Allergy> {
        self.allergies.iter().filter(|a| a.is_active)
    }

    /// Severity of the most severe active condition whose name contains `name`.
    pub fn active_condition_severity(&self, name: &str) -> Option<Severity> {
        let needle = name.to_lowercase();
        self.chronic_diseases
            .iter()
            .filter(|d| d.status == DiseaseStatus::Active)
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .map(|d| d.severity)
            .max()
    }

    /// Present in the institution on `date` (admitted and not yet discharged).
    pub fn is_present_on(&self, date: NaiveDate) -> bool {
        self.admitted_on.is_none_or(|d| d <= date) && self.discharged_on.is_none_or(|d| d > date)
    }

    pub fn summary(&self) -> ResidentRef {
        ResidentRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Lightweight reference to a resident inside engine results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidentRef {
    pub id: u64,
    pub name: String,
}
