use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::constants::{
    DYSPHAGIA, GLUTEN_FREE_FLAG, LACTOSE_FREE_FLAG, LOW_SUGAR_FLAGS,
};
use crate::models::{Allergy, DietTagKind, Dish, Resident, Severity, Texture};

/// Where an allergy matched the dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    DietaryFlag,
    Ingredient,
}

/// One allergy that conflicts with a dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergyConflict {
    pub substance: String,
    pub severity: Severity,
    /// The flag or ingredient name that matched.
    pub matched: String,
    pub source: MatchSource,
}

impl AllergyConflict {
    pub fn reason(&self) -> String {
        let source = match self.source {
            MatchSource::DietaryFlag => "flag",
            MatchSource::Ingredient => "ingredient",
        };
        format!(
            "allergy: {} ({}) matches {} '{}'",
            self.substance,
            self.severity.label(),
            source,
            self.matched
        )
    }
}

/// Outcome of checking one resident against one dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub allergy_conflicts: Vec<AllergyConflict>,
    pub soft_texture_required: bool,
    /// Texture the resident's own diet and conditions call for.
    pub texture_requirement: Texture,
    /// Texture the resident must be served: never below the dish's own texture.
    pub required_texture: Texture,
    pub has_low_sugar_tag: bool,
    pub has_low_sodium_tag: bool,
    pub low_sugar_violation: bool,
    pub low_sodium_violation: bool,
    pub gluten_violation: bool,
    pub lactose_violation: bool,
}

impl Classification {
    /// First conflicting allergy, if any.
    pub fn allergy_conflict(&self) -> Option<&AllergyConflict> {
        self.allergy_conflicts.first()
    }

    pub fn has_allergy_conflict(&self) -> bool {
        !self.allergy_conflicts.is_empty()
    }

    /// The dish must not be served to this resident in any form.
    pub fn is_unsuitable(&self) -> bool {
        self.low_sugar_violation || self.low_sodium_violation
    }

    /// Needs a version with some ingredients taken out.
    pub fn needs_exclusion_variant(&self) -> bool {
        self.has_allergy_conflict() || self.gluten_violation || self.lactose_violation
    }
}

/// Bidirectional, case-insensitive substring match.
pub fn allergen_matches(substance: &str, token: &str) -> bool {
    let substance = substance.trim().to_lowercase();
    let token = token.trim().to_lowercase();
    if substance.is_empty() || token.is_empty() {
        return false;
    }
    substance.contains(&token) || token.contains(&substance)
}

/// Every way `allergy` conflicts with `dish`, flags first then ingredients.
pub fn allergy_conflicts_for(allergy: &Allergy, dish: &Dish) -> Vec<AllergyConflict> {
    let flags = dish
        .dietary_flags
        .iter()
        .filter(|flag| allergen_matches(&allergy.substance, flag))
        .map(|flag| (flag.clone(), MatchSource::DietaryFlag));

    let ingredients = dish
        .ingredients
        .iter()
        .filter(|i| allergen_matches(&allergy.substance, &i.ingredient.name))
        .map(|i| (i.ingredient.name.clone(), MatchSource::Ingredient));

    flags
        .chain(ingredients)
        .map(|(matched, source)| AllergyConflict {
            substance: allergy.substance.clone(),
            severity: allergy.severity,
            matched,
            source,
        })
        .collect()
}

/// Texture a resident needs because of dysphagia.
///
/// Severe active dysphagia needs Pureed, any milder active case Minced.
pub fn dysphagia_texture(resident: &Resident) -> Texture {
    match resident.active_condition_severity(DYSPHAGIA) {
        Some(Severity::Severe) => Texture::Pureed,
        Some(_) => Texture::Minced,
        None => Texture::Regular,
    }
}

/// Evaluate every dietary rule for `resident` against `dish` on `date`.
pub fn classify(
    dish: &Dish,
    resident: &Resident,
    date: NaiveDate,
    config: &EngineConfig,
) -> Classification {
    let allergy_conflicts: Vec<AllergyConflict> = resident
        .active_allergies()
        .flat_map(|a| allergy_conflicts_for(a, dish))
        .collect();

    let has_low_sugar_tag = resident.has_active_tag(DietTagKind::LowSugar, date);
    let low_sugar_violation = has_low_sugar_tag
        && !dish.sugar_adjustable
        && !LOW_SUGAR_FLAGS.iter().any(|f| dish.has_flag(f));

    let has_low_sodium_tag = resident.has_active_tag(DietTagKind::LowSodium, date);
    let low_sodium_violation = has_low_sodium_tag
        && dish
            .sodium_level
            .is_some_and(|level| level > config.sodium_threshold_mg_per_100g);

    let gluten_violation = resident.has_active_tag(DietTagKind::GlutenFree, date)
        && !dish.has_flag(GLUTEN_FREE_FLAG);
    let lactose_violation = resident.has_active_tag(DietTagKind::LactoseFree, date)
        && !dish.has_flag(LACTOSE_FREE_FLAG);

    let soft_texture_required = resident.has_active_tag(DietTagKind::SoftTexture, date);
    let tag_texture = if soft_texture_required {
        Texture::Minced
    } else {
        Texture::Regular
    };
    let texture_requirement = tag_texture.max(dysphagia_texture(resident));
    let required_texture = dish.texture.max(texture_requirement);

    let classification = Classification {
        allergy_conflicts,
        soft_texture_required,
        texture_requirement,
        required_texture,
        has_low_sugar_tag,
        has_low_sodium_tag,
        low_sugar_violation,
        low_sodium_violation,
        gluten_violation,
        lactose_violation,
    };

    debug!(
        dish = %dish.name,
        resident = resident.id,
        allergy = classification.has_allergy_conflict(),
        unsuitable = classification.is_unsuitable(),
        texture = %classification.required_texture,
        "classified resident"
    );

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ChronicDisease, DietTag, DiseaseStatus, DishIngredient, Ingredient, IngredientUnit,
        MacroProfile,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn dish(flags: &[&str]) -> Dish {
        Dish {
            id: 1,
            name: "Braised Tofu".to_string(),
            texture: Texture::Regular,
            is_blendable: true,
            sugar_adjustable: false,
            sodium_level: Some(300.0),
            calories_per_100g: None,
            dietary_flags: flags.iter().map(|s| s.to_string()).collect(),
            ingredients: vec![DishIngredient {
                ingredient: Ingredient {
                    id: 7,
                    name: "Soybean paste".to_string(),
                    unit: IngredientUnit::Mass,
                    macros: MacroProfile::default(),
                },
                amount: 20.0,
            }],
            base_dish_id: None,
        }
    }

    fn resident() -> Resident {
        Resident {
            id: 1,
            name: "Resident".to_string(),
            institution_id: 1,
            allergies: vec![],
            diet_tags: vec![],
            chronic_diseases: vec![],
            admitted_on: None,
            discharged_on: None,
        }
    }

    fn tag(kind: DietTagKind) -> DietTag {
        DietTag {
            kind,
            is_active: true,
            expires_at: None,
        }
    }

    fn allergy(substance: &str) -> Allergy {
        Allergy {
            substance: substance.to_string(),
            severity: Severity::Severe,
            is_active: true,
        }
    }

    #[test]
    fn test_allergen_match_is_symmetric() {
        assert!(allergen_matches("peanut butter", "peanut"));
        assert!(allergen_matches("Peanut", "PEANUT BUTTER"));
        assert!(!allergen_matches("shrimp", "peanut"));
        assert!(!allergen_matches("", "peanut"));
    }

    #[test]
    fn test_allergy_matches_ingredient_name() {
        let mut r = resident();
        r.allergies.push(allergy("soybean"));
        let c = classify(&dish(&[]), &r, today(), &EngineConfig::default());
        assert!(c.has_allergy_conflict());
        assert_eq!(c.allergy_conflict().unwrap().source, MatchSource::Ingredient);
    }

    #[test]
    fn test_inactive_allergy_ignored() {
        let mut r = resident();
        let mut a = allergy("peanut");
        a.is_active = false;
        r.allergies.push(a);
        let c = classify(&dish(&["peanut"]), &r, today(), &EngineConfig::default());
        assert!(!c.has_allergy_conflict());
    }

    #[test]
    fn test_low_sugar_violation_rules() {
        let mut r = resident();
        r.diet_tags.push(tag(DietTagKind::LowSugar));
        let config = EngineConfig::default();

        assert!(classify(&dish(&[]), &r, today(), &config).low_sugar_violation);
        assert!(!classify(&dish(&["Diabetic"]), &r, today(), &config).low_sugar_violation);

        let mut adjustable = dish(&[]);
        adjustable.sugar_adjustable = true;
        assert!(!classify(&adjustable, &r, today(), &config).low_sugar_violation);
    }

    #[test]
    fn test_low_sodium_threshold() {
        let mut r = resident();
        r.diet_tags.push(tag(DietTagKind::LowSodium));
        let config = EngineConfig::default();

        let mut d = dish(&[]);
        d.sodium_level = Some(500.0);
        assert!(!classify(&d, &r, today(), &config).low_sodium_violation);
        d.sodium_level = Some(500.1);
        assert!(classify(&d, &r, today(), &config).low_sodium_violation);
        d.sodium_level = None;
        assert!(!classify(&d, &r, today(), &config).low_sodium_violation);
    }

    #[test]
    fn test_expired_tag_not_applied() {
        let mut r = resident();
        r.diet_tags.push(DietTag {
            kind: DietTagKind::GlutenFree,
            is_active: true,
            expires_at: NaiveDate::from_ymd_opt(2024, 5, 1),
        });
        let c = classify(&dish(&[]), &r, today(), &EngineConfig::default());
        assert!(!c.gluten_violation);
    }

    #[test]
    fn test_gluten_and_lactose() {
        let mut r = resident();
        r.diet_tags.push(tag(DietTagKind::GlutenFree));
        r.diet_tags.push(tag(DietTagKind::LactoseFree));
        let config = EngineConfig::default();

        let c = classify(&dish(&["gluten_free"]), &r, today(), &config);
        assert!(!c.gluten_violation);
        assert!(c.lactose_violation);
        assert!(c.needs_exclusion_variant());
    }

    #[test]
    fn test_soft_texture_never_downgrades_pureed() {
        let mut r = resident();
        r.diet_tags.push(tag(DietTagKind::SoftTexture));
        let config = EngineConfig::default();

        let c = classify(&dish(&[]), &r, today(), &config);
        assert!(c.soft_texture_required);
        assert_eq!(c.texture_requirement, Texture::Minced);
        assert_eq!(c.required_texture, Texture::Minced);

        let mut pureed = dish(&[]);
        pureed.texture = Texture::Pureed;
        assert_eq!(
            classify(&pureed, &r, today(), &config).required_texture,
            Texture::Pureed
        );
    }

    #[test]
    fn test_dysphagia_texture() {
        let mut r = resident();
        assert_eq!(dysphagia_texture(&r), Texture::Regular);

        r.chronic_diseases.push(ChronicDisease {
            name: "Dysphagia".to_string(),
            severity: Severity::Moderate,
            status: DiseaseStatus::Active,
        });
        assert_eq!(dysphagia_texture(&r), Texture::Minced);

        r.chronic_diseases[0].severity = Severity::Severe;
        assert_eq!(dysphagia_texture(&r), Texture::Pureed);
        let c = classify(&dish(&[]), &r, today(), &EngineConfig::default());
        assert_eq!(c.required_texture, Texture::Pureed);
    }
}
