#![allow(dead_code)]

use chrono::NaiveDate;

use mealguard::models::{
    Allergy, ChronicDisease, DietTag, DietTagKind, DiseaseStatus, Dish, DishIngredient,
    Ingredient, IngredientUnit, MacroProfile, Resident, Severity, Texture,
};

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

pub fn dish(id: u64, name: &str, calories_per_100g: f64) -> Dish {
    Dish {
        id,
        name: name.to_string(),
        texture: Texture::Regular,
        is_blendable: true,
        sugar_adjustable: false,
        sodium_level: None,
        calories_per_100g: Some(calories_per_100g),
        dietary_flags: Vec::new(),
        ingredients: Vec::new(),
        base_dish_id: None,
    }
}

pub fn line(id: u64, name: &str, unit: IngredientUnit, amount: f64, calories: f64, protein: f64) -> DishIngredient {
    DishIngredient {
        ingredient: Ingredient {
            id,
            name: name.to_string(),
            unit,
            macros: MacroProfile {
                calories,
                protein,
                fat: 1.0,
                carbs: 10.0,
                fiber: 0.5,
                sodium: 40.0,
            },
        },
        amount,
    }
}

pub fn resident(id: u64) -> Resident {
    Resident {
        id,
        name: format!("Resident {}", id),
        institution_id: 1,
        allergies: Vec::new(),
        diet_tags: Vec::new(),
        chronic_diseases: Vec::new(),
        admitted_on: None,
        discharged_on: None,
    }
}

pub fn with_allergy(mut r: Resident, substance: &str, severity: Severity) -> Resident {
    r.allergies.push(Allergy {
        substance: substance.to_string(),
        severity,
        is_active: true,
    });
    r
}

pub fn with_tag(mut r: Resident, kind: DietTagKind) -> Resident {
    r.diet_tags.push(DietTag {
        kind,
        is_active: true,
        expires_at: None,
    });
    r
}

pub fn with_dysphagia(mut r: Resident, severity: Severity) -> Resident {
    r.chronic_diseases.push(ChronicDisease {
        name: "Dysphagia".to_string(),
        severity,
        status: DiseaseStatus::Active,
    });
    r
}
