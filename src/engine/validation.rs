use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::engine::constants::WEEK_LENGTH_DAYS;
use crate::engine::nutrition::dish_nutrition;
use crate::error::{EngineError, Result};
use crate::models::{Dish, MealSlot, NutritionSummary, WeeklyMenu, DAYS_PER_WEEK};
use crate::state::DishProvider;

/// Nutrition of one meal slot checked against its guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNutritionValidation {
    pub day: Option<u8>,
    pub slot: MealSlot,
    pub item_count: usize,
    /// Per-resident nutrition: one serving of every item in the slot.
    pub summary: NutritionSummary,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl MenuNutritionValidation {
    pub fn within_guidelines(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Warnings and paired recommendations for `summary` in `slot`.
///
/// One pair per out-of-range metric, in the order calories, protein, sodium.
pub fn check_guidelines(
    slot: MealSlot,
    summary: &NutritionSummary,
    config: &EngineConfig,
) -> (Vec<String>, Vec<String>) {
    let g = config.guideline(slot);
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    if summary.calories < g.calories_min {
        warnings.push(format!(
            "{}: Calories too low (minimum {} kcal)",
            slot, g.calories_min
        ));
        recommendations.push(format!(
            "{}: add a staple or calorie-dense side to reach at least {} kcal",
            slot, g.calories_min
        ));
    } else if summary.calories > g.calories_max {
        warnings.push(format!(
            "{}: Calories too high (maximum {} kcal)",
            slot, g.calories_max
        ));
        recommendations.push(format!(
            "{}: reduce portions or swap in lighter dishes to stay under {} kcal",
            slot, g.calories_max
        ));
    }

    if summary.protein < g.protein_min {
        warnings.push(format!(
            "{}: Protein too low (minimum {} g)",
            slot, g.protein_min
        ));
        recommendations.push(format!(
            "{}: add eggs, dairy, tofu or lean meat to reach {} g protein",
            slot, g.protein_min
        ));
    }

    if summary.sodium_or_zero() > config.slot_sodium_limit_mg {
        warnings.push(format!(
            "{}: Sodium too high (limit {} mg)",
            slot, config.slot_sodium_limit_mg
        ));
        recommendations.push(format!(
            "{}: choose low-salt dishes to keep sodium under {} mg",
            slot, config.slot_sodium_limit_mg
        ));
    }

    (warnings, recommendations)
}

/// Validate the dishes served together in one slot.
///
/// An empty slot has nothing to validate and yields no warnings.
pub fn validate_slot(
    slot: MealSlot,
    dishes: &[Dish],
    config: &EngineConfig,
) -> MenuNutritionValidation {
    let summary: NutritionSummary = dishes
        .iter()
        .map(|d| dish_nutrition(d, 1, config))
        .sum();

    let (warnings, recommendations) = if dishes.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        check_guidelines(slot, &summary, config)
    };

    for w in &warnings {
        warn!(slot = %slot, calories = summary.calories, "{}", w);
    }

    MenuNutritionValidation {
        day: None,
        slot,
        item_count: dishes.len(),
        summary,
        warnings,
        recommendations,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
    pub day: u8,
    pub date: Option<NaiveDate>,
    pub slots: Vec<MenuNutritionValidation>,
    pub total: NutritionSummary,
}

/// Full-week nutrition report for a menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMenuNutritionReport {
    pub menu_id: u64,
    pub menu_name: String,
    pub days: Vec<DailyNutrition>,
    pub weekly_total: NutritionSummary,
    /// Weekly total divided by seven.
    pub daily_average: NutritionSummary,
    /// Distinct warnings across all slots.
    pub warnings: BTreeSet<String>,
    pub recommendations: BTreeSet<String>,
}

/// Validate every day and slot of `menu` and roll the results up.
///
/// Dishes are looked up once per menu item; a missing dish aborts the report.
pub fn weekly_report<D: DishProvider>(
    menu: &WeeklyMenu,
    dishes: &D,
    config: &EngineConfig,
) -> Result<WeeklyMenuNutritionReport> {
    if let Some(item) = menu.items.iter().find(|i| i.day >= DAYS_PER_WEEK) {
        return Err(EngineError::InvalidInput(format!(
            "menu {} has an item on day {}, expected 0-{}",
            menu.id,
            item.day,
            DAYS_PER_WEEK - 1
        )));
    }

    let mut days = Vec::with_capacity(DAYS_PER_WEEK as usize);
    let mut warnings = BTreeSet::new();
    let mut recommendations = BTreeSet::new();

    for day in 0..DAYS_PER_WEEK {
        let mut slots = Vec::with_capacity(MealSlot::ALL.len());

        for slot in MealSlot::ALL {
            let slot_dishes = menu
                .items_in(day, slot)
                .map(|item| dishes.get(item.dish_id))
                .collect::<Result<Vec<Dish>>>()?;

            let mut validation = validate_slot(slot, &slot_dishes, config);
            validation.day = Some(day);

            warnings.extend(validation.warnings.iter().cloned());
            recommendations.extend(validation.recommendations.iter().cloned());
            slots.push(validation);
        }

        let total: NutritionSummary = slots.iter().map(|s| s.summary).sum();
        days.push(DailyNutrition {
            day,
            date: menu.date_of(day),
            slots,
            total,
        });
    }

    let weekly_total: NutritionSummary = days.iter().map(|d| d.total).sum();
    let daily_average = weekly_total.divided_by(WEEK_LENGTH_DAYS);

    Ok(WeeklyMenuNutritionReport {
        menu_id: menu.id,
        menu_name: menu.name.clone(),
        days,
        weekly_total,
        daily_average,
        warnings,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DishIngredient, Ingredient, IngredientUnit, MacroProfile, Texture};

    fn dish(calories_per_100g: f64) -> Dish {
        Dish {
            id: 1,
            name: "Porridge".to_string(),
            texture: Texture::Regular,
            is_blendable: true,
            sugar_adjustable: false,
            sodium_level: None,
            calories_per_100g: Some(calories_per_100g),
            dietary_flags: vec![],
            ingredients: vec![],
            base_dish_id: None,
        }
    }

    fn detailed(calories: f64, protein: f64, sodium: f64) -> Dish {
        let mut d = dish(0.0);
        d.ingredients.push(DishIngredient {
            ingredient: Ingredient {
                id: 1,
                name: "Base".to_string(),
                unit: IngredientUnit::Mass,
                macros: MacroProfile {
                    calories,
                    protein,
                    fat: 0.0,
                    carbs: 0.0,
                    fiber: 0.0,
                    sodium,
                },
            },
            amount: 100.0,
        });
        d
    }

    #[test]
    fn test_breakfast_too_low() {
        let v = validate_slot(MealSlot::Breakfast, &[dish(250.0)], &EngineConfig::default());
        assert_eq!(v.summary.calories, 250.0);
        assert!(v.warnings.iter().any(|w| w.contains("Calories too low")));
        assert!(v.recommendations.iter().any(|r| r.contains("at least 300 kcal")));
        assert_eq!(v.warnings.len(), v.recommendations.len());
        assert!(!v.within_guidelines());
    }

    #[test]
    fn test_within_guidelines() {
        let v = validate_slot(
            MealSlot::Lunch,
            &[detailed(600.0, 30.0, 500.0)],
            &EngineConfig::default(),
        );
        assert!(v.within_guidelines(), "unexpected: {:?}", v.warnings);
    }

    #[test]
    fn test_sodium_warning_independent_of_calories() {
        let v = validate_slot(
            MealSlot::Lunch,
            &[detailed(600.0, 30.0, 1200.0)],
            &EngineConfig::default(),
        );
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].contains("Sodium too high"));
    }

    #[test]
    fn test_calories_too_high_and_protein_low() {
        let v = validate_slot(
            MealSlot::Afternoon,
            &[detailed(450.0, 2.0, 0.0)],
            &EngineConfig::default(),
        );
        assert_eq!(v.warnings.len(), 2);
        assert!(v.warnings[0].contains("Calories too high"));
        assert!(v.warnings[1].contains("Protein too low"));
    }

    #[test]
    fn test_empty_slot_has_no_warnings() {
        let v = validate_slot(MealSlot::Dinner, &[], &EngineConfig::default());
        assert_eq!(v.summary, NutritionSummary::default());
        assert!(v.within_guidelines());
    }
}
