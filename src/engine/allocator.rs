use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::engine::classifier::{allergen_matches, classify, Classification};
use crate::engine::constants::{
    DYSPHAGIA, GLUTEN_KEYWORDS, LACTOSE_KEYWORDS, SALT_KEYWORDS, SWEETENER_KEYWORDS,
};
use crate::engine::nutrition::{dish_nutrition, per_serving_macros, MacroTotals};
use crate::error::{EngineError, Result};
use crate::models::{
    round_to, Dish, DishIngredient, IngredientUnit, MealSlot, NutritionSummary, Resident,
    ResidentRef, Texture, WeeklyMenu, DAYS_PER_WEEK,
};
use crate::state::DishProvider;

/// Recipe adjustment applied to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    None,
    LowSugar,
    LowSodium,
}

/// One ingredient line scaled to a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub ingredient_id: u64,
    pub name: String,
    pub unit: IngredientUnit,
    pub per_serving: f64,
    pub total: f64,
}

/// A resident in a bucket, with why they are there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketMember {
    pub resident: ResidentRef,
    pub reasons: Vec<String>,
}

/// Residents sharing one version of a dish, with what that version needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketBreakdown {
    pub count: u32,
    pub members: Vec<BucketMember>,
    pub nutrition: NutritionSummary,
    pub ingredients: Vec<IngredientAmount>,
}

impl BucketBreakdown {
    fn push(&mut self, resident: &Resident, reasons: Vec<String>) {
        self.count += 1;
        self.members.push(BucketMember {
            resident: resident.summary(),
            reasons,
        });
    }

    pub fn resident_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.members.iter().map(|m| m.resident.id)
    }
}

/// A resident left out of a dish entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub resident: ResidentRef,
    pub reason: String,
}

/// Serving partitions of one dish over a resident population.
///
/// `allergy_safe`, `regular` and the tag buckets (`low_sugar`, `low_sodium`)
/// together with `excluded` cover every resident once; a resident may sit in
/// both tag buckets. `minced` and `pureed` tally served residents by texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingsBreakdown {
    pub dish_id: u64,
    pub dish_name: String,
    pub evaluation_date: NaiveDate,
    pub population: u32,
    /// Residents not excluded as unsuitable.
    pub total: u32,
    pub regular: BucketBreakdown,
    pub allergy_safe: BucketBreakdown,
    pub low_sugar: BucketBreakdown,
    pub low_sodium: BucketBreakdown,
    pub minced: BucketBreakdown,
    pub pureed: BucketBreakdown,
    pub excluded: Vec<Exclusion>,
}

impl ServingsBreakdown {
    /// Check the partition invariants.
    pub fn check_invariants(&self) -> bool {
        let excluded: HashSet<u64> = self.excluded.iter().map(|e| e.resident.id).collect();
        let allergy: HashSet<u64> = self.allergy_safe.resident_ids().collect();
        let suitable: HashSet<u64> = self
            .regular
            .resident_ids()
            .chain(self.low_sugar.resident_ids())
            .chain(self.low_sodium.resident_ids())
            .collect();

        let disjoint = excluded.is_disjoint(&allergy)
            && excluded.is_disjoint(&suitable)
            && allergy.is_disjoint(&suitable);
        let covered = excluded.len() + allergy.len() + suitable.len() == self.population as usize;
        let served = (self.population as usize).checked_sub(excluded.len());

        disjoint
            && covered
            && self.regular.count + self.allergy_safe.count <= self.population
            && served == Some(self.total as usize)
            && self.minced.count + self.pureed.count <= self.total
    }
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(k))
}

/// Per-serving multiplier for an ingredient under `adjustment`.
fn ingredient_factor(item: &DishIngredient, adjustment: Adjustment, config: &EngineConfig) -> f64 {
    match adjustment {
        Adjustment::LowSugar if contains_any(&item.ingredient.name, &SWEETENER_KEYWORDS) => {
            1.0 - config.sugar_reduction
        }
        Adjustment::LowSodium if contains_any(&item.ingredient.name, &SALT_KEYWORDS) => {
            1.0 - config.sodium_reduction
        }
        _ => 1.0,
    }
}

/// Fill in nutrition and ingredient amounts for a bucket of `count` servings.
fn finish_bucket<F>(
    bucket: &mut BucketBreakdown,
    dish: &Dish,
    adjustment: Adjustment,
    config: &EngineConfig,
    keep: F,
) where
    F: Fn(&DishIngredient) -> bool,
{
    let count = bucket.count;

    bucket.nutrition = if dish.ingredients.is_empty() {
        dish_nutrition(dish, count, config)
    } else {
        let base: MacroTotals = per_serving_macros(dish, config, &keep);
        let adjusted = match adjustment {
            Adjustment::None => base,
            Adjustment::LowSugar => {
                base.with_sugar_reduction(config.sugar_reduction, config.sugar_kcal_per_gram)
            }
            Adjustment::LowSodium => base.with_sodium_reduction(config.sodium_reduction),
        };
        adjusted.scaled(count as f64).into_summary()
    };

    bucket.ingredients = dish
        .ingredients
        .iter()
        .filter(|item| keep(item))
        .map(|item| {
            let per_serving = item.amount * ingredient_factor(item, adjustment, config);
            IngredientAmount {
                ingredient_id: item.ingredient.id,
                name: item.ingredient.name.clone(),
                unit: item.ingredient.unit,
                per_serving: round_to(per_serving, 1),
                total: round_to(per_serving * count as f64, 1),
            }
        })
        .collect();
}

fn texture_reasons(c: &Classification, resident: &Resident, dish: &Dish) -> Vec<String> {
    let mut reasons = Vec::new();
    if c.soft_texture_required {
        reasons.push("soft-texture diet".to_string());
    }
    if let Some(severity) = resident.active_condition_severity(DYSPHAGIA) {
        reasons.push(format!("dysphagia ({})", severity.label()));
    }
    if dish.texture > c.texture_requirement {
        reasons.push(format!("dish is already {}", dish.texture.label().to_lowercase()));
    }
    reasons
}

fn exclusion_variant_reasons(c: &Classification) -> Vec<String> {
    let mut reasons: Vec<String> = c.allergy_conflicts.iter().map(|a| a.reason()).collect();
    if c.gluten_violation {
        reasons.push("gluten-free diet: dish is not flagged gluten_free".to_string());
    }
    if c.lactose_violation {
        reasons.push("lactose-free diet: dish is not flagged lactose_free".to_string());
    }
    reasons
}

/// Partition `residents` into serving buckets for `dish` on `date`.
///
/// Allergy (and gluten/lactose) conflicts go to `allergy_safe` and skip the
/// remaining diet checks. Low-sugar and low-sodium violations exclude the
/// resident from the dish. Residents carrying those tags for a suitable dish
/// are counted in `low_sugar`/`low_sodium` instead of `regular`.
pub fn allocate(
    dish: &Dish,
    residents: &[Resident],
    date: NaiveDate,
    config: &EngineConfig,
) -> ServingsBreakdown {
    let mut regular = BucketBreakdown::default();
    let mut allergy_safe = BucketBreakdown::default();
    let mut low_sugar = BucketBreakdown::default();
    let mut low_sodium = BucketBreakdown::default();
    let mut minced = BucketBreakdown::default();
    let mut pureed = BucketBreakdown::default();
    let mut excluded = Vec::new();

    // What the allergy-safe recipe must leave out.
    let mut conflicting_substances: Vec<String> = Vec::new();
    let mut omit_gluten = false;
    let mut omit_lactose = false;

    for resident in residents {
        let c = classify(dish, resident, date, config);

        if c.needs_exclusion_variant() {
            for conflict in &c.allergy_conflicts {
                if !conflicting_substances.contains(&conflict.substance) {
                    conflicting_substances.push(conflict.substance.clone());
                }
            }
            omit_gluten |= c.gluten_violation;
            omit_lactose |= c.lactose_violation;
            allergy_safe.push(resident, exclusion_variant_reasons(&c));
        } else if c.low_sugar_violation {
            debug!(dish = %dish.name, resident = resident.id, "excluded: low-sugar");
            excluded.push(Exclusion {
                resident: resident.summary(),
                reason: "low-sugar diet: dish is not sugar-adjustable or flagged diabetic/low_sugar"
                    .to_string(),
            });
            continue;
        } else if c.low_sodium_violation {
            debug!(dish = %dish.name, resident = resident.id, "excluded: low-sodium");
            excluded.push(Exclusion {
                resident: resident.summary(),
                reason: format!(
                    "low-sodium diet: sodium {} mg/100g exceeds {} mg/100g",
                    dish.sodium_level.unwrap_or_default(),
                    config.sodium_threshold_mg_per_100g
                ),
            });
            continue;
        } else if c.has_low_sugar_tag || c.has_low_sodium_tag {
            if c.has_low_sugar_tag {
                let reason = if dish.sugar_adjustable {
                    "low-sugar diet: sugar can be reduced"
                } else {
                    "low-sugar diet: dish is flagged diabetic/low_sugar"
                };
                low_sugar.push(resident, vec![reason.to_string()]);
            }
            if c.has_low_sodium_tag {
                let reason = match dish.sodium_level {
                    Some(level) => format!(
                        "low-sodium diet: sodium {} mg/100g within {} mg/100g",
                        level, config.sodium_threshold_mg_per_100g
                    ),
                    None => "low-sodium diet: sodium level not recorded".to_string(),
                };
                low_sodium.push(resident, vec![reason]);
            }
        } else {
            regular.push(resident, Vec::new());
        }

        if c.texture_requirement > Texture::Regular {
            let reasons = texture_reasons(&c, resident, dish);
            match c.required_texture {
                Texture::Pureed => pureed.push(resident, reasons),
                _ => minced.push(resident, reasons),
            }
        }
    }

    let population = residents.len() as u32;
    let total = population - excluded.len() as u32;

    let keep_all = |_: &DishIngredient| true;
    let allergen_free = |item: &DishIngredient| {
        let name = &item.ingredient.name;
        !(conflicting_substances.iter().any(|s| allergen_matches(s, name))
            || (omit_gluten && contains_any(name, &GLUTEN_KEYWORDS))
            || (omit_lactose && contains_any(name, &LACTOSE_KEYWORDS)))
    };
    // Flagged low-sugar dishes are served as they are.
    let sugar_adjustment = if dish.sugar_adjustable {
        Adjustment::LowSugar
    } else {
        Adjustment::None
    };

    finish_bucket(&mut regular, dish, Adjustment::None, config, keep_all);
    finish_bucket(&mut allergy_safe, dish, Adjustment::None, config, allergen_free);
    finish_bucket(&mut low_sugar, dish, sugar_adjustment, config, keep_all);
    finish_bucket(&mut low_sodium, dish, Adjustment::LowSodium, config, keep_all);
    finish_bucket(&mut minced, dish, Adjustment::None, config, keep_all);
    finish_bucket(&mut pureed, dish, Adjustment::None, config, keep_all);

    info!(
        dish = %dish.name,
        population,
        total,
        regular = regular.count,
        allergy_safe = allergy_safe.count,
        excluded = excluded.len(),
        "allocated servings"
    );

    ServingsBreakdown {
        dish_id: dish.id,
        dish_name: dish.name.clone(),
        evaluation_date: date,
        population,
        total,
        regular,
        allergy_safe,
        low_sugar,
        low_sodium,
        minced,
        pureed,
        excluded,
    }
}

/// Servings decided for one menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemAllocation {
    pub item_index: usize,
    pub day: u8,
    pub slot: MealSlot,
    /// The dish actually served: the texture variant when one applies.
    pub dish_id: u64,
    pub servings: u32,
    /// `servings` came from the allocation rather than the menu.
    pub auto: bool,
    /// The item asked for a texture variant that is not stored yet, so the
    /// base dish was allocated instead.
    pub variant_missing: bool,
    pub breakdown: ServingsBreakdown,
}

/// Allocate every item of `menu`, filling in servings where the menu has none.
///
/// A texture override uses the stored variant when it exists; otherwise the
/// base dish is allocated. Nothing is cached: each call recomputes.
pub fn plan_menu_servings<D: DishProvider>(
    menu: &WeeklyMenu,
    dishes: &D,
    residents: &[Resident],
    date: NaiveDate,
    config: &EngineConfig,
) -> Result<Vec<MenuItemAllocation>> {
    let mut allocations = Vec::with_capacity(menu.items.len());

    for (item_index, item) in menu.items.iter().enumerate() {
        if item.day >= DAYS_PER_WEEK {
            return Err(EngineError::InvalidInput(format!(
                "menu {} item {} has day {}, expected 0-{}",
                menu.id,
                item_index,
                item.day,
                DAYS_PER_WEEK - 1
            )));
        }

        let base = dishes.get(item.dish_id)?;
        let (dish, variant_missing) = match item.texture_variant {
            Some(texture) if texture != base.texture => {
                match dishes.find_variant(&base.name, texture)? {
                    Some(variant) => (variant, false),
                    None => {
                        warn!(
                            menu = menu.id,
                            item = item_index,
                            dish = %base.name,
                            %texture,
                            "texture variant not stored, allocating base dish"
                        );
                        (base, true)
                    }
                }
            }
            _ => (base, false),
        };

        let item_date = menu.date_of(item.day).unwrap_or(date);
        let breakdown = allocate(&dish, residents, item_date, config);
        let auto = item.needs_auto_servings();
        let servings = if auto { breakdown.total } else { item.servings };

        allocations.push(MenuItemAllocation {
            item_index,
            day: item.day,
            slot: item.slot,
            dish_id: dish.id,
            servings,
            auto,
            variant_missing,
            breakdown,
        });
    }

    Ok(allocations)
}
