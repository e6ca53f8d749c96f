use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{Dish, DishIngredient, IngredientUnit, NutritionSummary};

/// Unrounded nutrient accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub sodium: f64,
}

impl MacroTotals {
    /// Multiply every nutrient by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbs: self.carbs * factor,
            fiber: self.fiber * factor,
            sodium: self.sodium * factor,
        }
    }

    fn accumulate(&mut self, other: &MacroTotals) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.fat += other.fat;
        self.carbs += other.carbs;
        self.fiber += other.fiber;
        self.sodium += other.sodium;
    }

    /// Remove `reduction` of the carbohydrate, and the calories it carried.
    pub fn with_sugar_reduction(self, reduction: f64, kcal_per_gram: f64) -> Self {
        let removed = self.carbs * reduction;
        Self {
            carbs: self.carbs - removed,
            calories: (self.calories - removed * kcal_per_gram).max(0.0),
            ..self
        }
    }

    /// Remove `reduction` of the sodium. Nothing else changes.
    pub fn with_sodium_reduction(self, reduction: f64) -> Self {
        Self {
            sodium: self.sodium * (1.0 - reduction),
            ..self
        }
    }

    /// Rounded summary including fiber and sodium.
    pub fn into_summary(self) -> NutritionSummary {
        NutritionSummary {
            calories: self.calories,
            protein: self.protein,
            fat: self.fat,
            carbs: self.carbs,
            fiber: Some(self.fiber),
            sodium: Some(self.sodium),
        }
        .rounded()
    }
}

/// Amount of an ingredient expressed in grams.
///
/// Pieces weigh `piece_weight_g` each; volume is taken as 1 ml = 1 g.
pub fn mass_equivalent(amount: f64, unit: IngredientUnit, piece_weight_g: f64) -> f64 {
    match unit {
        IngredientUnit::Mass | IngredientUnit::Volume => amount,
        IngredientUnit::Piece => amount * piece_weight_g,
    }
}

/// Nutrients contributed by one ingredient line for a single serving.
pub fn ingredient_macros(item: &DishIngredient, config: &EngineConfig) -> MacroTotals {
    let grams = mass_equivalent(item.amount, item.ingredient.unit, config.piece_weight_g);
    let ratio = grams / 100.0;
    let m = &item.ingredient.macros;
    MacroTotals {
        calories: m.calories * ratio,
        protein: m.protein * ratio,
        fat: m.fat * ratio,
        carbs: m.carbs * ratio,
        fiber: m.fiber * ratio,
        sodium: m.sodium * ratio,
    }
}

/// Per-serving nutrients of the ingredients accepted by `keep`, summed in
/// ingredient order.
pub fn per_serving_macros<F>(dish: &Dish, config: &EngineConfig, keep: F) -> MacroTotals
where
    F: Fn(&DishIngredient) -> bool,
{
    let mut totals = MacroTotals::default();
    for item in dish.ingredients.iter().filter(|i| keep(i)) {
        totals.accumulate(&ingredient_macros(item, config));
    }
    totals
}

/// Nutrition for `servings` servings of `dish`.
///
/// Dishes without ingredient records fall back to `calories_per_100g`,
/// assuming 100 g per serving; only calories are known then.
pub fn dish_nutrition(dish: &Dish, servings: u32, config: &EngineConfig) -> NutritionSummary {
    if dish.ingredients.is_empty() {
        let per_100g = dish.calories_per_100g.unwrap_or(0.0);
        return NutritionSummary {
            calories: per_100g * (100.0 * servings as f64) / 100.0,
            ..Default::default()
        }
        .rounded();
    }

    per_serving_macros(dish, config, |_| true)
        .scaled(servings as f64)
        .into_summary()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, MacroProfile, Texture};

    fn ingredient(name: &str, unit: IngredientUnit, amount: f64, macros: MacroProfile) -> DishIngredient {
        DishIngredient {
            ingredient: Ingredient {
                id: 1,
                name: name.to_string(),
                unit,
                macros,
            },
            amount,
        }
    }

    fn dish(ingredients: Vec<DishIngredient>) -> Dish {
        Dish {
            id: 1,
            name: "Test".to_string(),
            texture: Texture::Regular,
            is_blendable: true,
            sugar_adjustable: false,
            sodium_level: None,
            calories_per_100g: Some(120.0),
            dietary_flags: vec![],
            ingredients,
            base_dish_id: None,
        }
    }

    #[test]
    fn test_mass_equivalent() {
        assert_eq!(mass_equivalent(2.0, IngredientUnit::Piece, 50.0), 100.0);
        assert_eq!(mass_equivalent(30.0, IngredientUnit::Volume, 50.0), 30.0);
        assert_eq!(mass_equivalent(30.0, IngredientUnit::Mass, 50.0), 30.0);
    }

    #[test]
    fn test_dish_nutrition_from_ingredients() {
        let rice = MacroProfile {
            calories: 130.0,
            protein: 2.6,
            fat: 0.3,
            carbs: 28.0,
            fiber: 0.4,
            sodium: 1.0,
        };
        let egg = MacroProfile {
            calories: 155.0,
            protein: 12.0,
            fat: 11.0,
            carbs: 1.1,
            fiber: 0.0,
            sodium: 124.0,
        };
        let d = dish(vec![
            ingredient("rice", IngredientUnit::Mass, 150.0, rice),
            ingredient("egg", IngredientUnit::Piece, 1.0, egg),
        ]);

        let n = dish_nutrition(&d, 1, &EngineConfig::default());
        // 195 + 77.5
        assert_eq!(n.calories, 273.0);
        assert_eq!(n.protein, 9.9);
        assert_eq!(n.sodium, Some(63.5));

        let n2 = dish_nutrition(&d, 2, &EngineConfig::default());
        assert_eq!(n2.calories, 545.0);
    }

    #[test]
    fn test_fallback_uses_calories_per_100g() {
        let d = dish(vec![]);
        let n = dish_nutrition(&d, 3, &EngineConfig::default());
        assert_eq!(n.calories, 360.0);
        assert_eq!(n.protein, 0.0);
        assert_eq!(n.sodium, None);
    }

    #[test]
    fn test_zero_servings() {
        let d = dish(vec![]);
        assert_eq!(dish_nutrition(&d, 0, &EngineConfig::default()).calories, 0.0);
    }

    #[test]
    fn test_sugar_reduction_offsets_calories() {
        let totals = MacroTotals {
            calories: 400.0,
            carbs: 50.0,
            ..Default::default()
        };
        let reduced = totals.with_sugar_reduction(0.3, 4.0);
        assert!((reduced.carbs - 35.0).abs() < 1e-9);
        assert!((reduced.calories - 340.0).abs() < 1e-9);
    }

    #[test]
    fn test_sodium_reduction_touches_only_sodium() {
        let totals = MacroTotals {
            calories: 400.0,
            sodium: 800.0,
            ..Default::default()
        };
        let reduced = totals.with_sodium_reduction(0.5);
        assert_eq!(reduced.sodium, 400.0);
        assert_eq!(reduced.calories, 400.0);
    }
}
