use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Round to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Derived nutrition totals.
///
/// Calories are whole kcal; the other fields are rounded to one decimal.
/// Fiber and sodium are `None` when no ingredient-level data was available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
}

impl NutritionSummary {
    /// Apply the standard rounding: integer calories, one decimal elsewhere.
    pub fn rounded(self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: round_to(self.protein, 1),
            fat: round_to(self.fat, 1),
            carbs: round_to(self.carbs, 1),
            fiber: self.fiber.map(|v| round_to(v, 1)),
            sodium: self.sodium.map(|v| round_to(v, 1)),
        }
    }

    /// Every field divided by `divisor`, rounded.
    pub fn divided_by(self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return Self::default();
        }
        Self {
            calories: self.calories / divisor,
            protein: self.protein / divisor,
            fat: self.fat / divisor,
            carbs: self.carbs / divisor,
            fiber: self.fiber.map(|v| v / divisor),
            sodium: self.sodium.map(|v| v / divisor),
        }
        .rounded()
    }

    /// Sodium in mg, zero when unknown.
    pub fn sodium_or_zero(&self) -> f64 {
        self.sodium.unwrap_or(0.0)
    }
}

fn add_optional(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

impl Add for NutritionSummary {
    type Output = NutritionSummary;

    fn add(self, rhs: Self) -> Self::Output {
        NutritionSummary {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbs: self.carbs + rhs.carbs,
            fiber: add_optional(self.fiber, rhs.fiber),
            sodium: add_optional(self.sodium, rhs.sodium),
        }
        .rounded()
    }
}

impl std::iter::Sum for NutritionSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionSummary::default(), |acc, s| acc + s)
    }
}
