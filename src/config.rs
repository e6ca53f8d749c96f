use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::constants::*;
use crate::error::{EngineError, Result};
use crate::models::MealSlot;

/// Nutrition guideline for one meal slot, per resident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotGuideline {
    pub slot: MealSlot,
    pub calories_min: f64,
    pub calories_max: f64,
    pub protein_min: f64,
}

fn default_guidelines() -> Vec<SlotGuideline> {
    SLOT_GUIDELINES
        .iter()
        .map(|&(slot, calories_min, calories_max, protein_min)| SlotGuideline {
            slot,
            calories_min,
            calories_max,
            protein_min,
        })
        .collect()
}

/// Tunable thresholds used by the engine.
///
/// Every field falls back to its default, so a config file only needs the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sodium_threshold_mg_per_100g: f64,
    pub sugar_reduction: f64,
    pub sugar_kcal_per_gram: f64,
    pub sodium_reduction: f64,
    pub piece_weight_g: f64,
    pub slot_sodium_limit_mg: f64,
    pub guidelines: Vec<SlotGuideline>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sodium_threshold_mg_per_100g: SODIUM_THRESHOLD_MG_PER_100G,
            sugar_reduction: SUGAR_REDUCTION,
            sugar_kcal_per_gram: SUGAR_KCAL_PER_GRAM,
            sodium_reduction: SODIUM_REDUCTION,
            piece_weight_g: PIECE_WEIGHT_G,
            slot_sodium_limit_mg: SLOT_SODIUM_LIMIT_MG,
            guidelines: default_guidelines(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("sugar_reduction", self.sugar_reduction),
            ("sodium_reduction", self.sodium_reduction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidInput(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if self.piece_weight_g <= 0.0 {
            return Err(EngineError::InvalidInput(
                "piece_weight_g must be positive".to_string(),
            ));
        }

        for g in &self.guidelines {
            if g.calories_min > g.calories_max {
                return Err(EngineError::InvalidInput(format!(
                    "{} guideline has calories_min above calories_max",
                    g.slot
                )));
            }
        }

        Ok(())
    }

    /// Guideline for `slot`; falls back to the built-in table when the
    /// config omits it.
    pub fn guideline(&self, slot: MealSlot) -> SlotGuideline {
        self.guidelines
            .iter()
            .find(|g| g.slot == slot)
            .copied()
            .or_else(|| default_guidelines().into_iter().find(|g| g.slot == slot))
            .unwrap_or(SlotGuideline {
                slot,
                calories_min: 0.0,
                calories_max: f64::MAX,
                protein_min: 0.0,
            })
    }
}
