use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical texture of a dish.
///
/// Ordered by how far the dish has been broken down, so `Regular < Minced < Pureed`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Texture {
    #[default]
    Regular,
    Minced,
    Pureed,
}

impl Texture {
    pub const ALL: [Texture; 3] = [Texture::Regular, Texture::Minced, Texture::Pureed];

    /// Display label used in variant names, e.g. `"Fish (Minced)"`.
    pub fn label(&self) -> &'static str {
        match self {
            Texture::Regular => "Regular",
            Texture::Minced => "Minced",
            Texture::Pureed => "Pureed",
        }
    }

    /// Parse a texture name case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Some(Texture::Regular),
            "minced" => Some(Texture::Minced),
            "pureed" | "puree" => Some(Texture::Pureed),
            _ => None,
        }
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Measurement unit of an ingredient amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientUnit {
    /// Grams.
    Mass,
    /// Millilitres, treated as 1:1 with grams.
    Volume,
    /// Countable pieces.
    Piece,
}

impl IngredientUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            IngredientUnit::Mass => "g",
            IngredientUnit::Volume => "ml",
            IngredientUnit::Piece => "pc",
        }
    }
}

/// Macro profile per 100 units of an ingredient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroProfile {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default)]
    pub fiber: f64,
    /// Milligrams.
    #[serde(default)]
    pub sodium: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: u64,
    pub name: String,
    pub unit: IngredientUnit,
    #[serde(rename = "per_100")]
    pub macros: MacroProfile,
}

/// An ingredient used in a dish, with the amount needed for one serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishIngredient {
    pub ingredient: Ingredient,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub texture: Texture,
    #[serde(default)]
    pub is_blendable: bool,
    #[serde(default)]
    pub sugar_adjustable: bool,
    /// Sodium in mg per 100 g, when known.
    #[serde(default)]
    pub sodium_level: Option<f64>,
    /// Used only when the dish has no ingredient records.
    #[serde(default)]
    pub calories_per_100g: Option<f64>,
    /// Free-text tokens used for allergen and diet matching.
    #[serde(default)]
    pub dietary_flags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<DishIngredient>,
    /// Set on texture variants: the dish they were derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dish_id: Option<u64>,
}

impl Dish {
    /// Case-insensitive exact match against the dietary flags.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.dietary_flags
            .iter()
            .any(|f| f.trim().eq_ignore_ascii_case(flag))
    }

    /// Name of the variant of this dish at `texture`.
    pub fn variant_name(&self, texture: Texture) -> String {
        variant_name(&self.name, texture)
    }

    /// Canonical key for name lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// `"{base} ({Texture})"`.
pub fn variant_name(base: &str, texture: Texture) -> String {
    format!("{} ({})", base, texture.label())
}
