use crate::models::MealSlot;

/// Low-sodium residents cannot take dishes above this level (mg per 100 g).
pub const SODIUM_THRESHOLD_MG_PER_100G: f64 = 500.0;

/// Fraction of carbohydrate removed in the low-sugar version of a dish.
pub const SUGAR_REDUCTION: f64 = 0.30;

/// Calories per gram of carbohydrate, used to offset removed sugar.
pub const SUGAR_KCAL_PER_GRAM: f64 = 4.0;

/// Fraction of sodium removed in the low-sodium version of a dish.
pub const SODIUM_REDUCTION: f64 = 0.50;

/// Assumed average weight of one "piece" ingredient, in grams.
pub const PIECE_WEIGHT_G: f64 = 50.0;

/// Sodium per meal slot above which a warning is raised (mg).
pub const SLOT_SODIUM_LIMIT_MG: f64 = 1000.0;

/// Number of days averaged in the weekly report.
pub const WEEK_LENGTH_DAYS: f64 = 7.0;

// ─────────────────────────────────────────────────────────────────────────────
// Matching vocabulary
// ─────────────────────────────────────────────────────────────────────────────

/// Dietary flags that make a dish safe for low-sugar residents.
pub const LOW_SUGAR_FLAGS: [&str; 2] = ["diabetic", "low_sugar"];

pub const GLUTEN_FREE_FLAG: &str = "gluten_free";

pub const LACTOSE_FREE_FLAG: &str = "lactose_free";

/// Chronic condition that drives texture requirements.
pub const DYSPHAGIA: &str = "dysphagia";

/// Ingredient name fragments scaled down in low-sugar versions.
pub const SWEETENER_KEYWORDS: [&str; 3] = ["sugar", "syrup", "honey"];

/// Ingredient name fragments scaled down in low-sodium versions.
pub const SALT_KEYWORDS: [&str; 3] = ["salt", "soy sauce", "sodium"];

/// Ingredient name fragments left out of gluten-free versions.
pub const GLUTEN_KEYWORDS: [&str; 6] = ["wheat", "barley", "rye", "flour", "semolina", "bread"];

/// Ingredient name fragments left out of lactose-free versions.
pub const LACTOSE_KEYWORDS: [&str; 6] = ["milk", "cream", "cheese", "yogurt", "whey", "lactose"];

// ─────────────────────────────────────────────────────────────────────────────
// Per-slot guidelines
// ─────────────────────────────────────────────────────────────────────────────

/// (slot, calories min, calories max, protein min)
pub const SLOT_GUIDELINES: [(MealSlot, f64, f64, f64); 4] = [
    (MealSlot::Breakfast, 300.0, 500.0, 15.0),
    (MealSlot::Lunch, 500.0, 800.0, 25.0),
    (MealSlot::Afternoon, 100.0, 300.0, 5.0),
    (MealSlot::Dinner, 400.0, 700.0, 20.0),
];
