pub mod dish;
pub mod menu;
pub mod nutrition;
pub mod resident;

pub use dish::{
    variant_name, Dish, DishIngredient, Ingredient, IngredientUnit, MacroProfile, Texture,
};
pub use menu::{MealSlot, MenuItem, WeeklyMenu, DAYS_PER_WEEK};
pub use nutrition::{round_to, NutritionSummary};
pub use resident::{
    Allergy, ChronicDisease, DietTag, DietTagKind, DiseaseStatus, Resident, ResidentRef, Severity,
};
