pub mod allocator;
pub mod classifier;
pub mod constants;
pub mod nutrition;
pub mod texture;
pub mod validation;

pub use allocator::{
    allocate, plan_menu_servings, BucketBreakdown, BucketMember, Exclusion, IngredientAmount,
    MenuItemAllocation, ServingsBreakdown,
};
pub use classifier::{
    allergen_matches, classify, dysphagia_texture, AllergyConflict, Classification, MatchSource,
};
pub use nutrition::{dish_nutrition, mass_equivalent, MacroTotals};
pub use texture::{
    check_transition, ResidentTextureRequirement, TextureVariantResolver, TransitionError,
    VariantResult,
};
pub use validation::{
    check_guidelines, validate_slot, weekly_report, DailyNutrition, MenuNutritionValidation,
    WeeklyMenuNutritionReport,
};
