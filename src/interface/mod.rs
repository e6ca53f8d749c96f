pub mod prompts;
pub mod render;

pub use prompts::{confirm_save, prompt_yes_no};
pub use render::{
    display_breakdown, display_classification, display_menu_plan, display_texture_requirements,
    display_variant, display_weekly_report,
};
