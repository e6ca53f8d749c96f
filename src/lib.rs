pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod models;
pub mod state;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use models::{Dish, NutritionSummary, Resident, WeeklyMenu};
