use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Dish, Resident, Texture, WeeklyMenu};

/// Read access to residents.
pub trait ResidentProvider {
    /// Residents of `institution_id` present on `as_of`, with allergies,
    /// diet tags and chronic diseases populated.
    ///
    /// An institution with nobody in it is an empty list, not an error.
    fn list_for_institution(&self, institution_id: u64, as_of: NaiveDate) -> Result<Vec<Resident>>;

    /// A single resident; `ResidentNotFound` when the id is unknown.
    fn get_resident(&self, resident_id: u64) -> Result<Resident>;
}

/// Dish store used by the engine, including variant creation.
pub trait DishProvider {
    /// A dish with its ingredients; `DishNotFound` when the id is unknown.
    fn get(&self, dish_id: u64) -> Result<Dish>;

    /// The variant named `"{base_name} ({texture})"` with matching texture.
    fn find_variant(&self, base_name: &str, texture: Texture) -> Result<Option<Dish>>;

    /// Store a new dish. The store assigns the id; `dish.id` is ignored.
    fn create(&mut self, dish: Dish) -> Result<Dish>;
}

/// Read access to weekly menus.
pub trait MenuProvider {
    /// A menu with its items; `MenuNotFound` when the id is unknown.
    fn get_menu(&self, menu_id: u64) -> Result<WeeklyMenu>;
}
