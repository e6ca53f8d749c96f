use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Texture;

/// Number of days covered by a weekly menu.
pub const DAYS_PER_WEEK: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Afternoon,
    Dinner,
}

impl MealSlot {
    /// All slots in serving order.
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Afternoon,
        MealSlot::Dinner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Afternoon => "Afternoon",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One dish served in one slot on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub dish_id: u64,
    /// 0 = first day of the menu week, up to 6.
    pub day: u8,
    pub slot: MealSlot,
    /// Zero means "compute from the resident population".
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub texture_variant: Option<Texture>,
}

impl MenuItem {
    pub fn needs_auto_servings(&self) -> bool {
        self.servings == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMenu {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub institution_id: u64,
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl WeeklyMenu {
    /// Items scheduled for `day` and `slot`, in menu order.
    pub fn items_in(&self, day: u8, slot: MealSlot) -> impl Iterator<Item = &MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.day == day && item.slot == slot)
    }

    /// Calendar date of `day`, when the menu has a start date.
    pub fn date_of(&self, day: u8) -> Option<NaiveDate> {
        self.week_start
            .and_then(|start| start.checked_add_days(chrono::Days::new(day as u64)))
    }
}
