use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{EngineError, Result};
use crate::models::{variant_name, Dish, Resident, Texture, WeeklyMenu};
use crate::state::providers::{DishProvider, MenuProvider, ResidentProvider};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Serialized form of everything the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub residents: Vec<Resident>,
    #[serde(default)]
    pub menus: Vec<WeeklyMenu>,
}

/// In-memory snapshot indexed by id, serving all three provider traits.
pub struct SnapshotStore {
    dishes: BTreeMap<u64, Dish>,
    residents: BTreeMap<u64, Resident>,
    menus: BTreeMap<u64, WeeklyMenu>,
}

impl SnapshotStore {
    /// Index a snapshot. Later entries win on duplicate ids.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            dishes: snapshot.dishes.into_iter().map(|d| (d.id, d)).collect(),
            residents: snapshot.residents.into_iter().map(|r| (r.id, r)).collect(),
            menus: snapshot.menus.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Look up a dish by numeric id or by name (case-insensitive).
    ///
    /// A miss suggests the closest dish name when one is similar enough.
    pub fn find_dish(&self, id_or_name: &str) -> Result<Dish> {
        if let Ok(id) = id_or_name.trim().parse::<u64>() {
            return self.get(id);
        }

        let key = id_or_name.trim().to_lowercase();
        if let Some(dish) = self.dishes.values().find(|d| d.key() == key) {
            return Ok(dish.clone());
        }

        match self.suggest_dish_name(&key) {
            Some(suggestion) => Err(EngineError::DishNotFound(format!(
                "{} (did you mean '{}'?)",
                id_or_name, suggestion
            ))),
            None => Err(EngineError::DishNotFound(id_or_name.to_string())),
        }
    }

    /// Closest dish name by Jaro-Winkler similarity.
    pub fn suggest_dish_name(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.dishes
            .values()
            .map(|d| (d.name.as_str(), jaro_winkler(&d.key(), &name)))
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(n, _)| n)
    }

    /// Set the servings of one menu item.
    pub fn set_menu_item_servings(&mut self, menu_id: u64, index: usize, servings: u32) -> Result<()> {
        let menu = self
            .menus
            .get_mut(&menu_id)
            .ok_or_else(|| EngineError::MenuNotFound(menu_id.to_string()))?;
        let item = menu.items.get_mut(index).ok_or_else(|| {
            EngineError::InvalidInput(format!("menu {} has no item {}", menu_id, index))
        })?;
        item.servings = servings;
        Ok(())
    }

    pub fn dish_count(&self) -> usize {
        self.dishes.len()
    }

    pub fn resident_count(&self) -> usize {
        self.residents.len()
    }

    /// Convert back to a snapshot for serialization, ordered by id.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            dishes: self.dishes.values().cloned().collect(),
            residents: self.residents.values().cloned().collect(),
            menus: self.menus.values().cloned().collect(),
        }
    }

    fn next_dish_id(&self) -> u64 {
        self.dishes.keys().next_back().map_or(1, |id| id + 1)
    }
}

impl ResidentProvider for SnapshotStore {
    fn list_for_institution(&self, institution_id: u64, as_of: NaiveDate) -> Result<Vec<Resident>> {
        Ok(self
            .residents
            .values()
            .filter(|r| r.institution_id == institution_id && r.is_present_on(as_of))
            .cloned()
            .collect())
    }

    fn get_resident(&self, resident_id: u64) -> Result<Resident> {
        self.residents
            .get(&resident_id)
            .cloned()
            .ok_or_else(|| EngineError::ResidentNotFound(resident_id.to_string()))
    }
}

impl DishProvider for SnapshotStore {
    fn get(&self, dish_id: u64) -> Result<Dish> {
        self.dishes
            .get(&dish_id)
            .cloned()
            .ok_or_else(|| EngineError::DishNotFound(dish_id.to_string()))
    }

    fn find_variant(&self, base_name: &str, texture: Texture) -> Result<Option<Dish>> {
        let wanted = variant_name(base_name, texture).to_lowercase();
        Ok(self
            .dishes
            .values()
            .find(|d| d.texture == texture && d.key() == wanted)
            .cloned())
    }

    fn create(&mut self, mut dish: Dish) -> Result<Dish> {
        dish.id = self.next_dish_id();
        self.dishes.insert(dish.id, dish.clone());
        Ok(dish)
    }
}

impl MenuProvider for SnapshotStore {
    fn get_menu(&self, menu_id: u64) -> Result<WeeklyMenu> {
        self.menus
            .get(&menu_id)
            .cloned()
            .ok_or_else(|| EngineError::MenuNotFound(menu_id.to_string()))
    }
}
