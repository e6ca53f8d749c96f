use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::classifier::dysphagia_texture;
use crate::error::Result;
use crate::models::{Dish, Resident, ResidentRef, Texture};
use crate::state::DishProvider;

/// Why a texture conversion was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Pureed cannot convert to {0}")]
    PureedIsTerminal(Texture),

    #[error("{0} is not blendable")]
    NotBlendable(String),

    #[error("Regular cannot convert to Pureed directly; mince it first")]
    SkipsMinced,

    #[error("Minced cannot revert to Regular")]
    Reversion,
}

/// Check a single conversion step against the texture state machine.
///
/// Legal steps are Regular -> Minced and Minced -> Pureed; staying put is
/// always allowed.
pub fn check_transition(dish: &Dish, target: Texture) -> std::result::Result<(), TransitionError> {
    let from = dish.texture;
    if from == Texture::Pureed && target != Texture::Pureed {
        return Err(TransitionError::PureedIsTerminal(target));
    }
    if from == target {
        return Ok(());
    }
    if !dish.is_blendable {
        return Err(TransitionError::NotBlendable(dish.name.clone()));
    }
    match (from, target) {
        (Texture::Regular, Texture::Pureed) => Err(TransitionError::SkipsMinced),
        (Texture::Minced, Texture::Regular) => Err(TransitionError::Reversion),
        _ => Ok(()),
    }
}

/// Outcome of a texture variant request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantResult {
    pub success: bool,
    pub original_texture: Texture,
    pub target_texture: Texture,
    pub variant_id: Option<u64>,
    pub variant_name: Option<String>,
    /// A new dish was stored by this request.
    pub created: bool,
    pub error: Option<String>,
}

impl VariantResult {
    fn ok(dish: &Dish, target: Texture, variant: &Dish, created: bool) -> Self {
        Self {
            success: true,
            original_texture: dish.texture,
            target_texture: target,
            variant_id: Some(variant.id),
            variant_name: Some(variant.name.clone()),
            created,
            error: None,
        }
    }

    fn failed(dish: &Dish, target: Texture, err: TransitionError) -> Self {
        Self {
            success: false,
            original_texture: dish.texture,
            target_texture: target,
            variant_id: None,
            variant_name: None,
            created: false,
            error: Some(err.to_string()),
        }
    }
}

/// Texture a resident needs and how the dish can meet it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentTextureRequirement {
    pub resident: ResidentRef,
    pub required_texture: Texture,
    pub variant: VariantResult,
}

/// Derived dish at `target`: same ingredients and nutrition, terminal.
fn derive_variant(dish: &Dish, target: Texture) -> Dish {
    Dish {
        id: 0,
        name: dish.variant_name(target),
        texture: target,
        is_blendable: false,
        base_dish_id: Some(dish.id),
        ..dish.clone()
    }
}

/// Resolves texture variants of dishes, creating them in the store on demand.
pub struct TextureVariantResolver<'a, S: DishProvider> {
    store: &'a mut S,
}

impl<'a, S: DishProvider> TextureVariantResolver<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Find or create the variant of `dish` at `target`.
    ///
    /// Illegal transitions come back as `success == false`; `Err` is only
    /// returned when the store fails. Repeated calls return the same variant.
    pub fn resolve(&mut self, dish: &Dish, target: Texture) -> Result<VariantResult> {
        if let Err(err) = check_transition(dish, target) {
            debug!(dish = %dish.name, from = %dish.texture, to = %target, %err, "texture transition refused");
            return Ok(VariantResult::failed(dish, target, err));
        }

        if dish.texture == target {
            return Ok(VariantResult::ok(dish, target, dish, false));
        }

        if let Some(existing) = self.store.find_variant(&dish.name, target)? {
            debug!(dish = %dish.name, variant = existing.id, "reusing texture variant");
            return Ok(VariantResult::ok(dish, target, &existing, false));
        }

        let created = self.store.create(derive_variant(dish, target))?;
        info!(dish = %dish.name, variant = created.id, texture = %target, "created texture variant");
        Ok(VariantResult::ok(dish, target, &created, true))
    }

    /// Required texture and variant for each resident.
    ///
    /// Severe active dysphagia requires Pureed, milder dysphagia Minced,
    /// everyone else Regular.
    pub fn check_group_requirements(
        &mut self,
        dish: &Dish,
        residents: &[Resident],
    ) -> Result<Vec<ResidentTextureRequirement>> {
        let mut resolved: HashMap<Texture, VariantResult> = HashMap::new();
        let mut requirements = Vec::with_capacity(residents.len());

        for resident in residents {
            let required_texture = dysphagia_texture(resident);
            let variant = match resolved.get(&required_texture) {
                Some(v) => v.clone(),
                None => {
                    let v = self.resolve(dish, required_texture)?;
                    resolved.insert(required_texture, v.clone());
                    v
                }
            };
            requirements.push(ResidentTextureRequirement {
                resident: resident.summary(),
                required_texture,
                variant,
            });
        }

        Ok(requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChronicDisease, DiseaseStatus, Severity};
    use crate::state::{Snapshot, SnapshotStore};

    fn dish(id: u64, texture: Texture, blendable: bool) -> Dish {
        Dish {
            id,
            name: "Stewed Chicken".to_string(),
            texture,
            is_blendable: blendable,
            sugar_adjustable: false,
            sodium_level: Some(320.0),
            calories_per_100g: Some(180.0),
            dietary_flags: vec!["chicken".to_string()],
            ingredients: vec![],
            base_dish_id: None,
        }
    }

    fn store_with(d: &Dish) -> SnapshotStore {
        SnapshotStore::new(Snapshot {
            dishes: vec![d.clone()],
            ..Default::default()
        })
    }

    #[test]
    fn test_state_machine() {
        let regular = dish(1, Texture::Regular, true);
        let minced = dish(1, Texture::Minced, true);
        let pureed = dish(1, Texture::Pureed, true);

        assert!(check_transition(&regular, Texture::Minced).is_ok());
        assert_eq!(
            check_transition(&regular, Texture::Pureed),
            Err(TransitionError::SkipsMinced)
        );
        assert!(check_transition(&minced, Texture::Pureed).is_ok());
        assert_eq!(
            check_transition(&minced, Texture::Regular),
            Err(TransitionError::Reversion)
        );
        assert_eq!(
            check_transition(&pureed, Texture::Minced),
            Err(TransitionError::PureedIsTerminal(Texture::Minced))
        );
        assert!(check_transition(&pureed, Texture::Pureed).is_ok());
    }

    #[test]
    fn test_same_texture_is_noop() {
        let d = dish(4, Texture::Minced, false);
        let mut store = store_with(&d);
        let mut resolver = TextureVariantResolver::new(&mut store);

        let result = resolver.resolve(&d, Texture::Minced).unwrap();
        assert!(result.success);
        assert_eq!(result.variant_id, Some(4));
        assert!(!result.created);
    }

    #[test]
    fn test_not_blendable_fails() {
        let d = dish(1, Texture::Regular, false);
        let mut store = store_with(&d);
        let mut resolver = TextureVariantResolver::new(&mut store);

        let result = resolver.resolve(&d, Texture::Minced).unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not blendable"));
    }

    #[test]
    fn test_variant_created_once() {
        let d = dish(1, Texture::Regular, true);
        let mut store = store_with(&d);

        let first = TextureVariantResolver::new(&mut store)
            .resolve(&d, Texture::Minced)
            .unwrap();
        assert!(first.success);
        assert!(first.created);
        assert_eq!(first.variant_name.as_deref(), Some("Stewed Chicken (Minced)"));

        let second = TextureVariantResolver::new(&mut store)
            .resolve(&d, Texture::Minced)
            .unwrap();
        assert!(!second.created);
        assert_eq!(first.variant_id, second.variant_id);

        let variant = store.get(first.variant_id.unwrap()).unwrap();
        assert_eq!(variant.texture, Texture::Minced);
        assert!(!variant.is_blendable);
        assert_eq!(variant.base_dish_id, Some(1));
        assert_eq!(variant.calories_per_100g, d.calories_per_100g);
        assert_eq!(store.dish_count(), 2);
    }

    #[test]
    fn test_variant_is_terminal() {
        let d = dish(1, Texture::Regular, true);
        let mut store = store_with(&d);
        let mut resolver = TextureVariantResolver::new(&mut store);

        let minced = resolver.resolve(&d, Texture::Minced).unwrap();
        let variant = store.get(minced.variant_id.unwrap()).unwrap();

        let mut resolver = TextureVariantResolver::new(&mut store);
        let pureed = resolver.resolve(&variant, Texture::Pureed).unwrap();
        assert!(!pureed.success);
    }

    #[test]
    fn test_group_requirements() {
        let d = dish(1, Texture::Minced, true);
        let mut store = store_with(&d);

        let mk = |id: u64, severity: Option<Severity>| Resident {
            id,
            name: format!("R{}", id),
            institution_id: 1,
            allergies: vec![],
            diet_tags: vec![],
            chronic_diseases: severity
                .map(|severity| ChronicDisease {
                    name: "dysphagia".to_string(),
                    severity,
                    status: DiseaseStatus::Active,
                })
                .into_iter()
                .collect(),
            admitted_on: None,
            discharged_on: None,
        };
        let residents = vec![
            mk(1, None),
            mk(2, Some(Severity::Mild)),
            mk(3, Some(Severity::Severe)),
            mk(4, Some(Severity::Severe)),
        ];

        let reqs = TextureVariantResolver::new(&mut store)
            .check_group_requirements(&d, &residents)
            .unwrap();

        assert_eq!(reqs.len(), 4);
        assert_eq!(reqs[0].required_texture, Texture::Regular);
        assert!(!reqs[0].variant.success);
        assert_eq!(reqs[1].required_texture, Texture::Minced);
        assert_eq!(reqs[1].variant.variant_id, Some(1));
        assert_eq!(reqs[2].required_texture, Texture::Pureed);
        assert!(reqs[2].variant.created);
        assert_eq!(reqs[2].variant.variant_id, reqs[3].variant.variant_id);
        assert_eq!(store.dish_count(), 2);
    }
}
