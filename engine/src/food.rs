use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::log;
use super::error::BoardError;
use super::identifiers::FoodId;
use super::location::Location;
use super::placement::find_free_location;
use super::rng::{RandomSource, pick_index};
use super::settings::SpawnRegion;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodType {
    pub visual_tag: String,
    pub score_value: u32,
}

impl FoodType {
    pub fn new(visual_tag: impl Into<String>, score_value: u32) -> Self {
        Self {
            visual_tag: visual_tag.into(),
            score_value,
        }
    }

    /// Apples are three times as common as blueberries.
    pub fn default_pool() -> Vec<FoodType> {
        let apple = FoodType::new("apple", 1);
        let blueberry = FoodType::new("blueberry", 2);
        vec![apple.clone(), apple.clone(), apple, blueberry]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoodItem {
    pub id: FoodId,
    pub food_type: FoodType,
    pub location: Location,
}

#[derive(Clone, Debug)]
pub struct FoodSpawner {
    items: Vec<FoodItem>,
    pool: Vec<FoodType>,
    next_id: u64,
}

impl FoodSpawner {
    pub fn new(pool: Vec<FoodType>) -> Self {
        Self {
            items: Vec::new(),
            pool,
            next_id: 1,
        }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.items.iter().map(|item| &item.location)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_at(&self, location: &Location) -> Option<&FoodItem> {
        self.items.iter().find(|item| item.location == *location)
    }

    /// Places a new item on a cell that is neither in `excluded` nor holding
    /// food already.
    pub fn spawn(
        &mut self,
        excluded: &HashSet<Location>,
        width: usize,
        height: usize,
        rng: &mut impl RandomSource,
    ) -> Result<FoodItem, BoardError> {
        if self.pool.is_empty() {
            return Err(BoardError::Validation(
                "food pool must contain at least one food type".to_string(),
            ));
        }

        let items = &self.items;
        let location = find_free_location(width, height, &SpawnRegion::FULL, rng, |cell| {
            excluded.contains(cell) || items.iter().any(|item| item.location == *cell)
        })?;

        let food_type = self.pool[pick_index(rng, self.pool.len())].clone();
        let item = self.push(food_type, location);
        log!(
            "Food {} ({}) spawned at ({}, {})",
            item.id,
            item.food_type.visual_tag,
            location.x,
            location.y
        );
        Ok(item)
    }

    pub fn remove(&mut self, food: &FoodItem) -> Option<FoodItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.location == food.location)?;
        Some(self.items.remove(index))
    }

    fn push(&mut self, food_type: FoodType, location: Location) -> FoodItem {
        let item = FoodItem {
            id: FoodId::new(self.next_id),
            food_type,
            location,
        };
        self.next_id += 1;
        self.items.push(item.clone());
        item
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, food_type: FoodType, location: Location) -> FoodItem {
        self.push(food_type, location)
    }
}
