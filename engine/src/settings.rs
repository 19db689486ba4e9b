use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::BoardError;
use super::food::FoodType;
use super::location::{Direction, Location};

/// Part of each axis used for random placement: cells from `from` to
/// `from + over` of the width/height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    pub from: f64,
    pub over: f64,
}

impl SpawnRegion {
    pub const FULL: SpawnRegion = SpawnRegion { from: 0.0, over: 1.0 };

    pub fn new(from: f64, over: f64) -> Self {
        Self { from, over }
    }

    pub fn contains(&self, location: &Location, width: usize, height: usize) -> bool {
        let within_axis = |value: i32, size: usize| {
            let start = (size as f64 * self.from).floor();
            let end = size as f64 * self.from + size as f64 * self.over;
            let value = value as f64;
            value >= start && value < end
        };
        within_axis(location.x, width) && within_axis(location.y, height)
    }

    fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.from) {
            return Err(format!("region start must be in [0, 1), got {}", self.from));
        }
        if self.over <= 0.0 || self.from + self.over > 1.0 {
            return Err(format!(
                "region span must be positive and end within the board, got from {} over {}",
                self.from, self.over
            ));
        }
        Ok(())
    }
}

impl Default for SpawnRegion {
    fn default() -> Self {
        Self::new(0.1, 0.8)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Defaults to `snake{id}`.
    #[serde(default)]
    pub visual_tag: Option<String>,
    /// Random placement inside the start region when absent.
    #[serde(default)]
    pub start: Option<Location>,
    #[serde(default = "default_direction")]
    pub initial_direction: Direction,
}

fn default_direction() -> Direction {
    Direction::Up
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            visual_tag: None,
            start: None,
            initial_direction: default_direction(),
        }
    }
}

impl AgentConfig {
    pub fn at(start: Location, initial_direction: Direction) -> Self {
        Self {
            visual_tag: None,
            start: Some(start),
            initial_direction,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
    pub agents: Vec<AgentConfig>,
    /// Food kept on the board; defaults to one item per agent.
    pub food_count: Option<usize>,
    pub food_pool: Vec<FoodType>,
    pub start_region: SpawnRegion,
}

impl BoardSettings {
    pub fn new(width: usize, height: usize, agents: Vec<AgentConfig>) -> Self {
        Self {
            width,
            height,
            agents,
            food_count: None,
            food_pool: FoodType::default_pool(),
            start_region: SpawnRegion::default(),
        }
    }

    pub fn with_players(width: usize, height: usize, player_count: usize) -> Self {
        Self::new(width, height, vec![AgentConfig::default(); player_count])
    }

    pub fn target_food_count(&self) -> usize {
        self.food_count.unwrap_or(self.agents.len())
    }

    pub fn agent_tag(&self, index: usize) -> String {
        self.agents
            .get(index)
            .and_then(|config| config.visual_tag.clone())
            .unwrap_or_else(|| format!("snake{}", index + 1))
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        self.check().map_err(BoardError::Validation)
    }

    fn check(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "board dimensions must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err("board dimensions exceed the coordinate range".to_string());
        }
        if self.agents.is_empty() {
            return Err("at least one agent is required".to_string());
        }
        if self.food_pool.is_empty() {
            return Err("food pool must contain at least one food type".to_string());
        }
        self.start_region.validate()?;

        let mut starts = HashSet::new();
        for (index, config) in self.agents.iter().enumerate() {
            if let Some(start) = config.start {
                if !start.is_within(self.width, self.height) {
                    return Err(format!(
                        "agent {} starts outside the board at ({}, {})",
                        index + 1,
                        start.x,
                        start.y
                    ));
                }
                if !starts.insert(start) {
                    return Err(format!(
                        "agent {} shares its start ({}, {}) with another agent",
                        index + 1,
                        start.x,
                        start.y
                    ));
                }
            }
        }

        let mut tags = HashSet::new();
        for index in 0..self.agents.len() {
            let tag = self.agent_tag(index);
            if self.food_pool.iter().any(|food| food.visual_tag == tag) {
                return Err(format!("agent tag '{}' is also used by a food type", tag));
            }
            if !tags.insert(tag.clone()) {
                return Err(format!("agent tag '{}' is used more than once", tag));
            }
        }

        Ok(())
    }
}
