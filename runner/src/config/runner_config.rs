use std::time::Duration;

use serde::{Deserialize, Serialize};
use snake_engine::{AgentConfig, BoardSettings, FoodType};

use super::Validate;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    pub field_width: u32,
    pub field_height: u32,
    pub player_count: u32,
    pub tick_interval_ms: u32,
    /// Food kept on the board; one per player when absent.
    pub food_count: Option<u32>,
    /// Fixed seed for reproducible games. Each new game uses `seed + n`.
    pub seed: Option<u64>,
    pub food_pool: Vec<FoodType>,
    /// Per-player overrides, matched by position. Missing entries use defaults.
    pub agents: Vec<AgentConfig>,
}

impl RunnerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms as u64)
    }

    pub fn board_settings(&self) -> BoardSettings {
        let agents = (0..self.player_count as usize)
            .map(|index| self.agents.get(index).cloned().unwrap_or_default())
            .collect();

        let mut settings =
            BoardSettings::new(self.field_width as usize, self.field_height as usize, agents);
        settings.food_count = self.food_count.map(|count| count as usize);
        settings.food_pool = self.food_pool.clone();
        settings
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.field_width < 5 || self.field_height < 5 {
            return Err("field dimensions must be at least 5x5".to_string());
        }
        if self.field_width > 100 || self.field_height > 100 {
            return Err("field dimensions must not exceed 100x100".to_string());
        }
        if !(1..=8).contains(&self.player_count) {
            return Err("player_count must be between 1 and 8".to_string());
        }
        if self.agents.len() > self.player_count as usize {
            return Err(format!(
                "{} agent entries configured for {} players",
                self.agents.len(),
                self.player_count
            ));
        }
        if self.tick_interval_ms < 20 || self.tick_interval_ms > 5000 {
            return Err("tick_interval_ms must be between 20 and 5000".to_string());
        }
        if let Some(food_count) = self.food_count
            && !(1..=50).contains(&food_count)
        {
            return Err("food_count must be between 1 and 50".to_string());
        }
        if self.food_pool.iter().any(|food| food.score_value == 0) {
            return Err("every food type must be worth at least one point".to_string());
        }

        self.board_settings().validate().map_err(|e| e.to_string())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            field_width: 25,
            field_height: 25,
            player_count: 1,
            tick_interval_ms: 150,
            food_count: None,
            seed: None,
            food_pool: FoodType::default_pool(),
            agents: Vec::new(),
        }
    }
}
