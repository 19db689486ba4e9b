pub mod agent;
pub mod board;
pub mod error;
pub mod events;
pub mod food;
pub mod identifiers;
pub mod input;
pub mod location;
pub mod logger;
pub mod placement;
pub mod rng;
pub mod settings;
pub mod snake;

pub use agent::{Agent, AgentStatus, EliminationReason};
pub use board::Board;
pub use error::BoardError;
pub use events::{RenderDiff, TickEvent, TickResult};
pub use food::{FoodItem, FoodSpawner, FoodType};
pub use identifiers::{AgentId, FoodId};
pub use input::KeyBindings;
pub use location::{Direction, Location};
pub use rng::{RandomSource, SessionRng};
pub use settings::{AgentConfig, BoardSettings, SpawnRegion};
pub use snake::Snake;
