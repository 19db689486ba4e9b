use super::food::{FoodItem, FoodSpawner};
use super::identifiers::AgentId;
use super::location::{Direction, Location};
use super::snake::Snake;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EliminationReason {
    WallCollision,
    SelfCollision,
    OtherSnakeCollision(AgentId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentStatus {
    Enabled,
    Disabled(EliminationReason),
}

/// One controllable snake with its score and the direction it will take on
/// the next tick.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    visual_tag: String,
    snake: Snake,
    score: u32,
    pending_direction: Direction,
    status: AgentStatus,
}

impl Agent {
    pub fn new(id: AgentId, visual_tag: String, start: Location, direction: Direction) -> Self {
        Self {
            id,
            visual_tag,
            snake: Snake::new(start),
            score: 0,
            pending_direction: direction,
            status: AgentStatus::Enabled,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn visual_tag(&self) -> &str {
        &self.visual_tag
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn is_enabled(&self) -> bool {
        self.status == AgentStatus::Enabled
    }

    /// Last write before a tick wins. Disabled agents ignore input.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.is_enabled() {
            self.pending_direction = direction;
        }
    }

    pub fn hit_wall(&self, width: usize, height: usize) -> bool {
        !self.snake.head().is_within(width, height)
    }

    pub fn hit_self(&self) -> bool {
        self.snake.head().is_among(self.snake.tail_no_head())
    }

    /// Includes the other snake's head, which is how head-to-head collisions
    /// are caught.
    pub fn hit_other(&self, other: &Snake) -> bool {
        self.snake.head().is_among(other.cells())
    }

    pub fn try_eat(&mut self, food: &FoodSpawner) -> Option<FoodItem> {
        let item = food.item_at(&self.snake.head())?.clone();
        self.score += item.food_type.score_value;
        Some(item)
    }

    /// Advances the head only; the board decides whether the tail follows.
    pub fn apply_move(&mut self) {
        let next = self.snake.head().next(self.pending_direction);
        self.snake.grow_head(next);
    }

    pub(crate) fn rollback_move(&mut self) {
        self.snake.retract_head();
    }

    pub(crate) fn shrink_tail(&mut self) {
        self.snake.shrink_tail();
    }

    pub(crate) fn disable(&mut self, reason: EliminationReason) {
        if self.is_enabled() {
            self.status = AgentStatus::Disabled(reason);
        }
    }
}
