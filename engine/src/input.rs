use std::collections::{BTreeMap, HashMap};

use super::identifiers::AgentId;
use super::location::Direction;

pub const ARROW_KEYS: [(&str, Direction); 4] = [
    ("ArrowLeft", Direction::Left),
    ("ArrowRight", Direction::Right),
    ("ArrowUp", Direction::Up),
    ("ArrowDown", Direction::Down),
];

pub const WASD_KEYS: [(&str, Direction); 4] = [
    ("KeyA", Direction::Left),
    ("KeyD", Direction::Right),
    ("KeyW", Direction::Up),
    ("KeyS", Direction::Down),
];

/// Per-agent mapping from key codes to directions. Keys nobody bound resolve
/// to nothing.
#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    bindings: BTreeMap<AgentId, HashMap<String, Direction>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrow keys for the first agent, WASD for the second. Further agents
    /// start unbound.
    pub fn default_for(agent_count: usize) -> Self {
        let mut bindings = Self::new();
        for (index, scheme) in [ARROW_KEYS, WASD_KEYS].iter().enumerate().take(agent_count) {
            bindings.bind_scheme(AgentId::new(index as u32 + 1), scheme);
        }
        bindings
    }

    pub fn bind(&mut self, agent: AgentId, key: impl Into<String>, direction: Direction) {
        self.bindings
            .entry(agent)
            .or_default()
            .insert(key.into(), direction);
    }

    pub fn bind_scheme(&mut self, agent: AgentId, scheme: &[(&str, Direction)]) {
        for (key, direction) in scheme {
            self.bind(agent, *key, *direction);
        }
    }

    pub fn direction_for(&self, agent: AgentId, key: &str) -> Option<Direction> {
        self.bindings.get(&agent)?.get(key).copied()
    }

    /// Every agent that has `key` bound, with the direction it maps to.
    pub fn route<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (AgentId, Direction)> + 'a {
        self.bindings
            .iter()
            .filter_map(move |(agent, keys)| keys.get(key).map(|direction| (*agent, *direction)))
    }
}
