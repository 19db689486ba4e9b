use std::collections::{BTreeMap, BTreeSet};

use super::agent::EliminationReason;
use super::identifiers::{AgentId, FoodId};
use super::location::Location;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    Eliminated {
        agent: AgentId,
        reason: EliminationReason,
    },
    Moved {
        agent: AgentId,
    },
    Scored {
        agent: AgentId,
        points: u32,
    },
    FoodConsumed {
        food: FoodId,
        location: Location,
    },
    FoodSpawned {
        food: FoodId,
        location: Location,
    },
}

/// Cells whose occupancy by a visual tag flipped during a tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderDiff {
    cells: BTreeMap<String, Vec<Location>>,
}

impl RenderDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggling a cell that is already recorded for `tag` cancels it.
    pub fn toggle(&mut self, tag: &str, location: Location) {
        let cells = self.cells.entry(tag.to_string()).or_default();
        match cells.iter().position(|cell| *cell == location) {
            Some(index) => {
                cells.remove(index);
                if cells.is_empty() {
                    self.cells.remove(tag);
                }
            }
            None => cells.push(location),
        }
    }

    pub fn get(&self, tag: &str) -> &[Location] {
        self.cells.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Location])> {
        self.cells
            .iter()
            .map(|(tag, cells)| (tag.as_str(), cells.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Applies the toggles to a per-tag occupancy map.
    pub fn apply(&self, occupancy: &mut BTreeMap<String, BTreeSet<Location>>) {
        for (tag, cells) in &self.cells {
            let occupied = occupancy.entry(tag.clone()).or_default();
            for cell in cells {
                if !occupied.remove(cell) {
                    occupied.insert(*cell);
                }
            }
            if occupied.is_empty() {
                occupancy.remove(tag);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickResult {
    pub tick: u64,
    pub events: Vec<TickEvent>,
    pub diff: RenderDiff,
}

impl TickResult {
    pub fn eliminated(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.events.iter().filter_map(|event| match event {
            TickEvent::Eliminated { agent, .. } => Some(*agent),
            _ => None,
        })
    }

    pub fn scored(&self) -> impl Iterator<Item = (AgentId, u32)> + '_ {
        self.events.iter().filter_map(|event| match event {
            TickEvent::Scored { agent, points } => Some((*agent, *points)),
            _ => None,
        })
    }
}
