use std::collections::VecDeque;

use super::location::Location;

/// Cells occupied by one agent, head first. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Location>,
    last_tail: Option<Location>,
}

impl Snake {
    pub fn new(start: Location) -> Self {
        let mut body = VecDeque::new();
        body.push_back(start);

        Self {
            body,
            last_tail: None,
        }
    }

    pub fn head(&self) -> Location {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Location {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn tail_no_head(&self) -> impl Iterator<Item = &Location> {
        self.body.iter().skip(1)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Location> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Cell dropped by the most recent `shrink_tail`.
    pub fn last_tail(&self) -> Option<Location> {
        self.last_tail
    }

    pub fn grow_head(&mut self, next: Location) {
        self.body.push_front(next);
    }

    pub fn shrink_tail(&mut self) {
        if self.body.len() > 1 {
            self.last_tail = self.body.pop_back();
        }
    }

    /// Rolls back the head added by `grow_head` this tick.
    pub fn retract_head(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_front();
        }
    }
}
