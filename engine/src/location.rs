use serde::{Deserialize, Serialize};

/// A cell on the board. Coordinates are signed so that a head which has just
/// left the grid can still be represented for the wall check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`. No bounds checking.
    pub fn next(&self, direction: Direction) -> Location {
        match direction {
            Direction::Up => Location::new(self.x, self.y - 1),
            Direction::Down => Location::new(self.x, self.y + 1),
            Direction::Left => Location::new(self.x - 1, self.y),
            Direction::Right => Location::new(self.x + 1, self.y),
        }
    }

    pub fn is_among<'a, I>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = &'a Location>,
    {
        cells.into_iter().any(|cell| cell == self)
    }

    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}
