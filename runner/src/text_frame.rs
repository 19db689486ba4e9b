use std::collections::{BTreeMap, BTreeSet};

use snake_engine::{Location, RenderDiff};

/// Console view of the board, kept up to date from render diffs only.
pub struct TextFrame {
    width: usize,
    height: usize,
    occupancy: BTreeMap<String, BTreeSet<Location>>,
}

impl TextFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            occupancy: BTreeMap::new(),
        }
    }

    pub fn apply(&mut self, diff: &RenderDiff) {
        diff.apply(&mut self.occupancy);
    }

    pub fn render(&self) -> String {
        let mut grid = vec![vec!['.'; self.width]; self.height];
        for (tag, cells) in &self.occupancy {
            let glyph = glyph_for(tag);
            for cell in cells {
                if cell.is_within(self.width, self.height) {
                    grid[cell.y as usize][cell.x as usize] = glyph;
                }
            }
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `snake3` draws as `3`, food draws as the first letter of its tag.
fn glyph_for(tag: &str) -> char {
    if let Some(number) = tag.strip_prefix("snake") {
        return match number.parse::<u32>() {
            Ok(n) if n < 10 => char::from_digit(n, 10).unwrap_or('#'),
            _ => '#',
        };
    }
    tag.chars().next().unwrap_or('?')
}
