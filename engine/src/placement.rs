use crate::log;
use super::error::BoardError;
use super::location::Location;
use super::rng::RandomSource;
use super::settings::SpawnRegion;

pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Uniform cell inside `region`, scaled to the grid.
pub fn random_location(
    width: usize,
    height: usize,
    region: &SpawnRegion,
    rng: &mut impl RandomSource,
) -> Location {
    let x = (rng.next_f64() * width as f64 * region.over + width as f64 * region.from).floor();
    let y = (rng.next_f64() * height as f64 * region.over + height as f64 * region.from).floor();
    Location::new(x as i32, y as i32)
}

/// Rejection-samples a free cell inside `region`. After
/// `MAX_PLACEMENT_ATTEMPTS` misses the grid is scanned row by row, region
/// cells first, and only a grid with no free cell at all is an error.
pub fn find_free_location<F>(
    width: usize,
    height: usize,
    region: &SpawnRegion,
    rng: &mut impl RandomSource,
    is_taken: F,
) -> Result<Location, BoardError>
where
    F: Fn(&Location) -> bool,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = random_location(width, height, region, rng);
        if candidate.is_within(width, height) && !is_taken(&candidate) {
            return Ok(candidate);
        }
    }

    log!(
        "No free cell after {} random attempts, scanning {}x{} grid",
        MAX_PLACEMENT_ATTEMPTS,
        width,
        height
    );

    let cells = || {
        (0..height as i32).flat_map(move |y| (0..width as i32).map(move |x| Location::new(x, y)))
    };

    cells()
        .filter(|cell| region.contains(cell, width, height))
        .find(|cell| !is_taken(cell))
        .or_else(|| cells().find(|cell| !is_taken(cell)))
        .ok_or(BoardError::BoardFull)
}
