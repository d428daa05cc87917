#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised placement of items and hazards onto free playfield cells.
//!
//! Placement samples uniformly random origins and rejects any candidate whose
//! footprint touches an occupied cell. The number of samples is bounded so a
//! crowded board costs a fixed amount of work; exhausting the budget yields
//! `None` and the caller leaves the entity inactive.

use std::collections::HashSet;

use rand::Rng;
use snake_arcade_core::{CellCoord, CellRect, CellRectSize, GridSize};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    attempts: u32,
}

impl Config {
    /// Creates a new configuration using the provided sampling budget.
    #[must_use]
    pub const fn new(attempts: u32) -> Self {
        Self { attempts }
    }
}

/// Pure system that proposes free locations for new entities.
#[derive(Clone, Copy, Debug)]
pub struct Spawning {
    attempts: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            attempts: config.attempts,
        }
    }

    /// Picks a random unoccupied cell for a single-cell entity.
    pub fn place_cell<R>(
        &self,
        grid: GridSize,
        occupied: &HashSet<CellCoord>,
        rng: &mut R,
    ) -> Option<CellCoord>
    where
        R: Rng + ?Sized,
    {
        self.place_region(grid, CellRectSize::square(1), occupied, rng)
            .map(|region| region.origin())
    }

    /// Picks a random region of `size` cells that lies inside the grid and
    /// avoids every occupied cell.
    ///
    /// A candidate is accepted only when all of its cells are free.
    pub fn place_region<R>(
        &self,
        grid: GridSize,
        size: CellRectSize,
        occupied: &HashSet<CellCoord>,
        rng: &mut R,
    ) -> Option<CellRect>
    where
        R: Rng + ?Sized,
    {
        if size.width() == 0
            || size.height() == 0
            || size.width() > grid.columns()
            || size.height() > grid.rows()
        {
            return None;
        }

        let max_column = grid.columns() - size.width();
        let max_row = grid.rows() - size.height();

        for _ in 0..self.attempts {
            let origin = CellCoord::new(rng.gen_range(0..=max_column), rng.gen_range(0..=max_row));
            let region = CellRect::from_origin_and_size(origin, size);
            if region.cells().all(|cell| !occupied.contains(&cell)) {
                return Some(region);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_attempts_never_places() {
        let spawning = Spawning::new(Config::new(0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(spawning
            .place_cell(GridSize::new(4, 4), &HashSet::new(), &mut rng)
            .is_none());
    }

    #[test]
    fn oversized_footprint_is_rejected() {
        let spawning = Spawning::new(Config::new(500));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(spawning
            .place_region(
                GridSize::new(3, 1),
                CellRectSize::square(2),
                &HashSet::new(),
                &mut rng
            )
            .is_none());
    }
}
