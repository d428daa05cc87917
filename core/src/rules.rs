//! Gameplay parameters that distinguish the game variants.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellRectSize, GridSize, ItemKind};

/// Tunable gameplay constants for a single variant.
///
/// Every field has a default taken from [`Ruleset::deluxe`], so partial TOML
/// documents only need to name the values they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Playfield dimensions in cells.
    pub grid: GridSize,
    /// Number of segments the snake starts with.
    pub initial_length: u32,
    /// Delay between advances at the start of a round, in milliseconds.
    pub start_move_delay_ms: f32,
    /// Amount the delay shrinks per apple, in milliseconds.
    pub move_delay_decrement_ms: f32,
    /// Lower bound for the delay, in milliseconds.
    pub min_move_delay_ms: f32,
    /// Points awarded per apple.
    pub apple_score: u32,
    /// Points awarded per cookie.
    pub cookie_score: u32,
    /// Points awarded per banana.
    pub banana_score: u32,
    /// Apples eaten between two bonus events.
    pub apples_per_event: u32,
    /// Bonus items spawned by each event.
    pub event_items: Vec<ItemKind>,
    /// Bombs spawned by each event.
    pub bombs_per_event: u32,
    /// Segments removed by a bomb; snakes this short or shorter die instead.
    pub bomb_shrink: u32,
    /// Score interval between two rock spawns.
    pub score_per_rock: u32,
    /// Side length of the square rock footprint in cells.
    pub rock_side: u32,
    /// Probability of a star appearing after an apple is eaten.
    pub star_chance: f32,
    /// Length of the wrap-mode power-up, in milliseconds.
    pub star_duration_ms: u64,
    /// Random placement attempts before an item is left inactive.
    pub spawn_attempts: u32,
    /// Whether F11 toggles fullscreen.
    pub fullscreen_toggle: bool,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::deluxe()
    }
}

impl Ruleset {
    /// Variant with 2×2 rocks, cookies and bananas, and a ten second star.
    #[must_use]
    pub fn deluxe() -> Self {
        Self {
            grid: GridSize::new(27, 20),
            initial_length: 4,
            start_move_delay_ms: 160.0,
            move_delay_decrement_ms: 1.75,
            min_move_delay_ms: 10.0,
            apple_score: 10,
            cookie_score: 50,
            banana_score: 20,
            apples_per_event: 10,
            event_items: vec![ItemKind::Cookie, ItemKind::Banana],
            bombs_per_event: 4,
            bomb_shrink: 4,
            score_per_rock: 200,
            rock_side: 2,
            star_chance: 0.15,
            star_duration_ms: 10_000,
            spawn_attempts: 500,
            fullscreen_toggle: true,
        }
    }

    /// Variant with single-cell rocks, cookies only, fewer bombs and a shorter star.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            event_items: vec![ItemKind::Cookie],
            bombs_per_event: 2,
            rock_side: 1,
            star_duration_ms: 5_000,
            fullscreen_toggle: false,
            ..Self::deluxe()
        }
    }

    /// Delay between advances at the start of a round.
    #[must_use]
    pub fn start_move_delay(&self) -> Duration {
        millis(self.start_move_delay_ms)
    }

    /// Amount the delay shrinks per apple.
    #[must_use]
    pub fn move_delay_decrement(&self) -> Duration {
        millis(self.move_delay_decrement_ms)
    }

    /// Lower bound for the delay.
    #[must_use]
    pub fn min_move_delay(&self) -> Duration {
        millis(self.min_move_delay_ms)
    }

    /// Length of the wrap-mode power-up.
    #[must_use]
    pub const fn star_duration(&self) -> Duration {
        Duration::from_millis(self.star_duration_ms)
    }

    /// Footprint of a single rock.
    #[must_use]
    pub const fn rock_size(&self) -> CellRectSize {
        CellRectSize::square(self.rock_side)
    }

    /// Points awarded for collecting an item of the given kind.
    #[must_use]
    pub const fn score_for(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Apple => self.apple_score,
            ItemKind::Cookie => self.cookie_score,
            ItemKind::Banana => self.banana_score,
            ItemKind::Star | ItemKind::Bomb => 0,
        }
    }

    /// Checks that the parameters describe a playable game.
    pub fn validate(&self) -> Result<(), RulesError> {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        if columns == 0 || rows == 0 {
            return Err(RulesError::EmptyGrid { columns, rows });
        }
        if self.initial_length == 0 {
            return Err(RulesError::ZeroInitialLength);
        }
        if self.initial_length > columns / 2 + 1 {
            return Err(RulesError::GridTooNarrow {
                columns,
                initial_length: self.initial_length,
            });
        }

        let delays = [
            self.start_move_delay_ms,
            self.move_delay_decrement_ms,
            self.min_move_delay_ms,
        ];
        if delays.iter().any(|value| !value.is_finite() || *value < 0.0)
            || self.min_move_delay_ms <= 0.0
            || self.start_move_delay_ms < self.min_move_delay_ms
        {
            return Err(RulesError::InvalidMoveDelay {
                start_ms: self.start_move_delay_ms,
                decrement_ms: self.move_delay_decrement_ms,
                min_ms: self.min_move_delay_ms,
            });
        }

        if self.apples_per_event == 0 {
            return Err(RulesError::ZeroApplesPerEvent);
        }
        if let Some(kind) = self
            .event_items
            .iter()
            .copied()
            .find(|kind| !matches!(kind, ItemKind::Cookie | ItemKind::Banana))
        {
            return Err(RulesError::UnsupportedEventItem { kind });
        }
        if self.score_per_rock == 0 {
            return Err(RulesError::ZeroScorePerRock);
        }
        if self.rock_side == 0 || self.rock_side > columns || self.rock_side > rows {
            return Err(RulesError::InvalidRockSide {
                side: self.rock_side,
            });
        }
        if !(0.0..=1.0).contains(&self.star_chance) {
            return Err(RulesError::InvalidStarChance {
                chance: self.star_chance,
            });
        }

        Ok(())
    }
}

fn millis(value: f32) -> Duration {
    let nanos = (f64::from(value.max(0.0)) * 1_000_000.0).round();
    Duration::from_nanos(nanos as u64)
}

/// Reasons a [`Ruleset`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RulesError {
    /// The playfield has no cells.
    #[error("grid must have at least one cell (received {columns}x{rows})")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The snake must start with at least one segment.
    #[error("initial snake length must be positive")]
    ZeroInitialLength,
    /// The starting body would not fit left of the grid centre.
    #[error("grid with {columns} columns cannot hold a snake of length {initial_length}")]
    GridTooNarrow {
        /// Configured column count.
        columns: u32,
        /// Configured starting length.
        initial_length: u32,
    },
    /// Move delays must be finite, non-negative, and the floor must be positive.
    #[error(
        "invalid move delay (start {start_ms} ms, decrement {decrement_ms} ms, minimum {min_ms} ms)"
    )]
    InvalidMoveDelay {
        /// Configured starting delay.
        start_ms: f32,
        /// Configured per-apple decrement.
        decrement_ms: f32,
        /// Configured floor.
        min_ms: f32,
    },
    /// Bonus events need a positive apple interval.
    #[error("apples per event must be positive")]
    ZeroApplesPerEvent,
    /// Only cookies and bananas may be spawned by bonus events.
    #[error("{kind:?} cannot be spawned by bonus events")]
    UnsupportedEventItem {
        /// Offending item kind.
        kind: ItemKind,
    },
    /// Rocks need a positive score interval.
    #[error("score per rock must be positive")]
    ZeroScorePerRock,
    /// The rock footprint must be positive and fit inside the grid.
    #[error("rock side {side} does not fit the grid")]
    InvalidRockSide {
        /// Configured side length.
        side: u32,
    },
    /// Probabilities live in `0.0..=1.0`.
    #[error("star chance {chance} is not a probability")]
    InvalidStarChance {
        /// Configured probability.
        chance: f32,
    },
}
