//! Cosmetic motion: interpolation between cells, body wiggle and item bob.
//!
//! All functions are pure so backends only supply the wall clock.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use snake_arcade_core::{CellCoord, Direction};

use crate::SnakeSegment;

/// Peak sideways offset of a body segment in virtual pixels.
pub const WIGGLE_AMPLITUDE: f32 = 4.0;
/// Phase step between consecutive segments in radians.
pub const WIGGLE_FREQUENCY: f32 = 0.6;
/// Phase advance per millisecond of wall-clock time in radians.
pub const WIGGLE_SPEED: f32 = 0.01;
/// Peak vertical item offset in virtual pixels.
pub const BOB_AMPLITUDE: f32 = 4.0;
/// Phase advance of the item bob per millisecond in radians.
pub const BOB_SPEED: f32 = 0.005;

/// Position in cell units between `previous` and `current`.
///
/// Snaps to `current` when the cells are more than one cell apart on either
/// axis, which only happens when wrapping across the playfield edge.
#[must_use]
pub fn interpolate(previous: CellCoord, current: CellCoord, alpha: f32) -> Vec2 {
    let from = cell_vec(previous);
    let to = cell_vec(current);
    let delta = to - from;
    if delta.x.abs() > 1.0 || delta.y.abs() > 1.0 {
        return to;
    }
    from + delta * alpha.clamp(0.0, 1.0)
}

/// Signed sideways offset of the segment at `index`; the head never wiggles.
#[must_use]
pub fn wiggle(index: usize, clock_ms: f32) -> f32 {
    if index == 0 {
        return 0.0;
    }
    (index as f32 * WIGGLE_FREQUENCY - clock_ms * WIGGLE_SPEED).sin() * WIGGLE_AMPLITUDE
}

/// Vertical item offset at `clock_ms`.
#[must_use]
pub fn bob(clock_ms: f32) -> f32 {
    (clock_ms * BOB_SPEED).sin() * BOB_AMPLITUDE
}

/// Clockwise rotation in radians that turns a north-facing head sprite
/// towards `direction`.
#[must_use]
pub const fn head_rotation(direction: Direction) -> f32 {
    match direction {
        Direction::North => 0.0,
        Direction::East => FRAC_PI_2,
        Direction::South => PI,
        Direction::West => -FRAC_PI_2,
    }
}

/// Upper-left corners, in virtual pixels, of every snake segment from head
/// to tail, interpolated by `alpha` and offset by the wiggle.
///
/// The wiggle runs perpendicular to the local direction of travel: the
/// head's heading for the head, the vector towards the preceding segment
/// otherwise. Segments straddling a wrap get no wiggle.
#[must_use]
pub fn segment_positions(
    segments: &[SnakeSegment],
    heading: Direction,
    alpha: f32,
    clock_ms: f32,
    cell_size: f32,
) -> Vec<Vec2> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let base = interpolate(segment.previous, segment.current, alpha) * cell_size;
            let travel = match index.checked_sub(1).and_then(|ahead| segments.get(ahead)) {
                Some(ahead) => cell_vec(ahead.current) - cell_vec(segment.current),
                None => {
                    let (dx, dy) = heading.offset();
                    Vec2::new(dx as f32, dy as f32)
                }
            };
            let wave = wiggle(index, clock_ms);
            if travel.x.abs() > 1.0 || travel.y.abs() > 1.0 {
                base
            } else if travel.x != 0.0 {
                base + Vec2::new(0.0, wave)
            } else {
                base + Vec2::new(wave, 0.0)
            }
        })
        .collect()
}

fn cell_vec(cell: CellCoord) -> Vec2 {
    Vec2::new(cell.column() as f32, cell.row() as f32)
}
