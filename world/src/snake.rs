//! Snake body bookkeeping.

use std::collections::VecDeque;

use snake_arcade_core::{CellCoord, DeathCause, Direction, GridSize};

/// Outcome of a single advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// The head moved into a free cell.
    Moved { from: CellCoord, to: CellCoord },
    /// The move was fatal; the body was left untouched.
    Crashed(DeathCause),
}

/// Segment list plus heading, growth and liveness flags.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    body: VecDeque<CellCoord>,
    previous: Vec<CellCoord>,
    direction: Direction,
    pending_direction: Direction,
    growth_pending: bool,
    alive: bool,
}

impl Snake {
    pub(crate) fn new(grid: GridSize, length: u32) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            previous: Vec::new(),
            direction: Direction::East,
            pending_direction: Direction::East,
            growth_pending: false,
            alive: true,
        };
        snake.reset(grid, length);
        snake
    }

    /// Lays the body out horizontally with the head on the grid centre,
    /// heading east.
    pub(crate) fn reset(&mut self, grid: GridSize, length: u32) {
        let head = grid.center();
        self.body = (0..length)
            .map(|offset| CellCoord::new(head.column().saturating_sub(offset), head.row()))
            .collect();
        self.previous = self.body.iter().copied().collect();
        self.direction = Direction::East;
        self.pending_direction = Direction::East;
        self.growth_pending = false;
        self.alive = true;
    }

    /// Buffers `direction` for the next advance unless it reverses the
    /// current heading.
    pub(crate) fn steer(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Cell the head would enter on the next advance, if it stays on the grid.
    pub(crate) fn next_head(&self, grid: GridSize, wrap: bool) -> Option<CellCoord> {
        self.head()?.neighbor(self.pending_direction, grid, wrap)
    }

    pub(crate) fn advance(&mut self, grid: GridSize, wrap: bool) -> Option<Step> {
        if !self.alive {
            return None;
        }
        let from = self.head()?;

        self.previous = self.body.iter().copied().collect();
        self.direction = self.pending_direction;

        let Some(to) = from.neighbor(self.direction, grid, wrap) else {
            self.alive = false;
            return Some(Step::Crashed(DeathCause::Wall));
        };
        if self.body.contains(&to) {
            self.alive = false;
            return Some(Step::Crashed(DeathCause::SelfCollision));
        }

        self.body.push_front(to);
        if self.growth_pending {
            self.growth_pending = false;
            if let Some(&tail) = self.previous.last() {
                self.previous.push(tail);
            }
        } else {
            let _ = self.body.pop_back();
        }

        Some(Step::Moved { from, to })
    }

    /// Requests one extra segment, added by the next advance.
    pub(crate) fn grow(&mut self) {
        self.growth_pending = true;
    }

    /// Drops up to `amount` tail segments, always keeping the head.
    pub(crate) fn shrink(&mut self, amount: usize) {
        let length = self.body.len().saturating_sub(amount).max(1);
        self.body.truncate(length);
        self.previous.truncate(length);
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn head(&self) -> Option<CellCoord> {
        self.body.front().copied()
    }

    pub(crate) fn body(&self) -> &VecDeque<CellCoord> {
        &self.body
    }

    /// Body as it was before the most recent advance, index-aligned with
    /// [`Snake::body`].
    pub(crate) fn previous(&self) -> &[CellCoord] {
        &self.previous
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    #[cfg(any(test, feature = "scenario_scaffolding"))]
    pub(crate) fn place(&mut self, body: &[CellCoord], direction: Direction) {
        self.body = body.iter().copied().collect();
        self.previous = body.to_vec();
        self.direction = direction;
        self.pending_direction = direction;
        self.growth_pending = false;
        self.alive = !body.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSize {
        GridSize::new(10, 8)
    }

    fn cells(snake: &Snake) -> Vec<CellCoord> {
        snake.body().iter().copied().collect()
    }

    #[test]
    fn reset_lays_out_four_segments_heading_east() {
        let snake = Snake::new(grid(), 4);
        assert_eq!(
            cells(&snake),
            vec![
                CellCoord::new(5, 4),
                CellCoord::new(4, 4),
                CellCoord::new(3, 4),
                CellCoord::new(2, 4),
            ]
        );
        assert_eq!(snake.direction(), Direction::East);
        assert!(snake.is_alive());
    }

    #[test]
    fn reverse_heading_is_ignored() {
        let mut snake = Snake::new(grid(), 4);
        assert!(!snake.steer(Direction::West));
        assert!(snake.steer(Direction::North));
        let _ = snake.advance(grid(), false);
        assert_eq!(snake.direction(), Direction::North);
        assert!(!snake.steer(Direction::South));
    }

    #[test]
    fn steering_is_buffered_until_the_next_advance() {
        let mut snake = Snake::new(grid(), 4);
        assert!(snake.steer(Direction::South));
        assert_eq!(snake.direction(), Direction::East);
        assert_eq!(
            snake.advance(grid(), false),
            Some(Step::Moved {
                from: CellCoord::new(5, 4),
                to: CellCoord::new(5, 5),
            })
        );
    }

    #[test]
    fn advance_keeps_length_without_growth() {
        let mut snake = Snake::new(grid(), 4);
        let _ = snake.advance(grid(), false);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Some(CellCoord::new(6, 4)));
        assert_eq!(snake.previous()[0], CellCoord::new(5, 4));
    }

    #[test]
    fn growth_adds_exactly_one_segment_once() {
        let mut snake = Snake::new(grid(), 4);
        snake.grow();
        let _ = snake.advance(grid(), false);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.previous().len(), 5);
        let _ = snake.advance(grid(), false);
        assert_eq!(snake.len(), 5);
    }

    #[test]
    fn leaving_the_grid_kills_without_moving() {
        let mut snake = Snake::new(grid(), 4);
        snake.place(&[CellCoord::new(9, 0), CellCoord::new(8, 0)], Direction::East);
        let before = cells(&snake);

        assert_eq!(
            snake.advance(grid(), false),
            Some(Step::Crashed(DeathCause::Wall))
        );
        assert!(!snake.is_alive());
        assert_eq!(cells(&snake), before);
        assert_eq!(snake.advance(grid(), false), None);
    }

    #[test]
    fn wrap_mode_teleports_to_opposite_edge() {
        let mut snake = Snake::new(grid(), 4);
        snake.place(&[CellCoord::new(9, 0), CellCoord::new(8, 0)], Direction::East);

        assert_eq!(
            snake.advance(grid(), true),
            Some(Step::Moved {
                from: CellCoord::new(9, 0),
                to: CellCoord::new(0, 0),
            })
        );
        assert!(snake.is_alive());
    }

    #[test]
    fn biting_the_body_kills() {
        let mut snake = Snake::new(grid(), 4);
        snake.place(
            &[
                CellCoord::new(3, 3),
                CellCoord::new(3, 4),
                CellCoord::new(2, 4),
                CellCoord::new(2, 3),
                CellCoord::new(2, 2),
            ],
            Direction::North,
        );
        assert!(snake.steer(Direction::West));

        assert_eq!(
            snake.advance(grid(), false),
            Some(Step::Crashed(DeathCause::SelfCollision))
        );
        assert!(!snake.is_alive());
        assert_eq!(snake.len(), 5);
    }

    #[test]
    fn shrink_never_drops_below_one_segment() {
        let mut snake = Snake::new(grid(), 4);
        snake.shrink(2);
        assert_eq!(snake.len(), 2);
        snake.shrink(10);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Some(CellCoord::new(5, 4)));
    }
}
