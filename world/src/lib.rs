#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Arcade.
//!
//! The world owns the snake, every item and hazard, the score, the move
//! cadence and the wrap-mode power-up. It changes only through [`apply`] and
//! reports each change as an [`Event`]; everything else reads it through
//! [`query`].

mod items;
mod snake;

use std::{collections::HashSet, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_arcade_core::{
    CellCoord, CellRect, Command, DeathCause, Event, ItemKind, RulesError, Ruleset,
};
use snake_arcade_system_spawning::{Config as SpawningConfig, Spawning};
use tracing::{debug, info};

use items::ItemSlots;
use snake::{Snake, Step};

/// Represents the authoritative Snake Arcade world state.
#[derive(Debug)]
pub struct World {
    rules: Ruleset,
    spawning: Spawning,
    rng: ChaCha8Rng,
    snake: Snake,
    items: ItemSlots,
    bombs: Vec<CellCoord>,
    rocks: Vec<CellRect>,
    score: u32,
    apples_eaten: u32,
    move_delay: Duration,
    rock_milestone: u32,
    power_up_remaining: Duration,
}

impl World {
    /// Creates a world for the provided rules whose randomness is fully
    /// determined by `seed`.
    ///
    /// The snake is laid out but no apple exists until [`Command::NewGame`].
    pub fn new(rules: Ruleset, seed: u64) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            spawning: Spawning::new(SpawningConfig::new(rules.spawn_attempts)),
            rng: ChaCha8Rng::seed_from_u64(seed),
            snake: Snake::new(rules.grid, rules.initial_length),
            items: ItemSlots::new(),
            bombs: Vec::new(),
            rocks: Vec::new(),
            score: 0,
            apples_eaten: 0,
            move_delay: rules.start_move_delay(),
            rock_milestone: rules.score_per_rock,
            power_up_remaining: Duration::ZERO,
            rules,
        })
    }

    fn wrap_active(&self) -> bool {
        !self.power_up_remaining.is_zero()
    }

    fn occupied_cells(&self) -> HashSet<CellCoord> {
        let mut occupied: HashSet<CellCoord> = self.snake.body().iter().copied().collect();
        occupied.extend(self.items.iter().filter_map(|item| item.cell()));
        occupied.extend(self.bombs.iter().copied());
        for rock in &self.rocks {
            occupied.extend(rock.cells());
        }
        occupied
    }

    fn start_round(&mut self, out_events: &mut Vec<Event>) {
        let was_wrapping = self.wrap_active();

        self.snake.reset(self.rules.grid, self.rules.initial_length);
        self.items.clear();
        self.bombs.clear();
        self.rocks.clear();
        self.score = 0;
        self.apples_eaten = 0;
        self.move_delay = self.rules.start_move_delay();
        self.rock_milestone = self.rules.score_per_rock;
        self.power_up_remaining = Duration::ZERO;

        info!("round started");
        out_events.push(Event::GameStarted);
        if was_wrapping {
            out_events.push(Event::WrapModeChanged { active: false });
        }
        out_events.push(Event::ScoreChanged { score: 0 });
        out_events.push(Event::MoveDelayChanged {
            delay: self.move_delay,
        });

        self.spawn_item(ItemKind::Apple, out_events);
    }

    fn run_power_up_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.snake.is_alive() || !self.wrap_active() {
            return;
        }
        self.power_up_remaining = self.power_up_remaining.saturating_sub(dt);
        if !self.wrap_active() {
            debug!("wrap mode expired");
            out_events.push(Event::WrapModeChanged { active: false });
        }
    }

    fn advance_snake(&mut self, out_events: &mut Vec<Event>) {
        if !self.snake.is_alive() {
            return;
        }
        let grid = self.rules.grid;
        let wrap = self.wrap_active();

        let apple = self.items.get(ItemKind::Apple).and_then(|item| item.cell());
        if apple.is_some() && self.snake.next_head(grid, wrap) == apple {
            self.snake.grow();
        }

        let head = match self.snake.advance(grid, wrap) {
            Some(Step::Moved { from, to }) => {
                out_events.push(Event::SnakeAdvanced { from, to });
                to
            }
            Some(Step::Crashed(cause)) => {
                self.end_round(cause, out_events);
                return;
            }
            None => return,
        };

        self.spawn_milestone_rock(out_events);
        self.resolve_collisions(head, out_events);
    }

    fn spawn_milestone_rock(&mut self, out_events: &mut Vec<Event>) {
        if self.score < self.rock_milestone {
            return;
        }
        self.rock_milestone = self
            .rock_milestone
            .saturating_add(self.rules.score_per_rock);

        let occupied = self.occupied_cells();
        match self.spawning.place_region(
            self.rules.grid,
            self.rules.rock_size(),
            &occupied,
            &mut self.rng,
        ) {
            Some(region) => {
                self.rocks.push(region);
                out_events.push(Event::RockSpawned { region });
            }
            None => {
                debug!(score = self.score, "no free footprint for rock");
                out_events.push(Event::RockSpawnFailed);
            }
        }
    }

    fn resolve_collisions(&mut self, head: CellCoord, out_events: &mut Vec<Event>) {
        if self.take_item(ItemKind::Apple, head, out_events) {
            self.on_apple_eaten(out_events);
        }

        for kind in [ItemKind::Cookie, ItemKind::Banana] {
            if self.take_item(kind, head, out_events) {
                self.add_score(self.rules.score_for(kind), out_events);
            }
        }

        if self.take_item(ItemKind::Star, head, out_events) {
            let was_wrapping = self.wrap_active();
            self.power_up_remaining = self.rules.star_duration();
            if !was_wrapping && self.wrap_active() {
                debug!("wrap mode started");
                out_events.push(Event::WrapModeChanged { active: true });
            }
        }

        if let Some(index) = self.bombs.iter().position(|bomb| *bomb == head) {
            let cell = self.bombs.remove(index);
            out_events.push(Event::ItemConsumed {
                kind: ItemKind::Bomb,
                cell,
            });
            let shrink = self.rules.bomb_shrink as usize;
            if self.snake.len() <= shrink {
                self.end_round(DeathCause::Bomb, out_events);
            } else {
                self.snake.shrink(shrink);
                out_events.push(Event::SnakeShrunk {
                    length: self.snake.len(),
                });
            }
        }

        if self.snake.is_alive() && self.rocks.iter().any(|rock| rock.contains(head)) {
            self.end_round(DeathCause::Rock, out_events);
        }
    }

    fn take_item(&mut self, kind: ItemKind, head: CellCoord, out_events: &mut Vec<Event>) -> bool {
        let Some(item) = self.items.get_mut(kind) else {
            return false;
        };
        if !item.is_at(head) {
            return false;
        }
        let _ = item.deactivate();
        out_events.push(Event::ItemConsumed { kind, cell: head });
        true
    }

    fn on_apple_eaten(&mut self, out_events: &mut Vec<Event>) {
        self.apples_eaten = self.apples_eaten.saturating_add(1);
        self.add_score(self.rules.apple_score, out_events);

        let delay = self
            .move_delay
            .saturating_sub(self.rules.move_delay_decrement())
            .max(self.rules.min_move_delay());
        if delay != self.move_delay {
            self.move_delay = delay;
            out_events.push(Event::MoveDelayChanged { delay });
        }

        if self.apples_eaten % self.rules.apples_per_event == 0 {
            debug!(apples = self.apples_eaten, "bonus event");
            let event_items = self.rules.event_items.clone();
            for kind in event_items {
                self.spawn_item(kind, out_events);
            }
            for _ in 0..self.rules.bombs_per_event {
                self.spawn_bomb(out_events);
            }
        }

        let star_idle = self
            .items
            .get(ItemKind::Star)
            .map_or(false, |star| !star.is_active());
        if star_idle && !self.wrap_active() && self.rng.gen::<f32>() < self.rules.star_chance {
            self.spawn_item(ItemKind::Star, out_events);
        }

        self.spawn_item(ItemKind::Apple, out_events);
    }

    fn add_score(&mut self, points: u32, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(points);
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn spawn_item(&mut self, kind: ItemKind, out_events: &mut Vec<Event>) {
        let occupied = self.occupied_cells();
        let placed = self
            .spawning
            .place_cell(self.rules.grid, &occupied, &mut self.rng);
        match (placed, self.items.get_mut(kind)) {
            (Some(cell), Some(item)) => {
                item.activate(cell);
                out_events.push(Event::ItemSpawned { kind, cell });
            }
            (None, Some(_)) => {
                debug!(?kind, "no free cell for item");
                out_events.push(Event::ItemSpawnFailed { kind });
            }
            (_, None) => {}
        }
    }

    fn spawn_bomb(&mut self, out_events: &mut Vec<Event>) {
        let occupied = self.occupied_cells();
        match self
            .spawning
            .place_cell(self.rules.grid, &occupied, &mut self.rng)
        {
            Some(cell) => {
                self.bombs.push(cell);
                out_events.push(Event::ItemSpawned {
                    kind: ItemKind::Bomb,
                    cell,
                });
            }
            None => {
                debug!("no free cell for bomb");
                out_events.push(Event::ItemSpawnFailed {
                    kind: ItemKind::Bomb,
                });
            }
        }
    }

    fn end_round(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        let was_wrapping = self.wrap_active();
        self.snake.kill();
        self.power_up_remaining = Duration::ZERO;

        info!(?cause, score = self.score, "snake died");
        out_events.push(Event::SnakeDied { cause });
        if was_wrapping {
            out_events.push(Event::WrapModeChanged { active: false });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame => world.start_round(out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.run_power_up_clock(dt, out_events);
        }
        Command::SteerSnake { direction } => {
            if world.snake.is_alive() {
                let _ = world.snake.steer(direction);
            }
        }
        Command::AdvanceSnake => world.advance_snake(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use snake_arcade_core::{CellCoord, CellRect, Direction, GridSize, ItemKind};

    use super::{items::Item, snake::Snake, World};

    /// Playfield dimensions.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.rules.grid
    }

    /// Captures a read-only view of the snake.
    #[must_use]
    pub fn snake_view(world: &World) -> SnakeView<'_> {
        SnakeView {
            snake: &world.snake,
        }
    }

    /// Cell of the active singleton item of `kind`, if any.
    ///
    /// Bombs are not singletons; see [`bombs`].
    #[must_use]
    pub fn item_cell(world: &World, kind: ItemKind) -> Option<CellCoord> {
        world.items.get(kind).and_then(Item::cell)
    }

    /// Every active item, singletons first in collision order, then bombs in
    /// spawn order.
    #[must_use]
    pub fn items(world: &World) -> Vec<ItemSnapshot> {
        world
            .items
            .iter()
            .filter_map(|item| {
                item.cell().map(|cell| ItemSnapshot {
                    kind: item.kind(),
                    cell,
                })
            })
            .chain(world.bombs.iter().map(|cell| ItemSnapshot {
                kind: ItemKind::Bomb,
                cell: *cell,
            }))
            .collect()
    }

    /// Cells of the active bombs in spawn order.
    #[must_use]
    pub fn bombs(world: &World) -> &[CellCoord] {
        &world.bombs
    }

    /// Footprints of the placed rocks in spawn order.
    #[must_use]
    pub fn rocks(world: &World) -> &[CellRect] {
        &world.rocks
    }

    /// Score of the current round.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Apples eaten during the current round.
    #[must_use]
    pub fn apples_eaten(world: &World) -> u32 {
        world.apples_eaten
    }

    /// Minimum time between two snake advances.
    #[must_use]
    pub fn move_delay(world: &World) -> Duration {
        world.move_delay
    }

    /// Score that triggers the next rock.
    #[must_use]
    pub fn rock_milestone(world: &World) -> u32 {
        world.rock_milestone
    }

    /// Reports whether the snake may cross the playfield boundary.
    #[must_use]
    pub fn wrap_active(world: &World) -> bool {
        world.wrap_active()
    }

    /// Gameplay time left on the wrap-mode power-up.
    #[must_use]
    pub fn power_up_remaining(world: &World) -> Duration {
        world.power_up_remaining
    }

    /// Read-only view of the snake.
    #[derive(Clone, Copy, Debug)]
    pub struct SnakeView<'a> {
        snake: &'a Snake,
    }

    impl<'a> SnakeView<'a> {
        /// Segments from head to tail.
        pub fn body(&self) -> impl Iterator<Item = CellCoord> + 'a {
            self.snake.body().iter().copied()
        }

        /// Segments as they were before the latest advance, index-aligned
        /// with [`SnakeView::body`].
        #[must_use]
        pub fn previous_body(&self) -> &'a [CellCoord] {
            self.snake.previous()
        }

        /// Cell occupied by the head.
        #[must_use]
        pub fn head(&self) -> Option<CellCoord> {
            self.snake.head()
        }

        /// Number of segments.
        #[must_use]
        pub fn length(&self) -> usize {
            self.snake.len()
        }

        /// Heading used by the latest advance.
        #[must_use]
        pub fn direction(&self) -> Direction {
            self.snake.direction()
        }

        /// Reports whether the round is still running.
        #[must_use]
        pub fn is_alive(&self) -> bool {
            self.snake.is_alive()
        }
    }

    /// Immutable representation of an active item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ItemSnapshot {
        /// Kind of item.
        pub kind: ItemKind,
        /// Cell the item occupies.
        pub cell: CellCoord,
    }
}

/// Helpers that arrange exact board situations for scenario tests.
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding {
    use std::time::Duration;

    use snake_arcade_core::{CellCoord, CellRect, Direction, ItemKind};

    use super::World;

    /// Replaces the snake body, listed head first, and its heading.
    pub fn place_snake(world: &mut World, body: &[CellCoord], direction: Direction) {
        world.snake.place(body, direction);
    }

    /// Activates an item at `cell`; bombs are appended to the bomb list.
    pub fn place_item(world: &mut World, kind: ItemKind, cell: CellCoord) {
        match world.items.get_mut(kind) {
            Some(item) => item.activate(cell),
            None => world.bombs.push(cell),
        }
    }

    /// Removes every item and bomb from the playfield.
    pub fn clear_items(world: &mut World) {
        world.items.clear();
        world.bombs.clear();
    }

    /// Adds a rock covering `region`.
    pub fn place_rock(world: &mut World, region: CellRect) {
        world.rocks.push(region);
    }

    /// Overrides the score without triggering any milestone.
    pub fn set_score(world: &mut World, score: u32) {
        world.score = score;
    }

    /// Overrides the apple counter used for bonus events.
    pub fn set_apples_eaten(world: &mut World, apples: u32) {
        world.apples_eaten = apples;
    }

    /// Overrides the current move delay.
    pub fn set_move_delay(world: &mut World, delay: Duration) {
        world.move_delay = delay;
    }

    /// Starts or replaces the wrap-mode power-up without emitting events.
    pub fn set_power_up_remaining(world: &mut World, remaining: Duration) {
        world.power_up_remaining = remaining;
    }
}
