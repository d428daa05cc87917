#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and adapters to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

mod rules;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use rules::{Ruleset, RulesError};

/// Title shown in the window caption and on the main menu.
pub const GAME_TITLE: &str = "Snake 2.0";

/// Screens that make up the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Title screen offering a new game, instructions and quitting.
    Menu,
    /// Active gameplay; the only screen in which the snake advances.
    Playing,
    /// Gameplay frozen behind an overlay with resume controls.
    Paused,
    /// Help page describing controls and items.
    Instructions,
    /// Terminal screen reached when the snake dies.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets snake, score, items, hazards and timers, then places the first apple.
    NewGame,
    /// Advances the gameplay clock by the provided delta time.
    Tick {
        /// Duration of gameplay time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Buffers a new heading for the snake, applied on its next advance.
    SteerSnake {
        /// Requested heading.
        direction: Direction,
    },
    /// Moves the snake a single cell and resolves every collision.
    AdvanceSnake,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that every entity was re-initialised for a fresh round.
    GameStarted,
    /// Indicates that the gameplay clock advanced.
    TimeAdvanced {
        /// Duration of gameplay time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the snake's head moved between two cells.
    SnakeAdvanced {
        /// Cell the head occupied before moving.
        from: CellCoord,
        /// Cell the head occupies after moving.
        to: CellCoord,
    },
    /// Confirms that an item became active on the playfield.
    ItemSpawned {
        /// Kind of item that was placed.
        kind: ItemKind,
        /// Cell the item occupies.
        cell: CellCoord,
    },
    /// Reports that no free cell was found for an item within the attempt budget.
    ItemSpawnFailed {
        /// Kind of item that stays inactive.
        kind: ItemKind,
    },
    /// Confirms that the snake's head collected an item.
    ItemConsumed {
        /// Kind of item that was collected.
        kind: ItemKind,
        /// Cell the item occupied.
        cell: CellCoord,
    },
    /// Reports that a bomb removed tail segments without killing the snake.
    SnakeShrunk {
        /// Body length after the shrink.
        length: usize,
    },
    /// Confirms that a rock was placed on the playfield.
    RockSpawned {
        /// Cells covered by the rock.
        region: CellRect,
    },
    /// Reports that no free footprint was found for a milestone rock.
    RockSpawnFailed,
    /// Announces the new score after any change.
    ScoreChanged {
        /// Total score of the current round.
        score: u32,
    },
    /// Announces that the delay between snake advances changed.
    MoveDelayChanged {
        /// Minimum time between two advances.
        delay: Duration,
    },
    /// Announces that wrap mode was switched on or off.
    WrapModeChanged {
        /// Whether the snake may now cross the playfield boundary.
        active: bool,
    },
    /// Announces that the snake died and the round is over.
    SnakeDied {
        /// Collision that ended the round.
        cause: DeathCause,
    },
}

/// Collision that killed the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The head left the playfield while wrap mode was inactive.
    Wall,
    /// The head entered a cell occupied by the body.
    SelfCollision,
    /// A bomb struck a snake too short to survive the shrink.
    Bomb,
    /// The head entered a rock footprint.
    Rock,
}

/// Collectible and hazardous items that occupy a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Growth item that is always present while playing.
    Apple,
    /// Bonus item spawned by apple milestones.
    Cookie,
    /// Bonus item spawned by apple milestones.
    Banana,
    /// Power-up that temporarily enables wrap mode.
    Star,
    /// Hazard that removes tail segments.
    Bomb,
}

/// Cardinal headings available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Heading pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit offset as `(column, row)` deltas.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the adjacent cell in `direction`.
    ///
    /// With `wrap` enabled the coordinates wrap modulo the grid dimensions;
    /// otherwise `None` is returned when the step leaves the grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, grid: GridSize, wrap: bool) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.offset();
        let columns = i64::from(grid.columns());
        let rows = i64::from(grid.rows());
        if columns == 0 || rows == 0 {
            return None;
        }

        let mut column = i64::from(self.column) + i64::from(column_delta);
        let mut row = i64::from(self.row) + i64::from(row_delta);
        if wrap {
            column = column.rem_euclid(columns);
            row = row.rem_euclid(rows);
        } else if column < 0 || row < 0 || column >= columns || row >= rows {
            return None;
        }

        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        Some(Self::new(column, row))
    }
}

/// Dimensions of the playfield measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell at the centre of the grid, rounding toward the origin.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.origin.column()
            && cell.row() >= self.origin.row()
            && cell.column() - self.origin.column() < self.size.width()
            && cell.row() - self.origin.row() < self.size.height()
    }

    /// Reports whether every covered cell lies inside the grid.
    #[must_use]
    pub fn fits_within(&self, grid: GridSize) -> bool {
        let right = u64::from(self.origin.column()) + u64::from(self.size.width());
        let bottom = u64::from(self.origin.row()) + u64::from(self.size.height());
        right <= u64::from(grid.columns()) && bottom <= u64::from(grid.rows())
    }

    /// Iterates over the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size;
        (0..size.height()).flat_map(move |row| {
            (0..size.width()).map(move |column| {
                CellCoord::new(origin.column() + column, origin.row() + row)
            })
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size descriptor.
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Pause toggle and return to menu from game over.
    Escape,
    /// Restart from game over.
    Enter,
    /// Fullscreen toggle.
    F11,
    /// Any other key; only meaningful for "press any key" prompts.
    Other,
}

impl Key {
    /// Heading requested by an arrow key.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::North),
            Self::Down => Some(Direction::South),
            Self::Left => Some(Direction::West),
            Self::Right => Some(Direction::East),
            _ => None,
        }
    }
}

/// Actions bound to on-screen buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Start a fresh round.
    NewGame,
    /// Leave the pause screen.
    Resume,
    /// Show the help page.
    Instructions,
    /// Exit the game.
    Quit,
}

/// Input observed by the adapter during a frame, in arrival order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A key went down.
    KeyPressed(Key),
    /// The primary mouse button went down, possibly over a button.
    Click {
        /// Button under the cursor, if any.
        button: Option<ButtonAction>,
    },
    /// The window asked to close.
    QuitRequested,
}

/// Symbolic sound cues forwarded to the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// An apple was eaten.
    Eat,
    /// The snake crashed into a wall, itself or a rock.
    Crash,
    /// A cookie or banana was collected.
    Bonus,
    /// A bomb went off.
    Explode,
    /// A star was collected.
    PowerUp,
    /// Start the looping power-up track.
    PowerUpLoopStart,
    /// Stop the looping power-up track.
    PowerUpLoopStop,
}

impl SoundCue {
    /// Stable symbolic name of the cue, also used as the asset file stem.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eat => "eat",
            Self::Crash => "crash",
            Self::Bonus => "bonus",
            Self::Explode => "explode",
            Self::PowerUp => "powerup",
            Self::PowerUpLoopStart | Self::PowerUpLoopStop => "powerup_loop",
        }
    }

    /// Appends the cues triggered by a world event.
    pub fn for_event(event: &Event, out: &mut Vec<SoundCue>) {
        match event {
            Event::ItemConsumed { kind, .. } => out.push(match kind {
                ItemKind::Apple => Self::Eat,
                ItemKind::Cookie | ItemKind::Banana => Self::Bonus,
                ItemKind::Star => Self::PowerUp,
                ItemKind::Bomb => Self::Explode,
            }),
            Event::WrapModeChanged { active: true } => out.push(Self::PowerUpLoopStart),
            Event::WrapModeChanged { active: false } => out.push(Self::PowerUpLoopStop),
            Event::SnakeDied { cause } if *cause != DeathCause::Bomb => out.push(Self::Crash),
            _ => {}
        }
    }
}
