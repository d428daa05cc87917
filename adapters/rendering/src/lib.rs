#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Arcade adapters.

pub mod layout;
pub mod motion;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_arcade_core::{CellCoord, CellRect, Direction, InputEvent, ItemKind, Screen, SoundCue};
use thiserror::Error;

pub use layout::{Button, VirtualSurface};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Fixed colors of the arcade look.
pub mod palette {
    use snake_arcade_core::ItemKind;

    use super::Color;

    /// Playfield background when no image is configured.
    pub const BACKGROUND: Color = Color::from_rgb_u8(240, 248, 255);
    /// Bars around the letterboxed surface.
    pub const LETTERBOX: Color = Color::from_rgb_u8(50, 50, 50);
    /// Body text and the score readout.
    pub const TEXT: Color = Color::from_rgb_u8(50, 50, 80);
    /// Idle button fill.
    pub const BUTTON: Color = Color::from_rgb_u8(100, 149, 237);
    /// Button fill under the cursor.
    pub const BUTTON_HOVER: Color = Color::from_rgb_u8(65, 105, 225);
    /// Button outline and caption.
    pub const BUTTON_TEXT: Color = Color::from_rgb_u8(255, 255, 255);
    /// Power-up countdown and the wrap-mode border.
    pub const POWER_UP: Color = Color::from_rgb_u8(255, 215, 0);
    /// Playfield border outside wrap mode.
    pub const BORDER: Color = Color::from_rgb_u8(50, 50, 50);
    /// Menu title.
    pub const TITLE: Color = Color::from_rgb_u8(255, 105, 180);
    /// Drop shadow behind the menu title.
    pub const TITLE_SHADOW: Color = Color::from_rgb_u8(100, 100, 100);
    /// Instructions page background.
    pub const INSTRUCTIONS_BACKGROUND: Color = Color::from_rgb_u8(255, 253, 208);
    /// Veil drawn over the frozen playfield while paused.
    pub const PAUSE_OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.5);
    /// Veil drawn over the playfield after death.
    pub const GAME_OVER_OVERLAY: Color = Color::new(50.0 / 255.0, 0.0, 0.0, 0.5);
    /// Pause and final score captions.
    pub const OVERLAY_TEXT: Color = Color::from_rgb_u8(255, 255, 255);
    /// "Game Over!" caption.
    pub const GAME_OVER_TITLE: Color = Color::from_rgb_u8(255, 255, 0);
    /// Restart hint below the final score.
    pub const RESTART_HINT: Color = Color::from_rgb_u8(200, 200, 200);
    /// Snake segments when drawn as primitives.
    pub const SNAKE: Color = Color::from_rgb_u8(50, 205, 50);
    /// Rocks when drawn as primitives.
    pub const ROCK: Color = Color::from_rgb_u8(100, 100, 100);

    /// Fill used when `kind` is drawn as a primitive.
    #[must_use]
    pub const fn item(kind: ItemKind) -> Color {
        match kind {
            ItemKind::Apple => Color::from_rgb_u8(255, 50, 50),
            ItemKind::Cookie | ItemKind::Banana => Color::from_rgb_u8(210, 180, 140),
            ItemKind::Star => Color::from_rgb_u8(255, 255, 0),
            ItemKind::Bomb => Color::from_rgb_u8(0, 0, 0),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Input observed during the frame, in arrival order.
    pub events: Vec<InputEvent>,
    /// Cursor position on the virtual surface, if it lies over the window.
    pub cursor: Option<Vec2>,
}

/// Decision returned by the scene update closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep presenting frames.
    Continue,
    /// Close the window and return from [`RenderingBackend::run`].
    Exit,
}

/// One snake segment with the cell it left and the cell it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnakeSegment {
    /// Cell occupied before the latest advance.
    pub previous: CellCoord,
    /// Cell occupied now.
    pub current: CellCoord,
}

/// Active item drawn on the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemPresentation {
    /// Kind of item, selecting sprite and fallback color.
    pub kind: ItemKind,
    /// Cell the item occupies.
    pub cell: CellCoord,
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Score of the current round.
    pub score: u32,
    /// Gameplay time left on the wrap-mode power-up.
    pub power_up_remaining: Duration,
}

impl Hud {
    /// Whole seconds left on the power-up, rounded up, while one runs.
    #[must_use]
    pub fn power_up_seconds(&self) -> Option<u64> {
        if self.power_up_remaining.is_zero() {
            return None;
        }
        let millis = self.power_up_remaining.as_millis();
        Some(u64::try_from((millis + 999) / 1_000).unwrap_or(u64::MAX))
    }
}

/// Scene description combining the screen, the playfield and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Surface everything is drawn on.
    pub surface: VirtualSurface,
    /// Screen currently shown.
    pub screen: Screen,
    /// Snake segments from head to tail.
    pub snake: Vec<SnakeSegment>,
    /// Heading of the snake head.
    pub heading: Direction,
    /// Active items, bombs included.
    pub items: Vec<ItemPresentation>,
    /// Rock footprints.
    pub rocks: Vec<CellRect>,
    /// Interpolation fraction between the previous and current cells.
    pub alpha: f32,
    /// Whether the snake may currently cross the playfield boundary.
    pub wrap_active: bool,
    /// Heads-up display values.
    pub hud: Hud,
    /// Lines shown on the instructions screen.
    pub instructions: Vec<String>,
}

impl Scene {
    /// Creates an empty scene showing the main menu.
    #[must_use]
    pub fn new(surface: VirtualSurface) -> Self {
        Self {
            surface,
            screen: Screen::Menu,
            snake: Vec::new(),
            heading: Direction::East,
            items: Vec::new(),
            rocks: Vec::new(),
            alpha: 0.0,
            wrap_active: false,
            hud: Hud::default(),
            instructions: Vec::new(),
        }
    }

    /// Replaces the help text shown on the instructions screen.
    #[must_use]
    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Reports whether the playfield is visible on the current screen.
    #[must_use]
    pub const fn shows_playfield(&self) -> bool {
        matches!(
            self.screen,
            Screen::Playing | Screen::Paused | Screen::GameOver
        )
    }

    /// Buttons shown on the current screen.
    #[must_use]
    pub fn buttons(&self) -> Vec<Button> {
        self.surface.buttons(self.screen)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// Whether F11 toggles fullscreen.
    pub fullscreen_toggle: bool,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene, fullscreen_toggle: bool) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            fullscreen_toggle,
        }
    }
}

/// Rendering backend capable of presenting Snake Arcade scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure asks to exit or
    /// the window closes.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and mutates the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static;
}

/// Collaborator that turns symbolic sound cues into audio.
pub trait AudioSink {
    /// Plays or stops the sound bound to `cue`.
    fn play(&mut self, cue: SoundCue);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The playfield must contain at least one cell.
    #[error("grid must have at least one cell (received {columns}x{rows})")]
    EmptyGrid {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Cells must have a positive finite size.
    #[error("cell size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::GridSize;

    fn scene() -> Scene {
        Scene::new(VirtualSurface::new(GridSize::new(27, 20), layout::CELL_SIZE).expect("surface"))
    }

    #[test]
    fn power_up_seconds_round_up() {
        let mut hud = Hud::default();
        assert_eq!(hud.power_up_seconds(), None);

        hud.power_up_remaining = Duration::from_millis(9_001);
        assert_eq!(hud.power_up_seconds(), Some(10));
        hud.power_up_remaining = Duration::from_millis(1);
        assert_eq!(hud.power_up_seconds(), Some(1));
        hud.power_up_remaining = Duration::from_secs(3);
        assert_eq!(hud.power_up_seconds(), Some(3));
    }

    #[test]
    fn playfield_hidden_on_menu_and_instructions() {
        let mut scene = scene();
        assert!(!scene.shows_playfield());
        scene.screen = Screen::Instructions;
        assert!(!scene.shows_playfield());
        scene.screen = Screen::GameOver;
        assert!(scene.shows_playfield());
        assert!(scene.buttons().is_empty());
    }
}
