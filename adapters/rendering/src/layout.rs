//! Virtual surface geometry and on-screen button layout.
//!
//! Everything is drawn onto a fixed virtual surface sized in whole cells;
//! backends scale that surface into the real window.

use glam::Vec2;
use snake_arcade_core::{ButtonAction, CellCoord, GridSize, ItemKind, Ruleset, Screen};

use crate::RenderingError;

/// Side length of one playfield cell in virtual pixels.
pub const CELL_SIZE: f32 = 30.0;

/// Dimensions of every menu button at full layout scale.
pub const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);

/// Surface size the screen layouts are authored for. Smaller surfaces shrink
/// the layout uniformly; larger ones centre it vertically.
pub const REFERENCE_SIZE: Vec2 = Vec2::new(810.0, 600.0);

/// Help text for the instructions screen, one entry per line, describing
/// the values in `rules`.
#[must_use]
pub fn instructions(rules: &Ruleset) -> Vec<String> {
    let mut lines = vec![format!(
        "Arrows to Move. Eat Apples (+{} pts)",
        rules.apple_score
    )];

    let mut bonus: Vec<&str> = rules
        .event_items
        .iter()
        .map(|kind| match kind {
            ItemKind::Cookie => "Cookies",
            ItemKind::Banana => "Bananas",
            ItemKind::Apple => "Apples",
            ItemKind::Star => "Stars",
            ItemKind::Bomb => "Bombs",
        })
        .collect();
    if rules.bombs_per_event > 0 {
        bonus.push("Bombs");
    }
    if let Some((last, rest)) = bonus.split_last() {
        let listed = if rest.is_empty() {
            (*last).to_owned()
        } else {
            format!("{} & {last}", rest.join(", "))
        };
        lines.push(format!(
            "Every {} Apples: {listed} appear.",
            rules.apples_per_event
        ));
    }

    if rules.star_chance > 0.0 {
        lines.push(format!(
            "STAR = {}s Wall Pass (Pass through walls!)",
            rules.star_duration().as_secs_f32()
        ));
    }
    if rules.bombs_per_event > 0 {
        lines.push("Hit BOMB = Lose Tail (DIE if too short!).".to_owned());
    }
    lines.push("Hit ROCK = GAME OVER.".to_owned());
    lines.push(if rules.fullscreen_toggle {
        "ESC to Pause. F11 for Fullscreen.".to_owned()
    } else {
        "ESC to Pause.".to_owned()
    });
    lines
}

const MENU_BUTTONS: [(ButtonAction, &str, f32); 3] = [
    (ButtonAction::NewGame, "New Game", 250.0),
    (ButtonAction::Instructions, "Instructions", 320.0),
    (ButtonAction::Quit, "Quit", 390.0),
];

const PAUSE_BUTTONS: [(ButtonAction, &str, f32); 4] = [
    (ButtonAction::Resume, "Resume", 200.0),
    (ButtonAction::NewGame, "New Game", 270.0),
    (ButtonAction::Instructions, "Instructions", 340.0),
    (ButtonAction::Quit, "Quit", 410.0),
];

/// Rectangular clickable button on the virtual surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    /// Action triggered by clicking the button.
    pub action: ButtonAction,
    /// Caption drawn centred inside the button.
    pub label: &'static str,
    /// Upper-left corner in virtual pixels.
    pub origin: Vec2,
    /// Width and height in virtual pixels.
    pub size: Vec2,
}

impl Button {
    /// Reports whether the virtual-space point lies inside the button.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }

    /// Centre of the button in virtual pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Fixed-size drawing surface covering the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualSurface {
    grid: GridSize,
    cell_size: f32,
}

impl VirtualSurface {
    /// Creates a surface that fits `grid` with square cells of `cell_size`
    /// virtual pixels.
    ///
    /// Returns an error when the grid has no cells or the cell size is not
    /// a positive finite number.
    pub fn new(grid: GridSize, cell_size: f32) -> Result<Self, RenderingError> {
        if grid.columns() == 0 || grid.rows() == 0 {
            return Err(RenderingError::EmptyGrid {
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        Ok(Self { grid, cell_size })
    }

    /// Playfield dimensions in cells.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Side length of one cell in virtual pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Surface width in virtual pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.grid.columns() as f32 * self.cell_size
    }

    /// Surface height in virtual pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.grid.rows() as f32 * self.cell_size
    }

    /// Surface dimensions in virtual pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Upper-left corner of `cell` in virtual pixels.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_size
    }

    /// Factor applied to the reference layout so it fits this surface.
    #[must_use]
    pub fn layout_scale(&self) -> f32 {
        (self.width() / REFERENCE_SIZE.x)
            .min(self.height() / REFERENCE_SIZE.y)
            .min(1.0)
    }

    /// Maps a vertical position of the reference layout onto this surface.
    #[must_use]
    pub fn layout_y(&self, reference_y: f32) -> f32 {
        let scale = self.layout_scale();
        (self.height() - REFERENCE_SIZE.y * scale) * 0.5 + reference_y * scale
    }

    /// Buttons shown on `screen`, top to bottom.
    #[must_use]
    pub fn buttons(&self, screen: Screen) -> Vec<Button> {
        let specs: &[(ButtonAction, &'static str, f32)] = match screen {
            Screen::Menu => &MENU_BUTTONS,
            Screen::Paused => &PAUSE_BUTTONS,
            Screen::Playing | Screen::Instructions | Screen::GameOver => &[],
        };
        let size = BUTTON_SIZE * self.layout_scale();
        let x = (self.width() - size.x) * 0.5;
        specs
            .iter()
            .map(|(action, label, y)| Button {
                action: *action,
                label: *label,
                origin: Vec2::new(x, self.layout_y(*y)),
                size,
            })
            .collect()
    }

    /// Action of the button on `screen` under the virtual-space point.
    #[must_use]
    pub fn button_at(&self, screen: Screen, point: Vec2) -> Option<ButtonAction> {
        self.buttons(screen)
            .into_iter()
            .find(|button| button.contains(point))
            .map(|button| button.action)
    }
}
