//! Screen chrome: titles, buttons, overlays and the HUD.

use glam::Vec2;
use macroquad::{
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use snake_arcade_core::{Screen, GAME_TITLE};
use snake_arcade_rendering::{palette, Color, Scene, VirtualSurface};

use crate::{painter::EntityPainter, to_macroquad_color, SceneMetrics};

const TITLE_FONT: f32 = 72.0;
const CAPTION_FONT: f32 = 30.0;
const BODY_FONT: f32 = 26.0;
const TITLE_SHADOW_OFFSET: f32 = 3.0;
const BUTTON_OUTLINE: f32 = 3.0;
const WRAP_BORDER: f32 = 5.0;
const PLAIN_BORDER: f32 = 2.0;

/// Pass of [`draw_screen`], listed in painting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Background,
    Playfield,
    Border,
    Chrome,
}

/// Passes needed for the scene's screen. The border follows the playfield
/// so entities never hide the wrap-mode highlight.
fn layers(scene: &Scene) -> Vec<Layer> {
    let mut layers = vec![Layer::Background];
    if scene.shows_playfield() {
        layers.push(Layer::Playfield);
    }
    layers.push(Layer::Border);
    layers.push(Layer::Chrome);
    layers
}

/// Draws the whole virtual surface for the scene's screen.
pub(crate) fn draw_screen(
    scene: &Scene,
    metrics: &SceneMetrics,
    painter: &EntityPainter,
    cursor: Option<Vec2>,
    clock_ms: f32,
) {
    for layer in layers(scene) {
        match layer {
            Layer::Background => painter.draw_background(metrics),
            Layer::Playfield => painter.draw_playfield(scene, metrics, clock_ms),
            Layer::Border => draw_border(scene, metrics),
            Layer::Chrome => draw_chrome(scene, metrics, cursor),
        }
    }
}

fn draw_chrome(scene: &Scene, metrics: &SceneMetrics, cursor: Option<Vec2>) {
    let layout = Layout::new(scene.surface);
    match scene.screen {
        Screen::Menu => {
            draw_title(metrics, layout);
            draw_buttons(scene, metrics, layout, cursor);
        }
        Screen::Playing => draw_hud(scene, metrics, layout),
        Screen::Paused => {
            fill_surface(metrics, palette::PAUSE_OVERLAY);
            layout.centered(metrics, "Game Paused", 100.0, TITLE_FONT, palette::OVERLAY_TEXT);
            draw_buttons(scene, metrics, layout, cursor);
        }
        Screen::Instructions => draw_instructions(scene, metrics, layout),
        Screen::GameOver => {
            fill_surface(metrics, palette::GAME_OVER_OVERLAY);
            layout.centered(
                metrics,
                "Game Over!",
                200.0,
                TITLE_FONT,
                palette::GAME_OVER_TITLE,
            );
            let score = format!("Final Score: {}", scene.hud.score);
            layout.centered(metrics, &score, 280.0, CAPTION_FONT, palette::OVERLAY_TEXT);
            layout.centered(
                metrics,
                "Press ENTER to Restart",
                350.0,
                BODY_FONT,
                palette::RESTART_HINT,
            );
        }
    }
}

fn draw_border(scene: &Scene, metrics: &SceneMetrics) {
    let (thickness, color) = if scene.wrap_active {
        (WRAP_BORDER, palette::POWER_UP)
    } else {
        (PLAIN_BORDER, palette::BORDER)
    };
    let origin = metrics.to_screen(Vec2::ZERO);
    let size = metrics.surface_size();
    draw_rectangle_lines(
        origin.x,
        origin.y,
        size.x,
        size.y,
        thickness * metrics.scale(),
        to_macroquad_color(color),
    );
}

fn draw_title(metrics: &SceneMetrics, layout: Layout) {
    let shadow = Vec2::splat(TITLE_SHADOW_OFFSET * layout.scale);
    draw_text_at(
        metrics,
        GAME_TITLE,
        Anchor::Centered {
            top: layout.surface.layout_y(100.0),
        },
        shadow,
        TITLE_FONT * layout.scale,
        palette::TITLE_SHADOW,
    );
    layout.centered(metrics, GAME_TITLE, 100.0, TITLE_FONT, palette::TITLE);
}

fn draw_buttons(scene: &Scene, metrics: &SceneMetrics, layout: Layout, cursor: Option<Vec2>) {
    for button in scene.buttons() {
        let hovered = cursor.map_or(false, |point| button.contains(point));
        let fill = if hovered {
            palette::BUTTON_HOVER
        } else {
            palette::BUTTON
        };
        let origin = metrics.to_screen(button.origin);
        let size = button.size * metrics.scale();
        draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(fill));
        draw_rectangle_lines(
            origin.x,
            origin.y,
            size.x,
            size.y,
            BUTTON_OUTLINE * layout.scale * metrics.scale(),
            to_macroquad_color(palette::BUTTON_TEXT),
        );

        let font_size = metrics.font_size(CAPTION_FONT * layout.scale);
        let dimensions = measure_text(button.label, None, font_size, 1.0);
        let center = metrics.to_screen(button.center());
        let _ = draw_text(
            button.label,
            center.x - dimensions.width * 0.5,
            center.y - dimensions.height * 0.5 + dimensions.offset_y,
            f32::from(font_size),
            to_macroquad_color(palette::BUTTON_TEXT),
        );
    }
}

fn draw_instructions(scene: &Scene, metrics: &SceneMetrics, layout: Layout) {
    fill_surface(metrics, palette::INSTRUCTIONS_BACKGROUND);
    layout.centered(metrics, "How to Play", 50.0, TITLE_FONT, palette::TEXT);
    for (index, line) in scene.instructions.iter().enumerate() {
        let top = 150.0 + index as f32 * 40.0;
        layout.centered(metrics, line, top, BODY_FONT, palette::TEXT);
    }
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics, layout: Layout) {
    let score = format!("Score: {}", scene.hud.score);
    draw_text_at(
        metrics,
        &score,
        Anchor::TopLeft(Vec2::new(20.0, 20.0) * layout.scale),
        Vec2::ZERO,
        CAPTION_FONT * layout.scale,
        palette::TEXT,
    );
    if let Some(seconds) = scene.hud.power_up_seconds() {
        let countdown = format!("Powerups : {seconds}s");
        draw_text_at(
            metrics,
            &countdown,
            Anchor::TopLeft(Vec2::new(20.0, 55.0) * layout.scale),
            Vec2::ZERO,
            CAPTION_FONT * layout.scale,
            palette::POWER_UP,
        );
    }
}

fn fill_surface(metrics: &SceneMetrics, color: Color) {
    let origin = metrics.to_screen(Vec2::ZERO);
    let size = metrics.surface_size();
    draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(color));
}

/// Reference layout mapped onto the scene's surface.
#[derive(Clone, Copy, Debug)]
struct Layout {
    surface: VirtualSurface,
    scale: f32,
}

impl Layout {
    fn new(surface: VirtualSurface) -> Self {
        Self {
            surface,
            scale: surface.layout_scale(),
        }
    }

    /// Draws `text` centred horizontally at a reference-layout height.
    fn centered(&self, metrics: &SceneMetrics, text: &str, top: f32, font: f32, color: Color) {
        draw_text_at(
            metrics,
            text,
            Anchor::Centered {
                top: self.surface.layout_y(top),
            },
            Vec2::ZERO,
            font * self.scale,
            color,
        );
    }
}

#[derive(Clone, Copy, Debug)]
enum Anchor {
    /// Horizontally centred on the surface with the given top edge.
    Centered { top: f32 },
    /// Upper-left corner of the text box.
    TopLeft(Vec2),
}

/// Draws `text` with its box placed by `anchor` in virtual pixels.
fn draw_text_at(
    metrics: &SceneMetrics,
    text: &str,
    anchor: Anchor,
    offset: Vec2,
    font: f32,
    color: Color,
) {
    let font_size = metrics.font_size(font);
    let dimensions = measure_text(text, None, font_size, 1.0);
    let top_left = match anchor {
        Anchor::Centered { top } => {
            let anchor = metrics.to_screen(Vec2::new(metrics.virtual_width() * 0.5, top) + offset);
            Vec2::new(anchor.x - dimensions.width * 0.5, anchor.y)
        }
        Anchor::TopLeft(corner) => metrics.to_screen(corner + offset),
    };
    let _ = draw_text(
        text,
        top_left.x,
        top_left.y + dimensions.offset_y,
        f32::from(font_size),
        to_macroquad_color(color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::GridSize;
    use snake_arcade_rendering::layout::CELL_SIZE;

    fn scene(screen: Screen) -> Scene {
        let surface = VirtualSurface::new(GridSize::new(27, 20), CELL_SIZE).expect("surface");
        let mut scene = Scene::new(surface);
        scene.screen = screen;
        scene
    }

    #[test]
    fn border_is_painted_over_the_playfield() {
        let mut playing = scene(Screen::Playing);
        playing.wrap_active = true;
        assert_eq!(
            layers(&playing),
            vec![
                Layer::Background,
                Layer::Playfield,
                Layer::Border,
                Layer::Chrome,
            ]
        );
        for screen in [Screen::Paused, Screen::GameOver] {
            let order = layers(&scene(screen));
            let playfield = order.iter().position(|layer| *layer == Layer::Playfield);
            let border = order.iter().position(|layer| *layer == Layer::Border);
            assert!(playfield < border, "{screen:?}: {order:?}");
        }
    }

    #[test]
    fn menu_and_instructions_skip_the_playfield() {
        for screen in [Screen::Menu, Screen::Instructions] {
            assert!(!layers(&scene(screen)).contains(&Layer::Playfield));
        }
    }
}
