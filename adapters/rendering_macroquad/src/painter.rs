//! Entity drawing with either loaded sprites or primitive shapes.

use std::path::Path;

use glam::Vec2;
use macroquad::shapes::{draw_circle, draw_rectangle};
use snake_arcade_rendering::{motion, palette, Scene};
use tracing::{info, warn};

use crate::{
    sprites::{DrawParams, SpriteAtlas, SpriteKey},
    to_macroquad_color, SceneMetrics,
};

/// Extra virtual pixels added to item sprites so they overlap the cell edge.
const ITEM_SPRITE_MARGIN: f32 = 8.0;
/// Extra virtual pixels added to body sprites so segments touch.
const BODY_SPRITE_MARGIN: f32 = 2.0;

/// Strategy chosen once at startup for drawing playfield entities.
#[derive(Debug)]
pub(crate) enum EntityPainter {
    Sprites(SpriteAtlas),
    Primitives,
}

impl EntityPainter {
    /// Loads the sprite atlas from `manifest`, falling back to primitive
    /// shapes when sprites are disabled or any image fails to load.
    pub(crate) fn select(manifest: Option<&Path>) -> Self {
        let Some(manifest) = manifest else {
            info!("sprite loading disabled; drawing primitive shapes");
            return Self::Primitives;
        };
        match SpriteAtlas::from_manifest_path(manifest) {
            Ok(atlas) => {
                info!(
                    sprites = atlas.texture_count(),
                    manifest = %manifest.display(),
                    "sprite atlas loaded"
                );
                Self::Sprites(atlas)
            }
            Err(error) => {
                warn!(
                    error = %format!("{error:#}"),
                    "sprites unavailable; drawing primitive shapes"
                );
                Self::Primitives
            }
        }
    }

    pub(crate) fn draw_background(&self, metrics: &SceneMetrics) {
        let origin = metrics.to_screen(Vec2::ZERO);
        let size = metrics.surface_size();
        if let Self::Sprites(atlas) = self {
            if atlas.draw_background(origin, size) {
                return;
            }
        }
        draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(palette::BACKGROUND),
        );
    }

    /// Draws rocks, items and the snake, in that order.
    pub(crate) fn draw_playfield(&self, scene: &Scene, metrics: &SceneMetrics, clock_ms: f32) {
        let surface = scene.surface;
        let cell = surface.cell_size();

        for rock in &scene.rocks {
            let origin = surface.cell_origin(rock.origin());
            let footprint = Vec2::new(
                rock.size().width() as f32 * cell,
                rock.size().height() as f32 * cell,
            );
            match self {
                Self::Sprites(atlas) => {
                    let size = footprint + Vec2::splat(cell);
                    let origin = origin - Vec2::splat(cell * 0.5);
                    draw_sprite(atlas, SpriteKey::Rock, origin, size, 0.0, metrics);
                }
                Self::Primitives => {
                    let top_left = metrics.to_screen(origin);
                    let size = footprint * metrics.scale();
                    draw_rectangle(
                        top_left.x,
                        top_left.y,
                        size.x,
                        size.y,
                        to_macroquad_color(palette::ROCK),
                    );
                }
            }
        }

        let bob = Vec2::new(0.0, motion::bob(clock_ms));
        for item in &scene.items {
            let origin = surface.cell_origin(item.cell) + bob;
            match self {
                Self::Sprites(atlas) => {
                    let margin = ITEM_SPRITE_MARGIN * 0.5;
                    draw_sprite(
                        atlas,
                        SpriteKey::for_item(item.kind),
                        origin - Vec2::splat(margin),
                        Vec2::splat(cell + ITEM_SPRITE_MARGIN),
                        0.0,
                        metrics,
                    );
                }
                Self::Primitives => {
                    let center = metrics.to_screen(origin + Vec2::splat(cell * 0.5));
                    draw_circle(
                        center.x,
                        center.y,
                        cell * 0.5 * metrics.scale(),
                        to_macroquad_color(palette::item(item.kind)),
                    );
                }
            }
        }

        let positions = motion::segment_positions(
            &scene.snake,
            scene.heading,
            scene.alpha,
            clock_ms,
            cell,
        );
        for (index, position) in positions.iter().enumerate().rev() {
            match self {
                Self::Sprites(atlas) if index == 0 => {
                    draw_sprite(
                        atlas,
                        SpriteKey::Head,
                        *position,
                        Vec2::splat(cell),
                        motion::head_rotation(scene.heading),
                        metrics,
                    );
                }
                Self::Sprites(atlas) => {
                    let margin = BODY_SPRITE_MARGIN * 0.5;
                    draw_sprite(
                        atlas,
                        SpriteKey::Body,
                        *position - Vec2::splat(margin),
                        Vec2::splat(cell + BODY_SPRITE_MARGIN),
                        0.0,
                        metrics,
                    );
                }
                Self::Primitives => {
                    let center = metrics.to_screen(*position + Vec2::splat(cell * 0.5));
                    draw_circle(
                        center.x,
                        center.y,
                        (cell * 0.5 + 1.0) * metrics.scale(),
                        to_macroquad_color(palette::SNAKE),
                    );
                }
            }
        }
    }
}

fn draw_sprite(
    atlas: &SpriteAtlas,
    key: SpriteKey,
    origin: Vec2,
    size: Vec2,
    rotation: f32,
    metrics: &SceneMetrics,
) {
    let params =
        DrawParams::new(metrics.to_screen(origin), size * metrics.scale()).with_rotation(rotation);
    if let Err(error) = atlas.draw(key, params) {
        warn!(error = %format!("{error:#}"), "failed to draw sprite");
    }
}
