#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Snake Arcade.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature and route sound cues through [`SilentAudio`].
//!
//! The virtual surface is letterboxed into the resizable window. Draw calls
//! and mouse positions are converted between virtual and window pixels here,
//! so the rest of the workspace only ever sees virtual pixels.

mod painter;
mod screens;
mod sprites;

use std::{
    collections::VecDeque,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    get_last_key_pressed, is_key_pressed, is_mouse_button_pressed, is_quit_requested,
    mouse_position, prevent_quit, KeyCode, MouseButton,
};
use snake_arcade_core::{InputEvent, Key, SoundCue};
use snake_arcade_rendering::{
    AudioSink, FrameInput, FrameOutcome, Presentation, RenderingBackend, Scene, VirtualSurface,
};
use tracing::{info, trace};

use self::{painter::EntityPainter, sprites::SpriteAtlas};

/// Frame rate the render loop is capped at.
const TARGET_FRAME_RATE: u32 = 60;

const KEY_BINDINGS: [(KeyCode, Key); 8] = [
    (KeyCode::Up, Key::Up),
    (KeyCode::Down, Key::Down),
    (KeyCode::Left, Key::Left),
    (KeyCode::Right, Key::Right),
    (KeyCode::Escape, Key::Escape),
    (KeyCode::Enter, Key::Enter),
    (KeyCode::KpEnter, Key::Enter),
    (KeyCode::F11, Key::F11),
];

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    assets_dir: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as the frame limiter allows.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Directory holding `manifest.toml` and the images it names.
    #[must_use]
    pub fn with_assets_dir(mut self, assets_dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = assets_dir.into();
        self
    }
}

/// Audio sink used while macroquad's audio feature is disabled.
///
/// Cues are only traced; the looping power-up track is tracked so its
/// start and stop can be observed.
#[derive(Clone, Debug, Default)]
pub struct SilentAudio {
    looping: bool,
}

impl SilentAudio {
    /// Creates a sink with no loop running.
    #[must_use]
    pub const fn new() -> Self {
        Self { looping: false }
    }

    /// Reports whether the power-up loop would currently be playing.
    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.looping
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::PowerUpLoopStart => self.looping = true,
            SoundCue::PowerUpLoopStop => self.looping = false,
            _ => {}
        }
        trace!(cue = cue.name(), looping = self.looping, "sound cue");
    }
}

/// Time spent in each phase of a frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / frames.max(1),
            avg_render: self.render_accum / frames.max(1),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

/// Sleeps away whatever is left of a frame's time slice.
#[derive(Clone, Copy, Debug)]
struct FrameLimiter {
    period: Duration,
}

impl FrameLimiter {
    fn new(frames_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / frames_per_second.max(1),
        }
    }

    /// Time left in the slice after `elapsed` has been spent on the frame.
    fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.period.checked_sub(elapsed).filter(|rest| !rest.is_zero())
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            assets_dir,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
            fullscreen_toggle,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.surface.width().round() as i32,
            window_height: scene.surface.height().round() as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let manifest = load_sprites.then(|| SpriteAtlas::manifest_path(&assets_dir));
            let painter = EntityPainter::select(manifest.as_deref());

            let letterbox = to_macroquad_color(clear_color);
            let limiter = FrameLimiter::new(TARGET_FRAME_RATE);
            let mut fps_counter = FpsCounter::default();
            let mut fullscreen = false;
            prevent_quit();

            loop {
                let frame_start = Instant::now();
                let keys = poll_keys();
                if fullscreen_toggle && keys.contains(&Key::F11) {
                    fullscreen = !fullscreen;
                    macroquad::window::set_fullscreen(fullscreen);
                    info!(fullscreen, "toggled fullscreen");
                }

                macroquad::window::clear_background(letterbox);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before =
                    SceneMetrics::from_surface(&scene.surface, screen_width, screen_height);
                let frame_input = gather_frame_input(&scene, &metrics_before, &keys);
                let cursor = frame_input.cursor;

                let update_start = Instant::now();
                let outcome = update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();
                if outcome == FrameOutcome::Exit {
                    info!("closing window");
                    break;
                }

                let metrics = SceneMetrics::from_surface(&scene.surface, screen_width, screen_height);
                let render_start = Instant::now();
                let clock_ms = (macroquad::time::get_time() * 1_000.0) as f32;
                screens::draw_screen(&scene, &metrics, &painter, cursor, clock_ms);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                if let Some(rest) = limiter.remaining(frame_start.elapsed()) {
                    thread::sleep(rest);
                }
                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping from the virtual surface to window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    virtual_width: f32,
    virtual_height: f32,
}

impl SceneMetrics {
    /// Fits the surface into the window preserving its aspect ratio and
    /// centring it between letterbox bars.
    fn from_surface(surface: &VirtualSurface, screen_width: f32, screen_height: f32) -> Self {
        let virtual_width = surface.width();
        let virtual_height = surface.height();
        let scale = (screen_width / virtual_width)
            .min(screen_height / virtual_height)
            .max(0.0);
        let offset_x = (screen_width - virtual_width * scale) * 0.5;
        let offset_y = (screen_height - virtual_height * scale) * 0.5;
        Self {
            scale,
            offset_x,
            offset_y,
            virtual_width,
            virtual_height,
        }
    }

    const fn scale(&self) -> f32 {
        self.scale
    }

    const fn virtual_width(&self) -> f32 {
        self.virtual_width
    }

    fn surface_size(&self) -> Vec2 {
        Vec2::new(self.virtual_width, self.virtual_height) * self.scale
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    /// Window position mapped onto the surface; `None` over the letterbox
    /// bars or while the window has no area.
    fn to_virtual(&self, point: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let mapped = Vec2::new(
            (point.x - self.offset_x) / self.scale,
            (point.y - self.offset_y) / self.scale,
        );
        let inside = mapped.x >= 0.0
            && mapped.y >= 0.0
            && mapped.x < self.virtual_width
            && mapped.y < self.virtual_height;
        inside.then_some(mapped)
    }

    fn font_size(&self, virtual_size: f32) -> u16 {
        (virtual_size * self.scale).round().clamp(1.0, f32::from(u16::MAX)) as u16
    }
}

fn poll_keys() -> Vec<Key> {
    let mut keys: Vec<Key> = KEY_BINDINGS
        .iter()
        .filter(|(code, _)| is_key_pressed(*code))
        .map(|(_, key)| *key)
        .collect();
    if let Some(code) = get_last_key_pressed() {
        if KEY_BINDINGS.iter().all(|(bound, _)| *bound != code) {
            keys.push(Key::Other);
        }
    }
    keys
}

fn gather_frame_input(scene: &Scene, metrics: &SceneMetrics, keys: &[Key]) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    gather_frame_input_from_observations(
        scene,
        metrics,
        keys,
        Vec2::new(cursor_x, cursor_y),
        is_mouse_button_pressed(MouseButton::Left),
        is_quit_requested(),
    )
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    keys: &[Key],
    cursor_position: Vec2,
    clicked: bool,
    quit_requested: bool,
) -> FrameInput {
    let cursor = metrics.to_virtual(cursor_position);
    let mut events = Vec::with_capacity(keys.len() + 2);
    if quit_requested {
        events.push(InputEvent::QuitRequested);
    }
    events.extend(keys.iter().map(|key| InputEvent::KeyPressed(*key)));
    if clicked {
        let button = cursor.and_then(|point| scene.surface.button_at(scene.screen, point));
        events.push(InputEvent::Click { button });
    }
    FrameInput { events, cursor }
}

fn to_macroquad_color(color: snake_arcade_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::{ButtonAction, GridSize, Screen};
    use snake_arcade_rendering::layout::CELL_SIZE;

    fn menu_scene() -> Scene {
        Scene::new(VirtualSurface::new(GridSize::new(27, 20), CELL_SIZE).expect("valid surface"))
    }

    #[test]
    fn wide_window_gets_pillarboxed() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 1620.0, 600.0);
        assert_eq!(metrics.scale(), 1.0);
        assert_eq!(metrics.to_screen(Vec2::ZERO), Vec2::new(405.0, 0.0));
        assert_eq!(metrics.surface_size(), Vec2::new(810.0, 600.0));
    }

    #[test]
    fn cursor_maps_back_to_virtual_space() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 1620.0, 1600.0);
        assert_eq!(metrics.scale(), 2.0);
        assert_eq!(metrics.to_virtual(Vec2::new(0.0, 200.0 + 20.0)), Some(Vec2::new(0.0, 10.0)));
        assert_eq!(metrics.to_virtual(Vec2::new(10.0, 100.0)), None);
        assert_eq!(metrics.to_virtual(Vec2::new(1620.0, 500.0)), None);
    }

    #[test]
    fn zero_sized_window_maps_nothing() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 0.0, 0.0);
        assert_eq!(metrics.to_virtual(Vec2::ZERO), None);
    }

    #[test]
    fn click_resolves_button_through_letterbox() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 1620.0, 600.0);
        let over_new_game = metrics.to_screen(Vec2::new(405.0, 275.0));

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            &[],
            over_new_game,
            true,
            false,
        );
        assert_eq!(
            input.events,
            vec![InputEvent::Click {
                button: Some(ButtonAction::NewGame)
            }]
        );
        assert_eq!(input.cursor, Some(Vec2::new(405.0, 275.0)));
    }

    #[test]
    fn click_on_letterbox_hits_no_button() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 1620.0, 600.0);
        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            &[],
            Vec2::new(20.0, 275.0),
            true,
            false,
        );
        assert_eq!(input.cursor, None);
        assert_eq!(input.events, vec![InputEvent::Click { button: None }]);
    }

    #[test]
    fn buttons_only_resolve_on_screens_that_show_them() {
        let mut scene = menu_scene();
        scene.screen = Screen::Playing;
        let metrics = SceneMetrics::from_surface(&scene.surface, 810.0, 600.0);
        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            &[],
            Vec2::new(405.0, 275.0),
            true,
            false,
        );
        assert_eq!(input.events, vec![InputEvent::Click { button: None }]);
    }

    #[test]
    fn quit_request_precedes_keys() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 810.0, 600.0);
        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            &[Key::Up, Key::Other],
            Vec2::new(-5.0, -5.0),
            false,
            true,
        );
        assert_eq!(
            input.events,
            vec![
                InputEvent::QuitRequested,
                InputEvent::KeyPressed(Key::Up),
                InputEvent::KeyPressed(Key::Other),
            ]
        );
    }

    #[test]
    fn font_size_follows_scale() {
        let scene = menu_scene();
        let metrics = SceneMetrics::from_surface(&scene.surface, 405.0, 300.0);
        assert_eq!(metrics.font_size(72.0), 36);
        assert_eq!(metrics.font_size(0.1), 1);
    }

    #[test]
    fn frame_limiter_sleeps_only_when_ahead() {
        let limiter = FrameLimiter::new(60);
        let rest = limiter
            .remaining(Duration::from_millis(10))
            .expect("time left in slice");
        assert!(rest > Duration::from_millis(6) && rest < Duration::from_millis(7));
        assert_eq!(limiter.remaining(Duration::from_millis(20)), None);
    }

    #[test]
    fn silent_audio_tracks_power_up_loop() {
        let mut audio = SilentAudio::new();
        audio.play(SoundCue::Eat);
        assert!(!audio.is_looping());
        audio.play(SoundCue::PowerUpLoopStart);
        assert!(audio.is_looping());
        audio.play(SoundCue::PowerUpLoopStop);
        assert!(!audio.is_looping());
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            update: Duration::from_millis(2),
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert_eq!(metrics.avg_update, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::ZERO);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(frame(200));
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                    assert!((metrics.trailing_ten_seconds - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(frame(100));
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }
}
