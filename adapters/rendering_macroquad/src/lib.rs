#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Scrap Station.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Sprites are drawn from primitives so the adapter ships without assets.
//! Every scene coordinate is expressed in the logical viewport and scaled to
//! the window each frame.

mod sprites;

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use scrap_station_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use std::time::{Duration, Instant};

use self::sprites::SpriteCanvas;

/// Snapshot of edge-triggered keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// Gameplay keys forwarded to the simulation.
    input: FrameInput,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let input = FrameInput {
            up: is_key_pressed(KeyCode::W),
            down: is_key_pressed(KeyCode::S),
            left: is_key_pressed(KeyCode::A),
            right: is_key_pressed(KeyCode::D),
            build: [
                is_key_pressed(KeyCode::Key1),
                is_key_pressed(KeyCode::Key2),
                is_key_pressed(KeyCode::Key3),
                is_key_pressed(KeyCode::Key4),
            ],
            start_wave: is_key_pressed(KeyCode::Space),
            restart: is_key_pressed(KeyCode::R),
        };

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            input,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
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
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Cost of one pass through the game loop.
#[derive(Clone, Copy, Debug, Default)]
struct FrameSample {
    /// Wall time since the previous frame.
    frame: Duration,
    /// Time spent stepping the station and rebuilding the scene.
    step: Duration,
    /// Time spent drawing the scene.
    draw: Duration,
    /// Sprites drawn this frame.
    sprites: usize,
}

/// One-second summary logged when `--show-fps` is on.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    step: Duration,
    draw: Duration,
    peak_sprites: usize,
}

/// Accumulates frame samples and summarises them once per second.
#[derive(Debug, Default)]
struct FrameStats {
    elapsed: Duration,
    frames: u32,
    step: Duration,
    draw: Duration,
    peak_sprites: usize,
}

impl FrameStats {
    fn record(&mut self, sample: FrameSample) -> Option<FrameReport> {
        self.elapsed += sample.frame;
        self.frames += 1;
        self.step += sample.step;
        self.draw += sample.draw;
        self.peak_sprites = self.peak_sprites.max(sample.sprites);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let stats = std::mem::take(self);
        Some(FrameReport {
            fps: stats.frames as f32 / stats.elapsed.as_secs_f32(),
            step: stats.step / stats.frames,
            draw: stats.draw / stats.frames,
            peak_sprites: stats.peak_sprites,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let (window_width, window_height) = presentation.window_size();
        let Presentation {
            window_title,
            clear_color,
            viewport,
            scene,
            ..
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let logical = Vec2::new(viewport.width(), viewport.height());

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut stats = FrameStats::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let step_start = Instant::now();
                update_scene(keyboard.input, &mut scene);
                let step = step_start.elapsed();

                let draw_start = Instant::now();
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_scene(&scene, SpriteCanvas::fit(logical, screen));
                let draw = draw_start.elapsed();

                let report = stats.record(FrameSample {
                    frame: frame_dt,
                    step,
                    draw,
                    sprites: scene.sprites.len(),
                });
                if let Some(report) = report.filter(|_| show_fps) {
                    tracing::info!(
                        fps = report.fps,
                        step_ms = report.step.as_secs_f64() * 1_000.0,
                        draw_ms = report.draw.as_secs_f64() * 1_000.0,
                        peak_sprites = report.peak_sprites,
                        "frame timing"
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene, canvas: SpriteCanvas) {
    for sprite in &scene.sprites {
        canvas.draw(sprite, scene.shake_offset);
    }

    for text in &scene.texts {
        let font_size = text.size * canvas.scale();
        let anchor = canvas.project(text.position);
        // Text is positioned by its top edge; macroquad anchors on the baseline.
        let _ = macroquad::text::draw_text(
            &text.text,
            anchor.x,
            anchor.y + font_size * 0.75,
            font_size,
            to_macroquad_color(text.color),
        );
    }
}

fn to_macroquad_color(color: scrap_station_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(millis: u64, sprites: usize) -> FrameSample {
        FrameSample {
            frame: Duration::from_millis(millis),
            step: Duration::from_millis(3),
            draw: Duration::from_millis(1),
            sprites,
        }
    }

    #[test]
    fn frame_stats_report_once_per_second() {
        let mut stats = FrameStats::default();
        for sprites in [4, 40, 12] {
            assert!(stats.record(sample(250, sprites)).is_none());
        }

        let report = stats
            .record(sample(250, 9))
            .expect("a full second was recorded");
        assert!((report.fps - 4.0).abs() <= 1e-3);
        assert_eq!(report.step, Duration::from_millis(3));
        assert_eq!(report.draw, Duration::from_millis(1));
        assert_eq!(report.peak_sprites, 40);
    }

    #[test]
    fn frame_stats_start_over_after_a_report() {
        let mut stats = FrameStats::default();
        let _ = stats.record(sample(1_000, 80)).expect("one slow frame fills a second");

        assert!(stats.record(sample(500, 6)).is_none());
        let report = stats.record(sample(500, 5)).expect("second report");
        assert!((report.fps - 2.0).abs() <= 1e-3);
        assert_eq!(report.peak_sprites, 6);
    }

    #[test]
    fn colours_convert_channel_by_channel() {
        let color = to_macroquad_color(scrap_station_rendering::Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 0.4));
    }
}
