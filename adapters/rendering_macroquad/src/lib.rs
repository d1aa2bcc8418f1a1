#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Duskfall.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default
//! `audio` feature. Sound cues stay events; nothing here plays them.
//!
//! Walls and sprites are drawn as flat shaded rectangles in the painter
//! order the scene already carries.

mod hud;

use anyhow::Result;
use duskfall_rendering::{
    sprite_color, wall_color, Color, FrameInput, Presentation, RenderingBackend, Scene, SceneDraw,
    SceneSprite, WallColumn,
};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const FOG_PER_UNIT: f32 = 0.045;
const MAX_FOG: f32 = 0.85;
const SIDE_SHADE: f32 = 0.3;

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

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Keys sampled once per frame.
fn poll_frame_input() -> FrameInput {
    FrameInput {
        forward: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        backward: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        strafe_left: is_key_down(KeyCode::A),
        strafe_right: is_key_down(KeyCode::D),
        turn_left: is_key_down(KeyCode::Left),
        turn_right: is_key_down(KeyCode::Right),
        fire: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::LeftControl),
        switch_weapon: is_key_pressed(KeyCode::E) || is_key_pressed(KeyCode::Tab),
        restart: is_key_pressed(KeyCode::R),
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
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
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.width.round() as i32,
            window_height: scene.height.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let ceiling = to_macroquad_color(clear_color);
            let floor = to_macroquad_color(clear_color.darken(0.4));
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = poll_frame_input();

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let scale = Vec2::new(screen_width / scene.width, screen_height / scene.height);

                macroquad::window::clear_background(ceiling);
                macroquad::shapes::draw_rectangle(
                    0.0,
                    screen_height * 0.5,
                    screen_width,
                    screen_height * 0.5,
                    floor,
                );
                for draw in &scene.draws {
                    match draw {
                        SceneDraw::Wall(column) => draw_wall(column, scene.height, scale),
                        SceneDraw::Sprite(sprite) => draw_sprite(sprite, scale),
                    }
                }
                hud::draw_hud(&scene.hud, screen_width, screen_height);
                let render = render_start.elapsed();

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn wall_fill(column: &WallColumn) -> Color {
    let mut color = wall_color(column.wall);
    if column.shaded {
        color = color.darken(SIDE_SHADE);
    }
    // Thin seam at each texture edge.
    if column.texture_offset < 0.03 || column.texture_offset > 0.97 {
        color = color.darken(0.25);
    }
    color.darken((column.depth * FOG_PER_UNIT).min(MAX_FOG))
}

fn draw_wall(column: &WallColumn, scene_height: f32, scale: Vec2) {
    let top = column.top(scene_height);
    macroquad::shapes::draw_rectangle(
        column.left * scale.x,
        top * scale.y,
        column.width * scale.x,
        column.height * scale.y,
        to_macroquad_color(wall_fill(column)),
    );
}

fn sprite_fill(sprite: &SceneSprite) -> Color {
    sprite_color(sprite.image)
        .lighten(sprite.frame as f32 * 0.08)
        .darken((sprite.depth * FOG_PER_UNIT).min(MAX_FOG))
}

fn draw_sprite(sprite: &SceneSprite, scale: Vec2) {
    macroquad::shapes::draw_rectangle(
        sprite.origin.x * scale.x,
        sprite.origin.y * scale.y,
        sprite.size.x * scale.x,
        sprite.size.y * scale.y,
        to_macroquad_color(sprite_fill(sprite)),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use duskfall_core::WallId;

    use super::*;

    fn column(depth: f32, shaded: bool) -> WallColumn {
        WallColumn {
            left: 0.0,
            width: 2.0,
            height: 100.0,
            depth,
            wall: WallId::new(2).expect("non-zero id"),
            texture_offset: 0.5,
            shaded,
        }
    }

    #[test]
    fn distant_and_side_walls_are_darker() {
        let near = wall_fill(&column(1.0, false));
        let far = wall_fill(&column(10.0, false));
        let side = wall_fill(&column(1.0, true));

        assert!(far.red < near.red);
        assert!(side.red < near.red);
    }

    #[test]
    fn fog_never_blacks_out_a_wall() {
        let far = wall_fill(&column(1_000.0, false));

        assert!(far.red > 0.0);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
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
