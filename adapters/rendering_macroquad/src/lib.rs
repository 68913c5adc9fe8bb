#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Herbivore.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the adapter depends on macroquad without its default `audio` feature.
//! Sound cues are handled by the host.
//!
//! Buttons are drawn with Macroquad's immediate-mode UI. All UI-specific calls
//! live inside the local `ui` module.

mod ui;

use self::ui::{draw_panel_ui, PanelButtons, PanelUiContext, PanelUiResult};
use anyhow::Result;
use glam::Vec2;
use herbivore_core::Guess;
use herbivore_rendering::{
    Color, DotPresentation, FrameInput, Presentation, RenderingBackend, Scene,
    TestOverlay, SHADOW_COLOR,
};
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode,
        MouseButton,
    },
};
use std::{
    collections::VecDeque,
    f32::consts::TAU,
    time::{Duration, Instant},
};

const WINDOW_WIDTH: i32 = 800;
const WINDOW_HEIGHT: i32 = 600;
const SHADOW_OFFSET: Vec2 = Vec2::new(0.0, 5.0);
const HUD_FONT_SIZE: f32 = 28.0;
const PANEL_SIZE: Vec2 = Vec2::new(300.0, 56.0);
const PANEL_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.0);
const MASK_COLOR: Color = Color::new(0.35, 0.3, 0.28, 1.0);
const FLASH_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PanelInputState {
    guess_latched: Option<Guess>,
    restart_latched: bool,
    start_latched: bool,
}

impl PanelInputState {
    /// Returns the latched guess, clearing it so the verdict is submitted once.
    pub fn take_guess(&mut self) -> Option<Guess> {
        self.guess_latched.take()
    }

    /// Records that a guess button was pressed this frame.
    pub fn register_guess(&mut self, guess: Guess) {
        self.guess_latched = Some(guess);
    }

    /// Returns whether the restart button was pressed and clears the latch.
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_latched)
    }

    /// Records that the restart button was pressed this frame.
    pub fn register_restart(&mut self) {
        self.restart_latched = true;
    }

    /// Returns whether the play button was pressed and clears the latch.
    pub fn take_start(&mut self) -> bool {
        std::mem::take(&mut self.start_latched)
    }

    /// Records that the play button was pressed this frame.
    pub fn register_start(&mut self) {
        self.start_latched = true;
    }

    fn register(&mut self, result: PanelUiResult) {
        if let Some(guess) = result.guess {
            self.register_guess(guess);
        }
        if result.restart {
            self.register_restart();
        }
        if result.start {
            self.register_start();
        }
    }
}

/// Snapshot of the keyboard observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        }
    }

    fn movement(self) -> Vec2 {
        let axis = |negative: bool, positive: bool| match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
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

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

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
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
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
        let avg_update = self.update_accum / frames.max(1);
        let avg_render = self.render_accum / frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update,
            avg_render,
        })
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
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut panel_input = PanelInputState::default();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    keyboard.movement(),
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    panel_rect(&scene, screen),
                    &mut panel_input,
                );

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                let metrics = SceneMetrics::new(scene.camera.position, screen);
                for member in &scene.members {
                    draw_dot(member, &metrics);
                }
                draw_dot(&scene.player, &metrics);
                draw_hud(&scene);

                let layout = OverlayLayout::new(screen);
                if let Some(overlay) = &scene.overlay {
                    draw_overlay(overlay, &layout);
                }
                if let Some(lines) = banner_lines(&scene) {
                    draw_banner(&lines, screen);
                }

                if let Some(buttons) = panel_buttons(&scene) {
                    let origin = layout.panel_origin(&scene);
                    let mut panel_ui = macroquad::ui::root_ui();
                    let result = draw_panel_ui(
                        &mut panel_ui,
                        PanelUiContext {
                            origin: MacroquadVec2::new(origin.x, origin.y),
                            size: MacroquadVec2::new(PANEL_SIZE.x, PANEL_SIZE.y),
                            background: to_macroquad_color(PANEL_BACKGROUND),
                            buttons,
                        },
                    );
                    panel_input.register(result);
                }
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

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScreenRect {
    origin: Vec2,
    size: Vec2,
}

impl ScreenRect {
    fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }
}

/// Maps world positions to screen space around the camera.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    camera: Vec2,
    half_screen: Vec2,
}

impl SceneMetrics {
    fn new(camera: Vec2, screen: Vec2) -> Self {
        Self {
            camera,
            half_screen: screen * 0.5,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.camera + self.half_screen
    }
}

/// Screen placement of the minigame face and its controls.
#[derive(Clone, Copy, Debug)]
struct OverlayLayout {
    screen: Vec2,
    face: ScreenRect,
}

impl OverlayLayout {
    fn new(screen: Vec2) -> Self {
        let side = screen.x.min(screen.y) * 0.55;
        let face = ScreenRect {
            origin: Vec2::new((screen.x - side) * 0.5, screen.y * 0.12),
            size: Vec2::splat(side),
        };
        Self { screen, face }
    }

    fn panel_origin(&self, scene: &Scene) -> Vec2 {
        let x = (self.screen.x - PANEL_SIZE.x) * 0.5;
        if scene.overlay.is_some() {
            Vec2::new(x, self.face.origin.y + self.face.size.y + 16.0)
        } else {
            Vec2::new(x, self.screen.y * 0.65)
        }
    }

    /// Screen rectangle covered by mask segment `index`.
    fn segment(&self, columns: u32, rows: u32, index: usize) -> Option<ScreenRect> {
        if columns == 0 || rows == 0 || index >= columns as usize * rows as usize {
            return None;
        }
        let column = (index % columns as usize) as f32;
        let row = (index / columns as usize) as f32;
        let cell = Vec2::new(
            self.face.size.x / columns as f32,
            self.face.size.y / rows as f32,
        );
        Some(ScreenRect {
            origin: self.face.origin + Vec2::new(column * cell.x, row * cell.y),
            size: cell,
        })
    }
}

fn panel_buttons(scene: &Scene) -> Option<PanelButtons> {
    if scene.end_panel.is_some() {
        return Some(PanelButtons::Restart);
    }
    if scene.intro.is_some() {
        return Some(PanelButtons::Play);
    }
    match &scene.overlay {
        Some(overlay) if !overlay.buttons.is_empty() => {
            Some(PanelButtons::Guesses(overlay.buttons.clone()))
        }
        _ => None,
    }
}

fn panel_rect(scene: &Scene, screen: Vec2) -> Option<ScreenRect> {
    panel_buttons(scene).map(|_| ScreenRect {
        origin: OverlayLayout::new(screen).panel_origin(scene),
        size: PANEL_SIZE,
    })
}

/// Builds the frame input. Clicks landing on the button panel belong to the
/// UI and never count as a primary click.
fn gather_frame_input_from_observations(
    movement: Vec2,
    cursor_position: Vec2,
    left_click: bool,
    panel: Option<ScreenRect>,
    panel_input: &mut PanelInputState,
) -> FrameInput {
    let over_panel = panel.is_some_and(|rect| rect.contains(cursor_position));

    FrameInput {
        movement,
        primary_click: left_click && !over_panel,
        guess: panel_input.take_guess(),
        restart: panel_input.take_restart(),
        start: panel_input.take_start(),
    }
}

fn draw_ellipse(center: Vec2, radii: Vec2, color: macroquad::color::Color) {
    const SEGMENTS: usize = 24;
    let point = |step: usize| {
        let angle = step as f32 / SEGMENTS as f32 * TAU;
        let offset = Vec2::new(angle.cos() * radii.x, angle.sin() * radii.y);
        to_macroquad_vec(center + offset)
    };
    for step in 0..SEGMENTS {
        macroquad::shapes::draw_triangle(to_macroquad_vec(center), point(step), point(step + 1), color);
    }
}

fn draw_dot(dot: &DotPresentation, metrics: &SceneMetrics) {
    let center = metrics.to_screen(dot.position);
    let shadow = center + SHADOW_OFFSET;
    draw_ellipse(
        shadow,
        Vec2::new(dot.shadow_radius * 0.5, dot.shadow_radius * 0.25),
        to_macroquad_color(SHADOW_COLOR),
    );

    macroquad::shapes::draw_circle(center.x, center.y, dot.radius, to_macroquad_color(dot.color));
    let nose = center + Vec2::from_angle(dot.facing) * dot.radius;
    macroquad::shapes::draw_line(center.x, center.y, nose.x, nose.y, 2.0, BLACK);
}

fn draw_hud(scene: &Scene) {
    macroquad::text::draw_text(&scene.hud.pack_label, 16.0, 32.0, HUD_FONT_SIZE, WHITE);
    macroquad::text::draw_text(&scene.hud.score_label, 16.0, 60.0, HUD_FONT_SIZE, WHITE);
}

/// Points along the mouth curve. Friendly faces smile.
fn mouth_points(center: Vec2, width: f32, friendly: bool) -> Vec<Vec2> {
    const STEPS: usize = 8;
    let curve = if friendly { width * 0.25 } else { -width * 0.25 };
    (0..=STEPS)
        .map(|step| {
            let t = step as f32 / STEPS as f32 * 2.0 - 1.0;
            Vec2::new(center.x + t * width * 0.5, center.y + curve * (1.0 - t * t))
        })
        .collect()
}

fn draw_face(overlay: &TestOverlay, face: ScreenRect) {
    let center = face.origin + face.size * 0.5;
    let radius = face.size.x * 0.45;
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        radius,
        to_macroquad_color(overlay.skin_tone),
    );

    let eye_offset = Vec2::new(radius * 0.35, -radius * 0.25);
    for eye in [
        center + eye_offset,
        center + Vec2::new(-eye_offset.x, eye_offset.y),
    ] {
        macroquad::shapes::draw_circle(eye.x, eye.y, radius * 0.08, BLACK);
    }

    let mouth = mouth_points(center + Vec2::new(0.0, radius * 0.35), radius, overlay.friendly);
    for pair in mouth.windows(2) {
        macroquad::shapes::draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, 4.0, BLACK);
    }
}

fn draw_overlay(overlay: &TestOverlay, layout: &OverlayLayout) {
    draw_face(overlay, layout.face);

    for segment in &overlay.segments {
        let Some(rect) = layout.segment(overlay.columns, overlay.rows, segment.index) else {
            continue;
        };
        let color = if segment.flashing {
            FLASH_COLOR
        } else {
            MASK_COLOR
        };
        macroquad::shapes::draw_rectangle(
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
            to_macroquad_color(color),
        );
    }

    let label_y = layout.face.origin.y - 12.0;
    draw_centered_text(&overlay.click_label, layout.screen.x * 0.5, label_y, HUD_FONT_SIZE);
}

fn draw_centered_text(text: &str, center_x: f32, baseline: f32, font_size: f32) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    macroquad::text::draw_text(
        text,
        center_x - dimensions.width * 0.5,
        baseline,
        font_size,
        WHITE,
    );
}

/// Headline followed by body lines for the end panel or the intro.
fn banner_lines(scene: &Scene) -> Option<Vec<&str>> {
    let (title, body) = match (&scene.end_panel, &scene.intro) {
        (Some(panel), _) => (panel.title.as_str(), panel.flavor.as_str()),
        (None, Some(intro)) => ("HERBIVORE", intro.as_str()),
        (None, None) => return None,
    };
    Some(std::iter::once(title).chain(body.lines()).collect())
}

fn draw_banner(lines: &[&str], screen: Vec2) {
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        screen.x,
        screen.y,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.6),
    );
    let center_x = screen.x * 0.5;
    let mut baseline = screen.y * 0.3;
    for (index, line) in lines.iter().enumerate() {
        let font_size = if index == 0 { 48.0 } else { 24.0 };
        draw_centered_text(line, center_x, baseline, font_size);
        baseline += if index == 0 { 40.0 } else { 30.0 };
    }
}

fn to_macroquad_vec(vector: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vector.x, vector.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herbivore_rendering::{
        Camera, EndPanel, GuessButton, SegmentPresentation, PLAYER_COLOR, SKIN_TONES,
    };

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn base_scene() -> Scene {
        let camera = Camera::new(Vec2::new(400.0, 300.0), Camera::DEFAULT_SMOOTH_SPEED)
            .expect("valid smoothing");
        let player = DotPresentation::new(Vec2::new(400.0, 300.0), 8.0, 30.0, PLAYER_COLOR, 0.0);
        Scene::new(camera, player)
    }

    fn overlay(buttons: Vec<GuessButton>) -> TestOverlay {
        TestOverlay {
            friendly: true,
            skin_tone: SKIN_TONES[0],
            columns: 8,
            rows: 8,
            segments: vec![SegmentPresentation {
                index: 0,
                flashing: false,
            }],
            click_label: "Clicks: 10/10".to_owned(),
            buttons,
        }
    }

    #[test]
    fn camera_centre_maps_to_screen_centre() {
        let metrics = SceneMetrics::new(Vec2::new(1000.0, -50.0), SCREEN);

        assert_eq!(metrics.to_screen(Vec2::new(1000.0, -50.0)), SCREEN * 0.5);
        assert_eq!(
            metrics.to_screen(Vec2::new(1010.0, -40.0)),
            Vec2::new(410.0, 310.0)
        );
    }

    #[test]
    fn movement_cancels_opposing_keys() {
        let keyboard = KeyboardState {
            left: true,
            right: true,
            down: true,
            ..KeyboardState::default()
        };

        assert_eq!(keyboard.movement(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn clicks_on_the_button_panel_are_not_primary_clicks() {
        let mut scene = base_scene();
        scene.overlay = Some(overlay(vec![
            GuessButton {
                guess: Guess::Friend,
                feedback: None,
            },
            GuessButton {
                guess: Guess::Foe,
                feedback: None,
            },
        ]));
        let panel = panel_rect(&scene, SCREEN).expect("guess buttons shown");
        let mut latch = PanelInputState::default();

        let on_panel = gather_frame_input_from_observations(
            Vec2::ZERO,
            panel.origin + Vec2::splat(4.0),
            true,
            Some(panel),
            &mut latch,
        );
        assert!(!on_panel.primary_click);

        let on_mask = gather_frame_input_from_observations(
            Vec2::ZERO,
            Vec2::new(400.0, 150.0),
            true,
            Some(panel),
            &mut latch,
        );
        assert!(on_mask.primary_click);
    }

    #[test]
    fn latched_buttons_fire_once() {
        let mut latch = PanelInputState::default();
        latch.register(PanelUiResult {
            guess: Some(Guess::Foe),
            restart: false,
            start: true,
        });

        let first =
            gather_frame_input_from_observations(Vec2::ZERO, Vec2::ZERO, false, None, &mut latch);
        let second =
            gather_frame_input_from_observations(Vec2::ZERO, Vec2::ZERO, false, None, &mut latch);

        assert_eq!(first.guess, Some(Guess::Foe));
        assert!(first.start);
        assert_eq!(second, FrameInput::default());
    }

    #[test]
    fn panel_prefers_end_panel_over_overlay() {
        let mut scene = base_scene();
        assert!(panel_buttons(&scene).is_none());

        scene.overlay = Some(overlay(Vec::new()));
        assert!(panel_buttons(&scene).is_none());

        scene.intro = Some("intro".to_owned());
        assert_eq!(panel_buttons(&scene), Some(PanelButtons::Play));

        scene.end_panel = Some(EndPanel::victory());
        assert_eq!(panel_buttons(&scene), Some(PanelButtons::Restart));
    }

    #[test]
    fn segments_tile_the_face() {
        let layout = OverlayLayout::new(SCREEN);
        let first = layout.segment(8, 8, 0).expect("in range");
        let last = layout.segment(8, 8, 63).expect("in range");

        assert_eq!(first.origin, layout.face.origin);
        let far_corner = last.origin + last.size;
        let face_corner = layout.face.origin + layout.face.size;
        assert!((far_corner - face_corner).length() < 1e-3);
        assert!(layout.segment(8, 8, 64).is_none());
        assert!(layout.segment(0, 8, 0).is_none());
    }

    #[test]
    fn friendly_mouths_curve_downwards_in_screen_space() {
        let smile = mouth_points(Vec2::ZERO, 100.0, true);
        let frown = mouth_points(Vec2::ZERO, 100.0, false);

        assert!(smile[4].y > smile[0].y);
        assert!(frown[4].y < frown[0].y);
        assert_eq!(smile.first().map(|p| p.x), Some(-50.0));
        assert_eq!(smile.last().map(|p| p.x), Some(50.0));
    }

    #[test]
    fn banner_shows_the_end_panel_before_the_intro() {
        let mut scene = base_scene();
        assert!(banner_lines(&scene).is_none());

        scene.intro = Some("Find your pack.".to_owned());
        assert_eq!(
            banner_lines(&scene),
            Some(vec!["HERBIVORE", "Find your pack."])
        );

        scene.end_panel = Some(EndPanel::defeat());
        let lines = banner_lines(&scene).expect("end panel shown");
        assert_eq!(lines[0], "YOU HAVE FAILED!");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn fps_counter_reports_after_one_second() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(250),
            ..FrameBreakdown::default()
        };

        for _ in 0..3 {
            assert!(counter.record_frame(frame).is_none());
        }
        let metrics = counter.record_frame(frame).expect("one second elapsed");
        assert!((metrics.per_second - 4.0).abs() < 1e-3);
    }
}
