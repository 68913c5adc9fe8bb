#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Herbivore adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use herbivore_core::Guess;
use std::{error::Error, fmt, time::Duration};

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

    /// Multiplies the color channels, leaving alpha untouched.
    #[must_use]
    pub fn modulate(self, factor: f32) -> Self {
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }
}

/// Skin tones a face may be drawn with.
pub const SKIN_TONES: [Color; 3] = [
    Color::new(1.0, 1.0, 1.0, 1.0),
    Color::new(1.0, 0.82, 0.68, 1.0),
    Color::new(0.87, 0.67, 0.49, 1.0),
];

/// Color of the player and recruited members.
pub const PLAYER_COLOR: Color = Color::new(0.2, 0.6, 1.0, 1.0);

/// Color of members that still belong to an NPC pack.
pub const STRANGER_COLOR: Color = Color::from_rgb_u8(0xc8, 0x8a, 0x4a);

/// Factor applied to members of tested packs.
pub const TESTED_MODULATE: f32 = 0.25;

/// Shadow drawn under every dot.
pub const SHADOW_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.5);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Summed directional input; normalised by the world.
    pub movement: Vec2,
    /// Whether the primary mouse button was pressed on this frame.
    pub primary_click: bool,
    /// Guess button pressed on this frame.
    pub guess: Option<Guess>,
    /// Whether the restart button was pressed on this frame.
    pub restart: bool,
    /// Whether the intro play button was pressed on this frame.
    pub start: bool,
}

/// Filled circle with a soft shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotPresentation {
    /// World position of the centre.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Radius of the shadow drawn slightly below the dot.
    pub shadow_radius: f32,
    /// Fill color.
    pub color: Color,
    /// Facing angle in radians.
    pub facing: f32,
}

impl DotPresentation {
    /// Creates a new dot descriptor.
    #[must_use]
    pub const fn new(
        position: Vec2,
        radius: f32,
        shadow_radius: f32,
        color: Color,
        facing: f32,
    ) -> Self {
        Self {
            position,
            radius,
            shadow_radius,
            color,
            facing,
        }
    }
}

/// Labels drawn in the corner of the screen.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Player pack size label.
    pub pack_label: String,
    /// Score label.
    pub score_label: String,
}

/// Guess button as drawn on the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessButton {
    /// Guess submitted when pressed.
    pub guess: Guess,
    /// Correct/incorrect tint once this guess was submitted.
    pub feedback: Option<bool>,
}

/// Mask segment still covering the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentPresentation {
    /// Row-major index within the grid.
    pub index: usize,
    /// Whether the segment is flashing before disappearing.
    pub flashing: bool,
}

/// Minigame overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct TestOverlay {
    /// Whether the hidden face smiles.
    pub friendly: bool,
    /// Skin tone of the face.
    pub skin_tone: Color,
    /// Mask columns.
    pub columns: u32,
    /// Mask rows.
    pub rows: u32,
    /// Segments still drawn.
    pub segments: Vec<SegmentPresentation>,
    /// Click counter text.
    pub click_label: String,
    /// Guess buttons currently visible.
    pub buttons: Vec<GuessButton>,
}

/// Title and flavour text shown when the game ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndPanel {
    /// Headline.
    pub title: String,
    /// Flavour text, possibly spanning several lines.
    pub flavor: String,
}

impl EndPanel {
    /// Panel shown after losing.
    #[must_use]
    pub fn defeat() -> Self {
        Self {
            title: "YOU HAVE FAILED!".to_owned(),
            flavor: "You roam the desert alone\nwondering what it might have\nfelt like having friends...."
                .to_owned(),
        }
    }

    /// Panel shown after winning.
    #[must_use]
    pub fn victory() -> Self {
        Self {
            title: "YOU WIN!".to_owned(),
            flavor: "Your pack roams the desert\ntogether, safe and happy.\nTrue friendship prevails!"
                .to_owned(),
        }
    }
}

/// Camera that eases towards its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Current centre of the view.
    pub position: Vec2,
    smooth_speed: f32,
}

impl Camera {
    /// Smoothing used by the stock camera.
    pub const DEFAULT_SMOOTH_SPEED: f32 = 5.0;

    /// Creates a camera centred on `position`.
    ///
    /// Returns an error when `smooth_speed` is negative or not finite.
    pub fn new(position: Vec2, smooth_speed: f32) -> std::result::Result<Self, RenderingError> {
        if !smooth_speed.is_finite() || smooth_speed < 0.0 {
            return Err(RenderingError::InvalidSmoothSpeed { smooth_speed });
        }

        Ok(Self {
            position,
            smooth_speed,
        })
    }

    /// Eases towards `target` over `dt`. Never overshoots.
    pub fn follow(&mut self, target: Vec2, dt: Duration) {
        let blend = (self.smooth_speed * dt.as_secs_f32()).min(1.0);
        self.position += (target - self.position) * blend;
    }

    /// Snaps to `target`.
    pub fn snap(&mut self, target: Vec2) {
        self.position = target;
    }
}

/// Scene description combining the world, the HUD and the overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Camera centred on the player.
    pub camera: Camera,
    /// Player dot.
    pub player: DotPresentation,
    /// Every pack member, recruited or not.
    pub members: Vec<DotPresentation>,
    /// Corner labels.
    pub hud: HudPresentation,
    /// Minigame overlay while a test runs.
    pub overlay: Option<TestOverlay>,
    /// End panel once the game is over or won.
    pub end_panel: Option<EndPanel>,
    /// Intro banner shown before the first traversal.
    pub intro: Option<String>,
}

impl Scene {
    /// Creates an empty scene centred on the player.
    #[must_use]
    pub fn new(camera: Camera, player: DotPresentation) -> Self {
        Self {
            camera,
            player,
            members: Vec::new(),
            hud: HudPresentation::default(),
            overlay: None,
            end_panel: None,
            intro: None,
        }
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
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Herbivore scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Camera smoothing must be a non-negative finite number.
    InvalidSmoothSpeed {
        /// Provided smoothing that failed validation.
        smooth_speed: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSmoothSpeed { smooth_speed } => {
                write!(
                    f,
                    "smooth_speed must be finite and non-negative (received {smooth_speed})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
