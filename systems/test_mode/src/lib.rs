#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mask-shattering minigame played when the player approaches a pack.
//!
//! A session starts on [`Event::TestRequested`], spends its click budget
//! shattering random interior mask segments, accepts exactly one guess and
//! reports [`Event::TestCompleted`] once the reveal delay has elapsed.

pub mod mask;

use std::time::Duration;

use herbivore_core::{rng::GameRng, timers::TimerQueue, Event, Guess, PackId};
use thiserror::Error;
use tracing::{debug, info};

pub use mask::{MaskGrid, MaskSegment, SegmentState};

/// Number of skin tones a face may be drawn with.
pub const SKIN_TONE_COUNT: usize = 3;

/// Largest number of mask columns or rows.
pub const MAX_GRID_SIDE: u32 = 64;

/// Configuration parameters required to construct the minigame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Mask columns.
    pub columns: u32,
    /// Mask rows.
    pub rows: u32,
    /// Delay between the guess and the outcome.
    pub reveal_delay: Duration,
    /// How long a shattered segment flashes before disappearing.
    pub flash_duration: Duration,
    /// Seed for segment and skin tone draws.
    pub rng_seed: u64,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.columns > MAX_GRID_SIDE || self.rows > MAX_GRID_SIDE {
            return Err(ConfigError::OversizedGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            reveal_delay: Duration::from_millis(1500),
            flash_duration: Duration::from_millis(200),
            rng_seed: 0x6d61_736b,
        }
    }
}

/// Errors reported when validating a minigame configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The mask grid has no segments.
    #[error("mask grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured columns.
        columns: u32,
        /// Configured rows.
        rows: u32,
    },
    /// The mask grid is wider or taller than `MAX_GRID_SIDE`.
    #[error("mask grid may have at most {MAX_GRID_SIDE} columns and rows, got {columns}x{rows}")]
    OversizedGrid {
        /// Configured columns.
        columns: u32,
        /// Configured rows.
        rows: u32,
    },
}

/// Identifier of one minigame session, used as the timer owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Settle(usize),
    Reveal,
}

/// Feedback shown on the selected guess button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessFeedback {
    /// Button the player pressed.
    pub guess: Guess,
    /// Whether the guess matched the pack.
    pub correct: bool,
}

#[derive(Clone, Debug)]
struct Session {
    id: SessionId,
    pack: PackId,
    friendly: bool,
    skin_tone: usize,
    total_clicks: u32,
    remaining_clicks: u32,
    grid: MaskGrid,
    feedback: Option<GuessFeedback>,
}

/// Read-only view of the visible session.
#[derive(Clone, Copy, Debug)]
pub struct SessionView<'a> {
    /// Pack under test.
    pub pack: PackId,
    /// Whether the face underneath is friendly.
    pub friendly: bool,
    /// Index into the skin tone palette.
    pub skin_tone: usize,
    /// Click budget of the session.
    pub total_clicks: u32,
    /// Clicks left.
    pub remaining_clicks: u32,
    /// Whether the guess buttons are visible.
    pub guesses_unlocked: bool,
    /// Feedback once a guess has been made.
    pub feedback: Option<GuessFeedback>,
    /// Mask covering the face.
    pub grid: &'a MaskGrid,
}

impl SessionView<'_> {
    /// Text of the click counter.
    #[must_use]
    pub fn click_label(&self) -> String {
        format!("Clicks: {}/{}", self.remaining_clicks, self.total_clicks)
    }

    /// Whether the given guess button is drawn.
    #[must_use]
    pub fn shows_button(&self, guess: Guess) -> bool {
        match self.feedback {
            Some(feedback) => feedback.guess == guess,
            None => self.guesses_unlocked,
        }
    }
}

/// Minigame controller.
#[derive(Debug)]
pub struct TestMode {
    config: Config,
    rng: GameRng,
    session: Option<Session>,
    next_session: u64,
    timers: TimerQueue<SessionId, Pending>,
}

impl TestMode {
    /// Creates a hidden controller.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: GameRng::seeded(config.rng_seed),
            config,
            session: None,
            next_session: 0,
            timers: TimerQueue::new(),
        })
    }

    /// Consumes world and encounter events, appending minigame events to `out`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        for event in events {
            match event {
                Event::TestRequested {
                    pack,
                    friendly,
                    clicks,
                } => self.start(*pack, *friendly, *clicks, out),
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::GameStateChanged { state } if state.is_terminal() => self.end(),
                Event::GameReset => self.end(),
                _ => {}
            }
        }
    }

    /// Shows a fresh session for `pack`, replacing any visible one.
    ///
    /// The budget never exceeds the number of clickable segments.
    pub fn start(&mut self, pack: PackId, friendly: bool, clicks: u32, out: &mut Vec<Event>) {
        self.end();

        let id = SessionId(self.next_session);
        self.next_session = self.next_session.wrapping_add(1);
        let skin_tone = self.rng.index(SKIN_TONE_COUNT).unwrap_or(0);
        let grid = MaskGrid::new(self.config.columns, self.config.rows);

        let clickable = u32::try_from(grid.eligible().len()).unwrap_or(u32::MAX);
        if clicks > clickable {
            debug!(requested = clicks, clickable, "clamping click budget to the mask");
        }
        let clicks = clicks.min(clickable);

        info!(pack = pack.get(), clicks, "test started");
        self.session = Some(Session {
            id,
            pack,
            friendly,
            skin_tone,
            total_clicks: clicks,
            remaining_clicks: clicks,
            grid,
            feedback: None,
        });
        out.push(Event::TestStarted { pack, clicks });

        if clicks == 0 {
            out.push(Event::GuessesUnlocked);
        }
    }

    /// Handles a primary click. Returns `true` when a segment shattered.
    pub fn click(&mut self, out: &mut Vec<Event>) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!("ignoring click without a session");
            return false;
        };
        if session.remaining_clicks == 0 {
            return false;
        }

        let Some(index) = session.grid.shatter_random(&mut self.rng) else {
            debug!("no eligible segment left");
            return false;
        };
        session.remaining_clicks -= 1;
        let _ = self
            .timers
            .schedule(session.id, self.config.flash_duration, Pending::Settle(index));

        out.push(Event::SegmentShattered {
            index,
            remaining: session.remaining_clicks,
        });
        if session.remaining_clicks == 0 {
            out.push(Event::GuessesUnlocked);
        }
        true
    }

    /// Submits a guess. Only the first guess after the budget runs out counts.
    pub fn guess(&mut self, guess: Guess, out: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            debug!(?guess, "ignoring guess without a session");
            return;
        };
        if session.remaining_clicks > 0 || session.feedback.is_some() {
            return;
        }

        let correct = guess.is_friendly() == session.friendly;
        session.feedback = Some(GuessFeedback { guess, correct });
        info!(?guess, friendly = session.friendly, correct, "guess submitted");

        for index in session.grid.shatter_all() {
            let _ = self
                .timers
                .schedule(session.id, self.config.flash_duration, Pending::Settle(index));
        }
        let _ = self
            .timers
            .schedule(session.id, self.config.reveal_delay, Pending::Reveal);

        out.push(Event::GuessSubmitted { guess, correct });
    }

    /// Advances the flash and reveal timers.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let mut due = Vec::new();
        self.timers.advance(dt, &mut due);

        for pending in due {
            let Some(session) = self.session.as_mut() else {
                break;
            };
            match pending {
                Pending::Settle(index) => session.grid.settle(index),
                Pending::Reveal => {
                    let pack = session.pack;
                    let correct = session.feedback.is_some_and(|feedback| feedback.correct);
                    self.end();
                    info!(pack = pack.get(), correct, "test completed");
                    out.push(Event::TestCompleted { pack, correct });
                }
            }
        }
    }

    /// Hides the session and cancels its pending timers.
    pub fn end(&mut self) {
        if let Some(session) = self.session.take() {
            let cancelled = self.timers.cancel_owner(&session.id);
            debug!(pack = session.pack.get(), cancelled, "test ended");
        }
    }

    /// Whether a session is visible.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// View of the visible session, if any.
    #[must_use]
    pub fn view(&self) -> Option<SessionView<'_>> {
        self.session.as_ref().map(|session| SessionView {
            pack: session.pack,
            friendly: session.friendly,
            skin_tone: session.skin_tone,
            total_clicks: session.total_clicks,
            remaining_clicks: session.remaining_clicks,
            guesses_unlocked: session.remaining_clicks == 0,
            feedback: session.feedback,
            grid: &session.grid,
        })
    }
}
