//! Frame orchestrator wiring the world, the systems and the observers.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use herbivore_core::{facing_angle, Command, Event, GameState, Guess};
use herbivore_rendering::{
    Camera, DotPresentation, EndPanel, FrameInput, GuessButton, HudPresentation, RenderingError,
    Scene, SegmentPresentation, TestOverlay, PLAYER_COLOR, SKIN_TONES, STRANGER_COLOR,
    TESTED_MODULATE,
};
use herbivore_system_encounter::Encounters;
use herbivore_system_movement::Movement;
use herbivore_system_spawning::Spawning;
use herbivore_system_test_mode::{SegmentState, SessionView, TestMode};
use herbivore_world::{self as world, query, World};
use tracing::{debug, info};

use crate::{
    config::{ConfigError, GameConfig},
    observers::{EventObservers, HudLabels, Observer},
};

/// Fixed step used by headless runs.
pub(crate) const FRAME: Duration = Duration::from_micros(16_667);

const PLAYER_RADIUS: f32 = 8.0;
const PLAYER_SHADOW_RADIUS: f32 = 30.0;
const MEMBER_RADIUS: f32 = 8.0;
const MEMBER_SHADOW_RADIUS: f32 = 25.0;
const INTRO_TEXT: &str = "Roam the desert and meet its packs.\n\
     Chip away the mask, then decide: friend or foe?\n\
     Gather a pack of ten to win.";

/// Owns the authoritative world and every system, and routes events between them.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    movement: Movement,
    spawning: Spawning,
    test_mode: TestMode,
    encounters: Encounters,
    hud: HudLabels,
    observers: EventObservers,
    recentre_camera: bool,
}

impl Simulation {
    pub(crate) fn new(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::with_config(config.world.to_config()),
            movement: Movement::new(config.movement.to_config(seed)),
            spawning: Spawning::new(config.spawning.to_config(seed))?,
            test_mode: TestMode::new(config.test_mode.to_config(seed))?,
            encounters: Encounters::new(config.encounter.to_config())?,
            hud: HudLabels::default(),
            observers: EventObservers::default(),
            recentre_camera: false,
        })
    }

    pub(crate) fn observers_mut(&mut self) -> &mut EventObservers {
        &mut self.observers
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Minigame currently shown, if any.
    pub(crate) fn session(&self) -> Option<SessionView<'_>> {
        self.test_mode.view()
    }

    /// Applies one frame of input and advances time by `dt`.
    pub(crate) fn step(&mut self, dt: Duration, input: &FrameInput) {
        if input.start {
            self.submit(Command::DismissIntro);
        }

        if input.restart {
            if query::game_state(&self.world).is_terminal() {
                info!("restarting");
                self.submit(Command::ResetGame);
            } else {
                debug!("ignoring restart outside a terminal state");
            }
        }

        if input.primary_click && self.test_mode.is_active() {
            let mut events = Vec::new();
            if !self.test_mode.click(&mut events) {
                debug!("click did not shatter a segment");
            }
            self.process(events, Vec::new());
        }

        if let Some(guess) = input.guess {
            let mut events = Vec::new();
            self.test_mode.guess(guess, &mut events);
            self.process(events, Vec::new());
        }

        self.submit(Command::SteerPlayer {
            direction: input.movement,
        });
        self.submit(Command::Tick { dt });
    }

    /// Steps the simulation and refreshes `scene` from the new state.
    ///
    /// The camera jumps back to the player after a restart.
    pub(crate) fn frame(&mut self, dt: Duration, input: &FrameInput, scene: &mut Scene) {
        self.step(dt, input);
        self.populate_scene(scene, dt);
        if std::mem::take(&mut self.recentre_camera) {
            scene.camera.snap(scene.player.position);
        }
    }

    /// Builds a scene whose camera starts on the player.
    pub(crate) fn scene(&self, smooth_speed: f32) -> Result<Scene, RenderingError> {
        let player = query::player(&self.world);
        let camera = Camera::new(player.position, smooth_speed)?;
        let mut scene = Scene::new(camera, self.player_dot());
        self.populate_scene(&mut scene, Duration::ZERO);
        Ok(scene)
    }

    fn submit(&mut self, command: Command) {
        self.process(Vec::new(), vec![command]);
    }

    fn process(&mut self, events: Vec<Event>, mut commands: Vec<Command>) {
        self.dispatch(events, &mut commands);
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in std::mem::take(&mut commands) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.dispatch(events, &mut commands);
        }
    }

    /// Feeds events to every system until no new events are produced.
    fn dispatch(&mut self, mut pending: Vec<Event>, commands: &mut Vec<Command>) {
        while !pending.is_empty() {
            let mut produced = Vec::new();
            self.test_mode.handle(&pending, &mut produced);

            let packs = query::pack_view(&self.world);
            let player = query::player(&self.world);
            self.encounters.handle(
                &pending,
                &packs,
                query::pack_size(&self.world),
                &mut produced,
                commands,
            );
            self.spawning
                .handle(&pending, packs.untested_count(), player.position, commands);
            self.movement.handle(
                &pending,
                query::traversal_active(&self.world),
                &query::member_view(&self.world),
                player,
                commands,
            );

            for event in &pending {
                if *event == Event::GameReset {
                    self.recentre_camera = true;
                }
                self.hud.notify(event);
                self.observers.notify(event);
            }
            pending = produced;
        }
    }

    fn player_dot(&self) -> DotPresentation {
        let player = query::player(&self.world);
        DotPresentation::new(
            player.position,
            PLAYER_RADIUS,
            PLAYER_SHADOW_RADIUS,
            PLAYER_COLOR,
            facing_angle(player.facing).unwrap_or(FRAC_PI_2),
        )
    }

    fn populate_scene(&self, scene: &mut Scene, dt: Duration) {
        scene.player = self.player_dot();
        scene.camera.follow(scene.player.position, dt);

        scene.members.clear();
        scene
            .members
            .extend(query::member_view(&self.world).iter().map(|member| {
                let color = if member.recruited {
                    PLAYER_COLOR
                } else if member.tested {
                    STRANGER_COLOR.modulate(TESTED_MODULATE)
                } else {
                    STRANGER_COLOR
                };
                DotPresentation::new(
                    member.position,
                    MEMBER_RADIUS,
                    MEMBER_SHADOW_RADIUS,
                    color,
                    member.facing,
                )
            }));

        scene.hud = HudPresentation {
            pack_label: self.hud.pack.clone(),
            score_label: self.hud.score.clone(),
        };
        scene.overlay = self.test_mode.view().map(|session| overlay(&session));
        scene.end_panel = match query::game_state(&self.world) {
            GameState::GameOver => Some(EndPanel::defeat()),
            GameState::GameWon => Some(EndPanel::victory()),
            GameState::Traversal | GameState::Testing => None,
        };
        scene.intro = query::intro_visible(&self.world).then(|| INTRO_TEXT.to_owned());
    }
}

fn overlay(session: &SessionView<'_>) -> TestOverlay {
    let segments = session
        .grid
        .segments()
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_visible())
        .map(|(index, segment)| SegmentPresentation {
            index,
            flashing: segment.state() == SegmentState::Flashing,
        })
        .collect();

    let buttons = [Guess::Friend, Guess::Foe]
        .into_iter()
        .filter(|guess| session.shows_button(*guess))
        .map(|guess| GuessButton {
            guess,
            feedback: session
                .feedback
                .filter(|feedback| feedback.guess == guess)
                .map(|feedback| feedback.correct),
        })
        .collect();

    TestOverlay {
        friendly: session.friendly,
        skin_tone: SKIN_TONES
            .get(session.skin_tone)
            .copied()
            .unwrap_or(SKIN_TONES[0]),
        columns: session.grid.columns(),
        rows: session.grid.rows(),
        segments,
        click_label: session.click_label(),
        buttons,
    }
}
