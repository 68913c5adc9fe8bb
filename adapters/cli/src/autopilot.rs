//! Scripted player used by headless runs.

use glam::Vec2;
use herbivore_core::{Guess, PackSnapshot};
use herbivore_rendering::FrameInput;
use herbivore_world::query;

use crate::simulation::Simulation;

/// Input a player would give this frame: dismiss the intro, walk to the
/// nearest untested pack, click until the guesses unlock, then read the face.
pub(crate) fn autopilot(simulation: &Simulation) -> FrameInput {
    let world = simulation.world();
    if query::intro_visible(world) {
        return FrameInput {
            start: true,
            ..FrameInput::default()
        };
    }

    if let Some(session) = simulation.session() {
        if session.feedback.is_some() {
            return FrameInput::default();
        }
        if session.guesses_unlocked {
            let guess = if session.friendly {
                Guess::Friend
            } else {
                Guess::Foe
            };
            return FrameInput {
                guess: Some(guess),
                ..FrameInput::default()
            };
        }
        return FrameInput {
            primary_click: true,
            ..FrameInput::default()
        };
    }

    let player = query::player(world).position;
    let packs = query::pack_view(world);
    let by_distance = |a: &&PackSnapshot, b: &&PackSnapshot| {
        a.center
            .distance_squared(player)
            .total_cmp(&b.center.distance_squared(player))
    };
    let outside = packs
        .iter()
        .filter(|pack| !pack.tested && pack.center.distance(player) > pack.detection_radius)
        .min_by(by_distance);

    let movement = match outside {
        Some(pack) => pack.center - player,
        // Entry is edge-triggered, so step out of packs entered during a test.
        None => packs
            .iter()
            .filter(|pack| !pack.tested)
            .min_by(by_distance)
            .map_or(Vec2::ZERO, |pack| player - pack.center),
    };

    FrameInput {
        movement,
        ..FrameInput::default()
    }
}
