use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use glam::Vec2;
use herbivore_core::{Command, Event, GameState, MemberSeed};
use herbivore_system_spawning::{Config, Spawning};
use herbivore_world::{self as world, query, World};

fn spawned_layouts(commands: &[Command]) -> Vec<(Vec2, Vec<MemberSeed>)> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::SpawnPack { origin, members } => Some((*origin, members.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn dismissing_the_intro_stocks_the_desert() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::default()).expect("valid config");
    let mut events = Vec::new();
    world::apply(&mut world, Command::DismissIntro, &mut events);

    let mut commands = Vec::new();
    spawning.handle(
        &events,
        query::pack_view(&world).untested_count(),
        query::player(&world).position,
        &mut commands,
    );
    assert_eq!(commands.len(), 4);

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(query::pack_view(&world).untested_count(), 4);
}

#[test]
fn only_missing_packs_are_requested() {
    let mut spawning = Spawning::new(Config::default()).expect("valid config");
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::GameStateChanged {
            state: GameState::Traversal,
        }],
        3,
        Vec2::ZERO,
        &mut commands,
    );
    assert_eq!(commands.len(), 1);

    commands.clear();
    spawning.handle(
        &[Event::GameStateChanged {
            state: GameState::Traversal,
        }],
        6,
        Vec2::ZERO,
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn ignores_unrelated_events() {
    let mut spawning = Spawning::new(Config::default()).expect("valid config");
    let mut commands = Vec::new();

    spawning.handle(
        &[
            Event::GameStateChanged {
                state: GameState::Testing,
            },
            Event::ScoreChanged { score: 10 },
        ],
        0,
        Vec2::ZERO,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn reset_and_resume_in_one_batch_top_up_once() {
    let mut spawning = Spawning::new(Config::default()).expect("valid config");
    let mut commands = Vec::new();

    spawning.handle(
        &[
            Event::GameStateChanged {
                state: GameState::Traversal,
            },
            Event::GameReset,
        ],
        0,
        Vec2::ZERO,
        &mut commands,
    );

    assert_eq!(commands.len(), 4);
}

#[test]
fn origins_land_on_the_spawn_ring() {
    let mut spawning = Spawning::new(Config::default()).expect("valid config");
    let player = Vec2::new(400.0, 300.0);

    for _ in 0..200 {
        let distance = spawning.spawn_origin(player).distance(player);
        assert!(
            (200.0 - 1e-3..=500.0 + 1e-3).contains(&distance),
            "distance {distance}"
        );
    }
}

#[test]
fn layouts_respect_spacing_and_size() {
    let mut spawning = Spawning::new(Config::default()).expect("valid config");

    for _ in 0..200 {
        let layout = spawning.layout();
        assert!((1..=6).contains(&layout.len()), "size {}", layout.len());
        for (index, seed) in layout.iter().enumerate() {
            for other in &layout[index + 1..] {
                assert!(seed.offset.distance(other.offset) >= 40.0 - 1e-3);
            }
        }
    }
}

#[test]
fn single_member_packs_are_possible() {
    let mut spawning = Spawning::new(Config {
        min_members: 1,
        max_members: 1,
        ..Config::default()
    })
    .expect("valid config");

    let layout = spawning.layout();
    assert_eq!(layout.len(), 1);
    assert_eq!(layout[0].offset, Vec2::ZERO);
}

#[test]
fn identical_seeds_spawn_identical_packs() {
    let run = || {
        let mut spawning = Spawning::new(Config {
            rng_seed: 0x1234_5678,
            ..Config::default()
        })
        .expect("valid config");
        let mut commands = Vec::new();
        spawning.handle(&[Event::GameReset], 0, Vec2::new(400.0, 300.0), &mut commands);
        fingerprint(&spawned_layouts(&commands))
    };

    assert_eq!(run(), run());
}

#[test]
fn different_seeds_spawn_different_packs() {
    let run = |seed| {
        let mut spawning = Spawning::new(Config {
            rng_seed: seed,
            ..Config::default()
        })
        .expect("valid config");
        let mut commands = Vec::new();
        spawning.populate(0, Vec2::ZERO, &mut commands);
        fingerprint(&spawned_layouts(&commands))
    };

    assert_ne!(run(1), run(2));
}

fn fingerprint(layouts: &[(Vec2, Vec<MemberSeed>)]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (origin, members) in layouts {
        origin.x.to_bits().hash(&mut hasher);
        origin.y.to_bits().hash(&mut hasher);
        for member in members {
            member.offset.x.to_bits().hash(&mut hasher);
            member.offset.y.to_bits().hash(&mut hasher);
            member.kind.hash(&mut hasher);
        }
    }
    hasher.finish()
}
