use std::time::Duration;

use glam::Vec2;
use herbivore_core::{
    Command, DotKind, Event, FollowTarget, LeaderRef, MemberId, MemberSeed, MemberSnapshot,
    MemberView, PackId, PlayerSnapshot, RecruitFollow,
};
use herbivore_system_movement::{formation_target, Config, Movement};
use herbivore_world::{self as world, query, World};

fn started_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::DismissIntro, &mut events);
    world
}

fn spawn(world: &mut World, origin: Vec2, count: usize) -> PackId {
    let members = (0..count)
        .map(|index| MemberSeed::new(Vec2::new(index as f32 * 60.0, 0.0), DotKind::Herbivore))
        .collect();
    let mut events = Vec::new();
    world::apply(world, Command::SpawnPack { origin, members }, &mut events);
    events
        .iter()
        .find_map(|event| match event {
            Event::PackSpawned { pack, .. } => Some(*pack),
            _ => None,
        })
        .expect("pack spawned")
}

fn recruit(world: &mut World, pack: PackId, follow: RecruitFollow) -> MemberId {
    let mut events = Vec::new();
    world::apply(world, Command::RecruitMember { pack, follow }, &mut events);
    query::last_pack_member(world).expect("member recruited")
}

fn run(world: &mut World, movement: &mut Movement, ticks: usize, dt: Duration) {
    for _ in 0..ticks {
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt }, &mut events);

        let members = query::member_view(world);
        let mut commands = Vec::new();
        movement.handle(
            &events,
            query::traversal_active(world),
            &members,
            query::player(world),
            &mut commands,
        );

        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

fn position(world: &World, member: MemberId) -> Vec2 {
    query::member_view(world)
        .get(member)
        .expect("member exists")
        .position
}

#[test]
fn chain_follower_stops_at_follow_distance() {
    let mut world = started_world();
    let pack = spawn(&mut world, Vec2::new(1500.0, 300.0), 1);
    let member = recruit(&mut world, pack, RecruitFollow::Chain);
    let mut movement = Movement::default();

    run(&mut world, &mut movement, 1, Duration::from_secs(1));
    let after_one = position(&world, member);
    assert!((after_one.x - 1320.0).abs() < 1e-2, "moved {after_one:?}");

    run(&mut world, &mut movement, 20, Duration::from_secs(1));
    let player = query::player(&world).position;
    let distance = position(&world, member).distance(player);
    assert!((distance - 25.0).abs() < 1e-2, "distance {distance}");
}

#[test]
fn chain_follower_trails_the_previous_recruit() {
    let mut world = started_world();
    let pack = spawn(&mut world, Vec2::new(1500.0, 300.0), 2);
    let first = recruit(&mut world, pack, RecruitFollow::Chain);
    let second = recruit(&mut world, pack, RecruitFollow::Chain);
    let mut movement = Movement::default();

    run(&mut world, &mut movement, 40, Duration::from_millis(500));

    let gap = position(&world, second).distance(position(&world, first));
    assert!((gap - 25.0).abs() < 1e-1, "gap {gap}");
}

#[test]
fn follower_holds_when_its_leader_is_gone() {
    let orphan = MemberSnapshot {
        id: MemberId::new(3),
        kind: DotKind::Herbivore,
        position: Vec2::new(100.0, 100.0),
        facing: 0.0,
        follow: FollowTarget::Leader(LeaderRef::Member(MemberId::new(99))),
        pack: None,
        recruited: true,
        tested: false,
        watching_player: false,
    };
    let members = MemberView::from_snapshots(vec![orphan]);
    let player = PlayerSnapshot {
        position: Vec2::new(400.0, 300.0),
        facing: Vec2::Y,
    };
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(1),
        }],
        true,
        &members,
        player,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn formation_follower_reaches_its_slot_and_faces_the_player() {
    let mut world = started_world();
    let pack = spawn(&mut world, Vec2::new(1200.0, 300.0), 1);
    let member = recruit(&mut world, pack, RecruitFollow::Formation);
    let mut movement = Movement::default();

    run(&mut world, &mut movement, 30, Duration::from_millis(500));

    let player = query::player(&world);
    let slot = formation_target(player.position, player.facing, 0, 35.0, 40.0);
    let snapshot = *query::member_view(&world).get(member).expect("member");
    assert!(snapshot.position.distance(slot) <= 5.0, "at {:?}", snapshot.position);

    let to_player = player.position - snapshot.position;
    let expected = to_player.y.atan2(to_player.x);
    assert!((snapshot.facing - expected).abs() < 1e-3);
}

#[test]
fn wanderers_stay_near_home() {
    let mut world = started_world();
    let pack = spawn(&mut world, Vec2::new(2500.0, 2500.0), 4);
    let homes: Vec<(MemberId, Vec2)> = query::pack_members(&world, pack)
        .into_iter()
        .map(|member| (member, position(&world, member)))
        .collect();
    let mut movement = Movement::new(Config {
        rng_seed: 7,
        ..Config::default()
    });

    run(&mut world, &mut movement, 600, Duration::from_millis(50));

    let mut moved = false;
    for (member, home) in homes {
        let now = position(&world, member);
        assert!(now.distance(home) <= 30.0 + 1e-3, "{member:?} strayed to {now:?}");
        moved |= now != home;
    }
    assert!(moved, "someone should have wandered in thirty seconds");
}

#[test]
fn watching_members_stand_still() {
    let mut world = started_world();
    let pack = spawn(&mut world, Vec2::new(600.0, 300.0), 2);
    let before: Vec<Vec2> = query::pack_members(&world, pack)
        .into_iter()
        .map(|member| position(&world, member))
        .collect();
    let mut movement = Movement::default();

    run(&mut world, &mut movement, 200, Duration::from_millis(50));

    let after: Vec<Vec2> = query::pack_members(&world, pack)
        .into_iter()
        .map(|member| position(&world, member))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn nothing_moves_while_the_intro_is_showing() {
    let mut world = World::new();
    let pack = spawn(&mut world, Vec2::new(1500.0, 300.0), 1);
    let member = recruit(&mut world, pack, RecruitFollow::Chain);
    let start = position(&world, member);
    let mut movement = Movement::default();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    let mut commands = Vec::new();
    movement.handle(
        &events,
        query::traversal_active(&world),
        &query::member_view(&world),
        query::player(&world),
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(position(&world, member), start);
}

#[test]
fn identical_seeds_replay_identically() {
    let replay = || {
        let mut world = started_world();
        let pack = spawn(&mut world, Vec2::new(2500.0, -2500.0), 5);
        let mut movement = Movement::default();
        run(&mut world, &mut movement, 300, Duration::from_millis(16));
        query::pack_members(&world, pack)
            .into_iter()
            .map(|member| position(&world, member))
            .collect::<Vec<_>>()
    };

    assert_eq!(replay(), replay());
}
