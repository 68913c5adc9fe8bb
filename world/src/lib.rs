#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Herbivore.
//!
//! The world owns the player, every pack member, the NPC packs and the game
//! manager state (score, player pack, current phase). It mutates only through
//! [`apply`] and reports every observable change as an [`Event`].

use std::time::Duration;

use glam::Vec2;
use herbivore_core::{
    facing_angle, Command, DotKind, Event, FollowTarget, GameState, LeaderRef, MemberId,
    MemberSeed, MemberStep, PackId, RecruitFollow, MINIMUM_PACK_SIZE, WINNING_PACK_SIZE,
};
use tracing::{debug, info, warn};

const DEFAULT_PLAYER_START: Vec2 = Vec2::new(400.0, 300.0);
const DEFAULT_PLAYER_SPEED: f32 = 200.0;
const DEFAULT_DETECTION_PADDING: f32 = 50.0;
const DEFAULT_AWARENESS_RADIUS: f32 = 400.0;

/// Tuning for the authoritative world.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Where the player starts and returns to on reset.
    pub player_start: Vec2,
    /// Player speed in world units per second.
    pub player_speed: f32,
    /// Padding added to the farthest member distance to form the detection radius.
    pub detection_padding: f32,
    /// Radius within which pack members turn to watch the player.
    pub awareness_radius: f32,
    /// Player pack size that wins the game.
    pub winning_pack_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_start: DEFAULT_PLAYER_START,
            player_speed: DEFAULT_PLAYER_SPEED,
            detection_padding: DEFAULT_DETECTION_PADDING,
            awareness_radius: DEFAULT_AWARENESS_RADIUS,
            winning_pack_size: WINNING_PACK_SIZE,
        }
    }
}

/// Represents the authoritative Herbivore world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    state: GameState,
    score: u32,
    intro_visible: bool,
    player: Player,
    members: Vec<Member>,
    packs: Vec<Pack>,
    player_pack: Vec<MemberId>,
    next_member: u32,
    next_pack: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world with default tuning, showing the intro screen.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new world with the provided tuning, showing the intro screen.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            player: Player::at(config.player_start),
            config,
            state: GameState::Traversal,
            score: 0,
            intro_visible: true,
            members: Vec::new(),
            packs: Vec::new(),
            player_pack: Vec::new(),
            next_member: 0,
            next_pack: 0,
            tick_index: 0,
        }
    }

    fn pack_size(&self) -> u32 {
        u32::try_from(self.player_pack.len())
            .unwrap_or(u32::MAX)
            .saturating_add(MINIMUM_PACK_SIZE)
    }

    fn traversal_active(&self) -> bool {
        !self.intro_visible && self.state == GameState::Traversal
    }

    fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.iter_mut().find(|member| member.id == id)
    }

    fn pack_index(&self, id: PackId) -> Option<usize> {
        self.packs.iter().position(|pack| pack.id == id)
    }

    fn remove_member(&mut self, id: MemberId) {
        if let Some(index) = self.members.iter().position(|member| member.id == id) {
            let _ = self.members.remove(index);
        }
    }

    fn change_state(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if self.state == state {
            return;
        }

        self.state = state;
        info!(?state, "game state changed");
        out_events.push(Event::GameStateChanged { state });
    }

    fn update_walking(&mut self, out_events: &mut Vec<Event>) {
        let walking = self.traversal_active() && self.player.heading != Vec2::ZERO;
        if walking != self.player.walking {
            self.player.walking = walking;
            out_events.push(Event::PlayerWalkingChanged { walking });
        }
    }

    fn move_player(&mut self, dt: Duration) {
        if self.player.heading == Vec2::ZERO {
            return;
        }

        self.player.position += self.player.heading * self.config.player_speed * dt.as_secs_f32();
        self.player.facing = self.player.heading;
    }

    fn update_proximity(&mut self, out_events: &mut Vec<Event>) {
        let player_position = self.player.position;
        let mut approached = None;

        for pack in self.packs.iter_mut().filter(|pack| !pack.tested) {
            let distance = player_position.distance(pack.center);
            let inside = distance <= pack.detection_radius;
            if inside && !pack.player_inside && approached.is_none() {
                approached = Some(pack.id);
            }
            pack.player_inside = inside;
            pack.watching_player = distance <= pack.awareness_radius;
        }

        for pack in self.packs.iter().filter(|pack| pack.watching_player) {
            for member in self
                .members
                .iter_mut()
                .filter(|member| member.pack == Some(pack.id))
            {
                if let Some(angle) = facing_angle(player_position - member.position) {
                    member.facing = angle;
                }
            }
        }

        if let Some(pack) = approached {
            let friendly = self
                .packs
                .iter()
                .find(|candidate| candidate.id == pack)
                .map(|candidate| candidate.friendly);
            info!(pack = pack.get(), ?friendly, "player approached pack");
            out_events.push(Event::PlayerApproachedPack { pack });
            self.change_state(GameState::Testing, out_events);
        }
    }

    fn spawn_pack(&mut self, origin: Vec2, seeds: &[MemberSeed], out_events: &mut Vec<Event>) {
        if seeds.is_empty() {
            warn!(?origin, "ignoring pack spawn without members");
            return;
        }

        let count = seeds.len() as f32;
        let centroid_offset = seeds.iter().map(|seed| seed.offset).sum::<Vec2>() / count;
        let farthest = seeds
            .iter()
            .map(|seed| seed.offset.distance(centroid_offset))
            .fold(0.0_f32, f32::max);

        let pack_id = PackId::new(self.next_pack);
        self.next_pack = self.next_pack.wrapping_add(1);

        let mut member_ids = Vec::with_capacity(seeds.len());
        let mut herbivores = 0_usize;
        for seed in seeds {
            let id = MemberId::new(self.next_member);
            self.next_member = self.next_member.wrapping_add(1);

            if seed.kind == DotKind::Herbivore {
                herbivores += 1;
            }

            let position = origin + seed.offset;
            self.members.push(Member {
                id,
                kind: seed.kind,
                position,
                facing: facing_angle(centroid_offset - seed.offset).unwrap_or(0.0),
                follow: FollowTarget::Wander { home: position },
                pack: Some(pack_id),
                recruited: false,
                tested: false,
            });
            member_ids.push(id);
        }

        let friendly = herbivores > seeds.len() / 2;
        let center = origin + centroid_offset;
        let members = u32::try_from(member_ids.len()).unwrap_or(u32::MAX);
        self.packs.push(Pack {
            id: pack_id,
            members: member_ids,
            center,
            friendly,
            tested: false,
            detection_radius: farthest + self.config.detection_padding,
            awareness_radius: self.config.awareness_radius,
            player_inside: false,
            watching_player: false,
        });

        debug!(pack = pack_id.get(), members, friendly, "spawned pack");
        out_events.push(Event::PackSpawned {
            pack: pack_id,
            center,
            friendly,
            members,
        });
    }

    fn step_members(&mut self, steps: &[MemberStep]) {
        if !self.traversal_active() {
            return;
        }

        for step in steps {
            let Some(member) = self.member_mut(step.member) else {
                continue;
            };
            member.position = step.position;
            if let Some(facing) = step.facing {
                member.facing = facing;
            }
        }
    }

    fn recruit(&mut self, pack_id: PackId, follow: RecruitFollow, out_events: &mut Vec<Event>) {
        let Some(pack_index) = self.pack_index(pack_id) else {
            debug!(pack = pack_id.get(), "ignoring recruit from unknown pack");
            return;
        };

        let pack = &mut self.packs[pack_index];
        if pack.members.is_empty() {
            debug!(pack = pack_id.get(), "ignoring recruit from empty pack");
            return;
        }
        let member_id = pack.members.remove(0);

        let slot = u32::try_from(self.player_pack.len()).unwrap_or(u32::MAX);
        let leader = self
            .player_pack
            .last()
            .copied()
            .map_or(LeaderRef::Player, LeaderRef::Member);
        let Some(member) = self.member_mut(member_id) else {
            return;
        };
        member.pack = None;
        member.recruited = true;
        member.follow = match follow {
            RecruitFollow::Formation => FollowTarget::Formation { index: slot },
            RecruitFollow::Chain => FollowTarget::Leader(leader),
        };

        self.player_pack.push(member_id);
        let size = self.pack_size();
        info!(member = member_id.get(), pack = pack_id.get(), size, "recruited member");
        out_events.push(Event::MemberRecruited {
            member: member_id,
            pack: pack_id,
        });
        out_events.push(Event::PackSizeChanged { size });

        if size >= self.config.winning_pack_size {
            self.change_state(GameState::GameWon, out_events);
        }
    }

    fn lose_members(&mut self, count: u32, out_events: &mut Vec<Event>) {
        if self.pack_size() <= MINIMUM_PACK_SIZE {
            self.change_state(GameState::GameOver, out_events);
            return;
        }

        for _ in 0..count {
            let Some(member_id) = self.player_pack.pop() else {
                break;
            };
            self.remove_member(member_id);
            info!(member = member_id.get(), "lost pack member");
            out_events.push(Event::MemberLost { member: member_id });
            out_events.push(Event::PackSizeChanged {
                size: self.pack_size(),
            });
        }
    }

    fn mark_tested(&mut self, pack_id: PackId, out_events: &mut Vec<Event>) {
        let Some(pack_index) = self.pack_index(pack_id) else {
            debug!(pack = pack_id.get(), "ignoring test mark for unknown pack");
            return;
        };

        let pack = &mut self.packs[pack_index];
        pack.tested = true;
        pack.watching_player = false;
        for member in self
            .members
            .iter_mut()
            .filter(|member| member.pack == Some(pack_id))
        {
            member.tested = true;
        }
        out_events.push(Event::PackTested { pack: pack_id });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.score = 0;
        self.player_pack.clear();
        self.members.clear();
        self.packs.clear();
        self.player = Player::at(self.config.player_start);
        self.intro_visible = false;
        self.change_state(GameState::Traversal, out_events);
        out_events.push(Event::ScoreChanged { score: 0 });
        out_events.push(Event::PackSizeChanged {
            size: MINIMUM_PACK_SIZE,
        });
        out_events.push(Event::GameReset);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::DismissIntro => {
            if world.intro_visible {
                world.intro_visible = false;
                out_events.push(Event::IntroDismissed);
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.update_walking(out_events);
            if world.traversal_active() {
                world.move_player(dt);
                world.update_proximity(out_events);
            }
        }
        Command::SteerPlayer { direction } => {
            world.player.heading = direction.normalize_or_zero();
        }
        Command::SpawnPack { origin, members } => {
            world.spawn_pack(origin, &members, out_events);
        }
        Command::StepMembers { steps } => {
            world.step_members(&steps);
        }
        Command::SetGameState { state } => {
            if world.state.is_terminal() {
                debug!(current = ?world.state, requested = ?state, "terminal state holds until reset");
                return;
            }
            world.change_state(state, out_events);
        }
        Command::AddScore { points } => {
            world.score = world.score.saturating_add(points);
            out_events.push(Event::ScoreChanged { score: world.score });
        }
        Command::RecruitMember { pack, follow } => {
            world.recruit(pack, follow, out_events);
        }
        Command::LosePlayerMembers { count } => {
            world.lose_members(count, out_events);
        }
        Command::MarkPackTested { pack } => {
            world.mark_tested(pack, out_events);
        }
        Command::ResetGame => {
            world.reset(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use herbivore_core::{
        GameState, MemberId, MemberSnapshot, MemberView, PackId, PackSnapshot, PackView,
        PlayerSnapshot,
    };

    use super::World;

    /// Current game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Player pack size, counting the player.
    #[must_use]
    pub fn pack_size(world: &World) -> u32 {
        world.pack_size()
    }

    /// Recruited members in recruitment order.
    #[must_use]
    pub fn player_pack(world: &World) -> &[MemberId] {
        &world.player_pack
    }

    /// Most recently recruited member, if any.
    #[must_use]
    pub fn last_pack_member(world: &World) -> Option<MemberId> {
        world.player_pack.last().copied()
    }

    /// Reports whether the intro screen is still shown.
    #[must_use]
    pub fn intro_visible(world: &World) -> bool {
        world.intro_visible
    }

    /// Reports whether the player and packs are currently simulated.
    #[must_use]
    pub fn traversal_active(world: &World) -> bool {
        world.traversal_active()
    }

    /// Number of simulation ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's position and facing.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            facing: world.player.facing,
        }
    }

    /// Captures a read-only view of every member.
    #[must_use]
    pub fn member_view(world: &World) -> MemberView {
        let snapshots = world
            .members
            .iter()
            .map(|member| MemberSnapshot {
                id: member.id,
                kind: member.kind,
                position: member.position,
                facing: member.facing,
                follow: member.follow,
                pack: member.pack,
                recruited: member.recruited,
                tested: member.tested,
                watching_player: member.pack.is_some_and(|pack_id| {
                    world
                        .packs
                        .iter()
                        .any(|pack| pack.id == pack_id && pack.watching_player)
                }),
            })
            .collect();
        MemberView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every pack.
    #[must_use]
    pub fn pack_view(world: &World) -> PackView {
        PackView::from_snapshots(world.packs.iter().map(super::Pack::snapshot).collect())
    }

    /// Captures a single pack.
    #[must_use]
    pub fn pack(world: &World, id: PackId) -> Option<PackSnapshot> {
        world
            .packs
            .iter()
            .find(|pack| pack.id == id)
            .map(super::Pack::snapshot)
    }

    /// Members still owned by a pack, in pack order.
    #[must_use]
    pub fn pack_members(world: &World, id: PackId) -> Vec<MemberId> {
        world
            .packs
            .iter()
            .find(|pack| pack.id == id)
            .map(|pack| pack.members.clone())
            .unwrap_or_default()
    }

    /// Number of packs that can still be approached.
    #[must_use]
    pub fn active_pack_count(world: &World) -> usize {
        world.packs.iter().filter(|pack| !pack.tested).count()
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Vec2,
    facing: Vec2,
    heading: Vec2,
    walking: bool,
}

impl Player {
    fn at(position: Vec2) -> Self {
        Self {
            position,
            facing: Vec2::Y,
            heading: Vec2::ZERO,
            walking: false,
        }
    }
}

#[derive(Clone, Debug)]
struct Member {
    id: MemberId,
    kind: DotKind,
    position: Vec2,
    facing: f32,
    follow: FollowTarget,
    pack: Option<PackId>,
    recruited: bool,
    tested: bool,
}

#[derive(Clone, Debug)]
struct Pack {
    id: PackId,
    members: Vec<MemberId>,
    center: Vec2,
    friendly: bool,
    tested: bool,
    detection_radius: f32,
    awareness_radius: f32,
    player_inside: bool,
    watching_player: bool,
}

impl Pack {
    fn snapshot(&self) -> herbivore_core::PackSnapshot {
        herbivore_core::PackSnapshot {
            id: self.id,
            center: self.center,
            friendly: self.friendly,
            tested: self.tested,
            members: u32::try_from(self.members.len()).unwrap_or(u32::MAX),
            detection_radius: self.detection_radius,
            awareness_radius: self.awareness_radius,
        }
    }
}
