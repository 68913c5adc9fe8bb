#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that proposes member steps for wandering, chain-following
//! and formation-following members.

use std::collections::HashMap;

use glam::Vec2;
use herbivore_core::{
    facing_angle, rng::GameRng, Command, Event, FollowTarget, LeaderRef, MemberId,
    MemberSnapshot, MemberStep, MemberView, PlayerSnapshot,
};

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Speed of followers in world units per second.
    pub follow_speed: f32,
    /// Distance a chain follower keeps from its leader.
    pub follow_distance: f32,
    /// Distance under which a formation follower considers its slot reached.
    pub arrival_threshold: f32,
    /// Lateral spacing between members of a formation row.
    pub formation_spacing: f32,
    /// Distance between formation rows.
    pub formation_row_distance: f32,
    /// Radius around the home anchor a wanderer picks targets within.
    pub wander_radius: f32,
    /// Speed of wanderers in world units per second.
    pub wander_speed: f32,
    /// Shortest and longest pause between walks, in seconds.
    pub wander_pause: (f32, f32),
    /// Shortest and longest walk, in seconds.
    pub wander_walk: (f32, f32),
    /// Seed for the wander cycle draws.
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            follow_speed: 180.0,
            follow_distance: 25.0,
            arrival_threshold: 5.0,
            formation_spacing: 35.0,
            formation_row_distance: 40.0,
            wander_radius: 30.0,
            wander_speed: 40.0,
            wander_pause: (1.0, 3.0),
            wander_walk: (0.5, 1.5),
            rng_seed: 0x6d6f_7665,
        }
    }
}

/// Row, position within the row, and row length of a formation slot.
///
/// Rows hold 2, 3, 4, ... members.
#[must_use]
pub fn formation_slot(index: u32) -> (u32, u32, u32) {
    let mut row = 0;
    let mut index_in_row = index;
    let mut row_size = 2;

    while index_in_row >= row_size {
        index_in_row -= row_size;
        row += 1;
        row_size = row + 2;
    }

    (row, index_in_row, row_size)
}

/// World position of a formation slot behind a player facing `facing`.
#[must_use]
pub fn formation_target(
    player_position: Vec2,
    facing: Vec2,
    index: u32,
    spacing: f32,
    row_distance: f32,
) -> Vec2 {
    let (row, index_in_row, row_size) = formation_slot(index);

    let row_width = (row_size - 1) as f32 * spacing;
    let lateral = -row_width / 2.0 + index_in_row as f32 * spacing;
    let behind = row_distance * (row + 1) as f32;
    let perpendicular = Vec2::new(-facing.y, facing.x);

    player_position - facing * behind + perpendicular * lateral
}

#[derive(Clone, Copy, Debug)]
enum WanderPhase {
    Paused { remaining: f32 },
    Walking { target: Vec2, remaining: f32 },
}

/// Pure system that reacts to elapsed time and emits member steps.
#[derive(Debug)]
pub struct Movement {
    config: Config,
    rng: GameRng,
    wander: HashMap<MemberId, WanderPhase>,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: GameRng::seeded(config.rng_seed),
            config,
            wander: HashMap::new(),
        }
    }

    /// Consumes events and immutable views to emit movement commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        traversal_active: bool,
        members: &MemberView,
        player: PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        if events.iter().any(|event| matches!(event, Event::GameReset)) {
            self.wander.clear();
        }

        if !traversal_active {
            return;
        }

        let dt: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(dt.as_secs_f32()),
                _ => None,
            })
            .sum();
        if dt <= 0.0 {
            return;
        }

        self.wander.retain(|id, _| {
            members
                .get(*id)
                .is_some_and(|member| matches!(member.follow, FollowTarget::Wander { .. }))
        });

        let mut steps = Vec::new();
        for member in members.iter() {
            let step = match member.follow {
                FollowTarget::Wander { home } => self.wander_step(member, home, dt),
                FollowTarget::Leader(leader) => {
                    self.chain_step(member, leader, members, player, dt)
                }
                FollowTarget::Formation { index } => self.formation_step(member, index, player, dt),
            };
            if let Some(step) = step {
                steps.push(step);
            }
        }

        if !steps.is_empty() {
            out.push(Command::StepMembers { steps });
        }
    }

    fn wander_step(&mut self, member: &MemberSnapshot, home: Vec2, dt: f32) -> Option<MemberStep> {
        if member.watching_player {
            return None;
        }

        let phase = match self.wander.get(&member.id).copied() {
            Some(phase) => phase,
            None => self.next_pause(),
        };

        let (phase, step) = match phase {
            WanderPhase::Paused { remaining } if remaining > dt => {
                (WanderPhase::Paused { remaining: remaining - dt }, None)
            }
            WanderPhase::Paused { .. } => (self.next_walk(home), None),
            WanderPhase::Walking { target, remaining } => {
                let step = advance_towards(member, target, self.config.wander_speed * dt, 0.0);
                if remaining > dt {
                    (
                        WanderPhase::Walking {
                            target,
                            remaining: remaining - dt,
                        },
                        step,
                    )
                } else {
                    (self.next_pause(), step)
                }
            }
        };

        let _ = self.wander.insert(member.id, phase);
        step
    }

    fn chain_step(
        &self,
        member: &MemberSnapshot,
        leader: LeaderRef,
        members: &MemberView,
        player: PlayerSnapshot,
        dt: f32,
    ) -> Option<MemberStep> {
        let leader_position = match leader {
            LeaderRef::Player => player.position,
            LeaderRef::Member(id) => members.get(id)?.position,
        };

        advance_towards(
            member,
            leader_position,
            self.config.follow_speed * dt,
            self.config.follow_distance,
        )
    }

    fn formation_step(
        &self,
        member: &MemberSnapshot,
        index: u32,
        player: PlayerSnapshot,
        dt: f32,
    ) -> Option<MemberStep> {
        let target = formation_target(
            player.position,
            player.facing,
            index,
            self.config.formation_spacing,
            self.config.formation_row_distance,
        );
        let facing = facing_angle(player.position - member.position);

        let position = if member.position.distance(target) > self.config.arrival_threshold {
            advance_towards(member, target, self.config.follow_speed * dt, 0.0)
                .map_or(member.position, |step| step.position)
        } else {
            member.position
        };

        if position == member.position && facing.is_none() {
            return None;
        }

        Some(MemberStep {
            member: member.id,
            position,
            facing,
        })
    }

    fn next_pause(&mut self) -> WanderPhase {
        let (min, max) = self.config.wander_pause;
        WanderPhase::Paused {
            remaining: self.rng.range_f32(min, max),
        }
    }

    fn next_walk(&mut self, home: Vec2) -> WanderPhase {
        let angle = self.rng.angle();
        let distance = self.rng.range_f32(0.0, self.config.wander_radius);
        let (min, max) = self.config.wander_walk;
        WanderPhase::Walking {
            target: home + Vec2::from_angle(angle) * distance,
            remaining: self.rng.range_f32(min, max),
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Moves `member` towards `target`, stopping `keep_distance` short of it.
fn advance_towards(
    member: &MemberSnapshot,
    target: Vec2,
    max_step: f32,
    keep_distance: f32,
) -> Option<MemberStep> {
    let offset = target - member.position;
    let distance = offset.length();
    if distance <= keep_distance || max_step <= 0.0 {
        return None;
    }

    let travel = max_step.min(distance - keep_distance);
    Some(MemberStep {
        member: member.id,
        position: member.position + offset / distance * travel,
        facing: facing_angle(offset),
    })
}
