#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for keeping the desert stocked
//! with untested packs.

use glam::Vec2;
use herbivore_core::{rng::GameRng, Command, DotKind, Event, GameState, MemberSeed};
use thiserror::Error;
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Smallest member count drawn for a pack.
    pub min_members: u32,
    /// Largest member count drawn for a pack.
    pub max_members: u32,
    /// Distance between a new member and the member it is placed next to.
    pub member_spacing: f32,
    /// Minimum distance between any two members of a pack.
    pub min_distance: f32,
    /// Placement attempts per member before it is skipped.
    pub placement_attempts: u32,
    /// Probability that a member is a herbivore.
    pub herbivore_probability: f32,
    /// Untested pack count maintained around the player.
    pub min_active_packs: usize,
    /// Closest distance from the player a pack may spawn at.
    pub spawn_distance: f32,
    /// Farthest distance from the player a pack may spawn at.
    pub world_radius: f32,
    /// Origin draws before the last candidate is accepted.
    pub origin_attempts: u32,
    /// Seed for every random draw of the system.
    pub rng_seed: u64,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_members == 0 {
            return Err(ConfigError::EmptyPacks);
        }
        if self.min_members > self.max_members {
            return Err(ConfigError::MemberRange {
                min: self.min_members,
                max: self.max_members,
            });
        }
        if self.spawn_distance > self.world_radius {
            return Err(ConfigError::SpawnRing {
                spawn_distance: self.spawn_distance,
                world_radius: self.world_radius,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_members: 2,
            max_members: 6,
            member_spacing: 60.0,
            min_distance: 40.0,
            placement_attempts: 30,
            herbivore_probability: 0.5,
            min_active_packs: 4,
            spawn_distance: 200.0,
            world_radius: 500.0,
            origin_attempts: 10,
            rng_seed: 0x7061_636b,
        }
    }
}

/// Errors reported when validating a spawning configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Packs must draw at least one member.
    #[error("packs need at least one member")]
    EmptyPacks,
    /// The member count range is inverted.
    #[error("min_members ({min}) exceeds max_members ({max})")]
    MemberRange {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// The spawn ring is inverted.
    #[error("spawn_distance ({spawn_distance}) exceeds world_radius ({world_radius})")]
    SpawnRing {
        /// Configured inner radius.
        spawn_distance: f32,
        /// Configured outer radius.
        world_radius: f32,
    },
}

/// Pure system that tops up untested packs whenever traversal resumes.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: GameRng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: GameRng::seeded(config.rng_seed),
            config,
        })
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// `untested_packs` is the number of packs the player has not tested yet.
    pub fn handle(
        &mut self,
        events: &[Event],
        untested_packs: usize,
        player_position: Vec2,
        out: &mut Vec<Command>,
    ) {
        let resumed = events.iter().any(|event| {
            matches!(
                event,
                Event::IntroDismissed
                    | Event::GameReset
                    | Event::GameStateChanged {
                        state: GameState::Traversal
                    }
            )
        });
        if !resumed {
            return;
        }

        self.populate(untested_packs, player_position, out);
    }

    /// Emits enough spawn commands to reach the configured minimum.
    pub fn populate(&mut self, untested_packs: usize, player_position: Vec2, out: &mut Vec<Command>) {
        let missing = self.config.min_active_packs.saturating_sub(untested_packs);
        for _ in 0..missing {
            let origin = self.spawn_origin(player_position);
            let members = self.layout();
            debug!(?origin, members = members.len(), "requesting pack spawn");
            out.push(Command::SpawnPack { origin, members });
        }
    }

    /// Draws a pack origin on the ring around the player.
    pub fn spawn_origin(&mut self, player_position: Vec2) -> Vec2 {
        let mut origin = player_position;
        for _ in 0..self.config.origin_attempts.max(1) {
            let angle = self.rng.angle();
            let distance = self
                .rng
                .range_f32(self.config.spawn_distance, self.config.world_radius);
            origin = player_position + Vec2::from_angle(angle) * distance;
            if origin.distance(player_position) >= self.config.spawn_distance {
                break;
            }
        }
        origin
    }

    /// Draws member kinds and offsets for a new pack.
    ///
    /// Members grow outwards from the origin; a member that cannot find a spot
    /// clear of the others is skipped.
    pub fn layout(&mut self) -> Vec<MemberSeed> {
        let count = self
            .rng
            .range_u32(self.config.min_members, self.config.max_members);
        let mut offsets: Vec<Vec2> = Vec::with_capacity(count as usize);

        for _ in 0..count {
            if offsets.is_empty() {
                offsets.push(Vec2::ZERO);
                continue;
            }
            if let Some(offset) = self.place_next(&offsets) {
                offsets.push(offset);
            }
        }

        offsets
            .into_iter()
            .map(|offset| {
                let kind = if self.rng.chance(self.config.herbivore_probability) {
                    DotKind::Herbivore
                } else {
                    DotKind::Carnivore
                };
                MemberSeed::new(offset, kind)
            })
            .collect()
    }

    fn place_next(&mut self, placed: &[Vec2]) -> Option<Vec2> {
        for _ in 0..self.config.placement_attempts {
            let anchor = placed[self.rng.index(placed.len())?];
            let candidate = anchor + Vec2::from_angle(self.rng.angle()) * self.config.member_spacing;
            let clear = placed
                .iter()
                .all(|other| other.distance(candidate) >= self.config.min_distance);
            if clear {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_member_range() {
        let config = Config {
            min_members: 5,
            max_members: 3,
            ..Config::default()
        };
        assert_eq!(
            Spawning::new(config).err(),
            Some(ConfigError::MemberRange { min: 5, max: 3 })
        );
    }

    #[test]
    fn rejects_inverted_spawn_ring() {
        let config = Config {
            spawn_distance: 600.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnRing { .. })
        ));
    }

    #[test]
    fn first_member_sits_at_the_origin() {
        let mut spawning = Spawning::new(Config::default()).expect("valid config");
        let layout = spawning.layout();
        assert_eq!(layout.first().map(|seed| seed.offset), Some(Vec2::ZERO));
    }
}
