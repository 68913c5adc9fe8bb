//! TOML configuration file mapped onto the per-system tuning structs.

use std::time::Duration;

use glam::Vec2;
use herbivore_core::RecruitFollow;
use herbivore_rendering::Camera;
use herbivore_system_encounter::{self as encounter, ClickBudget, PenaltyPolicy};
use herbivore_system_movement as movement;
use herbivore_system_spawning as spawning;
use herbivore_system_test_mode as test_mode;
use herbivore_world as world;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading or validating a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file is not valid TOML or does not match the expected layout.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The spawning section is inconsistent.
    #[error("invalid [spawning] section: {0}")]
    Spawning(#[from] spawning::ConfigError),
    /// The test mode section is inconsistent.
    #[error("invalid [test_mode] section: {0}")]
    TestMode(#[from] test_mode::ConfigError),
    /// The encounter section is inconsistent.
    #[error("invalid [encounter] section: {0}")]
    Encounter(#[from] encounter::ConfigError),
    /// The camera smoothing is negative or not finite.
    #[error("invalid [camera] section: smooth_speed must be finite and non-negative, got {0}")]
    Camera(f32),
}

/// Complete game configuration. Missing sections and keys keep their defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) world: WorldSection,
    pub(crate) movement: MovementSection,
    pub(crate) spawning: SpawningSection,
    pub(crate) test_mode: TestModeSection,
    pub(crate) encounter: EncounterSection,
    pub(crate) camera: CameraSection,
}

impl GameConfig {
    /// Parses and validates a TOML document.
    pub(crate) fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section against the owning system's rules.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.spawning.to_config(0).validate()?;
        self.test_mode.to_config(0).validate()?;
        self.encounter.to_config().validate()?;
        let smooth_speed = self.camera.smooth_speed;
        if !smooth_speed.is_finite() || smooth_speed < 0.0 {
            return Err(ConfigError::Camera(smooth_speed));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldSection {
    pub(crate) player_start: [f32; 2],
    pub(crate) player_speed: f32,
    pub(crate) detection_padding: f32,
    pub(crate) awareness_radius: f32,
    pub(crate) winning_pack_size: u32,
}

impl Default for WorldSection {
    fn default() -> Self {
        let config = world::Config::default();
        Self {
            player_start: config.player_start.to_array(),
            player_speed: config.player_speed,
            detection_padding: config.detection_padding,
            awareness_radius: config.awareness_radius,
            winning_pack_size: config.winning_pack_size,
        }
    }
}

impl WorldSection {
    pub(crate) fn to_config(&self) -> world::Config {
        world::Config {
            player_start: Vec2::from_array(self.player_start),
            player_speed: self.player_speed,
            detection_padding: self.detection_padding,
            awareness_radius: self.awareness_radius,
            winning_pack_size: self.winning_pack_size,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MovementSection {
    pub(crate) follow_speed: f32,
    pub(crate) follow_distance: f32,
    pub(crate) arrival_threshold: f32,
    pub(crate) formation_spacing: f32,
    pub(crate) formation_row_distance: f32,
    pub(crate) wander_radius: f32,
    pub(crate) wander_speed: f32,
}

impl Default for MovementSection {
    fn default() -> Self {
        let config = movement::Config::default();
        Self {
            follow_speed: config.follow_speed,
            follow_distance: config.follow_distance,
            arrival_threshold: config.arrival_threshold,
            formation_spacing: config.formation_spacing,
            formation_row_distance: config.formation_row_distance,
            wander_radius: config.wander_radius,
            wander_speed: config.wander_speed,
        }
    }
}

impl MovementSection {
    pub(crate) fn to_config(&self, seed: u64) -> movement::Config {
        let defaults = movement::Config::default();
        movement::Config {
            follow_speed: self.follow_speed,
            follow_distance: self.follow_distance,
            arrival_threshold: self.arrival_threshold,
            formation_spacing: self.formation_spacing,
            formation_row_distance: self.formation_row_distance,
            wander_radius: self.wander_radius,
            wander_speed: self.wander_speed,
            rng_seed: defaults.rng_seed ^ seed,
            ..defaults
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawningSection {
    pub(crate) min_members: u32,
    pub(crate) max_members: u32,
    pub(crate) member_spacing: f32,
    pub(crate) min_distance: f32,
    pub(crate) herbivore_probability: f32,
    pub(crate) min_active_packs: usize,
    pub(crate) spawn_distance: f32,
    pub(crate) world_radius: f32,
}

impl Default for SpawningSection {
    fn default() -> Self {
        let config = spawning::Config::default();
        Self {
            min_members: config.min_members,
            max_members: config.max_members,
            member_spacing: config.member_spacing,
            min_distance: config.min_distance,
            herbivore_probability: config.herbivore_probability,
            min_active_packs: config.min_active_packs,
            spawn_distance: config.spawn_distance,
            world_radius: config.world_radius,
        }
    }
}

impl SpawningSection {
    pub(crate) fn to_config(&self, seed: u64) -> spawning::Config {
        let defaults = spawning::Config::default();
        spawning::Config {
            min_members: self.min_members,
            max_members: self.max_members,
            member_spacing: self.member_spacing,
            min_distance: self.min_distance,
            herbivore_probability: self.herbivore_probability,
            min_active_packs: self.min_active_packs,
            spawn_distance: self.spawn_distance,
            world_radius: self.world_radius,
            rng_seed: defaults.rng_seed ^ seed,
            ..defaults
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TestModeSection {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) reveal_delay_ms: u64,
    pub(crate) flash_duration_ms: u64,
}

impl Default for TestModeSection {
    fn default() -> Self {
        let config = test_mode::Config::default();
        Self {
            columns: config.columns,
            rows: config.rows,
            reveal_delay_ms: u64::try_from(config.reveal_delay.as_millis()).unwrap_or(u64::MAX),
            flash_duration_ms: u64::try_from(config.flash_duration.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl TestModeSection {
    pub(crate) fn to_config(&self, seed: u64) -> test_mode::Config {
        let defaults = test_mode::Config::default();
        test_mode::Config {
            columns: self.columns,
            rows: self.rows,
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            flash_duration: Duration::from_millis(self.flash_duration_ms),
            rng_seed: defaults.rng_seed ^ seed,
        }
    }
}

/// Cost of trusting a foe as written in the file.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PenaltySetting {
    #[default]
    LoseOne,
    LoseAll,
}

/// How recruits follow the player as written in the file.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FollowSetting {
    #[default]
    Formation,
    Chain,
}

/// Click budget policy as written in the file.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum BudgetSetting {
    Fixed {
        clicks: u32,
    },
    Ratio {
        base: u32,
        factor: f32,
        min: u32,
        max: u32,
    },
}

impl Default for BudgetSetting {
    fn default() -> Self {
        match ClickBudget::default() {
            ClickBudget::Fixed(clicks) => Self::Fixed { clicks },
            ClickBudget::Ratio {
                base,
                factor,
                min,
                max,
            } => Self::Ratio {
                base,
                factor,
                min,
                max,
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EncounterSection {
    pub(crate) friend_reward: u32,
    pub(crate) foe_reward: u32,
    pub(crate) penalty: PenaltySetting,
    pub(crate) recruit_follow: FollowSetting,
    pub(crate) click_budget: BudgetSetting,
}

impl Default for EncounterSection {
    fn default() -> Self {
        let config = encounter::Config::default();
        Self {
            friend_reward: config.friend_reward,
            foe_reward: config.foe_reward,
            penalty: PenaltySetting::default(),
            recruit_follow: FollowSetting::default(),
            click_budget: BudgetSetting::default(),
        }
    }
}

impl EncounterSection {
    pub(crate) fn to_config(&self) -> encounter::Config {
        let penalty = match self.penalty {
            PenaltySetting::LoseOne => PenaltyPolicy::LoseOne,
            PenaltySetting::LoseAll => PenaltyPolicy::LoseAll,
        };
        let recruit_follow = match self.recruit_follow {
            FollowSetting::Formation => RecruitFollow::Formation,
            FollowSetting::Chain => RecruitFollow::Chain,
        };
        let click_budget = match self.click_budget {
            BudgetSetting::Fixed { clicks } => ClickBudget::Fixed(clicks),
            BudgetSetting::Ratio {
                base,
                factor,
                min,
                max,
            } => ClickBudget::Ratio {
                base,
                factor,
                min,
                max,
            },
        };
        encounter::Config {
            friend_reward: self.friend_reward,
            foe_reward: self.foe_reward,
            penalty,
            recruit_follow,
            click_budget,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CameraSection {
    pub(crate) smooth_speed: f32,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            smooth_speed: Camera::DEFAULT_SMOOTH_SPEED,
        }
    }
}
