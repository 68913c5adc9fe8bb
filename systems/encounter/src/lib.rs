#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Encounter system that opens a minigame when the player approaches a pack
//! and turns its outcome into rewards, recruits and penalties.

use herbivore_core::{Command, Event, GameState, PackId, PackView, RecruitFollow, SoundCue};
use thiserror::Error;
use tracing::{debug, info};

/// How many clicks a minigame session grants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickBudget {
    /// Always the same budget.
    Fixed(u32),
    /// `clamp(base + floor(ratio * factor), min, max)` where the ratio is the
    /// player pack size over the NPC pack size.
    Ratio {
        /// Clicks granted before the ratio bonus.
        base: u32,
        /// Bonus clicks per unit of ratio.
        factor: f32,
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
}

impl ClickBudget {
    /// Ratio policy with the stock constants.
    pub const STOCK_RATIO: Self = Self::Ratio {
        base: 5,
        factor: 3.0,
        min: 3,
        max: 25,
    };

    /// Resolves the budget for a player pack facing an NPC pack.
    #[must_use]
    pub fn resolve(&self, player_pack_size: u32, npc_pack_size: u32) -> u32 {
        match *self {
            Self::Fixed(clicks) => clicks,
            Self::Ratio {
                base,
                factor,
                min,
                max,
            } => {
                let ratio = player_pack_size as f32 / npc_pack_size.max(1) as f32;
                let bonus = (ratio * factor).floor().max(0.0) as u32;
                base.saturating_add(bonus).clamp(min, max)
            }
        }
    }
}

impl Default for ClickBudget {
    fn default() -> Self {
        Self::Fixed(10)
    }
}

/// What trusting a foe costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PenaltyPolicy {
    /// Lose the most recent recruit.
    #[default]
    LoseOne,
    /// Lose as many recruits as the foe pack has members.
    LoseAll,
}

/// Configuration parameters required to construct the encounter system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Points for recognising a friendly pack.
    pub friend_reward: u32,
    /// Points for recognising a foe.
    pub foe_reward: u32,
    /// Cost of trusting a foe.
    pub penalty: PenaltyPolicy,
    /// How recruits follow the player.
    pub recruit_follow: RecruitFollow,
    /// Click budget policy.
    pub click_budget: ClickBudget,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ClickBudget::Ratio { min, max, .. } = self.click_budget {
            if min > max {
                return Err(ConfigError::BudgetBounds { min, max });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            friend_reward: 10,
            foe_reward: 20,
            penalty: PenaltyPolicy::LoseOne,
            recruit_follow: RecruitFollow::Formation,
            click_budget: ClickBudget::default(),
        }
    }
}

/// Errors reported when validating an encounter configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The ratio budget bounds are inverted.
    #[error("click budget min ({min}) exceeds max ({max})")]
    BudgetBounds {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
}

#[derive(Clone, Copy, Debug)]
struct Encounter {
    pack: PackId,
    friendly: bool,
    members: u32,
}

/// Pure system resolving encounters between the player and NPC packs.
#[derive(Debug)]
pub struct Encounters {
    config: Config,
    current: Option<Encounter>,
}

impl Encounters {
    /// Creates a new encounter system using the supplied configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            current: None,
        })
    }

    /// Pack currently under test.
    #[must_use]
    pub fn current(&self) -> Option<PackId> {
        self.current.map(|encounter| encounter.pack)
    }

    /// Consumes events and immutable views, emitting minigame requests, sound
    /// cues and world commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        packs: &PackView,
        player_pack_size: u32,
        out_events: &mut Vec<Event>,
        out_commands: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::PlayerApproachedPack { pack } => {
                    self.request_test(*pack, packs, player_pack_size, out_events);
                }
                Event::TestCompleted { pack, correct } => {
                    self.resolve(*pack, *correct, out_events, out_commands);
                }
                Event::IntroDismissed => out_events.push(Event::SoundCued {
                    cue: SoundCue::TraversalMusic,
                }),
                Event::GameStateChanged { state } => match state {
                    GameState::Traversal => out_events.push(Event::SoundCued {
                        cue: SoundCue::TraversalMusic,
                    }),
                    GameState::Testing => out_events.push(Event::SoundCued {
                        cue: SoundCue::EncounterMusic,
                    }),
                    GameState::GameOver | GameState::GameWon => self.current = None,
                },
                Event::GameReset => self.current = None,
                _ => {}
            }
        }
    }

    fn request_test(
        &mut self,
        pack: PackId,
        packs: &PackView,
        player_pack_size: u32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(snapshot) = packs.get(pack) else {
            debug!(pack = pack.get(), "ignoring approach to unknown pack");
            return;
        };
        if snapshot.tested {
            debug!(pack = pack.get(), "ignoring approach to tested pack");
            return;
        }

        let clicks = self
            .config
            .click_budget
            .resolve(player_pack_size, snapshot.members);
        info!(
            pack = pack.get(),
            player_pack_size,
            npc_pack_size = snapshot.members,
            clicks,
            "requesting test"
        );

        self.current = Some(Encounter {
            pack,
            friendly: snapshot.friendly,
            members: snapshot.members,
        });
        out_events.push(Event::TestRequested {
            pack,
            friendly: snapshot.friendly,
            clicks,
        });
    }

    fn resolve(
        &mut self,
        pack: PackId,
        correct: bool,
        out_events: &mut Vec<Event>,
        out_commands: &mut Vec<Command>,
    ) {
        let Some(encounter) = self.current.take() else {
            debug!(pack = pack.get(), "ignoring outcome without an encounter");
            return;
        };
        if encounter.pack != pack {
            debug!(
                pack = pack.get(),
                expected = encounter.pack.get(),
                "ignoring outcome for a different pack"
            );
            return;
        }

        match (correct, encounter.friendly) {
            (true, true) => {
                out_commands.push(Command::RecruitMember {
                    pack,
                    follow: self.config.recruit_follow,
                });
                out_commands.push(Command::AddScore {
                    points: self.config.friend_reward,
                });
                out_events.push(Event::SoundCued {
                    cue: SoundCue::Success,
                });
                info!(pack = pack.get(), "recognised friends, recruiting one");
            }
            (true, false) => {
                out_commands.push(Command::AddScore {
                    points: self.config.foe_reward,
                });
                out_events.push(Event::SoundCued {
                    cue: SoundCue::IdentifyFoe,
                });
                info!(pack = pack.get(), "recognised foes");
            }
            (false, true) => {
                info!(pack = pack.get(), "mistook friends for foes");
            }
            (false, false) => {
                let count = match self.config.penalty {
                    PenaltyPolicy::LoseOne => 1,
                    PenaltyPolicy::LoseAll => encounter.members.max(1),
                };
                out_commands.push(Command::LosePlayerMembers { count });
                out_events.push(Event::SoundCued {
                    cue: SoundCue::Fail,
                });
                info!(pack = pack.get(), count, "trusted foes");
            }
        }

        out_commands.push(Command::MarkPackTested { pack });
        out_commands.push(Command::SetGameState {
            state: GameState::Traversal,
        });
    }
}

impl Default for Encounters {
    fn default() -> Self {
        Self {
            config: Config::default(),
            current: None,
        }
    }
}
