#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Herbivore game.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod rng;
pub mod timers;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Player pack size that wins the game.
pub const WINNING_PACK_SIZE: u32 = 10;

/// Smallest possible player pack: the player alone.
pub const MINIMUM_PACK_SIZE: u32 = 1;

/// Phase of the game as tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The player roams the desert looking for packs.
    Traversal,
    /// A mask minigame is in progress; traversal is frozen.
    Testing,
    /// The player trusted a foe while alone.
    GameOver,
    /// The player pack reached the winning size.
    GameWon,
}

impl GameState {
    /// Reports whether the state can only be left through a reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::GameWon)
    }
}

/// Diet of a pack member; decides the friendliness of its pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DotKind {
    /// Plant eater, counts towards a friendly pack.
    Herbivore,
    /// Meat eater, counts against a friendly pack.
    Carnivore,
}

/// Verdict submitted by the player at the end of a minigame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guess {
    /// The player trusts the pack.
    Friend,
    /// The player rejects the pack.
    Foe,
}

impl Guess {
    /// Reports whether the guess claims the pack is friendly.
    #[must_use]
    pub const fn is_friendly(self) -> bool {
        matches!(self, Self::Friend)
    }
}

/// Audio cues requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A friendly pack member joined the player.
    Success,
    /// The player trusted a foe.
    Fail,
    /// The player correctly identified a foe.
    IdentifyFoe,
    /// Background loop while roaming.
    TraversalMusic,
    /// Background loop while a minigame runs.
    EncounterMusic,
    /// Footsteps in the sand, looped while the player walks.
    SandWalk,
}

/// How a freshly recruited member follows the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecruitFollow {
    /// Take the next slot of the triangular formation behind the player.
    Formation,
    /// Trail the most recent recruit, or the player when none exists.
    Chain,
}

/// Unique identifier assigned to a pack member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(u32);

impl MemberId {
    /// Creates a new member identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an NPC pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackId(u32);

impl PackId {
    /// Creates a new pack identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Non-owning reference to whatever a chain-following member trails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaderRef {
    /// Follow the player dot.
    Player,
    /// Follow another member. The member may have been removed since.
    Member(MemberId),
}

/// Movement behaviour currently assigned to a member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FollowTarget {
    /// Idle around a home anchor.
    Wander {
        /// Anchor the member returns to.
        home: Vec2,
    },
    /// Trail a leader at a fixed distance.
    Leader(LeaderRef),
    /// Hold a slot in the triangular formation behind the player.
    Formation {
        /// Zero-based slot index, in recruitment order.
        index: u32,
    },
}

/// Member placement requested when spawning a pack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberSeed {
    /// Position relative to the pack origin.
    pub offset: Vec2,
    /// Diet of the member.
    pub kind: DotKind,
}

impl MemberSeed {
    /// Creates a new member seed.
    #[must_use]
    pub const fn new(offset: Vec2, kind: DotKind) -> Self {
        Self { offset, kind }
    }
}

/// Position update proposed by the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberStep {
    /// Member being moved.
    pub member: MemberId,
    /// New world position.
    pub position: Vec2,
    /// New facing angle in radians, when the member has a direction to face.
    pub facing: Option<f32>,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Hides the intro screen and unfreezes traversal.
    DismissIntro,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the player's directional input for subsequent ticks.
    SteerPlayer {
        /// Raw direction; normalized by the world. Zero stops the player.
        direction: Vec2,
    },
    /// Creates a new NPC pack.
    SpawnPack {
        /// World position the member offsets are relative to.
        origin: Vec2,
        /// Members composing the pack.
        members: Vec<MemberSeed>,
    },
    /// Moves members according to the movement system.
    StepMembers {
        /// Position updates, one per moving member.
        steps: Vec<MemberStep>,
    },
    /// Requests a game state transition.
    SetGameState {
        /// State to enter.
        state: GameState,
    },
    /// Adds points to the score.
    AddScore {
        /// Points awarded.
        points: u32,
    },
    /// Transfers the first member of a pack into the player pack.
    RecruitMember {
        /// Pack giving up a member.
        pack: PackId,
        /// Following behaviour assigned to the recruit.
        follow: RecruitFollow,
    },
    /// Removes members from the tail of the player pack.
    LosePlayerMembers {
        /// Number of members to remove.
        count: u32,
    },
    /// Marks a pack as tested so it can no longer be approached.
    MarkPackTested {
        /// Pack that finished its test.
        pack: PackId,
    },
    /// Returns the world to a fresh traversal.
    ResetGame,
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The intro screen was dismissed.
    IntroDismissed,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The player started or stopped walking.
    PlayerWalkingChanged {
        /// Whether the player is now moving.
        walking: bool,
    },
    /// Confirms that a pack was created.
    PackSpawned {
        /// Identifier assigned to the pack.
        pack: PackId,
        /// Centroid of the realized member positions.
        center: Vec2,
        /// Whether the pack is majority herbivore.
        friendly: bool,
        /// Number of members created.
        members: u32,
    },
    /// The player entered the detection region of an untested pack.
    PlayerApproachedPack {
        /// Pack that was approached.
        pack: PackId,
    },
    /// The world entered a new game state.
    GameStateChanged {
        /// State that became active.
        state: GameState,
    },
    /// The player pack size changed.
    PackSizeChanged {
        /// New size including the player.
        size: u32,
    },
    /// The score changed.
    ScoreChanged {
        /// New score.
        score: u32,
    },
    /// A member left its pack and joined the player.
    MemberRecruited {
        /// Recruited member.
        member: MemberId,
        /// Pack the member came from.
        pack: PackId,
    },
    /// A member of the player pack was removed from the game.
    MemberLost {
        /// Removed member.
        member: MemberId,
    },
    /// A pack was marked as tested.
    PackTested {
        /// Tested pack.
        pack: PackId,
    },
    /// The world was reset.
    GameReset,
    /// A minigame should start for the given pack.
    TestRequested {
        /// Pack under test.
        pack: PackId,
        /// Friendliness snapshot of the pack.
        friendly: bool,
        /// Click budget for revealing the face.
        clicks: u32,
    },
    /// A minigame session became visible.
    TestStarted {
        /// Pack under test.
        pack: PackId,
        /// Click budget of the session.
        clicks: u32,
    },
    /// A mask segment was shattered by a click.
    SegmentShattered {
        /// Row-major index of the segment.
        index: usize,
        /// Clicks left after this one.
        remaining: u32,
    },
    /// The click budget ran out; the guess controls are visible.
    GuessesUnlocked,
    /// The player picked friend or foe.
    GuessSubmitted {
        /// Submitted guess.
        guess: Guess,
        /// Whether the guess matched the pack.
        correct: bool,
    },
    /// The reveal delay elapsed and the minigame reports its outcome.
    TestCompleted {
        /// Pack that was tested.
        pack: PackId,
        /// Whether the guess matched the pack.
        correct: bool,
    },
    /// An audio cue should be played.
    SoundCued {
        /// Requested cue.
        cue: SoundCue,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// World position of the player.
    pub position: Vec2,
    /// Last non-zero normalized movement direction.
    pub facing: Vec2,
}

/// Immutable representation of a single member used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberSnapshot {
    /// Unique identifier assigned to the member.
    pub id: MemberId,
    /// Diet of the member.
    pub kind: DotKind,
    /// World position.
    pub position: Vec2,
    /// Facing angle in radians.
    pub facing: f32,
    /// Current movement behaviour.
    pub follow: FollowTarget,
    /// Pack owning the member, `None` once recruited.
    pub pack: Option<PackId>,
    /// Whether the member joined the player.
    pub recruited: bool,
    /// Whether the member's pack has been tested.
    pub tested: bool,
    /// Whether the member's pack is currently watching the player.
    pub watching_player: bool,
}

/// Read-only snapshot describing all members.
#[derive(Clone, Debug, Default)]
pub struct MemberView {
    snapshots: Vec<MemberSnapshot>,
}

impl MemberView {
    /// Creates a new member view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MemberSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured member snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a member by identifier.
    #[must_use]
    pub fn get(&self, id: MemberId) -> Option<&MemberSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MemberSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single pack used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackSnapshot {
    /// Identifier allocated to the pack by the world.
    pub id: PackId,
    /// Centroid of the member positions at spawn.
    pub center: Vec2,
    /// Friendliness fixed at spawn.
    pub friendly: bool,
    /// Whether the pack has been tested.
    pub tested: bool,
    /// Members still owned by the pack.
    pub members: u32,
    /// Radius that triggers a test when the player enters it.
    pub detection_radius: f32,
    /// Radius within which members watch the player.
    pub awareness_radius: f32,
}

/// Read-only snapshot describing all packs.
#[derive(Clone, Debug, Default)]
pub struct PackView {
    snapshots: Vec<PackSnapshot>,
}

impl PackView {
    /// Creates a new pack view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PackSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pack snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PackSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a pack by identifier.
    #[must_use]
    pub fn get(&self, id: PackId) -> Option<&PackSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of packs that have not been tested yet.
    #[must_use]
    pub fn untested_count(&self) -> usize {
        self.snapshots.iter().filter(|pack| !pack.tested).count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PackSnapshot> {
        self.snapshots
    }
}

/// Angle of a direction vector in radians, `None` for the zero vector.
#[must_use]
pub fn facing_angle(direction: Vec2) -> Option<f32> {
    if direction == Vec2::ZERO {
        None
    } else {
        Some(direction.y.atan2(direction.x))
    }
}
