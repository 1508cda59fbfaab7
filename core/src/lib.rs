#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sky Raid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. All spatial quantities are
//! declared in unscaled base units (see [`base`]) and converted through a
//! single [`Scale`] value.

mod geometry;

pub use geometry::{point_in_rect, rect_overlap, Rect};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used by adapters when creating the game window.
pub const WINDOW_TITLE: &str = "Sky Raid";

/// Score awarded for every enemy destroyed by a player projectile.
pub const SCORE_PER_KILL: u64 = 10;

/// Ticks that must elapse between two player volleys.
pub const FIRE_COOLDOWN_TICKS: u32 = 10;

/// Ticks during which a further pause or resume request is ignored.
pub const PAUSE_DEBOUNCE_TICKS: u32 = 15;

/// Spatial constants of the simulation expressed in unscaled base units.
pub mod base {
    /// Width of the playfield.
    pub const PLAYFIELD_WIDTH: u32 = 480;
    /// Height of the playfield.
    pub const PLAYFIELD_HEIGHT: u32 = 640;

    /// Side length of the player's drawable bounds.
    pub const PLAYER_SIZE: u32 = 48;
    /// Distance from the horizontal center to the player's initial left edge.
    pub const PLAYER_SPAWN_CENTER_OFFSET: f64 = 20.0;
    /// Distance from the bottom edge to the player's initial top edge.
    pub const PLAYER_SPAWN_BOTTOM_OFFSET: f64 = 60.0;
    /// Distance travelled per tick along each active steering axis.
    pub const PLAYER_STEP: f64 = 6.0;
    /// Margin removed from every side of the player's bounds for hit tests.
    pub const PLAYER_HIT_BOX_INSET: f64 = 10.0;

    /// Width shared by player and enemy projectiles.
    pub const PROJECTILE_WIDTH: u32 = 8;
    /// Height shared by player and enemy projectiles.
    pub const PROJECTILE_HEIGHT: u32 = 24;
    /// Offset of the left cannon from the player's left edge.
    pub const LEFT_CANNON_OFFSET: f64 = 6.0;
    /// Offset of the right cannon measured back from the player's right edge.
    pub const RIGHT_CANNON_INSET: f64 = 14.0;
    /// Upward distance travelled by a player projectile per tick.
    pub const PLAYER_PROJECTILE_SPEED: f64 = 12.0;

    /// Side length of an enemy.
    pub const ENEMY_SIZE: u32 = 40;
    /// Downward distance travelled by an enemy per tick.
    pub const ENEMY_SPEED: f64 = 3.0;
    /// Downward distance travelled by an enemy projectile per tick.
    pub const ENEMY_PROJECTILE_SPEED: f64 = 7.0;
}

/// Uniform factor converting base units into playfield units.
///
/// Every spatial constant (positions, extents, velocities and collision
/// insets) passes through the same factor so collision outcomes do not depend
/// on the output resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale(f64);

impl Scale {
    /// Identity scale used by the reference presentation.
    pub const UNIT: Scale = Scale(1.0);

    /// Creates a scale from a finite, strictly positive factor.
    pub fn new(factor: f64) -> Result<Self, ScaleError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(ScaleError::NotPositive { factor })
        }
    }

    /// Raw multiplication factor.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Scales a base-unit length or velocity.
    #[must_use]
    pub fn length(&self, base: f64) -> f64 {
        base * self.0
    }

    /// Scales a base-unit extent, rounding to whole units.
    #[must_use]
    pub fn extent(&self, base: u32) -> u32 {
        (f64::from(base) * self.0).round() as u32
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Errors reported when constructing a [`Scale`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ScaleError {
    /// The factor was zero, negative, infinite or NaN.
    #[error("scale factor must be finite and positive (received {factor})")]
    NotPositive {
        /// Factor that failed validation.
        factor: f64,
    },
}

/// Dimensions of the playfield after scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
    width: u32,
    height: u32,
}

impl Playfield {
    /// Creates a playfield with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reference playfield converted through the provided scale.
    #[must_use]
    pub fn scaled(scale: Scale) -> Self {
        Self::new(
            scale.extent(base::PLAYFIELD_WIDTH),
            scale.extent(base::PLAYFIELD_HEIGHT),
        )
    }

    /// Horizontal extent of the playfield.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Vertical extent of the playfield.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Closed set of entity kinds populating a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled ship.
    Player,
    /// Projectile fired upward by the player.
    PlayerProjectile,
    /// Descending enemy ship.
    Enemy,
    /// Projectile fired downward by an enemy.
    EnemyProjectile,
}

impl EntityKind {
    /// Unscaled drawable extent of the kind as `(width, height)`.
    #[must_use]
    pub const fn base_extent(self) -> (u32, u32) {
        match self {
            Self::Player => (base::PLAYER_SIZE, base::PLAYER_SIZE),
            Self::PlayerProjectile | Self::EnemyProjectile => {
                (base::PROJECTILE_WIDTH, base::PROJECTILE_HEIGHT)
            }
            Self::Enemy => (base::ENEMY_SIZE, base::ENEMY_SIZE),
        }
    }

    /// Unscaled vertical velocity of the kind; negative values move upward.
    ///
    /// The player is steered and therefore reports zero.
    #[must_use]
    pub const fn base_vertical_velocity(self) -> f64 {
        match self {
            Self::Player => 0.0,
            Self::PlayerProjectile => -base::PLAYER_PROJECTILE_SPEED,
            Self::Enemy => base::ENEMY_SPEED,
            Self::EnemyProjectile => base::ENEMY_PROJECTILE_SPEED,
        }
    }
}

/// Unique identifier assigned to an entity within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
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

/// Directional input held during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Steering {
    /// Move toward decreasing x.
    pub left: bool,
    /// Move toward increasing x.
    pub right: bool,
    /// Move toward decreasing y.
    pub up: bool,
    /// Move toward increasing y.
    pub down: bool,
}

impl Steering {
    /// Steering with no direction held.
    pub const IDLE: Steering = Steering {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    /// Reports whether any direction is held.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

/// Player input consumed by a single simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PilotInput {
    /// Directional input held during the tick.
    pub steering: Steering,
    /// Whether the fire command is held.
    pub fire: bool,
}

impl PilotInput {
    /// Input with nothing held.
    pub const IDLE: PilotInput = PilotInput {
        steering: Steering::IDLE,
        fire: false,
    };
}

/// Named difficulty tiers offered by the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Sparse enemies that rarely fire.
    Easy,
    /// Reference pacing.
    Normal,
    /// Dense enemies with frequent fire.
    Hell,
}

impl Difficulty {
    /// Every tier in menu order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hell];

    /// Spawn cadence and fire probability associated with the tier.
    #[must_use]
    pub const fn parameters(self) -> DifficultyParameters {
        match self {
            Self::Easy => DifficultyParameters::from_validated(60, 1),
            Self::Normal => DifficultyParameters::from_validated(30, 2),
            Self::Hell => DifficultyParameters::from_validated(10, 6),
        }
    }

    /// Human readable label of the tier.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hell => "Hell",
        }
    }

    /// Maps a zero-based menu slot onto a tier.
    ///
    /// Menu slots outside `0..=2` cannot be produced by the shipped UI; they
    /// trip a debug assertion and fall back to [`Difficulty::Normal`] in
    /// release builds.
    #[must_use]
    pub fn from_menu_index(index: usize) -> Self {
        match Self::ALL.get(index) {
            Some(difficulty) => *difficulty,
            None => {
                debug_assert!(false, "difficulty menu index {index} out of range");
                Self::Normal
            }
        }
    }
}

/// Spawn cadence and enemy fire probability applied for a whole round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifficultyParameters {
    spawn_interval: u32,
    fire_chance: u8,
}

impl DifficultyParameters {
    /// Creates parameters from a spawn interval in ticks and a fire chance in percent.
    ///
    /// A zero interval or a chance above 100 is an invariant violation: it
    /// panics in debug builds and is clamped into range in release builds.
    #[must_use]
    pub fn new(spawn_interval: u32, fire_chance: u8) -> Self {
        debug_assert!(spawn_interval > 0, "spawn interval must be positive");
        debug_assert!(fire_chance <= 100, "fire chance {fire_chance}% exceeds 100%");
        Self {
            spawn_interval: spawn_interval.max(1),
            fire_chance: fire_chance.min(100),
        }
    }

    const fn from_validated(spawn_interval: u32, fire_chance: u8) -> Self {
        Self {
            spawn_interval,
            fire_chance,
        }
    }

    /// Number of ticks between automatic enemy spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> u32 {
        self.spawn_interval
    }

    /// Per-tick, per-enemy probability of firing, in percent.
    #[must_use]
    pub const fn fire_chance(&self) -> u8 {
        self.fire_chance
    }
}

/// Lifecycle states of a play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Difficulty selection screen.
    #[default]
    Menu,
    /// Simulation advancing every tick.
    Playing,
    /// Simulation frozen beneath an overlay.
    Paused,
    /// Round lost; waiting for retry or quit.
    Ended,
}

/// Discrete actions requested through keyboard shortcuts or UI widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionAction {
    /// Start a round with the provided tier.
    SelectDifficulty(Difficulty),
    /// Freeze the running round.
    Pause,
    /// Resume the frozen round.
    Resume,
    /// Abandon the round and return to the menu.
    ReturnToMenu,
    /// Start a new round with the previous tier.
    Retry,
    /// Leave the end screen and terminate the run loop.
    GiveUp,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the scale used for every subsequently created entity.
    ///
    /// Clears the active round because existing entities were sized with the
    /// previous scale.
    Configure {
        /// Factor converting base units into playfield units.
        scale: Scale,
    },
    /// Discards the active round and starts a fresh one.
    StartRound {
        /// Spawn cadence and fire probability held fixed for the round.
        parameters: DifficultyParameters,
        /// Seed for the round's pseudo-random source.
        seed: u64,
    },
    /// Discards the active round without starting another.
    ClearRound,
    /// Advances the active round by one tick.
    Tick {
        /// Player input held during the tick.
        input: PilotInput,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a fresh round replaced any previous one.
    RoundStarted {
        /// Parameters governing the round.
        parameters: DifficultyParameters,
        /// Seed applied to the round's pseudo-random source.
        seed: u64,
    },
    /// Confirms that the active round was discarded.
    RoundCleared,
    /// Confirms that the player fired a twin projectile volley.
    VolleyFired {
        /// Projectile leaving the left cannon.
        left: EntityId,
        /// Projectile leaving the right cannon.
        right: EntityId,
    },
    /// Confirms that an enemy entered above the top edge.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EntityId,
        /// Horizontal coordinate of the enemy's left edge.
        x: f64,
    },
    /// Confirms that an enemy released a projectile.
    EnemyFired {
        /// Enemy that fired.
        enemy: EntityId,
        /// Projectile that was created.
        projectile: EntityId,
    },
    /// Reports that an enemy left through the bottom edge without penalty.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EntityId,
    },
    /// Reports that a player projectile destroyed an enemy.
    EnemyDestroyed {
        /// Enemy that was destroyed.
        enemy: EntityId,
        /// Projectile consumed by the hit.
        projectile: EntityId,
        /// Round score after awarding the kill.
        score: u64,
    },
    /// Reports that an enemy or enemy projectile overlapped the player's hit box.
    PlayerHit {
        /// Entity that touched the player.
        by: EntityId,
        /// Kind of the entity that touched the player.
        kind: EntityKind,
    },
    /// Indicates that the round clock advanced.
    TimeAdvanced {
        /// Tick counter after advancing.
        tick: u64,
    },
    /// Reports that the loss flag is set at the end of a tick.
    RoundLost {
        /// Final score of the round.
        score: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_tiers_map_to_reference_parameters() {
        let expected = [(60, 1), (30, 2), (10, 6)];
        for (difficulty, (interval, chance)) in Difficulty::ALL.into_iter().zip(expected) {
            let parameters = difficulty.parameters();
            assert_eq!(parameters.spawn_interval(), interval, "{difficulty:?}");
            assert_eq!(parameters.fire_chance(), chance, "{difficulty:?}");
        }
    }

    #[test]
    fn menu_index_selects_tiers_in_order() {
        assert_eq!(Difficulty::from_menu_index(0), Difficulty::Easy);
        assert_eq!(Difficulty::from_menu_index(1), Difficulty::Normal);
        assert_eq!(Difficulty::from_menu_index(2), Difficulty::Hell);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn unknown_menu_index_is_fatal_in_debug_builds() {
        let _ = Difficulty::from_menu_index(7);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn unknown_menu_index_falls_back_in_release_builds() {
        assert_eq!(Difficulty::from_menu_index(7), Difficulty::Normal);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn malformed_parameters_are_clamped_in_release_builds() {
        let parameters = DifficultyParameters::new(0, 250);
        assert_eq!(parameters.spawn_interval(), 1);
        assert_eq!(parameters.fire_chance(), 100);
    }

    #[test]
    fn scale_rejects_non_positive_factors() {
        assert!(Scale::new(0.0).is_err());
        assert!(Scale::new(-2.0).is_err());
        assert!(Scale::new(f64::NAN).is_err());
        assert!(Scale::new(f64::INFINITY).is_err());
        assert_eq!(Scale::new(1.5).map(|scale| scale.get()), Ok(1.5));
    }

    #[test]
    fn playfield_scales_with_factor() {
        let scale = Scale::new(1.5).expect("valid scale");
        assert_eq!(Playfield::scaled(scale), Playfield::new(720, 960));
        assert_eq!(Playfield::scaled(Scale::UNIT), Playfield::new(480, 640));
    }

    #[test]
    fn difficulty_round_trips_through_bincode() {
        let bytes = bincode::serialize(&Difficulty::Hell).expect("serialize");
        let restored: Difficulty = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, Difficulty::Hell);
    }
}
