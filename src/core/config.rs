//! Game configuration.
//!
//! A [`GameConfig`] is validated once at construction and is read-only
//! afterwards: every field is private and there are no setters. Changing a
//! rule means building a new config and a new game.
//!
//! Configs are built with [`GameConfigBuilder`] or parsed from JSON; both go
//! through the same validation.
//!
//! ```
//! use liars_dice::core::{BidOrdering, GameConfig};
//!
//! let config = GameConfig::builder()
//!     .dice_distribution(vec![2, 3])
//!     .total_dice(5)
//!     .ones_wild(true)
//!     .bid_ordering(BidOrdering::LiarsDiceStandard)
//!     .rng_seed(7)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.num_players(), 2);
//! assert_eq!(config.total_dice(), 5);
//! ```

use serde::{Deserialize, Serialize};

use super::bid::{BidOrderPolicy, Face, LiarsDiceStandard, QuantityThenFace};
use super::error::ConfigError;
use super::player::{PlayerId, PlayerMap};

/// Face used as the wildcard when `ones_wild` is enabled.
pub const WILD_FACE: Face = 1;

/// Inclusive range of die faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceRange {
    min: Face,
    max: Face,
}

impl FaceRange {
    /// Standard six-sided dice, faces 1..=6.
    pub const SIX_SIDED: FaceRange = FaceRange { min: 1, max: 6 };

    /// Create a range. Emptiness is checked when the config is built.
    #[must_use]
    pub const fn new(min: Face, max: Face) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn min(self) -> Face {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> Face {
        self.max
    }

    #[must_use]
    pub fn contains(self, face: Face) -> bool {
        (self.min..=self.max).contains(&face)
    }

    /// Number of distinct faces.
    #[must_use]
    pub fn len(self) -> usize {
        if self.max < self.min {
            0
        } else {
            usize::from(self.max - self.min) + 1
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Iterate over faces, lowest first.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        self.min..=self.max
    }
}

impl Default for FaceRange {
    fn default() -> Self {
        Self::SIX_SIDED
    }
}

/// Which total order decides whether a bid raises the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidOrdering {
    /// Higher quantity wins; equal quantity needs a higher face.
    #[default]
    QuantityThenFace,
    /// Perudo ordering: a bid on the wild face counts double.
    LiarsDiceStandard,
}

impl BidOrdering {
    /// Build the ordering policy for a face range.
    #[must_use]
    pub fn policy(self, faces: FaceRange) -> Box<dyn BidOrderPolicy> {
        match self {
            BidOrdering::QuantityThenFace => Box::new(QuantityThenFace),
            BidOrdering::LiarsDiceStandard => Box::new(LiarsDiceStandard::new(faces)),
        }
    }
}

/// Validated, immutable parameters of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameConfigBuilder", into = "GameConfigBuilder")]
pub struct GameConfig {
    dice_distribution: PlayerMap<u8>,
    total_dice: u32,
    faces: FaceRange,
    ones_wild: bool,
    bid_ordering: BidOrdering,
    max_turns: u32,
    rng_seed: Option<u64>,
    game_id: Option<String>,
}

impl GameConfig {
    /// Start building a config from the defaults.
    #[must_use]
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let builder: GameConfigBuilder = serde_json::from_str(json)?;
        builder.build()
    }

    /// Serialize to a JSON document accepted by [`GameConfig::from_json`].
    #[must_use]
    pub fn to_json(&self) -> String {
        // A builder of plain fields always serializes.
        serde_json::to_string_pretty(&GameConfigBuilder::from(self.clone())).unwrap_or_default()
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.dice_distribution.player_count()
    }

    /// Starting dice per player, in seat order.
    #[must_use]
    pub fn dice_distribution(&self) -> &PlayerMap<u8> {
        &self.dice_distribution
    }

    /// Starting dice of one player.
    #[must_use]
    pub fn starting_dice(&self, player: PlayerId) -> u8 {
        self.dice_distribution[player]
    }

    /// Sum of the starting distribution.
    #[must_use]
    pub fn total_dice(&self) -> u32 {
        self.total_dice
    }

    #[must_use]
    pub fn faces(&self) -> FaceRange {
        self.faces
    }

    #[must_use]
    pub fn ones_wild(&self) -> bool {
        self.ones_wild
    }

    #[must_use]
    pub fn bid_ordering(&self) -> BidOrdering {
        self.bid_ordering
    }

    /// Upper bound on bids per round.
    #[must_use]
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// `None` means the engine draws an entropy seed.
    #[must_use]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Explicit game id, if one was configured.
    #[must_use]
    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }
}

impl Default for GameConfig {
    /// Two players with five six-sided dice each, seed 69.
    fn default() -> Self {
        Self {
            dice_distribution: PlayerMap::with_value(DEFAULT_PLAYERS, DEFAULT_DICE_PER_PLAYER),
            total_dice: (DEFAULT_PLAYERS * usize::from(DEFAULT_DICE_PER_PLAYER)) as u32,
            faces: FaceRange::SIX_SIDED,
            ones_wild: false,
            bid_ordering: BidOrdering::QuantityThenFace,
            max_turns: DEFAULT_MAX_TURNS,
            rng_seed: Some(DEFAULT_SEED),
            game_id: None,
        }
    }
}

const DEFAULT_PLAYERS: usize = 2;
const DEFAULT_DICE_PER_PLAYER: u8 = 5;
const DEFAULT_MAX_TURNS: u32 = 64;
const DEFAULT_SEED: u64 = 69;

/// Builder for [`GameConfig`]; also the serialized config document shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfigBuilder {
    /// Defaults to the distribution length; checked against it when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_players: Option<usize>,
    pub dice_distribution: Vec<u8>,
    /// Checked against the distribution sum when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_dice: Option<u32>,
    pub faces: FaceRange,
    pub ones_wild: bool,
    pub bid_ordering: BidOrdering,
    pub max_turns: u32,
    pub rng_seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
}

impl Default for GameConfigBuilder {
    fn default() -> Self {
        Self {
            num_players: None,
            dice_distribution: vec![DEFAULT_DICE_PER_PLAYER; DEFAULT_PLAYERS],
            total_dice: None,
            faces: FaceRange::SIX_SIDED,
            ones_wild: false,
            bid_ordering: BidOrdering::QuantityThenFace,
            max_turns: DEFAULT_MAX_TURNS,
            rng_seed: Some(DEFAULT_SEED),
            game_id: None,
        }
    }
}

impl GameConfigBuilder {
    /// Set the number of players; the distribution must agree.
    #[must_use]
    pub fn num_players(mut self, num_players: usize) -> Self {
        self.num_players = Some(num_players);
        self
    }

    /// Give every one of `num_players` the same number of dice.
    #[must_use]
    pub fn dice_per_player(mut self, num_players: usize, dice: u8) -> Self {
        self.num_players = Some(num_players);
        self.dice_distribution = vec![dice; num_players];
        self
    }

    /// Set per-seat starting dice.
    #[must_use]
    pub fn dice_distribution(mut self, distribution: Vec<u8>) -> Self {
        self.dice_distribution = distribution;
        self
    }

    /// Declare the total dice; construction fails if the distribution disagrees.
    #[must_use]
    pub fn total_dice(mut self, total: u32) -> Self {
        self.total_dice = Some(total);
        self
    }

    #[must_use]
    pub fn faces(mut self, faces: FaceRange) -> Self {
        self.faces = faces;
        self
    }

    #[must_use]
    pub fn ones_wild(mut self, ones_wild: bool) -> Self {
        self.ones_wild = ones_wild;
        self
    }

    #[must_use]
    pub fn bid_ordering(mut self, ordering: BidOrdering) -> Self {
        self.bid_ordering = ordering;
        self
    }

    #[must_use]
    pub fn max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Use nondeterministic entropy for dice.
    #[must_use]
    pub fn unseeded(mut self) -> Self {
        self.rng_seed = None;
        self
    }

    #[must_use]
    pub fn game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        let num_players = self.num_players.unwrap_or(self.dice_distribution.len());
        if !(2..=255).contains(&num_players) {
            return Err(ConfigError::PlayerCount { got: num_players });
        }
        if self.dice_distribution.len() != num_players {
            return Err(ConfigError::DistributionLength {
                num_players,
                distribution_len: self.dice_distribution.len(),
            });
        }
        if let Some(pos) = self.dice_distribution.iter().position(|&d| d == 0) {
            return Err(ConfigError::PlayerWithoutDice {
                player: PlayerId::new(pos as u8),
            });
        }

        let actual: u32 = self.dice_distribution.iter().map(|&d| u32::from(d)).sum();
        if let Some(declared) = self.total_dice {
            if declared != actual {
                return Err(ConfigError::DistributionMismatch { declared, actual });
            }
        }

        let (min, max) = (self.faces.min(), self.faces.max());
        if min == 0 {
            return Err(ConfigError::ZeroFace { min });
        }
        if self.faces.is_empty() {
            return Err(ConfigError::EmptyFaceRange { min, max });
        }
        if self.ones_wild && !self.faces.contains(WILD_FACE) {
            return Err(ConfigError::WildFaceOutOfRange { min });
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroMaxTurns);
        }

        Ok(GameConfig {
            dice_distribution: PlayerMap::from_vec(self.dice_distribution),
            total_dice: actual,
            faces: self.faces,
            ones_wild: self.ones_wild,
            bid_ordering: self.bid_ordering,
            max_turns: self.max_turns,
            rng_seed: self.rng_seed,
            game_id: self.game_id,
        })
    }
}

impl TryFrom<GameConfigBuilder> for GameConfig {
    type Error = ConfigError;

    fn try_from(builder: GameConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<GameConfig> for GameConfigBuilder {
    fn from(config: GameConfig) -> Self {
        Self {
            num_players: Some(config.num_players()),
            total_dice: Some(config.total_dice),
            dice_distribution: config.dice_distribution.into_vec(),
            faces: config.faces,
            ones_wild: config.ones_wild,
            bid_ordering: config.bid_ordering,
            max_turns: config.max_turns,
            rng_seed: config.rng_seed,
            game_id: config.game_id,
        }
    }
}
