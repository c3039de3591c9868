//! Competitive ranks and their provider sub-tier ranges.

use serde::{Deserialize, Serialize};

/// Competitive skill tier used as the replay search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Champion,
    GrandChampion,
}

/// Inclusive `min-rank`/`max-rank` labels for one [`Rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    pub min: &'static str,
    pub max: &'static str,
}

/// Sub-tier labels, indexed by `Rank as usize`.
static RANK_RANGES: [RankRange; 7] = [
    RankRange { min: "bronze-1", max: "bronze-3" },
    RankRange { min: "silver-1", max: "silver-3" },
    RankRange { min: "gold-1", max: "gold-3" },
    RankRange { min: "platinum-1", max: "platinum-3" },
    RankRange { min: "diamond-1", max: "diamond-3" },
    RankRange { min: "champion-1", max: "champion-3" },
    RankRange { min: "grand-champion", max: "grand-champion" },
];

impl Rank {
    /// All ranks, lowest first.
    pub const ALL: [Rank; 7] = [
        Rank::Bronze,
        Rank::Silver,
        Rank::Gold,
        Rank::Platinum,
        Rank::Diamond,
        Rank::Champion,
        Rank::GrandChampion,
    ];

    /// Map a 1-based ordinal (1 = Bronze, 7 = Grand Champion).
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1..=7 => Some(Self::ALL[usize::from(ordinal - 1)]),
            _ => None,
        }
    }

    /// 1-based ordinal of this rank.
    pub fn ordinal(&self) -> u8 {
        *self as u8 + 1
    }

    /// Provider sub-tier range for this rank.
    pub fn range(&self) -> RankRange {
        RANK_RANGES[*self as usize]
    }

    /// Label used in output directory names.
    pub fn label(&self) -> &'static str {
        match self {
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
            Rank::Diamond => "Diamond",
            Rank::Champion => "Champion",
            Rank::GrandChampion => "GrandChampion",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
