// Player records and football positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable player identifier, unique within a draft run.
pub type PlayerId = u64;

/// Football positions, covering both player positions and roster slot types.
///
/// `Flex` and `Bench` only ever appear as slot types; every player carries
/// one of the six playing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "DST", alias = "D/ST", alias = "DEF")]
    Defense,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "BENCH", alias = "BE", alias = "BN")]
    Bench,
}

/// The six positions a player can hold, in need-priority enumeration order.
pub const PLAYING_POSITIONS: [Position; 6] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Defense,
    Position::Kicker,
];

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Accepts the usual abbreviations case-insensitively, plus "D/ST"/"DEF"
    /// for defenses and "BE"/"BN" for the bench.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "FLEX" => Some(Position::Flex),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            "K" => Some(Position::Kicker),
            "BENCH" | "BE" | "BN" => Some(Position::Bench),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Flex => "FLEX",
            Position::Defense => "DST",
            Position::Kicker => "K",
            Position::Bench => "BENCH",
        }
    }

    /// Skill positions: QB, RB, WR and TE.
    pub fn is_skill(&self) -> bool {
        matches!(
            self,
            Position::Quarterback
                | Position::RunningBack
                | Position::WideReceiver
                | Position::TightEnd
        )
    }

    /// Positions a FLEX slot accepts.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Whether this is a meta-slot (not a concrete playing position).
    pub fn is_meta_slot(&self) -> bool {
        matches!(self, Position::Flex | Position::Bench)
    }

    /// Deterministic ordering index for roster slot layout.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Flex => 4,
            Position::Defense => 5,
            Position::Kicker => 6,
            Position::Bench => 7,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// An undrafted (or rostered) player as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation. Empty if not supplied.
    #[serde(default)]
    pub team: String,
    /// Overall rank, 1 is best.
    pub rank: u32,
    /// Optional tier, 1 is best.
    #[serde(default)]
    pub tier: Option<u32>,
}

/// Ordering key used for every rank comparison: ascending rank, then id so
/// duplicate ranks in malformed input still resolve deterministically.
pub(crate) fn rank_key(player: &Player) -> (u32, PlayerId) {
    (player.rank, player.id)
}

/// Ordering key for tier comparisons: ascending tier, then rank.
pub(crate) fn tier_key(player: &Player) -> Option<(u32, u32, PlayerId)> {
    player.tier.map(|tier| (tier, player.rank, player.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("QB"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_str_pos("WR"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TightEnd));
        assert_eq!(Position::from_str_pos("K"), Some(Position::Kicker));
    }

    #[test]
    fn from_str_pos_aliases() {
        assert_eq!(Position::from_str_pos("DST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("BE"), Some(Position::Bench));
        assert_eq!(Position::from_str_pos("BN"), Some(Position::Bench));
    }

    #[test]
    fn from_str_pos_case_insensitive() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos(" flex "), Some(Position::Flex));
        assert_eq!(Position::from_str_pos("Bench"), Some(Position::Bench));
    }

    #[test]
    fn from_str_pos_invalid() {
        assert_eq!(Position::from_str_pos("XX"), None);
        assert_eq!(Position::from_str_pos(""), None);
        assert_eq!(Position::from_str_pos("SP"), None);
    }

    #[test]
    fn display_str_roundtrip() {
        let positions = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Flex,
            Position::Defense,
            Position::Kicker,
            Position::Bench,
        ];
        for pos in positions {
            let s = pos.display_str();
            assert_eq!(Position::from_str_pos(s), Some(pos), "Roundtrip failed for {}", s);
        }
    }

    #[test]
    fn skill_and_flex_eligibility() {
        assert!(Position::Quarterback.is_skill());
        assert!(!Position::Quarterback.is_flex_eligible());
        for pos in [Position::RunningBack, Position::WideReceiver, Position::TightEnd] {
            assert!(pos.is_skill());
            assert!(pos.is_flex_eligible());
        }
        assert!(!Position::Defense.is_skill());
        assert!(!Position::Kicker.is_flex_eligible());
        assert!(Position::Flex.is_meta_slot());
        assert!(Position::Bench.is_meta_slot());
        assert!(!Position::Defense.is_meta_slot());
    }

    #[test]
    fn player_deserializes_from_caller_json() {
        let json = r#"{"id": 7, "name": "Josh Allen", "position": "QB", "team": "BUF", "rank": 1, "tier": 1}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.id, 7);
        assert_eq!(player.position, Position::Quarterback);
        assert_eq!(player.tier, Some(1));
    }

    #[test]
    fn player_tier_and_team_optional() {
        let json = r#"{"id": 3, "name": "Bills D/ST", "position": "D/ST", "rank": 140}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.position, Position::Defense);
        assert!(player.tier.is_none());
        assert!(player.team.is_empty());
    }

    #[test]
    fn position_serializes_as_abbreviation() {
        assert_eq!(serde_json::to_string(&Position::Defense).unwrap(), "\"DST\"");
        assert_eq!(serde_json::to_string(&Position::Bench).unwrap(), "\"BENCH\"");
    }
}
