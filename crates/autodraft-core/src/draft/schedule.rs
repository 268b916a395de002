// Turn order: which team owns a given overall pick.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::roster::TeamId;

/// Draft rotation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStyle {
    /// Direction reverses every round.
    #[default]
    Snake,
    /// Every round runs 1..=num_teams.
    Linear,
}

impl DraftStyle {
    /// Parse a draft style name. Anything other than "snake" is treated as
    /// linear, matching how draft front-ends label non-snake drafts
    /// ("linear", "standard", "auction-order", ...).
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "snake" => DraftStyle::Snake,
            "linear" => DraftStyle::Linear,
            other => {
                warn!("unknown draft style {:?}, treating as linear", other);
                DraftStyle::Linear
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStyle::Snake => "snake",
            DraftStyle::Linear => "linear",
        }
    }
}

impl fmt::Display for DraftStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team that owns overall pick `pick_number` (1-indexed).
///
/// Teams are numbered `1..=num_teams`. A `num_teams` of zero is treated as a
/// single-team league; callers validate team counts before simulating.
pub fn team_for_pick(pick_number: u32, num_teams: u32, style: DraftStyle) -> TeamId {
    let num_teams = num_teams.max(1);
    let index = pick_number.saturating_sub(1);
    let round = index / num_teams;
    let pos = index % num_teams;
    match style {
        DraftStyle::Snake if round % 2 == 1 => num_teams - pos,
        _ => pos + 1,
    }
}

/// Round (1-indexed) containing overall pick `pick_number`.
pub fn round_for_pick(pick_number: u32, num_teams: u32) -> u32 {
    pick_number.saturating_sub(1) / num_teams.max(1) + 1
}
