// Strategy registry: the named pick-selection policies and their shared filters.

pub mod archetype;
pub mod heuristics;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::draft::player::rank_key;
use crate::draft::{Player, PlayerId, Position, TeamRoster};
use crate::variability::apply_variability;

/// Round after which a team holding one QB may take a backup.
const BACKUP_QB_ROUND: u32 = 9;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every selectable strategy. Stateless: all configuration is fixed per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    BestAvailable,
    TierBased,
    PositionalNeed,
    Balanced,
    WrHeavy,
    RbHeavy,
    HeroRb,
    HeroWr,
    ZeroRb,
    LateQb,
    EarlyQb,
}

/// Public description of a registered strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl StrategyKind {
    /// Registry order; also the pool simulated teams draw from.
    pub const ALL: [StrategyKind; 11] = [
        StrategyKind::BestAvailable,
        StrategyKind::PositionalNeed,
        StrategyKind::TierBased,
        StrategyKind::Balanced,
        StrategyKind::WrHeavy,
        StrategyKind::RbHeavy,
        StrategyKind::HeroRb,
        StrategyKind::HeroWr,
        StrategyKind::ZeroRb,
        StrategyKind::LateQb,
        StrategyKind::EarlyQb,
    ];

    /// Registry key used on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            StrategyKind::BestAvailable => "bpa",
            StrategyKind::TierBased => "tier",
            StrategyKind::PositionalNeed => "positional",
            StrategyKind::Balanced => "balanced",
            StrategyKind::WrHeavy => "wr_heavy",
            StrategyKind::RbHeavy => "rb_heavy",
            StrategyKind::HeroRb => "hero_rb",
            StrategyKind::HeroWr => "hero_wr",
            StrategyKind::ZeroRb => "zero_rb",
            StrategyKind::LateQb => "late_qb",
            StrategyKind::EarlyQb => "early_qb",
        }
    }

    /// Human-readable name, used in pick reasoning.
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::BestAvailable => "Best Player Available",
            StrategyKind::TierBased => "Tier Based",
            StrategyKind::PositionalNeed => "Positional Need",
            StrategyKind::Balanced => "Balanced",
            StrategyKind::WrHeavy => "WR Heavy",
            StrategyKind::RbHeavy => "RB Heavy",
            StrategyKind::HeroRb => "Hero RB",
            StrategyKind::HeroWr => "Hero WR",
            StrategyKind::ZeroRb => "Zero RB",
            StrategyKind::LateQb => "Late QB",
            StrategyKind::EarlyQb => "Early QB",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::BestAvailable => {
                "Always draft the highest-ranked available player who can fill a roster spot"
            }
            StrategyKind::TierBased => {
                "Prioritize players from the best available tier, then by rank within tier"
            }
            StrategyKind::PositionalNeed => {
                "Draft based on roster needs and positional scarcity"
            }
            StrategyKind::Balanced => {
                "Balance between best player available and positional need"
            }
            StrategyKind::WrHeavy => "Prioritize WR early and often to build receiving corps",
            StrategyKind::RbHeavy => "Load up on RBs early to secure backfield depth",
            StrategyKind::HeroRb => "Take elite RB early, then focus on WR/TE",
            StrategyKind::HeroWr => "Take elite WR early, then focus on RB/TE depth",
            StrategyKind::ZeroRb => "Wait on RB while focusing on WR/TE early",
            StrategyKind::LateQb => {
                "Wait on QB until later rounds while building skill positions"
            }
            StrategyKind::EarlyQb => {
                "Secure elite QB early before building other positions"
            }
        }
    }

    pub fn info(&self) -> StrategyInfo {
        StrategyInfo {
            key: self.key(),
            name: self.display_name(),
            description: self.description(),
        }
    }

    /// Look up a strategy by registry key, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|s| s.key() == name)
    }

    /// Draw a strategy uniformly from the registry.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL
            .choose(rng)
            .unwrap_or(&StrategyKind::BestAvailable)
    }

    /// The strategy's top choice, with no variability applied.
    ///
    /// Returns `None` when no available player can be rostered.
    pub fn select(&self, available: &[Player], roster: &TeamRoster) -> Option<PlayerId> {
        let draftable = draftable_players(available, roster);
        if let Some(forced) = forced_pick(&draftable, roster) {
            return Some(forced.id);
        }
        self.select_from(&draftable, roster).map(|p| p.id)
    }

    /// The strategy's choice after variability has been applied.
    ///
    /// A forced DST/K pick is returned as-is; variability only reshuffles
    /// unforced choices.
    pub fn select_with_variability<R: Rng + ?Sized>(
        &self,
        available: &[Player],
        roster: &TeamRoster,
        variability: f64,
        rng: &mut R,
    ) -> Option<PlayerId> {
        let draftable = draftable_players(available, roster);
        if let Some(forced) = forced_pick(&draftable, roster) {
            return Some(forced.id);
        }
        let optimal = self.select_from(&draftable, roster)?;
        Some(apply_variability(&draftable, optimal.id, variability, rng))
    }

    fn select_from<'a>(&self, draftable: &[&'a Player], roster: &TeamRoster) -> Option<&'a Player> {
        match self {
            StrategyKind::BestAvailable => heuristics::best_available(draftable),
            StrategyKind::TierBased => heuristics::tier_based(draftable),
            StrategyKind::PositionalNeed => heuristics::positional_need(draftable, roster),
            StrategyKind::Balanced => heuristics::balanced(draftable, roster),
            StrategyKind::WrHeavy => archetype::select(archetype::WR_HEAVY, draftable, roster),
            StrategyKind::RbHeavy => archetype::select(archetype::RB_HEAVY, draftable, roster),
            StrategyKind::HeroRb => archetype::select(archetype::HERO_RB, draftable, roster),
            StrategyKind::HeroWr => archetype::select(archetype::HERO_WR, draftable, roster),
            StrategyKind::ZeroRb => archetype::select(archetype::ZERO_RB, draftable, roster),
            StrategyKind::LateQb => archetype::select(archetype::LATE_QB, draftable, roster),
            StrategyKind::EarlyQb => archetype::select(archetype::EARLY_QB, draftable, roster),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Descriptions of every registered strategy, in registry order.
pub fn list_strategies() -> Vec<StrategyInfo> {
    StrategyKind::ALL.iter().map(StrategyKind::info).collect()
}

// ---------------------------------------------------------------------------
// Shared filters
// ---------------------------------------------------------------------------

/// Players whose position the roster can still absorb, in input order.
pub fn draftable_players<'a>(available: &'a [Player], roster: &TeamRoster) -> Vec<&'a Player> {
    available
        .iter()
        .filter(|p| roster.can_fill_position(p.position))
        .collect()
}

/// Whether the roster may take a quarterback now.
///
/// A first QB is always allowed. A second is allowed only after round 9 and
/// only while a slot can take it. Never a third.
pub(crate) fn quarterback_allowed(roster: &TeamRoster) -> bool {
    match roster.count_position(Position::Quarterback) {
        0 => true,
        1 => {
            roster.round_number() > BACKUP_QB_ROUND
                && roster.can_fill_position(Position::Quarterback)
        }
        _ => false,
    }
}

/// Draftable skill players, honoring the QB scarcity rule.
pub(crate) fn skill_candidates<'a>(draftable: &[&'a Player], roster: &TeamRoster) -> Vec<&'a Player> {
    let qb_ok = quarterback_allowed(roster);
    draftable
        .iter()
        .copied()
        .filter(|p| p.position.is_skill())
        .filter(|p| p.position != Position::Quarterback || qb_ok)
        .collect()
}

/// Lowest-ranked player among `candidates`.
pub(crate) fn best_by_rank<'a>(candidates: &[&'a Player]) -> Option<&'a Player> {
    candidates.iter().copied().min_by_key(|p| rank_key(p))
}

/// Lowest-ranked player at `pos` among `candidates`.
pub(crate) fn best_at<'a>(candidates: &[&'a Player], pos: Position) -> Option<&'a Player> {
    candidates
        .iter()
        .copied()
        .filter(|p| p.position == pos)
        .min_by_key(|p| rank_key(p))
}

/// DST/K pick the roster cannot avoid, if any.
///
/// Falls back to the other of the two when the required position has no
/// draftable player but is still unmet as well.
fn forced_pick<'a>(draftable: &[&'a Player], roster: &TeamRoster) -> Option<&'a Player> {
    let required = roster.required_dst_k_position()?;
    if let Some(player) = best_at(draftable, required) {
        return Some(player);
    }
    let other = if required == Position::Defense {
        Position::Kicker
    } else {
        Position::Defense
    };
    if roster.unmet_requirement(other) > 0 {
        best_at(draftable, other)
    } else {
        None
    }
}
