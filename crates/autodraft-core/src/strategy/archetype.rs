// Roster-archetype strategies expressed as ordered rule tables.
//
// Each archetype is a strict if-chain: the first rule whose condition holds
// and whose target position has a candidate wins. When no rule produces a
// player, the best-ranked skill candidate is taken.

use super::{best_at, best_by_rank, skill_candidates};
use crate::draft::{Player, Position, TeamRoster};

use crate::draft::Position::{
    Quarterback as QB, RunningBack as RB, TightEnd as TE, WideReceiver as WR,
};

/// Roster snapshot the rule conditions read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterCounts {
    pub round: u32,
    pub qb: usize,
    pub rb: usize,
    pub wr: usize,
    pub te: usize,
}

impl RosterCounts {
    pub fn of(roster: &TeamRoster) -> Self {
        RosterCounts {
            round: roster.round_number(),
            qb: roster.count_position(QB),
            rb: roster.count_position(RB),
            wr: roster.count_position(WR),
            te: roster.count_position(TE),
        }
    }
}

/// One link of an archetype chain.
#[derive(Clone, Copy)]
pub struct Rule {
    pub target: Position,
    pub when: fn(&RosterCounts) -> bool,
}

const fn rule(target: Position, when: fn(&RosterCounts) -> bool) -> Rule {
    Rule { target, when }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

pub const WR_HEAVY: &[Rule] = &[
    rule(WR, |c| c.round <= 6 && c.wr < 3),
    rule(QB, |c| c.qb == 0 && c.round >= 5),
    rule(RB, |c| c.rb == 0 && c.round >= 4),
    rule(WR, |c| c.wr < 5),
];

pub const RB_HEAVY: &[Rule] = &[
    rule(RB, |c| c.round <= 5 && c.rb < 3),
    rule(WR, |c| c.wr < 2),
    rule(QB, |c| c.qb == 0 && c.round >= 5),
    rule(RB, |c| c.rb < 5),
];

pub const HERO_RB: &[Rule] = &[
    rule(RB, |c| c.round == 1),
    rule(WR, |c| c.round <= 6 && c.rb >= 1 && c.wr < 3),
    rule(TE, |c| c.round <= 6 && c.rb >= 1 && c.te < 2),
    rule(QB, |c| c.qb == 0 && c.round >= 5),
];

pub const HERO_WR: &[Rule] = &[
    rule(WR, |c| c.round == 1),
    rule(RB, |c| c.round <= 6 && c.wr >= 1 && c.rb < 3),
    rule(TE, |c| c.round <= 6 && c.wr >= 1 && c.te < 2),
    rule(WR, |c| c.round <= 6 && c.wr >= 1 && c.wr < 2),
    rule(QB, |c| c.qb == 0 && (4..=8).contains(&c.round)),
    rule(RB, |c| c.rb < 4),
    rule(WR, |c| c.wr < 4),
];

pub const ZERO_RB: &[Rule] = &[
    rule(WR, |c| c.round <= 5 && c.wr < 3),
    rule(TE, |c| c.round <= 5 && c.te < 2),
    rule(QB, |c| c.qb == 0 && (4..=7).contains(&c.round)),
    rule(RB, |c| c.round >= 6 && c.rb < 2),
];

pub const LATE_QB: &[Rule] = &[
    rule(RB, |c| c.round <= 7 && c.qb == 0 && c.rb < 2),
    rule(WR, |c| c.round <= 7 && c.qb == 0 && c.wr < 3),
    rule(TE, |c| c.round <= 7 && c.qb == 0 && c.te < 1),
    rule(QB, |c| c.qb == 0 && c.round >= 8),
];

pub const EARLY_QB: &[Rule] = &[
    rule(QB, |c| c.round <= 3 && c.qb == 0),
    rule(RB, |c| c.rb < 2),
    rule(WR, |c| c.wr < 3),
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Run an archetype chain against the draftable pool.
///
/// Rules only ever target skill players; the QB scarcity rule applies to
/// every QB target. If no skill player is draftable at all, the best-ranked
/// draftable player is taken instead.
pub fn select<'a>(rules: &[Rule], draftable: &[&'a Player], roster: &TeamRoster) -> Option<&'a Player> {
    let candidates = skill_candidates(draftable, roster);
    if candidates.is_empty() {
        return best_by_rank(draftable);
    }

    let counts = RosterCounts::of(roster);
    rules
        .iter()
        .filter(|r| (r.when)(&counts))
        .find_map(|r| best_at(&candidates, r.target))
        .or_else(|| best_by_rank(&candidates))
}
