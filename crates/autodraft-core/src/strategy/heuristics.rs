// Value- and need-driven strategies: BPA, tiers, positional need, balanced.

use std::cmp::Reverse;

use super::{best_at, best_by_rank};
use crate::draft::player::tier_key;
use crate::draft::{Player, TeamRoster};

/// Weight of rank value in the balanced score.
const VALUE_WEIGHT: f64 = 0.6;
/// Weight of positional need in the balanced score.
const NEED_WEIGHT: f64 = 0.4;

/// Best player available: minimum rank.
pub fn best_available<'a>(draftable: &[&'a Player]) -> Option<&'a Player> {
    best_by_rank(draftable)
}

/// Best (tier, rank) among tiered players, falling back to BPA when no
/// candidate carries a tier.
pub fn tier_based<'a>(draftable: &[&'a Player]) -> Option<&'a Player> {
    draftable
        .iter()
        .copied()
        .filter_map(|p| tier_key(p).map(|key| (key, p)))
        .min_by_key(|(key, _)| *key)
        .map(|(_, p)| p)
        .or_else(|| best_available(draftable))
}

/// Best player at the neediest position that still has candidates.
///
/// Positions are visited by descending need priority; equal priorities keep
/// the QB, RB, WR, TE, DST, K order.
pub fn positional_need<'a>(draftable: &[&'a Player], roster: &TeamRoster) -> Option<&'a Player> {
    let mut priorities = roster.position_need_priority();
    priorities.sort_by_key(|&(_, priority)| Reverse(priority));

    priorities
        .iter()
        .filter(|(_, priority)| *priority > 0)
        .find_map(|&(pos, _)| best_at(draftable, pos))
        .or_else(|| best_available(draftable))
}

/// Blend of rank value and positional need.
///
/// `score = 0.6 * (max_rank - rank + 1) / max_rank + 0.4 * need / 100`, where
/// `max_rank` is taken over the candidates. First candidate wins ties.
pub fn balanced<'a>(draftable: &[&'a Player], roster: &TeamRoster) -> Option<&'a Player> {
    let max_rank = draftable.iter().map(|p| p.rank).max()?.max(1) as f64;

    let mut best: Option<(&Player, f64)> = None;
    for &player in draftable {
        let value = (max_rank - player.rank as f64 + 1.0) / max_rank;
        let need = roster.need_priority(player.position) as f64 / 100.0;
        let score = VALUE_WEIGHT * value + NEED_WEIGHT * need;
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((player, score));
        }
    }
    best.map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{PlayerId, Position, RosterRequirements};
    use crate::strategy::draftable_players;

    fn player(id: PlayerId, pos: Position, rank: u32, tier: Option<u32>) -> Player {
        Player {
            id,
            name: format!("Player {id}"),
            position: pos,
            team: "FA".to_string(),
            rank,
            tier,
        }
    }

    fn standard_roster() -> TeamRoster {
        TeamRoster::new(1, "Team 1", &RosterRequirements::default())
    }

    #[test]
    fn bpa_picks_minimum_rank_regardless_of_order() {
        let pool = vec![
            player(3, Position::WideReceiver, 9, None),
            player(1, Position::RunningBack, 2, None),
            player(2, Position::TightEnd, 5, None),
        ];
        let roster = standard_roster();
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(best_available(&draftable).map(|p| p.id), Some(1));
    }

    #[test]
    fn bpa_skips_unfillable_positions() {
        let req = RosterRequirements {
            qb: 0,
            rb: 1,
            wr: 0,
            te: 0,
            flex: 0,
            dst: 0,
            k: 0,
            bench: 0,
        };
        let roster = TeamRoster::new(1, "T", &req);
        let pool = vec![
            player(1, Position::Quarterback, 1, None),
            player(2, Position::RunningBack, 8, None),
        ];
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(best_available(&draftable).map(|p| p.id), Some(2));
    }

    #[test]
    fn tier_prefers_tier_over_rank() {
        let pool = vec![
            player(1, Position::RunningBack, 1, Some(2)),
            player(2, Position::WideReceiver, 4, Some(1)),
            player(3, Position::WideReceiver, 3, Some(1)),
            player(4, Position::TightEnd, 2, None),
        ];
        let roster = standard_roster();
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(tier_based(&draftable).map(|p| p.id), Some(3));
    }

    #[test]
    fn tier_without_tiers_equals_bpa() {
        let pool = vec![
            player(1, Position::RunningBack, 7, None),
            player(2, Position::WideReceiver, 3, None),
            player(3, Position::Kicker, 11, None),
        ];
        let roster = standard_roster();
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(
            tier_based(&draftable).map(|p| p.id),
            best_available(&draftable).map(|p| p.id)
        );
    }

    #[test]
    fn positional_need_takes_highest_priority_position() {
        let mut roster = standard_roster();
        roster.add_player(player(10, Position::Quarterback, 10, None));
        // RB and WR both at 20; RB comes first in enumeration order.
        let pool = vec![
            player(1, Position::WideReceiver, 1, None),
            player(2, Position::RunningBack, 5, None),
            player(3, Position::RunningBack, 4, None),
        ];
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(positional_need(&draftable, &roster).map(|p| p.id), Some(3));
    }

    #[test]
    fn positional_need_skips_positions_without_candidates() {
        let roster = standard_roster();
        let pool = vec![
            player(1, Position::TightEnd, 30, None),
            player(2, Position::Kicker, 2, None),
        ];
        let draftable = draftable_players(&pool, &roster);
        // RB/WR (20) and QB (10) have no candidates; TE is the next at 10.
        assert_eq!(positional_need(&draftable, &roster).map(|p| p.id), Some(1));
    }

    #[test]
    fn positional_need_falls_back_to_bpa() {
        let req = RosterRequirements {
            qb: 0,
            rb: 0,
            wr: 0,
            te: 0,
            flex: 0,
            dst: 0,
            k: 0,
            bench: 2,
        };
        let roster = TeamRoster::new(1, "T", &req);
        let pool = vec![
            player(1, Position::TightEnd, 30, None),
            player(2, Position::Kicker, 2, None),
        ];
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(positional_need(&draftable, &roster).map(|p| p.id), Some(2));
    }

    #[test]
    fn balanced_weighs_need_against_value() {
        let mut roster = standard_roster();
        roster.add_player(player(10, Position::Quarterback, 10, None));
        // QB need is now 0, RB need is 20.
        // QB rank 1: 0.6 * 10/10 + 0 = 0.60
        // RB rank 3: 0.6 * 8/10 + 0.4 * 0.2 = 0.56
        // RB rank 2: 0.6 * 9/10 + 0.4 * 0.2 = 0.62
        let pool = vec![
            player(1, Position::Quarterback, 1, None),
            player(2, Position::RunningBack, 3, None),
            player(3, Position::RunningBack, 2, None),
            player(4, Position::Kicker, 10, None),
        ];
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(balanced(&draftable, &roster).map(|p| p.id), Some(3));
    }

    #[test]
    fn balanced_ties_keep_first_encountered() {
        let roster = standard_roster();
        // Same rank and same need: scores are identical.
        let pool = vec![
            player(7, Position::WideReceiver, 4, None),
            player(8, Position::WideReceiver, 4, None),
        ];
        let draftable = draftable_players(&pool, &roster);
        assert_eq!(balanced(&draftable, &roster).map(|p| p.id), Some(7));
    }

    #[test]
    fn balanced_empty_pool_selects_nothing() {
        let roster = standard_roster();
        assert!(balanced(&[], &roster).is_none());
    }
}
