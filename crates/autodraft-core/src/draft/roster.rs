// Roster construction, slot assignment and need queries.

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerId, Position, PLAYING_POSITIONS};

/// Team identifier. Teams are numbered `1..=num_teams` in draft order.
pub type TeamId = u32;

/// Number of slots of each type on a roster.
///
/// Keyed by the closed set of slot types rather than an open string map, so
/// a misspelled position cannot silently create an unusable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterRequirements {
    #[serde(rename = "QB")]
    pub qb: usize,
    #[serde(rename = "RB")]
    pub rb: usize,
    #[serde(rename = "WR")]
    pub wr: usize,
    #[serde(rename = "TE")]
    pub te: usize,
    #[serde(rename = "FLEX")]
    pub flex: usize,
    #[serde(rename = "DST")]
    pub dst: usize,
    #[serde(rename = "K")]
    pub k: usize,
    #[serde(rename = "BENCH")]
    pub bench: usize,
}

impl Default for RosterRequirements {
    /// Standard 15-man roster: QB, 2 RB, 2 WR, TE, FLEX, DST, K, 6 bench.
    fn default() -> Self {
        RosterRequirements {
            qb: 1,
            rb: 2,
            wr: 2,
            te: 1,
            flex: 1,
            dst: 1,
            k: 1,
            bench: 6,
        }
    }
}

impl RosterRequirements {
    /// Slot count for a slot type.
    pub fn slots(&self, pos: Position) -> usize {
        match pos {
            Position::Quarterback => self.qb,
            Position::RunningBack => self.rb,
            Position::WideReceiver => self.wr,
            Position::TightEnd => self.te,
            Position::Flex => self.flex,
            Position::Defense => self.dst,
            Position::Kicker => self.k,
            Position::Bench => self.bench,
        }
    }

    /// Total number of slots.
    pub fn total(&self) -> usize {
        self.qb + self.rb + self.wr + self.te + self.flex + self.dst + self.k + self.bench
    }
}

/// A single slot on a team's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSlot {
    /// The slot type.
    pub position: Position,
    /// The player occupying this slot, if any.
    #[serde(default)]
    pub player: Option<Player>,
}

impl RosterSlot {
    pub fn is_filled(&self) -> bool {
        self.player.is_some()
    }
}

/// A team's complete roster of slots.
///
/// Wire shape matches what draft front-ends send:
/// `{"id": 1, "name": "Team 1", "roster": [{"position": "QB", "player": null}, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    #[serde(rename = "id")]
    pub team_id: TeamId,
    #[serde(rename = "name", default)]
    pub team_name: String,
    #[serde(rename = "roster")]
    pub slots: Vec<RosterSlot>,
}

impl TeamRoster {
    /// Create an empty roster from slot requirements.
    ///
    /// Slots are created in deterministic order based on `Position::sort_order()`.
    pub fn new(team_id: TeamId, team_name: &str, requirements: &RosterRequirements) -> Self {
        let mut slot_types = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Flex,
            Position::Defense,
            Position::Kicker,
            Position::Bench,
        ];
        slot_types.sort_by_key(|p| p.sort_order());

        let slots = slot_types
            .iter()
            .flat_map(|&pos| {
                std::iter::repeat_with(move || RosterSlot {
                    position: pos,
                    player: None,
                })
                .take(requirements.slots(pos))
            })
            .collect();

        TeamRoster {
            team_id,
            team_name: team_name.to_string(),
            slots,
        }
    }

    /// Count of empty slots of any type.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_filled()).count()
    }

    /// Count of empty slots of the given type.
    pub fn empty_slots_by_position(&self, pos: Position) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position == pos && !s.is_filled())
            .count()
    }

    /// Filled slots of the given type.
    pub fn filled_slots_by_position(&self, pos: Position) -> impl Iterator<Item = &RosterSlot> + '_ {
        self.slots
            .iter()
            .filter(move |s| s.position == pos && s.is_filled())
    }

    /// Total number of slots of the given type, filled or not.
    pub fn slot_count(&self, pos: Position) -> usize {
        self.slots.iter().filter(|s| s.position == pos).count()
    }

    /// Whether a player at `pos` can still be rostered.
    ///
    /// True if there is an empty slot of that exact type, or an empty FLEX
    /// for RB/WR/TE, or any empty bench slot.
    pub fn can_fill_position(&self, pos: Position) -> bool {
        if self.empty_slots_by_position(pos) > 0 {
            return true;
        }
        if pos.is_flex_eligible() && self.empty_slots_by_position(Position::Flex) > 0 {
            return true;
        }
        self.empty_slots_by_position(Position::Bench) > 0
    }

    /// How many rostered players play `pos`, wherever they are slotted.
    pub fn count_position(&self, pos: Position) -> usize {
        let direct = self.filled_slots_by_position(pos).count();
        let holding = |slot_type: Position| {
            self.filled_slots_by_position(slot_type)
                .filter(|s| s.player.as_ref().is_some_and(|p| p.position == pos))
                .count()
        };
        if pos.is_meta_slot() {
            return direct;
        }
        direct + holding(Position::Flex) + holding(Position::Bench)
    }

    /// Need priority for each playing position, in enumeration order.
    ///
    /// 10 points per empty slot of the position. RB/WR/TE with no empty
    /// direct slot instead score 5 points per empty FLEX slot.
    pub fn position_need_priority(&self) -> [(Position, u32); 6] {
        let flex_open = self.empty_slots_by_position(Position::Flex) as u32;
        PLAYING_POSITIONS.map(|pos| {
            let empty = self.empty_slots_by_position(pos) as u32;
            let priority = if pos.is_flex_eligible() && empty == 0 {
                flex_open * 5
            } else {
                empty * 10
            };
            (pos, priority)
        })
    }

    /// Need priority for a single position; zero for slot-only types.
    pub fn need_priority(&self, pos: Position) -> u32 {
        self.position_need_priority()
            .iter()
            .find(|(p, _)| *p == pos)
            .map_or(0, |(_, priority)| *priority)
    }

    /// The round this team is drafting in: one more than its filled slots.
    pub fn round_number(&self) -> u32 {
        self.filled_count() as u32 + 1
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_filled()).count()
    }

    /// Total number of slots.
    pub fn total_count(&self) -> usize {
        self.slots.len()
    }

    /// Fraction of slots filled, 0.0 for a roster with no slots.
    pub fn completion(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.filled_count() as f64 / self.total_count() as f64
    }

    /// Slots of type `pos` not yet covered by a rostered player at `pos`.
    pub fn unmet_requirement(&self, pos: Position) -> usize {
        self.slot_count(pos).saturating_sub(self.count_position(pos))
    }

    /// True when every remaining pick is needed for DST/K.
    pub fn must_draft_dst_or_k(&self) -> bool {
        let unmet =
            self.unmet_requirement(Position::Defense) + self.unmet_requirement(Position::Kicker);
        unmet > 0 && self.empty_slots() == unmet
    }

    /// The position that has to be drafted now, if any.
    ///
    /// DST goes first when both DST and K are still outstanding, which also
    /// covers the last two rounds with both unfilled.
    pub fn required_dst_k_position(&self) -> Option<Position> {
        if !self.must_draft_dst_or_k() {
            return None;
        }
        if self.unmet_requirement(Position::Defense) > 0 {
            Some(Position::Defense)
        } else {
            Some(Position::Kicker)
        }
    }

    /// Whether the player is already on this roster.
    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.slots
            .iter()
            .any(|s| s.player.as_ref().is_some_and(|p| p.id == player_id))
    }

    /// Add a player to the roster.
    ///
    /// Tries an empty slot of the player's own position first, then FLEX
    /// for RB/WR/TE, then BENCH. Slot order only breaks ties within a pass.
    ///
    /// Returns `true` if the player was placed, `false` if no slot accepts them.
    pub fn add_player(&mut self, player: Player) -> bool {
        let pos = player.position;
        let index = self
            .find_empty(|slot| slot == pos)
            .or_else(|| {
                if pos.is_flex_eligible() {
                    self.find_empty(|slot| slot == Position::Flex)
                } else {
                    None
                }
            })
            .or_else(|| self.find_empty(|slot| slot == Position::Bench));

        match index {
            Some(i) => {
                self.slots[i].player = Some(player);
                true
            }
            None => false,
        }
    }

    fn find_empty(&self, accepts: impl Fn(Position) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| !s.is_filled() && accepts(s.position))
    }
}
