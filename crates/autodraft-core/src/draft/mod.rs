// Draft domain model: players, rosters and turn order.

pub mod player;
pub mod roster;
pub mod schedule;

pub use player::{Player, PlayerId, Position, PLAYING_POSITIONS};
pub use roster::{RosterRequirements, RosterSlot, TeamId, TeamRoster};
pub use schedule::{round_for_pick, team_for_pick, DraftStyle};
