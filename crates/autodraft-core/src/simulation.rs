// Draft simulation: play out other teams' picks until the caller is on the clock.

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::draft::{
    round_for_pick, team_for_pick, DraftStyle, Player, PlayerId, TeamId, TeamRoster,
};
use crate::strategy::StrategyKind;

/// Default cap on picks simulated per run.
pub const DEFAULT_MAX_SIMULATED_PICKS: u32 = 20;
/// Variability used for teams the caller did not configure.
pub const DEFAULT_TEAM_VARIABILITY: f64 = 0.3;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Knobs shared by every simulated run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub max_picks: u32,
    pub default_team_variability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_picks: DEFAULT_MAX_SIMULATED_PICKS,
            default_team_variability: DEFAULT_TEAM_VARIABILITY,
        }
    }
}

/// Snapshot of a draft in progress. Never mutated by simulation; every run
/// works on its own clone.
#[derive(Debug, Clone)]
pub struct DraftSetup {
    pub available: Vec<Player>,
    pub teams: BTreeMap<TeamId, TeamRoster>,
    /// Last pick already made; simulation starts at the one after.
    pub current_pick: u32,
    pub my_team_id: TeamId,
    pub num_teams: u32,
    pub style: DraftStyle,
    pub team_variability: BTreeMap<TeamId, f64>,
}

impl DraftSetup {
    /// Variability for `team_id`, or `default` if the caller set none.
    pub fn variability_for(&self, team_id: TeamId, default: f64) -> f64 {
        self.team_variability.get(&team_id).copied().unwrap_or(default)
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The next pick belongs to the caller.
    MyTurn,
    /// No players left in the pool.
    Exhausted,
    /// A simulated team could not select anyone.
    NoSelection,
    /// The per-run pick cap was reached.
    IterationCap,
    /// The next pick belongs to a team with no roster in the setup.
    UnknownTeam,
}

/// One pick made during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedPick {
    pub pick_number: u32,
    pub round: u32,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub strategy: &'static str,
}

/// Result of a single run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Players still undrafted when the run stopped, in input order.
    pub remaining: Vec<Player>,
    pub picks: Vec<SimulatedPick>,
    pub stop: StopReason,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Simulate picks by other teams until the caller's next turn.
///
/// Each simulated team draws a strategy uniformly from the registry and
/// applies its own variability level.
pub fn simulate_until_my_turn<R: Rng + ?Sized>(
    setup: &DraftSetup,
    config: &SimulationConfig,
    rng: &mut R,
) -> SimulationOutcome {
    let mut pool = setup.available.clone();
    let mut teams = setup.teams.clone();
    let mut picks = Vec::new();
    let mut pick_number = setup.current_pick.saturating_add(1);

    let stop = loop {
        if picks.len() as u32 >= config.max_picks {
            break StopReason::IterationCap;
        }
        let team_id = team_for_pick(pick_number, setup.num_teams, setup.style);
        if team_id == setup.my_team_id {
            break StopReason::MyTurn;
        }
        if pool.is_empty() {
            break StopReason::Exhausted;
        }
        let Some(roster) = teams.get_mut(&team_id) else {
            warn!("pick {}: no roster for team {}, stopping simulation", pick_number, team_id);
            break StopReason::UnknownTeam;
        };

        let strategy = StrategyKind::random(rng);
        let variability = setup.variability_for(team_id, config.default_team_variability);
        let Some(player_id) = strategy.select_with_variability(&pool, roster, variability, rng)
        else {
            debug!("pick {}: team {} ({}) found no player", pick_number, team_id, strategy.key());
            break StopReason::NoSelection;
        };
        let Some(index) = pool.iter().position(|p| p.id == player_id) else {
            break StopReason::NoSelection;
        };

        let player = pool.remove(index);
        debug!(
            "pick {}: team {} ({}) takes {} ({}, #{})",
            pick_number,
            team_id,
            strategy.key(),
            player.name,
            player.position,
            player.rank
        );
        if !roster.add_player(player) {
            warn!("pick {}: team {} had no slot for player {}", pick_number, team_id, player_id);
        }
        picks.push(SimulatedPick {
            pick_number,
            round: round_for_pick(pick_number, setup.num_teams),
            team_id,
            player_id,
            strategy: strategy.key(),
        });
        pick_number = pick_number.saturating_add(1);
    };

    debug!("simulation stopped after {} picks: {:?}", picks.len(), stop);
    SimulationOutcome {
        remaining: pool,
        picks,
        stop,
    }
}
