// Request-level operations: pick selection and availability prediction.
//
// Requests arrive as loosely-typed JSON from a draft front-end. Every field
// is optional at the serde layer so absent inputs surface as a structured
// `MissingField` error instead of a generic deserialization failure.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

use crate::availability::estimate_availability;
use crate::draft::{DraftStyle, Player, PlayerId, TeamId, TeamRoster};
use crate::simulation::{DraftSetup, SimulationConfig};
use crate::strategy::StrategyKind;
use crate::variability::clamp_variability;

pub use crate::strategy::{list_strategies, StrategyInfo};

/// Trials run when a prediction request does not specify any.
pub const DEFAULT_TRIALS: u32 = 100;
/// Upper bound on trials per prediction request.
pub const MAX_TRIALS: u32 = 500;

/// Number of taken counts echoed back in prediction diagnostics.
const DEBUG_SAMPLE_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("player {player_id} is not in the available pool")]
    PlayerNotFound { player_id: PlayerId },
}

impl DraftError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DraftError::MissingField { .. } => "missing_field",
            DraftError::InvalidField { .. } => "invalid_field",
            DraftError::UnknownStrategy { .. } => "unknown_strategy",
            DraftError::PlayerNotFound { .. } => "player_not_found",
        }
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, DraftError> {
    value.ok_or(DraftError::MissingField { field })
}

/// Reject slot-only positions and duplicate ids in a player list.
fn validate_players(players: &[Player], field: &'static str) -> Result<(), DraftError> {
    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if player.position.is_meta_slot() {
            return Err(DraftError::InvalidField {
                field,
                message: format!(
                    "player {} has slot-only position {}",
                    player.id, player.position
                ),
            });
        }
        if !seen.insert(player.id) {
            return Err(DraftError::InvalidField {
                field,
                message: format!("duplicate player id {}", player.id),
            });
        }
    }
    Ok(())
}

/// Drop players that already sit on one of `rosters`. Stale boards from a
/// client can lag a pick behind.
fn drop_rostered<'a>(
    available: &mut Vec<Player>,
    rosters: impl IntoIterator<Item = &'a TeamRoster> + Clone,
) {
    available.retain(|player| {
        let owner = rosters.clone().into_iter().find(|r| r.has_player(player.id));
        if let Some(roster) = owner {
            warn!(
                "player {} is already on team {}; removing from the available pool",
                player.id, roster.team_id
            );
        }
        owner.is_none()
    });
}

// ---------------------------------------------------------------------------
// Pick selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectPickRequest {
    #[serde(default)]
    pub available_players: Option<Vec<Player>>,
    #[serde(default)]
    pub team_roster: Option<TeamRoster>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub variability: Option<f64>,
}

/// Outcome of a pick selection. `player_id` is `None` when nothing on the
/// board fits the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickSelection {
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub reasoning: String,
    pub strategy_used: &'static str,
    pub variability_applied: f64,
}

/// Human-readable explanation of a pick.
pub fn pick_reasoning(strategy: StrategyKind, player: &Player, variability: f64) -> String {
    let mut reasoning = format!(
        "{}: Selected {} ({}, Rank #{})",
        strategy.display_name(),
        player.name,
        player.position,
        player.rank
    );
    if let Some(tier) = player.tier {
        reasoning.push_str(&format!(", Tier {}", tier));
    }
    if variability > 0.0 {
        reasoning.push_str(&format!(" (Variability: {}%)", (variability * 100.0) as u32));
    }
    reasoning
}

/// Choose a player for `team_roster` with the named strategy.
pub fn select_pick<R: Rng + ?Sized>(
    request: SelectPickRequest,
    rng: &mut R,
) -> Result<PickSelection, DraftError> {
    let mut available = require(request.available_players, "available_players")?;
    let roster = require(request.team_roster, "team_roster")?;
    let strategy_name = require(request.strategy, "strategy")?;
    validate_players(&available, "available_players")?;
    drop_rostered(&mut available, [&roster]);

    let strategy = StrategyKind::from_name(&strategy_name).ok_or_else(|| {
        DraftError::UnknownStrategy {
            name: strategy_name.trim().to_lowercase(),
        }
    })?;
    let variability = clamp_variability(request.variability.unwrap_or(0.0));

    let selected = if variability > 0.0 {
        strategy.select_with_variability(&available, &roster, variability, rng)
    } else {
        strategy.select(&available, &roster)
    };

    let Some(player_id) = selected else {
        info!(
            "{} found no draftable player for team {}",
            strategy.key(),
            roster.team_id
        );
        return Ok(PickSelection {
            player_id: None,
            player_name: None,
            reasoning: "No valid players available for selection".to_string(),
            strategy_used: strategy.display_name(),
            variability_applied: variability,
        });
    };

    let player = available
        .iter()
        .find(|p| p.id == player_id)
        .ok_or(DraftError::PlayerNotFound { player_id })?;

    info!(
        "{} selected {} (#{}) for team {}",
        strategy.key(),
        player.name,
        player.rank,
        roster.team_id
    );
    Ok(PickSelection {
        player_id: Some(player.id),
        player_name: Some(player.name.clone()),
        reasoning: pick_reasoning(strategy, player, variability),
        strategy_used: strategy.display_name(),
        variability_applied: variability,
    })
}

// ---------------------------------------------------------------------------
// Availability prediction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictAvailabilityRequest {
    #[serde(default)]
    pub available_players: Option<Vec<Player>>,
    #[serde(default)]
    pub teams: Option<Vec<TeamRoster>>,
    #[serde(default)]
    pub current_pick: Option<u32>,
    #[serde(default)]
    pub my_team_id: Option<TeamId>,
    #[serde(default)]
    pub num_teams: Option<u32>,
    #[serde(default)]
    pub draft_style: Option<String>,
    #[serde(default)]
    pub trials: Option<u32>,
    /// Team id to variability level. Keys and values are coerced from
    /// strings where possible.
    #[serde(default)]
    pub team_variability: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Limits and defaults applied to prediction requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionSettings {
    pub default_trials: u32,
    pub max_trials: u32,
    pub simulation: SimulationConfig,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        PredictionSettings {
            default_trials: DEFAULT_TRIALS,
            max_trials: MAX_TRIALS,
            simulation: SimulationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionDebugInfo {
    /// Taken counts for the first few players by id.
    pub sample_player_counts: BTreeMap<PlayerId, u32>,
    pub total_players: usize,
    pub current_pick: u32,
    pub my_team_id: TeamId,
    pub num_teams: u32,
    pub team_variability_used: BTreeMap<TeamId, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityPrediction {
    pub availability_predictions: BTreeMap<PlayerId, f64>,
    pub trials_completed: u32,
    pub debug_info: PredictionDebugInfo,
}

/// Coerce a loosely-typed team variability map. Entries whose key is not a
/// team id or whose value is not a number are dropped.
pub fn coerce_team_variability(
    raw: &serde_json::Map<String, serde_json::Value>,
) -> BTreeMap<TeamId, f64> {
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        let Ok(team_id) = key.trim().parse::<TeamId>() else {
            warn!("ignoring team_variability entry with non-numeric team id {:?}", key);
            continue;
        };
        let level = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match level {
            Some(level) => {
                out.insert(team_id, clamp_variability(level));
            }
            None => warn!("ignoring team_variability for team {}: {}", team_id, value),
        }
    }
    out
}

/// Estimate, per player, the chance they are still available at the
/// caller's next pick.
pub fn predict_availability<R: Rng + ?Sized>(
    request: PredictAvailabilityRequest,
    settings: &PredictionSettings,
    rng: &mut R,
) -> Result<AvailabilityPrediction, DraftError> {
    let mut available = require(request.available_players, "available_players")?;
    let teams = require(request.teams, "teams")?;
    let current_pick = require(request.current_pick, "current_pick")?;
    let my_team_id = require(request.my_team_id, "my_team_id")?;
    let num_teams = require(request.num_teams, "num_teams")?;
    let draft_style = require(request.draft_style, "draft_style")?;
    validate_players(&available, "available_players")?;

    if num_teams == 0 {
        return Err(DraftError::InvalidField {
            field: "num_teams",
            message: "must be at least 1".to_string(),
        });
    }
    if my_team_id == 0 || my_team_id > num_teams {
        return Err(DraftError::InvalidField {
            field: "my_team_id",
            message: format!("must be between 1 and {}", num_teams),
        });
    }

    let requested = request.trials.unwrap_or(settings.default_trials);
    if requested == 0 {
        return Err(DraftError::InvalidField {
            field: "trials",
            message: "must be at least 1".to_string(),
        });
    }
    let trials = if requested > settings.max_trials {
        warn!("clamping trials from {} to {}", requested, settings.max_trials);
        settings.max_trials
    } else {
        requested
    };

    let team_variability = request
        .team_variability
        .as_ref()
        .map(coerce_team_variability)
        .unwrap_or_default();

    drop_rostered(&mut available, &teams);
    let teams: BTreeMap<TeamId, TeamRoster> =
        teams.into_iter().map(|t| (t.team_id, t)).collect();
    for id in (1..=num_teams).filter(|id| *id != my_team_id && !teams.contains_key(id)) {
        warn!("no roster supplied for team {}; simulations stop at its pick", id);
    }

    let setup = DraftSetup {
        available,
        teams,
        current_pick,
        my_team_id,
        num_teams,
        style: DraftStyle::from_name(&draft_style),
        team_variability,
    };

    info!(
        "predicting availability: {} players, {} trials, pick {}, team {} of {} ({})",
        setup.available.len(),
        trials,
        current_pick,
        my_team_id,
        num_teams,
        setup.style
    );
    let estimate = estimate_availability(&setup, &settings.simulation, trials, rng);

    let debug_info = PredictionDebugInfo {
        sample_player_counts: estimate
            .taken_counts
            .iter()
            .take(DEBUG_SAMPLE_SIZE)
            .map(|(&id, &count)| (id, count))
            .collect(),
        total_players: estimate.taken_counts.len(),
        current_pick,
        my_team_id,
        num_teams,
        team_variability_used: setup.team_variability,
    };

    Ok(AvailabilityPrediction {
        availability_predictions: estimate.predictions,
        trials_completed: estimate.trials_completed,
        debug_info,
    })
}
