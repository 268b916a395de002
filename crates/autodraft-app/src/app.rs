// Application event loop: turns client requests into draft decisions.

use autodraft_core::api::{
    self, list_strategies, DraftError, PredictionSettings, SelectPickRequest,
};
use autodraft_core::draft::{Player, Position, TeamRoster};
use autodraft_core::rankings::load_rankings;
use autodraft_core::variability::{apply_variability, clamp_variability};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::protocol::{
    salvage_request_id, ClientMessage, HealthPayload, ServerMessage, StrategiesPayload,
    TestDraftPayload, TestDraftResult, TestVariabilityPayload, VariabilityTestResult,
    VariabilityTrial,
};
use crate::ws_server::WsEvent;

/// Strategy used by sample drafts that do not name one.
const DEFAULT_TEST_STRATEGY: &str = "bpa";
/// Level used by variability checks that do not name one.
const DEFAULT_TEST_VARIABILITY: f64 = 0.5;
/// Draws per variability check.
const VARIABILITY_TRIALS: u32 = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub prediction: PredictionSettings,
    /// Player pool for sample drafts.
    pub sample_players: Vec<Player>,
    pub rng: ChaCha8Rng,
    pub client_addr: Option<String>,
    pub requests_handled: u64,
}

impl AppState {
    pub fn new(config: Config, sample_players: Vec<Player>) -> Self {
        let rng = match config.simulation.seed {
            Some(seed) => {
                info!("Using fixed RNG seed {}", seed);
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => ChaCha8Rng::from_entropy(),
        };
        AppState {
            prediction: config.simulation.prediction_settings(),
            config,
            sample_players,
            rng,
            client_addr: None,
            requests_handled: 0,
        }
    }
}

/// Built-in five-player board used when no rankings file is configured.
pub fn builtin_sample_players() -> Vec<Player> {
    [
        (1, "Josh Allen", Position::Quarterback, "BUF"),
        (2, "Christian McCaffrey", Position::RunningBack, "SF"),
        (3, "Tyreek Hill", Position::WideReceiver, "MIA"),
        (4, "Travis Kelce", Position::TightEnd, "KC"),
        (5, "Lamar Jackson", Position::Quarterback, "BAL"),
    ]
    .into_iter()
    .map(|(id, name, position, team)| Player {
        id,
        name: name.to_string(),
        position,
        team: team.to_string(),
        rank: id as u32,
        tier: Some(1),
    })
    .collect()
}

/// Sample rankings from the configured CSV, relative to `base_dir`. Falls
/// back to the built-in board if the file is missing or unusable.
pub fn load_sample_players(config: &Config, base_dir: &Path) -> Vec<Player> {
    let Some(rel) = config.data_paths.rankings.as_deref() else {
        return builtin_sample_players();
    };
    let path = base_dir.join(rel);
    match load_rankings(&path) {
        Ok(players) => {
            info!("Loaded {} sample players from {}", players.len(), path.display());
            players
        }
        Err(e) => {
            warn!("Falling back to built-in sample players: {}", e);
            builtin_sample_players()
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application loop until the WebSocket event channel closes.
///
/// Each text message is answered with exactly one serialized
/// [`ServerMessage`] on `out_tx`.
pub async fn run(
    mut ws_rx: mpsc::Receiver<WsEvent>,
    out_tx: mpsc::Sender<String>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    while let Some(event) = ws_rx.recv().await {
        match event {
            WsEvent::Connected { addr } => {
                info!("Client connected from {}", addr);
                state.client_addr = Some(addr);
            }
            WsEvent::Disconnected => {
                info!(
                    "Client {} disconnected",
                    state.client_addr.as_deref().unwrap_or("<unknown>")
                );
                state.client_addr = None;
            }
            WsEvent::Message(json_str) => {
                let reply = handle_message(&mut state, &json_str);
                if out_tx.send(reply.to_json()).await.is_err() {
                    warn!("Reply channel closed; stopping event loop");
                    break;
                }
            }
        }
    }

    info!(
        "Application event loop stopped after {} requests",
        state.requests_handled
    );
    Ok(())
}

/// Parse one client frame and produce its reply.
pub fn handle_message(state: &mut AppState, json_str: &str) -> ServerMessage {
    let msg: ClientMessage = match serde_json::from_str(json_str) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse client message: {}", e);
            return ServerMessage::error(
                salvage_request_id(json_str),
                "bad_request",
                format!("invalid message: {e}"),
            );
        }
    };
    state.requests_handled += 1;
    debug!(
        "Handling {} (request {})",
        msg.kind(),
        msg.request_id().unwrap_or("-")
    );

    match msg {
        ClientMessage::SelectPick {
            request_id,
            payload,
        } => match api::select_pick(payload, &mut state.rng) {
            Ok(selection) => ServerMessage::PickSelected {
                request_id,
                payload: selection,
            },
            Err(e) => reject(request_id, e),
        },
        ClientMessage::PredictAvailability {
            request_id,
            payload,
        } => match api::predict_availability(payload, &state.prediction, &mut state.rng) {
            Ok(prediction) => ServerMessage::AvailabilityPredicted {
                request_id,
                payload: prediction,
            },
            Err(e) => reject(request_id, e),
        },
        ClientMessage::ListStrategies { request_id } => ServerMessage::Strategies {
            request_id,
            payload: StrategiesPayload {
                strategies: list_strategies(),
            },
        },
        ClientMessage::TestDraft {
            request_id,
            payload,
        } => test_draft(state, request_id, payload),
        ClientMessage::TestVariability {
            request_id,
            payload,
        } => test_variability(state, request_id, payload),
        ClientMessage::Health { request_id } => ServerMessage::Health {
            request_id,
            payload: HealthPayload {
                status: "healthy",
                strategies_available: list_strategies().len(),
                server_time: chrono::Utc::now().to_rfc3339(),
            },
        },
    }
}

fn reject(request_id: Option<String>, err: DraftError) -> ServerMessage {
    info!("Rejected request: {}", err);
    ServerMessage::draft_error(request_id, &err)
}

/// Run one strategy against the sample board with a fresh roster.
fn test_draft(
    state: &mut AppState,
    request_id: Option<String>,
    payload: TestDraftPayload,
) -> ServerMessage {
    let strategy = payload
        .strategy
        .unwrap_or_else(|| DEFAULT_TEST_STRATEGY.to_string());
    let request = SelectPickRequest {
        available_players: Some(state.sample_players.clone()),
        team_roster: Some(TeamRoster::new(1, "Test Team", &state.config.roster)),
        strategy: Some(strategy),
        variability: payload.variability,
    };
    debug!("Sample draft over {} players", state.sample_players.len());

    match api::select_pick(request, &mut state.rng) {
        Ok(selection) => ServerMessage::TestDraftResult {
            request_id,
            payload: TestDraftResult {
                success: selection.player_id.is_some(),
                player_id: selection.player_id,
                player_name: selection.player_name,
                strategy_used: selection.strategy_used.to_string(),
                reasoning: selection.reasoning,
                sample_size: state.sample_players.len(),
            },
        },
        Err(e) => reject(request_id, e),
    }
}

/// Draw repeatedly from the sample board around its top-ranked player to
/// show how far a variability level strays from the optimal pick.
fn test_variability(
    state: &mut AppState,
    request_id: Option<String>,
    payload: TestVariabilityPayload,
) -> ServerMessage {
    let level = clamp_variability(payload.variability.unwrap_or(DEFAULT_TEST_VARIABILITY));
    let candidates: Vec<&Player> = state.sample_players.iter().collect();
    let Some(optimal) = candidates.iter().copied().min_by_key(|p| p.rank) else {
        return ServerMessage::VariabilityTested {
            request_id,
            payload: VariabilityTestResult {
                success: false,
                variability_tested: level,
                results: Vec::new(),
            },
        };
    };

    let mut results = Vec::with_capacity(VARIABILITY_TRIALS as usize);
    for trial in 1..=VARIABILITY_TRIALS {
        let chosen = apply_variability(&candidates, optimal.id, level, &mut state.rng);
        let selected = candidates
            .iter()
            .find(|p| p.id == chosen)
            .copied()
            .unwrap_or(optimal);
        results.push(VariabilityTrial {
            trial,
            original: optimal.name.clone(),
            selected: selected.name.clone(),
            rank: selected.rank,
        });
    }
    let strayed = results.iter().filter(|r| r.rank != optimal.rank).count();
    debug!(
        "Variability {:.2}: {} of {} draws left {}",
        level, strayed, VARIABILITY_TRIALS, optimal.name
    );

    ServerMessage::VariabilityTested {
        request_id,
        payload: VariabilityTestResult {
            success: true,
            variability_tested: level,
            results,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
