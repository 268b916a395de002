// JSON messages exchanged with draft clients over the WebSocket.
//
// Every frame is `{"type": "...", "request_id": "...", "payload": {...}}`.
// `request_id` is optional and echoed back unchanged on the reply.

use autodraft_core::api::{
    AvailabilityPrediction, DraftError, PickSelection, PredictAvailabilityRequest,
    SelectPickRequest, StrategyInfo,
};
use autodraft_core::draft::PlayerId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    SelectPick {
        #[serde(default)]
        request_id: Option<String>,
        #[serde(default)]
        payload: SelectPickRequest,
    },
    PredictAvailability {
        #[serde(default)]
        request_id: Option<String>,
        #[serde(default)]
        payload: PredictAvailabilityRequest,
    },
    ListStrategies {
        #[serde(default)]
        request_id: Option<String>,
    },
    TestDraft {
        #[serde(default)]
        request_id: Option<String>,
        #[serde(default)]
        payload: TestDraftPayload,
    },
    TestVariability {
        #[serde(default)]
        request_id: Option<String>,
        #[serde(default)]
        payload: TestVariabilityPayload,
    },
    Health {
        #[serde(default)]
        request_id: Option<String>,
    },
}

impl ClientMessage {
    /// Short wire name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::SelectPick { .. } => "SELECT_PICK",
            ClientMessage::PredictAvailability { .. } => "PREDICT_AVAILABILITY",
            ClientMessage::ListStrategies { .. } => "LIST_STRATEGIES",
            ClientMessage::TestDraft { .. } => "TEST_DRAFT",
            ClientMessage::TestVariability { .. } => "TEST_VARIABILITY",
            ClientMessage::Health { .. } => "HEALTH",
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            ClientMessage::SelectPick { request_id, .. }
            | ClientMessage::PredictAvailability { request_id, .. }
            | ClientMessage::ListStrategies { request_id }
            | ClientMessage::TestDraft { request_id, .. }
            | ClientMessage::TestVariability { request_id, .. }
            | ClientMessage::Health { request_id } => request_id.as_deref(),
        }
    }
}

/// Sample draft options. Strategy defaults to best available.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestDraftPayload {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub variability: Option<f64>,
}

/// Repeated variability draws over the sample board. Level defaults to 0.5.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestVariabilityPayload {
    #[serde(default)]
    pub variability: Option<f64>,
}

/// Best-effort `request_id` from a frame that failed to parse as a
/// [`ClientMessage`].
pub fn salvage_request_id(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    value.get("request_id")?.as_str().map(str::to_string)
}

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    PickSelected {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: PickSelection,
    },
    AvailabilityPredicted {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: AvailabilityPrediction,
    },
    Strategies {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: StrategiesPayload,
    },
    TestDraftResult {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: TestDraftResult,
    },
    VariabilityTested {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: VariabilityTestResult,
    },
    Health {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: HealthPayload,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        payload: ErrorPayload,
    },
}

impl ServerMessage {
    pub fn error(request_id: Option<String>, kind: &str, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            request_id,
            payload: ErrorPayload {
                kind: kind.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn draft_error(request_id: Option<String>, err: &DraftError) -> Self {
        Self::error(request_id, err.kind(), err.to_string())
    }

    /// Serialize for the wire. Falls back to a hand-built error frame if
    /// serialization itself fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "type": "ERROR",
                "payload": {"kind": "internal", "message": e.to_string()},
            })
            .to_string()
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategiesPayload {
    pub strategies: Vec<StrategyInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestDraftResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub strategy_used: String,
    pub reasoning: String,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariabilityTestResult {
    pub success: bool,
    pub variability_tested: f64,
    pub results: Vec<VariabilityTrial>,
}

/// One draw: the top-ranked player against the one variability picked.
#[derive(Debug, Clone, Serialize)]
pub struct VariabilityTrial {
    pub trial: u32,
    pub original: String,
    pub selected: String,
    pub rank: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
    pub strategies_available: usize,
    pub server_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_select_pick_with_payload() {
        let raw = json!({
            "type": "SELECT_PICK",
            "request_id": "abc",
            "payload": {
                "available_players": [{"id": 1, "name": "A", "position": "RB", "rank": 1}],
                "team_roster": {"id": 1, "roster": [{"position": "RB", "player": null}]},
                "strategy": "bpa"
            }
        })
        .to_string();
        let msg: ClientMessage = serde_json::from_str(&raw).unwrap();
        assert_eq!(msg.request_id(), Some("abc"));
        match msg {
            ClientMessage::SelectPick { payload, .. } => {
                assert_eq!(payload.strategy.as_deref(), Some("bpa"));
                assert_eq!(payload.available_players.map(|p| p.len()), Some(1));
            }
            other => panic!("expected SelectPick, got {other:?}"),
        }
    }

    #[test]
    fn missing_payload_defaults_to_empty_request() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"SELECT_PICK"}"#).unwrap();
        match msg {
            ClientMessage::SelectPick {
                request_id,
                payload,
            } => {
                assert!(request_id.is_none());
                assert!(payload.available_players.is_none());
                assert!(payload.strategy.is_none());
            }
            other => panic!("expected SelectPick, got {other:?}"),
        }
    }

    #[test]
    fn payload_free_messages_parse() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"LIST_STRATEGIES","request_id":"1"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::ListStrategies { .. }));
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"HEALTH"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Health { request_id: None }));
    }

    #[test]
    fn test_variability_level_is_optional() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"TEST_VARIABILITY","request_id":"v"}"#).unwrap();
        assert_eq!(msg.kind(), "TEST_VARIABILITY");
        assert_eq!(msg.request_id(), Some("v"));
        match msg {
            ClientMessage::TestVariability { payload, .. } => {
                assert!(payload.variability.is_none())
            }
            other => panic!("expected TestVariability, got {other:?}"),
        }

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"TEST_VARIABILITY","payload":{"variability":0.9}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::TestVariability { payload, .. } => {
                assert_eq!(payload.variability, Some(0.9))
            }
            other => panic!("expected TestVariability, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"DRAFT_EVERYONE"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn salvage_request_id_from_bad_frame() {
        assert_eq!(
            salvage_request_id(r#"{"type":"NOPE","request_id":"r7"}"#).as_deref(),
            Some("r7")
        );
        assert_eq!(salvage_request_id("not json"), None);
        assert_eq!(salvage_request_id(r#"{"request_id":5}"#), None);
    }

    #[test]
    fn error_reply_shape() {
        let msg = ServerMessage::draft_error(
            Some("r1".to_string()),
            &DraftError::MissingField { field: "strategy" },
        );
        let value: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();
        assert_eq!(value["type"], "ERROR");
        assert_eq!(value["request_id"], "r1");
        assert_eq!(value["payload"]["kind"], "missing_field");
        assert_eq!(value["payload"]["message"], "missing required field: strategy");
    }

    #[test]
    fn request_id_omitted_when_absent() {
        let msg = ServerMessage::Strategies {
            request_id: None,
            payload: StrategiesPayload {
                strategies: Vec::new(),
            },
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();
        assert_eq!(value["type"], "STRATEGIES");
        assert!(value.get("request_id").is_none());
        assert_eq!(value["payload"]["strategies"], json!([]));
    }
}
