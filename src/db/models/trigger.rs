use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Triggers
// ============================================================================

/// A stored keyword/response pair plus activation and usage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Trigger {
    pub id: String,
    /// Always stored uppercase, e.g. `#SUPORTE`.
    pub trigger_text: String,
    pub response_text: String,
    pub is_active: bool,
    #[ts(type = "number")]
    pub usage_count: i64,
    pub created_at: String,
    pub last_used: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateTriggerInput {
    pub trigger_text: String,
    pub response_text: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateTriggerInput {
    pub trigger_text: Option<String>,
    pub response_text: Option<String>,
    pub is_active: Option<bool>,
    #[ts(type = "number | null")]
    pub usage_count: Option<i64>,
}

impl UpdateTriggerInput {
    pub fn is_empty(&self) -> bool {
        self.trigger_text.is_none()
            && self.response_text.is_none()
            && self.is_active.is_none()
            && self.usage_count.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TriggerStats {
    #[ts(type = "number")]
    pub total_triggers: i64,
    #[ts(type = "number")]
    pub active_triggers: i64,
    #[ts(type = "number")]
    pub total_responses: i64,
    pub average_usage: f64,
}

/// Answer returned to the messaging client for one incoming message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriggerCheckResponse {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub trigger: Option<String>,
}

impl TriggerCheckResponse {
    pub fn not_found() -> Self {
        Self {
            found: false,
            response: None,
            trigger: None,
        }
    }
}
