//! Message → auto-reply resolution.
//!
//! A message is scanned for hashtag tokens (`#` followed by ASCII word
//! characters, so a token ends at the first accented letter).
//! Tokens are tried left to right against active triggers; the first hit
//! wins, gets its usage counted, and its response is returned. Later tokens
//! are never looked up.

use std::sync::LazyLock;

use regex::Regex;

use crate::db::models::TriggerCheckResponse;
use crate::db::now_timestamp;
use crate::db::store::TriggerStore;
use crate::error::AppError;
use crate::validation::normalize_trigger_text;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("hashtag regex must compile"));

/// The trigger that answered a message.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerMatch {
    pub trigger_id: String,
    pub trigger_text: String,
    pub response_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched(TriggerMatch),
    NoMatch,
}

impl From<Resolution> for TriggerCheckResponse {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Matched(m) => TriggerCheckResponse {
                found: true,
                response: Some(m.response_text),
                trigger: Some(m.trigger_text),
            },
            Resolution::NoMatch => TriggerCheckResponse::not_found(),
        }
    }
}

/// Hashtag tokens in order of appearance, as written in the message.
pub fn extract_tags(message: &str) -> Vec<&str> {
    TAG_PATTERN.find_iter(message).map(|m| m.as_str()).collect()
}

/// Resolve `message` against the active triggers in `store`.
///
/// Store failures are returned as errors; they are never folded into
/// `NoMatch`.
pub async fn resolve(store: &dyn TriggerStore, message: &str) -> Result<Resolution, AppError> {
    let tags = extract_tags(message);
    if tags.is_empty() {
        tracing::debug!("No hashtag tokens in message");
        return Ok(Resolution::NoMatch);
    }

    for tag in &tags {
        let normalized = normalize_trigger_text(tag);
        let Some(trigger) = store.find_active_by_text(&normalized).await? else {
            continue;
        };

        // Lookup and increment are separate steps; concurrent matches may interleave.
        let counted = store.record_usage(&trigger.id, &now_timestamp()).await?;
        if !counted {
            tracing::warn!(trigger_id = %trigger.id, "Trigger vanished before usage was recorded");
        }

        tracing::info!(
            trigger_id = %trigger.id,
            trigger = %trigger.trigger_text,
            candidates = tags.len(),
            "Message matched trigger",
        );

        return Ok(Resolution::Matched(TriggerMatch {
            trigger_id: trigger.id,
            trigger_text: trigger.trigger_text,
            response_text: trigger.response_text,
        }));
    }

    tracing::debug!(candidates = tags.len(), "No active trigger matched");
    Ok(Resolution::NoMatch)
}
