//! The structured payload the model hands back through `submitSummary`.
//!
//! Shape checks live here (field presence, numeric type, list bounds).
//! Whether the content is *right* (does `unreadCount` match the inbox?)
//! is left to the model and only reported, never enforced.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

pub const MAX_IMPORTANT: usize = 8;
pub const MAX_QUICK_HITS: usize = 12;

/// Spoken-duration budget handed to the model for `speakable`.
pub const SPEAKABLE_BUDGET_SECS: u32 = 120;
/// Budget for the empty-inbox case.
pub const EMPTY_INBOX_SPEAKABLE_SECS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantEmail {
    pub from: String,
    pub subject: String,
    pub why_important: String,
    pub suggested_action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickHit {
    pub from: String,
    pub subject: String,
    pub one_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSummary {
    #[serde(deserialize_with = "deserialize_count")]
    pub unread_count: u32,
    pub headline: String,
    pub important: Vec<ImportantEmail>,
    pub quick_hits: Vec<QuickHit>,
    pub speakable: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryShapeError {
    #[error("malformed summary: {0}")]
    Malformed(String),

    #[error("important has {0} entries (max 8)")]
    TooManyImportant(usize),

    #[error("quickHits has {0} entries (max 12)")]
    TooManyQuickHits(usize),
}

impl CallSummary {
    /// Parse a raw `submitSummary` payload and check its structural bounds.
    pub fn from_submission(payload: &Value) -> Result<Self, SummaryShapeError> {
        // Some backends wrap the single argument object under its parameter name.
        let body = match payload.get("summary") {
            Some(inner) if inner.is_object() => inner,
            _ => payload,
        };
        let summary: Self = serde_json::from_value(body.clone())
            .map_err(|e| SummaryShapeError::Malformed(e.to_string()))?;
        summary.check_bounds()?;
        Ok(summary)
    }

    pub fn check_bounds(&self) -> Result<(), SummaryShapeError> {
        if self.important.len() > MAX_IMPORTANT {
            return Err(SummaryShapeError::TooManyImportant(self.important.len()));
        }
        if self.quick_hits.len() > MAX_QUICK_HITS {
            return Err(SummaryShapeError::TooManyQuickHits(self.quick_hits.len()));
        }
        Ok(())
    }

    /// JSON schema advertised as the `submitSummary` parameters.
    pub fn parameters_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "unreadCount": {
                    "type": "integer",
                    "description": "Total number of unread emails analyzed"
                },
                "headline": {
                    "type": "string",
                    "description": "A punchy 5-8 word headline summarizing the inbox state"
                },
                "important": {
                    "type": "array",
                    "maxItems": MAX_IMPORTANT,
                    "description": "Critical emails requiring attention (max 8)",
                    "items": {
                        "type": "object",
                        "properties": {
                            "from": {"type": "string", "description": "Sender name or email"},
                            "subject": {"type": "string", "description": "Email subject line"},
                            "whyImportant": {"type": "string", "description": "Why this email is flagged as important"},
                            "suggestedAction": {"type": "string", "description": "Recommended action for the user"}
                        },
                        "required": ["from", "subject", "whyImportant", "suggestedAction"]
                    }
                },
                "quickHits": {
                    "type": "array",
                    "maxItems": MAX_QUICK_HITS,
                    "description": "Other relevant emails to skim (max 12)",
                    "items": {
                        "type": "object",
                        "properties": {
                            "from": {"type": "string", "description": "Sender name or email"},
                            "subject": {"type": "string", "description": "Email subject line"},
                            "oneLine": {"type": "string", "description": "One line summary of the email content"}
                        },
                        "required": ["from", "subject", "oneLine"]
                    }
                },
                "speakable": {
                    "type": "string",
                    "description": "A natural language script to be spoken by TTS (under 120 seconds)"
                }
            },
            "required": ["unreadCount", "headline", "important", "quickHits", "speakable"]
        })
    }
}

/// Accepts `3` and `3.0`, rejects negatives, fractions and strings.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(|_| D::Error::custom("unreadCount out of range"));
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(D::Error::custom(format!(
            "unreadCount must be a non-negative integer, got {value}"
        ))),
    }
}
