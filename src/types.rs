use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown for any absent trade or trader field.
pub const NOT_AVAILABLE: &str = "N/A";

/// A tracked trader as served by `GET /api/traders`.
///
/// Only `address` is guaranteed; every other field is optional display data
/// and may arrive as a string, a number or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trader {
    pub address: String,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub display_name: Option<Value>,
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub profile_image: Option<Value>,
    #[serde(default)]
    pub bio: Option<Value>,
    #[serde(default)]
    pub trade_count: Option<Value>,
    #[serde(default)]
    pub follower_count: Option<Value>,
    #[serde(default)]
    pub following_count: Option<Value>,
    #[serde(default)]
    pub volume_traded: Option<Value>,
    #[serde(default)]
    pub latest_trade: Option<Value>,
    #[serde(default)]
    pub last_profile_sync: Option<Value>,
}

impl Trader {
    /// Primary label: display name, else username, else the raw address.
    pub fn label(&self) -> String {
        display_text(&self.display_name)
            .or_else(|| display_text(&self.username))
            .unwrap_or_else(|| self.address.clone())
    }
}

/// A single trade as served by `GET /api/traders/{address}/trades`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default)]
    pub trade_id: Option<Value>,
    #[serde(default)]
    pub trader_address: Option<Value>,
    #[serde(default)]
    pub market_question: Option<Value>,
    #[serde(default)]
    pub market_slug: Option<Value>,
    #[serde(default)]
    pub outcome: Option<Value>,
    #[serde(default)]
    pub side: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub token_id: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub tx_hash: Option<Value>,
}

impl Trade {
    /// Row heading: market question, else market slug, else "Unknown market".
    pub fn title(&self) -> String {
        display_text(&self.market_question)
            .or_else(|| display_text(&self.market_slug))
            .unwrap_or_else(|| "Unknown market".to_string())
    }

    /// Size cell: size, else amount.
    pub fn size_or_amount(&self) -> Option<String> {
        display_text(&self.size).or_else(|| display_text(&self.amount))
    }
}

/// Textual form of an optional field, or `None` when it should take its fallback.
///
/// `null`, `false`, `0`, NaN and `""` all count as absent. Strings are
/// returned unquoted; numbers follow [`number_text`]; everything else uses
/// its JSON text.
pub fn display_text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 || f.is_nan() => None,
            _ => Some(number_text(n)),
        },
        other => Some(other.to_string()),
    }
}

/// Largest magnitude below which every whole f64 is an exact integer (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Number text as a browser shows it: REAL columns arrive as `100.0` and
/// display as `100`.
pub fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Display text with a literal fallback.
pub fn text_or(value: &Option<Value>, fallback: &str) -> String {
    display_text(value).unwrap_or_else(|| fallback.to_string())
}
