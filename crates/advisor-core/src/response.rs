//! Wire model for the analysis service
//!
//! The service enforces no schema: every field is optional and the client
//! discovers the response shape from whatever fields are present. The
//! upstream model also emits numbers inconsistently (sometimes `123.4`,
//! sometimes `"$123.40"`), so numeric fields decode leniently.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Reason text used for the synthetic payload built on transport failure.
pub const TRANSPORT_FAILURE_REASON: &str = "Could not fetch data.";

/// A validated user query: non-empty after trimming.
///
/// There is no way to construct an empty `Query`, so the submitter never
/// has to re-check the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query(String);

impl Query {
    /// Trim the input and reject empty or whitespace-only text.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag carried in the `recommendation` field.
///
/// The service emits upper-case tags; anything else is preserved as
/// `Unknown` and ends up in the unrecognized fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationTag {
    Buy,
    Sell,
    Hold,
    Range,
    Compare,
    Error,
    Unknown(String),
}

impl RecommendationTag {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "BUY" => Self::Buy,
            "SELL" => Self::Sell,
            "HOLD" => Self::Hold,
            "RANGE" => Self::Range,
            "COMPARE" => Self::Compare,
            "ERROR" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// A plain advice tag, as opposed to the shape-switching tags.
    pub fn is_advice(&self) -> bool {
        matches!(self, Self::Buy | Self::Sell | Self::Hold)
    }
}

impl fmt::Display for RecommendationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
            Self::Hold => f.write_str("HOLD"),
            Self::Range => f.write_str("RANGE"),
            Self::Compare => f.write_str("COMPARE"),
            Self::Error => f.write_str("ERROR"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Untyped response body from the analysis service.
///
/// Field order inside the JSON maps is preserved (`serde_json` with
/// `preserve_order`): the COMPARE rule reads "the first two entries" of
/// `comparison`, which only makes sense with insertion order intact.
///
/// Every field decodes leniently on its own: an ill-typed value drops that
/// one field to `None` without discarding the rest of the payload, so a
/// recognized `recommendation` tag survives a garbled sibling field.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommendation: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: Option<String>,

    /// GREEN / YELLOW / RED sentiment, when the service provides one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub high_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub low_price: Option<f64>,

    /// ticker -> { price, yearly_change }; exactly two entries expected.
    #[serde(default, deserialize_with = "lenient_map")]
    pub comparison: Option<Map<String, Value>>,

    /// index name -> trend description.
    #[serde(default, deserialize_with = "lenient_map")]
    pub market_trend: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub sector: Option<String>,

    /// ticker -> price, accompanying `sector`.
    #[serde(default, deserialize_with = "lenient_map")]
    pub stocks: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub news_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub detailed_analysis: Option<String>,

    /// Plain-text answer bodies the service sometimes sends instead of a
    /// structured object (price quotes, "I couldn't understand", ...).
    /// Never present on the wire as a named field.
    #[serde(skip)]
    pub plain_text: Option<String>,
}

impl RawResponse {
    /// Synthetic payload standing in for a response when the network call
    /// fails. Carries exactly the error tag and the fixed reason text.
    pub fn transport_error() -> Self {
        Self {
            recommendation: Some("ERROR".to_string()),
            reason: Some(TRANSPORT_FAILURE_REASON.to_string()),
            ..Self::default()
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Build a response from an arbitrary JSON body without ever failing.
    ///
    /// Handles the service's quirks: a bare string body, a structured
    /// object, or either of those wrapped under a `response` key. Bodies
    /// that fit none of these decode to the empty response, which
    /// classifies as unrecognized rather than erroring.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::plain(text),
            Value::Object(mut map) => {
                if map.len() == 1 {
                    if let Some(inner) = map.remove("response") {
                        return Self::from_value(inner);
                    }
                }
                serde_json::from_value(Value::Object(map)).unwrap_or_else(|error| {
                    debug!(%error, "response object did not decode; treating as unrecognized");
                    Self::default()
                })
            }
            other => {
                debug!(body = %other, "non-object response body; treating as unrecognized");
                Self::default()
            }
        }
    }

    /// Parsed `recommendation` tag, if the field is present.
    pub fn tag(&self) -> Option<RecommendationTag> {
        self.recommendation.as_deref().map(RecommendationTag::parse)
    }
}

/// Decode an optional number that may arrive as a JSON number or as a
/// formatted string like `"$123.40"` or `"1,234.5"`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Decode an optional string, dropping ill-typed values instead of failing
/// the whole payload.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Decode an optional JSON object, dropping ill-typed values instead of
/// failing the whole payload.
fn lenient_map<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

/// Shared number-or-string coercion, also used on map values.
pub(crate) fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .ok(),
        _ => None,
    }
}

/// Best-effort display text for a map value (trend descriptions, change
/// percentages): strings pass through, everything else is serialized.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_rejects_empty_and_whitespace() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse("   \t\n").is_none());
    }

    #[test]
    fn query_trims_input() {
        let query = Query::parse("  should I buy TSLA?  ").unwrap();
        assert_eq!(query.text(), "should I buy TSLA?");
    }

    #[test]
    fn tag_parsing_is_case_sensitive() {
        assert_eq!(RecommendationTag::parse("BUY"), RecommendationTag::Buy);
        assert_eq!(
            RecommendationTag::parse("buy"),
            RecommendationTag::Unknown("buy".to_string())
        );
        assert_eq!(RecommendationTag::parse("COMPARE"), RecommendationTag::Compare);
    }

    #[test]
    fn transport_error_carries_exactly_tag_and_reason() {
        let resp = RawResponse::transport_error();
        assert_eq!(resp.recommendation.as_deref(), Some("ERROR"));
        assert_eq!(resp.reason.as_deref(), Some(TRANSPORT_FAILURE_REASON));
        assert!(resp.color.is_none());
        assert!(resp.ticker.is_none());
        assert!(resp.comparison.is_none());
        assert!(resp.plain_text.is_none());
    }

    #[test]
    fn lenient_prices_accept_numbers_and_strings() {
        let resp: RawResponse = serde_json::from_value(json!({
            "recommendation": "RANGE",
            "high_price": "$1,234.50",
            "low_price": 900.25,
        }))
        .unwrap();
        assert_eq!(resp.high_price, Some(1234.50));
        assert_eq!(resp.low_price, Some(900.25));
    }

    #[test]
    fn unparseable_price_becomes_none() {
        let resp: RawResponse = serde_json::from_value(json!({
            "high_price": "around a hundred",
            "low_price": null,
        }))
        .unwrap();
        assert!(resp.high_price.is_none());
        assert!(resp.low_price.is_none());
    }

    #[test]
    fn from_value_unwraps_response_envelope() {
        let resp = RawResponse::from_value(json!({
            "response": { "recommendation": "BUY", "reason": "strong growth" }
        }));
        assert_eq!(resp.recommendation.as_deref(), Some("BUY"));
        assert_eq!(resp.reason.as_deref(), Some("strong growth"));
    }

    #[test]
    fn from_value_keeps_plain_string_bodies() {
        let resp = RawResponse::from_value(json!({
            "response": "The latest stock price of AAPL is $210.33"
        }));
        assert_eq!(
            resp.plain_text.as_deref(),
            Some("The latest stock price of AAPL is $210.33")
        );
        assert!(resp.recommendation.is_none());
    }

    #[test]
    fn illtyped_field_degrades_only_itself() {
        let resp = RawResponse::from_value(json!({
            "recommendation": "BUY",
            "reason": "strong growth",
            "color": 3,
            "stocks": "oops",
            "market_trend": "up",
        }));
        assert_eq!(resp.recommendation.as_deref(), Some("BUY"));
        assert_eq!(resp.reason.as_deref(), Some("strong growth"));
        assert!(resp.color.is_none());
        assert!(resp.stocks.is_none());
        assert!(resp.market_trend.is_none());
    }

    #[test]
    fn from_value_never_fails_on_junk() {
        let resp = RawResponse::from_value(json!([1, 2, 3]));
        assert!(resp.recommendation.is_none());
        assert!(resp.plain_text.is_none());
    }

    #[test]
    fn comparison_preserves_insertion_order() {
        let resp: RawResponse = serde_json::from_value(json!({
            "recommendation": "COMPARE",
            "comparison": {
                "ZM": { "price": 70.1, "yearly_change": "-3.2%" },
                "AAPL": { "price": 210.0, "yearly_change": "12.4%" }
            }
        }))
        .unwrap();
        let keys: Vec<&String> = resp.comparison.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["ZM", "AAPL"]);
    }
}
