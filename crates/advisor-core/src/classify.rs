//! Response-variant resolution
//!
//! A response can satisfy several variant predicates at once (an object may
//! carry a `recommendation` tag *and* a `market_trend` map), so variant
//! selection is an explicit ordered rule table: the first rule whose
//! predicate matches constructs the primary variant, and the order of the
//! table is the canonical precedence. Auxiliary overlays (news link,
//! detailed analysis) are collected independently and render alongside the
//! primary.

use crate::response::{RawResponse, RecommendationTag, value_to_f64, value_to_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Presentation tone derived from the response, not business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorHint {
    Positive,
    Caution,
    Negative,
    Neutral,
    /// Used for the price-range view, which is factual rather than advice.
    Informational,
}

impl ColorHint {
    /// Map the service's `color` field. Absent or unrecognized is neutral;
    /// the ERROR and RANGE primaries override this mapping entirely.
    pub fn from_color(color: Option<&str>) -> Self {
        match color {
            Some("GREEN") => Self::Positive,
            Some("YELLOW") => Self::Caution,
            Some("RED") => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// Whether a market trend arriving next to a plain recommendation replaces
/// it or renders below it. Both behaviors exist in the wild; the default is
/// the canonical precedence where the trend wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendPolicy {
    /// The trend becomes the primary view (canonical rule order).
    #[default]
    Primary,
    /// The recommendation stays primary and the trend renders as an
    /// overlay below it.
    Overlay,
}

/// Knobs for classification. Currently only the trend co-display policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierOptions {
    pub trend_policy: TrendPolicy,
}

/// One leg of a two-stock comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonLeg {
    pub ticker: String,
    pub price: Option<f64>,
    pub yearly_change: Option<String>,
}

/// The single main display chosen for a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    Recommendation {
        tag: RecommendationTag,
        reason: Option<String>,
        hint: ColorHint,
    },
    PriceRange {
        ticker: Option<String>,
        high: f64,
        low: f64,
        reason: Option<String>,
        /// Inline detail text; a RANGE response embeds its detailed
        /// analysis here instead of as a separate overlay.
        detail: Option<String>,
    },
    Comparison {
        entries: [ComparisonLeg; 2],
        reason: Option<String>,
    },
    MarketTrend {
        entries: Vec<(String, String)>,
        reason: Option<String>,
    },
    Sector {
        name: String,
        stocks: Vec<(String, f64)>,
        reason: Option<String>,
    },
    Error {
        reason: String,
    },
    /// The payload fit no known shape. Distinct from `Error`: it renders a
    /// neutral "nothing to show" view, optionally carrying whatever plain
    /// text the service sent.
    Unrecognized {
        note: Option<String>,
    },
}

/// A secondary block rendered below the primary variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    NewsLink {
        ticker: Option<String>,
        url: String,
    },
    DetailedAnalysis {
        text: String,
    },
    MarketTrend {
        entries: Vec<(String, String)>,
    },
}

/// Classification outcome: exactly one primary, zero or more overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub primary: Primary,
    pub overlays: Vec<Overlay>,
}

type Rule = fn(&RawResponse, &ClassifierOptions) -> Option<Primary>;

/// Canonical precedence. Evaluated top to bottom, first match wins.
const PRIMARY_RULES: &[(&str, Rule)] = &[
    ("error", error_rule),
    ("price-range", price_range_rule),
    ("comparison", comparison_rule),
    ("market-trend", market_trend_rule),
    ("sector", sector_rule),
    ("recommendation", recommendation_rule),
];

/// Classify with default options.
pub fn classify(resp: &RawResponse) -> Classification {
    classify_with(resp, &ClassifierOptions::default())
}

/// Classify a response into one primary variant plus overlays.
///
/// Total over all inputs: malformed payloads degrade to `Error` and
/// unclassifiable ones to `Unrecognized`, never to a panic.
pub fn classify_with(resp: &RawResponse, options: &ClassifierOptions) -> Classification {
    let primary = PRIMARY_RULES
        .iter()
        .find_map(|(name, rule)| {
            let matched = rule(resp, options);
            if matched.is_some() {
                debug!(rule = name, "primary variant selected");
            }
            matched
        })
        .unwrap_or_else(|| unrecognized(resp));

    let overlays = collect_overlays(resp, &primary, options);
    Classification { primary, overlays }
}

// ============================================================================
// Primary rules, in precedence order
// ============================================================================

/// Rule 1: an ERROR tag wins over everything else in the payload.
fn error_rule(resp: &RawResponse, _options: &ClassifierOptions) -> Option<Primary> {
    if resp.tag() != Some(RecommendationTag::Error) {
        return None;
    }
    Some(Primary::Error {
        reason: resp
            .reason
            .clone()
            .unwrap_or_else(|| "The service reported an error.".to_string()),
    })
}

/// Rule 2: RANGE. Both bounds are required; a RANGE tag without them is a
/// malformed payload and falls back to the error view.
fn price_range_rule(resp: &RawResponse, _options: &ClassifierOptions) -> Option<Primary> {
    if resp.tag() != Some(RecommendationTag::Range) {
        return None;
    }
    let (Some(high), Some(low)) = (resp.high_price, resp.low_price) else {
        debug!("RANGE response missing a price bound");
        return Some(Primary::Error {
            reason: "The service returned an incomplete price range.".to_string(),
        });
    };
    Some(Primary::PriceRange {
        ticker: resp.ticker.clone(),
        high,
        low,
        reason: resp.reason.clone(),
        detail: resp.detailed_analysis.clone(),
    })
}

/// Rule 3: COMPARE uses the first two entries of `comparison` in map
/// iteration order; fewer than two is malformed.
fn comparison_rule(resp: &RawResponse, _options: &ClassifierOptions) -> Option<Primary> {
    if resp.tag() != Some(RecommendationTag::Compare) {
        return None;
    }
    let legs: Vec<ComparisonLeg> = resp
        .comparison
        .iter()
        .flatten()
        .take(2)
        .map(|(ticker, entry)| comparison_leg(ticker, entry))
        .collect();
    match <[ComparisonLeg; 2]>::try_from(legs) {
        Ok(entries) => Some(Primary::Comparison {
            entries,
            reason: resp.reason.clone(),
        }),
        Err(partial) => {
            debug!(entries = partial.len(), "COMPARE response with fewer than two entries");
            Some(Primary::Error {
                reason: "The service returned an incomplete comparison.".to_string(),
            })
        }
    }
}

fn comparison_leg(ticker: &str, entry: &Value) -> ComparisonLeg {
    ComparisonLeg {
        ticker: ticker.to_string(),
        price: entry.get("price").and_then(value_to_f64),
        yearly_change: entry.get("yearly_change").map(value_to_text),
    }
}

/// Rule 4: a `market_trend` map makes the trend the primary view, unless
/// the overlay policy defers to a plain recommendation riding alongside.
fn market_trend_rule(resp: &RawResponse, options: &ClassifierOptions) -> Option<Primary> {
    let trend = resp.market_trend.as_ref()?;
    if options.trend_policy == TrendPolicy::Overlay
        && resp.tag().is_some_and(|tag| tag.is_advice())
    {
        return None;
    }
    Some(Primary::MarketTrend {
        entries: trend_entries(trend),
        reason: resp.reason.clone(),
    })
}

fn trend_entries(trend: &Map<String, Value>) -> Vec<(String, String)> {
    trend
        .iter()
        .map(|(index, description)| (index.clone(), value_to_text(description)))
        .collect()
}

/// Rule 5: a `sector` field with its per-ticker price map.
fn sector_rule(resp: &RawResponse, _options: &ClassifierOptions) -> Option<Primary> {
    let name = resp.sector.clone()?;
    let stocks = resp
        .stocks
        .iter()
        .flatten()
        .filter_map(|(ticker, price)| {
            let price = value_to_f64(price);
            if price.is_none() {
                debug!(ticker = %ticker, "sector stock without a usable price; skipping");
            }
            Some((ticker.clone(), price?))
        })
        .collect();
    Some(Primary::Sector {
        name,
        stocks,
        reason: resp.reason.clone(),
    })
}

/// Rule 6: a plain BUY/SELL/HOLD recommendation with its color hint.
fn recommendation_rule(resp: &RawResponse, _options: &ClassifierOptions) -> Option<Primary> {
    let tag = resp.tag()?;
    if !tag.is_advice() {
        return None;
    }
    Some(Primary::Recommendation {
        hint: ColorHint::from_color(resp.color.as_deref()),
        reason: resp.reason.clone(),
        tag,
    })
}

/// Fallback: nothing matched. Surface plain text if the service sent any.
fn unrecognized(resp: &RawResponse) -> Primary {
    debug!("no classification rule matched; rendering neutral fallback");
    Primary::Unrecognized {
        note: resp.plain_text.clone().or_else(|| resp.reason.clone()),
    }
}

// ============================================================================
// Overlays
// ============================================================================

fn collect_overlays(
    resp: &RawResponse,
    primary: &Primary,
    options: &ClassifierOptions,
) -> Vec<Overlay> {
    let mut overlays = Vec::new();

    if let Some(url) = &resp.news_url {
        overlays.push(Overlay::NewsLink {
            ticker: resp.ticker.clone(),
            url: url.clone(),
        });
    }

    // The price-range view embeds its detail text inline instead.
    if let Some(text) = &resp.detailed_analysis {
        if !matches!(primary, Primary::PriceRange { .. }) {
            overlays.push(Overlay::DetailedAnalysis { text: text.clone() });
        }
    }

    if options.trend_policy == TrendPolicy::Overlay {
        if let (Some(trend), Primary::Recommendation { .. }) = (&resp.market_trend, primary) {
            overlays.push(Overlay::MarketTrend {
                entries: trend_entries(trend),
            });
        }
    }

    overlays
}

// ============================================================================
// Tests
// ============================================================================
