//! Deterministic view model
//!
//! Turns a [`Classification`] into an ordered list of display blocks. This
//! is the single rendering rule per variant: the CLI (or any other front
//! end) only decides how a block looks, never which blocks exist. Every
//! classification renders to at least one block; this function cannot fail.

use crate::classify::{Classification, ColorHint, Overlay, Primary};
use serde::{Deserialize, Serialize};

/// Body of a display block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockBody {
    Lines(Vec<String>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// One display block: a heading with a tone, a body, and an optional
/// trailing note (used for the reason text under tables).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewBlock {
    pub heading: String,
    pub tone: ColorHint,
    pub body: BlockBody,
    pub note: Option<String>,
}

impl ViewBlock {
    fn lines(heading: impl Into<String>, tone: ColorHint, lines: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            tone,
            body: BlockBody::Lines(lines),
            note: None,
        }
    }

    fn table(
        heading: impl Into<String>,
        tone: ColorHint,
        headers: &[&str],
        rows: Vec<Vec<String>>,
        note: Option<String>,
    ) -> Self {
        Self {
            heading: heading.into(),
            tone,
            body: BlockBody::Table {
                headers: headers.iter().map(|h| (*h).to_string()).collect(),
                rows,
            },
            note,
        }
    }
}

/// Render a classification: primary block first, then overlays in their
/// collection order.
pub fn render(classification: &Classification) -> Vec<ViewBlock> {
    let mut blocks = vec![primary_block(&classification.primary)];
    blocks.extend(classification.overlays.iter().map(overlay_block));
    blocks
}

fn primary_block(primary: &Primary) -> ViewBlock {
    match primary {
        Primary::Recommendation { tag, reason, hint } => ViewBlock::lines(
            format!("Recommendation: {tag}"),
            *hint,
            vec![
                reason
                    .clone()
                    .unwrap_or_else(|| "No reason given.".to_string()),
            ],
        ),
        Primary::PriceRange {
            ticker,
            high,
            low,
            reason,
            detail,
        } => {
            let heading = match ticker {
                Some(ticker) => format!("Price range for {ticker}"),
                None => "Price range".to_string(),
            };
            let mut lines = vec![format!("High: ${high:.2}"), format!("Low: ${low:.2}")];
            if let Some(reason) = reason {
                lines.push(reason.clone());
            }
            if let Some(detail) = detail {
                lines.push(String::new());
                lines.push(detail.clone());
            }
            ViewBlock::lines(heading, ColorHint::Informational, lines)
        }
        Primary::Comparison { entries, reason } => ViewBlock::table(
            format!("Comparison: {} vs {}", entries[0].ticker, entries[1].ticker),
            ColorHint::Neutral,
            &["Ticker", "Price", "1Y Change"],
            entries
                .iter()
                .map(|leg| {
                    vec![
                        leg.ticker.clone(),
                        leg.price.map_or_else(|| "-".to_string(), |p| format!("${p:.2}")),
                        leg.yearly_change.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect(),
            reason.clone(),
        ),
        Primary::MarketTrend { entries, reason } => {
            market_trend_table(entries, reason.clone())
        }
        Primary::Sector {
            name,
            stocks,
            reason,
        } => ViewBlock::table(
            format!("Sector: {name}"),
            ColorHint::Neutral,
            &["Ticker", "Price"],
            stocks
                .iter()
                .map(|(ticker, price)| vec![ticker.clone(), format!("${price:.2}")])
                .collect(),
            reason.clone(),
        ),
        Primary::Error { reason } => {
            ViewBlock::lines("Error", ColorHint::Negative, vec![reason.clone()])
        }
        Primary::Unrecognized { note } => ViewBlock::lines(
            "Nothing to show",
            ColorHint::Neutral,
            vec![note.clone().unwrap_or_else(|| {
                "The service returned a response this client does not recognize.".to_string()
            })],
        ),
    }
}

fn overlay_block(overlay: &Overlay) -> ViewBlock {
    match overlay {
        Overlay::NewsLink { ticker, url } => {
            let heading = match ticker {
                Some(ticker) => format!("Latest news for {ticker}"),
                None => "Latest news".to_string(),
            };
            ViewBlock::lines(heading, ColorHint::Neutral, vec![url.clone()])
        }
        Overlay::DetailedAnalysis { text } => ViewBlock::lines(
            "Detailed analysis",
            ColorHint::Neutral,
            vec![text.clone()],
        ),
        Overlay::MarketTrend { entries } => market_trend_table(entries, None),
    }
}

fn market_trend_table(entries: &[(String, String)], note: Option<String>) -> ViewBlock {
    ViewBlock::table(
        "Market trend",
        ColorHint::Informational,
        &["Index", "Trend"],
        entries
            .iter()
            .map(|(index, trend)| vec![index.clone(), trend.clone()])
            .collect(),
        note,
    )
}

// ============================================================================
// Tests
// ============================================================================
