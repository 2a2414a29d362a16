//! Response classification and view model for the stock advisor client
//!
//! The remote analysis service answers free-text financial questions with a
//! loosely-shaped JSON object: depending on the question it may carry a
//! buy/sell recommendation, a price range, a two-stock comparison, a market
//! trend digest, a sector breakdown, or an error. This crate owns the logic
//! that decides which of those mutually-exclusive shapes a response
//! represents and what to display for it:
//!
//! - [`response`]: the lenient wire model ([`RawResponse`]) and the
//!   [`Query`] type
//! - [`classify`]: the ordered classification rules producing a
//!   [`Classification`]
//! - [`render`]: the deterministic per-variant view model
//!
//! The crate is pure: no I/O, no async. Network submission lives in
//! `advisor-client`.

pub mod classify;
pub mod render;
pub mod response;

// Re-export main types for convenience
pub use classify::{
    Classification, ClassifierOptions, ColorHint, ComparisonLeg, Overlay, Primary, TrendPolicy,
    classify, classify_with,
};
pub use render::{BlockBody, ViewBlock, render};
pub use response::{Query, RawResponse, RecommendationTag};
