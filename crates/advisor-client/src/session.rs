//! Per-query session state machine
//!
//! One request/render cycle at a time. The session holds the single
//! "current result" slot and enforces the busy guard: a new submission is
//! rejected while one is outstanding, and each resolved cycle replaces the
//! previous result wholesale, so fields from two responses can never mix.
//!
//! Transitions are driven by exactly two events, submit-start ([`begin`])
//! and submit-resolve ([`resolve`]); [`ask`] composes them around the
//! network call.
//!
//! [`begin`]: QuerySession::begin
//! [`resolve`]: QuerySession::resolve
//! [`ask`]: QuerySession::ask

use crate::error::ClientError;
use crate::submit::Submitter;
use advisor_core::classify::{Classification, ClassifierOptions, classify_with};
use advisor_core::response::{Query, RawResponse};
use tracing::warn;

/// Where the session currently stands.
#[derive(Debug)]
pub enum SessionState {
    /// No query submitted yet
    Idle,
    /// A request is outstanding; new submissions are rejected
    Submitting,
    /// The last cycle resolved with a service response
    Rendered(Classification),
    /// The last cycle ended in a transport failure; holds the
    /// classification of the synthetic error payload
    Failed(Classification),
}

/// Why a submission did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Empty or whitespace-only input; a no-op, prior state untouched
    EmptyQuery,
    /// A request is already outstanding
    Busy,
}

/// Outcome of [`QuerySession::ask`].
#[derive(Debug)]
pub enum Submission<'a> {
    Completed(&'a Classification),
    Rejected(RejectReason),
}

/// Session driving one query cycle at a time.
pub struct QuerySession {
    submitter: Box<dyn Submitter>,
    options: ClassifierOptions,
    state: SessionState,
}

impl QuerySession {
    pub fn new(submitter: Box<dyn Submitter>, options: ClassifierOptions) -> Self {
        Self {
            submitter,
            options,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Classification of the last resolved cycle, if any.
    pub fn current(&self) -> Option<&Classification> {
        match &self.state {
            SessionState::Rendered(classification) | SessionState::Failed(classification) => {
                Some(classification)
            }
            SessionState::Idle | SessionState::Submitting => None,
        }
    }

    /// Submit-start event. Validates the input and takes the busy slot.
    ///
    /// On rejection the prior state is left exactly as it was; an empty
    /// query is a no-op, not an error.
    pub fn begin(&mut self, input: &str) -> std::result::Result<Query, RejectReason> {
        let Some(query) = Query::parse(input) else {
            return Err(RejectReason::EmptyQuery);
        };
        if matches!(self.state, SessionState::Submitting) {
            return Err(RejectReason::Busy);
        }
        // The previous result is dropped in its entirety here; the new
        // cycle starts from a clean slot.
        self.state = SessionState::Submitting;
        Ok(query)
    }

    /// Submit-resolve event. A transport failure is swallowed into the
    /// synthetic error payload so that every cycle ends in something
    /// renderable.
    pub fn resolve(&mut self, outcome: std::result::Result<RawResponse, ClientError>) {
        self.state = match outcome {
            Ok(raw) => SessionState::Rendered(classify_with(&raw, &self.options)),
            Err(error) => {
                warn!(%error, "submission failed; rendering synthetic error");
                SessionState::Failed(classify_with(
                    &RawResponse::transport_error(),
                    &self.options,
                ))
            }
        };
    }

    /// Run one full cycle: begin, submit, resolve.
    pub async fn ask(&mut self, input: &str) -> Submission<'_> {
        let query = match self.begin(input) {
            Ok(query) => query,
            Err(reason) => return Submission::Rejected(reason),
        };
        let outcome = self.submitter.submit(&query).await;
        self.resolve(outcome);
        match self.current() {
            Some(classification) => Submission::Completed(classification),
            // resolve() always lands in a terminal state
            None => Submission::Rejected(RejectReason::Busy),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
