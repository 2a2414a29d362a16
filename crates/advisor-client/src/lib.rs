//! Query submission and session state for the stock advisor client
//!
//! This crate owns the I/O half of the client:
//!
//! - [`config`]: endpoint and timeout configuration
//! - [`submit`]: the [`Submitter`] trait and its HTTP implementation,
//!   [`AgentClient`]: exactly one request per query, nothing retried,
//!   nothing cached
//! - [`session`]: the per-query state machine with the busy guard and the
//!   single current-result slot
//!
//! Classification itself lives in `advisor-core`; this crate only feeds it.

pub mod config;
pub mod error;
pub mod session;
pub mod submit;

// Re-export main types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::{QuerySession, RejectReason, SessionState, Submission};
pub use submit::{AgentClient, Submitter};
