//! Common types shared across the Gronsky's skill crates.
//!
//! This crate holds the dispatcher-level error type and the observability
//! helpers. It stays dependency-light so every crate in the workspace can
//! depend on it.
//!
//! # Overview
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`SkillError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use gronsky_common::SkillError;
//!
//! let err = SkillError::UnrecognizedIntent("OrderPizza".into());
//! assert_eq!(err.to_string(), "unrecognized intent: OrderPizza");
//! ```

pub mod observability;

/// Errors surfaced by the skill dispatcher.
///
/// Every variant is fatal for the invocation that produced it; the voice
/// platform renders them as a generic failure.
#[derive(thiserror::Error, Debug)]
pub enum SkillError {
    /// The event carried a request type the skill does not handle.
    #[error("unrecognized request type: {0}")]
    UnrecognizedRequest(String),

    /// The intent name is not part of the skill's interaction model.
    #[error("unrecognized intent: {0}")]
    UnrecognizedIntent(String),

    /// The event JSON did not have the expected shape.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Scraping the upstream page failed (network or structural).
    #[error("extraction failed: {0}")]
    Extract(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The analytics side-channel rejected an event.
    #[error("analytics error: {0}")]
    Analytics(String),
}

/// Convenient alias for results that use [`SkillError`].
pub type Result<T> = std::result::Result<T, SkillError>;
