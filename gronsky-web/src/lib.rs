//! Freshness-checked scraping of the pancake of the month.
//!
//! - [`document`]: parsed HTML with typed marker queries
//! - [`period`]: the current calendar month as a comparison token
//! - [`extract`]: fetch, freshness check, and value extraction
//!
//! The upstream page is maintained by hand on no fixed schedule, so a value
//! is only reported when a heading on the page names the current month.
//! Otherwise the result is [`Outcome::Stale`].

pub mod document;
pub mod extract;
pub mod period;

pub use document::{Document, Marker, Markers};
pub use extract::{evaluate, extract_current_period_value, ExtractError, Extractor, Outcome};
pub use period::PeriodToken;
