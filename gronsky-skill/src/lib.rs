//! Voice skill handler for Gronsky's Milk House.
//!
//! [`Skill`] takes a platform event, routes it by request type and intent,
//! and returns the response envelope. The pancake-of-the-month intent calls
//! into `gronsky-web` for a freshness-checked read of the restaurant's site;
//! everything else is canned text.
//!
//! ```no_run
//! # async fn demo() -> gronsky_common::Result<()> {
//! use gronsky_config::SkillConfigLoader;
//! use gronsky_skill::Skill;
//!
//! let cfg = SkillConfigLoader::new()
//!     .load()
//!     .map_err(|e| gronsky_common::SkillError::Config(e.to_string()))?;
//! let skill = Skill::from_config(&cfg)?;
//! let reply = skill
//!     .handle_value(serde_json::json!({
//!         "session": { "new": false, "sessionId": "s", "application": { "applicationId": "a" } },
//!         "request": { "type": "LaunchRequest", "requestId": "r" }
//!     }))
//!     .await?;
//! assert_eq!(reply["response"]["shouldEndSession"], false);
//! # Ok(()) }
//! ```

pub mod analytics;
pub mod clock;
pub mod dispatch;
pub mod event;
pub mod response;
pub mod speech;

pub use analytics::{Analytics, NoopAnalytics, VoiceInsights};
pub use clock::{Clock, FixedPeriod, LocalClock};
pub use dispatch::Skill;
pub use event::{IntentName, RequestKind, SkillEvent};
pub use response::ResponseEnvelope;
