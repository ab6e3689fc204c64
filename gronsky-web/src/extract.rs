//! Fetch the page, check it names the current month, read the value.
//!
//! A matching heading with no subheading after it is a [`ExtractError::MissingSubheading`]:
//! the page layout changed and reporting "stale" would hide that.

use crate::document::{Document, Markers};
use crate::period::PeriodToken;
use gronsky_http::{HttpClient, HttpError, RequestOpts};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fetching source page failed: {0}")]
    Fetch(#[from] HttpError),
    #[error("heading {heading:?} names the period but no subheading follows it")]
    MissingSubheading { heading: String },
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// Result of one freshness-checked extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The page names `period` and the value was read next to that heading.
    Current { value: String, period: PeriodToken },
    /// No heading on the page names the current period yet.
    Stale,
}

impl Outcome {
    /// Sentence spoken to the user, without the call-to-action suffix.
    ///
    /// ```
    /// use gronsky_web::{Outcome, PeriodToken};
    ///
    /// let current = Outcome::Current {
    ///     value: "Blueberry Delight".into(),
    ///     period: PeriodToken::new("MARCH"),
    /// };
    /// assert_eq!(
    ///     current.speech(),
    ///     "The pancake of the month for March is Blueberry Delight. "
    /// );
    /// ```
    pub fn speech(&self) -> String {
        match self {
            Outcome::Current { value, period } => format!(
                "The pancake of the month for {} is {}. ",
                period.display_name(),
                value
            ),
            Outcome::Stale => {
                "Sorry, but the pancake of the month isn't available yet! Try again at a later time. "
                    .to_string()
            }
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, Outcome::Current { .. })
    }
}

/// Freshness check and value lookup over an already-parsed page.
pub fn evaluate(
    doc: &Document,
    period: &PeriodToken,
    markers: &Markers,
) -> Result<Outcome, ExtractError> {
    let Some(heading) = doc.find_heading(&markers.heading, period) else {
        tracing::info!(
            target: "extract",
            period=%period,
            headings=?doc.heading_labels(&markers.heading),
            "extract.stale"
        );
        return Ok(Outcome::Stale);
    };

    let value = doc
        .subheading_after(&heading, &markers.subheading)
        .ok_or_else(|| {
            tracing::error!(
                target: "extract",
                period=%period,
                heading=%heading.label(),
                subheading_selector=%markers.subheading.as_str(),
                "extract.missing_subheading"
            );
            ExtractError::MissingSubheading {
                heading: heading.label(),
            }
        })?;

    tracing::info!(
        target: "extract",
        period=%period,
        heading=%heading.label(),
        value=%value,
        "extract.current"
    );
    Ok(Outcome::Current {
        value,
        period: period.clone(),
    })
}

/// Fetches one source page per call and evaluates it.
#[derive(Debug, Clone)]
pub struct Extractor {
    http: HttpClient,
    markers: Markers,
}

impl Extractor {
    pub fn new(http: HttpClient, markers: Markers) -> Self {
        Self { http, markers }
    }

    pub fn from_url(source_url: &str, markers: Markers) -> Result<Self, ExtractError> {
        Ok(Self::new(HttpClient::new(source_url)?, markers))
    }

    pub fn source_url(&self) -> &str {
        self.http.base().as_str()
    }

    /// Single GET, no retry. Transport and HTTP failures are returned as
    /// [`ExtractError::Fetch`].
    pub async fn extract(&self, period: &PeriodToken) -> Result<Outcome, ExtractError> {
        tracing::debug!(
            target: "extract",
            source=%self.source_url(),
            period=%period,
            "extract.fetch"
        );
        let body = self
            .http
            .get_text("", fetch_opts())
            .await?;
        let doc = Document::parse(&body);
        evaluate(&doc, period, &self.markers)
    }
}

/// One attempt, transport-default timeout.
fn fetch_opts() -> RequestOpts<'static> {
    RequestOpts {
        retries: Some(0),
        ..Default::default()
    }
}

/// Fetch `source_url` with the default gronskys.com markers and evaluate it
/// against `period`.
pub async fn extract_current_period_value(
    source_url: &str,
    period: &PeriodToken,
) -> Result<Outcome, ExtractError> {
    Extractor::from_url(source_url, Markers::default())?
        .extract(period)
        .await
}
