//! Routes one event to its response builder.

use crate::analytics::{self, Analytics};
use crate::clock::{Clock, LocalClock};
use crate::event::{IntentName, RequestKind, SkillEvent};
use crate::response::ResponseEnvelope;
use crate::speech;
use gronsky_common::{Result, SkillError};
use gronsky_config::SkillConfig;
use gronsky_web::{Extractor, Markers};
use serde_json::Value;
use std::sync::Arc;

/// The skill handler. Holds only immutable collaborators, so one value can
/// serve any number of sequential invocations.
#[derive(Clone)]
pub struct Skill {
    extractor: Extractor,
    analytics: Arc<dyn Analytics>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("source", &self.extractor.source_url())
            .finish_non_exhaustive()
    }
}

impl Skill {
    pub fn new(extractor: Extractor, analytics: Arc<dyn Analytics>, clock: Arc<dyn Clock>) -> Self {
        Self {
            extractor,
            analytics,
            clock,
        }
    }

    /// Wire the skill from configuration: source page and markers, analytics
    /// credential, local wall clock.
    pub fn from_config(cfg: &SkillConfig) -> Result<Self> {
        let markers = Markers::new(&cfg.source.heading_selector, &cfg.source.subheading_selector)
            .map_err(|e| SkillError::Config(e.to_string()))?;
        let extractor = Extractor::from_url(&cfg.source.url, markers)
            .map_err(|e| SkillError::Config(e.to_string()))?;
        let analytics = analytics::from_config(&cfg.analytics)?;
        Ok(Self::new(extractor, analytics, Arc::new(LocalClock)))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Handle raw event JSON. A session-ended event produces JSON `null`.
    pub async fn handle_value(&self, raw: Value) -> Result<Value> {
        let event = SkillEvent::from_value(raw)?;
        let response = self.handle(&event).await?;
        serde_json::to_value(response).map_err(|e| SkillError::MalformedEvent(e.to_string()))
    }

    /// Handle one event. `None` means the platform expects no speech.
    pub async fn handle(&self, event: &SkillEvent) -> Result<Option<ResponseEnvelope>> {
        let session = &event.session;
        let request = &event.request;
        tracing::debug!(
            application_id=%session.application.application_id,
            request_type=%request.request_type,
            "skill.event"
        );

        if session.new {
            tracing::info!(
                request_id=%request.request_id,
                session_id=%session.session_id,
                "skill.session_started"
            );
            if let Err(e) = self.analytics.session_started(session).await {
                tracing::warn!(session_id=%session.session_id, error=%e, "analytics.session_started.failed");
            }
        }

        match event.kind()? {
            RequestKind::Launch => {
                tracing::info!(
                    request_id=%request.request_id,
                    session_id=%session.session_id,
                    "skill.launch"
                );
                Ok(Some(speech::welcome()))
            }
            RequestKind::Intent(intent) => self.on_intent(intent, event).await.map(Some),
            RequestKind::SessionEnded => {
                tracing::info!(
                    request_id=%request.request_id,
                    session_id=%session.session_id,
                    reason=?request.reason,
                    "skill.session_ended"
                );
                Ok(None)
            }
        }
    }

    async fn on_intent(&self, intent: IntentName, event: &SkillEvent) -> Result<ResponseEnvelope> {
        tracing::info!(
            request_id=%event.request.request_id,
            session_id=%event.session.session_id,
            %intent,
            "skill.intent"
        );

        let response = match intent {
            IntentName::Help => speech::help(),
            IntentName::Cancel | IntentName::Stop => speech::goodbye(),
            IntentName::AboutGronskys => speech::about(),
            IntentName::PancakeOfTheMonth => self.pancake_of_the_month().await?,
        };

        if let Err(e) = self.analytics.track(intent, event, &response).await {
            tracing::warn!(%intent, error=%e, "analytics.track.failed");
        }
        Ok(response)
    }

    async fn pancake_of_the_month(&self) -> Result<ResponseEnvelope> {
        let period = self.clock.period();
        let outcome = self
            .extractor
            .extract(&period)
            .await
            .map_err(|e| SkillError::Extract(Box::new(e)))?;
        Ok(speech::pancake(&outcome))
    }
}
