//! Analytics side-channel.
//!
//! Each session start and each handled intent is reported to VoiceLabs. The
//! tracker is stateless: the session id travels with every event. Failures
//! are returned to the dispatcher, which logs them and carries on.

use crate::event::{IntentName, Session, SkillEvent};
use crate::response::ResponseEnvelope;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gronsky_common::SkillError;
use gronsky_config::AnalyticsConfig;
use gronsky_http::{Auth, HttpClient, RequestOpts};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait Analytics: Send + Sync {
    async fn session_started(&self, session: &Session) -> Result<(), SkillError>;

    async fn track(
        &self,
        intent: IntentName,
        event: &SkillEvent,
        response: &ResponseEnvelope,
    ) -> Result<(), SkillError>;
}

/// Used when no analytics credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

#[async_trait]
impl Analytics for NoopAnalytics {
    async fn session_started(&self, _session: &Session) -> Result<(), SkillError> {
        Ok(())
    }

    async fn track(
        &self,
        _intent: IntentName,
        _event: &SkillEvent,
        _response: &ResponseEnvelope,
    ) -> Result<(), SkillError> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum InsightEvent<'a> {
    SessionStarted {
        #[serde(flatten)]
        meta: EventMeta<'a>,
    },
    Intent {
        #[serde(flatten)]
        meta: EventMeta<'a>,
        intent: &'a str,
        request_id: &'a str,
        speech: &'a str,
        ends_session: bool,
    },
}

#[derive(Debug, Serialize)]
struct EventMeta<'a> {
    event_id: Uuid,
    timestamp: DateTime<Utc>,
    application_id: &'a str,
    session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

impl<'a> EventMeta<'a> {
    fn for_session(session: &'a Session) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            application_id: &session.application.application_id,
            session_id: &session.session_id,
            user_id: session.user.as_ref().map(|u| u.user_id.as_str()),
        }
    }
}

/// Posts events to the VoiceLabs insights endpoint with the app token as a
/// bearer credential.
#[derive(Debug, Clone)]
pub struct VoiceInsights {
    http: HttpClient,
    app_token: String,
    retries: usize,
}

impl VoiceInsights {
    pub fn new(endpoint: &str, app_token: String) -> Result<Self, SkillError> {
        let http = HttpClient::new(endpoint).map_err(|e| SkillError::Config(e.to_string()))?;
        Ok(Self {
            http,
            app_token,
            retries: 0,
        })
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    async fn post(&self, body: &InsightEvent<'_>) -> Result<(), SkillError> {
        self.http
            .send_json(
                "",
                body,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.app_token)),
                    retries: Some(self.retries),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| SkillError::Analytics(e.to_string()))
    }
}

#[async_trait]
impl Analytics for VoiceInsights {
    async fn session_started(&self, session: &Session) -> Result<(), SkillError> {
        self.post(&InsightEvent::SessionStarted {
            meta: EventMeta::for_session(session),
        })
        .await
    }

    async fn track(
        &self,
        intent: IntentName,
        event: &SkillEvent,
        response: &ResponseEnvelope,
    ) -> Result<(), SkillError> {
        self.post(&InsightEvent::Intent {
            meta: EventMeta::for_session(&event.session),
            intent: intent.as_str(),
            request_id: &event.request.request_id,
            speech: response.text(),
            ends_session: response.should_end_session(),
        })
        .await
    }
}

/// Pick the tracker for `cfg`: VoiceLabs when an api key is set, otherwise a no-op.
pub fn from_config(cfg: &AnalyticsConfig) -> Result<Arc<dyn Analytics>, SkillError> {
    match cfg.api_key() {
        Some(key) => {
            tracing::info!(endpoint=%cfg.endpoint, "analytics.enabled");
            Ok(Arc::new(
                VoiceInsights::new(&cfg.endpoint, key.to_string())?.with_retries(cfg.retries),
            ))
        }
        None => {
            tracing::info!("analytics.disabled");
            Ok(Arc::new(NoopAnalytics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({
            "new": true,
            "sessionId": "s-1",
            "application": { "applicationId": "app-1" }
        }))
        .unwrap()
    }

    #[test]
    fn session_event_shape() {
        let s = session();
        let v = serde_json::to_value(InsightEvent::SessionStarted {
            meta: EventMeta::for_session(&s),
        })
        .unwrap();
        assert_eq!(v["event"], "session_started");
        assert_eq!(v["session_id"], "s-1");
        assert_eq!(v["application_id"], "app-1");
        assert!(v.get("user_id").is_none());
        assert!(v["event_id"].is_string());
    }

    #[test]
    fn missing_key_selects_noop() {
        let cfg = AnalyticsConfig::default();
        assert!(from_config(&cfg).is_ok());
    }
}
