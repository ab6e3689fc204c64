//! Inbound events from the voice platform.
//!
//! The raw JSON is deserialised into [`SkillEvent`] and then narrowed into
//! [`RequestKind`], a closed set; anything outside it is an error.

use gronsky_common::SkillError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct SkillEvent {
    #[serde(default)]
    pub version: Option<String>,
    pub session: Session,
    pub request: Request,
}

impl SkillEvent {
    pub fn from_value(raw: Value) -> Result<Self, SkillError> {
        serde_json::from_value(raw).map_err(|e| SkillError::MalformedEvent(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, SkillError> {
        serde_json::from_str(raw).map_err(|e| SkillError::MalformedEvent(e.to_string()))
    }

    pub fn kind(&self) -> Result<RequestKind, SkillError> {
        self.request.kind()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    pub application: Application,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    pub request_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
    /// Set on `SessionEndedRequest` (`USER_INITIATED`, `ERROR`, ...).
    #[serde(default)]
    pub reason: Option<String>,
}

impl Request {
    pub fn kind(&self) -> Result<RequestKind, SkillError> {
        match self.request_type.as_str() {
            "LaunchRequest" => Ok(RequestKind::Launch),
            "IntentRequest" => {
                let intent = self.intent.as_ref().ok_or_else(|| {
                    SkillError::MalformedEvent("IntentRequest without intent".into())
                })?;
                Ok(RequestKind::Intent(intent.name.parse()?))
            }
            "SessionEndedRequest" => Ok(RequestKind::SessionEnded),
            other => Err(SkillError::UnrecognizedRequest(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent(IntentName),
    SessionEnded,
}

/// Intents declared in the interaction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentName {
    Help,
    Cancel,
    Stop,
    AboutGronskys,
    PancakeOfTheMonth,
}

impl IntentName {
    pub const ALL: [IntentName; 5] = [
        IntentName::Help,
        IntentName::Cancel,
        IntentName::Stop,
        IntentName::AboutGronskys,
        IntentName::PancakeOfTheMonth,
    ];

    /// Name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            IntentName::Help => "AMAZON.HelpIntent",
            IntentName::Cancel => "AMAZON.CancelIntent",
            IntentName::Stop => "AMAZON.StopIntent",
            IntentName::AboutGronskys => "AboutGronskys",
            IntentName::PancakeOfTheMonth => "PancakeOfTheMonth",
        }
    }
}

impl FromStr for IntentName {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentName::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| SkillError::UnrecognizedIntent(s.to_string()))
    }
}

impl fmt::Display for IntentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(request: Value) -> Value {
        json!({
            "version": "1.0",
            "session": {
                "new": true,
                "sessionId": "amzn1.echo-api.session.1",
                "application": { "applicationId": "amzn1.ask.skill.1" },
                "user": { "userId": "amzn1.ask.account.1" }
            },
            "request": request
        })
    }

    #[test]
    fn intent_names_round_trip() {
        for intent in IntentName::ALL {
            assert_eq!(intent.as_str().parse::<IntentName>().unwrap(), intent);
        }
    }

    #[test]
    fn unknown_intent_is_rejected() {
        let err = "OrderWaffles".parse::<IntentName>().unwrap_err();
        assert!(matches!(err, SkillError::UnrecognizedIntent(ref n) if n == "OrderWaffles"));
    }

    #[test]
    fn intent_names_are_case_sensitive() {
        assert!("pancakeofthemonth".parse::<IntentName>().is_err());
    }

    #[test]
    fn parses_intent_request() {
        let ev = SkillEvent::from_value(event(json!({
            "type": "IntentRequest",
            "requestId": "req-1",
            "locale": "en-US",
            "intent": { "name": "PancakeOfTheMonth", "slots": {} }
        })))
        .unwrap();
        assert!(ev.session.new);
        assert_eq!(ev.request.request_id, "req-1");
        assert_eq!(
            ev.kind().unwrap(),
            RequestKind::Intent(IntentName::PancakeOfTheMonth)
        );
    }

    #[test]
    fn parses_launch_and_session_end() {
        let launch = SkillEvent::from_value(event(json!({
            "type": "LaunchRequest", "requestId": "req-2"
        })))
        .unwrap();
        assert_eq!(launch.kind().unwrap(), RequestKind::Launch);

        let ended = SkillEvent::from_value(event(json!({
            "type": "SessionEndedRequest", "requestId": "req-3", "reason": "USER_INITIATED"
        })))
        .unwrap();
        assert_eq!(ended.kind().unwrap(), RequestKind::SessionEnded);
        assert_eq!(ended.request.reason.as_deref(), Some("USER_INITIATED"));
    }

    #[test]
    fn unknown_request_type_is_rejected() {
        let ev = SkillEvent::from_value(event(json!({
            "type": "CanFulfillIntentRequest", "requestId": "req-4"
        })))
        .unwrap();
        assert!(matches!(ev.kind(), Err(SkillError::UnrecognizedRequest(_))));
    }

    #[test]
    fn intent_request_without_intent_is_malformed() {
        let ev = SkillEvent::from_value(event(json!({
            "type": "IntentRequest", "requestId": "req-5"
        })))
        .unwrap();
        assert!(matches!(ev.kind(), Err(SkillError::MalformedEvent(_))));
    }

    #[test]
    fn missing_session_is_malformed() {
        let err = SkillEvent::from_value(json!({
            "request": { "type": "LaunchRequest", "requestId": "req-6" }
        }))
        .unwrap_err();
        assert!(matches!(err, SkillError::MalformedEvent(_)));
    }
}
