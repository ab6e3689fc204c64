//! Outbound response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const RESPONSE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    /// Always empty: the skill keeps no per-session state.
    pub session_attributes: Map<String, Value>,
    pub response: SpeechletResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    pub output_speech: OutputSpeech,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: SpeechType,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechType {
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            speech_type: SpeechType::PlainText,
            text: text.into(),
        }
    }
}

impl ResponseEnvelope {
    /// Plain-text response with empty session attributes.
    ///
    /// ```
    /// use gronsky_skill::response::ResponseEnvelope;
    ///
    /// let env = ResponseEnvelope::plain("Goodbye!", true);
    /// let json = serde_json::to_value(&env).unwrap();
    /// assert_eq!(json["response"]["outputSpeech"]["type"], "PlainText");
    /// assert_eq!(json["response"]["shouldEndSession"], true);
    /// assert!(json["sessionAttributes"].as_object().unwrap().is_empty());
    /// ```
    pub fn plain(text: impl Into<String>, should_end_session: bool) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: Map::new(),
            response: SpeechletResponse {
                output_speech: OutputSpeech::plain(text),
                reprompt: None,
                should_end_session,
            },
        }
    }

    pub fn with_reprompt(mut self, text: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::plain(text),
        });
        self
    }

    pub fn text(&self) -> &str {
        &self.response.output_speech.text
    }

    pub fn should_end_session(&self) -> bool {
        self.response.should_end_session
    }
}
