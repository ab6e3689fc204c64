//! Canned responses.

use crate::response::ResponseEnvelope;
use gronsky_web::Outcome;

const REPROMPT: &str = "Sorry, I didn't catch that. \
Say 'Tell me about Gronsky's' to hear some information about Gronsky's \
or say 'Pancake of the Month' to hear the pancake of the month.";

const ABOUT_SUFFIX: &str =
    "To hear more information about Gronsky's, say 'Tell me about Gronsky's'. Otherwise, say 'Stop' to quit.";

const PANCAKE_SUFFIX: &str =
    "To hear Gronsky's pancake of the month, say 'Pancake of the Month'. Otherwise, say 'Stop' to quit.";

pub fn welcome() -> ResponseEnvelope {
    ResponseEnvelope::plain(
        "Welcome to the Gronsky's Alexa skill! \
         To hear some information about Gronsky's, say 'Tell me about Gronsky's.' \
         To hear Gronsky's pancake of the month, say 'Pancake of the Month'.",
        false,
    )
    .with_reprompt(REPROMPT)
}

pub fn help() -> ResponseEnvelope {
    ResponseEnvelope::plain(
        "Hello! \
         This skill will tell you information about Gronsky's, a restaurant located in High Bridge, NJ. \
         To hear some information about Gronsky's, say 'Tell me about Gronsky's.' \
         To hear Gronsky's pancake of the month, say 'Pancake of the Month'.",
        false,
    )
    .with_reprompt(REPROMPT)
}

/// Cancel and stop both land here; the only path that ends the session.
pub fn goodbye() -> ResponseEnvelope {
    ResponseEnvelope::plain(
        "Thanks for using the Gronsky's Alexa skill! Hope you visit us soon! Goodbye!",
        true,
    )
}

pub fn about() -> ResponseEnvelope {
    let text = format!(
        "Gronsky's Milk House is a family-owned ice cream store and restaurant located at \
         125 West Main Street in High Bridge, New Jersey. \
         It was founded in 1978 by Jackie and Steve Gronsky. \
         Originally a small convenience and ice cream store, Gronsky’s added a restaurant in 1988 \
         to serve breakfast and lunch. {PANCAKE_SUFFIX}"
    );
    ResponseEnvelope::plain(text, false)
}

pub fn pancake(outcome: &Outcome) -> ResponseEnvelope {
    ResponseEnvelope::plain(format!("{}{ABOUT_SUFFIX}", outcome.speech()), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gronsky_web::PeriodToken;

    #[test]
    fn only_goodbye_ends_the_session() {
        assert!(goodbye().should_end_session());
        for env in [welcome(), help(), about(), pancake(&Outcome::Stale)] {
            assert!(!env.should_end_session());
        }
    }

    #[test]
    fn pancake_appends_call_to_action() {
        let env = pancake(&Outcome::Current {
            value: "Blueberry Delight".into(),
            period: PeriodToken::new("MARCH"),
        });
        assert_eq!(
            env.text(),
            "The pancake of the month for March is Blueberry Delight. \
             To hear more information about Gronsky's, say 'Tell me about Gronsky's'. Otherwise, say 'Stop' to quit."
        );
    }

    #[test]
    fn stale_pancake_apologises() {
        let env = pancake(&Outcome::Stale);
        assert!(env.text().starts_with("Sorry, but the pancake of the month isn't available yet!"));
        assert!(env.text().ends_with("say 'Stop' to quit."));
    }

    #[test]
    fn about_points_at_the_pancake_intent() {
        assert!(about().text().ends_with(PANCAKE_SUFFIX));
        assert!(about().text().contains("founded in 1978"));
        assert!(about().text().contains("Gronsky’s added a restaurant in 1988 to serve"));
    }

    #[test]
    fn welcome_and_help_reprompt() {
        assert!(welcome().response.reprompt.is_some());
        assert!(help().response.reprompt.is_some());
        assert!(goodbye().response.reprompt.is_none());
    }
}
