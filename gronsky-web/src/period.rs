use chrono::{Datelike, Local, Month};
use std::fmt;

/// Full English month name, uppercase, e.g. `MARCH`.
///
/// ```
/// use gronsky_web::PeriodToken;
///
/// let token = PeriodToken::new(" march ");
/// assert_eq!(token.as_str(), "MARCH");
/// assert_eq!(token.display_name(), "March");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeriodToken(String);

impl PeriodToken {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Token for the month containing `date`.
    pub fn for_date<D: Datelike>(date: &D) -> Self {
        let name = u8::try_from(date.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or_default();
        Self::new(name)
    }

    /// Token for the current local month.
    pub fn current_month() -> Self {
        Self::for_date(&Local::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Capitalised form for speech: first letter upper, rest lower.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Case-insensitive substring test against a heading label.
    pub fn appears_in(&self, label: &str) -> bool {
        !self.0.is_empty() && label.to_uppercase().contains(&self.0)
    }
}

impl fmt::Display for PeriodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
