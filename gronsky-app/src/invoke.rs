use anyhow::{Context, Result, bail};
use gronsky_common::SkillError;
use gronsky_config::SkillConfig;
use gronsky_skill::Skill;
use gronsky_web::{Extractor, Markers, PeriodToken};
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use std::path::Path;

pub async fn from_file(skill: &Skill, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event file: {}", path.display()))?;
    let event: Value = serde_json::from_str(&raw).context("event file is not valid JSON")?;
    let reply = skill.handle_value(event).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

/// One event per line, handled strictly in order. A failed event prints an
/// error object in its slot and the run exits non-zero at the end.
pub async fn from_stdin(skill: &Skill) -> Result<()> {
    let stdin = std::io::stdin();
    let mut out = std::io::stdout().lock();
    let mut failures = 0usize;

    for (idx, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let result = match serde_json::from_str::<Value>(&line) {
            Ok(event) => skill.handle_value(event).await,
            Err(e) => Err(SkillError::MalformedEvent(e.to_string())),
        };
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                failures += 1;
                tracing::error!(line = idx + 1, error = %err, "app.invoke.failed");
                error_reply(&err)
            }
        };
        writeln!(out, "{}", serde_json::to_string(&reply)?)?;
        out.flush()?;
    }

    if failures > 0 {
        bail!("{failures} event(s) failed");
    }
    Ok(())
}

pub async fn pancake(cfg: &SkillConfig, month: Option<&str>) -> Result<()> {
    let period = month.map_or_else(PeriodToken::current_month, PeriodToken::new);
    let markers = Markers::new(&cfg.source.heading_selector, &cfg.source.subheading_selector)?;
    let outcome = Extractor::from_url(&cfg.source.url, markers)?
        .extract(&period)
        .await?;
    println!("{}", outcome.speech().trim_end());
    Ok(())
}

fn error_reply(err: &SkillError) -> Value {
    let kind = match err {
        SkillError::UnrecognizedRequest(_) => "UnrecognizedRequest",
        SkillError::UnrecognizedIntent(_) => "UnrecognizedIntent",
        SkillError::MalformedEvent(_) => "MalformedEvent",
        SkillError::Extract(_) => "Extract",
        SkillError::Config(_) => "Config",
        SkillError::Analytics(_) => "Analytics",
    };
    json!({ "errorType": kind, "errorMessage": err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_reply_names_the_variant() {
        let v = error_reply(&SkillError::UnrecognizedIntent("OrderWaffles".into()));
        assert_eq!(v["errorType"], "UnrecognizedIntent");
        assert_eq!(v["errorMessage"], "unrecognized intent: OrderWaffles");
    }
}
