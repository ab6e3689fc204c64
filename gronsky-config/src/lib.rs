//! Loader for the skill configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an optional YAML file, inline YAML (tests and
//! the CLI), then `GRONSKY__`-prefixed environment variables, where `__`
//! separates nesting levels (`GRONSKY__ANALYTICS__API_KEY`). After merging,
//! `${VAR}` placeholders in string values are expanded from the process
//! environment.
use config::{Config, ConfigError, Environment, File};
use gronsky_common::observability::LogFormat;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_SOURCE_URL: &str = "http://www.gronskys.com/";
pub const DEFAULT_HEADING_SELECTOR: &str = "h2.av-special-heading-tag";
pub const DEFAULT_SUBHEADING_SELECTOR: &str = "div.av-subheading";
pub const DEFAULT_ANALYTICS_ENDPOINT: &str = "https://api.voicelabs.io/events";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The page scraped for the pancake of the month and the two markers used
/// to read it.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_heading_selector")]
    pub heading_selector: String,
    #[serde(default = "default_subheading_selector")]
    pub subheading_selector: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            heading_selector: default_heading_selector(),
            subheading_selector: default_subheading_selector(),
        }
    }
}

/// Credentials for the analytics side-channel. Without an `api_key`
/// tracking is disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub api_key: Option<String>,
    #[serde(default = "default_analytics_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_analytics_retries")]
    pub retries: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_analytics_endpoint(),
            retries: default_analytics_retries(),
        }
    }
}

impl AnalyticsConfig {
    /// The configured key, ignoring blanks and unexpanded placeholders.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub stderr: bool,
    /// When set, events are also written to a daily rolling file here.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
            stderr: true,
            dir: None,
        }
    }
}

/// Env values are type-guessed, so an all-digit key arrives as a number.
fn scalar_as_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.into()
}
fn default_heading_selector() -> String {
    DEFAULT_HEADING_SELECTOR.into()
}
fn default_subheading_selector() -> String {
    DEFAULT_SUBHEADING_SELECTOR.into()
}
fn default_analytics_endpoint() -> String {
    DEFAULT_ANALYTICS_ENDPOINT.into()
}
fn default_analytics_retries() -> usize {
    1
}
fn default_log_filter() -> String {
    "info".into()
}
fn default_true() -> bool {
    true
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SkillConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for SkillConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillConfigLoader {
    /// Start with built-in defaults and `GRONSKY__` env overrides.
    ///
    /// ```
    /// use gronsky_config::{SkillConfigLoader, DEFAULT_SOURCE_URL};
    ///
    /// let cfg = SkillConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
    /// assert!(cfg.analytics.api_key().is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "GRONSKY",
        }
    }

    /// Attach a YAML file. Missing files are an error unless `required` is false,
    /// which lets headless deployments rely purely on environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(required));
        self
    }

    /// Merge an inline YAML snippet after any files.
    ///
    /// ```
    /// use gronsky_config::SkillConfigLoader;
    ///
    /// let cfg = SkillConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// source:
    ///   url: "http://localhost:8080/"
    /// analytics:
    ///   api_key: "abc123"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.source.url, "http://localhost:8080/");
    /// assert_eq!(cfg.analytics.api_key(), Some("abc123"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use gronsky_config::SkillConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_VOICELABS_KEY", "from-env"); }
    ///
    /// let cfg = SkillConfigLoader::new()
    ///     .with_yaml_str("analytics:\n  api_key: \"${DOC_VOICELABS_KEY}\"\n")
    ///     .load()
    ///     .expect("valid configuration");
    /// assert_eq!(cfg.analytics.api_key(), Some("from-env"));
    ///
    /// unsafe { std::env::remove_var("DOC_VOICELABS_KEY"); }
    /// ```
    pub fn load(self) -> Result<SkillConfig, ConfigError> {
        // Environment goes last so it overrides every file.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: SkillConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("GRONSKY_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${GRONSKY_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_values() {
        temp_env::with_vars(
            [("GRONSKY_TEST_HOST", Some("gronskys.com")), ("GRONSKY_TEST_SCHEME", Some("http"))],
            || {
                let mut v = json!({
                    "source": { "url": "${GRONSKY_TEST_SCHEME}://www.${GRONSKY_TEST_HOST}/" },
                    "list": ["$GRONSKY_TEST_HOST", 1, null]
                });
                expand_env_in_value(&mut v);
                assert_eq!(
                    v,
                    json!({
                        "source": { "url": "http://www.gronskys.com/" },
                        "list": ["gronskys.com", 1, null]
                    })
                );
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars(
            [("GRONSKY_CYCLE_A", Some("${GRONSKY_CYCLE_B}")), ("GRONSKY_CYCLE_B", Some("${GRONSKY_CYCLE_A}"))],
            || {
                let mut v = json!("x=${GRONSKY_CYCLE_A}-y");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with("x=") && s.ends_with("-y"));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${GRONSKY_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${GRONSKY_DOES_NOT_EXIST}"));
    }

    #[test]
    fn unexpanded_api_key_counts_as_missing() {
        let cfg = AnalyticsConfig {
            api_key: Some("${VOICELABS_API_KEY}".into()),
            ..AnalyticsConfig::default()
        };
        assert_eq!(cfg.api_key(), None);

        let blank = AnalyticsConfig {
            api_key: Some("   ".into()),
            ..AnalyticsConfig::default()
        };
        assert_eq!(blank.api_key(), None);
    }
}
