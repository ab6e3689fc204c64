use gronsky_common::observability::LogFormat;
use gronsky_config::{DEFAULT_HEADING_SELECTOR, DEFAULT_SUBHEADING_SELECTOR, SkillConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_and_expands_credentials() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "gronsky.yaml",
        r#"
source:
  url: "http://www.gronskys.com/"
analytics:
  api_key: "${VOICELABS_API_KEY}"
  retries: 3
logging:
  filter: "debug"
  format: "json"
  stderr: false
"#,
    );

    temp_env::with_var("VOICELABS_API_KEY", Some("vl-secret"), || {
        let cfg = SkillConfigLoader::new()
            .with_file(&p, true)
            .load()
            .expect("load skill config");

        assert_eq!(cfg.analytics.api_key(), Some("vl-secret"));
        assert_eq!(cfg.analytics.retries, 3);
        assert_eq!(cfg.source.heading_selector, DEFAULT_HEADING_SELECTOR);
        assert_eq!(cfg.source.subheading_selector, DEFAULT_SUBHEADING_SELECTOR);
        assert_eq!(cfg.logging.filter, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert!(!cfg.logging.stderr);
    });
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "gronsky.yaml", "source:\n  url: \"http://from-file/\"\n");

    temp_env::with_var("GRONSKY__SOURCE__URL", Some("http://from-env/"), || {
        let cfg = SkillConfigLoader::new()
            .with_file(&p, true)
            .load()
            .expect("load skill config");
        assert_eq!(cfg.source.url, "http://from-env/");
    });
}

#[test]
#[serial]
fn optional_missing_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let cfg = SkillConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"), false)
        .load()
        .expect("optional file may be missing");
    assert_eq!(cfg.source.url, gronsky_config::DEFAULT_SOURCE_URL);
    assert!(cfg.analytics.api_key().is_none());
}

#[test]
#[serial]
fn required_missing_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let res = SkillConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"), true)
        .load();
    assert!(res.is_err());
}

#[test]
#[serial]
fn environment_overrides_typed_fields() {
    temp_env::with_vars(
        [
            ("GRONSKY__ANALYTICS__RETRIES", Some("2")),
            ("GRONSKY__LOGGING__STDERR", Some("false")),
            ("GRONSKY__ANALYTICS__API_KEY", Some("12345")),
        ],
        || {
            let cfg = SkillConfigLoader::new()
                .with_yaml_str("analytics:\n  retries: 5\n")
                .load()
                .expect("load skill config");
            assert_eq!(cfg.analytics.retries, 2);
            assert!(!cfg.logging.stderr);
            assert_eq!(cfg.analytics.api_key(), Some("12345"));
        },
    );
}
