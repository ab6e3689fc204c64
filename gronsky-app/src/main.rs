use anyhow::Result;
use clap::{Parser, Subcommand};
use gronsky_common::observability::{LogConfig, init_logging};
use gronsky_config::{SkillConfig, SkillConfigLoader};
use gronsky_skill::Skill;
use std::path::PathBuf;

mod invoke;

#[derive(Debug, Parser)]
#[command(name = "gronsky", version, about = "Gronsky's voice skill handler")]
struct Cli {
    /// YAML config file; optional, environment variables apply either way.
    #[arg(long, env = "GRONSKY_CONFIG", default_value = "gronsky.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Handle skill events and print each response envelope as JSON.
    ///
    /// Reads one event from `--event`, or newline-delimited events from stdin.
    Invoke {
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Run the pancake-of-the-month lookup once and print the sentence.
    Pancake {
        /// Month to check instead of the current one.
        #[arg(long)]
        month: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg: SkillConfig = SkillConfigLoader::new()
        .with_file(&cli.config, false)
        .load()?;

    init_logging(log_config(&cfg))?;
    tracing::debug!(config=%cli.config.display(), source=%cfg.source.url, "app.config_loaded");

    let skill = Skill::from_config(&cfg)?;

    match cli.command {
        Command::Invoke { event: Some(path) } => invoke::from_file(&skill, &path).await,
        Command::Invoke { event: None } => invoke::from_stdin(&skill).await,
        Command::Pancake { month } => invoke::pancake(&cfg, month.as_deref()).await,
    }
}

fn log_config(cfg: &SkillConfig) -> LogConfig {
    LogConfig {
        file_sink: cfg.logging.dir.is_some(),
        log_dir: cfg.logging.dir.as_ref().map(PathBuf::from),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}
