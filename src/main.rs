use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use release_alert::config::{
    DEFAULT_CHECK_FREQUENCY_DAYS, EngineConfig, FETCH_TIMEOUT_MS, data_dir, db_path, init_logging,
    log_path,
};
use release_alert::version::decision::{AlertDecision, UserAction};
use release_alert::version::engine::{RunOutcome, UpdateEngine};
use release_alert::version::localize::BundledLocalizer;
use release_alert::version::registries::HttpVersionSource;
use release_alert::version::state::CheckState;
use release_alert::version::store::SqliteStore;
use release_alert::version::throttle::CheckFrequency;

#[derive(Parser)]
#[command(name = "release-alert")]
#[command(version, about = "Check for a newer app release and decide whether to prompt")]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// App identifier; overrides the config file
    #[arg(long, global = true)]
    app_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up the latest release and print the decision
    Check {
        /// Version of the installed app
        #[arg(long)]
        installed: String,

        /// Minimum days between lookups (0 = every time)
        #[arg(long, default_value_t = DEFAULT_CHECK_FREQUENCY_DAYS)]
        frequency_days: u32,

        /// Host locale for display text
        #[arg(long)]
        locale: Option<String>,
    },
    /// Stop prompting for a specific version
    Skip {
        version: String,

        /// Version of the installed app
        #[arg(long)]
        installed: String,
    },
    /// Print the stored check state
    State,
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(app_id) = &cli.app_id {
        config.app_identifier = app_id.clone();
    }
    Ok(config)
}

fn print_state(state: &CheckState) {
    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    println!("last check:      {}", show(state.last_check.map(|t| t.to_rfc3339())));
    println!("last prompt:     {}", show(state.last_prompt.map(|t| t.to_rfc3339())));
    println!("skipped version: {}", show(state.skipped_version.clone()));
}

fn build_engine(config: EngineConfig, installed: &str) -> anyhow::Result<UpdateEngine> {
    let source = HttpVersionSource::new(Duration::from_millis(FETCH_TIMEOUT_MS))?;
    let engine = UpdateEngine::new(
        config,
        installed,
        Arc::new(source),
        Arc::new(SqliteStore::new(&db_path())?),
        Arc::new(BundledLocalizer),
    )?;
    Ok(engine)
}

async fn run_check(
    config: EngineConfig,
    installed: &str,
    frequency: CheckFrequency,
    locale: Option<&str>,
) -> anyhow::Result<()> {
    let engine = build_engine(config, installed)?;

    match engine.run_check(frequency).await {
        RunOutcome::NotDue => println!("Not checked: last check is too recent"),
        RunOutcome::Busy => println!("Not checked: another check is in flight"),
        RunOutcome::NoUpdate => println!("No release found"),
        RunOutcome::FetchFailed(e) => println!("Check failed: {}", e),
        RunOutcome::Decided(AlertDecision::Suppressed(reason)) => {
            println!("No prompt: {}", reason.as_str())
        }
        RunOutcome::Decided(decision) => {
            if let Some(prompt) = engine.prompt(&decision, locale) {
                println!("{}", prompt.title);
                println!("{}", prompt.message);
                for (_, label) in prompt.actions {
                    println!("  [{}]", label);
                }
            }
        }
    }

    Ok(())
}

async fn run_skip(config: EngineConfig, installed: &str, version: &str) -> anyhow::Result<()> {
    let engine = build_engine(config, installed)?;
    engine.report(UserAction::Skipped, version).await;
    println!("Skipping {}", version);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    std::fs::create_dir_all(data_dir())?;
    let _guard = init_logging(&log_path(), config.debug_logging)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Check {
            installed,
            frequency_days,
            locale,
        } => runtime.block_on(run_check(
            config,
            &installed,
            CheckFrequency::from_days(frequency_days),
            locale.as_deref(),
        )),
        Command::Skip { version, installed } => {
            runtime.block_on(run_skip(config, &installed, &version))
        }
        Command::State => {
            let store = SqliteStore::new(&db_path())?;
            print_state(&CheckState::load(&store));
            Ok(())
        }
    }
}
