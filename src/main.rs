use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use pulse_sens::config::AppConfig;
use pulse_sens::notifiers::{ConsoleNotifier, LogNotifier};
use pulse_sens::Screen;
use pulse_sens_core::{SharedNotifier, MIN_CLI_INTERVAL};
use pulse_sens_types::{FixedSourceConfig, RandomSourceConfig, SourceConfig, TestSourceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Value source selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    Random,
    Fixed,
    Test,
}

/// pulse-sens - periodic level check with transient notifications
///
/// Press Enter to click the example button, type any other text to show it
/// as a message, or `q` to quit.
#[derive(Parser, Debug, Clone)]
#[command(name = "pulse-sens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Sampling interval in milliseconds (overrides the config file)
    #[arg(short = 'i', long = "interval-ms", value_name = "MS")]
    interval_ms: Option<u64>,

    /// Value source (overrides the config file)
    #[arg(short = 's', long = "source", value_enum)]
    source: Option<SourceKind>,

    /// Level reported by the fixed source
    #[arg(long = "value", value_name = "PERCENT", default_value = "50")]
    value: u8,

    /// Exit after this many seconds
    #[arg(long = "duration-secs", value_name = "SECS")]
    duration_secs: Option<u64>,

    /// Route notifications to the log instead of stdout
    #[arg(long = "log-notifications")]
    log_notifications: bool,

    /// Config file to load instead of the default location
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting pulse-sens v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let interval = config.sampler.interval();
    if interval < MIN_CLI_INTERVAL {
        bail!(
            "sampling interval {:?} is below the minimum of {:?}",
            interval,
            MIN_CLI_INTERVAL
        );
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let result = rt.block_on(run_screen(
        config,
        cli.log_notifications,
        cli.duration_secs.map(Duration::from_secs),
    ));
    // A pending stdin read would otherwise hold the runtime open
    rt.shutdown_timeout(Duration::from_millis(100));
    result
}

/// Load the config file and apply command line overrides
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config_file {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }),
    };

    if let Some(interval_ms) = cli.interval_ms {
        config.sampler.interval_ms = interval_ms;
    }

    if let Some(kind) = cli.source {
        config.source = match kind {
            SourceKind::Random => SourceConfig::Random(RandomSourceConfig::default()),
            SourceKind::Fixed => SourceConfig::Fixed(FixedSourceConfig { value: cli.value }),
            SourceKind::Test => SourceConfig::Test(TestSourceConfig::default()),
        };
    }

    Ok(config)
}

async fn run_screen(
    config: AppConfig,
    log_notifications: bool,
    duration: Option<Duration>,
) -> Result<()> {
    let source = pulse_sens_sources::create_source(&config.source);
    if !source.is_available() {
        warn!("Value source '{}' reports unavailable", source.metadata().id);
    }

    let notifier: SharedNotifier = if log_notifications {
        Arc::new(LogNotifier)
    } else {
        Arc::new(ConsoleNotifier::stdout())
    };

    let screen = Screen::new(config.sampler.clone(), source, notifier);
    screen.on_start()?;
    info!(
        "Sampling '{}' every {:?}",
        config.source.source_type(),
        config.sampler.interval()
    );

    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            _ = &mut deadline => {
                info!("Run duration elapsed");
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.eq_ignore_ascii_case("q") {
                        break;
                    } else if line.is_empty() {
                        screen.click();
                    } else {
                        screen.notifier().show(line);
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
        }
    }

    screen.close().await;
    Ok(())
}
