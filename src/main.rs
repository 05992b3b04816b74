//! Pomodoro Timer CLI - focus and break intervals in the terminal
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use tracing::warn;

use pomodoro_tracker::cli::{
    spawn_stdin_commands, Cli, Commands, Display, RunArgs, SessionRunner, SettingsArgs,
};
use pomodoro_tracker::{
    AppStorage, FileStore, Gateways, HttpSessionSync, IntervalScheduler, NoopSessionSync,
    NotificationGateway, SessionController, SessionStore, SessionSync, SystemClock,
};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("warn,pomodoro_tracker=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Cli {
        command,
        verbose,
        data_dir,
        server,
    } = cli;

    if verbose {
        tracing::info!("Verbose mode enabled");
    }

    match command {
        Some(Commands::Run(args)) => {
            run_session(data_dir, server, args).await?;
        }
        Some(Commands::Status) => {
            let storage = open_storage(data_dir)?;
            let config = storage.restore_config().unwrap_or_default();
            Display::show_status(storage.restore_session().as_ref(), &config);
        }
        Some(Commands::Settings(args)) => {
            let storage = Arc::new(open_storage(data_dir)?);
            update_settings(storage, &args)?;
        }
        Some(Commands::Clear) => {
            let storage = open_storage(data_dir)?;
            storage.clear_session();
            Display::show_clear_success();
        }
        Some(Commands::Stats { date }) => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let client = HttpSessionSync::new(server)?;
            let stats = client
                .fetch_daily_stats(date)
                .await
                .context("統計を取得できませんでした")?;
            Display::show_stats(&stats);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Opens the session store under `data_dir` or the platform data directory.
fn open_storage(data_dir: Option<PathBuf>) -> Result<AppStorage<FileStore>> {
    let store = match data_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::default_location().context("保存先を決定できませんでした")?,
    };
    Ok(AppStorage::new(Arc::new(store)))
}

/// Shows the settings, or saves the given changes.
///
/// A saved session is restored and restarted under the new durations, so
/// its current interval loses any elapsed progress.
fn update_settings(storage: Arc<AppStorage<FileStore>>, args: &SettingsArgs) -> Result<()> {
    let current = storage.restore_config().unwrap_or_default();
    if args.is_empty() {
        Display::show_settings(&current);
        return Ok(());
    }

    let config = args.apply_to(&current);
    config.validate().map_err(anyhow::Error::msg)?;

    if storage.restore_session().is_some() {
        let gateways = Gateways {
            storage: Arc::clone(&storage) as Arc<dyn SessionStore>,
            notifier: Arc::new(NotificationGateway::system()),
            sync: Arc::new(NoopSessionSync),
        };
        let mut controller = SessionController::restore(Arc::new(SystemClock), gateways);
        controller
            .apply_settings(config.clone())
            .map_err(anyhow::Error::msg)?;
        controller.save_state();
    } else {
        storage.save_config(&config);
    }

    Display::show_settings_saved(&config);
    Ok(())
}

/// Runs the interactive session until quit or Ctrl-C.
async fn run_session(data_dir: Option<PathBuf>, server: String, args: RunArgs) -> Result<()> {
    let storage = Arc::new(open_storage(data_dir)?);

    let notifier = Arc::new(NotificationGateway::system());
    notifier.request_permission().await;

    let sync: Arc<dyn SessionSync> = if args.offline {
        Arc::new(NoopSessionSync)
    } else {
        Arc::new(HttpSessionSync::new(server)?)
    };

    let gateways = Gateways {
        storage,
        notifier,
        sync,
    };
    let mut controller = SessionController::restore(Arc::new(SystemClock), gateways);

    Display::show_controls();
    if args.start {
        controller.start();
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-Cを監視できません: {}", e);
            std::future::pending::<()>().await;
        }
    };

    SessionRunner::new(controller, IntervalScheduler::default())
        .run(spawn_stdin_commands(), shutdown)
        .await;

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
