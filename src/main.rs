use anyhow::{Context, Result};
use clap::Parser;
use hwsubmit::app::App;
use hwsubmit::cli::Cli;
use hwsubmit::styles::{init_theme, ThemeType};
use hwsubmit::tui::restore_terminal;
use hwsubmit::utils::default_log_path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// Restore the terminal before the default hook prints the panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

/// File logging; the terminal belongs to the TUI.
fn init_logging() -> Result<WorkerGuard> {
    let log_file = default_log_path();
    let log_dir = log_file
        .parent()
        .context("Log path has no parent directory")?;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(log_dir, "hwsubmit.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn theme_type(cli: &Cli, configured: &str) -> ThemeType {
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if cli.no_colors || no_color_env {
        ThemeType::NoColor
    } else {
        configured.parse().unwrap_or_default()
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.execute()? {
        return Ok(());
    }

    let config = cli.load_config()?;
    init_theme(theme_type(cli, &config.ui.theme));

    let mut app = App::new(config)?;
    app.run()
}

fn main() -> ExitCode {
    setup_panic_hook();
    let cli = Cli::parse();

    let _guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };
    info!("hwsubmit {} starting", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            restore_terminal();
            error!("Fatal: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
