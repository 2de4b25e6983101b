use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod answer;
mod app;
mod config;
mod conversation;
mod handler;
mod menu;
mod tui;
mod ui;

use app::App;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "restaurant-faq")]
#[command(version, about = "Browse the menu and ask the restaurant FAQ bot", long_about = None)]
struct Cli {
    /// Base URL of the answer service (questions are posted to <URL>/chat)
    #[arg(long)]
    endpoint: Option<String>,

    /// Seconds to wait for an answer before giving up (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Where to write the log (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Persist the effective settings to the config file and continue
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Flags win over whatever the config file said
    fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("restaurant_faq=info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event).await;
    }

    app.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    cli.apply(&mut config);
    if cli.save_config {
        config.save().context("Failed to save config")?;
    }

    init_logging(&config.log_path()?)?;
    tracing::info!(endpoint = %config.endpoint, timeout_secs = config.request_timeout_secs, "starting");

    let mut app = App::new(&config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init().context("Failed to initialise terminal")?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore().context("Failed to restore terminal")?;

    tracing::info!(turns = app.conversation.messages().len(), "session ended");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "restaurant-faq",
            "--endpoint",
            "http://faq.example:8000",
            "--timeout",
            "7",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.endpoint, "http://faq.example:8000");
        assert_eq!(config.request_timeout_secs, 7);
        assert_eq!(config.log_file, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_zero_timeout_flag_is_rejected() {
        let err = Cli::try_parse_from(["restaurant-faq", "--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(Cli::try_parse_from(["restaurant-faq", "--timeout", "1"]).is_ok());
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::parse_from(["restaurant-faq"]);
        let mut config = Config {
            endpoint: "http://from-file:1".to_string(),
            request_timeout_secs: 3,
            log_file: Some(PathBuf::from("/tmp/faq.log")),
        };
        let before = config.clone();
        cli.apply(&mut config);
        assert_eq!(config, before);
    }
}
