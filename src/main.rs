use std::path::PathBuf;

use clap::Parser;
use scroller::config::{ConfigError, DisplayMode, ScrollerSettings, parse_positive};
use scroller::input::Key;
use scroller::replay::{self, ReplayError};

#[derive(Parser, Debug)]
#[command(name = "scroller-replay", about = "Replay an editor scroller session script and print what it did")]
struct Cli {
    /// Path to the JSON session script.
    script: PathBuf,

    /// Initial display mode (`none`, `top`, `bottom`); overrides SCROLLER_DISPLAY_MODE.
    #[arg(long)]
    display_mode: Option<DisplayMode>,

    /// Key that flips the control between edges; overrides SCROLLER_TOGGLE_KEY.
    #[arg(long)]
    toggle_key: Option<String>,

    /// Logical viewport height; overrides SCROLLER_VIEWPORT_HEIGHT.
    #[arg(long, value_parser = parse_height)]
    viewport_height: Option<f64>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

fn parse_height(raw: &str) -> Result<f64, ConfigError> {
    parse_positive("--viewport-height", raw)
}

fn main() -> Result<(), ReplayError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut settings = ScrollerSettings::from_env()?;
    if let Some(mode) = cli.display_mode {
        settings.display_mode = mode;
    }
    if let Some(key) = cli.toggle_key {
        settings.toggle_key = Key::new(key);
    }
    if let Some(height) = cli.viewport_height {
        settings.viewport_height = height;
    }

    let session = replay::load_session(&cli.script)?;
    let report = replay::replay(&session, &settings)?;
    tracing::info!(
        steps = report.steps.len(),
        net_x = report.net_pan.x,
        net_y = report.net_pan.y,
        mode = %report.display_mode,
        "session replayed"
    );

    let out = if cli.pretty { serde_json::to_string_pretty(&report) } else { serde_json::to_string(&report) };
    println!("{}", out.map_err(ReplayError::Encode)?);
    Ok(())
}
