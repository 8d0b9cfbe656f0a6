#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use hud_overlay::config::default_tree;
use hud_overlay::context::HudContext;
use hud_overlay::gui;
use hud_overlay::hud::widgets::default_elements;
use hud_overlay::persistence::ConfigDir;
use hud_overlay::simulation::SimulatedGame;

#[derive(Parser)]
#[command(name = "hud-overlay")]
#[command(version)]
#[command(about = "Preview and edit the HUD against a simulated game", long_about = None)]
struct Args {
    /// Configuration directory (defaults to the platform config dir)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). Falls back to LOG_LEVEL.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Start with the HUD unlocked for dragging
    #[arg(short, long)]
    edit_mode: bool,

    /// Seed for simulated game data and widget previews
    #[arg(short, long, default_value_t = 1)]
    seed: u64,
}

fn parse_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "info".to_string());

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&log_level))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_dir = args
        .config_dir
        .map(ConfigDir::new)
        .unwrap_or_else(ConfigDir::platform_default);
    info!(dir = ?config_dir.root(), seed = args.seed, "starting HUD preview");

    let defaults = default_tree();
    let profiles = config_dir.load_profiles(&defaults)?;
    let tree = config_dir.load_tree(&defaults)?;

    let mut hud = HudContext::new(defaults, tree, profiles, default_elements(args.seed));
    if args.edit_mode {
        hud.set_edit_mode(true);
    }

    gui::run_gui(hud, SimulatedGame::demo(args.seed), config_dir)
}
