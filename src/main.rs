//! Virtual Gamepad - headless driver for the on-screen controller core
//!
//! Replays scripted touch sessions against the overlay and manages the
//! stored control layout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use virtual_gamepad::config::OverlayConfig;
use virtual_gamepad::control::default_controls;
use virtual_gamepad::gamepad::{ButtonFlags, ChannelSink, InputSink, LoggingSink, SinkMessage};
use virtual_gamepad::layout::{open_layout_store, LayoutRepository};
use virtual_gamepad::overlay::Overlay;
use virtual_gamepad::paths::AppPaths;
use virtual_gamepad::script::ReplayScript;
use virtual_gamepad::surface::HeadlessSurface;

/// Virtual Gamepad - touch overlay controller core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to the detected app location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive a headless overlay from a YAML script and print every transmission
    Replay {
        /// Script file
        script: PathBuf,

        /// Log transmissions instead of printing them
        #[arg(long)]
        log_only: bool,
    },

    /// Inspect or reset the stored layout
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// List button names and their flag values
    Buttons,
}

#[derive(Subcommand, Debug)]
enum LayoutAction {
    /// Show the effective position of every control
    Show,
    /// Forget every stored position
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    let paths = AppPaths::detect();
    paths.log_paths();

    let config_path = args.config.clone().unwrap_or_else(|| paths.config.clone());
    let config = OverlayConfig::load_or_default(&config_path).await?;
    info!("Configuration file: {}", config_path.display());

    match args.command {
        Command::Replay { script, log_only } => replay(&config, &paths, script, log_only).await,
        Command::Layout { action } => layout(&config, &paths, action),
        Command::Buttons => {
            list_buttons();
            Ok(())
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn replay(
    config: &OverlayConfig,
    paths: &AppPaths,
    script_path: PathBuf,
    log_only: bool,
) -> Result<()> {
    let script = ReplayScript::load(&script_path)
        .await
        .with_context(|| format!("Failed to load script: {}", script_path.display()))?;

    let store = open_layout_store(&config.layout, &paths.layout_dir)?;

    let (sink, printer): (Box<dyn InputSink>, _) = if log_only {
        (Box::new(LoggingSink::new()), None)
    } else {
        let (sink, rx) = ChannelSink::new();
        (Box::new(sink), Some(tokio::spawn(print_transmissions(rx))))
    };

    let surface = HeadlessSurface::new(config.surface.width, config.surface.height);
    let mut overlay = Overlay::with_radial_gestures(sink, store, config);
    overlay.mount(surface);

    println!(
        "\n{} {}",
        "=== Replaying".bold().cyan(),
        script_path.display().to_string().bold()
    );
    let report = script.run(&mut overlay)?;

    overlay.unmount();
    // Dropping the overlay closes the channel and ends the printer
    drop(overlay);
    if let Some(printer) = printer {
        printer.await.context("Transmission printer failed")?;
    }

    println!("\n{}", "Summary:".bold());
    println!("  Steps: {}", report.steps.to_string().green());
    println!("  Handled events: {}", report.handled.to_string().green());
    println!("  Final mode: {}", report.final_mode.to_string().yellow());
    println!("  Final state: {}", report.final_state);

    Ok(())
}

async fn print_transmissions(mut rx: mpsc::UnboundedReceiver<SinkMessage>) {
    let mut count = 0usize;
    while let Some(message) = rx.recv().await {
        match message {
            SinkMessage::Registered(handle) => {
                println!("  {} controller {}", "registered".green(), handle);
            }
            SinkMessage::State { handle, state } => {
                count += 1;
                let names = state.button_flags.names().join("+");
                println!(
                    "  {:>4} {} {} {}",
                    count.to_string().dimmed(),
                    handle,
                    state,
                    if names.is_empty() { String::new() } else { names.yellow().to_string() }
                );
            }
        }
    }
}

fn layout(config: &OverlayConfig, paths: &AppPaths, action: LayoutAction) -> Result<()> {
    let store = open_layout_store(&config.layout, &paths.layout_dir)?;
    let repo = LayoutRepository::new(store, config.layout.storage_key.clone());

    match action {
        LayoutAction::Show => {
            let stored = repo.load_all();
            println!("\n{}", "=== Control Layout ===".bold().cyan());
            for spec in default_controls()? {
                let (entry, origin) = match stored.get(&spec.id) {
                    Some(entry) => (entry.clone(), "stored".green()),
                    None => (spec.default_layout.clone(), "default".dimmed()),
                };
                println!(
                    "  {:<12} {:<8} top={:<7} bottom={:<7} left={:<7} right={:<7} {} ({})",
                    spec.id.bold(),
                    spec.kind.to_string(),
                    entry.top,
                    entry.bottom,
                    entry.left,
                    entry.right,
                    entry.transform,
                    origin
                );
            }
        }
        LayoutAction::Reset => {
            repo.clear();
            println!("{} layout {:?} cleared", "✓".green(), repo.key());
        }
    }

    Ok(())
}

fn list_buttons() {
    println!("\n{}", "=== Buttons ===".bold().cyan());
    for (name, flag) in ButtonFlags::all() {
        println!("  {:<10} {}", name.bold(), flag.to_string().yellow());
    }
}
