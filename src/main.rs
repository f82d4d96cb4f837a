use anyhow::Result;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::commands::{parse_command, Command, ParseError, USAGE};
use crate::config::AppConfig;
use crate::error::PanelError;
use crate::panel::ControlPanel;
use crate::poller::ImageLoop;
use crate::protocol::{PollMode, Profile};
use crate::render::{CompositeRenderer, ConsoleRenderer, PanelView, Renderer};
use crate::types::Field;

mod camera;
mod commands;
mod config;
mod error;
#[cfg(test)]
mod mock_server;
mod panel;
mod poller;
mod protocol;
mod render;
mod telemetry;
mod types;

#[derive(Parser)]
#[command(name = "timelapse-control")]
#[command(about = "Terminal control panel for a timelapse camera")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Page variant to drive (overrides the config file)
    #[arg(short, long, value_enum)]
    profile: Option<Profile>,

    /// Camera server URL (overrides the config file)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.verbose);

    let mut config = AppConfig::load(&args.config)?;
    if let Some(profile) = args.profile {
        config.profile = profile;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    if args.init_config {
        config.save(&args.config)?;
        println!("💾 Wrote {}", args.config.display());
        return Ok(());
    }

    let base_url = config.base_url()?;
    info!("⚙️ Profile {} against {}", config.profile, base_url);

    let client = camera::CameraClient::new(base_url.clone(), config.request_timeout())?;
    let view = PanelView::new();
    let renderer: Arc<dyn Renderer> = Arc::new(CompositeRenderer::new(vec![
        Arc::new(view.clone()),
        Arc::new(ConsoleRenderer::new(base_url.clone())),
    ]));
    let panel = ControlPanel::new(config.profile, config.defaults.clone(), client, renderer);

    let mut image_loop = config.poll_schedule().map(ImageLoop::new);
    if let Some(image_loop) = image_loop.as_mut() {
        image_loop.start_image_loop(panel.clone());
    }

    println!("📷 timelapse-control ({} profile) on {}", config.profile, base_url);
    println!("type 'help' for commands");

    tokio::select! {
        _ = run_prompt(&panel, &view, image_loop.as_ref()) => {}
        _ = tokio::signal::ctrl_c() => info!("🛑 Interrupted"),
    }

    info!("🛑 Panel closed");
    Ok(())
}

/// Stdin lines, read on a plain thread so a pending read never holds up
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin closed: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Run commands until `quit` or end of input.
async fn run_prompt(panel: &ControlPanel, view: &PanelView, image_loop: Option<&ImageLoop>) {
    let mut lines = spawn_stdin_reader();

    while let Some(line) = lines.recv().await {
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(panel, view, image_loop, command).await,
            Err(ParseError::Empty) => {}
            Err(e) => eprintln!("❓ {} (type 'help')", e),
        }
    }
}

async fn execute(
    panel: &ControlPanel,
    view: &PanelView,
    image_loop: Option<&ImageLoop>,
    command: Command,
) {
    match command {
        Command::Set(field, value) => panel.set_field(field, value).await,
        Command::Zoom(value) => {
            panel.set_field(Field::Zoom, value).await;
            report(panel.zoom_changed().await);
        }
        Command::Submit => report(panel.submit_exposure().await),
        Command::Lock(locked) => panel.set_locked(locked).await,
        Command::Autoload(enabled) => {
            let gated = image_loop.is_some()
                && panel.profile().poll_schedule().map(|s| s.mode) == Some(PollMode::WhenAutoload);
            if !gated {
                warn!("autoload has no effect in the {} profile", panel.profile());
            }
            panel.set_autoload(enabled).await;
        }
        Command::Singleshot => report(panel.singleshot().await),
        Command::Refresh => report(panel.update_image().await),
        Command::Status => {
            let state = panel.state().await;
            println!(
                "exposure={:?} zoom={:?} gain={:?} pid={:?} autoload={} locked={}",
                state.exposure_time, state.zoom, state.gain, state.pid, state.autoload, state.locked
            );
            println!("{}", view.snapshot());
            if let Some(image_loop) = image_loop {
                println!("image loop {:?}, {} refreshes", image_loop.state(), image_loop.attempts());
            }
        }
        Command::Help => println!("{}", USAGE),
        Command::Quit => {}
    }
}

/// Requests run on their own; only refusals are worth telling about here.
fn report(result: Result<JoinHandle<()>, PanelError>) {
    match result {
        Ok(_) => {}
        // the renderer already raised the alert
        Err(PanelError::Locked(_)) => {}
        Err(e) => eprintln!("🚫 {}", e),
    }
}
