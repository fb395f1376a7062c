//! iambic - CW keyer process
//!
//! Replays paddle events into the keyer and reports the key output.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use keyer_core::{Keyer, PaddleInput, TimingParameters};
use keyer_host::{
    filter_glitches, load_script, play_script, supervise, Cli, ConsoleKey, EdgeHandler, KeyerWorker,
    Shutdown,
};
use log::info;
use tokio::sync::{watch, Notify};

#[tokio::main]
async fn main() -> Result<()> {
    // Invalid arguments print usage and exit non-zero here
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = cli.keyer_config()?;
    let timing = TimingParameters::from(&config);
    info!(
        "keyer: {:?}, {} WPM (dot {} ms, dash {} ms), weight {}, letter space {}, sidetone {} Hz, paddles {}",
        config.mode,
        config.speed_wpm,
        timing.dot_ticks,
        timing.dash_ticks,
        config.weight,
        if config.letter_space { "on" } else { "off" },
        config.sidetone_hz,
        if config.paddles_reversed { "reversed" } else { "normal" },
    );

    let raw = load_script(cli.script.as_deref())
        .await
        .context("paddle source unavailable")?;
    let events = filter_glitches(&raw, cli.glitch_ms);
    info!("{} paddle events loaded ({} after glitch filter)", raw.len(), events.len());

    let paddles = Arc::new(PaddleInput::new());
    let wake = Arc::new(Notify::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(Shutdown::Running);

    let keyer = Keyer::new(config, ConsoleKey::new(timing));
    let worker = tokio::spawn(
        KeyerWorker::new(keyer, paddles.clone(), wake.clone(), shutdown_rx).run(),
    );
    let handler = EdgeHandler::new(paddles, wake, config.mode);

    let keyer = supervise(
        worker,
        &shutdown_tx,
        play_script(&events, &handler),
        tokio::signal::ctrl_c,
    )
    .await?;

    info!("{} marks sent", keyer.output().marks());
    Ok(())
}
