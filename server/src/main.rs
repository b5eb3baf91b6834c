use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use server::{logging, ServerConfig, ServerContext};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "quarry-server", version, about = "Run a quarry game server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "quarry.toml")]
    config: PathBuf,
    /// Stop after this many ticks instead of running forever.
    #[arg(long)]
    ticks: Option<u64>,
    /// Force debug logging regardless of the configuration file.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_missing = !cli.config.exists();
    let mut config = if config_missing {
        ServerConfig::default()
    } else {
        ServerConfig::load(&cli.config)
            .with_context(|| format!("load config {}", cli.config.display()))?
    };
    if cli.debug {
        config.debug_mode = true;
    }

    let guard = logging::init(&config).context("initialize logging")?;
    if config_missing {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let mut context = ServerContext::new(config).context("create server context")?;
    context.start();
    info!(
        name = %context.config().server_name,
        motd = %context.config().motd,
        max_players = context.config().max_players,
        "server started"
    );

    let interrupt = interrupt_signal().context("install interrupt handler")?;
    run(&mut context, cli.ticks, &interrupt);
    context.shutdown();

    if let Some(guard) = guard {
        guard.finish().context("flush log file")?;
    }
    Ok(())
}

/// Resolves once when the process receives Ctrl-C.
fn interrupt_signal() -> Result<Receiver<()>> {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build signal runtime")?;
    thread::Builder::new()
        .name("quarry-signal".to_owned())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = sender.send(());
                }
            });
        })
        .context("spawn signal thread")?;
    Ok(receiver)
}

/// Ticks at the context's rate until `ticks` is reached or `interrupt` fires.
fn run(context: &mut ServerContext, ticks: Option<u64>, interrupt: &Receiver<()>) {
    let mut next = Instant::now();
    while ticks.map_or(true, |limit| context.current_tick() < limit) {
        context.tick();
        next += context.tick_interval();
        let now = Instant::now();
        let wait = next.saturating_duration_since(now);
        if wait.is_zero() {
            // Running behind; don't try to catch up with a burst of ticks.
            next = now;
        }
        match interrupt.recv_timeout(wait) {
            Ok(()) => {
                info!(tick = context.current_tick(), "interrupt received");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
            // No handler left to signal; keep pacing without it.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(wait),
        }
    }
}
