#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Origin Defence in a terminal.

mod console;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use console::{ConsoleCommand, HELP};
use glam::Vec2;
use log::{debug, warn};
use origin_defence_core::{Event, GameConfig, GameSnapshot, PlayerInput, SpawnerLayout};
use origin_defence_rendering::{event_message, render_text, ScreenLayout};
use origin_defence_system_turns::{Observer, Session, TurnController};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};

/// Command-line arguments accepted by the Origin Defence binary.
#[derive(Debug, Parser)]
#[command(name = "origin-defence", about = "Defend the origin against creeps.")]
struct CliArgs {
    /// TOML file with game settings; omitted settings keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for spawner placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of turns before the game ends.
    #[arg(long, value_name = "TURNS")]
    max_turns: Option<u32>,
    /// Places a spawner on every ring cell instead of a single random one.
    #[arg(long)]
    full_ring: bool,
}

impl CliArgs {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.rng_seed = Some(seed);
        }
        if let Some(max_turns) = self.max_turns {
            config.max_turns = max_turns;
        }
        if self.full_ring {
            config.spawner_layout = SpawnerLayout::FullRing;
        }
        Ok(config)
    }
}

/// Prints player-facing messages and redraws the board after each batch.
#[derive(Debug, Default)]
struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn observe(&mut self, events: &[Event], snapshot: &GameSnapshot) {
        let mut board_changed = false;
        for event in events {
            debug!("{event:?}");
            if let Some(message) = event_message(event) {
                println!("{message}");
            }
            board_changed |= !matches!(event, Event::InputIgnored { .. });
        }
        if board_changed {
            println!("{}", render_text(snapshot));
        }
    }
}

/// Entry point for the Origin Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = args.game_config()?;
    let controller = TurnController::new(config).context("invalid game configuration")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let result = runtime.block_on(play(controller));
    runtime.shutdown_background();
    result
}

async fn play(controller: TurnController) -> Result<()> {
    let layout = ScreenLayout::for_snapshot(&controller.snapshot(), Vec2::ZERO)?;
    let (input_tx, input_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let _ = tokio::spawn(read_console(layout, input_tx));
    let _ = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    println!("{HELP}");
    let controller = Session::new(controller, ConsoleObserver)
        .run(input_rx, shutdown_rx)
        .await;
    let snapshot = controller.snapshot();
    println!("{}", origin_defence_rendering::status_line(&snapshot));
    Ok(())
}

async fn read_console(layout: ScreenLayout, inputs: mpsc::Sender<PlayerInput>) {
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!("failed to read console input: {error}");
                break;
            }
        };

        let input = match ConsoleCommand::parse(&line) {
            Ok(ConsoleCommand::Input(input)) => input,
            Ok(ConsoleCommand::Pointer(position)) => match layout.screen_to_cell(position) {
                Some(cell) => PlayerInput::Click { cell },
                None => {
                    println!("({}, {}) is outside the board", position.x, position.y);
                    continue;
                }
            },
            Ok(ConsoleCommand::Help) => {
                println!("{HELP}");
                continue;
            }
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        if inputs.send(input).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::parse_from([
            "origin-defence",
            "--seed",
            "42",
            "--max-turns",
            "5",
            "--full-ring",
        ]);
        let config = args.game_config().expect("no config file to read");

        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.max_turns, 5);
        assert_eq!(config.spawner_layout, SpawnerLayout::FullRing);
        assert_eq!(config.grid_width, GameConfig::default().grid_width);
    }

    #[test]
    fn missing_config_file_reports_its_path() {
        let args = CliArgs::parse_from(["origin-defence", "--config", "/nonexistent/origin.toml"]);
        let error = args.game_config().expect_err("file does not exist");
        assert!(format!("{error:#}").contains("/nonexistent/origin.toml"));
    }
}
