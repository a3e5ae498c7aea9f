//! Headless bot-vs-bot mode for exercising the oracle pipeline.
//!
//! Plays the requested number of games with random moves on both sides,
//! letting the driver run its normal classify/report/metrics cycle, and
//! prints the final accuracy. Useful for smoke-testing an oracle
//! deployment without a human in the loop.

use crate::bot::RandomBot;
use crate::config::OracleConfig;
use crate::driver::{GameCommand, GameEvent, GameLoop};
use crate::metrics::MetricsView;
use crate::oracle::PredictionClient;
use crate::session::Phase;
use anyhow::Result;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info};

/// Plays `games` random games against the oracle and prints a summary.
pub async fn run_simulation(config: OracleConfig, games: u32) -> Result<()> {
    let client = PredictionClient::new(config.base_url().clone(), config.oracle_protocol());
    if !client.health().await {
        println!(
            "Warning: oracle at {} is not answering; games will be scored locally only.",
            config.base_url()
        );
    }

    let (driver, cmd_tx, mut event_rx) = GameLoop::new(
        client,
        *config.metrics(),
        RandomBot::new(),
        Duration::ZERO,
    );
    let driver_task = tokio::spawn(driver.run());

    let mut rng = StdRng::from_os_rng();
    let mut completed = 0u32;
    let mut rounds = 0u64;
    let mut last_metrics = MetricsView::default();

    info!(games, "Starting simulation");
    while completed < games {
        let Some(event) = event_rx.recv().await else {
            break;
        };
        match event {
            GameEvent::Board { board, phase, .. } => match phase {
                Phase::AwaitingHuman => {
                    let empty = board.empty_indexes();
                    let pick = empty[rng.random_range(0..empty.len())];
                    cmd_tx.send(GameCommand::Move(pick))?;
                }
                Phase::AwaitingBot => {}
                Phase::Terminal => {
                    completed += 1;
                    debug!(completed, label = %crate::game::classify(&board), "Game finished");
                    if completed < games {
                        cmd_tx.send(GameCommand::Reset)?;
                    }
                }
            },
            GameEvent::Evaluation(report) => {
                rounds += 1;
                last_metrics = report.metrics;
            }
        }
    }

    // Let in-flight rounds from the final moves land before reading the
    // metrics one last time.
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_millis(500), event_rx.recv()).await
    {
        if let GameEvent::Evaluation(report) = event {
            rounds += 1;
            last_metrics = report.metrics;
        }
    }

    cmd_tx.send(GameCommand::Quit)?;
    driver_task.await?;

    println!("Simulated {completed} games, {rounds} oracle rounds.");
    println!(
        "Oracle accuracy: {}% ({}/{})",
        (last_metrics.accuracy * 100.0).round() as u64,
        last_metrics.hits,
        last_metrics.total
    );
    Ok(())
}
