//! Interactive console frontend.
//!
//! A thin shell over the driver: reads cell numbers and commands from
//! stdin, renders board and oracle output as plain text. All game logic
//! lives behind the [`GameCommand`]/[`GameEvent`] channels.

use crate::bot::RandomBot;
use crate::config::OracleConfig;
use crate::driver::{EvaluationReport, GameCommand, GameEvent, GameLoop};
use crate::game::Mark;
use crate::oracle::PredictionClient;
use crate::session::Phase;
use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

/// Runs the interactive console game until the player quits.
pub async fn run_console(config: OracleConfig) -> Result<()> {
    let client = PredictionClient::new(config.base_url().clone(), config.oracle_protocol());

    let online = client.health().await;
    println!(
        "Oracle at {}: {}",
        config.base_url(),
        if online { "online" } else { "offline" }
    );

    let (driver, cmd_tx, mut event_rx) = GameLoop::new(
        client,
        *config.metrics(),
        RandomBot::new(),
        Duration::from_millis(*config.bot_delay_ms()),
    );
    let driver_task = tokio::spawn(driver.run());

    println!("You are X. Enter a cell number (1-9), 'r' to reset, 'm <model>' to switch model, 'q' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(input) => {
                        if !dispatch(input.trim(), &cmd_tx) {
                            break;
                        }
                    }
                    None => {
                        let _ = cmd_tx.send(GameCommand::Quit);
                        break;
                    }
                }
            }
            Some(event) = event_rx.recv() => render(&event),
        }
    }

    driver_task.await?;
    info!("Console session ended");
    Ok(())
}

/// Parses one input line into a command. Returns false to quit.
fn dispatch(input: &str, cmd_tx: &mpsc::UnboundedSender<GameCommand>) -> bool {
    match input {
        "" => {}
        "q" | "quit" => {
            let _ = cmd_tx.send(GameCommand::Quit);
            return false;
        }
        "r" | "reset" => {
            let _ = cmd_tx.send(GameCommand::Reset);
        }
        _ => {
            if let Some(model) = input.strip_prefix("m ").or_else(|| input.strip_prefix("model ")) {
                let _ = cmd_tx.send(GameCommand::SetModel(model.trim().to_string()));
            } else if let Ok(cell) = input.parse::<usize>() {
                if (1..=9).contains(&cell) {
                    let _ = cmd_tx.send(GameCommand::Move(cell - 1));
                } else {
                    println!("Cell must be 1-9.");
                }
            } else {
                println!("Unrecognized input '{input}'. Cell 1-9, 'r', 'm <model>', or 'q'.");
            }
        }
    }
    true
}

fn render(event: &GameEvent) {
    match event {
        GameEvent::Board { board, phase, .. } => {
            println!("\n{}", board.display());
            match phase {
                Phase::AwaitingHuman => println!("Your turn (X)."),
                Phase::AwaitingBot => println!("Bot (O) is thinking..."),
                Phase::Terminal => {
                    println!("Game over: {}. Press 'r' for a new game.", board_result(board));
                }
            }
        }
        GameEvent::Evaluation(report) => render_evaluation(report),
    }
}

fn render_evaluation(report: &EvaluationReport) {
    match &report.prediction {
        Some((model, prediction)) => {
            println!("Oracle [{model}] predicts: {prediction} | actual: {}", report.truth);
        }
        None => {
            println!("Oracle unavailable | actual: {}", report.truth);
        }
    }
    let metrics = report.metrics;
    println!(
        "Accuracy: {}% ({}/{})",
        (metrics.accuracy * 100.0).round() as u64,
        metrics.hits,
        metrics.total
    );
}

fn board_result(board: &crate::game::Board) -> String {
    match crate::game::check_winner(board) {
        Some(Mark::X) => "you win".to_string(),
        Some(Mark::O) => "the bot wins".to_string(),
        None => "draw".to_string(),
    }
}
