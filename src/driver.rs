//! Turn sequencing and oracle round orchestration.
//!
//! The driver owns the session, the metrics, and the prediction client. It
//! consumes [`GameCommand`]s from a frontend and publishes [`GameEvent`]s
//! back over an mpsc channel. Oracle rounds run as spawned tasks on board
//! snapshots; their results re-enter the driver as messages, so the game
//! never waits on the network.

use crate::bot::RandomBot;
use crate::game::{Board, GameLabel, Mark, classify};
use crate::metrics::{MetricsAggregator, MetricsMode, MetricsView};
use crate::oracle::{
    MetricsSnapshot, OracleError, PredictResponse, PredictionClient, Protocol,
};
use crate::session::{GameSession, Phase};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Input commands from the frontend.
#[derive(Debug, Clone)]
pub enum GameCommand {
    /// Human selects a cell (0-8).
    Move(usize),
    /// Start a new game on a fresh board. Metrics are preserved.
    Reset,
    /// Switch the oracle model (per-model protocol only) and re-evaluate
    /// the current board.
    SetModel(String),
    /// Stop the driver.
    Quit,
}

/// Events published to the frontend.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// The board changed: a move was applied or the game was reset.
    Board {
        /// Board after the change.
        board: Board,
        /// Side to move.
        to_move: Mark,
        /// Current phase.
        phase: Phase,
    },
    /// An oracle round resolved, successfully or not.
    Evaluation(EvaluationReport),
}

/// Outcome of one oracle round, for display and metrics.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Locally computed authoritative label for the evaluated snapshot.
    pub truth: GameLabel,
    /// Model name and predicted label; `None` when the oracle was
    /// unavailable (display falls back to the local label alone).
    pub prediction: Option<(String, GameLabel)>,
    /// Metrics after applying this round.
    pub metrics: MetricsView,
}

/// Resolved oracle round, fed back into the driver loop.
#[derive(Debug)]
struct RoundOutcome {
    epoch: u64,
    truth: GameLabel,
    result: Result<PredictResponse, OracleError>,
    snapshot: Option<MetricsSnapshot>,
}

/// Drives one game session against the oracle.
pub struct GameLoop {
    session: GameSession,
    client: Arc<PredictionClient>,
    aggregator: MetricsAggregator,
    bot: RandomBot,
    bot_delay: Duration,
    cmd_rx: mpsc::UnboundedReceiver<GameCommand>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
    round_tx: mpsc::UnboundedSender<RoundOutcome>,
    round_rx: mpsc::UnboundedReceiver<RoundOutcome>,
}

impl GameLoop {
    /// Creates a driver together with its command and event channels.
    pub fn new(
        client: PredictionClient,
        metrics_mode: MetricsMode,
        bot: RandomBot,
        bot_delay: Duration,
    ) -> (
        Self,
        mpsc::UnboundedSender<GameCommand>,
        mpsc::UnboundedReceiver<GameEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (round_tx, round_rx) = mpsc::unbounded_channel();

        let driver = Self {
            session: GameSession::new(),
            client: Arc::new(client),
            aggregator: MetricsAggregator::new(metrics_mode),
            bot,
            bot_delay,
            cmd_rx,
            event_tx,
            round_tx,
            round_rx,
        };
        (driver, cmd_tx, event_rx)
    }

    /// Runs until the frontend sends [`GameCommand::Quit`] or hangs up.
    ///
    /// Fires one classification round against the empty board before
    /// accepting input, so the oracle output is populated for the fresh
    /// session.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Game driver started");
        self.publish_board();
        self.spawn_round();

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(GameCommand::Move(index)) => self.handle_move(index).await,
                    Some(GameCommand::Reset) => self.handle_reset(),
                    Some(GameCommand::SetModel(model)) => self.handle_set_model(model),
                    Some(GameCommand::Quit) | None => break,
                },
                Some(outcome) = self.round_rx.recv() => self.apply_round(outcome),
            }
        }
        info!("Game driver stopped");
    }

    /// Handles a human cell selection to completion, bot reply included.
    ///
    /// The oracle rounds launched here are informational only: terminal
    /// detection uses the local classifier, so a slow or dead oracle never
    /// stalls the game.
    #[instrument(skip(self))]
    async fn handle_move(&mut self, index: usize) {
        let label = match self.session.place_human(index) {
            Ok(label) => label,
            Err(rejected) => {
                debug!(index, ?rejected, "Human move rejected");
                return;
            }
        };
        self.publish_board();
        self.spawn_round();
        if label.is_terminal() {
            return;
        }

        // Visual breather before the bot reply.
        tokio::time::sleep(self.bot_delay).await;

        let Some(choice) = self.bot.choose(self.session.board()) else {
            return;
        };
        match self.session.place_bot(choice) {
            Ok(_) => {
                self.publish_board();
                self.spawn_round();
            }
            Err(rejected) => warn!(choice, ?rejected, "Bot move rejected"),
        }
    }

    /// Resets the board (not the metrics) and re-evaluates the empty board.
    #[instrument(skip(self))]
    fn handle_reset(&mut self) {
        self.session.reset();
        self.publish_board();
        self.spawn_round();
    }

    /// Swaps the oracle model and re-evaluates the current board.
    #[instrument(skip(self))]
    fn handle_set_model(&mut self, model: String) {
        match self.client.protocol() {
            Protocol::PerModel { .. } => {
                info!(model = %model, "Switching oracle model");
                self.client = Arc::new(self.client.with_model(model));
                self.spawn_round();
            }
            Protocol::Correlated => {
                warn!("Model selection requires the per-model protocol; ignoring");
            }
        }
    }

    /// Launches one oracle round on a snapshot of the current board.
    ///
    /// The task computes ground truth from the same snapshot, reports it
    /// when the response carries a correlation id, refreshes the remote
    /// metrics snapshot in remote mode, and posts the outcome back tagged
    /// with the launch epoch.
    fn spawn_round(&self) {
        let client = Arc::clone(&self.client);
        let board = self.session.board().clone();
        let turn = *self.session.to_move();
        let epoch = *self.session.epoch();
        let want_snapshot = self.aggregator.mode() == MetricsMode::Remote;
        let tx = self.round_tx.clone();

        tokio::spawn(async move {
            let truth = classify(&board);
            let result = client.classify_state(&board, turn).await;

            let mut snapshot = None;
            if let Ok(response) = &result {
                if let Some(request_id) = &response.request_id {
                    let correct = response.prediction == truth;
                    // Best-effort notify; a failure here never surfaces.
                    if let Err(error) = client
                        .report_ground_truth(request_id, truth, correct)
                        .await
                    {
                        debug!(%error, "Ground-truth report dropped");
                    }
                }
                if want_snapshot {
                    snapshot = client.fetch_metrics().await.ok();
                }
            }

            let _ = tx.send(RoundOutcome {
                epoch,
                truth,
                result,
                snapshot,
            });
        });
    }

    /// Applies a resolved round: epoch filter, metrics, event.
    fn apply_round(&mut self, outcome: RoundOutcome) {
        if outcome.epoch != *self.session.epoch() {
            debug!(
                stale_epoch = outcome.epoch,
                current_epoch = self.session.epoch(),
                "Discarding oracle response from before the last reset"
            );
            return;
        }

        let prediction = match outcome.result {
            Ok(response) => {
                self.aggregator.record(response.prediction, outcome.truth);
                Some((response.model_name, response.prediction))
            }
            Err(error) => {
                debug!(%error, "Oracle unavailable, showing local label only");
                None
            }
        };
        if let Some(snapshot) = outcome.snapshot {
            self.aggregator.update_snapshot(snapshot);
        }

        self.publish(GameEvent::Evaluation(EvaluationReport {
            truth: outcome.truth,
            prediction,
            metrics: self.aggregator.view(),
        }));
    }

    fn publish_board(&self) {
        self.publish(GameEvent::Board {
            board: self.session.board().clone(),
            to_move: *self.session.to_move(),
            phase: *self.session.phase(),
        });
    }

    fn publish(&self, event: GameEvent) {
        // The frontend hanging up just means nobody is listening anymore.
        let _ = self.event_tx.send(event);
    }
}
