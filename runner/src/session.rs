use std::time::Duration;

use chrono::Local;
use snake_engine::{AgentId, Board, BoardError, BoardSettings, KeyBindings, SessionRng, log};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

use crate::broadcaster::{GameSummary, TickBroadcaster};
use crate::config::RunnerConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// A raw key code, either aimed at one agent or routed through every
    /// agent's bindings.
    Key { agent: Option<AgentId>, key: String },
    NewGame,
    Quit,
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub board: BoardSettings,
    pub tick_interval: Duration,
    pub seed: Option<u64>,
    pub bindings: KeyBindings,
    pub exit_on_game_over: bool,
}

impl SessionSettings {
    pub fn from_config(config: &RunnerConfig, exit_on_game_over: bool) -> Self {
        Self {
            board: config.board_settings(),
            tick_interval: config.tick_interval(),
            seed: config.seed,
            bindings: KeyBindings::default_for(config.player_count as usize),
            exit_on_game_over,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    WaitingForKey,
    Running,
    Over,
}

/// Owns the current board and is the only thing that mutates it. Ticks and
/// commands are handled on one task, so a reset can never overlap a tick.
pub struct Session<B: TickBroadcaster> {
    settings: SessionSettings,
    board: Board,
    phase: SessionPhase,
    games_started: u32,
    summaries: Vec<GameSummary>,
    broadcaster: B,
}

impl<B: TickBroadcaster> Session<B> {
    pub fn new(settings: SessionSettings, broadcaster: B) -> Result<Self, BoardError> {
        let board = Board::new(&settings.board, game_rng(settings.seed, 0))?;
        Ok(Self {
            settings,
            board,
            phase: SessionPhase::WaitingForKey,
            games_started: 1,
            summaries: Vec::new(),
            broadcaster,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn summaries(&self) -> &[GameSummary] {
        &self.summaries
    }

    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> Result<Vec<GameSummary>, BoardError> {
        let mut tick_interval_timer = interval(self.settings.tick_interval);
        tick_interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.broadcast_board().await;

        loop {
            tokio::select! {
                _ = tick_interval_timer.tick() => {
                    self.step().await;
                    if self.phase == SessionPhase::Over && self.settings.exit_on_game_over {
                        break;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        log!("Input closed, stopping session");
                        break;
                    };
                    if !self.handle_command(command).await? {
                        break;
                    }
                }
            }
        }

        Ok(self.summaries)
    }

    /// Returns `false` once the session should stop.
    pub async fn handle_command(&mut self, command: SessionCommand) -> Result<bool, BoardError> {
        match command {
            SessionCommand::Key { agent, key } => {
                self.apply_key(agent, &key);
                if self.phase == SessionPhase::WaitingForKey {
                    log!("Game {} started", self.games_started);
                    self.phase = SessionPhase::Running;
                }
            }
            SessionCommand::NewGame => {
                self.new_game()?;
                self.broadcast_board().await;
            }
            SessionCommand::Quit => {
                log!("Quit requested");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// One tick of the running game; a no-op while waiting or after game over.
    pub async fn step(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }

        let result = match self.board.tick() {
            Ok(result) => result,
            Err(e) => {
                log!("Tick rejected: {}", e);
                self.phase = SessionPhase::Over;
                return;
            }
        };

        self.broadcaster
            .broadcast_tick(result, self.board.scores())
            .await;

        if self.board.is_over() {
            self.phase = SessionPhase::Over;
            let summary = GameSummary {
                game_number: self.games_started,
                finished_at: Local::now(),
                ticks: self.board.tick_count(),
                scores: self.board.scores(),
                best_score: self.board.best_score(),
            };
            self.summaries.push(summary.clone());
            self.broadcaster.broadcast_game_over(summary).await;
        }
    }

    /// Stops ticking, then swaps in a brand-new board.
    fn new_game(&mut self) -> Result<(), BoardError> {
        self.phase = SessionPhase::WaitingForKey;
        let board = Board::new(
            &self.settings.board,
            game_rng(self.settings.seed, self.games_started),
        )?;
        self.board = board;
        self.games_started += 1;
        log!("Game {} ready, press any key to start", self.games_started);
        Ok(())
    }

    fn apply_key(&mut self, agent: Option<AgentId>, key: &str) {
        let targets: Vec<_> = match agent {
            Some(agent) => self
                .settings
                .bindings
                .direction_for(agent, key)
                .map(|direction| (agent, direction))
                .into_iter()
                .collect(),
            None => self.settings.bindings.route(key).collect(),
        };

        for (agent, direction) in targets {
            if let Err(e) = self.board.set_direction(agent, direction) {
                log!("Player {} failed to set direction: {}", agent, e);
            }
        }
    }

    async fn broadcast_board(&self) {
        self.broadcaster
            .broadcast_board(
                self.board.width(),
                self.board.height(),
                self.board.initial_diff(),
            )
            .await;
    }
}

fn game_rng(seed: Option<u64>, game_index: u32) -> SessionRng {
    match seed {
        Some(seed) => SessionRng::new(seed.wrapping_add(game_index as u64)),
        None => SessionRng::from_random(),
    }
}
