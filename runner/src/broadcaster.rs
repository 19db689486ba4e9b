use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Local};
use snake_engine::{AgentId, RenderDiff, TickEvent, TickResult, log};
use tokio::sync::Mutex;

use crate::text_frame::TextFrame;

#[derive(Clone, Debug, PartialEq)]
pub struct GameSummary {
    pub game_number: u32,
    pub finished_at: DateTime<Local>,
    pub ticks: u64,
    pub scores: BTreeMap<AgentId, u32>,
    pub best_score: u32,
}

/// Receives everything a renderer needs to follow a session.
pub trait TickBroadcaster: Send + Sync + Clone + 'static {
    /// Full draw of a freshly created board.
    fn broadcast_board(
        &self,
        width: usize,
        height: usize,
        diff: RenderDiff,
    ) -> impl Future<Output = ()> + Send;

    fn broadcast_tick(
        &self,
        result: TickResult,
        scores: BTreeMap<AgentId, u32>,
    ) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, summary: GameSummary) -> impl Future<Output = ()> + Send;
}

#[derive(Clone)]
pub struct ConsoleBroadcaster {
    render: bool,
    frame: Arc<Mutex<Option<TextFrame>>>,
}

impl ConsoleBroadcaster {
    pub fn new(render: bool) -> Self {
        Self {
            render,
            frame: Arc::new(Mutex::new(None)),
        }
    }

    async fn draw(&self, diff: &RenderDiff) {
        if !self.render {
            return;
        }
        let mut frame = self.frame.lock().await;
        if let Some(frame) = frame.as_mut() {
            frame.apply(diff);
            println!("{}\n", frame.render());
        }
    }
}

impl TickBroadcaster for ConsoleBroadcaster {
    async fn broadcast_board(&self, width: usize, height: usize, diff: RenderDiff) {
        {
            let mut frame = self.frame.lock().await;
            *frame = Some(TextFrame::new(width, height));
        }
        self.draw(&diff).await;
    }

    async fn broadcast_tick(&self, result: TickResult, scores: BTreeMap<AgentId, u32>) {
        for event in &result.events {
            match event {
                TickEvent::Eliminated { agent, reason } => {
                    log!("[tick {}] Player {} eliminated: {:?}", result.tick, agent, reason);
                }
                TickEvent::Scored { agent, points } => {
                    let total = scores.get(agent).copied().unwrap_or_default();
                    log!(
                        "[tick {}] Player {} scored {} (total {})",
                        result.tick,
                        agent,
                        points,
                        total
                    );
                }
                TickEvent::Moved { .. }
                | TickEvent::FoodConsumed { .. }
                | TickEvent::FoodSpawned { .. } => {}
            }
        }
        self.draw(&result.diff).await;
    }

    async fn broadcast_game_over(&self, summary: GameSummary) {
        log!(
            "Game {} over at {} after {} ticks. Best score: {}",
            summary.game_number,
            summary.finished_at.format("%d/%m/%Y, %H:%M:%S"),
            summary.ticks,
            summary.best_score
        );
        for (agent, score) in &summary.scores {
            log!("  Player {}: {}", agent, score);
        }
    }
}
