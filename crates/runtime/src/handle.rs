//! Client-facing handle to a running battle.

use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{Action, ActionReport};

use crate::error::{Result, RuntimeError};
use crate::event::BattleEvent;
use crate::view::BattleView;
use crate::worker::Command;

/// Cloneable facade over the battle worker.
#[derive(Clone, Debug)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<BattleEvent>,
}

impl BattleHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<BattleEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    /// Submit a player action.
    ///
    /// Rejections (wrong phase, wrong actor, invalid target, illegal escape)
    /// come back as errors; the battle state is untouched by a rejected
    /// action.
    pub async fn execute_action(&self, action: Action) -> Result<ActionReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ExecuteAction {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Snapshot the battle for display.
    pub async fn view(&self) -> Result<BattleView> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryView { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to battle events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<BattleEvent> {
        self.event_tx.subscribe()
    }
}
