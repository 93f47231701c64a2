//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and the combat engine so clients
//! can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::ExecuteError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("encounter has no enemies")]
    EmptyEncounter,

    #[error("runtime requires a party member before building")]
    MissingParty,

    #[error("unknown species '{species}' in biome '{biome}'")]
    UnknownSpecies { species: String, biome: String },

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}
