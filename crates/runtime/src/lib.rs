//! Async orchestration for turn-based battles.
//!
//! This crate wires the pure combat rules from `combat-core` and the data
//! catalogs from `combat-content` into a runnable battle: a background worker
//! owns the session, a cloneable [`BattleHandle`] accepts player actions and
//! serves consistent snapshots, and enemy turns fire from a cancellable
//! pacing timer. When the battle reaches a terminal phase the worker applies
//! rewards to the shared party record and notifies the bestiary.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`handle`] and [`view`] expose the types clients interact with
//! - [`event`] defines the broadcast event stream
//! - [`collaborators`] holds outward-facing notification traits
//! - [`worker`] keeps the background task internal to the crate

pub mod collaborators;
pub mod error;
pub mod event;
pub mod handle;
pub mod runtime;
pub mod view;

mod worker;

pub use collaborators::{BestiaryNote, BestiarySink, MemoryBestiary};
pub use error::{Result, RuntimeError};
pub use event::BattleEvent;
pub use handle::BattleHandle;
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, EncounterSpec, RuntimeConfig};
pub use view::{BattleView, CombatantView};
