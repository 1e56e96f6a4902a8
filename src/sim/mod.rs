//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes in as a tick argument, never from a clock
//! - Seeded RNG only
//! - Objects visited newest-first, in a stable order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{BAD_VARIANTS, EndCause, FallingObject, GameEvent, GamePhase, GameState, ObjectKind, Player};
pub use tick::{TickInput, spawn_object, tick};
