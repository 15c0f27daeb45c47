//! Game-master engine for a moderated Werewolf session.
//!
//! The engine owns the whole match: roster, phase state machine, night
//! actions and victory evaluation. It performs no I/O; callers drive it one
//! operation at a time and read the resulting state back.

pub mod error;
pub mod models;

pub use error::GameError;
pub use models::*;
