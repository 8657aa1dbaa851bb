//! Core exchange state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` decides, the session runtime executes the returned effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, ExchangeOutcome};
pub use state::{ClearPolicy, ExchangeState, SessionContext};
pub use transition::{transition, TransitionError};
#[allow(unused_imports)] // Public API re-export
pub use transition::TransitionResult;
