//! Runtime for driving a conversation session
//!
//! `Session` owns the transcript and the exchange state, runs the pure
//! state machine and executes its effects. The only suspension point is
//! the responder call inside `Exchange::settle`.

mod composer;
mod session;


pub use composer::{Composer, SUGGESTED_PROMPTS};
pub use session::{Exchange, IgnoreReason, Session, Submission};

use crate::transcript::Turn;

/// Change notifications for anything rendering a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A turn was appended at `index`
    TurnAppended { index: usize, turn: Turn },
    /// The transcript was emptied
    Cleared,
    /// An exchange started (`true`) or settled (`false`)
    PendingChanged { pending: bool },
}
