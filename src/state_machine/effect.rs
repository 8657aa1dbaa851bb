//! Effects produced by state transitions

use crate::transcript::Turn;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a turn to the transcript and notify subscribers
    AppendTurn(Turn),

    /// Empty the transcript and notify subscribers
    ClearTranscript,

    /// Issue the single outbound request for this exchange
    RequestReply { prompt: String },

    /// Tell subscribers the pending flag changed
    NotifyPending(bool),
}

impl Effect {
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::user(content))
    }

    pub fn append_bot(content: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::bot(content))
    }
}
