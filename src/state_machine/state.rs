//! Exchange state types

/// Whether an exchange is in flight
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExchangeState {
    /// Ready for user input, no request outstanding
    #[default]
    Idle,

    /// One request is outstanding; new submissions are rejected
    Pending {
        /// Trimmed text that was sent to the responder
        prompt: String,
        /// The transcript was cleared after this exchange started
        cleared: bool,
    },
}

impl ExchangeState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ExchangeState::Pending { .. })
    }
}

/// What happens to an in-flight reply when the transcript is cleared
/// before it arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearPolicy {
    /// The reply is still appended, to the now-empty transcript
    #[default]
    KeepInFlightReply,
    /// The reply is dropped; only the pending flag is reset
    DiscardInFlightReply,
}

/// Context for a session (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub clear_policy: ClearPolicy,
}

impl SessionContext {
    pub fn new(clear_policy: ClearPolicy) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            clear_policy,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(ClearPolicy::default())
    }
}
