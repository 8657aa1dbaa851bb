//! Events that can occur in a session

/// Fallback text when the responder fails without saying why
pub const APPLICATION_ERROR_FALLBACK: &str = "Failed to get response";

/// Bot turn content for a request that never completed
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error: Failed to connect to server. Please try again.";

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Raw text from the input surface, not yet trimmed
    Submit { raw: String },

    /// The outstanding request resolved one way or another
    ReplyReceived { outcome: ExchangeOutcome },

    /// Reset the transcript
    Clear,
}

/// How a single exchange ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The responder produced a reply
    Success(String),
    /// The responder was reached but reported a failure
    ApplicationError(Option<String>),
    /// The request could not be completed at all
    TransportFailure,
}

impl ExchangeOutcome {
    /// Text of the bot turn recorded for this outcome
    pub fn bot_content(&self) -> String {
        match self {
            ExchangeOutcome::Success(reply) => reply.clone(),
            ExchangeOutcome::ApplicationError(Some(message)) if !message.is_empty() => {
                format!("Error: {message}")
            }
            ExchangeOutcome::ApplicationError(_) => format!("Error: {APPLICATION_ERROR_FALLBACK}"),
            ExchangeOutcome::TransportFailure => TRANSPORT_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            ExchangeOutcome::Success(_) => "success",
            ExchangeOutcome::ApplicationError(_) => "application_error",
            ExchangeOutcome::TransportFailure => "transport_failure",
        }
    }
}
