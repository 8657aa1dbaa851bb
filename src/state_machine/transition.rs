//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects, with no I/O.

use super::{ClearPolicy, Effect, Event, ExchangeState, SessionContext};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ExchangeState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ExchangeState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Nothing to send (input is empty or whitespace)")]
    EmptyInput,
    #[error("An exchange is already in flight")]
    ExchangeInFlight,
    #[error("Reply received with no exchange in flight")]
    NoExchangeInFlight,
}

/// Pure transition function
pub fn transition(
    state: &ExchangeState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Admission control
        // ============================================================
        (_, Event::Submit { raw }) if raw.trim().is_empty() => Err(TransitionError::EmptyInput),

        (ExchangeState::Pending { .. }, Event::Submit { .. }) => {
            Err(TransitionError::ExchangeInFlight)
        }

        // Idle + Submit -> Pending
        (ExchangeState::Idle, Event::Submit { raw }) => {
            let prompt = raw.trim().to_string();
            Ok(TransitionResult::new(ExchangeState::Pending {
                prompt: prompt.clone(),
                cleared: false,
            })
            .with_effect(Effect::append_user(prompt.clone()))
            .with_effect(Effect::NotifyPending(true))
            .with_effect(Effect::RequestReply { prompt }))
        }

        // ============================================================
        // Reconciliation
        // ============================================================

        // Pending + ReplyReceived -> Idle, exactly one bot turn
        (ExchangeState::Pending { prompt, cleared }, Event::ReplyReceived { outcome }) => {
            let discard = *cleared && context.clear_policy == ClearPolicy::DiscardInFlightReply;
            let result = TransitionResult::new(ExchangeState::Idle);
            let result = if discard {
                tracing::debug!(
                    session_id = %context.session_id,
                    prompt_len = prompt.len(),
                    outcome = outcome.label(),
                    "Discarding reply that arrived after clear"
                );
                result
            } else {
                result.with_effect(Effect::append_bot(outcome.bot_content()))
            };
            Ok(result.with_effect(Effect::NotifyPending(false)))
        }

        (ExchangeState::Idle, Event::ReplyReceived { .. }) => {
            Err(TransitionError::NoExchangeInFlight)
        }

        // ============================================================
        // Clear
        // ============================================================
        (ExchangeState::Idle, Event::Clear) => {
            Ok(TransitionResult::new(ExchangeState::Idle).with_effect(Effect::ClearTranscript))
        }

        // Clearing does not cancel the request; remember it for the reply
        (ExchangeState::Pending { prompt, .. }, Event::Clear) => {
            Ok(TransitionResult::new(ExchangeState::Pending {
                prompt: prompt.clone(),
                cleared: true,
            })
            .with_effect(Effect::ClearTranscript))
        }
    }
}
