//! Conversation session and exchange controller

use super::SessionEvent;
use crate::responder::{Responder, ResponderError};
use crate::state_machine::{
    transition, Effect, Event, ExchangeOutcome, ExchangeState, SessionContext, TransitionError,
};
use crate::transcript::{Transcript, Turn};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 128;

/// Why a submission was ignored. Neither case is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing left after trimming
    EmptyInput,
    /// Another exchange has not settled yet
    ExchangeInFlight,
}

/// Result of `Session::submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Ignored(IgnoreReason),
    Settled(ExchangeOutcome),
}

impl From<ResponderError> for ExchangeOutcome {
    fn from(e: ResponderError) -> Self {
        match e {
            ResponderError::Application { message, .. } => ExchangeOutcome::ApplicationError(message),
            ResponderError::Transport { .. } => ExchangeOutcome::TransportFailure,
        }
    }
}

/// Mutable session state, only touched under the lock and never across
/// an await
#[derive(Debug, Default)]
struct SessionCore {
    exchange: ExchangeState,
    transcript: Transcript,
}

struct SessionInner<R> {
    context: SessionContext,
    responder: R,
    core: Mutex<SessionCore>,
    events_tx: broadcast::Sender<SessionEvent>,
}

/// One conversation: transcript, pending flag and the responder it talks to.
///
/// Cloning yields another handle to the same session. Separately
/// constructed sessions share nothing.
pub struct Session<R: Responder + 'static> {
    inner: Arc<SessionInner<R>>,
}

impl<R: Responder + 'static> Clone for Session<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Responder + 'static> Session<R> {
    pub fn new(responder: R, context: SessionContext) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        tracing::debug!(
            session_id = %context.session_id,
            clear_policy = ?context.clear_policy,
            endpoint = %responder.endpoint(),
            "Session created"
        );
        Self {
            inner: Arc::new(SessionInner {
                context,
                responder,
                core: Mutex::new(SessionCore::default()),
                events_tx,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.context.session_id
    }

    /// Current turns, oldest first
    pub fn transcript(&self) -> Vec<Turn> {
        self.lock().transcript.snapshot()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().exchange.is_pending()
    }

    /// Receive change notifications from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Submit raw text and wait for the exchange to settle
    pub async fn submit(&self, raw: &str) -> Submission {
        match self.begin(raw) {
            Ok(exchange) => Submission::Settled(exchange.settle().await),
            Err(reason) => Submission::Ignored(reason),
        }
    }

    /// Validate, commit the user turn and enter pending, without waiting.
    ///
    /// The returned `Exchange` must be settled to record the bot turn;
    /// dropping it early records a transport failure instead.
    pub fn begin(&self, raw: &str) -> Result<Exchange<R>, IgnoreReason> {
        match self.apply(Event::Submit {
            raw: raw.to_string(),
        }) {
            Ok(request) => {
                // Pending is already set; an Exchange must exist to resolve it
                let prompt = request.unwrap_or_else(|| raw.trim().to_string());
                tracing::info!(
                    session_id = %self.id(),
                    prompt_chars = prompt.chars().count(),
                    "Exchange started"
                );
                Ok(Exchange {
                    session: self.clone(),
                    prompt,
                    started: Instant::now(),
                    settled: false,
                })
            }
            Err(e) => {
                tracing::debug!(session_id = %self.id(), reason = %e, "Submission ignored");
                Err(match e {
                    TransitionError::EmptyInput => IgnoreReason::EmptyInput,
                    _ => IgnoreReason::ExchangeInFlight,
                })
            }
        }
    }

    /// Empty the transcript. Does not cancel an in-flight exchange.
    pub fn clear(&self) {
        if let Err(e) = self.apply(Event::Clear) {
            tracing::warn!(session_id = %self.id(), error = %e, "Clear rejected");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        self.inner.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.inner.events_tx.send(event);
    }

    /// Run one transition and execute its effects.
    ///
    /// Returns the prompt to send when the transition asked for a request.
    fn apply(&self, event: Event) -> Result<Option<String>, TransitionError> {
        let mut core = self.lock();
        let result = transition(&core.exchange, &self.inner.context, event)?;
        core.exchange = result.new_state;

        let mut request = None;
        for effect in result.effects {
            match effect {
                Effect::AppendTurn(turn) => {
                    let index = core.transcript.append(turn.clone());
                    self.notify(SessionEvent::TurnAppended { index, turn });
                }
                Effect::ClearTranscript => {
                    core.transcript.clear();
                    self.notify(SessionEvent::Cleared);
                }
                Effect::RequestReply { prompt } => request = Some(prompt),
                Effect::NotifyPending(pending) => {
                    self.notify(SessionEvent::PendingChanged { pending });
                }
            }
        }

        Ok(request)
    }
}

/// An accepted submission whose reply has not been recorded yet
pub struct Exchange<R: Responder + 'static> {
    session: Session<R>,
    prompt: String,
    started: Instant,
    settled: bool,
}

impl<R: Responder + 'static> Exchange<R> {
    /// Trimmed text sent to the responder
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Call the responder once and record exactly one bot turn.
    ///
    /// Never fails: every failure, including a panicking responder, is
    /// converted into transcript content.
    pub async fn settle(mut self) -> ExchangeOutcome {
        let result = AssertUnwindSafe(self.session.inner.responder.ask(&self.prompt))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(Ok(reply)) => ExchangeOutcome::Success(reply),
            Ok(Err(e)) => ExchangeOutcome::from(e),
            Err(_) => {
                tracing::error!(session_id = %self.session.id(), "Responder panicked");
                ExchangeOutcome::TransportFailure
            }
        };

        self.finish(outcome.clone());
        outcome
    }

    fn finish(&mut self, outcome: ExchangeOutcome) {
        self.settled = true;
        tracing::info!(
            session_id = %self.session.id(),
            duration_ms = %self.started.elapsed().as_millis(),
            outcome = outcome.label(),
            "Exchange settled"
        );
        if let Err(e) = self.session.apply(Event::ReplyReceived { outcome }) {
            tracing::error!(session_id = %self.session.id(), error = %e, "Failed to record reply");
        }
    }
}

impl<R: Responder + 'static> Drop for Exchange<R> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(
                session_id = %self.session.id(),
                "Exchange dropped before settling, recording transport failure"
            );
            self.finish(ExchangeOutcome::TransportFailure);
        }
    }
}
