//! Responder abstraction
//!
//! The responder is the remote side of an exchange: it takes a prompt and
//! returns a reply or a failure. `HttpResponder` talks to the chat
//! endpoint; tests use the mocks in `runtime::testing`.

mod error;
mod http;
mod types;

pub use error::ResponderError;
pub use http::HttpResponder;
#[allow(unused_imports)] // Public API re-exports
pub use error::TransportKind;
#[allow(unused_imports)] // Public API re-exports
pub use types::{ChatErrorBody, ChatReply, ChatRequest};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for responders
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send one prompt and wait for the reply text
    async fn ask(&self, prompt: &str) -> Result<String, ResponderError>;

    /// Where requests go, for logs
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: Responder + ?Sized> Responder for Arc<T> {
    async fn ask(&self, prompt: &str) -> Result<String, ResponderError> {
        (**self).ask(prompt).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for responders
pub struct LoggingResponder {
    inner: Arc<dyn Responder>,
    endpoint: String,
}

impl LoggingResponder {
    pub fn new(inner: Arc<dyn Responder>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl Responder for LoggingResponder {
    async fn ask(&self, prompt: &str) -> Result<String, ResponderError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(prompt).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = prompt.chars().count(),
                    reply_chars = reply.chars().count(),
                    "Responder request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    transport_kind = ?e.transport_kind(),
                    "Responder request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
