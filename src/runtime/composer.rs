//! Text being composed, before it becomes a turn

use super::{Exchange, IgnoreReason, Session};
use crate::responder::Responder;

/// Prompts offered on an empty conversation
pub const SUGGESTED_PROMPTS: [&str; 3] = [
    "What can you help me with?",
    "Tell me a fun fact",
    "Explain AI",
];

/// Pending input owned by the input surface
#[derive(Debug, Clone, Default)]
pub struct Composer {
    text: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // Read back by richer input surfaces
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether a send would be admitted on content alone
    pub fn is_sendable(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Load one of `SUGGESTED_PROMPTS`. Returns false for an unknown index.
    pub fn use_suggestion(&mut self, index: usize) -> bool {
        match SUGGESTED_PROMPTS.get(index) {
            Some(prompt) => {
                self.set(*prompt);
                true
            }
            None => false,
        }
    }

    /// Submit the composed text to `session`.
    ///
    /// On acceptance the composer is emptied right away, before the
    /// exchange settles; on rejection the text is left alone.
    pub fn send<R: Responder + 'static>(
        &mut self,
        session: &Session<R>,
    ) -> Result<Exchange<R>, IgnoreReason> {
        let exchange = session.begin(&self.text)?;
        self.text.clear();
        Ok(exchange)
    }
}
