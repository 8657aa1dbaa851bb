//! HTTP responder for the chat endpoint
//!
//! One `POST` per prompt with a JSON body. The body is parsed before the
//! status is inspected, so a non-JSON body is a transport failure whatever
//! the status code says.

use super::types::{ChatErrorBody, ChatReply, ChatRequest};
use super::{Responder, ResponderError};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Responder backed by a JSON-over-HTTP endpoint
pub struct HttpResponder {
    client: Client,
    endpoint: String,
}

impl HttpResponder {
    pub fn new(config: &ClientConfig) -> Result<Self, ResponderError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn interpret(status: reqwest::StatusCode, body: &str) -> Result<String, ResponderError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            ResponderError::malformed(format!("status {status}: body is not JSON: {e}"))
        })?;

        if status.is_success() {
            let reply: ChatReply = serde_json::from_value(value).map_err(|e| {
                ResponderError::malformed(format!("status {status}: missing reply text: {e}"))
            })?;
            return Ok(reply.response);
        }

        if value.is_null() {
            return Err(ResponderError::malformed(format!(
                "status {status}: null error body"
            )));
        }

        let body = ChatErrorBody::from_value(&value);
        Err(ResponderError::application(status.as_u16(), body.error))
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn ask(&self, prompt: &str) -> Result<String, ResponderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Self::interpret(status, &body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
