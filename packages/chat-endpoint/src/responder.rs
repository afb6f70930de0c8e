//! Reply generation for incoming chat messages.

use anyhow::Result;
use async_trait::async_trait;

/// Produces the reply text for a message.
///
/// `context_ref` is the opaque reference the widget sends alongside the
/// message (typically the host's API description URL).
#[async_trait]
pub trait Responder: Send + Sync {
    async fn reply(&self, message: &str, context_ref: &str) -> Result<String>;
}

/// Placeholder responder that acknowledges the message verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn reply(&self, message: &str, _context_ref: &str) -> Result<String> {
        Ok(format!("AI Bot: Отримано запит: \"{message}\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_reply() {
        let reply = EchoResponder
            .reply("list users", "http://localhost/api/swagger.json")
            .await
            .unwrap();
        assert_eq!(reply, "AI Bot: Отримано запит: \"list users\"");
    }
}
