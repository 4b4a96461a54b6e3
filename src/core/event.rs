//! Message event trait: the host's per-event reply channel
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;

use super::message::MessageChain;

/// The event a tool call originated from
///
/// Tools only use it to deliver replies back into the conversation that triggered them.
///
/// # Example
///
/// ```ignore
/// struct StdoutEvent;
///
/// #[async_trait]
/// impl MessageEvent for StdoutEvent {
///     fn session_id(&self) -> &str {
///         "stdout"
///     }
///
///     async fn send(&self, message: MessageChain) -> Result<()> {
///         println!("{message:?}");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MessageEvent: Send + Sync {
    /// Identifier of the conversation, used for logging
    fn session_id(&self) -> &str;

    /// Deliver a message to the conversation
    async fn send(&self, message: MessageChain) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe (can be used with dyn)
    fn _assert_object_safe(_: &dyn MessageEvent) {}
}
