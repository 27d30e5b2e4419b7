use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::Screen,
    Result,
};

/// Cross-messenger port.
///
/// Telegram is the only implementation today; the controller only ever talks to
/// this trait so tests can swap in a recording fake.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send a plain-text reply (no parse mode).
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    /// Send a menu screen as a new message.
    async fn send_screen(&self, chat_id: ChatId, screen: &Screen) -> Result<MessageRef>;

    /// Replace text and keyboard of an existing message in place.
    async fn edit_screen(&self, msg: MessageRef, screen: &Screen) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
