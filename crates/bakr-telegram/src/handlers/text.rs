use bakr_core::{
    domain::{ChatId, UserId},
    messaging::types::{IncomingUpdate, TextMessage},
};
use teloxide::prelude::*;

use crate::router::AppState;

pub(super) async fn handle_text(
    state: &AppState,
    chat_id: i64,
    user_id: UserId,
    text: &str,
) -> ResponseResult<()> {
    let update = IncomingUpdate::Text(TextMessage {
        chat_id: ChatId(chat_id),
        user_id,
        text: text.to_string(),
    });
    if let Err(e) = state.controller.handle(update).await {
        tracing::error!(chat_id, "text handling failed: {e}");
    }
    Ok(())
}
