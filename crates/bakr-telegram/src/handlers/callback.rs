use std::sync::Arc;

use teloxide::prelude::*;

use bakr_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{self, IncomingUpdate},
    security::is_authorized,
};

use crate::router::AppState;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let user_id = UserId(q.from.id.0 as i64);
    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });
    let data = q.data.clone().unwrap_or_default();

    // Always answer callback query eventually.
    let Some(menu) = message.filter(|_| !data.is_empty()) else {
        let _ = bot.answer_callback_query(q.id).await;
        return Ok(());
    };

    if !is_authorized(Some(user_id), &state.cfg.telegram_allowed_users) {
        tracing::warn!(user_id = user_id.0, "unauthorized button press");
        let _ = bot
            .answer_callback_query(q.id)
            .text("Unauthorized".to_string())
            .await;
        return Ok(());
    }

    let chat_id = menu.chat_id;
    let _guard = state.chat_locks.lock_chat(chat_id.0).await;

    tracing::debug!(chat_id = chat_id.0, action = %data, "button pressed");
    let update = IncomingUpdate::Callback(types::CallbackQuery {
        chat_id,
        user_id,
        callback_id: q.id,
        data,
        message: Some(menu),
    });
    if let Err(e) = state.controller.handle(update).await {
        tracing::error!(chat_id = chat_id.0, "callback handling failed: {e}");
    }
    Ok(())
}
