//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - checks the allowlist
//! - takes the per-chat lock
//! - converts the teloxide update into a core `IncomingUpdate`

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use bakr_core::domain::UserId;
use bakr_core::security::is_authorized;

use crate::router::AppState;
mod callback;
mod commands;
mod text;

const UNAUTHORIZED: &str = "Unauthorized. Contact the bot owner for access.";

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let user_id = msg.from().map(|u| UserId(u.id.0 as i64));

    let Some(text) = msg.text() else {
        return Ok(());
    };

    if !is_authorized(user_id, &state.cfg.telegram_allowed_users) {
        tracing::warn!(chat_id, user_id = ?user_id.map(|u| u.0), "unauthorized message");
        let _ = bot.send_message(msg.chat.id, UNAUTHORIZED).await;
        return Ok(());
    }
    let Some(user_id) = user_id else {
        return Ok(());
    };

    let _guard = state.chat_locks.lock_chat(chat_id).await;

    if commands::is_start(text) {
        return commands::handle_start(&state, chat_id, user_id).await;
    }
    text::handle_text(&state, chat_id, user_id, text).await
}
