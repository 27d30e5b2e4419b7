use bakr_core::{
    domain::{ChatId, UserId},
    messaging::types::{IncomingUpdate, StartCommand},
};
use teloxide::prelude::*;

use crate::router::AppState;

fn parse_command(text: &str) -> Option<(String, String)> {
    if !text.trim_start().starts_with('/') {
        return None;
    }

    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    Some((cmd, rest))
}

/// Only `/start` is a command; other slash texts reach the controller as text.
pub(super) fn is_start(text: &str) -> bool {
    matches!(parse_command(text), Some((cmd, _)) if cmd == "start")
}

pub(super) async fn handle_start(
    state: &AppState,
    chat_id: i64,
    user_id: UserId,
) -> ResponseResult<()> {
    tracing::info!(chat_id, user_id = user_id.0, "/start");
    let update = IncomingUpdate::Start(StartCommand {
        chat_id: ChatId(chat_id),
        user_id,
    });
    if let Err(e) = state.controller.handle(update).await {
        tracing::error!(chat_id, "start failed: {e}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_bot_suffix_and_args() {
        assert_eq!(
            parse_command("/Start@bakr_bot  deep-link"),
            Some(("start".to_string(), "deep-link".to_string()))
        );
        assert_eq!(parse_command("hello"), None);
    }

    #[test]
    fn only_start_is_a_command() {
        assert!(is_start("/start"));
        assert!(is_start("/start@bakr_bot"));
        assert!(!is_start("/help"));
        assert!(!is_start("/starting"));
        assert!(!is_start("start"));
    }
}
