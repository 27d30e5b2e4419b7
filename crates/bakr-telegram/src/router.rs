use std::{collections::HashMap, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;

use bakr_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use bakr_core::{
    config::Config,
    conversation::{ConversationController, RefreshDelays},
    messaging::port::MessagingPort,
    refresh::MenuRefresher,
    session::SessionStore,
    store::ConcertStore,
    utils::AuditLogger,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub controller: Arc<ConversationController>,
    pub chat_locks: Arc<ChatLocks>,
}

/// One async lock per chat so a chat's session is never loaded and saved by
/// two updates at once.
#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

fn audit_logger(cfg: &Config) -> AuditLogger {
    match &cfg.audit_log_path {
        Some(path) => AuditLogger::new(path, cfg.audit_log_json),
        None => AuditLogger::disabled(),
    }
}

/// Long-poll Telegram until `shutdown` is cancelled.
pub async fn run_polling(
    cfg: Arc<Config>,
    store: Arc<dyn ConcertStore>,
    sessions: Arc<dyn SessionStore>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!("bot started: @{}", me.username()),
        Err(e) => tracing::warn!("get_me failed: {e}"),
    }
    if cfg.telegram_allowed_users.is_empty() {
        tracing::warn!("TELEGRAM_ALLOWED_USERS is empty; the admin panel is open to everyone");
    } else {
        tracing::info!(allowed_users = cfg.telegram_allowed_users.len(), "allowlist loaded");
    }

    // Menus are edited in place and refreshed on timers; throttle to keep clear of 429s.
    // RetryAfter is still retried once in the Telegram adapter.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let audit = audit_logger(&cfg);
    if let Some(path) = audit.path() {
        tracing::info!(path = %path.display(), "audit log enabled");
    }

    let controller = Arc::new(ConversationController::new(
        store,
        sessions,
        messenger.clone(),
        MenuRefresher::new(messenger, shutdown.child_token()),
        audit,
        RefreshDelays::from_config(&cfg),
    ));

    let state = Arc::new(AppState {
        cfg,
        controller,
        chat_locks: Arc::new(ChatLocks::default()),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .build();

    let stop = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        match stop.shutdown() {
            Ok(done) => {
                done.await;
                tracing::info!("telegram dispatcher stopped");
            }
            Err(e) => tracing::debug!("dispatcher shutdown skipped: {e}"),
        }
    });

    dispatcher.dispatch().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn chat_locks_serialize_same_chat() {
        let locks = Arc::new(ChatLocks::default());
        let guard = locks.lock_chat(1).await;

        let other = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock_chat(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!other.is_finished());

        drop(guard);
        other.await.unwrap();
    }

    #[tokio::test]
    async fn chat_locks_are_independent_per_chat() {
        let locks = ChatLocks::default();
        let _a = locks.lock_chat(1).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(2)).await;
        assert!(b.is_ok());
    }
}
