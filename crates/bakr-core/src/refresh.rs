use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::MessageRef,
    messaging::{port::MessagingPort, types::Screen},
};

/// Delayed, fire-and-forget re-render of a menu message.
///
/// Pending refreshes are only cancelled when the shutdown token fires. A
/// refresh that fires after the admin already navigated elsewhere still
/// overwrites the message; last write wins.
#[derive(Clone)]
pub struct MenuRefresher {
    messenger: Arc<dyn MessagingPort>,
    shutdown: CancellationToken,
}

impl MenuRefresher {
    pub fn new(messenger: Arc<dyn MessagingPort>, shutdown: CancellationToken) -> Self {
        Self {
            messenger,
            shutdown,
        }
    }

    pub fn schedule(&self, target: MessageRef, screen: Screen, delay: Duration) {
        let messenger = self.messenger.clone();
        let cancel = self.shutdown.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(chat_id = target.chat_id.0, "menu refresh cancelled");
                }
                _ = sleep(delay) => {
                    if let Err(e) = messenger.edit_screen(target, &screen).await {
                        tracing::warn!(
                            chat_id = target.chat_id.0,
                            message_id = target.message_id.0,
                            "menu refresh failed: {e}"
                        );
                    }
                }
            }
        });
    }
}
