use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    domain::{ChatId, MessageRef},
    Result,
};

/// What the next free-text message from the chat will be interpreted as.
///
/// Capture variants serialize to the admin panel's `waitingFor` names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureState {
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "concert_data")]
    AwaitingConcertData,
    #[serde(rename = "delete_concert_id")]
    AwaitingDeleteId,
    #[serde(rename = "music_name")]
    AwaitingMusicName,
}

impl CaptureState {
    /// The `waitingFor` name, or `None` when idle.
    pub fn waiting_for(self) -> Option<&'static str> {
        match self {
            CaptureState::Idle => None,
            CaptureState::AwaitingConcertData => Some("concert_data"),
            CaptureState::AwaitingDeleteId => Some("delete_concert_id"),
            CaptureState::AwaitingMusicName => Some("music_name"),
        }
    }
}

/// Per-chat UI state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The menu message that delayed refreshes edit in place.
    pub menu: Option<MessageRef>,
    pub waiting_for: CaptureState,
}

/// Per-chat session persistence.
///
/// Loading an unknown chat yields a default (idle) session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, chat_id: ChatId) -> Result<Session>;
    async fn save(&self, chat_id: ChatId, session: Session) -> Result<()>;
}

/// Process-lifetime session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<ChatId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, chat_id: ChatId) -> Result<Session> {
        Ok(self
            .sessions
            .lock()
            .await
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, chat_id: ChatId, session: Session) -> Result<()> {
        self.sessions.lock().await.insert(chat_id, session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;

    #[test]
    fn capture_state_serializes_like_waiting_for_flag() {
        assert_eq!(
            serde_json::to_string(&CaptureState::AwaitingDeleteId).unwrap(),
            "\"delete_concert_id\""
        );
        let s: CaptureState = serde_json::from_str("\"music_name\"").unwrap();
        assert_eq!(s, CaptureState::AwaitingMusicName);
        assert_eq!(CaptureState::Idle.waiting_for(), None);
        assert_eq!(
            CaptureState::AwaitingConcertData.waiting_for(),
            Some("concert_data")
        );
    }

    #[tokio::test]
    async fn sessions_are_independent_per_chat() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load(ChatId(1)).await.unwrap(), Session::default());

        let session = Session {
            menu: Some(MessageRef {
                chat_id: ChatId(1),
                message_id: MessageId(10),
            }),
            waiting_for: CaptureState::AwaitingConcertData,
        };
        store.save(ChatId(1), session.clone()).await.unwrap();

        assert_eq!(store.load(ChatId(1)).await.unwrap(), session);
        assert_eq!(store.load(ChatId(2)).await.unwrap(), Session::default());
    }
}
