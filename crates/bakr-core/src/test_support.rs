use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::Screen,
    },
    Result,
};

/// Messenger that records every call instead of talking to Telegram.
#[derive(Default)]
pub(crate) struct FakeMessenger {
    next_id: Mutex<i32>,
    pub texts: Mutex<Vec<(ChatId, String)>>,
    pub screens: Mutex<Vec<(MessageRef, Screen)>>,
    pub edits: Mutex<Vec<(MessageRef, Screen)>>,
    pub answers: Mutex<Vec<(String, Option<String>)>>,
    pub fail_edits: AtomicBool,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    fn alloc(&self, chat_id: ChatId) -> MessageRef {
        let mut guard = self.next_id.lock().unwrap();
        let id = *guard;
        *guard += 1;
        MessageRef {
            chat_id,
            message_id: MessageId(id),
        }
    }

    pub fn set_fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts.lock().unwrap().last().map(|(_, t)| t.clone())
    }

    pub fn last_edit(&self) -> Option<(MessageRef, Screen)> {
        self.edits.lock().unwrap().last().cloned()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }

    pub fn last_answer(&self) -> Option<(String, Option<String>)> {
        self.answers.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        self.texts.lock().unwrap().push((chat_id, text.to_string()));
        Ok(self.alloc(chat_id))
    }

    async fn send_screen(&self, chat_id: ChatId, screen: &Screen) -> Result<MessageRef> {
        let msg = self.alloc(chat_id);
        self.screens.lock().unwrap().push((msg, screen.clone()));
        Ok(msg)
    }

    async fn edit_screen(&self, msg: MessageRef, screen: &Screen) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(Error::External(
                "telegram error: message to edit not found".to_string(),
            ));
        }
        self.edits.lock().unwrap().push((msg, screen.clone()));
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.answers
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.map(|s| s.to_string())));
        Ok(())
    }
}
