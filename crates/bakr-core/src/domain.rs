use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Store-assigned concert identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConcertId(pub i64);

impl std::fmt::Display for ConcertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted concert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concert {
    pub concert_id: ConcertId,
    pub planned_to: NaiveDate,
    pub city_on: String,
    pub institution_on: String,
    pub link_to: String,
}

/// Concert fields supplied by the admin. The identifier is always assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConcert {
    pub planned_to: NaiveDate,
    pub city_on: String,
    pub institution_on: String,
    pub link_to: String,
}

impl NewConcert {
    pub fn into_concert(self, concert_id: ConcertId) -> Concert {
        Concert {
            concert_id,
            planned_to: self.planned_to,
            city_on: self.city_on,
            institution_on: self.institution_on,
            link_to: self.link_to,
        }
    }
}
