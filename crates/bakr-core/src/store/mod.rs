//! Concert record store.
//!
//! The store owns identifier assignment: callers hand in a [`NewConcert`] and
//! get back a [`Concert`] with a fresh, never-reused [`ConcertId`].

use async_trait::async_trait;

use crate::domain::{Concert, ConcertId, NewConcert};

mod memory;
mod sqlite;

pub use memory::MemoryConcertStore;
pub use sqlite::SqliteConcertStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ConcertStore: Send + Sync {
    /// Persist a new concert and return it with its assigned identifier.
    async fn create(&self, concert: NewConcert) -> StoreResult<Concert>;

    /// All concerts ordered by date ascending (ties by identifier).
    async fn list_by_date(&self) -> StoreResult<Vec<Concert>>;

    /// Remove a concert, returning it if it existed.
    async fn delete(&self, concert_id: ConcertId) -> StoreResult<Option<Concert>>;
}
