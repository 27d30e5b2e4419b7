use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};

use super::{ConcertStore, StoreError, StoreResult};
use crate::domain::{Concert, ConcertId, NewConcert};

/// `AUTOINCREMENT` keeps identifiers monotonic even after the highest row is deleted.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS concerts (
    concert_id INTEGER PRIMARY KEY AUTOINCREMENT,
    planned_to TEXT NOT NULL,
    city_on TEXT NOT NULL,
    institution_on TEXT NOT NULL,
    link_to TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_concerts_planned_to ON concerts(planned_to);
"#;

const DATE_FORMAT: &str = "%Y-%m-%d";

const COLUMNS: &str = "concert_id, planned_to, city_on, institution_on, link_to";

/// SQLite-backed store. Work runs on the blocking pool behind a single connection.
#[derive(Clone)]
pub struct SqliteConcertStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteConcertStore {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {e}")))?
    }
}

fn row_to_concert(row: &Row<'_>) -> rusqlite::Result<Concert> {
    let raw_date: String = row.get(1)?;
    let planned_to = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Concert {
        concert_id: ConcertId(row.get(0)?),
        planned_to,
        city_on: row.get(2)?,
        institution_on: row.get(3)?,
        link_to: row.get(4)?,
    })
}

#[async_trait]
impl ConcertStore for SqliteConcertStore {
    async fn create(&self, concert: NewConcert) -> StoreResult<Concert> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO concerts (planned_to, city_on, institution_on, link_to)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    concert.planned_to.format(DATE_FORMAT).to_string(),
                    concert.city_on,
                    concert.institution_on,
                    concert.link_to,
                ],
            )?;
            let id = ConcertId(conn.last_insert_rowid());
            Ok(concert.into_concert(id))
        })
        .await
    }

    async fn list_by_date(&self) -> StoreResult<Vec<Concert>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM concerts ORDER BY planned_to ASC, concert_id ASC"
            ))?;
            let rows = stmt.query_map([], row_to_concert)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
    }

    async fn delete(&self, concert_id: ConcertId) -> StoreResult<Option<Concert>> {
        self.with_conn(move |conn| {
            let deleted = conn
                .query_row(
                    &format!("DELETE FROM concerts WHERE concert_id = ?1 RETURNING {COLUMNS}"),
                    params![concert_id.0],
                    row_to_concert,
                )
                .optional()?;
            Ok(deleted)
        })
        .await
    }
}
