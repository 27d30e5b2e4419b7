use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ConcertStore, StoreResult};
use crate::domain::{Concert, ConcertId, NewConcert};

#[derive(Debug)]
struct Inner {
    next_id: i64,
    concerts: BTreeMap<ConcertId, Concert>,
}

/// In-process store. Identifiers start at 1 and keep counting across deletes.
#[derive(Debug)]
pub struct MemoryConcertStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryConcertStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                concerts: BTreeMap::new(),
            }),
        }
    }
}

impl MemoryConcertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.concerts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ConcertStore for MemoryConcertStore {
    async fn create(&self, concert: NewConcert) -> StoreResult<Concert> {
        let mut inner = self.inner.lock().await;
        let id = ConcertId(inner.next_id);
        inner.next_id += 1;
        let concert = concert.into_concert(id);
        inner.concerts.insert(id, concert.clone());
        Ok(concert)
    }

    async fn list_by_date(&self) -> StoreResult<Vec<Concert>> {
        let inner = self.inner.lock().await;
        let mut out: Vec<Concert> = inner.concerts.values().cloned().collect();
        out.sort_by_key(|c| (c.planned_to, c.concert_id));
        Ok(out)
    }

    async fn delete(&self, concert_id: ConcertId) -> StoreResult<Option<Concert>> {
        Ok(self.inner.lock().await.concerts.remove(&concert_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn concert(date: (i32, u32, u32), city: &str) -> NewConcert {
        NewConcert {
            planned_to: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            city_on: city.to_string(),
            institution_on: "Hall".to_string(),
            link_to: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = MemoryConcertStore::new();
        let a = store.create(concert((2024, 1, 1), "A")).await.unwrap();
        let b = store.create(concert((2024, 1, 2), "B")).await.unwrap();
        assert_eq!(b.concert_id.0, a.concert_id.0 + 1);

        store.delete(b.concert_id).await.unwrap();
        let c = store.create(concert((2024, 1, 3), "C")).await.unwrap();
        assert_eq!(c.concert_id.0, b.concert_id.0 + 1);
    }

    #[tokio::test]
    async fn lists_by_date_ascending() {
        let store = MemoryConcertStore::new();
        store.create(concert((2025, 3, 1), "late")).await.unwrap();
        store.create(concert((2024, 3, 1), "early")).await.unwrap();

        let cities: Vec<String> = store
            .list_by_date()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.city_on)
            .collect();
        assert_eq!(cities, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn delete_missing_is_none() {
        let store = MemoryConcertStore::new();
        store.create(concert((2024, 1, 1), "A")).await.unwrap();
        assert!(store.delete(ConcertId(42)).await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }
}
