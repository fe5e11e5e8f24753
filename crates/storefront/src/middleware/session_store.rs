//! Bounded in-memory session store.
//!
//! Records live in a `moka` cache: each one is evicted at its own expiry
//! date, and the least recently used go first once the store is full.
//! Nothing survives a restart.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tower_sessions::SessionStore;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;

/// Default maximum number of live sessions.
pub const MAX_SESSIONS: u64 = 100_000;

/// Session store that forgets expired and least recently used records.
#[derive(Clone)]
pub struct BoundedMemoryStore {
    records: Cache<Id, Record>,
}

impl BoundedMemoryStore {
    /// Create a store holding at most `max_sessions` records.
    #[must_use]
    pub fn new(max_sessions: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(max_sessions)
            .expire_after(UntilExpiryDate)
            .build();
        Self { records }
    }
}

impl Default for BoundedMemoryStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

impl fmt::Debug for BoundedMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedMemoryStore")
            .field("sessions", &self.records.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for BoundedMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Expires each record at the expiry date it was last saved with.
struct UntilExpiryDate;

impl Expiry<Id, Record> for UntilExpiryDate {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(time_left(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(time_left(record))
    }
}

/// Zero once the expiry date has passed.
fn time_left(record: &Record) -> Duration {
    Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use tower_sessions::cookie::time;

    use super::*;

    fn record(expires_in: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_create_then_load() {
        let store = BoundedMemoryStore::default();
        let mut record = record(time::Duration::minutes(30));

        store.create(&mut record).await.expect("create");

        assert_eq!(store.load(&record.id).await.expect("load"), Some(record));
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let store = BoundedMemoryStore::default();
        let record = record(time::Duration::seconds(-1));

        store.save(&record).await.expect("save");

        assert_eq!(store.load(&record.id).await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = BoundedMemoryStore::default();
        let mut record = record(time::Duration::minutes(30));

        store.create(&mut record).await.expect("create");
        store.delete(&record.id).await.expect("delete");

        assert_eq!(store.load(&record.id).await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_create_replaces_colliding_id() {
        let store = BoundedMemoryStore::default();
        let mut first = record(time::Duration::minutes(30));
        store.create(&mut first).await.expect("create");

        let mut second = record(time::Duration::minutes(30));
        second.id = first.id;
        store.create(&mut second).await.expect("create");

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let store = BoundedMemoryStore::new(10);
        for _ in 0..100 {
            store
                .save(&record(time::Duration::minutes(30)))
                .await
                .expect("save");
        }

        store.records.run_pending_tasks().await;

        assert!(store.records.entry_count() <= 10);
    }
}
