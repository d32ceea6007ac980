//! InMemoryCountdownStore - 揮発性の保存先
//!
//! プロセス全体のシングルトンではなく、明示的に生成して注入するオブジェクトです。
//! テストでは複数インスタンスを同時に使えます。
//!
//! # 実装詳細
//! - `HashMap<CountdownId, Countdown>` を tokio の Mutex で排他制御
//! - 任意でレコード数の上限を設定でき、超えると `CapacityExceeded`

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Countdown, CountdownId, CountdownPatch, NewCountdown, StoreError};
use crate::ports::countdown_store::sort_newest_first;
use crate::ports::{Clock, CountdownStore, IdGenerator, SystemClock, UlidGenerator};

pub struct InMemoryCountdownStore {
    records: Mutex<HashMap<CountdownId, Countdown>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    max_records: Option<usize>,
}

impl InMemoryCountdownStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Stamps and ULIDs both come from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ids: Arc::new(UlidGenerator::new(clock.clone())),
            clock,
            max_records: None,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl Default for InMemoryCountdownStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CountdownStore for InMemoryCountdownStore {
    async fn create(&self, input: NewCountdown) -> Result<CountdownId, StoreError> {
        let mut records = self.records.lock().await;

        if let Some(limit) = self.max_records
            && records.len() >= limit
        {
            tracing::warn!(limit, "in-memory store is full");
            return Err(StoreError::CapacityExceeded {
                limit: limit as u64,
                requested: records.len() as u64 + 1,
            });
        }

        let id = self.ids.generate_countdown_id();
        let countdown = input.into_countdown(id, self.clock.now());
        records.insert(id, countdown);

        tracing::info!(%id, "countdown created");
        Ok(id)
    }

    async fn get(&self, id: &CountdownId) -> Result<Option<Countdown>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.get(id).cloned())
    }

    async fn update(&self, id: &CountdownId, patch: CountdownPatch) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let Some(record) = records.get_mut(id) else {
            return Err(StoreError::NotFound(*id));
        };

        record.apply(patch);
        record.touch(self.clock.now());

        tracing::info!(%id, "countdown updated");
        Ok(())
    }

    async fn delete(&self, id: &CountdownId) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if records.remove(id).is_some() {
            tracing::info!(%id, "countdown deleted");
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Countdown>, StoreError> {
        let records = self.records.lock().await;
        let mut all: Vec<Countdown> = records.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    fn fixture() -> (FixedClock, InMemoryCountdownStore) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let store = InMemoryCountdownStore::with_clock(Arc::new(clock.clone()));
        (clock, store)
    }

    fn input(title: &str) -> NewCountdown {
        NewCountdown::natural(
            title,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            "UTC",
        )
    }

    #[tokio::test]
    async fn instances_do_not_share_state() {
        let (_, a) = fixture();
        let (_, b) = fixture();

        let id = a.create(input("only in a")).await.unwrap();

        assert!(a.get(&id).await.unwrap().is_some());
        assert!(b.get(&id).await.unwrap().is_none());
        assert!(b.is_empty().await);
    }

    #[tokio::test]
    async fn capacity_limit_is_reported_distinctly() {
        let (_, store) = fixture();
        let store = store.with_max_records(1);

        store.create(input("first")).await.unwrap();
        let err = store.create(input("second")).await.unwrap_err();

        assert!(err.is_capacity_exceeded());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_uses_injected_clock() {
        let (clock, store) = fixture();
        let id = store.create(input("tick")).await.unwrap();

        clock.advance(Duration::minutes(3));
        store
            .update(
                &id,
                CountdownPatch {
                    location: Some(Some("Lisbon".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.updated_at, record.created_at + Duration::minutes(3));
        assert_eq!(record.location.as_deref(), Some("Lisbon"));
    }

    #[tokio::test]
    async fn last_write_wins() {
        let (_, store) = fixture();
        let store = Arc::new(store);
        let id = store.create(input("race")).await.unwrap();

        let writers: Vec<_> = ["one", "two"]
            .into_iter()
            .map(|title| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .update(
                            &id,
                            CountdownPatch {
                                title: Some(title.to_string()),
                                ..Default::default()
                            },
                        )
                        .await
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let title = store.get(&id).await.unwrap().unwrap().title;
        assert!(title == "one" || title == "two");
    }
}
