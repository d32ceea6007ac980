//! CountdownStore port - Countdown レコードの保存先
//!
//! どの保存媒体（メモリ、JSON ファイル、将来はリモート KV）でも同じ契約を守ります。
//!
//! # 契約
//! - `create`: 新しい ID を払い出し、`createdAt = updatedAt = now` で保存
//! - `get`: 完全一致のみ。無ければ `Ok(None)`
//! - `update`: 指定フィールドだけを上書きし `updatedAt` を進める。無ければ `StoreError::NotFound`（新規作成しない）
//! - `delete`: 冪等。存在しない ID でもエラーにしない
//! - `list_all`: `createdAt` の新しい順
//!
//! 保存媒体の障害（I/O、容量超過など）は `Err` として返し、`None` に丸めない。
//! 同じ ID への同時更新は後勝ち（ロックや競合検出はしない）。

use async_trait::async_trait;

use crate::domain::{Countdown, CountdownId, CountdownPatch, NewCountdown, StoreError};

#[async_trait]
pub trait CountdownStore: Send + Sync {
    async fn create(&self, input: NewCountdown) -> Result<CountdownId, StoreError>;

    async fn get(&self, id: &CountdownId) -> Result<Option<Countdown>, StoreError>;

    async fn update(&self, id: &CountdownId, patch: CountdownPatch) -> Result<(), StoreError>;

    async fn delete(&self, id: &CountdownId) -> Result<(), StoreError>;

    async fn list_all(&self) -> Result<Vec<Countdown>, StoreError>;
}

/// Newest first; ULIDs break ties between records created in the same instant.
pub fn sort_newest_first(records: &mut [Countdown]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
