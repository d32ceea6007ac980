//! Errors - エラー型と分類
//!
//! - **ValidationError**: 呼び出し側で弾く入力エラー（store / engine には届かない）
//! - **StoreError**: 保存先の障害（I/O、容量超過など）と not-found
//!
//! engine はエラーを返さない（不正な設定は natural へのフォールバックで扱う）。

use thiserror::Error;

use super::ids::CountdownId;

/// ValidationError は作成・更新前の入力検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("target date must be in the future")]
    TargetNotInFuture,

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("working countdowns require working hours")]
    MissingWorkingHours,

    #[error("working hours are only allowed on working countdowns")]
    UnexpectedWorkingHours,
}

/// StoreError は CountdownStore の操作エラー
///
/// not-found は他の障害と区別して報告する（空の結果と混同しない）。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("countdown {0} not found")]
    NotFound(CountdownId),

    /// 容量超過。呼び出し側が「画像を減らす」などの対処を提案できるよう区別する
    #[error("storage capacity exceeded (limit={limit}, requested={requested})")]
    CapacityExceeded { limit: u64, requested: u64 },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded { .. })
    }
}
