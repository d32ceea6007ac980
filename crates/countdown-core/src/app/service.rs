//! CountdownService - 呼び出し側の検証 + store + engine のまとめ役
//!
//! 入力検証（空のタイトル、過去の日時など）はここで行い、store と engine には届けません。
//! store と engine は互いに依存せず、このサービスだけが両方を知っています。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::{
    CountType, Countdown, CountdownId, CountdownPatch, NewCountdown, StoreError, TimeRemaining,
    ValidationError, WorkingHours,
};
use crate::engine::compute_remaining;
use crate::ports::{Clock, CountdownStore};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("countdown {0} not found")]
    NotFound(CountdownId),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

/// Check a new countdown before it reaches the store.
pub fn validate_new(input: &NewCountdown, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if input.target_date <= now {
        return Err(ValidationError::TargetNotInFuture);
    }
    validate_fields(
        &input.title,
        &input.timezone,
        input.count_type,
        input.working_hours.as_ref(),
    )
}

fn validate_fields(
    title: &str,
    timezone: &str,
    count_type: CountType,
    working_hours: Option<&WorkingHours>,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if timezone.parse::<Tz>().is_err() {
        return Err(ValidationError::UnknownTimezone(timezone.to_string()));
    }
    match (count_type, working_hours) {
        (CountType::Working, None) => Err(ValidationError::MissingWorkingHours),
        (CountType::Natural, Some(_)) => Err(ValidationError::UnexpectedWorkingHours),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct CountdownService {
    store: Arc<dyn CountdownStore>,
    clock: Arc<dyn Clock>,
}

impl CountdownService {
    pub fn new(store: Arc<dyn CountdownStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub async fn create(&self, input: NewCountdown) -> Result<CountdownId, ServiceError> {
        validate_new(&input, self.clock.now())?;
        Ok(self.store.create(input).await?)
    }

    pub async fn get(&self, id: &CountdownId) -> Result<Countdown, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(*id))
    }

    /// Validate the merged record, then hand only the patch to the store.
    pub async fn update(
        &self,
        id: &CountdownId,
        patch: CountdownPatch,
    ) -> Result<(), ServiceError> {
        let mut merged = self.get(id).await?;

        if let Some(target) = patch.target_date
            && target <= self.clock.now()
        {
            return Err(ValidationError::TargetNotInFuture.into());
        }
        merged.apply(patch.clone());
        validate_fields(
            &merged.title,
            &merged.timezone,
            merged.count_type,
            merged.working_hours.as_ref(),
        )?;

        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete(&self, id: &CountdownId) -> Result<(), ServiceError> {
        Ok(self.store.delete(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Countdown>, ServiceError> {
        Ok(self.store.list_all().await?)
    }

    /// Fetch a countdown and compute its remaining time now.
    pub async fn remaining(
        &self,
        id: &CountdownId,
    ) -> Result<(Countdown, TimeRemaining), ServiceError> {
        let countdown = self.get(id).await?;
        let remaining = compute_remaining(self.clock.now(), &countdown);
        Ok((countdown, remaining))
    }
}
