//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! - 設定から store の実装を選ぶ（memory / file）
//! - 起動時検証（Fail-fast 設計）：設定が不正なら build() でエラー
//! - テストでは clock や store を差し込める

use std::sync::Arc;

use crate::app::{CountdownService, Ticker};
use crate::config::{ConfigError, CountdownConfig, StoreBackend};
use crate::impls::{InMemoryCountdownStore, JsonFileCountdownStore};
use crate::ports::{Clock, CountdownStore, SystemClock};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .with_config(CountdownConfig::load(path)?)
///     .build()?;
/// let id = app.service().create(input).await?;
/// ```
pub struct AppBuilder {
    config: CountdownConfig,
    clock: Option<Arc<dyn Clock>>,
    store: Option<Arc<dyn CountdownStore>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: CountdownConfig::default(),
            clock: None,
            store: None,
        }
    }

    pub fn with_config(mut self, config: CountdownConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use this store instead of the configured backend.
    pub fn with_store(mut self, store: Arc<dyn CountdownStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let store = match self.store {
            Some(store) => store,
            None => build_store(&self.config, clock.clone())?,
        };

        Ok(App {
            service: CountdownService::new(store, clock.clone()),
            ticker: Ticker::new(clock, self.config.tick()),
            config: self.config,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_store(
    config: &CountdownConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn CountdownStore>, ConfigError> {
    let store = &config.store;
    match store.backend {
        StoreBackend::Memory => {
            let mut memory = InMemoryCountdownStore::with_clock(clock);
            if let Some(max_records) = store.max_records {
                memory = memory.with_max_records(max_records);
            }
            tracing::debug!("using in-memory countdown store");
            Ok(Arc::new(memory))
        }
        StoreBackend::File => {
            let path = store
                .path
                .clone()
                .ok_or_else(|| ConfigError::Invalid("file store requires store.path".into()))?;
            tracing::debug!(path = %path.display(), "using JSON file countdown store");
            let mut file = JsonFileCountdownStore::with_clock(path, clock);
            if let Some(max_bytes) = store.max_bytes {
                file = file.with_max_bytes(max_bytes);
            }
            Ok(Arc::new(file))
        }
    }
}

/// App は組み立て済みのサービス一式
pub struct App {
    service: CountdownService,
    ticker: Ticker,
    config: CountdownConfig,
}

impl App {
    pub fn service(&self) -> &CountdownService {
        &self.service
    }

    pub fn ticker(&self) -> Ticker {
        self.ticker.clone()
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }
}
