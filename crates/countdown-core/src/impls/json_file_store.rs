//! JsonFileCountdownStore - JSON ファイル 1 つに全件を保存する永続ストア
//!
//! # 実装詳細
//! - ファイル全体を `{"version": 1, "countdowns": [...]}` として読み書き
//! - 書き込みは一時ファイル（`<path>.tmp`）→ fsync → rename でアトミックに置き換える
//! - ファイルが無ければ空のストア。空ファイルは破損として扱う
//! - 任意でファイルサイズの上限（`max_bytes`）を設定でき、超えると `CapacityExceeded`
//! - 同一プロセス内の read-modify-write は Mutex で直列化する

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::{Countdown, CountdownId, CountdownPatch, NewCountdown, StoreError};
use crate::ports::countdown_store::sort_newest_first;
use crate::ports::{Clock, CountdownStore, IdGenerator, SystemClock, UlidGenerator};

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    countdowns: Vec<Countdown>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            countdowns: Vec::new(),
        }
    }
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// `countdowns.json` -> `countdowns.json.tmp`
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

pub struct JsonFileCountdownStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    max_bytes: Option<u64>,
}

impl JsonFileCountdownStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            ids: Arc::new(UlidGenerator::new(clock.clone())),
            clock,
            max_bytes: None,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Document::default());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        // only a missing file means "no countdowns yet"
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(StoreError::Backend(format!(
                "countdown file {} is empty",
                self.path.display()
            )));
        }

        let document: Document = serde_json::from_slice(&bytes)?;
        if document.version != DOCUMENT_VERSION {
            return Err(StoreError::Backend(format!(
                "unsupported document version {} in {}",
                document.version,
                self.path.display()
            )));
        }
        Ok(document)
    }

    async fn save(&self, document: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(document)?;

        if let Some(limit) = self.max_bytes
            && json.len() as u64 > limit
        {
            tracing::warn!(
                path = %self.path.display(),
                limit,
                requested = json.len(),
                "countdown file would exceed its size limit"
            );
            return Err(StoreError::CapacityExceeded {
                limit,
                requested: json.len() as u64,
            });
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = tmp_path(&self.path);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CountdownStore for JsonFileCountdownStore {
    async fn create(&self, input: NewCountdown) -> Result<CountdownId, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let id = self.ids.generate_countdown_id();
        document
            .countdowns
            .push(input.into_countdown(id, self.clock.now()));
        self.save(&document).await?;

        tracing::info!(%id, path = %self.path.display(), "countdown created");
        Ok(id)
    }

    async fn get(&self, id: &CountdownId) -> Result<Option<Countdown>, StoreError> {
        let document = self.load().await?;
        Ok(document.countdowns.into_iter().find(|c| c.id == *id))
    }

    async fn update(&self, id: &CountdownId, patch: CountdownPatch) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let Some(record) = document.countdowns.iter_mut().find(|c| c.id == *id) else {
            return Err(StoreError::NotFound(*id));
        };
        record.apply(patch);
        record.touch(self.clock.now());
        self.save(&document).await?;

        tracing::info!(%id, "countdown updated");
        Ok(())
    }

    async fn delete(&self, id: &CountdownId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let before = document.countdowns.len();
        document.countdowns.retain(|c| c.id != *id);
        if document.countdowns.len() == before {
            return Ok(());
        }
        self.save(&document).await?;

        tracing::info!(%id, "countdown deleted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Countdown>, StoreError> {
        let mut all = self.load().await?.countdowns;
        sort_newest_first(&mut all);
        Ok(all)
    }
}
