//! App - アプリケーション層
//!
//! ports と engine を組み合わせて、表示側から使う操作を提供します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: 設定からのワイヤリング（store の選択）
//! - **CountdownService**: 入力検証 + CRUD + 残り時間
//! - **Ticker**: 一定周期で残り時間を再計算して publish

pub mod builder;
pub mod service;
pub mod ticker;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::service::{CountdownService, ServiceError, validate_new};
pub use self::ticker::Ticker;
