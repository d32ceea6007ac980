//! countdown-core
//!
//! Core building blocks for shareable countdown timers.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, countdown, time_remaining, errors）
//! - **engine**: 残り時間の計算（natural / working）。純粋関数のみ
//! - **ports**: 抽象化レイヤー（CountdownStore, Clock, IdGenerator）
//! - **impls**: ports の実装（InMemoryCountdownStore, JsonFileCountdownStore）
//! - **app**: アプリケーション層（AppBuilder, CountdownService, Ticker）
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod impls;
pub mod ports;

pub use engine::compute_remaining;
