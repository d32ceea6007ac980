//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryCountdownStore**: 揮発性（開発・テスト用）
//! - **JsonFileCountdownStore**: JSON ファイルによる永続化
//!
//! リモート KV などの実装は `CountdownStore` を実装すれば差し替えられます。

pub mod inmem_store;
pub mod json_file_store;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryCountdownStore;
pub use self::json_file_store::JsonFileCountdownStore;
