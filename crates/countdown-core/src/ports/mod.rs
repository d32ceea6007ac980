//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部の仕組み（保存先、時計、ID 生成）へのインターフェースで、
//! 実装の詳細は `impls` に置きます。

pub mod clock;
pub mod countdown_store;
pub mod id_generator;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::countdown_store::CountdownStore;
pub use self::id_generator::{IdGenerator, UlidGenerator};
