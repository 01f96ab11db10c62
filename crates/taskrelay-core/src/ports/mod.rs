//! Ports - 外部コラボレータへのインターフェース
//!
//! core 自身はプラグインの探索もホストとの通信もテンプレート展開もしない。
//! それぞれの関心事をここの trait 1 つずつの裏に置き、`impls` に開発・テスト用の
//! インメモリ実装を置く。
//!
//! # 主要コンポーネント
//! - **PluginLocator**: 名前 → redirect chain
//! - **HandlerLoader / ActionHandler**: action handler のロードと実行
//! - **UnitExecutor**: generic unit の実行
//! - **TemplateEngine**: guard 式の評価とテンプレート展開
//! - **Connection**: channel の capability

pub mod connection;
pub mod handler;
pub mod plugin_locator;
pub mod templates;
pub mod unit_executor;

pub use self::connection::Connection;
pub use self::handler::{ActionHandler, ExecutionEnv, HandlerLoad, HandlerLoader};
pub use self::plugin_locator::PluginLocator;
pub use self::templates::TemplateEngine;
pub use self::unit_executor::UnitExecutor;
