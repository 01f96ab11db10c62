//! Impls - ports の実装（開発用・テスト用）
//!
//! - **BuiltinRegistry / CollectionRegistry / LocatorChain**: PluginLocator
//! - **HandlerTable**: HandlerLoader
//! - **JinjaTemplates**: TemplateEngine (minijinja)
//! - **StaticConnection**: Connection
//! - **DryRunExecutor**: 報告だけする UnitExecutor

pub mod connection;
pub mod dry_run;
pub mod handler_table;
pub mod jinja;
pub mod registry;

pub use self::connection::StaticConnection;
pub use self::dry_run::DryRunExecutor;
pub use self::handler_table::HandlerTable;
pub use self::jinja::JinjaTemplates;
pub use self::registry::{BuiltinRegistry, CollectionRegistry, LocatorChain};
