//! App - ports を組み合わせたタスク実行のパイプライン
//!
//! # 主要コンポーネント
//! - **GuardEvaluator**: `when` の評価（短絡 AND）
//! - **ArgumentValidator**: `name` / `args` / `register` の型チェック
//! - **NameResolver**: 名前解決とリダイレクトの追跡
//! - **DispatchRouter**: action handler か generic unit かの判定
//! - **PluginInvoker / UnitRunner**: 2 つの実行戦略
//! - **ResultComposer**: 結果のマージと `register` の公開
//! - **Runtime / RuntimeBuilder**: 上記をつなぐ

pub mod builder;
pub mod composer;
pub mod guard;
pub mod invoker;
pub mod resolver;
pub mod router;
pub mod runtime;
pub mod unit;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use self::builder::{BuildError, RuntimeBuilder};
pub use self::composer::{ResultComposer, StrategyResult};
pub use self::guard::GuardEvaluator;
pub use self::invoker::PluginInvoker;
pub use self::resolver::NameResolver;
pub use self::router::{DispatchRouter, Route};
pub use self::runtime::Runtime;
pub use self::unit::UnitRunner;
pub use self::validator::{ArgumentValidator, is_identifier};
