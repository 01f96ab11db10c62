//! taskrelay-core - タスクランナーの名前解決・ディスパッチ層
//!
//! 1 つのタスクについて次を決める：
//! - そもそも実行するか（`when`）
//! - どの handler が対象を実装しているか（名前解決と redirect）
//! - どう呼び出すか（action handler / generic unit）
//! - 結果を呼び出し側の envelope と変数空間にどう戻すか（`register`）
//!
//! # モジュール構成
//! - **domain**: 値の型（descriptor, names, redirect chain, decision, envelope, errors）
//! - **ports**: 外部コラボレータの trait（PluginLocator, HandlerLoader, UnitExecutor, TemplateEngine, Connection）
//! - **app**: 各ステージと Runtime
//! - **impls**: ports のインメモリ実装
//! - **config**: CoreConfig と RegistryManifest

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{Runtime, RuntimeBuilder};
pub use config::{CoreConfig, RegistryManifest};
pub use domain::{CoreError, ResultEnvelope, TaskContext};
