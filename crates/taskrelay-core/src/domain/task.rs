//! TaskContext - タスク 1 回分の入力

use serde_json::{Map, Value};

use super::ids::InvocationId;

/// TaskContext は呼び出し側のエンジンが core に渡す実行 1 回分の状態
///
/// # フィールド
/// - args: 生の descriptor（`name` / `args` / `register` / `when`）。
///   action handler の実行中だけ handler 自身の引数に入れ替わる（`app::invoker`）
/// - vars: guard とテンプレートが参照する変数
/// - collections: 短い名前の search scope
/// - async_seconds: 0 なら同期実行
#[derive(Debug, Clone)]
pub struct TaskContext {
    invocation_id: InvocationId,
    pub(crate) args: Map<String, Value>,
    vars: Map<String, Value>,
    collections: Vec<String>,
    async_seconds: u64,
}

impl TaskContext {
    pub fn new(args: Map<String, Value>) -> Self {
        Self {
            invocation_id: InvocationId::new(),
            args,
            vars: Map::new(),
            collections: Vec::new(),
            async_seconds: 0,
        }
    }

    pub fn with_vars(mut self, vars: Map<String, Value>) -> Self {
        self.vars = vars;
        self
    }

    /// 短い名前の collection search scope
    pub fn with_collections(mut self, collections: Vec<String>) -> Self {
        self.collections = collections;
        self
    }

    pub fn with_async(mut self, seconds: u64) -> Self {
        self.async_seconds = seconds;
        self
    }

    pub fn invocation_id(&self) -> InvocationId {
        self.invocation_id
    }

    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    pub fn vars(&self) -> &Map<String, Value> {
        &self.vars
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn async_seconds(&self) -> u64 {
        self.async_seconds
    }
}
