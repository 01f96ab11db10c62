//! Handler port - action handler のロードと実行

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Connection, TemplateEngine, UnitExecutor};
use crate::domain::{HandlerError, TaskContext};

/// ExecutionEnv は handler に渡す実行コンテキスト（core が受け取った collaborator そのもの）
#[derive(Clone, Copy)]
pub struct ExecutionEnv<'a> {
    pub connection: &'a dyn Connection,
    pub templates: &'a dyn TemplateEngine,
    pub loader: &'a dyn HandlerLoader,
    pub executor: &'a dyn UnitExecutor,
}

/// ActionHandler は自己完結した handler（action plugin）
///
/// `run` の間、`task.args()` は handler 自身の引数になっている。
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn run(
        &self,
        task: &TaskContext,
        env: ExecutionEnv<'_>,
    ) -> Result<Map<String, Value>, HandlerError>;
}

/// HandlerLoad はロード結果の 3 値
///
/// `Absent` と `Fatal` は区別する。generic unit にフォールバックするのは
/// `Absent` だけ。
#[derive(Clone)]
pub enum HandlerLoad {
    Found(Arc<dyn ActionHandler>),
    Absent,
    Fatal(String),
}

impl fmt::Debug for HandlerLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerLoad::Found(_) => f.write_str("Found(..)"),
            HandlerLoad::Absent => f.write_str("Absent"),
            HandlerLoad::Fatal(reason) => f.debug_tuple("Fatal").field(reason).finish(),
        }
    }
}

pub trait HandlerLoader: Send + Sync {
    fn load(&self, import_path: &str) -> HandlerLoad;
}
