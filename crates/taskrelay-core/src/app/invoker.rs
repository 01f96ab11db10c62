//! PluginInvoker - action handler を handler 自身の引数で実行
//!
//! # 学習ポイント
//! - Drop guard による後始末（RAII）
//! - `&mut` の借用を guard に閉じ込めて、await をまたいでも安全に戻す

use std::ops::Deref;

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{CoreError, TaskContext};
use crate::ports::{ActionHandler, ExecutionEnv};

/// ArgsScope は task の args を handler の引数と入れ替え、drop 時に戻す
///
/// 成功・エラー・panic・await 途中での future の drop のどれでも元に戻る。
struct ArgsScope<'t> {
    task: &'t mut TaskContext,
    saved: Option<Map<String, Value>>,
}

impl<'t> ArgsScope<'t> {
    fn enter(task: &'t mut TaskContext, args: Map<String, Value>) -> Self {
        let saved = std::mem::replace(&mut task.args, args);
        Self {
            task,
            saved: Some(saved),
        }
    }
}

impl Deref for ArgsScope<'_> {
    type Target = TaskContext;

    fn deref(&self) -> &TaskContext {
        self.task
    }
}

impl Drop for ArgsScope<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.task.args = saved;
        }
    }
}

pub struct PluginInvoker<'a> {
    env: ExecutionEnv<'a>,
}

impl<'a> PluginInvoker<'a> {
    pub fn new(env: ExecutionEnv<'a>) -> Self {
        Self { env }
    }

    /// handler の結果は加工せずに返す
    pub async fn invoke(
        &self,
        import_path: &str,
        handler: &dyn ActionHandler,
        args: Map<String, Value>,
        task: &mut TaskContext,
    ) -> Result<Map<String, Value>, CoreError> {
        debug!(import_path, "invoking handler");
        let scope = ArgsScope::enter(task, args);
        let result = handler.run(&scope, self.env).await;
        drop(scope);

        result.map_err(|source| CoreError::Handler {
            import_path: import_path.to_string(),
            source,
        })
    }
}
