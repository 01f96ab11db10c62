//! Actions - manifest から登録できる CLI 組み込みの action handler

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use taskrelay_core::RegistryManifest;
use taskrelay_core::domain::{HandlerError, TaskContext};
use taskrelay_core::impls::HandlerTable;
use taskrelay_core::ports::{ActionHandler, ExecutionEnv};
use tracing::warn;

/// DebugAction は `msg`、または `var` で指定した変数の値を返す
pub struct DebugAction;

#[async_trait]
impl ActionHandler for DebugAction {
    async fn run(
        &self,
        task: &TaskContext,
        _env: ExecutionEnv<'_>,
    ) -> Result<Map<String, Value>, HandlerError> {
        let mut result = Map::new();
        result.insert("changed".to_string(), Value::Bool(false));

        match task.args().get("var").and_then(Value::as_str) {
            Some(var) => {
                let value = task
                    .vars()
                    .get(var)
                    .cloned()
                    .unwrap_or_else(|| Value::String("VARIABLE IS NOT DEFINED!".to_string()));
                result.insert(var.to_string(), value);
            }
            None => {
                let msg = task
                    .args()
                    .get("msg")
                    .cloned()
                    .unwrap_or_else(|| Value::String("Hello world!".to_string()));
                result.insert("msg".to_string(), msg);
            }
        }
        Ok(result)
    }
}

/// AssertAction は `that` の式がすべて真でなければ失敗する
///
/// 式の評価には ExecutionEnv の TemplateEngine を使う。
pub struct AssertAction;

#[async_trait]
impl ActionHandler for AssertAction {
    async fn run(
        &self,
        task: &TaskContext,
        env: ExecutionEnv<'_>,
    ) -> Result<Map<String, Value>, HandlerError> {
        let that: Vec<&str> = match task.args().get("that") {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => return Err(HandlerError::Failed("conditional required in \"that\" string".to_string())),
        };

        for expr in that {
            let holds = env
                .templates
                .evaluate(expr, task.vars())
                .map_err(|e| HandlerError::Failed(e.to_string()))?;
            if !holds {
                let msg = task
                    .args()
                    .get("fail_msg")
                    .and_then(Value::as_str)
                    .unwrap_or("Assertion failed");
                return Err(HandlerError::Failed(format!("{msg}: {expr}")));
            }
        }

        let mut result = Map::new();
        result.insert("changed".to_string(), Value::Bool(false));
        result.insert(
            "msg".to_string(),
            Value::String("All assertions passed".to_string()),
        );
        Ok(result)
    }
}

/// manifest の handler をすべて登録する
///
/// 未知の action は broken として登録する。ディスパッチすると generic unit に
/// フォールバックせず DispatchFatal になる。
pub fn handler_table(manifest: &RegistryManifest) -> HandlerTable {
    let mut table = HandlerTable::new();
    for entry in &manifest.handlers {
        match entry.action.as_str() {
            "debug" => table.register(&entry.import_path, Arc::new(DebugAction)),
            "assert" => table.register(&entry.import_path, Arc::new(AssertAction)),
            other => {
                warn!(import_path = %entry.import_path, action = other, "unknown action");
                table.register_broken(&entry.import_path, format!("unknown action '{other}'"));
            }
        }
    }
    table
}
