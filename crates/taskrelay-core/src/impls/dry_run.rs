//! DryRunExecutor - 実行せず、何が実行されるかだけを報告

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::{CanonicalName, ExecutorError, TaskContext};
use crate::ports::UnitExecutor;

#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor;

impl DryRunExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UnitExecutor for DryRunExecutor {
    async fn run(
        &self,
        unit: &CanonicalName,
        args: &Map<String, Value>,
        task: &TaskContext,
        wrap_async: bool,
    ) -> Result<Map<String, Value>, ExecutorError> {
        info!(%unit, invocation = %task.invocation_id(), wrap_async, "dry run");

        let mut result = Map::new();
        result.insert("changed".to_string(), Value::Bool(false));
        result.insert("msg".to_string(), Value::String(format!("dry run: {unit}")));
        let mut invocation = Map::new();
        invocation.insert("module_args".to_string(), Value::Object(args.clone()));
        result.insert("invocation".to_string(), Value::Object(invocation));
        if wrap_async {
            result.insert("async".to_string(), Value::Bool(true));
        }
        Ok(result)
    }
}
