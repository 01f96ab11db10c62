//! テスト用の共有 test double

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{CanonicalName, ExecutorError, HandlerError, TaskContext, TemplateError};
use crate::ports::{ActionHandler, ExecutionEnv, TemplateEngine, UnitExecutor};

pub(crate) fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// `true` / `false` だけ理解し、それ以外は undefined。評価した式を記録する
#[derive(Default)]
pub(crate) struct CountingTemplates {
    pub evaluated: Mutex<Vec<String>>,
}

impl CountingTemplates {
    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.lock().unwrap().clone()
    }
}

impl TemplateEngine for CountingTemplates {
    fn evaluate(&self, expr: &str, _vars: &Map<String, Value>) -> Result<bool, TemplateError> {
        self.evaluated.lock().unwrap().push(expr.to_string());
        match expr {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(TemplateError::Undefined(other.to_string())),
        }
    }

    fn render(&self, template: &str, _vars: &Map<String, Value>) -> Result<String, TemplateError> {
        Ok(template.to_string())
    }
}

/// 固定の結果を返し、実行を頼まれた unit を記録する
pub(crate) struct RecordingExecutor {
    pub result: Map<String, Value>,
    pub calls: Mutex<Vec<(String, Map<String, Value>, bool)>>,
}

impl RecordingExecutor {
    pub fn returning(result: Value) -> Self {
        Self {
            result: obj(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Map<String, Value>, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UnitExecutor for RecordingExecutor {
    async fn run(
        &self,
        unit: &CanonicalName,
        args: &Map<String, Value>,
        _task: &TaskContext,
        wrap_async: bool,
    ) -> Result<Map<String, Value>, ExecutorError> {
        self.calls
            .lock()
            .unwrap()
            .push((unit.to_string(), args.clone(), wrap_async));
        Ok(self.result.clone())
    }
}

/// 固定の結果を返し、見えた引数を記録する
pub(crate) struct EchoHandler {
    pub result: Map<String, Value>,
    pub seen_args: Mutex<Option<Map<String, Value>>>,
}

impl EchoHandler {
    pub fn returning(result: Value) -> Self {
        Self {
            result: obj(result),
            seen_args: Mutex::new(None),
        }
    }

    pub fn seen_args(&self) -> Option<Map<String, Value>> {
        self.seen_args.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionHandler for EchoHandler {
    async fn run(
        &self,
        task: &TaskContext,
        _env: ExecutionEnv<'_>,
    ) -> Result<Map<String, Value>, HandlerError> {
        *self.seen_args.lock().unwrap() = Some(task.args().clone());
        Ok(self.result.clone())
    }
}
