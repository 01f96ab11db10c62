//! UnitRunner - execution channel 経由で generic unit を実行

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{CanonicalName, ExecutorError, TaskContext};
use crate::ports::{Connection, UnitExecutor};

/// task が async 実行を求め、channel がネイティブに対応していないときだけ wrap する
pub fn wrap_async(task: &TaskContext, connection: &dyn Connection) -> bool {
    task.async_seconds() > 0 && !connection.has_native_async()
}

pub struct UnitRunner<'a> {
    executor: &'a dyn UnitExecutor,
}

impl<'a> UnitRunner<'a> {
    pub fn new(executor: &'a dyn UnitExecutor) -> Self {
        Self { executor }
    }

    pub async fn execute(
        &self,
        unit: &CanonicalName,
        args: &Map<String, Value>,
        task: &TaskContext,
        wrap_async: bool,
    ) -> Result<Map<String, Value>, ExecutorError> {
        debug!(%unit, wrap_async, "running generic unit");
        self.executor.run(unit, args, task, wrap_async).await
    }
}
