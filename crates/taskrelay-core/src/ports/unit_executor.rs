//! UnitExecutor port - generic unit（module）の実行

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{CanonicalName, ExecutorError, TaskContext};

/// UnitExecutor は execution channel 経由で対象ホスト上の unit を実行
///
/// タイムアウトとキャンセルは channel の責務で、core は課さない。
#[async_trait]
pub trait UnitExecutor: Send + Sync {
    async fn run(
        &self,
        unit: &CanonicalName,
        args: &Map<String, Value>,
        task: &TaskContext,
        wrap_async: bool,
    ) -> Result<Map<String, Value>, ExecutorError>;
}
