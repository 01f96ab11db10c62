//! HandlerTable - import path をキーにしたインメモリ HandlerLoader

use std::collections::HashMap;
use std::sync::Arc;

use crate::ports::{ActionHandler, HandlerLoad, HandlerLoader};

#[derive(Clone)]
enum Entry {
    Handler(Arc<dyn ActionHandler>),
    /// 登録はあるが使えない（壊れた handler など）
    Broken(String),
}

/// HandlerTable は import path → handler の対応表
///
/// # 使用例
/// ```ignore
/// let table = HandlerTable::new()
///     .with_handler("builtin.action.debug", Arc::new(DebugAction));
/// ```
///
/// `register_broken` で「あるがロードできない」handler を表せる。
#[derive(Clone, Default)]
pub struct HandlerTable {
    entries: HashMap<String, Entry>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, import_path: &str, handler: Arc<dyn ActionHandler>) -> Self {
        self.register(import_path, handler);
        self
    }

    /// 同じ import path は後勝ち
    pub fn register(&mut self, import_path: &str, handler: Arc<dyn ActionHandler>) {
        self.entries
            .insert(import_path.to_string(), Entry::Handler(handler));
    }

    pub fn register_broken(&mut self, import_path: &str, reason: impl Into<String>) {
        self.entries
            .insert(import_path.to_string(), Entry::Broken(reason.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HandlerLoader for HandlerTable {
    fn load(&self, import_path: &str) -> HandlerLoad {
        match self.entries.get(import_path) {
            Some(Entry::Handler(handler)) => HandlerLoad::Found(Arc::clone(handler)),
            Some(Entry::Broken(reason)) => HandlerLoad::Fatal(reason.clone()),
            None => HandlerLoad::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HandlerError, TaskContext};
    use crate::ports::ExecutionEnv;
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    struct Noop;

    #[async_trait]
    impl ActionHandler for Noop {
        async fn run(
            &self,
            _task: &TaskContext,
            _env: ExecutionEnv<'_>,
        ) -> Result<Map<String, Value>, HandlerError> {
            Ok(Map::new())
        }
    }

    #[test]
    fn load_distinguishes_found_absent_and_fatal() {
        let mut table = HandlerTable::new().with_handler("builtin.action.debug", Arc::new(Noop));
        table.register_broken("builtin.action.bad", "syntax error");

        assert!(matches!(table.load("builtin.action.debug"), HandlerLoad::Found(_)));
        assert!(matches!(table.load("builtin.action.copy"), HandlerLoad::Absent));
        assert!(matches!(
            table.load("builtin.action.bad"),
            HandlerLoad::Fatal(reason) if reason == "syntax error"
        ));
        assert_eq!(table.len(), 2);
    }
}
