//! StaticConnection - 固定の capability を返す Connection（ローカル実行・テスト用）

use crate::domain::ImplementationKind;
use crate::ports::Connection;

#[derive(Debug, Clone)]
pub struct StaticConnection {
    preferences: Vec<ImplementationKind>,
    native_async: bool,
}

impl StaticConnection {
    pub fn new(preferences: Vec<ImplementationKind>, native_async: bool) -> Self {
        Self {
            preferences,
            native_async,
        }
    }
}

impl Default for StaticConnection {
    fn default() -> Self {
        Self::new(vec![ImplementationKind::module()], false)
    }
}

impl Connection for StaticConnection {
    fn module_implementation_preferences(&self) -> &[ImplementationKind] {
        &self.preferences
    }

    fn has_native_async(&self) -> bool {
        self.native_async
    }
}
