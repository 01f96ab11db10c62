//! Connection port - 現在の execution channel の capability

use crate::domain::ImplementationKind;

pub trait Connection: Send + Sync {
    /// 探索する implementation kind（優先度の高い順）
    fn module_implementation_preferences(&self) -> &[ImplementationKind];

    /// channel 自身が async 実行できるか
    fn has_native_async(&self) -> bool;
}
