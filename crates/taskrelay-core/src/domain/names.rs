//! Names - canonical name と implementation kind

use serde::{Deserialize, Serialize};
use std::fmt;

/// CanonicalName は redirect 解決済みの完全修飾名 `<collection>.<short>`
///
/// resolver が 1 回だけ作り、同じ実行の中で再解決はしない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalName {
    collection: String,
    short: String,
}

impl CanonicalName {
    pub fn new(collection: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            short: short.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// 最後のセグメント
    pub fn short_name(&self) -> &str {
        &self.short
    }

    pub fn is_in(&self, collection: &str) -> bool {
        self.collection == collection
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.short)
    }
}

/// ImplementationKind は優先順に探索される実行環境の種類（`network` → `module` など）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementationKind(String);

impl ImplementationKind {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// 汎用 module
    pub fn module() -> Self {
        Self::new("module")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ImplementationKind {
    fn default() -> Self {
        Self::module()
    }
}

impl fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `namespace.collection.name` 形式か（ドット 2 つ以上）
pub fn is_qualified(name: &str) -> bool {
    name.matches('.').count() >= 2
}
