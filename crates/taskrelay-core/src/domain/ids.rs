//! Ids - 実行 ID
//!
//! ULID を使うのでログを時刻順に並べられる。1 回のタスク実行に 1 つ。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// InvocationId は 1 回のタスク実行の ID（Display は `inv-<ulid>`）
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InvocationId(Ulid);

impl InvocationId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inv-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_prefix() {
        let id = InvocationId::from_ulid(Ulid::nil());
        assert_eq!(id.to_string(), "inv-00000000000000000000000000");
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(InvocationId::new(), InvocationId::new());
    }
}
