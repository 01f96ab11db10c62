//! Decision - タスクを実行するか、どの戦略で実行するか

use super::names::CanonicalName;

/// GuardOutcome は guard 評価の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    Skip(String),
}

/// DispatchDecision は実行戦略の選択
///
/// 1 回の実行で戦略はちょうど 1 つ。組み合わせることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchDecision {
    /// `import_path` に action handler がある
    PluginHandler { import_path: String },

    /// handler なし: execution channel 経由で generic unit として実行
    GenericUnit { unit_name: CanonicalName },
}

impl DispatchDecision {
    pub fn is_plugin(&self) -> bool {
        matches!(self, DispatchDecision::PluginHandler { .. })
    }
}
