//! PluginLocator port - redirect をたどる名前探索

use crate::domain::{ImplementationKind, RedirectChain};

/// PluginLocator は 1 つの implementation kind に限定してプラグインを探す
///
/// # 設計原則
/// - redirect chain 全体を 1 回の呼び出しで返す
/// - 呼び出し側が見るのは chain の長さと終端の状態だけ
/// - 実装はキャッシュしてよいが、呼び出し側はそれを前提にしない
pub trait PluginLocator: Send + Sync {
    fn find_with_redirects(
        &self,
        name: &str,
        kind: &ImplementationKind,
        search_scope: &[String],
    ) -> RedirectChain;
}
