//! Redirect - 1 回のプラグイン探索が返す redirect chain

/// ResolvedPlugin は探索が最終的にたどり着いた先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlugin {
    /// builtin なら `None`
    pub collection: Option<String>,
    /// ドット区切りの名前。意味があるのは最後のセグメントだけ
    pub resolved_name: String,
}

impl ResolvedPlugin {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            collection: None,
            resolved_name: name.into(),
        }
    }

    pub fn in_collection(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            resolved_name: name.into(),
        }
    }
}

/// RedirectChain は不変の hop 列
///
/// 先頭の hop は探索した名前、以降の hop はそれぞれ 1 回の redirect 先。
///
/// # 状態
/// - 空: 何もマッチしなかった
/// - `resolved` あり: 最後の hop が実在するプラグイン
/// - `resolved` なしで hop が 2 つ以上: 壊れた redirect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectChain {
    hops: Vec<String>,
    resolved: Option<ResolvedPlugin>,
}

impl RedirectChain {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn resolved(hops: Vec<String>, plugin: ResolvedPlugin) -> Self {
        Self {
            hops,
            resolved: Some(plugin),
        }
    }

    pub fn unresolved(hops: Vec<String>) -> Self {
        Self {
            hops,
            resolved: None,
        }
    }

    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn plugin(&self) -> Option<&ResolvedPlugin> {
        self.resolved.as_ref()
    }

    pub fn last(&self) -> Option<&str> {
        self.hops.last().map(String::as_str)
    }

    /// 1 回以上 redirect したのに行き止まり
    pub fn is_broken(&self) -> bool {
        self.resolved.is_none() && self.hops.len() > 1
    }

    /// `next` の先頭は `self` の最後の hop と同じ名前とみなし、重複させずに連結する
    pub fn join(mut self, next: RedirectChain) -> Self {
        self.hops.extend(next.hops.into_iter().skip(1));
        self.resolved = next.resolved;
        self
    }
}
