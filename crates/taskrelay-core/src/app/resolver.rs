//! NameResolver - 要求された名前から canonical name への解決

use tracing::{debug, warn};

use crate::domain::{CanonicalName, ImplementationKind, ResolutionError, ResolvedPlugin};
use crate::ports::PluginLocator;

pub struct NameResolver<'a> {
    locator: &'a dyn PluginLocator,
    builtin_collection: &'a str,
}

impl<'a> NameResolver<'a> {
    pub fn new(locator: &'a dyn PluginLocator, builtin_collection: &'a str) -> Self {
        Self {
            locator,
            builtin_collection,
        }
    }

    /// 最初にマッチした implementation kind が勝つ
    ///
    /// # chain の扱い
    /// - 解決済み: canonical name に正規化して返す
    /// - 1 回以上 redirect して行き止まり: 即 [`ResolutionError::BrokenRedirect`]
    ///   （後続の kind は見ない）
    /// - 空: 次の kind へ
    pub fn resolve(
        &self,
        name: &str,
        preferences: &[ImplementationKind],
        search_scope: &[String],
    ) -> Result<CanonicalName, ResolutionError> {
        for kind in preferences {
            let chain = self.locator.find_with_redirects(name, kind, search_scope);

            if let Some(plugin) = chain.plugin() {
                let canonical = self.normalize(plugin);
                debug!(name, %kind, hops = chain.len(), %canonical, "resolved");
                return Ok(canonical);
            }

            if chain.is_broken() {
                let last = chain.last().unwrap_or(name).to_string();
                warn!(name, %kind, last = %last, "broken redirect");
                return Err(ResolutionError::BrokenRedirect {
                    original: name.to_string(),
                    last,
                });
            }
        }
        Err(ResolutionError::NotFound(name.to_string()))
    }

    fn normalize(&self, plugin: &ResolvedPlugin) -> CanonicalName {
        let name = plugin.resolved_name.as_str();
        let short = name.rsplit_once('.').map_or(name, |(_, short)| short);
        match plugin.collection.as_deref() {
            Some(collection) if !collection.is_empty() => CanonicalName::new(collection, short),
            _ => CanonicalName::new(self.builtin_collection, short),
        }
    }
}
