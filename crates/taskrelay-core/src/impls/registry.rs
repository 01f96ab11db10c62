//! Registry - インメモリの PluginLocator 実装
//!
//! 同じインターフェースを満たす 2 つの locator：
//! - [`BuiltinRegistry`]: 予約 namespace の名前（`copy`, `builtin.copy`）
//! - [`CollectionRegistry`]: `namespace.collection.name` 形式の名前
//!
//! [`LocatorChain`] がそれらを順に問い合わせる。
//!
//! # 学習ポイント
//! - 同じ trait を満たす複数実装を `Arc<dyn Trait>` で束ねる
//! - redirect を可変ループではなく不変の hop 列として返す

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::config::RegistryManifest;
use crate::domain::names::is_qualified;
use crate::domain::{ImplementationKind, RedirectChain, ResolvedPlugin};
use crate::ports::PluginLocator;

/// 1 つの implementation kind の module と redirect
#[derive(Debug, Clone, Default)]
struct KindTable {
    modules: HashSet<String>,
    redirects: HashMap<String, String>,
}

impl KindTable {
    /// `start` から redirect をたどり、すべての hop を記録する
    fn follow<F>(&self, start: &str, resolve: F) -> RedirectChain
    where
        F: Fn(&str) -> Option<ResolvedPlugin>,
    {
        let mut hops = vec![start.to_string()];
        let mut current = start.to_string();
        loop {
            if let Some(next) = self.redirects.get(&current) {
                let looped = hops.contains(next);
                hops.push(next.clone());
                if looped {
                    debug!(start, hops = hops.len(), "redirect loop");
                    return RedirectChain::unresolved(hops);
                }
                current = next.clone();
                continue;
            }

            return match resolve(&current) {
                Some(plugin) => RedirectChain::resolved(hops, plugin),
                None if hops.len() == 1 => RedirectChain::empty(),
                None => RedirectChain::unresolved(hops),
            };
        }
    }
}

/// BuiltinRegistry は builtin namespace の module を管理
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    namespace: String,
    kinds: HashMap<ImplementationKind, KindTable>,
}

impl BuiltinRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            kinds: HashMap::new(),
        }
    }

    pub fn with_module(mut self, kind: ImplementationKind, name: &str) -> Self {
        self.register_module(kind, name);
        self
    }

    pub fn with_redirect(mut self, kind: ImplementationKind, from: &str, to: &str) -> Self {
        self.register_redirect(kind, from, to);
        self
    }

    pub fn register_module(&mut self, kind: ImplementationKind, name: &str) {
        let short = self.local_name(name).unwrap_or(name).to_string();
        self.kinds.entry(kind).or_default().modules.insert(short);
    }

    pub fn register_redirect(&mut self, kind: ImplementationKind, from: &str, to: &str) {
        let from = self.local_name(from).unwrap_or(from).to_string();
        let to = self.local_name(to).unwrap_or(to).to_string();
        self.kinds.entry(kind).or_default().redirects.insert(from, to);
    }

    /// `copy` も `<namespace>.copy` も `copy` になる
    ///
    /// それ以外のドット付きの名前は別の registry の担当。
    fn local_name<'n>(&self, name: &'n str) -> Option<&'n str> {
        match name.split_once('.') {
            None => Some(name),
            Some((ns, rest)) if ns == self.namespace && !rest.contains('.') => Some(rest),
            Some(_) => None,
        }
    }
}

impl PluginLocator for BuiltinRegistry {
    fn find_with_redirects(
        &self,
        name: &str,
        kind: &ImplementationKind,
        _search_scope: &[String],
    ) -> RedirectChain {
        let (Some(table), Some(short)) = (self.kinds.get(kind), self.local_name(name)) else {
            return RedirectChain::empty();
        };
        table.follow(short, |n| {
            table
                .modules
                .contains(n)
                .then(|| ResolvedPlugin::builtin(n))
        })
    }
}

/// CollectionRegistry は collection 配下の module を FQCN で管理
///
/// 短い名前は task の collections（search scope）の順に `<collection>.<name>`
/// として探す。
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    kinds: HashMap<ImplementationKind, KindTable>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, kind: ImplementationKind, collection: &str, name: &str) -> Self {
        self.register_module(kind, collection, name);
        self
    }

    pub fn with_redirect(mut self, kind: ImplementationKind, from: &str, to: &str) -> Self {
        self.register_redirect(kind, from, to);
        self
    }

    pub fn register_module(&mut self, kind: ImplementationKind, collection: &str, name: &str) {
        self.kinds
            .entry(kind)
            .or_default()
            .modules
            .insert(format!("{collection}.{name}"));
    }

    /// 両端とも FQCN
    pub fn register_redirect(&mut self, kind: ImplementationKind, from: &str, to: &str) {
        self.kinds
            .entry(kind)
            .or_default()
            .redirects
            .insert(from.to_string(), to.to_string());
    }
}

impl PluginLocator for CollectionRegistry {
    fn find_with_redirects(
        &self,
        name: &str,
        kind: &ImplementationKind,
        search_scope: &[String],
    ) -> RedirectChain {
        let Some(table) = self.kinds.get(kind) else {
            return RedirectChain::empty();
        };

        // 短い名前は search scope の順にコレクションを試す
        let candidates: Vec<String> = if is_qualified(name) {
            vec![name.to_string()]
        } else if name.contains('.') {
            Vec::new()
        } else {
            search_scope.iter().map(|c| format!("{c}.{name}")).collect()
        };

        for candidate in candidates {
            let chain = table.follow(&candidate, |n| {
                if !table.modules.contains(n) {
                    return None;
                }
                let (collection, _) = n.rsplit_once('.')?;
                Some(ResolvedPlugin::in_collection(collection, n))
            });
            if !chain.is_empty() {
                return chain;
            }
        }
        RedirectChain::empty()
    }
}

/// LocatorChain は複数の locator を順に問い合わせる
///
/// # 探索順
/// - 最初に空でない chain を返した locator が勝つ
/// - `from_manifest` では collection → builtin の順（task の collections が
///   暗黙の builtin より優先される）
///
/// # registry をまたぐ redirect
/// ある locator の chain が未解決のまま終わった場合、最後の hop を全 locator
/// で引き直して chain をつなげる。`ufw → community.general.ufw` のような
/// builtin → collection の移動も、その逆も同じ経路で解決される。
/// ループ判定は連結後の chain 全体に対して行う。
#[derive(Clone, Default)]
pub struct LocatorChain {
    locators: Vec<Arc<dyn PluginLocator>>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Arc<dyn PluginLocator>) -> Self {
        self.locators.push(locator);
        self
    }

    /// manifest のエントリを builtin と collection の registry に振り分ける
    pub fn from_manifest(manifest: &RegistryManifest, builtin_collection: &str) -> Self {
        let mut builtin = BuiltinRegistry::new(builtin_collection);
        let mut collections = CollectionRegistry::new();

        for module in &manifest.modules {
            match module.collection.as_deref() {
                Some(c) if c != builtin_collection => {
                    collections.register_module(module.kind.clone(), c, &module.name)
                }
                _ => builtin.register_module(module.kind.clone(), &module.name),
            }
        }
        for redirect in &manifest.redirects {
            if is_qualified(&redirect.from) {
                collections.register_redirect(redirect.kind.clone(), &redirect.from, &redirect.to);
            } else {
                builtin.register_redirect(redirect.kind.clone(), &redirect.from, &redirect.to);
            }
        }

        Self::new()
            .with(Arc::new(collections))
            .with(Arc::new(builtin))
    }

    fn first_match(
        &self,
        name: &str,
        kind: &ImplementationKind,
        search_scope: &[String],
    ) -> RedirectChain {
        self.locators
            .iter()
            .map(|l| l.find_with_redirects(name, kind, search_scope))
            .find(|chain| !chain.is_empty())
            .unwrap_or_default()
    }
}

impl PluginLocator for LocatorChain {
    fn find_with_redirects(
        &self,
        name: &str,
        kind: &ImplementationKind,
        search_scope: &[String],
    ) -> RedirectChain {
        let mut chain = self.first_match(name, kind, search_scope);
        while chain.is_broken() {
            let Some(last) = chain.last() else {
                break;
            };
            let next = self.first_match(last, kind, search_scope);
            if next.is_empty() {
                break;
            }
            if next.plugin().is_none() {
                let tail = next.hops().get(1..).unwrap_or_default();
                if tail.is_empty() || tail.iter().any(|hop| chain.hops().contains(hop)) {
                    debug!(name, hops = chain.len(), "redirect loop across registries");
                    break;
                }
            }
            chain = chain.join(next);
        }
        chain
    }
}
