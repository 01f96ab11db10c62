//! DispatchRouter - action handler か generic unit かの判定（両方はない）

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::CoreConfig;
use crate::domain::{CanonicalName, CoreError, DispatchDecision};
use crate::ports::{ActionHandler, HandlerLoad, HandlerLoader};

/// Route はロード済み handler 付きの [`DispatchDecision`]
///
/// handler のロードは 1 回だけ。
#[derive(Clone)]
pub enum Route {
    Plugin {
        import_path: String,
        handler: Arc<dyn ActionHandler>,
    },
    Unit {
        unit_name: CanonicalName,
    },
}

impl Route {
    pub fn decision(&self) -> DispatchDecision {
        match self {
            Route::Plugin { import_path, .. } => DispatchDecision::PluginHandler {
                import_path: import_path.clone(),
            },
            Route::Unit { unit_name } => DispatchDecision::GenericUnit {
                unit_name: unit_name.clone(),
            },
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.decision(), f)
    }
}

/// DispatchRouter は canonical name から実行戦略を選ぶ
///
/// # 判定順
/// 1. intrinsic primitive（include_tasks など）なら拒否
/// 2. handler をロード: Found → Plugin / Absent → Unit / Fatal → エラー
pub struct DispatchRouter<'a> {
    loader: &'a dyn HandlerLoader,
    config: &'a CoreConfig,
}

impl<'a> DispatchRouter<'a> {
    pub fn new(loader: &'a dyn HandlerLoader, config: &'a CoreConfig) -> Self {
        Self { loader, config }
    }

    /// `name` の handler が置かれるはずの import path
    ///
    /// - builtin: `<builtin_handler_prefix>.<short>`
    /// - collection: `<collection_handler_prefix>.<collection>.action.<short>`
    pub fn handler_path(&self, name: &CanonicalName) -> String {
        if name.is_in(&self.config.builtin_collection) {
            format!("{}.{}", self.config.builtin_handler_prefix, name.short_name())
        } else {
            format!(
                "{}.{}.action.{}",
                self.config.collection_handler_prefix,
                name.collection(),
                name.short_name()
            )
        }
    }

    pub fn route(&self, name: &CanonicalName) -> Result<Route, CoreError> {
        // include_tasks などはエンジン側の機能なので、handler の有無に関係なく拒否
        if self.config.is_intrinsic(name.short_name()) {
            return Err(CoreError::UnsupportedPrimitive(name.clone()));
        }

        let import_path = self.handler_path(name);
        let route = match self.loader.load(&import_path) {
            HandlerLoad::Found(handler) => Route::Plugin {
                import_path,
                handler,
            },
            HandlerLoad::Absent => Route::Unit {
                unit_name: name.clone(),
            },
            HandlerLoad::Fatal(reason) => {
                return Err(CoreError::DispatchFatal {
                    import_path,
                    reason,
                });
            }
        };
        debug!(%name, decision = ?route, "routed");
        Ok(route)
    }
}
