//! RuntimeBuilder - collaborator のワイヤリング
//!
//! # 学習ポイント
//! - Builder パターン
//! - 起動時検証（Fail-fast 設計）

use std::sync::Arc;

use super::runtime::Runtime;
use crate::config::CoreConfig;
use crate::impls::{HandlerTable, JinjaTemplates};
use crate::ports::{Connection, HandlerLoader, PluginLocator, TemplateEngine, UnitExecutor};

/// RuntimeBuilder は Runtime を構築
///
/// # 使用例
/// ```ignore
/// let runtime = RuntimeBuilder::new()
///     .locator(Arc::new(registry))
///     .executor(Arc::new(DryRunExecutor::new()))
///     .connection(Arc::new(StaticConnection::default()))
///     .expect_targets(&["copy"])
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - locator / executor / connection が無ければ `build()` が失敗
/// - expect_targets() の名前が解決できなければ `build()` が失敗
///
/// templates の既定値は [`JinjaTemplates`]、loader の既定値は空の
/// [`HandlerTable`]（すべて generic unit として実行される）。
pub struct RuntimeBuilder {
    config: CoreConfig,
    locator: Option<Arc<dyn PluginLocator>>,
    loader: Option<Arc<dyn HandlerLoader>>,
    executor: Option<Arc<dyn UnitExecutor>>,
    templates: Option<Arc<dyn TemplateEngine>>,
    connection: Option<Arc<dyn Connection>>,
    expected_targets: Option<Vec<String>>,
}

/// BuildError は Runtime 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Unresolved targets: {0:?}. These targets were expected but do not resolve.")]
    UnresolvedTargets(Vec<String>),
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
            locator: None,
            loader: None,
            executor: None,
            templates: None,
            connection: None,
            expected_targets: None,
        }
    }

    pub fn config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn locator(mut self, locator: Arc<dyn PluginLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn HandlerLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn executor(mut self, executor: Arc<dyn UnitExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn templates(mut self, templates: Arc<dyn TemplateEngine>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.connection = Some(connection);
        self
    }

    /// 解決できなければならない名前のリストを設定
    ///
    /// collection scope は空で解決する。
    pub fn expect_targets(mut self, names: &[&str]) -> Self {
        self.expected_targets = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<Runtime, BuildError> {
        let runtime = Runtime {
            config: self.config,
            locator: self
                .locator
                .ok_or(BuildError::MissingCollaborator("locator"))?,
            loader: self
                .loader
                .unwrap_or_else(|| Arc::new(HandlerTable::new())),
            executor: self
                .executor
                .ok_or(BuildError::MissingCollaborator("executor"))?,
            templates: self
                .templates
                .unwrap_or_else(|| Arc::new(JinjaTemplates::new())),
            connection: self
                .connection
                .ok_or(BuildError::MissingCollaborator("connection"))?,
        };

        if let Some(expected) = &self.expected_targets {
            let unresolved: Vec<String> = expected
                .iter()
                .filter(|name| runtime.resolve(name, &[]).is_err())
                .cloned()
                .collect();
            if !unresolved.is_empty() {
                return Err(BuildError::UnresolvedTargets(unresolved));
            }
        }
        Ok(runtime)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImplementationKind;
    use crate::impls::{BuiltinRegistry, DryRunExecutor, StaticConnection};

    fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
            .locator(Arc::new(
                BuiltinRegistry::new("builtin").with_module(ImplementationKind::module(), "copy"),
            ))
            .executor(Arc::new(DryRunExecutor::new()))
            .connection(Arc::new(StaticConnection::default()))
    }

    #[test]
    fn test_build_success() {
        let runtime = builder().expect_targets(&["copy"]).build();
        assert!(runtime.is_ok());
    }

    #[test]
    fn test_build_unresolved_targets() {
        let runtime = builder().expect_targets(&["copy", "template"]).build();
        assert!(matches!(
            runtime,
            Err(BuildError::UnresolvedTargets(missing)) if missing == vec!["template".to_string()]
        ));
    }

    #[test]
    fn test_build_missing_collaborator() {
        let runtime = RuntimeBuilder::new()
            .executor(Arc::new(DryRunExecutor::new()))
            .connection(Arc::new(StaticConnection::default()))
            .build();
        assert!(matches!(
            runtime,
            Err(BuildError::MissingCollaborator("locator"))
        ));
    }

    #[test]
    fn test_build_keeps_config() {
        let config = CoreConfig {
            builtin_collection: "core".to_string(),
            ..CoreConfig::default()
        };
        let runtime = builder().config(config).build().unwrap();
        assert_eq!(runtime.config().builtin_collection, "core");
    }
}
