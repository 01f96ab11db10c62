//! Runtime - ステージをつないで 1 タスクを実行
//!
//! guard → validate → resolve → route → strategy → compose

use std::sync::Arc;

use tracing::{debug, instrument};

use super::composer::{ResultComposer, StrategyResult};
use super::guard::GuardEvaluator;
use super::invoker::PluginInvoker;
use super::resolver::NameResolver;
use super::router::{DispatchRouter, Route};
use super::unit::{UnitRunner, wrap_async};
use super::validator::ArgumentValidator;
use crate::config::CoreConfig;
use crate::domain::descriptor::FIELD_WHEN;
use crate::domain::{CanonicalName, CoreError, GuardOutcome, Guards, ResultEnvelope, TaskContext};
use crate::ports::{Connection, ExecutionEnv, HandlerLoader, PluginLocator, TemplateEngine, UnitExecutor};

/// Runtime は呼び出し 1 回につき 1 つの task descriptor を実行
///
/// # 設計原則
/// - タスクごとの状態は持たない（`TaskContext` 側にある）
/// - 別ホスト向けの並行呼び出しが共有するのは読み取り専用の collaborator だけ
/// - 各呼び出しは InvocationId 付きの tracing span の中で走る
pub struct Runtime {
    pub(crate) config: CoreConfig,
    pub(crate) locator: Arc<dyn PluginLocator>,
    pub(crate) loader: Arc<dyn HandlerLoader>,
    pub(crate) executor: Arc<dyn UnitExecutor>,
    pub(crate) templates: Arc<dyn TemplateEngine>,
    pub(crate) connection: Arc<dyn Connection>,
}

impl Runtime {
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub async fn execute(&self, task: &mut TaskContext) -> Result<ResultEnvelope, CoreError> {
        self.execute_with_base(ResultEnvelope::new(), task).await
    }

    /// 呼び出し側が用意した base envelope の上で実行する
    ///
    /// base がすでに skipped ならそのまま返す（guard も validation もしない）
    #[instrument(name = "task", skip_all, fields(invocation = %task.invocation_id()))]
    pub async fn execute_with_base(
        &self,
        mut base: ResultEnvelope,
        task: &mut TaskContext,
    ) -> Result<ResultEnvelope, CoreError> {
        if base.skipped {
            debug!("base envelope already skipped");
            return Ok(base);
        }

        let guards = Guards::from_value(task.args().get(FIELD_WHEN))?;
        let outcome = GuardEvaluator::new(self.templates.as_ref(), &self.config.skip_reason)
            .evaluate(&guards, task.vars())?;
        if let GuardOutcome::Skip(reason) = outcome {
            debug!(%reason, "skipped");
            base.skip(reason);
            return Ok(base);
        }

        let descriptor =
            ArgumentValidator::new(self.templates.as_ref()).validate(task.args(), task.vars())?;
        let canonical = self.resolve(descriptor.target_name(), task.collections())?;
        let route = self.route(&canonical)?;
        let wrap_async = wrap_async(task, self.connection.as_ref());

        let output_binding = descriptor.output_binding().map(str::to_string);
        let arguments = descriptor.into_arguments();

        let result = match route {
            Route::Plugin {
                import_path,
                handler,
            } => {
                let raw = PluginInvoker::new(self.env())
                    .invoke(&import_path, handler.as_ref(), arguments, task)
                    .await?;
                StrategyResult::Plugin(raw)
            }
            Route::Unit { unit_name } => {
                let raw = UnitRunner::new(self.executor.as_ref())
                    .execute(&unit_name, &arguments, task, wrap_async)
                    .await?;
                StrategyResult::Unit(raw)
            }
        };

        Ok(ResultComposer::new(&self.config.invocation_echo_key).compose(
            base,
            result,
            output_binding.as_deref(),
        ))
    }

    /// Connection の implementation kind の優先順で名前解決
    pub fn resolve(
        &self,
        name: &str,
        search_scope: &[String],
    ) -> Result<CanonicalName, CoreError> {
        let preferences = self.connection.module_implementation_preferences();
        Ok(NameResolver::new(self.locator.as_ref(), &self.config.builtin_collection)
            .resolve(name, preferences, search_scope)?)
    }

    pub fn route(&self, name: &CanonicalName) -> Result<Route, CoreError> {
        DispatchRouter::new(self.loader.as_ref(), &self.config).route(name)
    }

    fn env(&self) -> ExecutionEnv<'_> {
        ExecutionEnv {
            connection: self.connection.as_ref(),
            templates: self.templates.as_ref(),
            loader: self.loader.as_ref(),
            executor: self.executor.as_ref(),
        }
    }
}
