//! Errors - エラー型と分類
//!
//! ここのエラーはすべてタスク 1 回分の実行を中断する。
//! core はその場で回復もリトライもしない。次にどうするかは呼び出し側のエンジンが決める。

use thiserror::Error;

use super::names::CanonicalName;

/// ErrorKind は実行エラーの分類
///
/// CLI は kind ごとに別の exit code を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// task descriptor 自体が不正
    Validation,
    /// 対象が存在しない、または redirect chain が壊れている
    Resolution,
    /// エンジン側の制御構文が指定された
    Unsupported,
    /// handler はあるがロードできない
    Dispatch,
    /// guard 式・テンプレートの評価に失敗
    Evaluation,
    /// 選ばれた戦略が実行されて失敗
    Execution,
}

/// ValidationError は descriptor のフィールド不正（メッセージには必ずフィールド名が入る）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    MissingTarget,

    #[error("Invalid value given for '{field}': expected {expected}, got {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "The variable name '{0}' is not valid. Variables must start with a letter or \
         underscore character, and contain only letters, numbers and underscores."
    )]
    InvalidIdentifier(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("The module {0} was not found in configured module paths")]
    NotFound(String),

    #[error("The module {original} was redirected to {last}, which could not be loaded.")]
    BrokenRedirect { original: String, last: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("'{0}' is undefined")]
    Undefined(String),

    #[error("failed to evaluate `{expr}`: {message}")]
    Invalid { expr: String, message: String },
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("unit {unit} failed: {message}")]
    Failed { unit: String, message: String },

    #[error("execution channel error: {0}")]
    Channel(String),
}

/// HandlerError は action handler が実行中に報告する失敗
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// CoreError はタスク 1 回分の実行を中断するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(
        "{0} is a core feature of the task engine and is not implemented as a regular \
         module. It cannot be dispatched through this runner."
    )]
    UnsupportedPrimitive(CanonicalName),

    #[error("handler {import_path} exists but failed to load: {reason}")]
    DispatchFatal { import_path: String, reason: String },

    #[error("template evaluation failed: {0}")]
    Template(#[from] TemplateError),

    #[error("handler {import_path} failed: {source}")]
    Handler {
        import_path: String,
        #[source]
        source: HandlerError,
    },

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Resolution(_) => ErrorKind::Resolution,
            CoreError::UnsupportedPrimitive(_) => ErrorKind::Unsupported,
            CoreError::DispatchFatal { .. } => ErrorKind::Dispatch,
            CoreError::Template(_) => ErrorKind::Evaluation,
            CoreError::Handler { .. } | CoreError::Executor(_) => ErrorKind::Execution,
        }
    }
}
