//! TemplateEngine port - 読み取り専用の式評価

use serde_json::{Map, Value};

use crate::domain::TemplateError;

/// TemplateEngine は task 変数に対して guard 式を評価し、テンプレートを展開する
///
/// # 設計原則
/// - `&self` と借用した `vars` だけを受け取る
/// - 内部キャッシュは持ってよいが、呼び出し側から見える `vars` は変えられない
pub trait TemplateEngine: Send + Sync {
    fn evaluate(&self, expr: &str, vars: &Map<String, Value>) -> Result<bool, TemplateError>;

    fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String, TemplateError>;
}
