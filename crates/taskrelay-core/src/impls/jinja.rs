//! JinjaTemplates - minijinja による TemplateEngine

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde_json::{Map, Value};

use crate::domain::TemplateError;
use crate::ports::TemplateEngine;

/// JinjaTemplates は UndefinedBehavior::Strict で評価する
///
/// 未定義変数はエラーで、黙って false にはならない。
pub struct JinjaTemplates {
    env: Environment<'static>,
}

impl JinjaTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for JinjaTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// guard は `x == 1` とも `{{ x == 1 }}` とも書ける
fn strip_delimiters(expr: &str) -> &str {
    let trimmed = expr.trim();
    trimmed
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

impl TemplateEngine for JinjaTemplates {
    fn evaluate(&self, expr: &str, vars: &Map<String, Value>) -> Result<bool, TemplateError> {
        let source = strip_delimiters(expr);
        let invalid = |e: minijinja::Error| match e.kind() {
            ErrorKind::UndefinedError => TemplateError::Undefined(source.to_string()),
            _ => TemplateError::Invalid {
                expr: source.to_string(),
                message: e.to_string(),
            },
        };

        let compiled = self.env.compile_expression(source).map_err(invalid)?;
        let value = compiled.eval(vars).map_err(invalid)?;
        if value.is_undefined() {
            return Err(TemplateError::Undefined(source.to_string()));
        }
        Ok(value.is_true())
    }

    fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String, TemplateError> {
        self.env
            .render_str(template, vars)
            .map_err(|e| TemplateError::Invalid {
                expr: template.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn vars() -> Map<String, Value> {
        match json!({"os": "linux", "count": 3, "enabled": false}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[rstest]
    #[case::comparison("os == 'linux'", true)]
    #[case::wrapped("{{ count > 2 }}", true)]
    #[case::bare_var("enabled", false)]
    #[case::negation("not enabled", true)]
    #[case::defined_test("missing is defined", false)]
    fn evaluates_expressions(#[case] expr: &str, #[case] expected: bool) {
        let templates = JinjaTemplates::new();
        assert_eq!(templates.evaluate(expr, &vars()).unwrap(), expected);
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let templates = JinjaTemplates::new();
        let err = templates.evaluate("missing", &vars()).unwrap_err();
        assert_eq!(err, TemplateError::Undefined("missing".to_string()));
    }

    #[test]
    fn syntax_error_is_reported() {
        let templates = JinjaTemplates::new();
        let err = templates.evaluate("os ==", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::Invalid { .. }));
    }

    #[test]
    fn renders_strings() {
        let templates = JinjaTemplates::new();
        let out = templates.render("{{ os }}_result", &vars()).unwrap();
        assert_eq!(out, "linux_result");
    }
}
