//! ArgumentValidator - `name` / `args` / `register` の型チェック
//!
//! 文字列と mapping の検査だけで、型変換はしない。

use serde_json::{Map, Value};

use crate::domain::descriptor::{FIELD_ARGS, FIELD_NAME, FIELD_REGISTER, json_type_name};
use crate::domain::{CoreError, TaskDescriptor, ValidationError};
use crate::ports::TemplateEngine;

pub struct ArgumentValidator<'a> {
    templates: &'a dyn TemplateEngine,
}

impl<'a> ArgumentValidator<'a> {
    pub fn new(templates: &'a dyn TemplateEngine) -> Self {
        Self { templates }
    }

    pub fn validate(
        &self,
        raw: &Map<String, Value>,
        vars: &Map<String, Value>,
    ) -> Result<TaskDescriptor, CoreError> {
        let target_name = target_name(raw.get(FIELD_NAME))?;
        let arguments = arguments(raw.get(FIELD_ARGS))?;
        let output_binding = match raw.get(FIELD_REGISTER) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                let rendered = self.templates.render(s, vars)?;
                if !is_identifier(&rendered) {
                    return Err(ValidationError::InvalidIdentifier(rendered).into());
                }
                Some(rendered)
            }
            Some(other) => {
                return Err(ValidationError::TypeMismatch {
                    field: FIELD_REGISTER,
                    expected: "a string",
                    found: json_type_name(other),
                }
                .into());
            }
        };

        Ok(TaskDescriptor::new(target_name, arguments, output_binding))
    }
}

fn target_name(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingTarget),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::MissingTarget),
        Some(Value::Array(a)) if a.is_empty() => Err(ValidationError::MissingTarget),
        Some(Value::Object(o)) if o.is_empty() => Err(ValidationError::MissingTarget),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationError::TypeMismatch {
            field: FIELD_NAME,
            expected: "a string",
            found: json_type_name(other),
        }),
    }
}

fn arguments(value: Option<&Value>) -> Result<Map<String, Value>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(args)) => Ok(args.clone()),
        Some(other) => Err(ValidationError::TypeMismatch {
            field: FIELD_ARGS,
            expected: "a mapping",
            found: json_type_name(other),
        }),
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{CountingTemplates, obj};
    use crate::impls::JinjaTemplates;
    use rstest::rstest;
    use serde_json::json;

    fn validate(raw: Value) -> Result<TaskDescriptor, CoreError> {
        let templates = CountingTemplates::default();
        ArgumentValidator::new(&templates).validate(&obj(raw), &Map::new())
    }

    #[rstest]
    #[case::plain("copy_out", true)]
    #[case::underscore("_x1", true)]
    #[case::leading_digit("1abc", false)]
    #[case::dash("a-b", false)]
    #[case::dotted("a.b", false)]
    #[case::empty("", false)]
    #[case::non_ascii("résultat", false)]
    fn identifier_grammar(#[case] s: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(s), expected);
    }

    #[test]
    fn accepts_full_descriptor() {
        let d = validate(json!({
            "name": "copy",
            "args": {"src": "/a", "dest": "/b"},
            "register": "copy_out",
        }))
        .unwrap();
        assert_eq!(d.target_name(), "copy");
        assert_eq!(d.arguments()["dest"], json!("/b"));
        assert_eq!(d.output_binding(), Some("copy_out"));
    }

    #[test]
    fn args_and_register_are_optional() {
        let d = validate(json!({"name": "ping", "args": null})).unwrap();
        assert!(d.arguments().is_empty());
        assert_eq!(d.output_binding(), None);
    }

    #[rstest]
    #[case::absent(json!({}))]
    #[case::null(json!({"name": null}))]
    #[case::empty(json!({"name": ""}))]
    #[case::empty_list(json!({"name": []}))]
    fn missing_target(#[case] raw: Value) {
        let err = validate(raw).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingTarget)
        ));
    }

    #[rstest]
    #[case::name_mapping(json!({"name": {"a": 1}}), "name")]
    #[case::name_list(json!({"name": ["copy"]}), "name")]
    #[case::args_list(json!({"name": "copy", "args": ["a"]}), "args")]
    #[case::args_string(json!({"name": "copy", "args": "src=/a"}), "args")]
    #[case::register_number(json!({"name": "copy", "register": 3}), "register")]
    fn type_mismatch(#[case] raw: Value, #[case] field: &str) {
        match validate(raw).unwrap_err() {
            CoreError::Validation(ValidationError::TypeMismatch { field: f, .. }) => {
                assert_eq!(f, field)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_register_name() {
        let err = validate(json!({"name": "copy", "register": "not-valid"})).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidIdentifier(name)) if name == "not-valid"
        ));
    }

    #[test]
    fn register_is_templated_before_the_check() {
        let templates = JinjaTemplates::new();
        let raw = obj(json!({"name": "copy", "register": "{{ prefix }}_out"}));
        let vars = obj(json!({"prefix": "copy"}));

        let d = ArgumentValidator::new(&templates)
            .validate(&raw, &vars)
            .unwrap();
        assert_eq!(d.output_binding(), Some("copy_out"));
    }
}
