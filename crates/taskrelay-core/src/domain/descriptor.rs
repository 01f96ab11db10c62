//! TaskDescriptor - 4 フィールドの task 表面と guard リスト

use serde_json::{Map, Value};

use super::errors::ValidationError;

pub const FIELD_NAME: &str = "name";
pub const FIELD_ARGS: &str = "args";
pub const FIELD_REGISTER: &str = "register";
pub const FIELD_WHEN: &str = "when";

/// task descriptor が持てるキーはこれだけ
pub const VALID_FIELDS: [&str; 4] = [FIELD_NAME, FIELD_ARGS, FIELD_REGISTER, FIELD_WHEN];

/// Guard は条件 1 つ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Literal(bool),
    Expr(String),
}

/// Guards は順序付きの guard リスト。すべて真である必要がある（左から短絡評価）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guards(Vec<Guard>);

impl Guards {
    pub fn new(guards: Vec<Guard>) -> Self {
        Self(guards)
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// スカラーでもリストでも受け付ける
    ///
    /// `null` と空文字列は「guard なし」。
    pub fn from_value(value: Option<&Value>) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) => Ok(Self::none()),
            Some(Value::Bool(b)) => Ok(Self(vec![Guard::Literal(*b)])),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Self::none()),
            Some(Value::String(s)) => Ok(Self(vec![Guard::Expr(s.clone())])),
            Some(Value::Array(items)) => items
                .iter()
                .map(guard_item)
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            Some(other) => Err(ValidationError::TypeMismatch {
                field: FIELD_WHEN,
                expected: "a boolean expression or a list of them",
                found: json_type_name(other),
            }),
        }
    }

    pub fn as_slice(&self) -> &[Guard] {
        &self.0
    }
}

fn guard_item(item: &Value) -> Result<Guard, ValidationError> {
    match item {
        Value::Bool(b) => Ok(Guard::Literal(*b)),
        // 空の条件は常に真
        Value::String(s) if s.trim().is_empty() => Ok(Guard::Literal(true)),
        Value::String(s) => Ok(Guard::Expr(s.clone())),
        other => Err(ValidationError::TypeMismatch {
            field: FIELD_WHEN,
            expected: "a boolean expression",
            found: json_type_name(other),
        }),
    }
}

/// TaskDescriptor は検証を通った descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescriptor {
    target_name: String,
    arguments: Map<String, Value>,
    output_binding: Option<String>,
}

impl TaskDescriptor {
    pub fn new(
        target_name: impl Into<String>,
        arguments: Map<String, Value>,
        output_binding: Option<String>,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            arguments,
            output_binding,
        }
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    pub fn into_arguments(self) -> Map<String, Value> {
        self.arguments
    }

    pub fn output_binding(&self) -> Option<&str> {
        self.output_binding.as_deref()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
