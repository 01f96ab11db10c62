//! ResultEnvelope - 蓄積されるタスク結果
//!
//! `changed` / `skipped` / `skip_reason` / `facts` は core が管理する予約キー。
//! handler の結果は [`ResultEnvelope::update`]（shallow）か
//! [`ResultEnvelope::merge`]（recursive）で畳み込まれ、どちらでも予約キーは
//! handler から自由に書き換えられない。
//!
//! # 予約キーの規則
//! - `changed`: handler は立てられるが下ろせない
//! - `facts`: handler のキーはまだ無いときだけ追加
//! - `skipped` / `skip_reason`: handler の値は無視（skip を決めるのは guard だけ）

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

pub const KEY_CHANGED: &str = "changed";
pub const KEY_SKIPPED: &str = "skipped";
pub const KEY_SKIP_REASON: &str = "skip_reason";
pub const KEY_FACTS: &str = "facts";
pub const KEY_INVOCATION: &str = "invocation";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub changed: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub facts: Map<String, Value>,

    /// handler 固有のフィールド
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResultEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 素の mapping から envelope を作る（呼び出し側が用意した base result など）
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut envelope = Self::new();
        if let Some(skipped) = map.get(KEY_SKIPPED).and_then(Value::as_bool) {
            envelope.skipped = skipped;
        }
        if let Some(reason) = map.get(KEY_SKIP_REASON).and_then(Value::as_str) {
            envelope.skip_reason = Some(reason.to_string());
        }
        envelope.update(&map);
        envelope
    }

    pub fn skip(&mut self, reason: impl Into<String>) {
        self.changed = false;
        self.skipped = true;
        self.skip_reason = Some(reason.into());
    }

    /// shallow: トップレベルの値を handler の値で置き換える
    pub fn update(&mut self, result: &Map<String, Value>) {
        for (key, value) in result {
            if !self.absorb_reserved(key, value) {
                self.fields.insert(key.clone(), value.clone());
            }
        }
    }

    /// recursive: ネストした mapping はキーごとにマージし、葉の衝突は handler の値が勝つ
    pub fn merge(&mut self, result: &Map<String, Value>) {
        for (key, value) in result {
            if self.absorb_reserved(key, value) {
                continue;
            }
            match (self.fields.get_mut(key), value) {
                (Some(Value::Object(ours)), Value::Object(theirs)) => merge_maps(ours, theirs),
                _ => {
                    self.fields.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// `key` が予約キーで処理済みなら true
    fn absorb_reserved(&mut self, key: &str, value: &Value) -> bool {
        match key {
            KEY_CHANGED => {
                // handler は changed を立てられるが、下ろすことはできない
                if let Some(changed) = value.as_bool() {
                    self.changed |= changed;
                }
                true
            }
            KEY_FACTS => {
                if let Value::Object(facts) = value {
                    for (name, fact) in facts {
                        if !self.facts.contains_key(name) {
                            self.facts.insert(name.clone(), fact.clone());
                        }
                    }
                }
                true
            }
            KEY_SKIPPED | KEY_SKIP_REASON => {
                trace!(key, "ignoring handler-supplied bookkeeping key");
                true
            }
            _ => false,
        }
    }

    /// `invocation.<key>` を削除し、空になった `invocation` も消す
    pub fn strip_invocation_echo(&mut self, key: &str) {
        let now_empty = match self.fields.get_mut(KEY_INVOCATION) {
            Some(Value::Object(invocation)) => {
                invocation.remove(key);
                invocation.is_empty()
            }
            _ => false,
        };
        if now_empty {
            self.fields.remove(KEY_INVOCATION);
        }
    }

    /// facts を `{binding: value}` の 1 エントリだけにする
    pub fn publish_fact(&mut self, binding: &str, value: Value) {
        let mut facts = Map::new();
        facts.insert(binding.to_string(), value);
        self.facts = facts;
    }

    /// シリアライズ形式と同じ形の mapping
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(KEY_CHANGED.to_string(), Value::Bool(self.changed));
        if self.skipped {
            map.insert(KEY_SKIPPED.to_string(), Value::Bool(true));
        }
        if let Some(reason) = &self.skip_reason {
            map.insert(KEY_SKIP_REASON.to_string(), Value::String(reason.clone()));
        }
        if !self.facts.is_empty() {
            map.insert(KEY_FACTS.to_string(), Value::Object(self.facts.clone()));
        }
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

fn merge_maps(ours: &mut Map<String, Value>, theirs: &Map<String, Value>) {
    for (key, value) in theirs {
        match (ours.get_mut(key), value) {
            (Some(Value::Object(a)), Value::Object(b)) => merge_maps(a, b),
            _ => {
                ours.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn update_replaces_nested_values_wholesale() {
        let mut env = ResultEnvelope::from_map(map(json!({"stat": {"a": 1, "b": 2}})));
        env.update(&map(json!({"stat": {"b": 3}})));
        assert_eq!(env.fields["stat"], json!({"b": 3}));
    }

    #[test]
    fn merge_combines_nested_values() {
        let mut env = ResultEnvelope::from_map(map(json!({"stat": {"a": 1, "b": 2}})));
        env.merge(&map(json!({"stat": {"b": 3}, "rc": 0})));
        assert_eq!(env.fields["stat"], json!({"a": 1, "b": 3}));
        assert_eq!(env.fields["rc"], json!(0));
    }

    #[test]
    fn handler_cannot_touch_skip_bookkeeping() {
        let mut env = ResultEnvelope::new();
        env.merge(&map(json!({"skipped": true, "skip_reason": "nope", "msg": "hi"})));
        assert!(!env.skipped);
        assert!(env.skip_reason.is_none());
        assert_eq!(env.fields["msg"], json!("hi"));
    }

    #[test]
    fn changed_is_sticky() {
        let mut env = ResultEnvelope::new();
        env.update(&map(json!({"changed": true})));
        env.update(&map(json!({"changed": false})));
        assert!(env.changed);
    }

    #[test]
    fn handler_facts_do_not_overwrite_existing_ones() {
        let mut env = ResultEnvelope::new();
        env.facts.insert("os".to_string(), json!("linux"));
        env.merge(&map(json!({"facts": {"os": "bsd", "arch": "x86_64"}})));
        assert_eq!(env.facts["os"], json!("linux"));
        assert_eq!(env.facts["arch"], json!("x86_64"));
    }

    #[test]
    fn strip_invocation_echo_drops_empty_invocation() {
        let mut env = ResultEnvelope::from_map(map(json!({
            "invocation": {"plugin_args": {"password": "hunter2"}}
        })));
        env.strip_invocation_echo("plugin_args");
        assert!(!env.fields.contains_key("invocation"));
    }

    #[test]
    fn strip_invocation_echo_keeps_other_entries() {
        let mut env = ResultEnvelope::from_map(map(json!({
            "invocation": {"plugin_args": {}, "module_args": {"src": "/a"}}
        })));
        env.strip_invocation_echo("plugin_args");
        assert_eq!(env.fields["invocation"], json!({"module_args": {"src": "/a"}}));
    }

    #[test]
    fn publish_fact_replaces_all_facts() {
        let mut env = ResultEnvelope::new();
        env.facts.insert("stale".to_string(), json!(1));
        env.publish_fact("out", json!({"rc": 0}));
        assert_eq!(env.facts.len(), 1);
        assert_eq!(env.facts["out"], json!({"rc": 0}));
    }

    #[test]
    fn serialized_shape_matches_to_map() {
        let mut env = ResultEnvelope::new();
        env.skip("Conditional result was False");
        let serialized = serde_json::to_value(&env).unwrap();
        assert_eq!(serialized, Value::Object(env.to_map()));
    }
}
