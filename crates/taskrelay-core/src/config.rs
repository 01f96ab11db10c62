//! Config - 命名規則の設定と registry manifest（TOML）

use serde::Deserialize;
use thiserror::Error;

use crate::domain::ImplementationKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// CoreConfig は resolver / router / composer が使う命名規則
///
/// すべてのキーに既定値があり、TOML では上書きしたいキーだけ書けばよい。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// builtin 用に予約された collection 名
    pub builtin_collection: String,

    /// builtin handler の import path: `<builtin_handler_prefix>.<short>`
    pub builtin_handler_prefix: String,

    /// collection handler の import path: `<prefix>.<collection>.action.<short>`
    pub collection_handler_prefix: String,

    /// エンジン側の制御構文。ディスパッチ対象にはならない
    pub intrinsic_primitives: Vec<String>,

    /// base envelope の `invocation` から削除するキー
    pub invocation_echo_key: String,

    pub skip_reason: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            builtin_collection: "builtin".to_string(),
            builtin_handler_prefix: "builtin.action".to_string(),
            collection_handler_prefix: "collections".to_string(),
            intrinsic_primitives: [
                "block",
                "import_playbook",
                "import_role",
                "import_tasks",
                "include_role",
                "include_tasks",
                "meta",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            invocation_echo_key: "plugin_args".to_string(),
            skip_reason: "Conditional result was False".to_string(),
        }
    }
}

impl CoreConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(s)?;
        if config.builtin_collection.is_empty() {
            return Err(ConfigError::Invalid(
                "builtin_collection must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn is_intrinsic(&self, short_name: &str) -> bool {
        self.intrinsic_primitives.iter().any(|p| p == short_name)
    }
}

/// RegistryManifest はインメモリ registry の定義（CLI が読み込む）
///
/// # 使用例
///
/// ```toml
/// [[module]]
/// name = "copy"
///
/// [[module]]
/// collection = "acme.net"
/// name = "vlan"
/// kind = "network"
///
/// [[redirect]]
/// from = "acme.legacy.vlan"
/// to = "acme.net.vlan"
/// kind = "network"
///
/// [[handler]]
/// import_path = "builtin.action.debug"
/// action = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryManifest {
    #[serde(rename = "module")]
    pub modules: Vec<ModuleEntry>,

    #[serde(rename = "redirect")]
    pub redirects: Vec<RedirectEntry>,

    #[serde(rename = "handler")]
    pub handlers: Vec<HandlerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
    pub name: String,
    /// builtin module なら省略
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub kind: ImplementationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedirectEntry {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: ImplementationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerEntry {
    pub import_path: String,
    /// ホスト側プログラムが組み立て方を知っている action の名前
    pub action: String,
}

impl RegistryManifest {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.is_intrinsic("include_tasks"));
        assert!(!config.is_intrinsic("copy"));
    }

    #[test]
    fn overrides_single_key() {
        let config = CoreConfig::from_toml_str(r#"builtin_collection = "core""#).unwrap();
        assert_eq!(config.builtin_collection, "core");
        assert_eq!(config.skip_reason, "Conditional result was False");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(CoreConfig::from_toml_str("bogus = 1").is_err());
    }

    #[test]
    fn rejects_empty_builtin_collection() {
        let err = CoreConfig::from_toml_str(r#"builtin_collection = """#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn parses_manifest() {
        let manifest = RegistryManifest::from_toml_str(
            r#"
            [[module]]
            name = "copy"

            [[module]]
            collection = "acme.net"
            name = "vlan"
            kind = "network"

            [[redirect]]
            from = "acme.legacy.vlan"
            to = "acme.net.vlan"
            kind = "network"

            [[handler]]
            import_path = "builtin.action.debug"
            action = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.modules[0].kind, ImplementationKind::module());
        assert_eq!(manifest.modules[1].collection.as_deref(), Some("acme.net"));
        assert_eq!(manifest.redirects[0].kind, ImplementationKind::new("network"));
        assert_eq!(manifest.handlers[0].action, "debug");
    }
}
