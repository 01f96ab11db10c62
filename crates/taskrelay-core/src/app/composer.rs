//! ResultComposer - 実行結果のマージと `register` の公開
//!
//! # 学習ポイント
//! - 2 つの戦略で結果の畳み込み方が違う（shallow update / recursive merge）
//! - `register` に束縛される値も戦略ごとに違う（raw result / merge 後の envelope）

use serde_json::{Map, Value};

use crate::domain::ResultEnvelope;

/// StrategyResult は実行された戦略の生の結果
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyResult {
    /// shallow update。束縛されるのは raw result
    Plugin(Map<String, Value>),
    /// recursive merge。束縛されるのは merge 後の envelope
    Unit(Map<String, Value>),
}

/// ResultComposer は base envelope に結果を畳み込む
///
/// # 処理順
/// 1. base の `invocation.<echo_key>` を削除
/// 2. 戦略に応じて update / merge
/// 3. `register` があれば facts をその 1 キーだけにする
pub struct ResultComposer<'a> {
    echo_key: &'a str,
}

impl<'a> ResultComposer<'a> {
    pub fn new(echo_key: &'a str) -> Self {
        Self { echo_key }
    }

    pub fn compose(
        &self,
        mut base: ResultEnvelope,
        result: StrategyResult,
        output_binding: Option<&str>,
    ) -> ResultEnvelope {
        base.strip_invocation_echo(self.echo_key);

        let bound = match result {
            StrategyResult::Plugin(raw) => {
                base.update(&raw);
                Value::Object(raw)
            }
            StrategyResult::Unit(raw) => {
                base.merge(&raw);
                Value::Object(base.to_map())
            }
        };

        if let Some(binding) = output_binding {
            base.publish_fact(binding, bound);
        }
        base
    }
}
