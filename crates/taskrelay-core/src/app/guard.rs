//! GuardEvaluator - `when` の評価（短絡 AND）

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Guard, GuardOutcome, Guards, TemplateError};
use crate::ports::TemplateEngine;

pub struct GuardEvaluator<'a> {
    templates: &'a dyn TemplateEngine,
    skip_reason: &'a str,
}

impl<'a> GuardEvaluator<'a> {
    pub fn new(templates: &'a dyn TemplateEngine, skip_reason: &'a str) -> Self {
        Self {
            templates,
            skip_reason,
        }
    }

    /// 左から順に評価し、最初の false で止まる
    ///
    /// 評価エラーはそのまま返す。skip になるのは false と評価できた guard だけ。
    pub fn evaluate(
        &self,
        guards: &Guards,
        vars: &Map<String, Value>,
    ) -> Result<GuardOutcome, TemplateError> {
        match guards.as_slice() {
            [] | [Guard::Literal(true)] => return Ok(GuardOutcome::Proceed),
            [Guard::Literal(false)] => return Ok(self.skip()),
            _ => {}
        }

        for (index, guard) in guards.as_slice().iter().enumerate() {
            let holds = match guard {
                Guard::Literal(value) => *value,
                Guard::Expr(expr) => self.templates.evaluate(expr, vars)?,
            };
            debug!(index, holds, "guard evaluated");
            if !holds {
                return Ok(self.skip());
            }
        }
        Ok(GuardOutcome::Proceed)
    }

    fn skip(&self) -> GuardOutcome {
        GuardOutcome::Skip(self.skip_reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::CountingTemplates;
    use rstest::rstest;

    const REASON: &str = "Conditional result was False";

    fn exprs(items: &[&str]) -> Guards {
        Guards::new(items.iter().map(|s| Guard::Expr(s.to_string())).collect())
    }

    #[rstest]
    #[case::empty(Guards::none())]
    #[case::literal_true(Guards::new(vec![Guard::Literal(true)]))]
    fn proceeds_without_evaluating(#[case] guards: Guards) {
        let templates = CountingTemplates::default();
        let outcome = GuardEvaluator::new(&templates, REASON)
            .evaluate(&guards, &Map::new())
            .unwrap();
        assert_eq!(outcome, GuardOutcome::Proceed);
        assert!(templates.evaluated().is_empty());
    }

    #[test]
    fn literal_false_skips_immediately() {
        let templates = CountingTemplates::default();
        let outcome = GuardEvaluator::new(&templates, REASON)
            .evaluate(&Guards::new(vec![Guard::Literal(false)]), &Map::new())
            .unwrap();
        assert_eq!(outcome, GuardOutcome::Skip(REASON.to_string()));
    }

    #[test]
    fn stops_at_first_false_expression() {
        let templates = CountingTemplates::default();
        let outcome = GuardEvaluator::new(&templates, REASON)
            .evaluate(&exprs(&["true", "true", "false", "true"]), &Map::new())
            .unwrap();

        assert_eq!(outcome, GuardOutcome::Skip(REASON.to_string()));
        assert_eq!(templates.evaluated(), vec!["true", "true", "false"]);
    }

    #[test]
    fn literal_false_inside_a_list_skips() {
        let templates = CountingTemplates::default();
        let guards = Guards::new(vec![
            Guard::Expr("true".to_string()),
            Guard::Literal(false),
            Guard::Expr("true".to_string()),
        ]);
        let outcome = GuardEvaluator::new(&templates, REASON)
            .evaluate(&guards, &Map::new())
            .unwrap();
        assert!(matches!(outcome, GuardOutcome::Skip(_)));
        assert_eq!(templates.evaluated().len(), 1);
    }

    #[test]
    fn all_true_proceeds() {
        let templates = CountingTemplates::default();
        let outcome = GuardEvaluator::new(&templates, REASON)
            .evaluate(&exprs(&["true", "true"]), &Map::new())
            .unwrap();
        assert_eq!(outcome, GuardOutcome::Proceed);
    }

    #[test]
    fn evaluation_errors_are_not_skips() {
        let templates = CountingTemplates::default();
        let err = GuardEvaluator::new(&templates, REASON)
            .evaluate(&exprs(&["true", "undefined_var", "false"]), &Map::new())
            .unwrap_err();
        assert_eq!(err, TemplateError::Undefined("undefined_var".to_string()));
        assert_eq!(templates.evaluated().len(), 2);
    }
}
