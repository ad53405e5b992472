use crate::error::{FormSchemaError, Result};
use crate::rules::expression::{CanonicalCompiler, ExpressionCompiler};
use crate::store::SchemaStore;
use crate::types::{ActionCondition, FormRule, Validator};

/// Translates completed rules into the schema's native representation
/// (`hide`, `validators`, `questionOptions.calculate`) and reverses that
/// translation when a rule is deleted.
pub struct RuleEngine {
    compiler: Box<dyn ExpressionCompiler>,
}

impl RuleEngine {
    pub fn new(compiler: Box<dyn ExpressionCompiler>) -> Self {
        Self { compiler }
    }

    /// Engine with the interim canonical expression compiler.
    pub fn canonical() -> Self {
        Self::new(Box::new(CanonicalCompiler))
    }

    /// Commits a complete rule: compiles its condition chain once and writes
    /// each action onto its target question. Target fields are all resolved
    /// before the first write, so a dangling action field rejects the commit
    /// without touching the schema. Records the created validator index on
    /// Fail actions so deletion can splice exactly that entry.
    pub fn commit(&self, store: &mut SchemaStore, rule: &mut FormRule) -> Result<()> {
        if !rule.is_complete() {
            return Err(FormSchemaError::rule(
                "rule has unfinished conditions or actions",
            ));
        }
        let expression = self.compiler.compile(&rule.conditions)?;

        for action in &rule.actions {
            let field = required_field(action.action_field.as_deref())?;
            if store.question(field).is_none() {
                return Err(FormSchemaError::QuestionNotFound {
                    id: field.to_string(),
                });
            }
        }

        for action in &mut rule.actions {
            let field = required_field(action.action_field.as_deref())?.to_string();
            match action.action_condition {
                Some(ActionCondition::Hide) => {
                    store.set_hide_expression(&field, expression.clone())?;
                }
                Some(ActionCondition::Fail) => {
                    let message = action.error_message.clone().ok_or_else(|| {
                        FormSchemaError::rule("Fail action is missing an error message")
                    })?;
                    let index = store.append_validator(
                        &field,
                        Validator::js_expression(expression.clone(), message),
                    )?;
                    action.validator_index = Some(index);
                }
                Some(ActionCondition::Calculate) => {
                    let calculate = action.calculate_expression.clone().ok_or_else(|| {
                        FormSchemaError::rule("Calculate action is missing an expression")
                    })?;
                    store.set_calculate_expression(&field, calculate)?;
                }
                None => {
                    return Err(FormSchemaError::rule("action has no action condition"));
                }
            }
        }

        rule.is_new_rule = false;
        for condition in &mut rule.conditions {
            condition.is_new = false;
        }
        for action in &mut rule.actions {
            action.is_new = false;
        }

        tracing::info!(rule = %rule.id, question = %rule.question, "committed conditional logic");
        Ok(())
    }

    /// Reverses everything `commit` wrote for this rule: Hide actions drop
    /// the target question's `hide` property, Fail actions splice the one
    /// validator recorded at commit (neighboring validators untouched),
    /// Calculate actions clear `questionOptions.calculate`. Callers wanting
    /// an undo affordance take a `store.snapshot()` first.
    pub fn delete(&self, store: &mut SchemaStore, rule: &FormRule) -> Result<()> {
        for action in &rule.actions {
            let Some(field) = action.action_field.as_deref() else {
                continue;
            };
            match action.action_condition {
                Some(ActionCondition::Hide) => store.clear_hide(field)?,
                Some(ActionCondition::Fail) => {
                    if let Some(index) = action.validator_index {
                        store.remove_validator(field, index)?;
                    }
                }
                Some(ActionCondition::Calculate) => store.clear_calculate(field)?,
                None => {}
            }
        }

        tracing::info!(rule = %rule.id, question = %rule.question, "deleted conditional logic");
        Ok(())
    }
}

fn required_field(field: Option<&str>) -> Result<&str> {
    field.ok_or_else(|| FormSchemaError::rule("action has no target field"))
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine").finish_non_exhaustive()
    }
}
