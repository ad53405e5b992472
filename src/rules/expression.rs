use crate::error::{FormSchemaError, Result};
use crate::types::{LogicalOperator, RuleCondition, TargetCondition};

/// Seam between rule state and the expression grammar the form-rendering
/// engine evaluates. The grammar is owned by that engine; implementations of
/// this trait are the only place it is spelled out.
pub trait ExpressionCompiler: Send + Sync {
    /// Compiles a flat and/or chain of conditions, in declaration order,
    /// into a single expression string. The first condition's logical
    /// operator has no left-hand sibling and is ignored.
    fn compile(&self, conditions: &[RuleCondition]) -> Result<String>;
}

/// Interim compiler emitting a neutral canonical form
/// (`isEmpty(field)`, `field >= 'value'`, joined with `&&`/`||`). Meant to be
/// replaced by a form-engine-specific compiler once that grammar is pinned
/// down; rule management does not depend on what this produces.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalCompiler;

impl ExpressionCompiler for CanonicalCompiler {
    fn compile(&self, conditions: &[RuleCondition]) -> Result<String> {
        if conditions.is_empty() {
            return Err(FormSchemaError::Expression {
                message: "cannot compile an empty condition list".to_string(),
            });
        }

        let mut out = String::new();
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                let connector = match condition.logical_operator.unwrap_or(LogicalOperator::And) {
                    LogicalOperator::And => " && ",
                    LogicalOperator::Or => " || ",
                };
                out.push_str(connector);
            }
            out.push_str(&compile_term(condition)?);
        }
        Ok(out)
    }
}

fn compile_term(condition: &RuleCondition) -> Result<String> {
    let incomplete = || FormSchemaError::Expression {
        message: "condition is missing a field, operator, or value".to_string(),
    };
    let field = condition.target_field.as_deref().ok_or_else(incomplete)?;
    let operator = condition.target_condition.ok_or_else(incomplete)?;

    let value = || condition.target_value.as_deref().ok_or_else(incomplete);
    Ok(match operator {
        TargetCondition::IsEmpty => format!("isEmpty({field})"),
        TargetCondition::NotEmpty => format!("!isEmpty({field})"),
        TargetCondition::GreaterThanOrEqualTo => format!("{field} >= '{}'", value()?),
        TargetCondition::LessThanOrEqualTo => format!("{field} <= '{}'", value()?),
        TargetCondition::Equals => format!("{field} == '{}'", value()?),
        TargetCondition::NotEquals => format!("{field} != '{}'", value()?),
        TargetCondition::IsDateBefore => format!("isDateBefore({field}, '{}')", value()?),
        TargetCondition::IsDateAfter => format!("isDateAfter({field}, '{}')", value()?),
        TargetCondition::Contains => format!("contains({field}, '{}')", value()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(
        field: &str,
        operator: TargetCondition,
        value: Option<&str>,
        connector: Option<LogicalOperator>,
    ) -> RuleCondition {
        let mut c = RuleCondition::placeholder();
        c.target_field = Some(field.to_string());
        c.target_condition = Some(operator);
        c.target_value = value.map(str::to_string);
        c.logical_operator = connector;
        c
    }

    #[test]
    fn test_single_unary_condition() {
        let compiled = CanonicalCompiler
            .compile(&[condition("age", TargetCondition::IsEmpty, None, None)])
            .unwrap();
        assert_eq!(compiled, "isEmpty(age)");
    }

    #[test]
    fn test_chain_uses_each_conditions_operator() {
        let compiled = CanonicalCompiler
            .compile(&[
                condition("age", TargetCondition::GreaterThanOrEqualTo, Some("18"), None),
                condition(
                    "sex",
                    TargetCondition::Equals,
                    Some("F"),
                    Some(LogicalOperator::Or),
                ),
            ])
            .unwrap();
        assert_eq!(compiled, "age >= '18' || sex == 'F'");
    }

    #[test]
    fn test_first_operator_is_ignored() {
        // "When" has no left-hand sibling; a stray operator must not leak.
        let compiled = CanonicalCompiler
            .compile(&[condition(
                "age",
                TargetCondition::NotEmpty,
                None,
                Some(LogicalOperator::Or),
            )])
            .unwrap();
        assert_eq!(compiled, "!isEmpty(age)");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let result =
            CanonicalCompiler.compile(&[condition("age", TargetCondition::Equals, None, None)]);
        assert!(result.is_err());
    }
}
