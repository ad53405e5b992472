use uuid::Uuid;

use crate::error::{FormSchemaError, Result};
use crate::types::{FormRule, RuleAction, RuleCondition};

/// In-memory conditional-logic state for the questions of one schema.
///
/// Holds the rules a user is authoring. Nothing here touches the schema
/// tree: conditions and actions are list mutations only, and the schema is
/// written exclusively through `RuleEngine::commit` once a rule is complete.
#[derive(Debug, Default, Clone)]
pub struct RuleBuilder {
    rules: Vec<FormRule>,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<FormRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FormRule] {
        &self.rules
    }

    pub fn rules_for_question<'a>(
        &'a self,
        question_id: &'a str,
    ) -> impl Iterator<Item = &'a FormRule> {
        self.rules.iter().filter(move |r| r.question == question_id)
    }

    pub fn rule(&self, rule_id: Uuid) -> Option<&FormRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    /// Opens conditional logic for a question: a new rule seeded with one
    /// placeholder condition and one placeholder action.
    pub fn add_rule(&mut self, question_id: impl Into<String>) -> Uuid {
        let rule = FormRule::new(question_id);
        let id = rule.id;
        self.rules.push(rule);
        id
    }

    /// Removes a whole rule from the builder, returning it so a snackbar
    /// undo can re-add it.
    pub fn remove_rule(&mut self, rule_id: Uuid) -> Option<FormRule> {
        let position = self.rules.iter().position(|r| r.id == rule_id)?;
        Some(self.rules.remove(position))
    }

    pub fn re_add_rule(&mut self, rule: FormRule) {
        self.rules.push(rule);
    }

    pub fn add_condition(&mut self, rule_id: Uuid) -> Result<Uuid> {
        let rule = self.rule_mut(rule_id)?;
        let condition = RuleCondition::placeholder();
        let id = condition.id;
        rule.conditions.push(condition);
        Ok(id)
    }

    /// Removes one condition by id. Schema untouched; the persisted form
    /// only changes on full commit.
    pub fn remove_condition(&mut self, rule_id: Uuid, condition_id: Uuid) -> Result<RuleCondition> {
        let rule = self.rule_mut(rule_id)?;
        let position = rule
            .conditions
            .iter()
            .position(|c| c.id == condition_id)
            .ok_or_else(|| FormSchemaError::rule(format!("no condition {condition_id} in rule")))?;
        Ok(rule.conditions.remove(position))
    }

    pub fn update_condition(
        &mut self,
        rule_id: Uuid,
        condition_id: Uuid,
        edit: impl FnOnce(&mut RuleCondition),
    ) -> Result<()> {
        let rule = self.rule_mut(rule_id)?;
        let condition = rule
            .conditions
            .iter_mut()
            .find(|c| c.id == condition_id)
            .ok_or_else(|| FormSchemaError::rule(format!("no condition {condition_id} in rule")))?;
        edit(condition);
        Ok(())
    }

    pub fn add_action(&mut self, rule_id: Uuid) -> Result<Uuid> {
        let rule = self.rule_mut(rule_id)?;
        let action = RuleAction::placeholder();
        let id = action.id;
        rule.actions.push(action);
        Ok(id)
    }

    pub fn remove_action(&mut self, rule_id: Uuid, action_id: Uuid) -> Result<RuleAction> {
        let rule = self.rule_mut(rule_id)?;
        let position = rule
            .actions
            .iter()
            .position(|a| a.id == action_id)
            .ok_or_else(|| FormSchemaError::rule(format!("no action {action_id} in rule")))?;
        Ok(rule.actions.remove(position))
    }

    pub fn update_action(
        &mut self,
        rule_id: Uuid,
        action_id: Uuid,
        edit: impl FnOnce(&mut RuleAction),
    ) -> Result<()> {
        let rule = self.rule_mut(rule_id)?;
        let action = rule
            .actions
            .iter_mut()
            .find(|a| a.id == action_id)
            .ok_or_else(|| FormSchemaError::rule(format!("no action {action_id} in rule")))?;
        edit(action);
        Ok(())
    }

    /// Mutable access for commit-time bookkeeping (`is_new` flags, recorded
    /// validator indices).
    pub fn rule_mut(&mut self, rule_id: Uuid) -> Result<&mut FormRule> {
        self.rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| FormSchemaError::rule(format!("no rule with id {rule_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionCondition, TargetCondition};

    #[test]
    fn test_new_rule_has_placeholders() {
        let mut builder = RuleBuilder::new();
        let rule_id = builder.add_rule("age");
        let rule = builder.rule(rule_id).unwrap();
        assert_eq!(rule.conditions.len(), 1);
        assert_eq!(rule.actions.len(), 1);
        assert!(rule.is_new_rule);
        assert!(!rule.is_complete());
    }

    #[test]
    fn test_condition_lifecycle() {
        let mut builder = RuleBuilder::new();
        let rule_id = builder.add_rule("age");
        let condition_id = builder.add_condition(rule_id).unwrap();
        assert_eq!(builder.rule(rule_id).unwrap().conditions.len(), 2);

        builder.remove_condition(rule_id, condition_id).unwrap();
        assert_eq!(builder.rule(rule_id).unwrap().conditions.len(), 1);
    }

    #[test]
    fn test_unary_condition_completes_without_value() {
        let mut builder = RuleBuilder::new();
        let rule_id = builder.add_rule("age");
        let rule = builder.rule(rule_id).unwrap();
        let (condition_id, action_id) = (rule.conditions[0].id, rule.actions[0].id);

        builder
            .update_condition(rule_id, condition_id, |c| {
                c.target_field = Some("visitDate".to_string());
                c.target_condition = Some(TargetCondition::IsEmpty);
            })
            .unwrap();
        builder
            .update_action(rule_id, action_id, |a| {
                a.action_condition = Some(ActionCondition::Hide);
                a.action_field = Some("age".to_string());
            })
            .unwrap();

        assert!(builder.rule(rule_id).unwrap().is_complete());
    }

    #[test]
    fn test_binary_condition_needs_value() {
        let mut builder = RuleBuilder::new();
        let rule_id = builder.add_rule("age");
        let condition_id = builder.rule(rule_id).unwrap().conditions[0].id;
        builder
            .update_condition(rule_id, condition_id, |c| {
                c.target_field = Some("age".to_string());
                c.target_condition = Some(TargetCondition::Equals);
            })
            .unwrap();
        assert!(!builder.rule(rule_id).unwrap().conditions[0].is_complete());
    }

    #[test]
    fn test_remove_missing_rule_is_error() {
        let mut builder = RuleBuilder::new();
        assert!(builder.remove_rule(Uuid::new_v4()).is_none());
        assert!(builder.add_condition(Uuid::new_v4()).is_err());
    }
}
