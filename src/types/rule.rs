use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Builder-local conditional logic attached to a question. Never persisted
/// verbatim: on commit it is translated into native schema fields (`hide`,
/// `validators`, `questionOptions.calculate`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormRule {
    pub id: Uuid,

    /// Id of the question this rule is authored against.
    pub question: String,

    pub is_new_rule: bool,

    pub conditions: Vec<RuleCondition>,
    pub actions: Vec<RuleAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub id: Uuid,

    #[serde(default)]
    pub is_new: bool,

    /// Connector to the previous condition. Ignored on the first condition,
    /// which has no left-hand sibling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_condition: Option<TargetCondition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    pub id: Uuid,

    #[serde(default)]
    pub is_new: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_condition: Option<ActionCondition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculate_expression: Option<String>,

    /// Index of the validator a committed Fail action created on the target
    /// question. Recorded at commit so deletion can splice exactly that entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TargetCondition {
    IsEmpty,
    NotEmpty,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    Equals,
    NotEquals,
    IsDateBefore,
    IsDateAfter,
    Contains,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActionCondition {
    Hide,
    Fail,
    Calculate,
}

impl TargetCondition {
    /// Unary operators take no target value; the value input is hidden for
    /// them in the builder UI.
    pub fn is_unary(self) -> bool {
        matches!(self, Self::IsEmpty | Self::NotEmpty)
    }
}

impl FormRule {
    /// A fresh rule seeded with one placeholder condition and one placeholder
    /// action, the state "Add conditional logic" opens with.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            is_new_rule: true,
            conditions: vec![RuleCondition::placeholder()],
            actions: vec![RuleAction::placeholder()],
        }
    }

    /// A rule is committable only when every condition and action is fully
    /// specified.
    pub fn is_complete(&self) -> bool {
        !self.conditions.is_empty()
            && !self.actions.is_empty()
            && self.conditions.iter().all(RuleCondition::is_complete)
            && self.actions.iter().all(RuleAction::is_complete)
    }
}

impl RuleCondition {
    pub fn placeholder() -> Self {
        Self {
            id: Uuid::new_v4(),
            is_new: true,
            logical_operator: None,
            target_field: None,
            target_condition: None,
            target_value: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        let Some(condition) = self.target_condition else {
            return false;
        };
        self.target_field.is_some() && (condition.is_unary() || self.target_value.is_some())
    }
}

impl RuleAction {
    pub fn placeholder() -> Self {
        Self {
            id: Uuid::new_v4(),
            is_new: true,
            action_condition: None,
            action_field: None,
            error_message: None,
            calculate_expression: None,
            validator_index: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        let Some(condition) = self.action_condition else {
            return false;
        };
        if self.action_field.is_none() {
            return false;
        }
        match condition {
            ActionCondition::Hide => true,
            ActionCondition::Fail => self.error_message.is_some(),
            ActionCondition::Calculate => self.calculate_expression.is_some(),
        }
    }
}
