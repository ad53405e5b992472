mod common;

use common::*;
use openmrs_formschema::*;

/// Builder with one complete rule on `age`: "when visitDate is empty, <action>".
fn complete_rule(action: ActionCondition) -> (RuleBuilder, uuid::Uuid) {
    let mut builder = RuleBuilder::new();
    let rule_id = builder.add_rule("age");
    let rule = builder.rule(rule_id).unwrap();
    let (condition_id, action_id) = (rule.conditions[0].id, rule.actions[0].id);

    builder
        .update_condition(rule_id, condition_id, |c| {
            c.target_field = Some("phone".to_string());
            c.target_condition = Some(TargetCondition::IsEmpty);
        })
        .unwrap();
    builder
        .update_action(rule_id, action_id, |a| {
            a.action_condition = Some(action);
            a.action_field = Some("age".to_string());
            if action == ActionCondition::Fail {
                a.error_message = Some("Age is required first".to_string());
            }
            if action == ActionCondition::Calculate {
                a.calculate_expression = Some("expectedDeliveryDate".to_string());
            }
        })
        .unwrap();

    (builder, rule_id)
}

#[test]
fn test_commit_hide_rule_writes_hide_expression() {
    init_tracing();
    let mut store = SchemaStore::new(create_test_schema());
    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Hide);

    let rule = builder.rule_mut(rule_id).unwrap();
    engine.commit(&mut store, rule).unwrap();

    let question = store.question("age").unwrap();
    let hide = question.hide.as_ref().unwrap();
    assert!(hide.hide_when_expression.contains("phone"));
    assert!(!rule.is_new_rule);
}

#[test]
fn test_commit_fail_rule_records_validator_index() {
    let mut store = SchemaStore::new(create_test_schema());
    // Pre-existing validator that must survive rule deletion.
    store
        .append_validator(
            "age",
            Validator::js_expression("age > '200'", "Implausible age"),
        )
        .unwrap();

    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Fail);
    let rule = builder.rule_mut(rule_id).unwrap();
    engine.commit(&mut store, rule).unwrap();

    assert_eq!(rule.actions[0].validator_index, Some(1));
    assert_eq!(store.question("age").unwrap().validators.len(), 2);
}

#[test]
fn test_delete_fail_rule_removes_exactly_one_validator() {
    let mut store = SchemaStore::new(create_test_schema());
    store
        .append_validator(
            "age",
            Validator::js_expression("age > '200'", "Implausible age"),
        )
        .unwrap();

    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Fail);
    engine
        .commit(&mut store, builder.rule_mut(rule_id).unwrap())
        .unwrap();

    let rule = builder.remove_rule(rule_id).unwrap();
    engine.delete(&mut store, &rule).unwrap();

    let validators = &store.question("age").unwrap().validators;
    assert_eq!(validators.len(), 1);
    assert_eq!(
        validators[0].error_message.as_deref(),
        Some("Implausible age")
    );
}

#[test]
fn test_delete_hide_rule_removes_hide_property() {
    let mut store = SchemaStore::new(create_test_schema());
    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Hide);
    engine
        .commit(&mut store, builder.rule_mut(rule_id).unwrap())
        .unwrap();
    assert!(store.question("age").unwrap().hide.is_some());

    let rule = builder.remove_rule(rule_id).unwrap();
    engine.delete(&mut store, &rule).unwrap();
    assert!(store.question("age").unwrap().hide.is_none());
}

#[test]
fn test_calculate_rule_round_trip() {
    let mut store = SchemaStore::new(create_test_schema());
    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Calculate);
    engine
        .commit(&mut store, builder.rule_mut(rule_id).unwrap())
        .unwrap();

    let calculate = store
        .question("age")
        .unwrap()
        .question_options
        .calculate
        .as_ref()
        .unwrap();
    assert_eq!(calculate.calculate_expression, "expectedDeliveryDate");

    let rule = builder.remove_rule(rule_id).unwrap();
    engine.delete(&mut store, &rule).unwrap();
    assert!(
        store
            .question("age")
            .unwrap()
            .question_options
            .calculate
            .is_none()
    );
}

#[test]
fn test_incomplete_rule_is_rejected_without_writes() {
    let mut store = SchemaStore::new(create_test_schema());
    let before = store.snapshot();
    let engine = RuleEngine::canonical();

    let mut builder = RuleBuilder::new();
    let rule_id = builder.add_rule("age");
    let result = engine.commit(&mut store, builder.rule_mut(rule_id).unwrap());

    assert!(result.is_err());
    assert_eq!(store.schema(), &before);
}

#[test]
fn test_dangling_action_field_rejected_before_any_write() {
    let mut store = SchemaStore::new(create_test_schema());
    let before = store.snapshot();
    let engine = RuleEngine::canonical();

    let (mut builder, rule_id) = complete_rule(ActionCondition::Hide);
    let action_id = builder.rule(rule_id).unwrap().actions[0].id;
    builder
        .update_action(rule_id, action_id, |a| {
            a.action_field = Some("no-such-question".to_string());
        })
        .unwrap();

    let result = engine.commit(&mut store, builder.rule_mut(rule_id).unwrap());
    assert!(matches!(
        result,
        Err(FormSchemaError::QuestionNotFound { .. })
    ));
    assert_eq!(store.schema(), &before);
}

#[test]
fn test_rule_delete_undo_via_snapshot() {
    let mut store = SchemaStore::new(create_test_schema());
    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Hide);
    engine
        .commit(&mut store, builder.rule_mut(rule_id).unwrap())
        .unwrap();

    let undo = store.snapshot();
    let rule = builder.remove_rule(rule_id).unwrap();
    engine.delete(&mut store, &rule).unwrap();
    assert!(store.question("age").unwrap().hide.is_none());

    // Snackbar "Undo": restore the tree and re-add the rule.
    store.restore(undo);
    builder.re_add_rule(rule);
    assert!(store.question("age").unwrap().hide.is_some());
    assert_eq!(builder.rules_for_question("age").count(), 1);
}

#[test]
fn test_multi_condition_chain_compiles_in_order() {
    let mut store = SchemaStore::new(create_test_schema());
    let engine = RuleEngine::canonical();
    let (mut builder, rule_id) = complete_rule(ActionCondition::Hide);

    let condition_id = builder.add_condition(rule_id).unwrap();
    builder
        .update_condition(rule_id, condition_id, |c| {
            c.logical_operator = Some(LogicalOperator::Or);
            c.target_field = Some("sex".to_string());
            c.target_condition = Some(TargetCondition::Equals);
            c.target_value = Some("Female".to_string());
        })
        .unwrap();

    engine
        .commit(&mut store, builder.rule_mut(rule_id).unwrap())
        .unwrap();

    let hide = store.question("age").unwrap().hide.clone().unwrap();
    let expression = hide.hide_when_expression;
    assert!(expression.find("phone").unwrap() < expression.find("sex").unwrap());
    assert!(expression.contains("||"));
}
