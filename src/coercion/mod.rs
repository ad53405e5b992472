//! Question type/rendering coercion.
//!
//! When the edit-question UI switches a question's type or rendering, the
//! `questionOptions` bag must be filtered down to the properties legal for
//! the new pair, so stale type-incompatible fields (a `min` on a select, an
//! `attributeType` on an obs) do not linger in the persisted schema.
//!
//! Pure functions over static whitelist tables; inputs are never mutated.

use std::collections::HashSet;

use crate::types::{Question, QuestionOptions, QuestionType, Rendering};

/// Top-level question fields legal for a question type. Wire-format key
/// names; `id`, `label`, and `type` are implicitly always legal.
pub fn allowed_question_fields(question_type: QuestionType) -> &'static [&'static str] {
    match question_type {
        QuestionType::Obs | QuestionType::TestOrder => {
            &["required", "questionOptions", "validators", "hide"]
        }
        QuestionType::ObsGroup => {
            &["required", "questionOptions", "validators", "hide", "questions"]
        }
        QuestionType::Control => &["questionOptions", "hide"],
        QuestionType::EncounterDatetime
        | QuestionType::EncounterLocation
        | QuestionType::EncounterProvider
        | QuestionType::PatientIdentifier
        | QuestionType::PersonAttribute => &["required", "questionOptions", "hide"],
    }
}

/// `questionOptions` keys legalized by the question type.
pub fn allowed_option_fields_for_type(question_type: QuestionType) -> &'static [&'static str] {
    match question_type {
        QuestionType::Obs => &["concept", "conceptMappings", "answers", "calculate"],
        QuestionType::ObsGroup => &["concept"],
        QuestionType::TestOrder => {
            &["concept", "orderSettingUuid", "orderType", "selectableOrders"]
        }
        QuestionType::PersonAttribute => &["attributeType"],
        QuestionType::Control
        | QuestionType::EncounterDatetime
        | QuestionType::EncounterLocation
        | QuestionType::EncounterProvider
        | QuestionType::PatientIdentifier => &[],
    }
}

/// `questionOptions` keys legalized by the rendering widget.
pub fn allowed_option_fields_for_rendering(rendering: Rendering) -> &'static [&'static str] {
    match rendering {
        Rendering::Number => &["min", "max"],
        Rendering::Date | Rendering::Datetime => &["weekList"],
        Rendering::Select | Rendering::Radio | Rendering::MultiCheckbox => &["answers"],
        Rendering::UiSelectExtended => &["answers"],
        Rendering::Textarea => &["rows"],
        Rendering::Text
        | Rendering::Repeating
        | Rendering::Group
        | Rendering::Markdown
        | Rendering::Toggle
        | Rendering::File => &[],
    }
}

/// Returns a cleaned copy of `question` retargeted to `new_type`: top-level
/// fields outside the type's whitelist are dropped, and `questionOptions` is
/// filtered to the union of type-allowed and rendering-allowed keys.
/// `rendering` itself is always preserved.
pub fn clean_question_for_type(question: &Question, new_type: QuestionType) -> Question {
    let fields = allowed_question_fields(new_type);
    let mut cleaned = Question::new(
        question.id.clone(),
        question.label.clone(),
        new_type,
    );

    if fields.contains(&"required") {
        cleaned.required = question.required;
    }
    if fields.contains(&"validators") {
        cleaned.validators = question.validators.clone();
    }
    if fields.contains(&"hide") {
        cleaned.hide = question.hide.clone();
    }
    if fields.contains(&"questions") {
        cleaned.questions = question.questions.clone();
    }
    if fields.contains(&"questionOptions") {
        cleaned.question_options = filter_options(
            &question.question_options,
            new_type,
            question.question_options.rendering,
        );
    }

    cleaned
}

/// Returns a cleaned copy of `question` with its rendering switched to
/// `new_rendering`; the question type is kept and the options bag is filtered
/// for the (type, new rendering) pair.
pub fn clean_question_for_rendering(question: &Question, new_rendering: Rendering) -> Question {
    let mut cleaned = clean_question_for_type(question, question.question_type);
    let mut options = question.question_options.clone();
    options.rendering = new_rendering;
    cleaned.question_options = filter_options(&options, question.question_type, new_rendering);
    cleaned
}

fn filter_options(
    options: &QuestionOptions,
    question_type: QuestionType,
    rendering: Rendering,
) -> QuestionOptions {
    let mut keep: HashSet<&str> = HashSet::new();
    keep.extend(allowed_option_fields_for_type(question_type));
    keep.extend(allowed_option_fields_for_rendering(rendering));

    QuestionOptions {
        rendering,
        concept: options.concept.clone().filter(|_| keep.contains("concept")),
        concept_mappings: if keep.contains("conceptMappings") {
            options.concept_mappings.clone()
        } else {
            Vec::new()
        },
        answers: if keep.contains("answers") {
            options.answers.clone()
        } else {
            Vec::new()
        },
        min: options.min.clone().filter(|_| keep.contains("min")),
        max: options.max.clone().filter(|_| keep.contains("max")),
        rows: options.rows.filter(|_| keep.contains("rows")),
        week_list: if keep.contains("weekList") {
            options.week_list.clone()
        } else {
            Vec::new()
        },
        attribute_type: options
            .attribute_type
            .clone()
            .filter(|_| keep.contains("attributeType")),
        order_setting_uuid: options
            .order_setting_uuid
            .clone()
            .filter(|_| keep.contains("orderSettingUuid")),
        order_type: options
            .order_type
            .clone()
            .filter(|_| keep.contains("orderType")),
        selectable_orders: if keep.contains("selectableOrders") {
            options.selectable_orders.clone()
        } else {
            Vec::new()
        },
        calculate: options
            .calculate
            .clone()
            .filter(|_| keep.contains("calculate")),
    }
}
