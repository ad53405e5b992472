use serde::{Deserialize, Serialize};

/// What a question captures: an observation, a group of observations, an
/// order, or a structural/control element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    Obs,
    ObsGroup,
    TestOrder,
    Control,
    EncounterDatetime,
    EncounterLocation,
    EncounterProvider,
    PatientIdentifier,
    PersonAttribute,
}

/// The UI widget a question renders as. Legalizes which `QuestionOptions`
/// fields may be present (see the coercion module).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Rendering {
    #[default]
    Text,
    Number,
    Date,
    Datetime,
    Select,
    Radio,
    MultiCheckbox,
    Textarea,
    #[serde(rename = "ui-select-extended")]
    UiSelectExtended,
    Repeating,
    Group,
    Markdown,
    Toggle,
    File,
}

/// A single input element of a form. `questions` is populated only for
/// obsGroup questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub label: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    pub question_options: QuestionOptions,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<HideProperty>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

/// Rendering-keyed bag of optional widget settings. min/max are carried as
/// strings, matching the persisted wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOptions {
    pub rendering: Rendering,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept_mappings: Vec<ConceptMapping>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub week_list: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_setting_uuid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectable_orders: Vec<Answer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculate: Option<CalculateProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub concept: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMapping {
    pub relationship: String,
    #[serde(rename = "type")]
    pub mapping_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    #[serde(rename = "type")]
    pub validator_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fails_when_expression: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HideProperty {
    pub hide_when_expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculateProperty {
    pub calculate_expression: String,
}

impl Question {
    pub fn new(id: impl Into<String>, label: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            question_type,
            required: None,
            question_options: QuestionOptions::default(),
            validators: Vec::new(),
            hide: None,
            questions: Vec::new(),
        }
    }

    pub fn with_rendering(mut self, rendering: Rendering) -> Self {
        self.question_options.rendering = rendering;
        self
    }

    pub fn with_options(mut self, options: QuestionOptions) -> Self {
        self.question_options = options;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_sub_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// This question followed by all nested sub-questions, depth-first.
    pub fn self_and_descendants(&self) -> impl Iterator<Item = &Question> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out.into_iter()
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Question>) {
        out.push(self);
        for sub in &self.questions {
            sub.collect_into(out);
        }
    }
}

impl Validator {
    pub fn js_expression(
        fails_when_expression: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            validator_type: "js_expression".to_string(),
            fails_when_expression: Some(fails_when_expression.into()),
            error_message: Some(error_message.into()),
        }
    }
}
