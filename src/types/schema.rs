use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::Question;

/// Root document of a clinical form: ordered pages of sections of questions,
/// persisted verbatim as the clobdata blob the rendering engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub name: String,
    pub uuid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Uuid reference to the encounter type this form captures.
    pub encounter_type: String,

    /// Fixed processor identifier understood by the backend.
    pub processor: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referenced_forms: Vec<ReferencedForm>,

    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<HashMap<String, HashMap<String, String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub label: String,

    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub label: String,

    /// Stringified boolean ("true"/"false"), kept as-is for wire fidelity.
    pub is_expanded: String,

    #[serde(default)]
    pub questions: Vec<Question>,

    /// Present when the section's questions are populated at render time
    /// from another form rather than stored here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<SectionReference>,
}

/// Pointer to a section of another form, included by alias instead of copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionReference {
    pub form: String,
    pub page: String,
    pub section: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedForm {
    pub form_name: String,
    pub alias: String,
}

impl FormSchema {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            version: None,
            description: None,
            encounter_type: String::new(),
            processor: "EncounterFormProcessor".to_string(),
            referenced_forms: Vec::new(),
            pages: Vec::new(),
            translations: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_encounter_type(mut self, encounter_type: impl Into<String>) -> Self {
        self.encounter_type = encounter_type.into();
        self
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn with_referenced_form(mut self, form: ReferencedForm) -> Self {
        self.referenced_forms.push(form);
        self
    }

    /// Iterate every question in the schema, including nested obsGroup
    /// sub-questions, in document order.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.pages
            .iter()
            .flat_map(|p| p.sections.iter())
            .flat_map(|s| s.questions.iter())
            .flat_map(|q| q.self_and_descendants())
    }

    /// Whether any question (at any nesting depth) carries the given id.
    pub fn contains_question_id(&self, id: &str) -> bool {
        self.all_questions().any(|q| q.id == id)
    }

    /// Returns the first question id that occurs more than once, if any.
    /// The scan is linear by design; schemas are dozens of questions, not
    /// thousands, and no index is maintained.
    pub fn find_duplicate_question_id(&self) -> Option<String> {
        let mut seen = HashSet::new();
        for question in self.all_questions() {
            if !seen.insert(question.id.as_str()) {
                return Some(question.id.clone());
            }
        }
        None
    }

    pub fn validate_structure(&self) -> crate::Result<()> {
        if self.name.is_empty() {
            return Err(crate::FormSchemaError::Validation {
                message: "Form name cannot be empty".to_string(),
            });
        }

        for question in self.all_questions() {
            if question.id.is_empty() {
                return Err(crate::FormSchemaError::Validation {
                    message: format!("Question '{}' has an empty id", question.label),
                });
            }
        }

        if let Some(id) = self.find_duplicate_question_id() {
            return Err(crate::FormSchemaError::DuplicateQuestionId { id });
        }

        Ok(())
    }
}

impl Page {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_expanded: "true".to_string(),
            questions: Vec::new(),
            reference: None,
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_reference(mut self, reference: SectionReference) -> Self {
        self.reference = Some(reference);
        self
    }
}

impl fmt::Display for FormSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormSchema({})", self.name)?;
        if let Some(version) = &self.version {
            write!(f, " v{version}")?;
        }
        write!(f, " [{} pages]", self.pages.len())
    }
}
