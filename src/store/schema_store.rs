use crate::coercion;
use crate::error::{FormSchemaError, Result};
use crate::types::{
    CalculateProperty, FormSchema, HideProperty, Page, Question, QuestionType, Rendering, Section,
    Validator,
};

/// Single owner of the in-memory form schema.
///
/// Replaces the shared-mutable-context pattern of the visual builder with
/// explicit mutation methods. Every mutation is atomic: the tree is cloned,
/// the change applied to the draft, the schema-wide invariants re-checked,
/// and the draft swapped in only on success. A failed operation leaves the
/// schema exactly as it was. `revision` increments once per successful
/// mutation, so callers can cheaply detect change.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    schema: FormSchema,
    revision: u64,
}

impl SchemaStore {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            revision: 0,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Serialized schema as the editor renders it: 2-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.schema)?)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Point-in-time copy of the schema, suitable for undo.
    pub fn snapshot(&self) -> FormSchema {
        self.schema.clone()
    }

    /// Replaces the schema wholesale (undo / external reload). Still counts
    /// as a mutation.
    pub fn restore(&mut self, snapshot: FormSchema) {
        self.schema = snapshot;
        self.revision += 1;
    }

    // --- pages ---

    pub fn add_page(&mut self, label: impl Into<String>) -> Result<usize> {
        let label = label.into();
        self.mutate(|schema| {
            schema.pages.push(Page::new(label.clone()));
            tracing::debug!(page = %label, "added page");
            Ok(schema.pages.len() - 1)
        })
    }

    pub fn rename_page(&mut self, page: usize, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.mutate(|schema| {
            let target = schema
                .pages
                .get_mut(page)
                .ok_or(FormSchemaError::PageNotFound { index: page })?;
            target.label = label;
            Ok(())
        })
    }

    pub fn delete_page(&mut self, page: usize) -> Result<Page> {
        self.mutate(|schema| {
            if page >= schema.pages.len() {
                return Err(FormSchemaError::PageNotFound { index: page });
            }
            let removed = schema.pages.remove(page);
            for section in &removed.sections {
                prune_referenced_form(schema, section);
            }
            tracing::debug!(page = %removed.label, "deleted page");
            Ok(removed)
        })
    }

    // --- sections ---

    pub fn add_section(&mut self, page: usize, section: Section) -> Result<usize> {
        self.mutate(|schema| {
            let target = schema
                .pages
                .get_mut(page)
                .ok_or(FormSchemaError::PageNotFound { index: page })?;
            target.sections.push(section);
            Ok(target.sections.len() - 1)
        })
    }

    pub fn rename_section(
        &mut self,
        page: usize,
        section: usize,
        label: impl Into<String>,
    ) -> Result<()> {
        let label = label.into();
        self.mutate(|schema| {
            section_mut(schema, page, section)?.label = label;
            Ok(())
        })
    }

    /// Removes a section. If it pointed at another form and no surviving
    /// section still does, the now-unused `referencedForms` entry is pruned.
    /// Usage is decided by a full re-scan of the remaining tree, not a
    /// maintained count; schemas are small enough that this never matters.
    pub fn delete_section(&mut self, page: usize, section: usize) -> Result<Section> {
        self.mutate(|schema| {
            let target = schema
                .pages
                .get_mut(page)
                .ok_or(FormSchemaError::PageNotFound { index: page })?;
            if section >= target.sections.len() {
                return Err(FormSchemaError::SectionNotFound { page, section });
            }
            let removed = target.sections.remove(section);
            prune_referenced_form(schema, &removed);
            tracing::debug!(section = %removed.label, page, "deleted section");
            Ok(removed)
        })
    }

    // --- questions ---

    /// Appends a question to a section. Rejected without mutating anything
    /// if any id in the new question subtree already exists in the schema.
    pub fn add_question(&mut self, page: usize, section: usize, question: Question) -> Result<()> {
        self.mutate(|schema| {
            tracing::debug!(question = %question.id, page, section, "added question");
            section_mut(schema, page, section)?.questions.push(question);
            Ok(())
        })
    }

    /// Applies an arbitrary edit to the question with the given id. The
    /// duplicate-id invariant is re-checked afterwards, so an edit that
    /// renames a question onto an existing id is rejected atomically.
    pub fn update_question(
        &mut self,
        question_id: &str,
        edit: impl FnOnce(&mut Question),
    ) -> Result<()> {
        self.mutate(|schema| {
            let question = find_question_mut(schema, question_id).ok_or_else(|| {
                FormSchemaError::QuestionNotFound {
                    id: question_id.to_string(),
                }
            })?;
            edit(question);
            Ok(())
        })
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<Question> {
        self.mutate(|schema| {
            remove_question(schema, question_id).ok_or_else(|| FormSchemaError::QuestionNotFound {
                id: question_id.to_string(),
            })
        })
    }

    /// Direct required flip; deliberately not modeled as a rule, it is the
    /// most common piece of conditional behavior by far.
    pub fn set_required(&mut self, question_id: &str, required: bool) -> Result<()> {
        self.update_question(question_id, |question| {
            question.required = Some(required);
        })
    }

    /// Retargets a question to a new type, coercing `questionOptions` down
    /// to the fields legal for it.
    pub fn set_question_type(&mut self, question_id: &str, new_type: QuestionType) -> Result<()> {
        self.update_question(question_id, |question| {
            *question = coercion::clean_question_for_type(question, new_type);
        })
    }

    pub fn set_question_rendering(
        &mut self,
        question_id: &str,
        new_rendering: Rendering,
    ) -> Result<()> {
        self.update_question(question_id, |question| {
            *question = coercion::clean_question_for_rendering(question, new_rendering);
        })
    }

    // --- conditional-logic plumbing (written by the rule engine) ---

    pub fn set_hide_expression(
        &mut self,
        question_id: &str,
        hide_when_expression: impl Into<String>,
    ) -> Result<()> {
        let expression = hide_when_expression.into();
        self.update_question(question_id, |question| {
            question.hide = Some(HideProperty {
                hide_when_expression: expression,
            });
        })
    }

    pub fn clear_hide(&mut self, question_id: &str) -> Result<()> {
        self.update_question(question_id, |question| {
            question.hide = None;
        })
    }

    /// Appends a validator and returns its index, so a later rule deletion
    /// can splice exactly this entry.
    pub fn append_validator(&mut self, question_id: &str, validator: Validator) -> Result<usize> {
        self.mutate(|schema| {
            let question = find_question_mut(schema, question_id).ok_or_else(|| {
                FormSchemaError::QuestionNotFound {
                    id: question_id.to_string(),
                }
            })?;
            question.validators.push(validator);
            Ok(question.validators.len() - 1)
        })
    }

    pub fn remove_validator(&mut self, question_id: &str, index: usize) -> Result<Validator> {
        self.mutate(|schema| {
            let question = find_question_mut(schema, question_id).ok_or_else(|| {
                FormSchemaError::QuestionNotFound {
                    id: question_id.to_string(),
                }
            })?;
            if index >= question.validators.len() {
                return Err(FormSchemaError::mutation(format!(
                    "validator index {index} out of range for question '{question_id}'"
                )));
            }
            Ok(question.validators.remove(index))
        })
    }

    pub fn set_calculate_expression(
        &mut self,
        question_id: &str,
        calculate_expression: impl Into<String>,
    ) -> Result<()> {
        let expression = calculate_expression.into();
        self.update_question(question_id, |question| {
            question.question_options.calculate = Some(CalculateProperty {
                calculate_expression: expression,
            });
        })
    }

    pub fn clear_calculate(&mut self, question_id: &str) -> Result<()> {
        self.update_question(question_id, |question| {
            question.question_options.calculate = None;
        })
    }

    // --- lookups ---

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.schema.all_questions().find(|q| q.id == question_id)
    }

    /// Copy-modify-swap core. The draft replaces the live tree only when the
    /// closure and the duplicate-id invariant both pass.
    fn mutate<T>(&mut self, f: impl FnOnce(&mut FormSchema) -> Result<T>) -> Result<T> {
        let mut draft = self.schema.clone();
        let out = f(&mut draft)?;
        if let Some(id) = draft.find_duplicate_question_id() {
            return Err(FormSchemaError::DuplicateQuestionId { id });
        }
        self.schema = draft;
        self.revision += 1;
        Ok(out)
    }
}

fn section_mut(schema: &mut FormSchema, page: usize, section: usize) -> Result<&mut Section> {
    schema
        .pages
        .get_mut(page)
        .ok_or(FormSchemaError::PageNotFound { index: page })?
        .sections
        .get_mut(section)
        .ok_or(FormSchemaError::SectionNotFound { page, section })
}

fn find_question_mut<'a>(schema: &'a mut FormSchema, id: &str) -> Option<&'a mut Question> {
    for page in &mut schema.pages {
        for section in &mut page.sections {
            for question in &mut section.questions {
                if let Some(found) = find_in_question_mut(question, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn find_in_question_mut<'a>(question: &'a mut Question, id: &str) -> Option<&'a mut Question> {
    if question.id == id {
        return Some(question);
    }
    for sub in &mut question.questions {
        if let Some(found) = find_in_question_mut(sub, id) {
            return Some(found);
        }
    }
    None
}

fn remove_question(schema: &mut FormSchema, id: &str) -> Option<Question> {
    for page in &mut schema.pages {
        for section in &mut page.sections {
            if let Some(removed) = remove_from_list(&mut section.questions, id) {
                return Some(removed);
            }
        }
    }
    None
}

fn remove_from_list(questions: &mut Vec<Question>, id: &str) -> Option<Question> {
    if let Some(position) = questions.iter().position(|q| q.id == id) {
        return Some(questions.remove(position));
    }
    for question in questions {
        if let Some(removed) = remove_from_list(&mut question.questions, id) {
            return Some(removed);
        }
    }
    None
}

/// After removing `section`, drops its referenced form from
/// `referencedForms` unless some other section still points at the alias.
fn prune_referenced_form(schema: &mut FormSchema, removed: &Section) {
    let Some(reference) = &removed.reference else {
        return;
    };
    let alias = &reference.form;
    let still_used = schema
        .pages
        .iter()
        .flat_map(|p| p.sections.iter())
        .any(|s| s.reference.as_ref().is_some_and(|r| &r.form == alias));
    if !still_used {
        schema.referenced_forms.retain(|f| &f.alias != alias);
        tracing::debug!(alias = %alias, "pruned unused referenced form");
    }
}
