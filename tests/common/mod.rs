use openmrs_formschema::*;

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[allow(dead_code)]
pub fn create_test_schema() -> FormSchema {
    FormSchema::new("Adult Intake", "form-uuid-1")
        .with_encounter_type("encounter-uuid-1")
        .with_page(
            Page::new("Demographics")
                .with_section(
                    Section::new("Basics")
                        .with_question(create_number_question("age", "Age"))
                        .with_question(create_select_question("sex", "Sex")),
                )
                .with_section(
                    Section::new("Contact").with_question(create_text_question("phone", "Phone")),
                ),
        )
        .with_page(
            Page::new("Vitals").with_section(
                Section::new("Measurements")
                    .with_question(create_number_question("weight", "Weight (kg)")),
            ),
        )
}

#[allow(dead_code)]
pub fn create_text_question(id: &str, label: &str) -> Question {
    Question::new(id, label, QuestionType::Obs).with_rendering(Rendering::Text)
}

#[allow(dead_code)]
pub fn create_number_question(id: &str, label: &str) -> Question {
    Question::new(id, label, QuestionType::Obs).with_options(QuestionOptions {
        rendering: Rendering::Number,
        concept: Some(format!("{id}-concept-uuid")),
        min: Some("0".to_string()),
        max: Some("120".to_string()),
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn create_select_question(id: &str, label: &str) -> Question {
    Question::new(id, label, QuestionType::Obs).with_options(QuestionOptions {
        rendering: Rendering::Select,
        concept: Some(format!("{id}-concept-uuid")),
        answers: vec![
            Answer {
                concept: "female-uuid".to_string(),
                label: "Female".to_string(),
            },
            Answer {
                concept: "male-uuid".to_string(),
                label: "Male".to_string(),
            },
        ],
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn create_referencing_section(label: &str, alias: &str) -> Section {
    Section::new(label).with_reference(SectionReference {
        form: alias.to_string(),
        page: "Demographics".to_string(),
        section: "Basics".to_string(),
        exclude_questions: Vec::new(),
    })
}
