use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormSchemaError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Duplicate question id: {id}")]
    DuplicateQuestionId { id: String },

    #[error("Question not found: {id}")]
    QuestionNotFound { id: String },

    #[error("Page index out of range: {index}")]
    PageNotFound { index: usize },

    #[error("Section index out of range: page {page}, section {section}")]
    SectionNotFound { page: usize, section: usize },

    #[error("Mutation error: {message}")]
    Mutation { message: String },

    #[error("Rule error: {message}")]
    Rule { message: String },

    #[error("Expression error: {message}")]
    Expression { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormSchemaError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation {
            message: message.into(),
        }
    }

    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormSchemaError>;
