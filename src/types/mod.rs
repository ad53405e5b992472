pub mod question;
pub mod rule;
pub mod schema;
pub mod translation;

pub use question::{
    Answer, CalculateProperty, ConceptMapping, HideProperty, Question, QuestionOptions,
    QuestionType, Rendering, Validator,
};
pub use rule::{
    ActionCondition, FormRule, LogicalOperator, RuleAction, RuleCondition, TargetCondition,
};
pub use schema::{FormSchema, Page, ReferencedForm, Section, SectionReference};
pub use translation::TranslationFile;
