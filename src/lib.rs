//! # OpenMRS FormSchema
//!
//! Schema management core for OpenMRS-style clinical form builders: the
//! JSON data model for pages/sections/questions, an owning mutation store,
//! a cursor resolver for raw-JSON editor sync, a conditional-logic rule
//! engine, and question type/rendering coercion.
//!
//! ## Quick Start
//!
//! ```rust
//! use openmrs_formschema::*;
//!
//! # fn example() -> Result<()> {
//! let schema = FormSchema::new("Adult Intake", "form-uuid").with_page(
//!     Page::new("Demographics")
//!         .with_section(Section::new("Basics").with_question(Question::new(
//!             "age",
//!             "Age",
//!             QuestionType::Obs,
//!         ))),
//! );
//!
//! let mut store = SchemaStore::new(schema);
//! store.set_required("age", true)?;
//!
//! // Map an editor cursor back to schema coordinates.
//! let text = store.to_json_pretty()?;
//! let line = locate_line(&text, Some(0), Some(0), Some(0));
//! assert!(line > 0);
//! # Ok(())
//! # }
//! ```

pub mod coercion;
pub mod cursor;
pub mod error;
pub mod rules;
pub mod storage;
pub mod store;
pub mod types;

pub use coercion::{clean_question_for_rendering, clean_question_for_type};
pub use cursor::{CursorInfo, CursorKind, locate_line, resolve_cursor};
pub use error::Result; // Our Result type takes precedence
pub use error::FormSchemaError;
pub use rules::{CanonicalCompiler, ExpressionCompiler, RuleBuilder, RuleEngine};
pub use storage::{
    ClobStorage, FormMetadata, FormRecord, FormResource, FormStore, MemoryClobStorage,
    MemoryFormStore, load_schema, load_translation, save_schema, save_translation,
};
pub use store::SchemaStore;
pub use types::*;
