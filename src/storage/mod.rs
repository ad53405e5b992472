//! Async persistence layer mirroring the clobdata/form-resource backend
//! surface. Transport is out of scope; these traits are the contracts the
//! builder core needs, with in-memory implementations for tests and tooling.

pub mod memory;
pub mod traits;

pub use memory::{MemoryClobStorage, MemoryFormStore};
pub use traits::{ClobStorage, FormMetadata, FormRecord, FormResource, FormStore};

use crate::Result;
use crate::types::{FormSchema, TranslationFile};

/// Serializes a schema and stores it as a clob, returning the value
/// reference to record on the form resource.
pub async fn save_schema(clobs: &dyn ClobStorage, schema: &FormSchema) -> Result<String> {
    let content = serde_json::to_string_pretty(schema)?;
    clobs.store(content).await
}

pub async fn load_schema(
    clobs: &dyn ClobStorage,
    value_reference: &str,
) -> Result<Option<FormSchema>> {
    match clobs.fetch(value_reference).await? {
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
        None => Ok(None),
    }
}

pub async fn save_translation(
    clobs: &dyn ClobStorage,
    translation: &TranslationFile,
) -> Result<String> {
    let content = serde_json::to_string_pretty(translation)?;
    clobs.store(content).await
}

pub async fn load_translation(
    clobs: &dyn ClobStorage,
    value_reference: &str,
) -> Result<Option<TranslationFile>> {
    match clobs.fetch(value_reference).await? {
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
        None => Ok(None),
    }
}
