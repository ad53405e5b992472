use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Result;

/// Form metadata record, the shape posted to create or publish a form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub published: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub encounter_type: String,
}

/// Resource attached to a form, pointing at a stored clob by value
/// reference (e.g. the schema JSON, or a translation bundle).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormResource {
    pub name: String,
    pub data_type: String,
    pub value_reference: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    pub uuid: String,
    pub metadata: FormMetadata,
    /// Resource uuid -> resource.
    pub resources: HashMap<String, FormResource>,
}

/// Generic large-text-blob storage, the clobdata surface: content in, opaque
/// value reference out.
#[async_trait]
pub trait ClobStorage: Send + Sync {
    async fn store(&self, content: String) -> Result<String>;
    async fn fetch(&self, value_reference: &str) -> Result<Option<String>>;
    async fn delete(&self, value_reference: &str) -> Result<bool>;
    async fn contains(&self, value_reference: &str) -> Result<bool>;
    async fn list(&self) -> Result<Vec<String>>;
}

/// Form metadata and resource records: create, attach/detach resources,
/// publish toggle, delete.
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn create_form(&self, metadata: FormMetadata) -> Result<String>;
    async fn get_form(&self, form_uuid: &str) -> Result<Option<FormRecord>>;
    async fn list_forms(&self) -> Result<Vec<FormRecord>>;
    async fn attach_resource(&self, form_uuid: &str, resource: FormResource) -> Result<String>;
    async fn delete_resource(&self, form_uuid: &str, resource_uuid: &str) -> Result<bool>;
    async fn set_published(&self, form_uuid: &str, published: bool) -> Result<()>;
    async fn delete_form(&self, form_uuid: &str) -> Result<bool>;
}

impl FormMetadata {
    pub fn new(name: impl Into<String>, encounter_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            published: false,
            description: None,
            encounter_type: encounter_type.into(),
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
}

impl FormResource {
    /// The conventional resource record pointing at a form's schema clob.
    pub fn json_schema(value_reference: impl Into<String>) -> Self {
        Self {
            name: "JSON schema".to_string(),
            data_type: "AmpathJsonSchema".to_string(),
            value_reference: value_reference.into(),
        }
    }
}
