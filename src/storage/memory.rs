use async_trait::async_trait;
use papaya::HashMap as PapayaMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Result;
use crate::error::FormSchemaError;
use crate::storage::{ClobStorage, FormMetadata, FormRecord, FormResource, FormStore};

/// In-memory clobdata store. Value references are generated v4 uuids.
#[derive(Debug, Default)]
pub struct MemoryClobStorage {
    clobs: PapayaMap<String, String>,
}

impl MemoryClobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clobs.is_empty()
    }
}

#[async_trait]
impl ClobStorage for MemoryClobStorage {
    async fn store(&self, content: String) -> Result<String> {
        let value_reference = Uuid::new_v4().to_string();
        let guard = self.clobs.pin();
        guard.insert(value_reference.clone(), content);
        tracing::debug!(value_reference = %value_reference, "stored clob");
        Ok(value_reference)
    }

    async fn fetch(&self, value_reference: &str) -> Result<Option<String>> {
        let guard = self.clobs.pin();
        Ok(guard.get(value_reference).cloned())
    }

    async fn delete(&self, value_reference: &str) -> Result<bool> {
        let guard = self.clobs.pin();
        Ok(guard.remove(value_reference).is_some())
    }

    async fn contains(&self, value_reference: &str) -> Result<bool> {
        let guard = self.clobs.pin();
        Ok(guard.contains_key(value_reference))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let guard = self.clobs.pin();
        Ok(guard.keys().cloned().collect())
    }
}

/// In-memory form metadata/resource records.
#[derive(Debug, Default)]
pub struct MemoryFormStore {
    forms: Arc<RwLock<HashMap<String, FormRecord>>>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.forms.read().await.len()
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn create_form(&self, metadata: FormMetadata) -> Result<String> {
        let uuid = Uuid::new_v4().to_string();
        let mut forms = self.forms.write().await;
        tracing::debug!(form = %metadata.name, uuid = %uuid, "created form record");
        forms.insert(
            uuid.clone(),
            FormRecord {
                uuid: uuid.clone(),
                metadata,
                resources: HashMap::new(),
            },
        );
        Ok(uuid)
    }

    async fn get_form(&self, form_uuid: &str) -> Result<Option<FormRecord>> {
        let forms = self.forms.read().await;
        Ok(forms.get(form_uuid).cloned())
    }

    async fn list_forms(&self) -> Result<Vec<FormRecord>> {
        let forms = self.forms.read().await;
        Ok(forms.values().cloned().collect())
    }

    async fn attach_resource(&self, form_uuid: &str, resource: FormResource) -> Result<String> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(form_uuid)
            .ok_or_else(|| FormSchemaError::storage(format!("no form with uuid {form_uuid}")))?;
        let resource_uuid = Uuid::new_v4().to_string();
        form.resources.insert(resource_uuid.clone(), resource);
        Ok(resource_uuid)
    }

    async fn delete_resource(&self, form_uuid: &str, resource_uuid: &str) -> Result<bool> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(form_uuid)
            .ok_or_else(|| FormSchemaError::storage(format!("no form with uuid {form_uuid}")))?;
        Ok(form.resources.remove(resource_uuid).is_some())
    }

    async fn set_published(&self, form_uuid: &str, published: bool) -> Result<()> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(form_uuid)
            .ok_or_else(|| FormSchemaError::storage(format!("no form with uuid {form_uuid}")))?;
        form.metadata.published = published;
        tracing::debug!(uuid = %form_uuid, published, "toggled publish state");
        Ok(())
    }

    async fn delete_form(&self, form_uuid: &str) -> Result<bool> {
        let mut forms = self.forms.write().await;
        Ok(forms.remove(form_uuid).is_some())
    }
}

impl Clone for MemoryFormStore {
    fn clone(&self) -> Self {
        Self {
            forms: Arc::clone(&self.forms),
        }
    }
}
