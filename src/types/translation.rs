use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Downloadable/uploadable translation bundle for one form and language.
/// Keys are sorted so repeated downloads diff cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationFile {
    pub uuid: String,
    pub form: String,
    pub description: String,
    pub language: String,
    pub translations: BTreeMap<String, String>,
}

impl TranslationFile {
    pub fn new(
        uuid: impl Into<String>,
        form: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let form = form.into();
        let language = language.into();
        Self {
            uuid: uuid.into(),
            description: format!("{language} translations for '{form}'"),
            form,
            language,
            translations: BTreeMap::new(),
        }
    }

    pub fn with_translation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations.insert(key.into(), value.into());
        self
    }

    /// Download file name: `<formName>_translations_<langCode>.json`, with
    /// spaces in the form name flattened to underscores.
    pub fn file_name(&self) -> String {
        format!(
            "{}_translations_{}.json",
            self.form.replace(' ', "_"),
            self.language
        )
    }
}
