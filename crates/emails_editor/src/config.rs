use crate::error::EditorError;
use serde::Deserialize;

/// Construction options for an [`EmailsEditor`](crate::EmailsEditor).
///
/// Deserializable from host data (TOML or JSON) with camelCase keys. The
/// change listener is deliberately not part of it: a listener supplied as
/// data (`onChange = ...`) is an unknown field and fails to load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EditorConfig {
    /// Extra class names appended to the root's `class` attribute.
    pub class_name: String,
    /// Shown while the token list is empty.
    pub placeholder: String,
    /// Shown once at least one token exists.
    pub add_more_placeholder: String,
    #[serde(alias = "emails")]
    pub initial_emails: Vec<String>,
}

impl EditorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, EditorError> {
        toml::from_str(source).map_err(|err| EditorError::Config(err.to_string()))
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, EditorError> {
        serde_json::from_value(value).map_err(|err| EditorError::Config(err.to_string()))
    }

    pub(crate) fn root_class(&self) -> String {
        let extra = self.class_name.trim();
        if extra.is_empty() {
            crate::chip::ROOT_CLASS.to_string()
        } else {
            format!("{} {extra}", crate::chip::ROOT_CLASS)
        }
    }
}
