use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dispatch::{SecretStore, SecretStoreError, SecretValue};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors loading a variables file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read secrets file {}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON object of string values.
    #[error("secrets file {} is not a JSON object of strings", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Automation variables loaded from a JSON file such as
///
/// ```json
/// { "CLIENT_ID": "...", "CLIENT_SECRET": "...", "TENANT_NAME": "..." }
/// ```
///
/// The file is read once by [`JsonFileSecretStore::load`].
#[derive(Clone)]
pub struct JsonFileSecretStore {
    variables: HashMap<String, SecretValue>,
}

impl JsonFileSecretStore {
    /// Reads and parses `path`.
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, LoadError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::from_json_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            variable_count = store.variables.len(),
            "loaded automation variables file"
        );
        Ok(store)
    }

    /// Parses variables from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self {
            variables: raw
                .into_iter()
                .map(|(name, value)| (name, SecretValue::new(value)))
                .collect(),
        })
    }
}

impl std::fmt::Debug for JsonFileSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("JsonFileSecretStore")
            .field("variables", &names)
            .finish()
    }
}

#[async_trait]
impl SecretStore for JsonFileSecretStore {
    async fn get_automation_variable(&self, name: &str) -> Result<SecretValue, SecretStoreError> {
        match self.variables.get(name) {
            Some(value) => {
                debug!(name, "read automation variable from file");
                Ok(value.clone())
            }
            None => Err(SecretStoreError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_and_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"CLIENT_ID": "client-123", "TENANT_NAME": "contoso"}}"#
        )
        .unwrap();

        let store = JsonFileSecretStore::load(file.path()).await.unwrap();

        assert_eq!(
            store
                .get_automation_variable("TENANT_NAME")
                .await
                .unwrap()
                .expose(),
            "contoso"
        );
        assert_eq!(
            store.get_automation_variable("CLIENT_SECRET").await.unwrap_err(),
            SecretStoreError::NotFound {
                name: "CLIENT_SECRET".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSecretStore::load(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_error_leaves_cause_to_source() {
        use std::error::Error as _;

        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSecretStore::load(&dir.path().join("absent.json"))
            .await
            .unwrap_err();

        let cause = err.source().expect("io error is the source").to_string();
        assert!(err.to_string().ends_with("absent.json"));
        assert!(!err.to_string().contains(&cause));
    }

    #[tokio::test]
    async fn test_load_rejects_non_string_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"CLIENT_ID": 42}}"#).unwrap();

        let err = JsonFileSecretStore::load(file.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_debug_lists_names_only() {
        let store =
            JsonFileSecretStore::from_json_str(r#"{"CLIENT_SECRET": "s3cret", "CLIENT_ID": "id"}"#)
                .unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("CLIENT_ID"));
        assert!(!debug.contains("s3cret"));
    }
}
