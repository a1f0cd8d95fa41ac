use std::env::{self, VarError};

use async_trait::async_trait;
use dispatch::{SecretStore, SecretStoreError, SecretValue};
use tracing::{debug, instrument};

/// Reads automation variables from the process environment.
///
/// A lookup of `CLIENT_ID` with prefix `MUNKI_` reads `MUNKI_CLIENT_ID`.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSecretStore {
    prefix: String,
}

impl EnvironmentSecretStore {
    /// Creates a store that reads variables named `<prefix><name>`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `name`.
    pub fn variable_for(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

#[async_trait]
impl SecretStore for EnvironmentSecretStore {
    #[instrument(skip(self))]
    async fn get_automation_variable(&self, name: &str) -> Result<SecretValue, SecretStoreError> {
        let variable = self.variable_for(name);
        match env::var(&variable) {
            Ok(value) => {
                debug!(variable = %variable, "read automation variable from environment");
                Ok(SecretValue::new(value))
            }
            Err(VarError::NotPresent) => Err(SecretStoreError::NotFound {
                name: name.to_string(),
            }),
            Err(VarError::NotUnicode(_)) => Err(SecretStoreError::Backend {
                message: format!("environment variable '{variable}' is not valid UTF-8"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_prefixed_variable() {
        env::set_var("SECRETS_TEST_ENV_A_CLIENT_ID", "client-123");
        let store = EnvironmentSecretStore::new("SECRETS_TEST_ENV_A_");

        let value = store.get_automation_variable("CLIENT_ID").await.unwrap();

        assert_eq!(value.expose(), "client-123");
    }

    #[tokio::test]
    async fn test_missing_variable_is_not_found() {
        let store = EnvironmentSecretStore::new("SECRETS_TEST_ENV_B_");

        let err = store.get_automation_variable("TENANT_NAME").await.unwrap_err();

        assert_eq!(
            err,
            SecretStoreError::NotFound {
                name: "TENANT_NAME".to_string()
            }
        );
    }

    #[test]
    fn test_variable_for_without_prefix() {
        assert_eq!(
            EnvironmentSecretStore::default().variable_for("CONTAINER_NAME"),
            "CONTAINER_NAME"
        );
    }
}
