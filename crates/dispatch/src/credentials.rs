//! Credential resolution.
//!
//! The generator needs five automation variables. They are resolved once, in a
//! fixed order, and collected into a [`Credentials`] value that travels inside
//! the [`crate::GenerationRequest`] instead of through process-wide state.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{DispatchError, SecretStore, SecretStoreError};

/// The automation variables the generator requires, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecretName {
    /// App registration client id used by the generator to query the directory.
    #[serde(rename = "CLIENT_ID")]
    ClientId,
    /// App registration client secret.
    #[serde(rename = "CLIENT_SECRET")]
    ClientSecret,
    /// Storage container that receives the manifests.
    #[serde(rename = "CONTAINER_NAME")]
    ContainerName,
    /// Connection string of the storage account.
    #[serde(rename = "AZURE_STORAGE_CONNECTION_STRING")]
    AzureStorageConnectionString,
    /// Directory tenant name.
    #[serde(rename = "TENANT_NAME")]
    TenantName,
}

impl SecretName {
    /// Every required name, in the order they are resolved.
    pub const ALL: [SecretName; 5] = [
        SecretName::ClientId,
        SecretName::ClientSecret,
        SecretName::ContainerName,
        SecretName::AzureStorageConnectionString,
        SecretName::TenantName,
    ];

    /// Variable name as stored in the secret store and exported to the
    /// generator's environment.
    pub fn as_str(self) -> &'static str {
        match self {
            SecretName::ClientId => "CLIENT_ID",
            SecretName::ClientSecret => "CLIENT_SECRET",
            SecretName::ContainerName => "CONTAINER_NAME",
            SecretName::AzureStorageConnectionString => "AZURE_STORAGE_CONNECTION_STRING",
            SecretName::TenantName => "TENANT_NAME",
        }
    }
}

impl std::fmt::Display for SecretName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secret string. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    /// Wraps a resolved secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret in clear text.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(<redacted>)")
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

/// The complete, resolved credential set handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// `CLIENT_ID`
    pub client_id: SecretValue,
    /// `CLIENT_SECRET`
    pub client_secret: SecretValue,
    /// `CONTAINER_NAME`
    pub container_name: SecretValue,
    /// `AZURE_STORAGE_CONNECTION_STRING`
    pub storage_connection_string: SecretValue,
    /// `TENANT_NAME`
    pub tenant_name: SecretValue,
}

impl Credentials {
    /// Returns the value resolved for `name`.
    pub fn get(&self, name: SecretName) -> &SecretValue {
        match name {
            SecretName::ClientId => &self.client_id,
            SecretName::ClientSecret => &self.client_secret,
            SecretName::ContainerName => &self.container_name,
            SecretName::AzureStorageConnectionString => &self.storage_connection_string,
            SecretName::TenantName => &self.tenant_name,
        }
    }

    /// `(variable name, clear-text value)` pairs in resolution order, ready to
    /// be exported into a child process environment.
    pub fn env_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        SecretName::ALL
            .into_iter()
            .map(move |name| (name.as_str(), self.get(name).expose()))
    }
}

/// Resolves every [`SecretName`] from `store`, in order.
///
/// Stops at the first failure; names after the failing one are never looked
/// up.
#[instrument(skip_all)]
pub async fn resolve_credentials(store: &dyn SecretStore) -> Result<Credentials, DispatchError> {
    Ok(Credentials {
        client_id: resolve(store, SecretName::ClientId).await?,
        client_secret: resolve(store, SecretName::ClientSecret).await?,
        container_name: resolve(store, SecretName::ContainerName).await?,
        storage_connection_string: resolve(store, SecretName::AzureStorageConnectionString)
            .await?,
        tenant_name: resolve(store, SecretName::TenantName).await?,
    })
}

async fn resolve(store: &dyn SecretStore, name: SecretName) -> Result<SecretValue, DispatchError> {
    match store.get_automation_variable(name.as_str()).await {
        Ok(value) => {
            debug!(secret = %name, "resolved automation variable");
            Ok(value)
        }
        Err(SecretStoreError::NotFound { .. }) => Err(DispatchError::SecretNotFound { name }),
        Err(SecretStoreError::Backend { message }) => {
            Err(DispatchError::SecretStore { name, message })
        }
    }
}
