//! Port traits implemented by infrastructure crates.
//!
//! | Trait | Implemented in |
//! |-------|----------------|
//! | [`SecretStore`] | `secrets` |
//! | [`ManifestGenerator`] | `generator` |

use async_trait::async_trait;

use crate::{GenerationRequest, GeneratorError, SecretStoreError, SecretValue};

/// Lookup of named automation variables (credentials).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the value of the variable `name`.
    ///
    /// Fails with [`SecretStoreError::NotFound`] when the store has no such
    /// variable.
    async fn get_automation_variable(&self, name: &str) -> Result<SecretValue, SecretStoreError>;
}

/// The external routine that resolves group membership and writes manifests.
///
/// Called exactly once per run. A request without a serial number means
/// "every device in every group".
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ManifestGenerator: Send + Sync {
    /// Generates manifests for the devices selected by `request`.
    async fn generate(&self, request: &GenerationRequest) -> Result<(), GeneratorError>;
}
