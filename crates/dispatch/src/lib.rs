//! Trigger-and-dispatch domain for munki-dispatch.
//!
//! A run is started either by a webhook (one device) or by a schedule (the
//! whole fleet). This crate decides which, resolves the credentials the
//! manifest generator needs, and hands the generator an explicit
//! [`GenerationRequest`]. The generator itself and the secret store are
//! reached only through the traits in [`ports`].
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; the `secrets` and `generator` crates define
//! *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`GroupId`, `SerialNumber`, `DispatchRunId`, ...) |
//! | [`groups`] | `GroupMapping` and the ordered, validated `GroupTable` |
//! | [`trigger`] | Webhook envelope parser |
//! | [`credentials`] | Secret names, redacted values, credential resolution |
//! | [`request`] | `ExecutionMode` and `GenerationRequest` |
//! | [`ports`] | `SecretStore` and `ManifestGenerator` traits |
//! | [`dispatcher`] | `Dispatcher::run` |
//! | [`errors`] | Error types |

pub mod credentials;
pub mod dispatcher;
pub mod errors;
pub mod groups;
pub mod identifiers;
pub mod ports;
pub mod request;
pub mod trigger;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use credentials::{resolve_credentials, Credentials, SecretName, SecretValue};
pub use dispatcher::Dispatcher;
pub use errors::{DispatchError, GeneratorError, GroupTableError, SecretStoreError, TriggerError};
pub use groups::{GroupMapping, GroupTable};
pub use identifiers::{CatalogName, DispatchRunId, GroupId, GroupType, ManifestName, SerialNumber};
pub use ports::{ManifestGenerator, SecretStore};
pub use request::{ExecutionMode, GenerationRequest};
pub use trigger::WebhookPayload;

#[cfg(any(test, feature = "testing"))]
pub use ports::{MockManifestGenerator, MockSecretStore};
