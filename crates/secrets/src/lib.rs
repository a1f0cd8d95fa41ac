//! munki-dispatch secret store adapters.
//!
//! Implements [`dispatch::SecretStore`] over two backends:
//!
//! - [`EnvironmentSecretStore`]: reads automation variables the job runner
//!   (or a local `.env` file) placed in the process environment, optionally
//!   under a common prefix.
//! - [`JsonFileSecretStore`]: reads a JSON object of exported automation
//!   variables once and serves lookups from memory.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Where the variables physically live is decided here.
//! The [`dispatch`] crate sees only [`dispatch::SecretStore`].

mod environment;
mod file;

pub use environment::EnvironmentSecretStore;
pub use file::{JsonFileSecretStore, LoadError};
