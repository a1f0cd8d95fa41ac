//! Error types for the dispatch domain.
//!
//! [`DispatchError`] is the only error returned by [`crate::Dispatcher::run`].
//! Its variants mirror the three ways a run can end early: a malformed
//! trigger, a missing secret, or a failing generator. Port-level errors
//! ([`SecretStoreError`], [`GeneratorError`]) are produced by adapter crates
//! and folded into [`DispatchError`] by the dispatcher.
//!
//! Nothing in this module is retried. Every error terminates the run.

use thiserror::Error;

use crate::credentials::SecretName;

// ---------------------------------------------------------------------------
// Trigger parsing
// ---------------------------------------------------------------------------

/// Reasons a webhook invocation argument could not be turned into a payload.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The argument has no `,` so there is no second envelope field.
    #[error("invocation argument has no request body field")]
    MissingRequestBody,

    /// The second envelope field does not start with `RequestBody:`.
    #[error("second envelope field is not labelled 'RequestBody:'")]
    MissingRequestBodyLabel,

    /// Nothing follows the `RequestBody:` label.
    #[error("request body is empty")]
    EmptyRequestBody,

    /// The request body is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Something other than another envelope field follows the JSON body.
    #[error("unexpected data after request body")]
    TrailingData,

    /// The request body is valid JSON but not an object.
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// The payload object has no `serial` field.
    #[error("request body has no 'serial' field")]
    MissingSerial,

    /// `serial` is present but not a non-empty string.
    #[error("'serial' must be a non-empty string")]
    InvalidSerial,
}

// ---------------------------------------------------------------------------
// Group table
// ---------------------------------------------------------------------------

/// Violations of the group table invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupTableError {
    /// The table has no entries; the generator would have nothing to assign.
    #[error("group table must contain at least one group")]
    Empty,

    /// Two entries share the same group id.
    #[error("duplicate group id '{group_id}' at positions {first} and {second}")]
    DuplicateGroupId {
        /// The repeated id.
        group_id: String,
        /// Zero-based index of the first occurrence.
        first: usize,
        /// Zero-based index of the repeat.
        second: usize,
    },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Errors returned by a [`crate::SecretStore`] implementation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretStoreError {
    /// The named variable does not exist in the store.
    #[error("automation variable '{name}' not found")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// The store itself failed (unreadable file, non-UTF-8 value, ...).
    #[error("secret store failure: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

/// Errors returned by a [`crate::ManifestGenerator`] implementation.
///
/// The dispatcher treats these as opaque and hands them back to the caller
/// unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// The generator could not be started.
    #[error("failed to launch manifest generator '{program}': {message}")]
    Launch {
        /// Program that was launched.
        program: String,
        /// Underlying failure.
        message: String,
    },

    /// The generator ran and reported failure.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("manifest generator exited with status {}", display_code(.code))]
    Exited {
        /// Process exit code, if any.
        code: Option<i32>,
    },

    /// I/O failure while talking to a running generator.
    #[error("manifest generator I/O error: {message}")]
    Io {
        /// Underlying failure.
        message: String,
    },

    /// Any other generator-reported failure.
    #[error("manifest generation failed: {message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "<signal>".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Errors that end a dispatch run.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The webhook argument could not be parsed. Raised before any secret
    /// lookup.
    #[error("malformed trigger: {0}")]
    MalformedTrigger(#[from] TriggerError),

    /// A required secret is absent from the store. The generator is not
    /// called.
    #[error("required secret '{name}' not found")]
    SecretNotFound {
        /// The missing secret.
        name: SecretName,
    },

    /// The secret store failed while resolving `name`. The generator is not
    /// called.
    #[error("secret store failed while resolving '{name}': {message}")]
    SecretStore {
        /// The secret being resolved.
        name: SecretName,
        /// Description of the failure.
        message: String,
    },

    /// The generator reported failure.
    #[error(transparent)]
    GeneratorFailure(#[from] GeneratorError),
}

impl DispatchError {
    /// Exit code the process should terminate with for this error.
    ///
    /// A generator that exited non-zero keeps its own code; everything else
    /// maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::GeneratorFailure(GeneratorError::Exited { code: Some(code) })
                if *code != 0 =>
            {
                *code
            }
            _ => 1,
        }
    }
}
