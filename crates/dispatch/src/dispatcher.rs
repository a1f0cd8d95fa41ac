//! The dispatcher: one decision, one generator call.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    credentials::resolve_credentials, DispatchError, DispatchRunId, ExecutionMode,
    GenerationRequest, GroupTable, ManifestGenerator, SecretStore,
};

/// Decides between a single-device and a fleet-wide run and invokes the
/// generator accordingly.
///
/// Flow:
/// 1. Derive the [`ExecutionMode`] from the invocation argument
/// 2. Resolve credentials from the secret store
/// 3. Build the [`GenerationRequest`] from the injected group table
/// 4. Call the generator once and return its result
pub struct Dispatcher {
    run_id: DispatchRunId,
    secret_store: Arc<dyn SecretStore>,
    generator: Arc<dyn ManifestGenerator>,
    group_list: GroupTable,
}

impl Dispatcher {
    /// Creates a dispatcher with a fresh run id.
    pub fn new(
        secret_store: Arc<dyn SecretStore>,
        generator: Arc<dyn ManifestGenerator>,
        group_list: GroupTable,
    ) -> Self {
        Self::with_run_id(DispatchRunId::new_random(), secret_store, generator, group_list)
    }

    /// Creates a dispatcher with a caller-chosen run id.
    pub fn with_run_id(
        run_id: DispatchRunId,
        secret_store: Arc<dyn SecretStore>,
        generator: Arc<dyn ManifestGenerator>,
        group_list: GroupTable,
    ) -> Self {
        Self {
            run_id,
            secret_store,
            generator,
            group_list,
        }
    }

    /// Id attached to this dispatcher's spans and requests.
    pub fn run_id(&self) -> DispatchRunId {
        self.run_id
    }

    /// Runs the dispatch for `invocation_argument`.
    ///
    /// A malformed argument fails before any secret is looked up; a missing
    /// secret fails before the generator is called. Generator errors are
    /// returned as [`DispatchError::GeneratorFailure`] without further
    /// interpretation.
    pub async fn run(&self, invocation_argument: Option<&str>) -> Result<(), DispatchError> {
        let mode = ExecutionMode::from_invocation_argument(invocation_argument)?;
        self.dispatch(mode).await
    }

    /// Runs the dispatch for an already-parsed `mode`.
    ///
    /// Callers that need to reject a malformed trigger before doing any other
    /// work parse it themselves and enter here.
    #[instrument(skip_all, fields(run_id = %self.run_id, mode = mode.label()))]
    pub async fn dispatch(&self, mode: ExecutionMode) -> Result<(), DispatchError> {
        let credentials = resolve_credentials(self.secret_store.as_ref()).await?;

        let request = GenerationRequest {
            run_id: self.run_id,
            group_list: self.group_list.clone(),
            serial_number: mode.serial_number().cloned(),
            credentials,
        };

        match &request.serial_number {
            Some(serial) => info!(
                serial = %serial,
                group_count = request.group_list.len(),
                "dispatching single-device manifest generation"
            ),
            None => info!(
                group_count = request.group_list.len(),
                "dispatching fleet-wide manifest generation"
            ),
        }

        self.generator.generate(&request).await?;

        info!("manifest generation completed");
        Ok(())
    }
}
