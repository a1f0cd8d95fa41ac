//! munki-dispatch manifest generator adapters.
//!
//! Implements [`dispatch::ManifestGenerator`] two ways:
//!
//! - [`CommandManifestGenerator`]: runs the external generator program. The
//!   credentials and run id are exported into the child's environment, the
//!   group table is written to its stdin as JSON, and `--serial-number <S>`
//!   is appended for single-device runs.
//! - [`DryRunManifestGenerator`]: prints the [`GenerationPlan`] that would
//!   have been executed, with secret *names* only.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Process spawning and stdout rendering live here. The
//! [`dispatch`] crate sees only [`dispatch::ManifestGenerator`].

mod command;
mod dry_run;

pub use command::{CommandManifestGenerator, RUN_ID_VARIABLE, SERIAL_NUMBER_FLAG};
pub use dry_run::{DryRunManifestGenerator, GenerationPlan};

#[cfg(test)]
pub(crate) mod test_support {
    use dispatch::{
        Credentials, DispatchRunId, GenerationRequest, GroupTable, SecretValue, SerialNumber,
    };

    pub fn request(serial: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            run_id: DispatchRunId::from_uuid(uuid::Uuid::nil()),
            group_list: GroupTable::reference(),
            serial_number: serial.and_then(SerialNumber::new),
            credentials: Credentials {
                client_id: SecretValue::new("client-id"),
                client_secret: SecretValue::new("client-secret"),
                container_name: SecretValue::new("manifests"),
                storage_connection_string: SecretValue::new("DefaultEndpointsProtocol=https"),
                tenant_name: SecretValue::new("contoso"),
            },
        }
    }
}
