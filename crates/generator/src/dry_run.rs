use async_trait::async_trait;
use dispatch::{
    DispatchRunId, GenerationRequest, GeneratorError, GroupTable, ManifestGenerator, SecretName,
    SerialNumber,
};
use serde::Serialize;
use tracing::info;

use crate::RUN_ID_VARIABLE;

/// What a generator would be asked to do, minus the secret values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    /// Run correlation id.
    pub run_id: DispatchRunId,
    /// [`ExecutionMode::label`](dispatch::ExecutionMode::label) of the request.
    pub mode: &'static str,
    /// Serial filter, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<SerialNumber>,
    /// Group table in declaration order.
    pub group_list: GroupTable,
    /// Environment variables that would be exported to the generator.
    pub environment: Vec<&'static str>,
}

impl GenerationPlan {
    /// Builds the plan for `request`.
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            run_id: request.run_id,
            mode: request.execution_mode().label(),
            serial_number: request.serial_number.clone(),
            group_list: request.group_list.clone(),
            environment: SecretName::ALL
                .iter()
                .map(|name| name.as_str())
                .chain(std::iter::once(RUN_ID_VARIABLE))
                .collect(),
        }
    }
}

/// Prints the [`GenerationPlan`] as pretty JSON instead of generating.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunManifestGenerator;

#[async_trait]
impl ManifestGenerator for DryRunManifestGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<(), GeneratorError> {
        let plan = GenerationPlan::from_request(request);
        let rendered = serde_json::to_string_pretty(&plan).map_err(|e| GeneratorError::Failed {
            message: format!("failed to render generation plan: {e}"),
        })?;

        info!(mode = plan.mode, "dry run: manifest generator not invoked");
        println!("{rendered}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::request;

    #[test]
    fn test_plan_for_single_device() {
        let plan = GenerationPlan::from_request(&request(Some("ABC123")));

        assert_eq!(plan.mode, "single_device");
        assert_eq!(plan.serial_number.as_ref().map(|s| s.as_str()), Some("ABC123"));
        assert_eq!(plan.group_list, GroupTable::reference());
        assert_eq!(
            plan.environment,
            [
                "CLIENT_ID",
                "CLIENT_SECRET",
                "CONTAINER_NAME",
                "AZURE_STORAGE_CONNECTION_STRING",
                "TENANT_NAME",
                "MUNKI_DISPATCH_RUN_ID"
            ]
        );
    }

    #[test]
    fn test_plan_mode_matches_execution_mode_label() {
        for serial in [Some("ABC123"), None] {
            let request = request(serial);
            let plan = GenerationPlan::from_request(&request);
            assert_eq!(plan.mode, request.execution_mode().label());
        }
    }

    #[test]
    fn test_plan_json_has_no_secret_values() {
        let plan = GenerationPlan::from_request(&request(None));
        let json = serde_json::to_string(&plan).unwrap();

        assert!(json.contains(r#""mode":"fleet_wide""#));
        assert!(!json.contains("serial_number"));
        assert!(!json.contains("client-secret"));
        assert!(!json.contains("contoso"));
    }

    #[tokio::test]
    async fn test_dry_run_succeeds() {
        DryRunManifestGenerator
            .generate(&request(Some("ABC123")))
            .await
            .unwrap();
    }
}
