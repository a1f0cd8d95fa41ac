//! Execution mode and the request handed to the generator.

use serde::Serialize;

use crate::{Credentials, DispatchRunId, GroupTable, SerialNumber, TriggerError, WebhookPayload};

/// What a run generates manifests for. Decided once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Webhook run: one device.
    SingleDevice {
        /// Device named in the webhook body.
        serial: SerialNumber,
    },
    /// Scheduled run: every device.
    FleetWide,
}

impl ExecutionMode {
    /// Derives the mode from the optional invocation argument.
    ///
    /// Any argument at all selects [`ExecutionMode::SingleDevice`], so a
    /// malformed argument is an error rather than a fall-back to a fleet run.
    pub fn from_invocation_argument(argument: Option<&str>) -> Result<Self, TriggerError> {
        match argument {
            None => Ok(ExecutionMode::FleetWide),
            Some(raw) => {
                let payload = WebhookPayload::from_invocation_argument(raw)?;
                Ok(ExecutionMode::SingleDevice {
                    serial: payload.serial,
                })
            }
        }
    }

    /// Serial number filter, if any.
    pub fn serial_number(&self) -> Option<&SerialNumber> {
        match self {
            ExecutionMode::SingleDevice { serial } => Some(serial),
            ExecutionMode::FleetWide => None,
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionMode::SingleDevice { .. } => "single_device",
            ExecutionMode::FleetWide => "fleet_wide",
        }
    }
}

/// Everything the generator receives for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Correlation id of this run.
    pub run_id: DispatchRunId,
    /// Group table, in declaration order.
    pub group_list: GroupTable,
    /// `Some` for single-device runs, `None` for fleet runs.
    pub serial_number: Option<SerialNumber>,
    /// Resolved credentials.
    pub credentials: Credentials,
}

impl GenerationRequest {
    /// The mode this request was built for.
    pub fn execution_mode(&self) -> ExecutionMode {
        match &self.serial_number {
            Some(serial) => ExecutionMode::SingleDevice {
                serial: serial.clone(),
            },
            None => ExecutionMode::FleetWide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_argument_is_fleet_wide() {
        let mode = ExecutionMode::from_invocation_argument(None).unwrap();
        assert_eq!(mode, ExecutionMode::FleetWide);
        assert!(mode.serial_number().is_none());
        assert_eq!(mode.label(), "fleet_wide");
    }

    #[test]
    fn test_present_argument_is_single_device() {
        let mode =
            ExecutionMode::from_invocation_argument(Some(r#"x,RequestBody:{"serial":"S1"}"#))
                .unwrap();
        assert_eq!(mode.serial_number().map(SerialNumber::as_str), Some("S1"));
        assert_eq!(mode.label(), "single_device");
    }

    #[test]
    fn test_malformed_argument_does_not_fall_back() {
        assert!(ExecutionMode::from_invocation_argument(Some("")).is_err());
    }
}
