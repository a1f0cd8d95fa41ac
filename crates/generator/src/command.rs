use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use dispatch::{GenerationRequest, GeneratorError, ManifestGenerator};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Environment variable carrying the dispatcher's run id into the generator.
pub const RUN_ID_VARIABLE: &str = "MUNKI_DISPATCH_RUN_ID";

/// Flag appended, with the serial number, for single-device runs.
pub const SERIAL_NUMBER_FLAG: &str = "--serial-number";

/// Runs an external manifest generator program once per request.
///
/// Child process contract:
/// - argv: the configured `args`, then `--serial-number <S>` when the run is
///   restricted to one device
/// - environment: inherited, plus the five credential variables and
///   [`RUN_ID_VARIABLE`]; the parent's environment is left untouched
/// - stdin: the group table as a JSON array of `{id, name, catalog, type}`
/// - exit status: zero means success
#[derive(Debug, Clone)]
pub struct CommandManifestGenerator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandManifestGenerator {
    /// Creates a generator that runs `program` with `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, request: &GenerationRequest) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(request.credentials.env_pairs())
            .env(RUN_ID_VARIABLE, request.run_id.to_string())
            .stdin(Stdio::piped())
            .kill_on_drop(true);

        if let Some(serial) = &request.serial_number {
            command.arg(SERIAL_NUMBER_FLAG).arg(serial.as_str());
        }

        command
    }
}

#[async_trait]
impl ManifestGenerator for CommandManifestGenerator {
    #[instrument(skip_all, fields(program = %self.program.display(), run_id = %request.run_id))]
    async fn generate(&self, request: &GenerationRequest) -> Result<(), GeneratorError> {
        let group_list =
            serde_json::to_vec(&request.group_list).map_err(|e| GeneratorError::Failed {
                message: format!("failed to encode group list: {e}"),
            })?;

        let mut child = self
            .command(request)
            .spawn()
            .map_err(|e| GeneratorError::Launch {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(pid = child.id(), "manifest generator started");

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&group_list).await {
                Ok(()) => {}
                // The generator is free to ignore its input.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("manifest generator closed stdin before reading the group list");
                }
                Err(e) => {
                    return Err(GeneratorError::Io {
                        message: format!("failed to write group list: {e}"),
                    })
                }
            }
        }

        let status = child.wait().await.map_err(|e| GeneratorError::Io {
            message: format!("failed to wait for manifest generator: {e}"),
        })?;

        if status.success() {
            info!("manifest generator exited successfully");
            Ok(())
        } else {
            warn!(code = ?status.code(), "manifest generator failed");
            Err(GeneratorError::Exited {
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::request;

    fn shell(script: &str) -> CommandManifestGenerator {
        // `sh -c SCRIPT NAME ARGS...` binds NAME to $0 and ARGS to $1...
        CommandManifestGenerator::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "generator".to_string()],
        )
    }

    #[tokio::test]
    async fn test_single_device_passes_serial_and_credentials() {
        let generator = shell(
            r#"input=$(cat)
               [ "$#" -eq 2 ] || exit 10
               [ "$1" = "--serial-number" ] || exit 11
               [ "$2" = "ABC123" ] || exit 12
               [ "$CLIENT_ID" = "client-id" ] || exit 13
               [ "$TENANT_NAME" = "contoso" ] || exit 14
               [ "$MUNKI_DISPATCH_RUN_ID" = "00000000-0000-0000-0000-000000000000" ] || exit 15
               case "$input" in *id_of_aad_group_1*id_of_aad_group_2*) ;; *) exit 16 ;; esac"#,
        );

        generator.generate(&request(Some("ABC123"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_fleet_wide_passes_no_serial() {
        let generator = shell(r#"cat > /dev/null; [ "$#" -eq 0 ]"#);

        generator.generate(&request(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let generator = shell("exit 3");

        let err = generator.generate(&request(None)).await.unwrap_err();

        assert_eq!(err, GeneratorError::Exited { code: Some(3) });
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_launch() {
        let generator =
            CommandManifestGenerator::new("/nonexistent/munki-manifest-generator", Vec::new());

        let err = generator.generate(&request(None)).await.unwrap_err();

        assert!(matches!(err, GeneratorError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_parent_environment_is_not_modified() {
        let generator = shell("cat > /dev/null");
        generator.generate(&request(None)).await.unwrap();

        assert!(std::env::var(RUN_ID_VARIABLE).is_err());
    }
}
