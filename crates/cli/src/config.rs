//! Group table loading.

use std::path::Path;

use anyhow::{Context, Result};
use dispatch::GroupTable;
use tracing::info;

use crate::cli::GroupArgs;

/// Returns the group table selected by `args`: the file when one is given,
/// the built-in reference table otherwise.
pub fn load_group_table(args: &GroupArgs) -> Result<GroupTable> {
    match &args.groups {
        Some(path) => load_group_table_file(path),
        None => {
            info!("no group table file configured, using the reference table");
            Ok(GroupTable::reference())
        }
    }
}

/// Reads and validates a JSON group table file.
pub fn load_group_table_file(path: &Path) -> Result<GroupTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read group table {}", path.display()))?;
    let table: GroupTable = serde_json::from_str(&content)
        .with_context(|| format!("invalid group table {}", path.display()))?;

    info!(
        path = %path.display(),
        group_count = table.len(),
        "loaded group table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_to_reference_table() {
        let table = load_group_table(&GroupArgs { groups: None }).unwrap();
        assert_eq!(table, GroupTable::reference());
    }

    #[test]
    fn test_loads_file_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "b", "name": "staff", "catalog": "production", "type": "user"}},
                {{"id": "a", "name": "lab", "catalog": "testing", "type": "device"}}
            ]"#
        )
        .unwrap();

        let table = load_group_table(&GroupArgs {
            groups: Some(file.path().to_path_buf()),
        })
        .unwrap();

        let ids: Vec<&str> = table.iter().map(|g| g.group_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_rejects_empty_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let err = load_group_table_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("at least one group"));
    }

    #[test]
    fn test_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_group_table_file(&dir.path().join("groups.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read group table"));
    }
}
