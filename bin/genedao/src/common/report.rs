//! Report file helpers

use std::path::Path;

use genedao_deploy::DeploymentReport;

use super::{CliError, Result};

/// Reads a report previously written by `genedao deploy --report`.
pub fn read_report(path: &Path) -> Result<DeploymentReport> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| CliError::ReportRead { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| CliError::ReportParse { path: path.to_path_buf(), source })
}

/// Writes `report` as pretty-printed JSON.
pub fn write_report(path: &Path, report: &DeploymentReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|source| CliError::ReportSerialize { path: path.to_path_buf(), source })?;
    std::fs::write(path, json)
        .map_err(|source| CliError::ReportWrite { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use genedao_deploy::test_utils::DEV_ACCOUNT;

    #[test]
    fn test_report_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployment.json");
        let report = DeploymentReport {
            network: Some("localhost".into()),
            chain_id: 31337,
            deployer: DEV_ACCOUNT,
            deployer_balance: None,
            contracts: vec![],
            ownership_transfers: vec![],
            verified: false,
        };

        write_report(&path, &report).unwrap();
        assert_eq!(read_report(&path).unwrap(), report);

        std::fs::write(&path, "{").unwrap();
        assert!(matches!(read_report(&path), Err(CliError::ReportParse { .. })));
        assert!(matches!(
            read_report(&dir.path().join("missing.json")),
            Err(CliError::ReportRead { .. })
        ));
    }

    #[test]
    fn test_write_errors_are_not_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_fixture();
        let err = write_report(&dir.path().join("missing/deployment.json"), &report).unwrap_err();
        assert!(matches!(err, CliError::ReportWrite { .. }));
        assert!(err.to_string().starts_with("Failed to write report"));

        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = CliError::ReportSerialize { path: "deployment.json".into(), source };
        assert!(err.to_string().starts_with("Failed to serialize report"));
    }

    fn report_fixture() -> DeploymentReport {
        DeploymentReport {
            network: None,
            chain_id: 31337,
            deployer: DEV_ACCOUNT,
            deployer_balance: None,
            contracts: vec![],
            ownership_transfers: vec![],
            verified: true,
        }
    }
}
