use crate::config::CvConfig;
use crate::engine::ModelReport;
use crate::errors::EvalResult;
use crate::fingerprint::sha256_hex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const SUMMARY_FILE: &str = "summary.json";
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub schema_version: u32,
    pub generated_at: String,
    pub config: &'a CvConfig,
    pub config_sha256: String,
    /// Dataset name to content fingerprint.
    pub datasets: &'a BTreeMap<String, String>,
    pub reports: &'a [ModelReport],
}

/// Write `summary.json` into `dir`.
pub fn write_json_summary(
    dir: &Path,
    config: &CvConfig,
    dataset_fingerprints: &BTreeMap<String, String>,
    reports: &[ModelReport],
) -> EvalResult<()> {
    std::fs::create_dir_all(dir)?;
    let summary = Summary {
        schema_version: SUMMARY_SCHEMA_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        config,
        config_sha256: sha256_hex(&serde_json::to_vec(config)?),
        datasets: dataset_fingerprints,
        reports,
    };
    std::fs::write(dir.join(SUMMARY_FILE), serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}
