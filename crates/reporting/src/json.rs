use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dojo_core::types::ScanRecord;
use dojo_core::DojoError;

use crate::DescriptionGenerator;

/// Everything a persistence hook needs to open a DefectDojo test for a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDraft {
    pub scan_name: Option<String>,
    pub scan_uid: Option<Uuid>,
    pub test_type: String,
    pub date: String,
    pub finding_count: u64,
    pub description: String,
}

impl ImportDraft {
    pub fn build(generator: &DescriptionGenerator, scan: &ScanRecord) -> Result<Self, DojoError> {
        let test_type = generator.defect_dojo_scan_name(scan)?;
        let description = generator.generate_named(scan, &test_type)?;
        Ok(Self {
            scan_name: scan.name().map(str::to_string),
            scan_uid: scan.metadata.as_ref().and_then(|meta| meta.uid),
            test_type,
            date: generator.current_date()?,
            finding_count: scan
                .status
                .as_ref()
                .map(|status| status.findings.count)
                .unwrap_or(0),
            description,
        })
    }
}

pub fn render_json(draft: &ImportDraft) -> String {
    serde_json::to_string_pretty(draft).unwrap_or_else(|_| "{}".to_string())
}
