use std::collections::BTreeMap;
use std::fmt;

use crate::config::MappingConfig;
use crate::error::DojoError;

/// Test type DefectDojo imports unknown scans as when the fallback is enabled.
pub const GENERIC_TEST_TYPE: &str = "Generic Findings Import";

/// Resolves a scan type to the test type name DefectDojo knows it by.
pub trait ScanNameLookup: Send + Sync + fmt::Debug {
    fn lookup(&self, scan_type: &str) -> Result<String, DojoError>;
}

/// Scan types with a dedicated DefectDojo parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanNameMapping {
    Nmap,
    ZapBaseline,
    ZapApi,
    ZapFull,
    ZapAdvanced,
    ZapAutomation,
    Sslyze,
    Trivy,
    TrivyK8s,
    TrivyImage,
    Gitleaks,
    Nikto,
    Wpscan,
    Semgrep,
    Kubeaudit,
    Nuclei,
    SshAudit,
}

impl ScanNameMapping {
    pub const ALL: [ScanNameMapping; 17] = [
        ScanNameMapping::Nmap,
        ScanNameMapping::ZapBaseline,
        ScanNameMapping::ZapApi,
        ScanNameMapping::ZapFull,
        ScanNameMapping::ZapAdvanced,
        ScanNameMapping::ZapAutomation,
        ScanNameMapping::Sslyze,
        ScanNameMapping::Trivy,
        ScanNameMapping::TrivyK8s,
        ScanNameMapping::TrivyImage,
        ScanNameMapping::Gitleaks,
        ScanNameMapping::Nikto,
        ScanNameMapping::Wpscan,
        ScanNameMapping::Semgrep,
        ScanNameMapping::Kubeaudit,
        ScanNameMapping::Nuclei,
        ScanNameMapping::SshAudit,
    ];

    pub fn scan_type(&self) -> &'static str {
        match self {
            ScanNameMapping::Nmap => "nmap",
            ScanNameMapping::ZapBaseline => "zap-baseline-scan",
            ScanNameMapping::ZapApi => "zap-api-scan",
            ScanNameMapping::ZapFull => "zap-full-scan",
            ScanNameMapping::ZapAdvanced => "zap-advanced-scan",
            ScanNameMapping::ZapAutomation => "zap-automation-scan",
            ScanNameMapping::Sslyze => "sslyze",
            ScanNameMapping::Trivy => "trivy",
            ScanNameMapping::TrivyK8s => "trivy-k8s",
            ScanNameMapping::TrivyImage => "trivy-image",
            ScanNameMapping::Gitleaks => "gitleaks",
            ScanNameMapping::Nikto => "nikto",
            ScanNameMapping::Wpscan => "wpscan",
            ScanNameMapping::Semgrep => "semgrep",
            ScanNameMapping::Kubeaudit => "kubeaudit",
            ScanNameMapping::Nuclei => "nuclei",
            ScanNameMapping::SshAudit => "ssh-audit",
        }
    }

    pub fn test_type(&self) -> &'static str {
        match self {
            ScanNameMapping::Nmap => "Nmap Scan",
            ScanNameMapping::ZapBaseline
            | ScanNameMapping::ZapApi
            | ScanNameMapping::ZapFull
            | ScanNameMapping::ZapAdvanced
            | ScanNameMapping::ZapAutomation => "ZAP Scan",
            ScanNameMapping::Sslyze => "SSLyze Scan (JSON)",
            ScanNameMapping::Trivy | ScanNameMapping::TrivyK8s | ScanNameMapping::TrivyImage => {
                "Trivy Scan"
            }
            ScanNameMapping::Gitleaks => "Gitleaks Scan",
            ScanNameMapping::Nikto => "Nikto Scan",
            ScanNameMapping::Wpscan => "Wpscan",
            ScanNameMapping::Semgrep => "Semgrep JSON Report",
            ScanNameMapping::Kubeaudit => "Kubeaudit Scan",
            ScanNameMapping::Nuclei => "Nuclei Scan",
            ScanNameMapping::SshAudit => "SSH Audit Importer",
        }
    }

    pub fn by_scan_type(scan_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mapping| mapping.scan_type() == scan_type)
    }
}

/// Built-in mappings extended by configured entries.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    custom: BTreeMap<String, String>,
    fallback_to_generic: bool,
}

impl MappingTable {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MappingConfig) -> Result<Self, DojoError> {
        let mut table = Self::builtin().with_fallback(config.fallback_to_generic);
        for entry in &config.custom {
            let scan_type = entry.scan_type.trim();
            let test_type = entry.test_type.trim();
            if scan_type.is_empty() || test_type.is_empty() {
                return Err(DojoError::InvalidConfig(format!(
                    "mapping entry needs both scan_type and test_type (got '{}' -> '{}')",
                    entry.scan_type, entry.test_type
                )));
            }
            table = table.with_entry(scan_type, test_type);
        }
        Ok(table)
    }

    pub fn with_entry(mut self, scan_type: impl Into<String>, test_type: impl Into<String>) -> Self {
        self.custom.insert(scan_type.into(), test_type.into());
        self
    }

    pub fn with_fallback(mut self, fallback_to_generic: bool) -> Self {
        self.fallback_to_generic = fallback_to_generic;
        self
    }

    /// Every known scan type with its test type, sorted by scan type.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: BTreeMap<String, String> = ScanNameMapping::ALL
            .iter()
            .map(|mapping| (mapping.scan_type().to_string(), mapping.test_type().to_string()))
            .collect();
        for (scan_type, test_type) in &self.custom {
            entries.insert(scan_type.clone(), test_type.clone());
        }
        entries.into_iter().collect()
    }
}

impl ScanNameLookup for MappingTable {
    fn lookup(&self, scan_type: &str) -> Result<String, DojoError> {
        if let Some(test_type) = self.custom.get(scan_type) {
            return Ok(test_type.clone());
        }
        if let Some(mapping) = ScanNameMapping::by_scan_type(scan_type) {
            return Ok(mapping.test_type().to_string());
        }
        if self.fallback_to_generic {
            tracing::warn!(scan_type, "unknown scan type, importing as generic findings");
            return Ok(GENERIC_TEST_TYPE.to_string());
        }
        Err(DojoError::Lookup(scan_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingEntry;

    #[test]
    fn test_builtin_lookup() {
        let table = MappingTable::builtin();
        assert_eq!(table.lookup("nmap").unwrap(), "Nmap Scan");
        assert_eq!(table.lookup("zap-full-scan").unwrap(), "ZAP Scan");
        assert_eq!(table.lookup("trivy-k8s").unwrap(), "Trivy Scan");
        assert_eq!(table.lookup("kubeaudit").unwrap(), "Kubeaudit Scan");
    }

    #[test]
    fn test_unknown_scan_type_fails() {
        let err = MappingTable::builtin().lookup("typo3scan").unwrap_err();
        assert!(matches!(err, DojoError::Lookup(ref value) if value == "typo3scan"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(MappingTable::builtin().lookup("NMAP").is_err());
    }

    #[test]
    fn test_generic_fallback() {
        let table = MappingTable::builtin().with_fallback(true);
        assert_eq!(table.lookup("typo3scan").unwrap(), GENERIC_TEST_TYPE);
        // Known types still resolve to their own parser
        assert_eq!(table.lookup("nikto").unwrap(), "Nikto Scan");
    }

    #[test]
    fn test_custom_entries_override_builtin() {
        let table = MappingTable::builtin()
            .with_entry("nmap", "Nmap XML Scan")
            .with_entry("angularjs-csti-scanner", "Generic Findings Import");

        assert_eq!(table.lookup("nmap").unwrap(), "Nmap XML Scan");
        assert_eq!(
            table.lookup("angularjs-csti-scanner").unwrap(),
            "Generic Findings Import"
        );

        let entries = table.entries();
        assert!(entries.contains(&("nmap".to_string(), "Nmap XML Scan".to_string())));
        assert_eq!(entries.len(), ScanNameMapping::ALL.len() + 1);
        assert!(entries.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_from_config_rejects_blank_entries() {
        let config = MappingConfig {
            fallback_to_generic: false,
            custom: vec![MappingEntry {
                scan_type: " ".to_string(),
                test_type: "ZAP Scan".to_string(),
            }],
        };
        let err = MappingTable::from_config(&config).unwrap_err();
        assert!(matches!(err, DojoError::InvalidConfig(_)));
    }

    #[test]
    fn test_scan_types_are_unique() {
        for (index, mapping) in ScanNameMapping::ALL.iter().enumerate() {
            assert_eq!(ScanNameMapping::by_scan_type(mapping.scan_type()), Some(*mapping));
            assert!(ScanNameMapping::ALL[index + 1..]
                .iter()
                .all(|other| other.scan_type() != mapping.scan_type()));
        }
    }
}
