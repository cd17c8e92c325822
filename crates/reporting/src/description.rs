use time::macros::format_description;
use time::OffsetDateTime;

use dojo_core::clock::{Clock, SystemClock};
use dojo_core::config::{DescriptionConfig, LineSeparator};
use dojo_core::mapping::ScanNameLookup;
use dojo_core::types::ScanRecord;
use dojo_core::DojoError;

/// Renders the multi-line description attached to an imported test.
///
/// Output, one entry per line:
///
/// ```text
/// # <DefectDojo test type>
/// Started: <creation timestamp, or empty>
/// Ended: <finish timestamp, or the clock's current time>
/// ScanType: <scan type>
/// Parameters: [<comma-joined parameters>]
/// ```
#[derive(Debug)]
pub struct DescriptionGenerator {
    lookup: Box<dyn ScanNameLookup>,
    clock: Box<dyn Clock>,
    separator: LineSeparator,
}

impl DescriptionGenerator {
    pub fn new(lookup: impl ScanNameLookup + 'static) -> Self {
        Self::with_clock(lookup, SystemClock::new())
    }

    pub fn with_clock(lookup: impl ScanNameLookup + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
            clock: Box::new(clock),
            separator: LineSeparator::Native,
        }
    }

    pub fn from_config(config: &DescriptionConfig, lookup: impl ScanNameLookup + 'static) -> Self {
        Self::new(lookup).with_line_separator(config.line_separator)
    }

    pub fn with_line_separator(mut self, separator: LineSeparator) -> Self {
        self.separator = separator;
        self
    }

    pub fn set_clock(&mut self, clock: impl Clock + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn generate(&self, scan: &ScanRecord) -> Result<String, DojoError> {
        let name = self.defect_dojo_scan_name(scan)?;
        self.generate_named(scan, &name)
    }

    /// Same as [`generate`](Self::generate) with an already resolved test type.
    pub fn generate_named(&self, scan: &ScanRecord, name: &str) -> Result<String, DojoError> {
        let spec = scan.spec.as_ref().ok_or(DojoError::MissingField("spec"))?;

        let now = self.clock.now();
        let started = self.start_time(scan, now)?;
        let ended = self.end_time(scan, now)?;
        let parameters = spec
            .parameters
            .as_ref()
            .ok_or(DojoError::MissingField("spec.parameters"))?;

        let lines = [
            format!("# {name}"),
            format!("Started: {started}"),
            format!("Ended: {ended}"),
            format!("ScanType: {}", spec.scan_type),
            format!("Parameters: [{}]", parameters.join(",")),
        ];
        tracing::debug!(scan = scan.name().unwrap_or("<unnamed>"), "generated description");
        Ok(lines.join(self.separator.as_str()))
    }

    /// Current date as `yyyy-MM-dd`.
    pub fn current_date(&self) -> Result<String, DojoError> {
        let formatted = self.clock.now().format(format_description!("[year]-[month]-[day]"))?;
        Ok(formatted)
    }

    /// Current date and time as `dd.MM.yyyy HH:mm:ss`.
    pub fn current_time(&self) -> Result<String, DojoError> {
        format_timestamp(self.clock.now())
    }

    pub fn defect_dojo_scan_name(&self, scan: &ScanRecord) -> Result<String, DojoError> {
        let spec = scan.spec.as_ref().ok_or(DojoError::MissingField("spec"))?;
        if spec.scan_type.is_empty() {
            return Err(DojoError::MissingField("spec.scanType"));
        }
        self.lookup.lookup(&spec.scan_type)
    }

    // Record timestamps are shown in the clock's offset so both lines share a zone.
    fn start_time(&self, scan: &ScanRecord, now: OffsetDateTime) -> Result<String, DojoError> {
        match scan.started_at() {
            Some(started) => format_timestamp(started.to_offset(now.offset())),
            None => Ok(String::new()),
        }
    }

    fn end_time(&self, scan: &ScanRecord, now: OffsetDateTime) -> Result<String, DojoError> {
        match scan.finished_at() {
            Some(finished) => format_timestamp(finished.to_offset(now.offset())),
            None => {
                if let Some(state) = scan.state().filter(|state| !state.is_finished()) {
                    tracing::debug!(%state, "scan still running, using current time as end");
                }
                format_timestamp(now)
            }
        }
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, DojoError> {
    let formatted = timestamp.format(format_description!(
        "[day].[month].[year] [hour]:[minute]:[second]"
    ))?;
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_core::clock::FixedClock;
    use dojo_core::mapping::MappingTable;
    use dojo_core::types::{ObjectMeta, ScanSpec, ScanStatus};
    use time::macros::datetime;

    fn fixed_clock() -> FixedClock {
        FixedClock::new(datetime!(2024-03-05 10:00:00 UTC))
    }

    fn generator() -> DescriptionGenerator {
        DescriptionGenerator::with_clock(MappingTable::builtin(), fixed_clock())
            .with_line_separator(LineSeparator::Lf)
    }

    fn complete_scan() -> ScanRecord {
        ScanRecord {
            metadata: Some(ObjectMeta {
                name: Some("nmap-scanme".to_string()),
                creation_timestamp: Some(datetime!(2024-03-01 08:05:09 UTC)),
                ..ObjectMeta::default()
            }),
            spec: Some(ScanSpec {
                scan_type: "nmap".to_string(),
                parameters: Some(vec!["-Pn".to_string(), "scanme.nmap.org".to_string()]),
            }),
            status: Some(ScanStatus {
                state: Some("Done".to_string()),
                finished_at: Some(datetime!(2024-03-01 08:17:45 UTC)),
                ..ScanStatus::default()
            }),
            ..ScanRecord::default()
        }
    }

    #[test]
    fn test_complete_scan() {
        let description = generator().generate(&complete_scan()).unwrap();
        let lines: Vec<&str> = description.split('\n').collect();

        assert_eq!(
            lines,
            vec![
                "# Nmap Scan",
                "Started: 01.03.2024 08:05:09",
                "Ended: 01.03.2024 08:17:45",
                "ScanType: nmap",
                "Parameters: [-Pn,scanme.nmap.org]",
            ]
        );
        assert!(!description.ends_with('\n'));
    }

    #[test]
    fn test_missing_start_renders_empty() {
        let mut scan = complete_scan();
        scan.metadata.as_mut().unwrap().creation_timestamp = None;
        let description = generator().generate(&scan).unwrap();
        assert_eq!(description.lines().nth(1), Some("Started: "));

        scan.metadata = None;
        let description = generator().generate(&scan).unwrap();
        assert_eq!(description.lines().nth(1), Some("Started: "));
    }

    #[test]
    fn test_missing_end_uses_clock() {
        let generator = generator();
        let mut scan = complete_scan();
        scan.status.as_mut().unwrap().finished_at = None;
        scan.status.as_mut().unwrap().state = Some("Scanning".to_string());

        let description = generator.generate(&scan).unwrap();
        let expected = format!("Ended: {}", generator.current_time().unwrap());
        assert_eq!(description.lines().nth(2), Some(expected.as_str()));
        assert_eq!(description.lines().nth(2), Some("Ended: 05.03.2024 10:00:00"));

        scan.status = None;
        let description = generator.generate(&scan).unwrap();
        assert_eq!(description.lines().nth(2), Some("Ended: 05.03.2024 10:00:00"));
    }

    #[test]
    fn test_empty_parameters() {
        let mut scan = complete_scan();
        scan.spec.as_mut().unwrap().parameters = Some(Vec::new());
        let description = generator().generate(&scan).unwrap();
        assert_eq!(description.lines().last(), Some("Parameters: []"));
    }

    #[test]
    fn test_missing_spec_fails() {
        let mut scan = complete_scan();
        scan.spec = None;
        let err = generator().generate(&scan).unwrap_err();
        assert!(matches!(err, DojoError::MissingField("spec")));

        let err = generator().defect_dojo_scan_name(&scan).unwrap_err();
        assert!(matches!(err, DojoError::MissingField("spec")));
    }

    #[test]
    fn test_missing_parameters_fails() {
        let mut scan = complete_scan();
        scan.spec.as_mut().unwrap().parameters = None;
        let err = generator().generate(&scan).unwrap_err();
        assert!(matches!(err, DojoError::MissingField("spec.parameters")));
    }

    #[test]
    fn test_unknown_scan_type_fails() {
        let mut scan = complete_scan();
        scan.spec.as_mut().unwrap().scan_type = "typo3scan".to_string();
        let err = generator().generate(&scan).unwrap_err();
        assert!(matches!(err, DojoError::Lookup(ref value) if value == "typo3scan"));
    }

    #[test]
    fn test_custom_lookup() {
        let table = MappingTable::builtin().with_entry("typo3scan", "Generic Findings Import");
        let generator = DescriptionGenerator::with_clock(table, fixed_clock());
        let mut scan = complete_scan();
        scan.spec.as_mut().unwrap().scan_type = "typo3scan".to_string();

        assert_eq!(
            generator.defect_dojo_scan_name(&scan).unwrap(),
            "Generic Findings Import"
        );
    }

    #[test]
    fn test_current_date_and_time() {
        let generator = generator();
        assert_eq!(generator.current_date().unwrap(), "2024-03-05");
        assert_eq!(generator.current_time().unwrap(), "05.03.2024 10:00:00");
    }

    #[test]
    fn test_set_clock() {
        let mut generator = generator();
        generator.set_clock(FixedClock::new(datetime!(2023-12-31 23:59:58 UTC)));
        assert_eq!(generator.current_date().unwrap(), "2023-12-31");
        assert_eq!(generator.current_time().unwrap(), "31.12.2023 23:59:58");
    }

    #[test]
    fn test_crlf_separator() {
        let generator = generator().with_line_separator(LineSeparator::CrLf);
        let description = generator.generate(&complete_scan()).unwrap();
        assert_eq!(description.matches("\r\n").count(), 4);
        assert_eq!(description.lines().count(), 5);
    }

    #[test]
    fn test_from_config_uses_native_separator() {
        let config = DescriptionConfig::default();
        let mut generator = DescriptionGenerator::from_config(&config, MappingTable::builtin());
        generator.set_clock(fixed_clock());
        let description = generator.generate(&complete_scan()).unwrap();
        assert_eq!(
            description.matches(LineSeparator::Native.as_str()).count(),
            4
        );
    }

    #[test]
    fn test_record_times_follow_clock_offset() {
        let generator = DescriptionGenerator::with_clock(
            MappingTable::builtin(),
            FixedClock::new(datetime!(2024-03-05 10:00:00 -5)),
        )
        .with_line_separator(LineSeparator::Lf);
        let mut scan = complete_scan();
        scan.metadata.as_mut().unwrap().creation_timestamp = Some(datetime!(2024-03-05 14:30:00 UTC));
        scan.status.as_mut().unwrap().finished_at = None;

        let description = generator.generate(&scan).unwrap();
        assert_eq!(description.lines().nth(1), Some("Started: 05.03.2024 09:30:00"));
        assert_eq!(description.lines().nth(2), Some("Ended: 05.03.2024 10:00:00"));

        scan.status.as_mut().unwrap().finished_at = Some(datetime!(2024-03-05 14:45:10 UTC));
        let description = generator.generate(&scan).unwrap();
        assert_eq!(description.lines().nth(2), Some("Ended: 05.03.2024 09:45:10"));
    }

    #[test]
    fn test_empty_scan_type_is_missing() {
        let mut scan = complete_scan();
        scan.spec.as_mut().unwrap().scan_type = String::new();
        let err = generator().generate(&scan).unwrap_err();
        assert!(matches!(err, DojoError::MissingField("spec.scanType")));
    }

    #[test]
    fn test_generate_named_skips_lookup() {
        let mut scan = complete_scan();
        scan.spec.as_mut().unwrap().scan_type = "typo3scan".to_string();
        let description = generator().generate_named(&scan, "Generic Findings Import").unwrap();
        assert_eq!(description.lines().next(), Some("# Generic Findings Import"));
        assert_eq!(description.lines().nth(3), Some("ScanType: typo3scan"));
    }
}
