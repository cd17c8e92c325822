use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A scan resource as it is handed to persistence hooks.
///
/// Every section is optional on the wire; callers decide which ones they
/// require.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ScanSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScanStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub creation_timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSpec {
    #[serde(default)]
    pub scan_type: String,
    /// `None` when the resource carries no parameter list at all, which is
    /// distinct from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub finished_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_result_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_result_file: Option<String>,
    #[serde(default)]
    pub findings: FindingStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_and_write_hook_status: Vec<HookStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingStats {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub severities: FindingSeverities,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSeverities {
    #[serde(default)]
    pub informational: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub high: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookStatus {
    pub hook_name: String,
    pub state: HookState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(rename = "type")]
    pub hook_type: HookType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookState {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookType {
    ReadOnly,
    ReadAndWrite,
}

/// Lifecycle phase of a scan, parsed from `status.state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Init,
    Scanning,
    ScanCompleted,
    Parsing,
    ParseCompleted,
    HookProcessing,
    Done,
    Errored,
    Unknown(String),
}

impl ScanRecord {
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref()?.name.as_deref()
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.metadata.as_ref()?.creation_timestamp
    }

    pub fn finished_at(&self) -> Option<OffsetDateTime> {
        self.status.as_ref()?.finished_at
    }

    pub fn state(&self) -> Option<ScanState> {
        let state = self.status.as_ref()?.state.as_deref()?;
        Some(ScanState::parse(state))
    }
}

impl ScanState {
    pub fn parse(value: &str) -> Self {
        match value {
            "Init" => ScanState::Init,
            "Scanning" => ScanState::Scanning,
            "ScanCompleted" => ScanState::ScanCompleted,
            "Parsing" => ScanState::Parsing,
            "ParseCompleted" => ScanState::ParseCompleted,
            "HookProcessing"
            | "ReadAndWriteHookProcessing"
            | "ReadAndWriteHookCompleted"
            | "ReadOnlyHookProcessing" => ScanState::HookProcessing,
            "Done" => ScanState::Done,
            "Errored" => ScanState::Errored,
            other => ScanState::Unknown(other.to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ScanState::Done | ScanState::Errored)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ScanState::Init => "Init",
            ScanState::Scanning => "Scanning",
            ScanState::ScanCompleted => "ScanCompleted",
            ScanState::Parsing => "Parsing",
            ScanState::ParseCompleted => "ParseCompleted",
            ScanState::HookProcessing => "HookProcessing",
            ScanState::Done => "Done",
            ScanState::Errored => "Errored",
            ScanState::Unknown(value) => value.as_str(),
        };
        write!(f, "{value}")
    }
}
