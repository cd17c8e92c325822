pub mod clock;
pub mod config;
pub mod error;
pub mod mapping;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigPaths, DescriptionConfig, LineSeparator, MappingConfig, MappingEntry};
pub use error::DojoError;
pub use mapping::{MappingTable, ScanNameLookup, ScanNameMapping, GENERIC_TEST_TYPE};
pub use types::{
    FindingSeverities, FindingStats, HookState, HookStatus, HookType, ObjectMeta, ScanRecord,
    ScanSpec, ScanState, ScanStatus,
};
