use std::path::PathBuf;

use anyhow::Result;

use dojo_core::mapping::{MappingTable, ScanNameLookup};

use super::config::load_effective;

pub fn execute(config_path: Option<PathBuf>, scan_type: Option<String>) -> Result<()> {
    let config = load_effective(config_path)?;
    let table = MappingTable::from_config(&config.mapping)?;
    println!("{}", render(&table, scan_type.as_deref())?);
    Ok(())
}

fn render(table: &MappingTable, scan_type: Option<&str>) -> Result<String> {
    match scan_type {
        Some(scan_type) => Ok(table.lookup(scan_type)?),
        None => {
            let lines: Vec<String> = table
                .entries()
                .into_iter()
                .map(|(scan_type, test_type)| format!("{scan_type:<24} {test_type}"))
                .collect();
            Ok(lines.join("\n"))
        }
    }
}
