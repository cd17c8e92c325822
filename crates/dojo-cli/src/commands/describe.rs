use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::OffsetDateTime;

use dojo_core::clock::FixedClock;
use dojo_core::mapping::MappingTable;
use dojo_core::types::ScanRecord;
use reporting::{render_json, DescriptionGenerator, ImportDraft};

use super::config::load_effective;

#[derive(Debug)]
pub struct DescribeInputs {
    pub config_path: Option<PathBuf>,
    pub input: PathBuf,
    pub json: bool,
    pub now: Option<OffsetDateTime>,
}

pub fn execute(inputs: DescribeInputs) -> Result<()> {
    let config = load_effective(inputs.config_path)?;
    let table = MappingTable::from_config(&config.mapping)?;
    let mut generator = DescriptionGenerator::from_config(&config.description, table);
    if let Some(now) = inputs.now {
        generator.set_clock(FixedClock::new(now));
    }

    let scan = read_scan(&inputs.input)?;
    println!("{}", render(&generator, &scan, inputs.json)?);
    Ok(())
}

pub fn read_scan(path: &Path) -> Result<ScanRecord> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read scan {}", path.display()))?;
    let scan = serde_json::from_str(&contents)
        .with_context(|| format!("parse scan JSON {}", path.display()))?;
    Ok(scan)
}

fn render(generator: &DescriptionGenerator, scan: &ScanRecord, json: bool) -> Result<String> {
    if json {
        let draft = ImportDraft::build(generator, scan).context("build import draft")?;
        Ok(render_json(&draft))
    } else {
        let description = generator.generate(scan).context("generate description")?;
        Ok(description)
    }
}
