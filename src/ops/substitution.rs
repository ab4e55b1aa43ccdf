//! Persisting the substitution map.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::SubstitutionMap;
use crate::util::fs::{read_to_string, write_string};

/// File the substitution map is written to, in the working directory.
pub const SUBSTITUTION_MAP_FILE: &str = "ElectronNativeSubstitutionMap.json";

/// Write `map` to `path`, replacing any previous file.
pub fn write_substitution_map(map: &SubstitutionMap, path: &Path) -> Result<()> {
    let json = map
        .to_json_pretty()
        .context("failed to serialize the substitution map")?;
    write_string(path, &json)
}

/// Read a previously written substitution map.
pub fn read_substitution_map(path: &Path) -> Result<SubstitutionMap> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse substitution map: {}", path.display()))
}
