//! Copying rebuilt binaries into the output tree.
//!
//! Reconciliation runs in two passes. The first copies every target-ABI binary
//! into its output directory; the second builds the substitution map. A copy
//! failure therefore leaves no map entry pointing at a file that was never
//! written. Output sub-paths are always resolved under the output root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{PlannedArtifact, SubstitutionMap};
use crate::util::fs::{copy_file, ensure_dir};

/// Result of reconciling a set of artifacts.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// The substitution map to persist.
    pub map: SubstitutionMap,

    /// Files written into the output tree.
    pub copied: Vec<PathBuf>,
}

/// Copy every artifact into `output_root` and build the substitution map.
///
/// Artifacts without an explicit output sub-path use `default_output_path`.
/// When two artifacts share a runtime file name, the later one wins.
pub fn reconcile(
    artifacts: &[PlannedArtifact],
    default_output_path: &str,
    output_root: &Path,
) -> Result<Reconciled> {
    let mut copied = Vec::with_capacity(artifacts.len());
    let mut relatives = Vec::with_capacity(artifacts.len());
    let mut written: HashMap<PathBuf, &str> = HashMap::new();
    for artifact in artifacts {
        let sub_path = artifact.output_path.as_deref().unwrap_or(default_output_path);
        let relative = output_relative(sub_path, &artifact.pair.target_file_name());
        let dest = output_root.join(&relative);
        if let Some(parent) = dest.parent() {
            ensure_dir(parent)?;
        }

        if let Some(previous_origin) = written.insert(dest.clone(), artifact.origin.as_str()) {
            tracing::warn!(
                "`{}` is written by both `{}` and `{}`; the later copy wins",
                relative,
                previous_origin,
                artifact.origin
            );
        }
        copy_file(artifact.pair.target(), &dest)?;
        tracing::debug!("copied {} -> {}", artifact.pair.target().display(), dest.display());
        copied.push(dest);
        relatives.push(relative);
    }

    let mut map = SubstitutionMap::new();
    let mut origins: HashMap<String, &str> = HashMap::new();
    for (artifact, value) in artifacts.iter().zip(relatives) {
        let key = artifact.pair.runtime_file_name();

        if let Some(previous) = map.insert(key.clone(), value.clone()) {
            let previous_origin = origins.get(&key).copied().unwrap_or("?");
            tracing::warn!(
                "`{}` is produced by both `{}` and `{}`; using `{}` instead of `{}`",
                key,
                previous_origin,
                artifact.origin,
                value,
                previous
            );
        }
        origins.insert(key, artifact.origin.as_str());
    }

    Ok(Reconciled { map, copied })
}

/// Join an output sub-path and a file name into the form stored in the map.
///
/// Separators become `/`. Empty, `.` and `..` components are dropped, as are
/// root and drive prefixes, so the result always stays under the output root
/// and the default `./` yields the bare file name.
pub fn output_relative(sub_path: &str, file_name: &str) -> String {
    sub_path
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != "." && *part != ".." && !part.ends_with(':'))
        .chain(std::iter::once(file_name))
        .collect::<Vec<_>>()
        .join("/")
}
