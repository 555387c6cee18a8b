//! Per-unit record export.

use crate::ModeArchive;
use anyhow::{bail, Context, Result};
use kl_common::Asm;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default archive file name
pub const DEFAULT_ARCHIVE: &str = "segKLmat.npz";

/// Returns the data file name for unit `sid` (1-based)
pub fn unit_file_name(sid: usize) -> String {
    format!("M2S{sid}.bin")
}

/// Exports every unit of `archive` as one bincode data file in `out_dir`.
///
/// With `tagged`, each record is wrapped in its per-unit envelope; otherwise
/// the bare record is written. `expected_n_mode` guards against an archive
/// whose mode count disagrees with the declared one.
///
/// Returns the written paths, in unit order.
pub fn export_archive(
    archive: &Path,
    out_dir: &Path,
    expected_n_mode: Option<usize>,
    tagged: bool,
) -> Result<Vec<PathBuf>> {
    let arch = ModeArchive::open(archive)?;
    if let Some(n_mode) = expected_n_mode {
        if arch.n_mode() != n_mode {
            bail!(
                "archive has {} modes per unit, expected {n_mode}",
                arch.n_mode()
            );
        }
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut paths = Vec::with_capacity(arch.n_unit());
    for sid in 1..=arch.n_unit() {
        let record = arch.record(sid)?;
        let bytes = if tagged {
            Asm::new(sid, record)?.encode()?
        } else {
            record.encode()?
        };
        let path = out_dir.join(unit_file_name(sid));
        fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("{} ({} bytes)", path.display(), bytes.len());
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_embed_unit_index() {
        assert_eq!(unit_file_name(1), "M2S1.bin");
        assert_eq!(unit_file_name(7), "M2S7.bin");
    }
}
