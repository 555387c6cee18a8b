//! Mode archive loading.
//!
//! The archive is a NumPy `.npz` file with two entries:
//!
//! ```text
//! KL:   f64, shape (n_unit, n_point, n_mode), C order
//! mask: bool, shape (n_unit, n_point), C order
//! ```
//!
//! `KL[u]` is the mode matrix of unit `u`, one mode per column; `mask[u]`
//! marks the unit's active points.

use anyhow::{bail, Context, Result};
use kl_common::KarhunenLoeve;
use npyz::{npz, NpyFile, Order};
use std::{fs::File, io, path::Path};

/// Archive entry holding the per-unit mode matrices
pub const KL_ARRAY: &str = "KL";
/// Archive entry holding the per-unit pupil masks
pub const MASK_ARRAY: &str = "mask";

/// In-memory view of a segment mode archive.
pub struct ModeArchive {
    n_unit: usize,
    n_point: usize,
    n_mode: usize,
    kl: Vec<f64>,
    mask: Vec<bool>,
}

impl ModeArchive {
    /// Reads a mode archive, checking entry shapes and memory order.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = io::BufReader::new(
            File::open(path)
                .with_context(|| format!("Failed to open archive {}", path.display()))?,
        );
        let mut zip = zip::ZipArchive::new(file)
            .with_context(|| format!("Failed to read archive {}", path.display()))?;

        let entry = zip
            .by_name(&npz::file_name_from_array_name(KL_ARRAY))
            .with_context(|| format!("archive has no `{KL_ARRAY}` array"))?;
        let reader = NpyFile::new(entry)?;
        let kl_shape = dims(&reader, KL_ARRAY, 3)?;
        let kl = reader
            .into_vec::<f64>()
            .with_context(|| format!("array `{KL_ARRAY}` is not 64-bit float"))?;

        let entry = zip
            .by_name(&npz::file_name_from_array_name(MASK_ARRAY))
            .with_context(|| format!("archive has no `{MASK_ARRAY}` array"))?;
        let reader = NpyFile::new(entry)?;
        let mask_shape = dims(&reader, MASK_ARRAY, 2)?;
        let mask = reader
            .into_vec::<bool>()
            .with_context(|| format!("array `{MASK_ARRAY}` is not boolean"))?;

        if kl_shape[0] != mask_shape[0] {
            bail!(
                "`{KL_ARRAY}` has {} units but `{MASK_ARRAY}` has {}",
                kl_shape[0],
                mask_shape[0]
            );
        }
        if kl_shape[1] != mask_shape[1] {
            bail!(
                "`{KL_ARRAY}` has {} points per unit but `{MASK_ARRAY}` has {}",
                kl_shape[1],
                mask_shape[1]
            );
        }

        Ok(Self {
            n_unit: kl_shape[0],
            n_point: kl_shape[1],
            n_mode: kl_shape[2],
            kl,
            mask,
        })
    }

    /// Returns the number of mirror units
    pub fn n_unit(&self) -> usize {
        self.n_unit
    }

    /// Returns the number of points per unit
    pub fn n_point(&self) -> usize {
        self.n_point
    }

    /// Returns the number of modes per unit
    pub fn n_mode(&self) -> usize {
        self.n_mode
    }

    /// Builds the mode basis record of unit `sid` (1-based).
    ///
    /// The unit's (n_point x n_mode) matrix is flattened column-major, as
    /// the record contract requires.
    pub fn record(&self, sid: usize) -> Result<KarhunenLoeve> {
        if sid == 0 || sid > self.n_unit {
            bail!("unit {sid} out of range (archive has {} units)", self.n_unit);
        }
        let uid = sid - 1;
        let block_len = self.n_point * self.n_mode;
        let block = &self.kl[uid * block_len..][..block_len];
        let modes = flatten_column_major(self.n_point, self.n_mode, block);
        let mask = self.mask[uid * self.n_point..][..self.n_point].to_vec();
        Ok(KarhunenLoeve::new(self.n_mode, modes, mask)?)
    }
}

/// Flattens a row-major (rows x cols) matrix in column-major order.
pub fn flatten_column_major(rows: usize, cols: usize, data: &[f64]) -> Vec<f64> {
    debug_assert_eq!(data.len(), rows * cols);
    let mut out = Vec::with_capacity(data.len());
    for c in 0..cols {
        for r in 0..rows {
            out.push(data[r * cols + c]);
        }
    }
    out
}

fn dims<R: io::Read>(reader: &NpyFile<R>, name: &str, rank: usize) -> Result<Vec<usize>> {
    let shape: Vec<usize> = reader.shape().iter().map(|&d| d as usize).collect();
    if shape.len() != rank {
        bail!(
            "array `{name}` has rank {} (shape {shape:?}), expected {rank}",
            shape.len()
        );
    }
    if !matches!(reader.order(), Order::C) {
        bail!("array `{name}` is Fortran-ordered, expected C order");
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_flattening() {
        // [[11, 12, 13],
        //  [21, 22, 23]]
        let row_major = [11.0, 12.0, 13.0, 21.0, 22.0, 23.0];
        let flat = flatten_column_major(2, 3, &row_major);
        assert_eq!(flat, [11.0, 21.0, 12.0, 22.0, 13.0, 23.0]);
    }

    #[test]
    fn column_major_of_single_column_is_identity() {
        let column = [1.0, 2.0, 3.0];
        assert_eq!(flatten_column_major(3, 1, &column), column);
    }
}
