//! Karhunen-Loeve mode basis record.

use crate::{ModeError, Result};
use serde::{Deserialize, Serialize};

/// Karhunen-Loeve modal basis for a single mirror unit.
///
/// `modes` is the (n_point x n_mode) mode matrix flattened in column-major
/// order: mode 0 sampled at every point, then mode 1, and so on. `mask`
/// marks the active points of the unit within the sampling grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KarhunenLoeve {
    /// Unit modes, column-major
    pub modes: Vec<f64>,
    /// Number of modes
    pub n_mode: usize,
    /// Pupil mask for the unit
    pub mask: Vec<bool>,
}

impl KarhunenLoeve {
    /// Builds a record, checking the shape invariants.
    pub fn new(n_mode: usize, modes: Vec<f64>, mask: Vec<bool>) -> Result<Self> {
        let record = Self {
            modes,
            n_mode,
            mask,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks the shape invariants.
    ///
    /// The mode matrix must divide evenly into `n_mode` columns and the mask
    /// must have one entry per matrix row.
    pub fn validate(&self) -> Result<()> {
        if self.n_mode == 0 {
            return Err(ModeError::ZeroModeCount);
        }
        if self.modes.len() % self.n_mode != 0 {
            return Err(ModeError::RaggedModes {
                len: self.modes.len(),
                n_mode: self.n_mode,
            });
        }
        let n_point = self.modes.len() / self.n_mode;
        if self.mask.len() != n_point {
            return Err(ModeError::MaskLength {
                mask_len: self.mask.len(),
                n_point,
            });
        }
        Ok(())
    }

    /// Returns the number of points within the unit
    pub fn n_point(&self) -> usize {
        self.modes.len() / self.n_mode
    }

    /// Returns the number of points within the mask
    pub fn n_in_mask(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Encodes the record to its wire format.
    ///
    /// Fails if the record violates the shape invariants.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a record and re-checks the shape invariants.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let record: Self = bincode::deserialize(bytes)?;
        record.validate()?;
        Ok(record)
    }
}
