//! Segment Karhunen-Loeve mode basis records and their binary codec.
//!
//! A [`KarhunenLoeve`] record holds the modal basis of one mirror unit: the
//! mode matrix flattened in column-major order, the declared mode count, and
//! the pupil mask selecting the unit's active points. Records are built once
//! from the mode archive, encoded with [bincode], and written to one data
//! file per unit; the downstream simulation reads the files back with the
//! same schema.
//!
//! The optional [`Asm`] envelope tags a record with the physical unit it
//! belongs to. It is a composable layer: the tagged encoding is exactly a
//! discriminant followed by the plain record encoding.
//!
//! # Wire Format
//!
//! bincode v1 default configuration: fixed-width little-endian integers,
//! no padding, no compression.
//!
//! ```text
//! Tagged only:
//!   0x00: unit discriminant (u32 LE, 0-based: unit 1 -> 0)
//!
//! Record:
//!   modes length  (u64 LE)
//!   modes         (length x f64 LE, column-major)
//!   n_mode        (u64 LE)
//!   mask length   (u64 LE)
//!   mask          (length x u8, 1 = active)
//! ```
//!
//! Identical records always encode to identical bytes, and decoding with the
//! same schema reconstructs an equal record.
//!
//! # Usage
//!
//! ```
//! use kl_common::{Asm, KarhunenLoeve};
//!
//! let kl = KarhunenLoeve::new(2, vec![1.0, 2.0, 3.0, 4.0], vec![true, false])?;
//! let bytes = Asm::new(1, kl)?.encode()?;
//! let back = Asm::decode(&bytes)?;
//! assert_eq!(back.tag(), "M2S1");
//! # Ok::<(), kl_common::ModeError>(())
//! ```

mod asm;
mod record;

pub use asm::Asm;
pub use record::KarhunenLoeve;

/// Errors raised while building or (de)serializing mode basis records.
#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("mode count must be non-zero")]
    ZeroModeCount,
    #[error("modes length {len} is not divisible by mode count {n_mode}")]
    RaggedModes { len: usize, n_mode: usize },
    #[error("mask length {mask_len} does not match point count {n_point}")]
    MaskLength { mask_len: usize, n_point: usize },
    #[error("unit id {0} is out of range (1..=7)")]
    UnitId(usize),
    #[error("record (de)serialization failed")]
    Codec(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, ModeError>;
