//! kl-export library
//!
//! Archive loading and record export used by the kl-export binary (and by
//! the integration tests).

pub mod archive;
pub mod export;

pub use archive::ModeArchive;
pub use export::{export_archive, unit_file_name};
