//! CSV artifacts
//!
//! Three files cross the process boundary:
//!
//! - the raw export, read by [`read_raw_records`]
//! - the clean file, written by [`write_clean_records`] and read back by
//!   [`read_clean_records`]
//! - the upload audit log, written by [`write_outcomes`]
//!
//! Output files are written to a sibling temporary file and renamed into
//! place, so a failed run never leaves a truncated artifact behind.

pub mod audit;
pub mod clean;
pub mod raw;

pub use audit::{write_outcomes, AUDIT_COLUMNS};
pub use clean::{read_clean_records, write_clean_records, CLEAN_COLUMNS};
pub use raw::{read_raw_records, CANONICAL_CLICK_ID_COLUMN};

use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temporary_path(path);
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
