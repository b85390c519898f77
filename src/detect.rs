//! Package format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Container information gathered from the leading bytes of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageFormat {
    /// Whether the archive has no entries (end-of-central-directory first)
    pub empty: bool,
}

impl std::fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.empty {
            write!(f, "ZIP package (empty)")
        } else {
            write!(f, "ZIP package")
        }
    }
}

/// Local file header signature: PK\x03\x04
const ZIP_LOCAL_MAGIC: &[u8] = b"PK\x03\x04";
/// End of central directory signature, first record of an empty archive
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const MAGIC_LEN: usize = 4;

/// Extensions accepted by front ends before loading.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "docm", "dotx", "dotm"];

/// Detect the package format from a file path.
///
/// # Example
/// ```no_run
/// use docqc::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PackageFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; MAGIC_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::NotAPackage)?;
    detect_format_from_bytes(&header)
}

/// Detect the package format from bytes.
///
/// # Returns
/// * `Ok(PackageFormat)` if the data starts with a zip signature
/// * `Err(Error::NotAPackage)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PackageFormat> {
    if data.len() < MAGIC_LEN {
        return Err(Error::NotAPackage);
    }

    if data.starts_with(ZIP_LOCAL_MAGIC) {
        Ok(PackageFormat { empty: false })
    } else if data.starts_with(ZIP_EMPTY_MAGIC) {
        Ok(PackageFormat { empty: true })
    } else {
        Err(Error::NotAPackage)
    }
}

/// Check whether a path carries a supported document extension.
pub fn has_supported_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Check if a file looks like a document package.
pub fn is_package<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes look like a document package.
pub fn is_package_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
