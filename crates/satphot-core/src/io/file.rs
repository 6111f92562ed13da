use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{ParseError, Result};

/// Memory-mapped upload file with its original name.
pub struct PhotometryFile {
    pub filename: String,
    mmap: Option<Mmap>,
}

impl PhotometryFile {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            Some(unsafe { Mmap::map(&file)? })
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }
}

/// UTF-8 text of an upload, without a leading byte-order mark.
pub fn decode(bytes: &[u8]) -> std::result::Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::NotUtf8)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
