//! PNG export naming and writing

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A rendered canvas ready to be saved
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub filename: String,
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// Write into `dir` under [`ExportedImage::filename`]
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        fs::write(&path, &self.png)?;
        log::info!("Exported {} ({} bytes)", path.display(), self.png.len());
        Ok(path)
    }
}

/// `<prefix>-<unix millis>.png`
pub fn export_filename(prefix: &str, timestamp_millis: i64) -> String {
    format!("{}-{}.png", prefix, timestamp_millis)
}

/// Current Unix time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        assert_eq!(export_filename("whiteboard", 1_700_000_000_123), "whiteboard-1700000000123.png");
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
