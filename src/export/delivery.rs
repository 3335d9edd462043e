//! Export delivery
//!
//! Puts finished export bytes on disk. The native destination (the documents
//! directory) is tried first; if it is unavailable or the write fails, the
//! file goes to the downloads directory instead. The caller only sees an error
//! when both fail.

use std::path::{Path, PathBuf};

use crate::config::{ReporterPaths, Settings};
use crate::error::{ReportError, ReportResult};
use crate::storage::file_io::write_bytes_atomic;

/// How an export reached the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    /// Saved to the documents directory
    Native,
    /// Saved to the downloads directory after the native save failed
    Download,
}

/// Where a finished export ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub path: PathBuf,
    pub method: DeliveryMethod,
}

/// Candidate directories for an export
#[derive(Debug, Clone)]
pub struct ExportDestination {
    /// `None` where there is no native documents location
    pub native_dir: Option<PathBuf>,
    pub fallback_dir: PathBuf,
}

impl ExportDestination {
    pub fn new(native_dir: Option<PathBuf>, fallback_dir: PathBuf) -> Self {
        Self {
            native_dir,
            fallback_dir,
        }
    }

    /// Destination from the configured paths and settings
    pub fn from_settings(paths: &ReporterPaths, settings: &Settings) -> Self {
        Self::new(
            Some(paths.documents_dir(settings.documents_dir.as_ref())),
            paths.downloads_dir(),
        )
    }

    /// Write `bytes` as `file_name`, falling back to the download directory
    ///
    /// The write is atomic in either location, so a failed native attempt
    /// leaves nothing behind.
    pub fn deliver(&self, file_name: &str, bytes: &[u8]) -> ReportResult<Delivery> {
        let native_error = match &self.native_dir {
            Some(dir) => match write_to(dir, file_name, bytes) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "Export saved");
                    return Ok(Delivery {
                        path,
                        method: DeliveryMethod::Native,
                    });
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Native save failed, falling back to download");
                    e.to_string()
                }
            },
            None => "no native destination".to_string(),
        };

        match write_to(&self.fallback_dir, file_name, bytes) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Export downloaded");
                Ok(Delivery {
                    path,
                    method: DeliveryMethod::Download,
                })
            }
            Err(e) => Err(ReportError::ExportFailed(format!(
                "could not save {} ({}) or download it ({})",
                file_name, native_error, e
            ))),
        }
    }
}

fn write_to(dir: &Path, file_name: &str, bytes: &[u8]) -> ReportResult<PathBuf> {
    let path = dir.join(file_name);
    write_bytes_atomic(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_native_delivery() {
        let native = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        let dest = ExportDestination::new(
            Some(native.path().to_path_buf()),
            fallback.path().to_path_buf(),
        );

        let delivery = dest.deliver("report.csv", b"a,b\n").unwrap();

        assert_eq!(delivery.method, DeliveryMethod::Native);
        assert_eq!(delivery.path, native.path().join("report.csv"));
        assert_eq!(std::fs::read(&delivery.path).unwrap(), b"a,b\n");
        assert!(!fallback.path().join("report.csv").exists());
    }

    #[test]
    fn test_falls_back_when_native_fails() {
        let temp = TempDir::new().unwrap();
        // A regular file where the directory should be makes the native write fail
        let blocked = temp.path().join("not-a-dir");
        std::fs::write(&blocked, b"").unwrap();
        let fallback = temp.path().join("downloads");
        let dest = ExportDestination::new(Some(blocked), fallback.clone());

        let delivery = dest.deliver("report.pdf", b"%PDF-1.4").unwrap();

        assert_eq!(delivery.method, DeliveryMethod::Download);
        assert_eq!(delivery.path, fallback.join("report.pdf"));
        assert!(delivery.path.exists());
    }

    #[test]
    fn test_no_native_destination_downloads() {
        let fallback = TempDir::new().unwrap();
        let dest = ExportDestination::new(None, fallback.path().to_path_buf());

        let delivery = dest.deliver("report.csv", b"x").unwrap();
        assert_eq!(delivery.method, DeliveryMethod::Download);
    }

    #[test]
    fn test_both_destinations_failing_is_export_failed() {
        let temp = TempDir::new().unwrap();
        let blocked = temp.path().join("blocked");
        std::fs::write(&blocked, b"").unwrap();
        let dest = ExportDestination::new(Some(blocked.clone()), blocked);

        let err = dest.deliver("report.csv", b"x").unwrap_err();
        assert!(matches!(err, ReportError::ExportFailed(_)));
    }
}
