//! Path management for the expense reporter
//!
//! Provides XDG-compliant path resolution for configuration, data, and
//! export destinations.
//!
//! ## Path Resolution Order
//!
//! 1. `EXPENSE_REPORTER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/expense-reporter` or `~/.config/expense-reporter`
//! 3. Windows: `%APPDATA%\expense-reporter`
//!
//! Exports go to the user's documents directory, with the downloads directory
//! as the fallback destination.

use std::path::PathBuf;

use directories::UserDirs;

use crate::error::ReportError;

/// Manages all paths used by the expense reporter
#[derive(Debug, Clone)]
pub struct ReporterPaths {
    /// Base directory for all reporter data
    base_dir: PathBuf,
}

impl ReporterPaths {
    /// Create a new ReporterPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ReportError> {
        let base_dir = if let Ok(custom) = std::env::var("EXPENSE_REPORTER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ReporterPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/expense-reporter/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/expense-reporter/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to expenses.json
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Get the path to budgets.json
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Directory where exports are written natively.
    ///
    /// An explicit override wins; otherwise the platform documents directory,
    /// and finally `<base>/documents` on systems without one.
    pub fn documents_dir(&self, override_dir: Option<&PathBuf>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| self.base_dir.join("documents"))
    }

    /// Directory used when the native documents write fails
    pub fn downloads_dir(&self) -> PathBuf {
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| self.base_dir.join("downloads"))
    }

    /// Ensure all required directories exist
    ///
    /// Creates:
    /// - Base directory (~/.config/expense-reporter/)
    /// - Data directory (~/.config/expense-reporter/data/)
    pub fn ensure_directories(&self) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ReportError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ReportError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the reporter has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ReportError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| ReportError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("expense-reporter"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ReportError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ReportError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("expense-reporter"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReporterPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReporterPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReporterPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.expenses_file(),
            temp_dir.path().join("data").join("expenses.json")
        );
        assert_eq!(
            paths.budgets_file(),
            temp_dir.path().join("data").join("budgets.json")
        );
    }

    #[test]
    fn test_documents_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReporterPaths::with_base_dir(temp_dir.path().to_path_buf());
        let custom = temp_dir.path().join("reports");

        assert_eq!(paths.documents_dir(Some(&custom)), custom);
    }
}
