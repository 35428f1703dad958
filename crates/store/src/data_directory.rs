//! Data directory management for the store crate
//!
//! All Pulseboard state lives in one directory: the entity catalog plus the
//! rotated server logs. The typical structure looks like this:
//!
//! ```text
//! .pulseboard/
//! ├── logs/
//! │   ├── logs.log
//! ├── catalog.json
//! ```

use crate::errors::{Result, StoreError};
use std::path::PathBuf;

const DATA_DIR_NAME: &str = ".pulseboard";
const LOGS_DIR_NAME: &str = "logs";
const CATALOG_FILE_NAME: &str = "catalog.json";

/// Locates and creates the directory holding the catalog and log files
#[derive(Debug, Clone)]
pub struct DataDirectory {
    pub root_path: PathBuf,
    pub logs_dir: PathBuf,
    pub catalog_path: PathBuf,
}

impl DataDirectory {
    pub fn new_system_default() -> Result<Self> {
        let root_path = Self::get_system_data_directory()?;
        Self::new(root_path)
    }

    pub fn new(root_path: PathBuf) -> Result<Self> {
        let logs_dir = root_path.join(LOGS_DIR_NAME);
        let catalog_path = root_path.join(CATALOG_FILE_NAME);
        let data_dir = Self {
            root_path,
            logs_dir,
            catalog_path,
        };
        data_dir.ensure_directory_structure()?;
        Ok(data_dir)
    }

    pub fn get_system_data_directory() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DATA_DIR_NAME))
            .ok_or(StoreError::SystemDataDirectoryNotFound)
    }

    pub fn ensure_directory_structure(&self) -> Result<()> {
        if !self.root_path.exists() {
            std::fs::create_dir_all(&self.root_path).map_err(|_| {
                StoreError::DataDirectoryCreationFailed {
                    path: self.root_path.clone(),
                }
            })?;
            log::info!("Created data directory: {}", self.root_path.display());
        }

        if !self.logs_dir.exists() {
            std::fs::create_dir_all(&self.logs_dir).map_err(|_| {
                StoreError::DataDirectoryCreationFailed {
                    path: self.logs_dir.clone(),
                }
            })?;
            log::debug!("Created logs directory: {}", self.logs_dir.display());
        }

        Ok(())
    }

    /// Remove everything under the data directory. Used by `pulseboard clean`.
    pub fn delete_all(&self) -> Result<()> {
        if self.root_path.exists() {
            std::fs::remove_dir_all(&self.root_path)?;
            log::info!("Removed data directory: {}", self.root_path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_directory_structure() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".pulseboard");

        let data_dir = DataDirectory::new(root.clone()).unwrap();

        assert!(root.exists());
        assert!(data_dir.logs_dir.exists());
        assert_eq!(data_dir.catalog_path, root.join("catalog.json"));
    }

    #[test]
    fn test_delete_all() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".pulseboard");
        let data_dir = DataDirectory::new(root.clone()).unwrap();

        std::fs::write(&data_dir.catalog_path, "{}").unwrap();
        data_dir.delete_all().unwrap();

        assert!(!root.exists());
    }
}
