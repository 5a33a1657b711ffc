use super::{PersistencePort, STORAGE_KEY};
use crate::error::AppError;
use std::path::{Path, PathBuf};

pub const STORE_PATH_ENV_VAR: &str = "TASKBOARD_STORE_PATH";
const APP_DIR_NAME: &str = "taskboard";

/// Resolves the blob location: env var, then `configured`, then the
/// per-user default under the platform config directory.
pub fn store_path(configured: Option<&str>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_PATH_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path.trim()));
    }

    Ok(default_dir()?.join(blob_file_name()))
}

fn default_dir() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

fn blob_file_name() -> String {
    format!("{STORAGE_KEY}.json")
}

/// Keeps the task blob in a single JSON file. A missing file reads as absent.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Stores the blob as `<dir>/taskManager_tasks.json`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(blob_file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn describe(&self, err: std::io::Error) -> String {
        format!("{}: {err}", self.path.display())
    }
}

impl PersistencePort for JsonFileStore {
    fn read(&self) -> Result<Option<Vec<u8>>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        std::fs::read(&self.path)
            .map(Some)
            .map_err(|err| AppError::persistence_read(self.describe(err)))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|err| AppError::persistence_write(err.to_string()))?;
        }

        std::fs::write(&self.path, bytes)
            .map_err(|err| AppError::persistence_write(self.describe(err)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::persistence_write(err.to_string()))?;
        }

        Ok(())
    }
}
