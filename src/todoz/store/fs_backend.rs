use super::{BackendError, KeyValueStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const VALUE_EXT: &str = ".json";

/// Directory-backed store: the value for key `k` lives in `<root>/k.json`.
pub struct FsBackend {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota_bytes: None,
        }
    }

    /// Limit the total size of stored values, like a browser's per-origin quota.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", key, VALUE_EXT))
    }

    fn ensure_root(&self) -> Result<(), BackendError> {
        if !self.root.is_dir() {
            fs::create_dir_all(&self.root).map_err(|e| {
                BackendError::Unavailable(format!(
                    "cannot create {}: {}",
                    self.root.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Bytes used by every stored value except the one at `key`.
    fn used_bytes_without(&self, key: &str) -> Result<u64, BackendError> {
        let skip = self.value_path(key);
        let mut total = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path == skip || !path.is_file() {
                continue;
            }
            let is_value = path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.ends_with(VALUE_EXT) && !name.starts_with('.'));
            if is_value {
                total += fs::metadata(&path)?.len();
            }
        }
        Ok(total)
    }
}

fn classify_write_error(err: io::Error) -> BackendError {
    match err.kind() {
        io::ErrorKind::StorageFull | io::ErrorKind::FileTooLarge => BackendError::QuotaExceeded,
        _ => BackendError::Io(err),
    }
}

impl KeyValueStore for FsBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.ensure_root()?;

        if let Some(quota) = self.quota_bytes {
            let used = self.used_bytes_without(key)?;
            if used + value.len() as u64 > quota {
                return Err(BackendError::QuotaExceeded);
            }
        }

        // Atomic write
        let target_path = self.value_path(key);
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, value) {
            let _ = fs::remove_file(&tmp_path);
            return Err(classify_write_error(e));
        }
        fs::rename(&tmp_path, &target_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            classify_write_error(e)
        })?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        match fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::Io(e)),
        }
    }
}
