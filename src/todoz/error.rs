use thiserror::Error;

/// Failure kinds surfaced by the storage adapter.
///
/// Each code carries one fixed, user-facing message. The strings are part of
/// the contract with the UI and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageErrorCode {
    Unavailable,
    QuotaExceeded,
    SaveError,
    LoadError,
}

impl StorageErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            StorageErrorCode::Unavailable => {
                "Storage is not available. Your todos will not be saved."
            }
            StorageErrorCode::QuotaExceeded => {
                "Storage limit reached. Please delete some todos to free up space."
            }
            StorageErrorCode::SaveError => "Failed to save your changes. Please try again.",
            StorageErrorCode::LoadError => "Failed to load your todos. Please refresh the page.",
        }
    }

    /// Wire name of the code (`QUOTA_EXCEEDED`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageErrorCode::Unavailable => "UNAVAILABLE",
            StorageErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            StorageErrorCode::SaveError => "SAVE_ERROR",
            StorageErrorCode::LoadError => "LOAD_ERROR",
        }
    }
}

impl std::fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .code.message())]
pub struct StorageError {
    pub code: StorageErrorCode,
}

impl StorageError {
    pub fn new(code: StorageErrorCode) -> Self {
        Self { code }
    }

    pub fn message(&self) -> &'static str {
        self.code.message()
    }
}

impl From<StorageErrorCode> for StorageError {
    fn from(code: StorageErrorCode) -> Self {
        Self::new(code)
    }
}

#[derive(Error, Debug)]
pub enum TodozError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TodozError>;
