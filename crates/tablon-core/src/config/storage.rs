//! Dataset storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backing store for the dataset object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Google Cloud Storage bucket
    #[default]
    Gcs,
    /// Directory on the local filesystem
    Local,
}

/// Where the session dataset is fetched from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Bucket name, required for `gcs`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Root directory for `local`; defaults to the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Object key inside the bucket or root, `.parquet` or `.csv`
    pub object: String,
    /// Service account JSON; falls back to application default credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_key: Option<PathBuf>,
    /// Columns removed right after loading
    pub dropped_columns: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Gcs,
            bucket: Some("bkmarket".to_string()),
            root: None,
            object: "tablon.parquet".to_string(),
            service_account_key: None,
            dropped_columns: vec!["YEAR".to_string(), "MES".to_string()],
        }
    }
}

impl StorageConfig {
    /// Local-filesystem storage rooted at `root`
    pub fn local(root: impl Into<PathBuf>, object: impl Into<String>) -> Self {
        Self {
            kind: StorageKind::Local,
            bucket: None,
            root: Some(root.into()),
            object: object.into(),
            ..Self::default()
        }
    }

    /// Human-readable location used in logs and errors
    pub fn location(&self) -> String {
        match self.kind {
            StorageKind::Gcs => format!(
                "gs://{}/{}",
                self.bucket.as_deref().unwrap_or_default(),
                self.object
            ),
            StorageKind::Local => {
                let root = self.root.clone().unwrap_or_else(|| PathBuf::from("."));
                root.join(&self.object).display().to_string()
            }
        }
    }
}
