//! Session-scoped dataset loading from object storage

use super::normalize::Normalizer;
use super::reader::{decode_csv, decode_parquet, SourceFormat};
use super::table::Dataset;
use crate::config::{StorageConfig, StorageKind};
use crate::error::{TablonError, TablonResult};
use crate::schema::SchemaRegistry;
use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

/// Where the dataset object lives
#[derive(Clone)]
pub struct DatasetSource {
    store: Arc<dyn ObjectStore>,
    location: ObjectPath,
    format: SourceFormat,
    label: String,
}

impl fmt::Debug for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetSource")
            .field("label", &self.label)
            .field("format", &self.format)
            .finish()
    }
}

impl DatasetSource {
    /// Wrap an existing store; the format is taken from the object extension.
    pub fn new(store: Arc<dyn ObjectStore>, object: &str, label: impl Into<String>) -> Self {
        Self {
            store,
            location: ObjectPath::from(object),
            format: SourceFormat::from_path(object),
            label: label.into(),
        }
    }

    /// Build the store described by the storage section of the config.
    ///
    /// Credentials are passed to the store builder directly; nothing is
    /// written to the process environment.
    pub fn from_config(config: &StorageConfig) -> TablonResult<Self> {
        match config.kind {
            StorageKind::Gcs => {
                let bucket = config.bucket.as_deref().ok_or_else(|| {
                    TablonError::config("storage.bucket is required for gcs storage")
                })?;
                let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(bucket);
                if let Some(key_path) = &config.service_account_key {
                    builder = builder.with_service_account_path(key_path.to_string_lossy());
                }
                let store = builder.build().map_err(|e| {
                    TablonError::dataset_unavailable_at(
                        format!("cannot build GCS client: {}", e),
                        format!("gs://{}", bucket),
                    )
                })?;
                Ok(Self::new(
                    Arc::new(store),
                    &config.object,
                    format!("gs://{}/{}", bucket, config.object),
                ))
            }
            StorageKind::Local => {
                let root = config.root.clone().unwrap_or_else(|| ".".into());
                let store = LocalFileSystem::new_with_prefix(&root).map_err(|e| {
                    TablonError::dataset_unavailable_at(
                        format!("cannot open local storage: {}", e),
                        root.display().to_string(),
                    )
                })?;
                Ok(Self::new(
                    Arc::new(store),
                    &config.object,
                    root.join(&config.object).display().to_string(),
                ))
            }
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    async fn fetch(&self) -> TablonResult<Bytes> {
        let object = self.store.get(&self.location).await?;
        Ok(object.bytes().await?)
    }
}

/// Loads the dataset at most once per session.
///
/// Every call to [`DatasetProvider::load`] after the first returns the same
/// `Arc` without touching storage. Each session owns its own provider.
#[derive(Debug)]
pub struct DatasetProvider {
    source: DatasetSource,
    normalizer: Normalizer,
    cache: OnceCell<Arc<Dataset>>,
}

impl DatasetProvider {
    pub fn new(source: DatasetSource, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            source,
            normalizer: Normalizer::new(registry),
            cache: OnceCell::new(),
        }
    }

    pub fn from_config(config: &StorageConfig, registry: Arc<SchemaRegistry>) -> TablonResult<Self> {
        let source = DatasetSource::from_config(config)?;
        Ok(Self::new(source, registry).with_dropped_columns(&config.dropped_columns))
    }

    pub fn with_dropped_columns(mut self, columns: &[String]) -> Self {
        self.normalizer = self.normalizer.with_dropped_columns(columns);
        self
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Fetch, decode and normalize the dataset, or return the cached copy.
    ///
    /// Any failure is reported as `DatasetUnavailable`; a failed load is not
    /// cached, so the shell may call `load` again after fixing the cause.
    pub async fn load(&self) -> TablonResult<Arc<Dataset>> {
        self.cache
            .get_or_try_init(|| self.fetch_and_normalize())
            .await
            .map(Arc::clone)
    }

    #[instrument(skip(self), fields(source = %self.source.label), level = "debug")]
    async fn fetch_and_normalize(&self) -> TablonResult<Arc<Dataset>> {
        let label = self.source.label.clone();
        let unavailable = |e: TablonError| match e {
            TablonError::DatasetUnavailable { message, .. } => {
                TablonError::dataset_unavailable_at(message, label.clone())
            }
            other => TablonError::dataset_unavailable_at(other.to_string(), label.clone()),
        };

        let bytes = self.source.fetch().await.map_err(&unavailable)?;
        let raw = match self.source.format {
            SourceFormat::Parquet => decode_parquet(bytes),
            SourceFormat::Csv => decode_csv(&bytes),
        }
        .map_err(&unavailable)?;
        let dataset = self.normalizer.normalize(raw).map_err(&unavailable)?;

        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Dataset loaded from {}",
            self.source.label
        );
        Ok(Arc::new(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    const CSV: &str = "marca,fecha,Year\nTOYOTA,2023-01-05,2023\nNISSAN,bad,2023\n";

    async fn provider_with(object: &str, contents: &'static [u8]) -> (Arc<InMemory>, DatasetProvider) {
        let store = Arc::new(InMemory::new());
        store
            .put(&ObjectPath::from(object), Bytes::from_static(contents).into())
            .await
            .unwrap();
        let source = DatasetSource::new(store.clone(), object, format!("memory://{}", object));
        let provider = DatasetProvider::new(source, Arc::new(SchemaRegistry::vehicle_imports()))
            .with_dropped_columns(&["Year".to_string()]);
        (store, provider)
    }

    #[tokio::test]
    async fn test_load_normalizes_csv() {
        let (_store, provider) = provider_with("tablon.csv", CSV.as_bytes()).await;
        let dataset = provider.load().await.unwrap();
        assert_eq!(dataset.column_names(), vec!["MARCA", "FECHA"]);
        assert_eq!(dataset.row_count(), 2);
        assert!(dataset.column("FECHA").unwrap().cells()[1].is_missing());
    }

    #[tokio::test]
    async fn test_load_is_memoized() {
        let (store, provider) = provider_with("tablon.csv", CSV.as_bytes()).await;
        let first = provider.load().await.unwrap();

        store.delete(&ObjectPath::from("tablon.csv")).await.unwrap();
        let second = provider.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_missing_object_is_dataset_unavailable() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let source = DatasetSource::new(store, "tablon.parquet", "memory://tablon.parquet");
        let provider = DatasetProvider::new(source, Arc::new(SchemaRegistry::vehicle_imports()));

        let err = provider.load().await.unwrap_err();
        match err {
            TablonError::DatasetUnavailable { source_label, .. } => {
                assert_eq!(source_label.as_deref(), Some("memory://tablon.parquet"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_parquet_is_dataset_unavailable() {
        let (_store, provider) = provider_with("tablon.parquet", b"garbage").await;
        assert!(matches!(
            provider.load().await,
            Err(TablonError::DatasetUnavailable { .. })
        ));
    }
}
