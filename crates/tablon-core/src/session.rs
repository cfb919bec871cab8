//! Filter session: one user's pipeline from free text to exported archive
//!
//! ```text
//! raw text ─▶ PromptCompiler ─▶ TextGenerator ─▶ CodeExtractor ─▶ PredicateSandbox ─▶ ResultExporter
//! ```
//!
//! A session owns its dataset cache and its last successful result. Nothing
//! is shared between sessions.

use crate::config::TablonConfig;
use crate::dataset::{Dataset, DatasetProvider};
use crate::error::TablonResult;
use crate::export::{ExportFormat, ResultExporter};
use crate::extract::CodeExtractor;
use crate::llm::TextGenerator;
use crate::predicate::{FilteredResult, GeneratedPredicate, PredicateFault, PredicateSandbox};
use crate::prompt::{PromptCompiler, PromptLanguage};
use crate::schema::SchemaRegistry;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One user submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    raw_text: String,
}

impl FilterRequest {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

impl From<&str> for FilterRequest {
    fn from(raw_text: &str) -> Self {
        Self::new(raw_text)
    }
}

/// What a request produced.
///
/// The predicate is always present so a fault can be shown next to the
/// expression that caused it.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    predicate: GeneratedPredicate,
    total_rows: usize,
    result: Result<FilteredResult, PredicateFault>,
}

impl FilterOutcome {
    pub fn predicate(&self) -> &GeneratedPredicate {
        &self.predicate
    }

    /// Row count of the dataset before filtering
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn result(&self) -> Result<&FilteredResult, &PredicateFault> {
        self.result.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Rows kept by the predicate, if it applied
    pub fn matched_rows(&self) -> Option<usize> {
        self.result.as_ref().ok().map(FilteredResult::row_count)
    }
}

pub struct FilterSession {
    provider: DatasetProvider,
    generator: Arc<dyn TextGenerator>,
    compiler: PromptCompiler,
    extractor: CodeExtractor,
    sandbox: PredicateSandbox,
    exporter: ResultExporter,
    last_result: Option<FilteredResult>,
}

impl FilterSession {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        provider: DatasetProvider,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            provider,
            generator,
            compiler: PromptCompiler::new(registry.clone()),
            extractor: CodeExtractor::new(),
            sandbox: PredicateSandbox::new(registry),
            exporter: ResultExporter::default(),
            last_result: None,
        }
    }

    /// Session over the built-in vehicle import schema, configured from `config`
    pub fn from_config(config: &TablonConfig, generator: Arc<dyn TextGenerator>) -> TablonResult<Self> {
        let registry = Arc::new(SchemaRegistry::vehicle_imports());
        let provider = DatasetProvider::from_config(&config.storage, registry.clone())?;
        Ok(Self::new(registry, provider, generator)
            .with_language(config.prompt.language)
            .with_export_format(config.export.format))
    }

    pub fn with_language(mut self, language: PromptLanguage) -> Self {
        self.compiler = self.compiler.with_language(language);
        self
    }

    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.exporter = ResultExporter::new(format);
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.sandbox.registry()
    }

    /// The session dataset, fetched on first use
    pub async fn dataset(&self) -> TablonResult<Arc<Dataset>> {
        self.provider.load().await
    }

    /// The instruction that would be sent for `raw_text`
    pub fn instruction(&self, raw_text: &str) -> String {
        self.compiler.compile(raw_text)
    }

    /// Ask the backend for a predicate. The response is not validated here.
    #[instrument(skip(self, request), level = "debug")]
    pub async fn translate(&self, request: &FilterRequest) -> TablonResult<GeneratedPredicate> {
        let instruction = self.compiler.compile(request.raw_text());
        debug!(instruction = %instruction, "Compiled instruction");

        let response = self.generator.generate(&instruction).await?;
        debug!(response = %response, "Backend response");

        Ok(GeneratedPredicate::new(self.extractor.extract(&response)))
    }

    /// Run one request end to end.
    ///
    /// `DatasetUnavailable` and `TranslationUnavailable` come back as `Err`.
    /// A sandbox fault is part of the outcome. In every failing case the last
    /// successful result is left as it was.
    pub async fn submit(&mut self, request: FilterRequest) -> TablonResult<FilterOutcome> {
        let dataset = self.dataset().await?;
        let predicate = self.translate(&request).await?;
        Ok(self.apply_to(&dataset, predicate))
    }

    /// Apply a predicate without going through the backend
    pub async fn apply_predicate(&mut self, predicate: GeneratedPredicate) -> TablonResult<FilterOutcome> {
        let dataset = self.dataset().await?;
        Ok(self.apply_to(&dataset, predicate))
    }

    fn apply_to(&mut self, dataset: &Dataset, predicate: GeneratedPredicate) -> FilterOutcome {
        let result = self.sandbox.apply(dataset, &predicate);
        match &result {
            Ok(filtered) => {
                info!(
                    predicate = %predicate,
                    matched = filtered.row_count(),
                    total = dataset.row_count(),
                    "Request served"
                );
                self.last_result = Some(filtered.clone());
            }
            Err(fault) => warn!(predicate = %predicate, "Request failed: {}", fault),
        }

        FilterOutcome {
            predicate,
            total_rows: dataset.row_count(),
            result,
        }
    }

    /// Most recent successful result
    pub fn last_result(&self) -> Option<&FilteredResult> {
        self.last_result.as_ref()
    }

    /// Package `result` as a zip archive in the session's export format
    pub fn export(&self, result: &FilteredResult) -> TablonResult<Vec<u8>> {
        self.exporter.export(result)
    }

    /// File name of the tabular entry inside exported archives
    pub fn export_entry_name(&self) -> String {
        self.exporter.entry_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetSource;
    use crate::error::TablonError;
    use crate::llm::MockTextGenerator;
    use bytes::Bytes;
    use object_store::memory::InMemory;
    use object_store::path::Path as ObjectPath;
    use object_store::ObjectStore;

    const CSV: &str = "MARCA,FECHA,YEAR\nTOYOTA,2023-01-05,2023\nNISSAN,2023-02-10,2023\nTOYOTA,2023-03-15,2023\n";

    async fn session_with(generator: MockTextGenerator) -> FilterSession {
        let store = Arc::new(InMemory::new());
        store
            .put(&ObjectPath::from("tablon.csv"), Bytes::from_static(CSV.as_bytes()).into())
            .await
            .unwrap();
        let registry = Arc::new(SchemaRegistry::vehicle_imports());
        let source = DatasetSource::new(store, "tablon.csv", "memory://tablon.csv");
        let provider = DatasetProvider::new(source, registry.clone())
            .with_dropped_columns(&["YEAR".to_string()]);
        FilterSession::new(registry, provider, Arc::new(generator))
            .with_export_format(ExportFormat::Csv)
    }

    fn responding(text: &'static str) -> MockTextGenerator {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(move |_| Ok(text.to_string()));
        generator
    }

    #[tokio::test]
    async fn test_submit_filters_and_remembers_result() {
        let mut session =
            session_with(responding("```python\ndf[df['MARCA'] == 'TOYOTA']\n```")).await;

        let outcome = session.submit(FilterRequest::new("marca toyota")).await.unwrap();
        assert_eq!(outcome.predicate().source_text(), "df[df['MARCA'] == 'TOYOTA']");
        assert_eq!(outcome.total_rows(), 3);
        assert_eq!(outcome.matched_rows(), Some(2));
        assert_eq!(session.last_result().map(FilteredResult::row_count), Some(2));
    }

    #[tokio::test]
    async fn test_instruction_carries_user_text() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|instruction| instruction.contains("marca toyota"))
            .times(1)
            .returning(|_| Ok("df[df['MARCA'] == 'TOYOTA']".to_string()));
        let mut session = session_with(generator).await;
        assert!(session.submit("marca toyota".into()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fault_keeps_previous_result() {
        let mut session = session_with(responding("df[df['MARCA'] == 'NISSAN']")).await;
        session.submit("nissan".into()).await.unwrap();

        let outcome = session
            .apply_predicate(GeneratedPredicate::new("df[df['COLOR'] == 'ROJO']"))
            .await
            .unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.predicate().source_text(), "df[df['COLOR'] == 'ROJO']");
        assert!(matches!(outcome.result(), Err(PredicateFault::Reference { .. })));
        assert_eq!(session.last_result().map(FilteredResult::row_count), Some(1));
    }

    #[tokio::test]
    async fn test_backend_failure_is_translation_unavailable() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(TablonError::translation_unavailable("backend down")));
        let mut session = session_with(generator).await;

        let err = session.submit("toyota".into()).await.unwrap_err();
        assert!(matches!(err, TablonError::TranslationUnavailable { .. }));
        assert!(session.last_result().is_none());
        assert_eq!(session.dataset().await.unwrap().row_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_dataset_halts_before_backend() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();
        let registry = Arc::new(SchemaRegistry::vehicle_imports());
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let provider = DatasetProvider::new(
            DatasetSource::new(store, "tablon.parquet", "memory://tablon.parquet"),
            registry.clone(),
        );
        let mut session = FilterSession::new(registry, provider, Arc::new(generator));

        let err = session.submit("toyota".into()).await.unwrap_err();
        assert!(matches!(err, TablonError::DatasetUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_export_last_result() {
        let mut session = session_with(responding("df[df['MARCA'] == 'TOYOTA']")).await;
        let outcome = session.submit("toyota".into()).await.unwrap();
        let archive = session.export(outcome.result().unwrap()).unwrap();
        assert!(archive.starts_with(b"PK"));
        assert_eq!(session.export_entry_name(), "filtered_dataframe.csv");
    }
}
