//! Applies untrusted predicate text to a dataset

use super::compile::Compiler;
use super::eval::evaluate;
use super::fault::PredicateFault;
use super::parser::parse;
use super::tree::Predicate;
use crate::dataset::Dataset;
use crate::schema::SchemaRegistry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Filter expression as produced by the backend. Untrusted; always shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPredicate {
    source_text: String,
}

impl GeneratedPredicate {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

impl fmt::Display for GeneratedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source_text)
    }
}

/// Row subset of a dataset, with the same columns
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredResult {
    rows: Vec<usize>,
    table: Dataset,
}

impl FilteredResult {
    /// Positions of the kept rows in the source dataset
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn table(&self) -> &Dataset {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parses, compiles and evaluates predicates.
///
/// The only binding visible to an expression is the dataset itself (`df`);
/// there is no way to reach files, network, environment or process state.
#[derive(Debug, Clone)]
pub struct PredicateSandbox {
    registry: Arc<SchemaRegistry>,
}

impl PredicateSandbox {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Parse and type-check `source` against `dataset` without evaluating it.
    pub fn compile(&self, dataset: &Dataset, source: &str) -> Result<Predicate, PredicateFault> {
        let expr = parse(source)?;
        Compiler::new(dataset, &self.registry).compile(&expr)
    }

    /// Apply `predicate` to `dataset`, returning the matching rows.
    ///
    /// The dataset is not modified; the result owns a new table.
    pub fn apply(
        &self,
        dataset: &Dataset,
        predicate: &GeneratedPredicate,
    ) -> Result<FilteredResult, PredicateFault> {
        let outcome = self.compile(dataset, predicate.source_text()).and_then(|compiled| {
            let mask = evaluate(&compiled, dataset)?;
            if mask.len() != dataset.row_count() {
                return Err(PredicateFault::unknown(format!(
                    "condition produced {} flags for {} rows",
                    mask.len(),
                    dataset.row_count()
                )));
            }
            Ok(mask)
        });

        let mask = match outcome {
            Ok(mask) => mask,
            Err(fault) => {
                warn!(kind = fault.kind(), predicate = %predicate, "Predicate rejected: {}", fault.message());
                return Err(fault);
            }
        };

        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(row, keep)| keep.then_some(row))
            .collect();
        debug!(
            matched = rows.len(),
            total = dataset.row_count(),
            "Predicate applied"
        );
        let table = dataset.take(&rows);
        Ok(FilteredResult { rows, table })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Column};
    use crate::schema::SemanticType;

    fn sandbox() -> PredicateSandbox {
        PredicateSandbox::new(Arc::new(SchemaRegistry::vehicle_imports()))
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "MARCA",
                SemanticType::Text,
                ["TOYOTA", "NISSAN", "TOYOTA"]
                    .iter()
                    .map(|m| Cell::Text(m.to_string()))
                    .collect(),
            ),
            Column::new(
                "CILINDRADA",
                SemanticType::Number,
                vec![Cell::Number(1800.0), Cell::Number(2500.0), Cell::Missing],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_apply_keeps_columns_and_matching_rows() {
        let data = dataset();
        let result = sandbox()
            .apply(&data, &GeneratedPredicate::new("df[df['MARCA'] == 'toyota']"))
            .unwrap();
        assert_eq!(result.rows(), &[0, 2]);
        assert_eq!(result.table().column_names(), data.column_names());
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn test_apply_is_repeatable() {
        let data = dataset();
        let predicate = GeneratedPredicate::new("df[df['CILINDRADA'] > 2000]");
        let first = sandbox().apply(&data, &predicate).unwrap();
        let second = sandbox().apply(&data, &predicate).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.rows(), &[1]);
    }

    #[test]
    fn test_zero_rows_keep_columns() {
        let data = dataset();
        let result = sandbox()
            .apply(&data, &GeneratedPredicate::new("df[df['MARCA'] == 'KIA']"))
            .unwrap();
        assert_eq!(result.row_count(), 0);
        assert_eq!(result.table().row_count(), 0);
        assert_eq!(result.table().column_count(), 2);
    }

    #[test]
    fn test_unknown_column_is_reference_fault() {
        let fault = sandbox()
            .apply(&dataset(), &GeneratedPredicate::new("df[df['COLOR'] == 'ROJO']"))
            .unwrap_err();
        assert_eq!(fault, PredicateFault::reference("COLOR", None));
    }

    #[test]
    fn test_long_condition_chain_is_a_fault_not_a_crash() {
        let terms = vec!["(df['MARCA'] != 'X')"; 1000].join(" & ");
        let fault = sandbox()
            .apply(&dataset(), &GeneratedPredicate::new(format!("df[{}]", terms)))
            .unwrap_err();
        assert!(matches!(fault, PredicateFault::Syntax { .. }));

        let terms = vec!["(df['MARCA'] != 'X')"; 40].join(" & ");
        let result = sandbox()
            .apply(&dataset(), &GeneratedPredicate::new(format!("df[{}]", terms)))
            .unwrap();
        assert_eq!(result.row_count(), 3);
    }
}
