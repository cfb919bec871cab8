//! Typing a raw table against the schema registry

use super::reader::RawTable;
use super::table::{Cell, Column, Dataset};
use crate::error::{TablonError, TablonResult};
use crate::schema::{SchemaRegistry, SemanticType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, warn};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%Y%m%d"];

/// Prefix of the row-index columns pandas stores in parquet files
const INDEX_COLUMN_PREFIX: &str = "__INDEX_LEVEL_";

/// Parse a date or date-time in any of the accepted layouts.
///
/// Returns `None` instead of failing; callers coerce that to [`Cell::Missing`].
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_integer(raw: &str) -> Option<i64> {
    let value = raw.trim();
    if let Ok(integer) = value.parse::<i64>() {
        return Some(integer);
    }
    // Integer columns read from float-typed storage render as "3.0"
    parse_number(value)
        .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
        .map(|n| n as i64)
}

/// Turns a [`RawTable`] into a typed [`Dataset`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    registry: Arc<SchemaRegistry>,
    dropped: Vec<String>,
}

impl Normalizer {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            dropped: Vec::new(),
        }
    }

    /// Columns removed before typing (matched after upper-casing)
    pub fn with_dropped_columns(mut self, columns: &[String]) -> Self {
        self.dropped = columns.iter().map(|c| c.to_uppercase()).collect();
        self
    }

    pub fn normalize(&self, raw: RawTable) -> TablonResult<Dataset> {
        let mut columns = Vec::with_capacity(raw.headers.len());

        for (header, values) in raw.headers.into_iter().zip(raw.columns) {
            let name = header.trim().to_uppercase();
            if self.dropped.contains(&name) {
                debug!("Dropping derived column '{}'", name);
                continue;
            }
            if name.starts_with(INDEX_COLUMN_PREFIX) {
                debug!("Dropping stored index column '{}'", name);
                continue;
            }
            if columns.iter().any(|c: &Column| c.name() == name) {
                return Err(TablonError::dataset_unavailable(format!(
                    "Column '{}' appears twice after upper-casing",
                    name
                )));
            }

            let semantic_type = match self.registry.column_exact(&name) {
                Some(spec) => spec.semantic_type,
                None => {
                    warn!("Column '{}' is not in the schema registry; keeping it as text", name);
                    SemanticType::Text
                }
            };

            let column = type_column(name, semantic_type, values);
            let coerced = column.missing_count();
            if coerced > 0 {
                debug!(
                    column = column.name(),
                    missing = coerced,
                    "Missing or unparseable values in column"
                );
            }
            columns.push(column);
        }

        for spec in self.registry.columns() {
            if !columns.iter().any(|c| c.name() == spec.name) {
                warn!("Schema column '{}' is absent from the dataset", spec.name);
            }
        }

        Dataset::new(columns)
    }
}

fn type_column(name: String, semantic_type: SemanticType, values: Vec<Option<String>>) -> Column {
    let cells = values
        .into_iter()
        .map(|value| match value {
            None => Cell::Missing,
            Some(raw) => match semantic_type {
                SemanticType::Text | SemanticType::Categorical => Cell::Text(raw),
                SemanticType::Number => parse_number(&raw).map_or(Cell::Missing, Cell::Number),
                SemanticType::Integer => parse_integer(&raw).map_or(Cell::Missing, Cell::Integer),
                SemanticType::Date => parse_datetime(&raw).map_or(Cell::Missing, Cell::Date),
            },
        })
        .collect();
    Column::new(name, semantic_type, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], columns: Vec<Vec<Option<&str>>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            columns: columns
                .into_iter()
                .map(|c| c.into_iter().map(|v| v.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime("2023-01-05"), Some(expected));
        assert_eq!(parse_datetime("2023-01-05T00:00:00"), Some(expected));
        assert_eq!(parse_datetime("2023-01-05 00:00:00"), Some(expected));
        assert_eq!(parse_datetime("2023-01-05T00:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("05/01/2023"), Some(expected));
        assert_eq!(parse_datetime("not a date"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn test_normalize_upper_cases_and_types() {
        let registry = Arc::new(SchemaRegistry::vehicle_imports());
        let normalizer = Normalizer::new(registry)
            .with_dropped_columns(&["Year".to_string(), "Mes".to_string()]);
        let table = raw(
            &["marca", "fecha", "Year", "Mes", "clust_importador", "cilindrada"],
            vec![
                vec![Some("TOYOTA"), Some("NISSAN")],
                vec![Some("2023-01-05"), Some("garbage")],
                vec![Some("2023"), Some("2023")],
                vec![Some("1"), Some("1")],
                vec![Some("4.0"), Some("x")],
                vec![Some("1.8"), None],
            ],
        );

        let dataset = normalizer.normalize(table).unwrap();
        assert_eq!(
            dataset.column_names(),
            vec!["MARCA", "FECHA", "CLUST_IMPORTADOR", "CILINDRADA"]
        );
        let fecha = dataset.column("FECHA").unwrap();
        assert_eq!(fecha.semantic_type(), SemanticType::Date);
        assert!(matches!(fecha.cells()[0], Cell::Date(_)));
        assert_eq!(fecha.cells()[1], Cell::Missing);
        assert_eq!(
            dataset.column("CLUST_IMPORTADOR").unwrap().cells(),
            &[Cell::Integer(4), Cell::Missing]
        );
        assert_eq!(
            dataset.column("CILINDRADA").unwrap().cells(),
            &[Cell::Number(1.8), Cell::Missing]
        );
    }

    #[test]
    fn test_stored_index_columns_are_dropped() {
        let normalizer = Normalizer::new(Arc::new(SchemaRegistry::vehicle_imports()));
        let dataset = normalizer
            .normalize(raw(
                &["__index_level_0__", "marca", "__index_level_1__"],
                vec![
                    vec![Some("0"), Some("1")],
                    vec![Some("TOYOTA"), Some("KIA")],
                    vec![Some("a"), Some("b")],
                ],
            ))
            .unwrap();
        assert_eq!(dataset.column_names(), vec!["MARCA"]);
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn test_unknown_columns_are_text() {
        let normalizer = Normalizer::new(Arc::new(SchemaRegistry::vehicle_imports()));
        let dataset = normalizer
            .normalize(raw(&["extra"], vec![vec![Some("12")]]))
            .unwrap();
        assert_eq!(
            dataset.column("EXTRA").unwrap().cells(),
            &[Cell::Text("12".into())]
        );
    }

    #[test]
    fn test_duplicate_after_upper_casing_fails() {
        let normalizer = Normalizer::new(Arc::new(SchemaRegistry::vehicle_imports()));
        let result = normalizer.normalize(raw(
            &["marca", "MARCA"],
            vec![vec![Some("A")], vec![Some("B")]],
        ));
        assert!(matches!(result, Err(TablonError::DatasetUnavailable { .. })));
    }
}
