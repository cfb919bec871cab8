//! Column-major table of typed cells

use crate::error::{TablonError, TablonResult};
use crate::schema::SemanticType;
use chrono::NaiveDateTime;
use std::fmt;

/// Format used whenever a date cell is rendered as text
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single value. `Missing` is the null marker produced by failed coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDateTime),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Date(d) => write!(f, "{}", d.format(DATETIME_FORMAT)),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    semantic_type: SemanticType,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    fn take(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            semantic_type: self.semantic_type,
            cells: rows.iter().map(|&row| self.cells[row].clone()).collect(),
        }
    }
}

/// Immutable in-memory table.
///
/// Filtering never changes a dataset; [`Dataset::take`] builds a new one
/// with the same columns and a subset of the rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset; all columns must have the same length and distinct names.
    pub fn new(columns: Vec<Column>) -> TablonResult<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        for (position, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(TablonError::invalid_input_field(
                    format!(
                        "Column has {} rows, expected {}",
                        column.len(),
                        row_count
                    ),
                    column.name(),
                ));
            }
            if columns[..position].iter().any(|c| c.name == column.name) {
                return Err(TablonError::invalid_input_field(
                    "Duplicate column name",
                    column.name(),
                ));
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// New dataset holding `rows` (in the given order). Indices must be in range.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            row_count: rows.len(),
        }
    }

    /// First `n` rows, for previews
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..self.row_count.min(n)).collect();
        self.take(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "MARCA",
                SemanticType::Text,
                vec![
                    Cell::Text("TOYOTA".into()),
                    Cell::Text("NISSAN".into()),
                    Cell::Missing,
                ],
            ),
            Column::new(
                "CILINDRADA",
                SemanticType::Number,
                vec![Cell::Number(1.5), Cell::Number(2.0), Cell::Number(3.0)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_take_keeps_columns() {
        let dataset = sample();
        let subset = dataset.take(&[2, 0]);
        assert_eq!(subset.column_names(), dataset.column_names());
        assert_eq!(subset.row_count(), 2);
        assert_eq!(subset.columns()[0].cells()[1], Cell::Text("TOYOTA".into()));
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn test_empty_take() {
        let subset = sample().take(&[]);
        assert_eq!(subset.row_count(), 0);
        assert_eq!(subset.column_count(), 2);
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            Column::new("A", SemanticType::Text, vec![Cell::Missing]),
            Column::new("B", SemanticType::Text, vec![]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Dataset::new(vec![
            Column::new("A", SemanticType::Text, vec![]),
            Column::new("A", SemanticType::Text, vec![]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cell_display() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::Date(date).to_string(), "2023-04-05 00:00:00");
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
        assert_eq!(Cell::Integer(7).to_string(), "7");
        assert_eq!(Cell::Missing.to_string(), "");
    }

    #[test]
    fn test_head() {
        assert_eq!(sample().head(2).row_count(), 2);
        assert_eq!(sample().head(10).row_count(), 3);
    }
}
