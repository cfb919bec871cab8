//! Packaging of filtered results for download

use crate::dataset::{Cell, Dataset};
use crate::error::{TablonError, TablonResult};
use crate::predicate::FilteredResult;
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Write};
use std::str::FromStr;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Base name of the tabular file inside the archive
pub const ENTRY_STEM: &str = "filtered_dataframe";

/// Largest row count a worksheet can hold, header included
const XLSX_MAX_ROWS: usize = 1_048_576;

/// Tabular format of the file inside the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Writes a deflate-compressed zip holding exactly one tabular file.
///
/// The file has a header row and no index column. Dates are rendered as
/// `YYYY-MM-DD HH:MM:SS`. Archive timestamps are fixed, so CSV archives are
/// byte-identical for identical input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultExporter {
    format: ExportFormat,
}

impl ResultExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Name of the single archive entry
    pub fn entry_name(&self) -> String {
        format!("{}.{}", ENTRY_STEM, self.format.extension())
    }

    pub fn export(&self, result: &FilteredResult) -> TablonResult<Vec<u8>> {
        self.export_table(result.table())
    }

    pub fn export_table(&self, table: &Dataset) -> TablonResult<Vec<u8>> {
        let payload = match self.format {
            ExportFormat::Csv => write_csv(table)?,
            ExportFormat::Xlsx => write_xlsx(table)?,
        };

        let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        archive.start_file(self.entry_name(), options)?;
        archive
            .write_all(&payload)
            .map_err(|e| TablonError::export(format!("Failed to write archive entry: {}", e)))?;
        let bytes = archive.finish()?.into_inner();

        debug!(
            format = %self.format,
            rows = table.row_count(),
            payload_bytes = payload.len(),
            archive_bytes = bytes.len(),
            "Exported filtered table"
        );
        Ok(bytes)
    }
}

fn write_csv(table: &Dataset) -> TablonResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.column_names())
        .map_err(|e| TablonError::export(format!("Failed to write CSV header: {}", e)))?;

    for row in 0..table.row_count() {
        let record = table
            .columns()
            .iter()
            .map(|column| column.cells()[row].to_string());
        writer
            .write_record(record)
            .map_err(|e| TablonError::export(format!("Failed to write CSV row {}: {}", row, e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| TablonError::export(format!("Failed to flush CSV: {}", e)))
}

fn write_xlsx(table: &Dataset) -> TablonResult<Vec<u8>> {
    if table.row_count() + 1 > XLSX_MAX_ROWS {
        return Err(TablonError::export(format!(
            "{} rows do not fit in a worksheet; use the csv format",
            table.row_count()
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col)
            .map_err(|_| TablonError::export("Too many columns for a worksheet"))?;
        worksheet.write_string(0, col, column.name())?;

        for (row, cell) in column.cells().iter().enumerate() {
            // bounded by XLSX_MAX_ROWS above
            let row = row as u32 + 1;
            match cell {
                Cell::Missing => {}
                Cell::Number(value) => {
                    worksheet.write_number(row, col, *value)?;
                }
                Cell::Integer(value) => {
                    worksheet.write_number(row, col, *value as f64)?;
                }
                Cell::Text(_) | Cell::Date(_) => {
                    worksheet.write_string(row, col, cell.to_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::schema::SemanticType;
    use chrono::NaiveDate;
    use std::io::Read;
    use zip::ZipArchive;

    fn table() -> Dataset {
        let fecha = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Dataset::new(vec![
            Column::new(
                "MARCA",
                SemanticType::Text,
                vec![Cell::Text("TOYOTA".into()), Cell::Text("KIA, INC".into())],
            ),
            Column::new("FECHA", SemanticType::Date, vec![Cell::Date(fecha), Cell::Missing]),
            Column::new(
                "CILINDRADA",
                SemanticType::Number,
                vec![Cell::Number(1800.5), Cell::Number(2500.0)],
            ),
        ])
        .unwrap()
    }

    fn single_entry(archive: &[u8]) -> (String, Vec<u8>, CompressionMethod) {
        let mut archive = ZipArchive::new(Cursor::new(archive)).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_index(0).unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        (entry.name().to_string(), contents, entry.compression())
    }

    #[test]
    fn test_csv_archive_contents() {
        let bytes = ResultExporter::new(ExportFormat::Csv).export_table(&table()).unwrap();
        let (name, contents, compression) = single_entry(&bytes);
        assert_eq!(name, "filtered_dataframe.csv");
        assert_eq!(compression, CompressionMethod::Deflated);
        assert_eq!(
            String::from_utf8(contents).unwrap(),
            "MARCA,FECHA,CILINDRADA\nTOYOTA,2023-01-05 00:00:00,1800.5\n\"KIA, INC\",,2500\n"
        );
    }

    #[test]
    fn test_csv_export_is_deterministic() {
        let exporter = ResultExporter::new(ExportFormat::Csv);
        assert_eq!(
            exporter.export_table(&table()).unwrap(),
            exporter.export_table(&table()).unwrap()
        );
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let empty = table().take(&[]);
        let bytes = ResultExporter::new(ExportFormat::Csv).export_table(&empty).unwrap();
        let (_, contents, _) = single_entry(&bytes);
        assert_eq!(String::from_utf8(contents).unwrap(), "MARCA,FECHA,CILINDRADA\n");
    }

    #[test]
    fn test_xlsx_archive_holds_workbook() {
        let bytes = ResultExporter::new(ExportFormat::Xlsx).export_table(&table()).unwrap();
        let (name, contents, _) = single_entry(&bytes);
        assert_eq!(name, "filtered_dataframe.xlsx");

        let mut workbook = ZipArchive::new(Cursor::new(contents)).unwrap();
        let mut strings = String::new();
        workbook
            .by_name("xl/sharedStrings.xml")
            .unwrap()
            .read_to_string(&mut strings)
            .unwrap();
        assert!(strings.contains("TOYOTA"));
        assert!(strings.contains("2023-01-05 00:00:00"));
        assert!(workbook.by_name("xl/worksheets/sheet1.xml").is_ok());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default(), ExportFormat::Xlsx);
    }
}
