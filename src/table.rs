use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[cfg(feature = "xlsx")]
use calamine::{Data, Reader, Xlsx};
#[cfg(feature = "xlsx")]
use rust_xlsxwriter::Workbook;
#[cfg(feature = "xlsx")]
use std::io::{BufReader, Seek};

use crate::error::{ReportError, Result};
#[cfg(feature = "xlsx")]
use crate::schema::{format_score, SCORE_COLUMNS};
use crate::schema::{columns, CandidateRecord, NAME_COLUMN};

pub const RESULT_COLUMN: &str = "Generated Summary";

/// Sample row shipped with the downloadable template, in column order.
const SAMPLE_ROW: [&str; 34] = [
    "Jane Doe", "F", "2.0", "1.0", "3.0", "2.0", "3.0", "4.0", "4.0", "4.0", "5.0", "3.0", "2.0",
    "3.0", "2.0", "1.0", "2.0", "1.0", "2.0", "3.0", "2.0", "2.0", "1.0", "2.0", "2.0", "1.0",
    "1.0", "3.0", "1.0", "1.0", "2.0", "1.0", "2.0", "4.0",
];

/// Tabular candidate data: a header row plus string cells, kept in file order.
///
/// Cells stay as text so an exported table reproduces the uploaded one exactly,
/// with only the appended result column added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ScoreTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(ReportError::InvalidTable(format!(
                    "row {} has {} cells but the header has {} columns",
                    idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// The one-row template users fill in: every schema column plus a sample candidate.
    pub fn sample_template() -> Self {
        Self {
            headers: columns().map(String::from).collect(),
            rows: vec![SAMPLE_ROW.iter().map(|v| v.to_string()).collect()],
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        debug!(
            "Read table with {} columns and {} rows",
            headers.len(),
            rows.len()
        );
        Ok(Self { headers, rows })
    }

    /// Reads a CSV file, or an Excel workbook when the extension is `.xlsx`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        #[cfg(feature = "xlsx")]
        {
            if is_xlsx(path) {
                return Self::from_xlsx(path);
            }
        }
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes CSV, or an Excel workbook when the extension is `.xlsx`.
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        #[cfg(feature = "xlsx")]
        {
            if is_xlsx(path) {
                return self.write_xlsx(path);
            }
        }
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            ReportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// Schema columns the header row does not carry.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        columns()
            .filter(|column| self.column_index(column).is_none())
            .collect()
    }

    /// Candidate name for progress messages, falling back to the row position.
    pub fn display_name(&self, row: usize) -> String {
        match self.cell(row, NAME_COLUMN).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("row {}", row + 1),
        }
    }

    pub fn record(&self, row: usize) -> Result<CandidateRecord> {
        let values = self.rows.get(row).ok_or_else(|| {
            ReportError::InvalidTable(format!("table has no row {}", row + 1))
        })?;
        CandidateRecord::from_row(&self.headers, values)
    }

    /// Appends `column` with one value per row, replacing it if it already exists.
    pub fn with_column(mut self, column: &str, values: Vec<String>) -> Result<Self> {
        if values.len() != self.rows.len() {
            return Err(ReportError::InvalidTable(format!(
                "column {} has {} values for {} rows",
                column,
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(column) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(self)
    }
}

#[cfg(feature = "xlsx")]
impl ScoreTable {
    /// Reads the first worksheet of an `.xlsx` workbook; its first row is the header.
    ///
    /// Fully blank rows are dropped. Numeric cells are rendered the same way the
    /// prompt renders scores, so `2` in the sheet reads back as `2.0`.
    pub fn from_xlsx_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut workbook: Xlsx<R> = calamine::open_workbook_from_rs(reader)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ReportError::InvalidTable("workbook has no worksheets".to_string()))??;

        let mut lines = range
            .rows()
            .map(|row| row.iter().map(xlsx_cell_text).collect::<Vec<String>>());

        let headers = lines
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();
        let rows = lines
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect::<Vec<_>>();

        debug!(
            "Read worksheet with {} columns and {} rows",
            headers.len(),
            rows.len()
        );
        Ok(Self { headers, rows })
    }

    pub fn from_xlsx(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_xlsx_reader(BufReader::new(file))
    }

    pub fn write_xlsx(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Score columns are written as numbers, everything else as text.
    fn to_workbook(&self) -> Result<Workbook> {
        let numeric: Vec<bool> = self
            .headers
            .iter()
            .map(|h| SCORE_COLUMNS.contains(&h.trim()))
            .collect();

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string(0, xlsx_col(col)?, header)?;
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let row_num = u32::try_from(idx + 1).map_err(|_| {
                ReportError::InvalidTable(format!("row {} does not fit in a worksheet", idx + 1))
            })?;
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col_num = xlsx_col(col)?;
                match value.trim().parse::<f64>() {
                    Ok(number) if numeric[col] && number.is_finite() => {
                        worksheet.write_number(row_num, col_num, number)?;
                    }
                    _ => {
                        worksheet.write_string(row_num, col_num, value)?;
                    }
                }
            }
        }

        Ok(workbook)
    }
}

#[cfg(feature = "xlsx")]
fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

#[cfg(feature = "xlsx")]
fn xlsx_col(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| ReportError::InvalidTable(format!("column {} does not fit in a worksheet", col + 1)))
}

#[cfg(feature = "xlsx")]
fn xlsx_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) => format_score(*value),
        Data::Int(value) => format_score(*value as f64),
        other => other.to_string(),
    }
}
