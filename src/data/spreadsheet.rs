use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet, XlsxError};
use thiserror::Error;

use super::infer::recover_column;
use super::model::{CellValue, Column, Dataset, DatasetError, Workbook};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The path is missing, unreadable, unwritable or not a spreadsheet.
    #[error("cannot access {}: {reason}", .path.display())]
    FileAccess { path: PathBuf, reason: String },

    /// The file opened but its contents cannot be used as a workbook.
    #[error("{} is not a usable workbook: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidOperation {
    #[error("**INVALID OPERATION '{0}'!**")]
    Unknown(String),

    #[error("**MISSING DATA SET FOR WRITE OPERATION!**")]
    MissingDataset,
}

fn file_access(path: &Path, reason: impl ToString) -> BridgeError {
    BridgeError::FileAccess {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn format_error(path: &Path, reason: impl ToString) -> BridgeError {
    BridgeError::Format {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Format dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Spreadsheet,
    Csv,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Formats that can be read. Dispatch by extension.
fn read_format(path: &Path) -> Result<FileFormat, BridgeError> {
    match extension(path).as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Spreadsheet),
        "csv" => Ok(FileFormat::Csv),
        other => Err(file_access(
            path,
            format!("unsupported file extension: .{other}"),
        )),
    }
}

/// Formats that can be written: `.xlsx` and `.csv`.
fn write_format(path: &Path) -> Result<FileFormat, BridgeError> {
    match extension(path).as_str() {
        "xlsx" => Ok(FileFormat::Spreadsheet),
        "csv" => Ok(FileFormat::Csv),
        other => Err(format_error(
            path,
            format!("cannot write .{other} files, use .xlsx or .csv"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

/// Read every sheet of a spreadsheet into a dataset keyed by sheet name.
///
/// The first row of each sheet is the header. Cells keep the type the file
/// stores, except that numbers are settled per column: a column whose numbers
/// are all whole comes back as integers, any other numeric column as floats.
/// A CSV file is a workbook with one sheet named after the file stem.
pub fn read_workbook(path: &Path) -> Result<Workbook, BridgeError> {
    let workbook = match read_format(path)? {
        FileFormat::Spreadsheet => read_spreadsheet(path)?,
        FileFormat::Csv => read_csv(path)?,
    };
    log::info!(
        "Read {} sheet(s) {:?} from {}",
        workbook.len(),
        workbook.keys().collect::<Vec<_>>(),
        path.display()
    );
    Ok(workbook)
}

fn read_spreadsheet(path: &Path) -> Result<Workbook, BridgeError> {
    let mut sheets = open_workbook_auto(path).map_err(|e| file_access(path, e))?;

    let sheet_names = sheets.sheet_names();
    if sheet_names.is_empty() {
        return Err(format_error(path, "workbook has no sheets"));
    }

    let mut workbook = Workbook::new();
    for name in sheet_names {
        let range = sheets
            .worksheet_range(&name)
            .map_err(|e| format_error(path, format!("sheet '{name}': {e}")))?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            workbook.insert(name, Dataset::new());
            continue;
        };
        let names = unique_headers(header.iter().map(header_text).collect());

        let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(data_to_cell_value(cell));
            }
        }

        let dataset = assemble(names, columns)
            .map_err(|e| format_error(path, format!("sheet '{name}': {e}")))?;
        workbook.insert(name, dataset);
    }
    Ok(workbook)
}

fn read_csv(path: &Path) -> Result<Workbook, BridgeError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| file_access(path, e))?;
    let header: Vec<String> = reader
        .headers()
        .map_err(|e| format_error(path, format!("reading CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();
    if header.is_empty() {
        return Err(format_error(path, "CSV has no header row"));
    }
    let names = unique_headers(header);

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format_error(path, format!("CSV row {row_no}: {e}")))?;
        for (col, field) in columns.iter_mut().zip(record.iter()) {
            col.push(guess_cell_type(field));
        }
    }

    let dataset = assemble(names, columns).map_err(|e| format_error(path, e))?;
    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    let mut workbook = Workbook::new();
    workbook.insert(sheet_name, dataset);
    Ok(workbook)
}

fn assemble(
    names: Vec<String>,
    columns: Vec<Vec<CellValue>>,
) -> Result<Dataset, DatasetError> {
    Dataset::from_columns(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, settle_numbers(values)))
            .collect(),
    )
}

/// Largest magnitude below which every whole double is an exact `i64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER
}

/// Give every number in a column the same type. Spreadsheets store numbers as
/// doubles, so whole values only become integers when the whole column is.
/// Non-numeric cells are left alone.
fn settle_numbers(values: Vec<CellValue>) -> Vec<CellValue> {
    let all_whole = values.iter().all(|v| match v {
        CellValue::Float(f) => is_whole(*f),
        _ => true,
    });
    values
        .into_iter()
        .map(|v| match v {
            CellValue::Float(f) if all_whole => CellValue::Integer(f as i64),
            CellValue::Integer(i) if !all_whole => CellValue::Float(i as f64),
            other => other,
        })
        .collect()
}

fn unnamed(index: usize) -> String {
    format!("Unnamed: {index}")
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => data_to_cell_value(other).to_string(),
    }
}

/// Fill blank header cells and suffix repeated names with `.1`, `.2`, …
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let name = if name.is_empty() { unnamed(i) } else { name };
            let mut candidate = name.clone();
            let mut n = 0;
            while taken.contains(&candidate) {
                n += 1;
                candidate = format!("{name}.{n}");
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Convert a calamine cell to a [`CellValue`].
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel serial date, days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

/// Apply per-column type recovery.
fn recover_types(dataset: &Dataset) -> Vec<Column> {
    dataset
        .columns()
        .iter()
        .map(|c| Column::new(c.name.clone(), recover_column(&c.values)))
        .collect()
}

/// Write one dataset to a single-sheet file, replacing anything at `path`.
///
/// Each column is converted to integers or floats when every value allows
/// it; otherwise it is written as-is. No row index is written.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), BridgeError> {
    write_sheets(path, std::slice::from_ref(dataset))
}

/// Write each dataset to its own sheet, named `Sheet1`, `Sheet2`, … in order.
/// CSV targets accept exactly one dataset.
pub fn write_sheets(path: &Path, datasets: &[Dataset]) -> Result<(), BridgeError> {
    if datasets.is_empty() {
        return Err(format_error(path, "at least one sheet must be written"));
    }

    match write_format(path)? {
        FileFormat::Spreadsheet => {
            let mut workbook = XlsxWorkbook::new();
            for (i, dataset) in datasets.iter().enumerate() {
                let worksheet = workbook.add_worksheet();
                worksheet
                    .set_name(format!("Sheet{}", i + 1))
                    .map_err(|e| format_error(path, e))?;
                write_worksheet(worksheet, &recover_types(dataset))
                    .map_err(|e| format_error(path, e))?;
            }
            workbook.save(path).map_err(|e| file_access(path, e))?;
        }
        FileFormat::Csv => {
            let [dataset] = datasets else {
                return Err(format_error(
                    path,
                    format!("CSV holds one sheet, got {}", datasets.len()),
                ));
            };
            write_csv(path, &recover_types(dataset))?;
        }
    }

    log::info!(
        "Wrote {} sheet(s) to {}",
        datasets.len(),
        path.display()
    );
    Ok(())
}

fn write_worksheet(worksheet: &mut Worksheet, columns: &[Column]) -> Result<(), XlsxError> {
    for (col_idx, column) in columns.iter().enumerate() {
        let col_num = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string(0, col_num, column.name.as_str())?;

        for (row_idx, cell) in column.values.iter().enumerate() {
            let row_num = u32::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            match cell {
                CellValue::Null => {}
                // Excel has no NaN or infinity; such cells stay blank.
                CellValue::Float(f) if !f.is_finite() => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                CellValue::Integer(i) => {
                    // Doubles hold integers exactly up to 2^53.
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row_num, col_num, *f)?;
                }
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col_num, s.as_str())?;
                }
            }
        }
    }
    Ok(())
}

fn write_csv(path: &Path, columns: &[Column]) -> Result<(), BridgeError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| file_access(path, e))?;
    writer
        .write_record(columns.iter().map(|c| c.name.as_str()))
        .map_err(|e| file_access(path, e))?;

    let rows = columns.first().map_or(0, Column::len);
    for row in 0..rows {
        writer
            .write_record(columns.iter().map(|c| c.values[row].to_string()))
            .map_err(|e| file_access(path, e))?;
    }
    writer.flush().map_err(|e| file_access(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
}

impl FromStr for FileOperation {
    type Err = InvalidOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(FileOperation::Read),
            "write" => Ok(FileOperation::Write),
            other => Err(InvalidOperation::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOperation::Read => f.write_str("read"),
            FileOperation::Write => f.write_str("write"),
        }
    }
}

/// What a successful file operation produced.
#[derive(Debug)]
pub enum FileOutcome {
    Loaded(Workbook),
    Saved(PathBuf),
}

impl FileOutcome {
    pub fn into_workbook(self) -> Option<Workbook> {
        match self {
            FileOutcome::Loaded(workbook) => Some(workbook),
            FileOutcome::Saved(_) => None,
        }
    }
}

/// Run `operation` ("read" or "write") against `path`, returning the typed
/// error on failure. A write requires `dataset`.
pub fn try_search_for_file(
    path: &Path,
    operation: &str,
    dataset: Option<&Dataset>,
) -> Result<FileOutcome, BridgeError> {
    match (operation.parse::<FileOperation>()?, dataset) {
        (FileOperation::Read, _) => read_workbook(path).map(FileOutcome::Loaded),
        (FileOperation::Write, Some(dataset)) => {
            write_dataset(path, dataset).map(|()| FileOutcome::Saved(path.to_path_buf()))
        }
        (FileOperation::Write, None) => Err(InvalidOperation::MissingDataset.into()),
    }
}

/// Like [`try_search_for_file`], but every failure is logged and flattened
/// to `None`.
pub fn search_for_file(
    path: &Path,
    operation: &str,
    dataset: Option<&Dataset>,
) -> Option<FileOutcome> {
    match try_search_for_file(path, operation, dataset) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            log::error!("An error occurred while trying to {operation} the file: {e}");
            None
        }
    }
}
