use crate::error::{Result, StatementError};
use crate::utils::{excel_serial_to_date, parse_date_str};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use log::debug;
use std::path::Path;

/// A spreadsheet cell decoupled from the reader backend, so the pipeline
/// never touches calamine types directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

/// A raw worksheet: the header row plus every data row below it.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn cell<'a>(&self, row: &'a [Cell], name: &str) -> Option<&'a Cell> {
        self.column_index(name).and_then(|index| row.get(index))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads the first worksheet of a spreadsheet file into a [`Table`].
///
/// The export format puts a title in the first row and the column headers in
/// the second; everything below the header row is data.
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(StatementError::MissingCompanyFile(path.to_path_buf()));
    }

    let label = file_label(path);
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| StatementError::EmptyWorksheet {
            file: label.clone(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    let start_row = range
        .start()
        .map(|(row, _)| row as usize)
        .ok_or_else(|| StatementError::EmptyWorksheet {
            file: label.clone(),
        })?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (offset, row) in range.rows().enumerate() {
        // Absolute worksheet row: 0 is the title, 1 is the header.
        match start_row + offset {
            0 => continue,
            1 => headers = Some(row.iter().map(header_text).collect()),
            _ => rows.push(row.iter().map(convert_cell).collect()),
        }
    }

    let headers = headers.ok_or_else(|| StatementError::EmptyWorksheet {
        file: label.clone(),
    })?;
    debug!("Read {} with {} data rows", label, rows.len());
    Ok(Table { headers, rows })
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(text) => text.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(datetime) => excel_serial_to_date(datetime.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(text) => parse_date_str(text).map(Cell::Date).unwrap_or(Cell::Empty),
        Data::DurationIso(_) | Data::Error(_) => Cell::Empty,
    }
}
