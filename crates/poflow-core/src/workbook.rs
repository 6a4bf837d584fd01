//! Legacy `.xls` workbook decoding.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls};
use tracing::{debug, info};

use crate::error::WorkbookError;
use crate::models::{Cell, Grid};

/// Decode the first worksheet of an `.xls` workbook held in memory.
pub fn read_first_worksheet(bytes: &[u8]) -> Result<Grid, WorkbookError> {
    let mut workbook: Xls<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e: calamine::XlsError| WorkbookError::Open(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbookError::NoWorksheet)?
        .map_err(|e| WorkbookError::Read(e.to_string()))?;

    let grid = range_to_grid(&range);
    info!("Read worksheet with {} rows", grid.len());
    Ok(grid)
}

/// Read a workbook file and decode its first worksheet.
pub fn read_workbook_file(path: &Path) -> crate::Result<Grid> {
    let bytes = std::fs::read(path)?;
    Ok(read_first_worksheet(&bytes)?)
}

/// Lay the range out in sheet coordinates, padding the leading blank rows and
/// columns calamine trims off.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    debug!("Worksheet range starts at ({}, {})", row_offset, col_offset);

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for source in range.rows() {
        let mut row = vec![Cell::Empty; col_offset];
        row.extend(source.iter().map(data_to_cell));
        rows.push(row);
    }

    Grid::new(rows)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::Empty => Cell::Empty,
    }
}
