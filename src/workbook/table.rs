use crate::error::InputError;
use crate::workbook::Cell;
use crate::Result;
use std::collections::HashMap;

/// A sheet indexed by its header row. Header text is trimmed, so `" User "` and `"User"` name the
/// same column. When a header appears twice the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    sheet: String,
    headers: Vec<String>,
    header_map: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
    row_numbers: Vec<usize>,
}

impl Table {
    /// Builds a table from raw sheet rows. The first row is the header row. Rows in which every
    /// cell is blank are dropped.
    pub fn new(sheet: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut rows = rows.into_iter();
        let headers: Vec<String> = rows
            .next()
            .map(|header_row| {
                header_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut header_map = HashMap::new();
        for (ix, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            header_map.entry(header.clone()).or_insert(ix);
        }

        let (row_numbers, rows): (Vec<usize>, Vec<Vec<Cell>>) = rows
            .enumerate()
            .filter(|(_, row)| !row.iter().all(Cell::is_blank))
            .map(|(ix, row)| (ix + 2, row))
            .unzip();

        Self {
            sheet: sheet.into(),
            headers,
            header_map,
            rows,
            row_numbers,
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The data rows, without the header row.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The index of `header`, or `None` when it is absent.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.header_map.get(header.trim()).copied()
    }

    /// The index of `header`, or `InputError::MissingColumn` when it is absent.
    pub fn require(&self, header: &str) -> Result<usize> {
        self.column(header)
            .ok_or_else(|| InputError::missing_column(&self.sheet, header.trim()).into())
    }

    /// The cell at `row` and `col`. Short rows are padded with empty cells.
    pub fn cell<'a>(&'a self, row: &'a [Cell], col: usize) -> &'a Cell {
        const EMPTY: &Cell = &Cell::Empty;
        row.get(col).unwrap_or(EMPTY)
    }

    /// The 1-based spreadsheet row number of data row `index`, counting the header row and any
    /// blank rows that were dropped.
    pub fn sheet_row(&self, index: usize) -> usize {
        self.row_numbers.get(index).copied().unwrap_or(index + 2)
    }
}
