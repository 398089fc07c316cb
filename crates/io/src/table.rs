// In-memory header + rows, the common shape every loader produces.

use crawlparity_recon::CellValue;

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build from raw rows, taking the first row as headers.
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0).iter().map(|c| c.coerce_text()).collect();
        Self { headers, rows }
    }

    /// Index of the first header equal to `name`, ignoring case and surrounding whitespace.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    /// First header matching any candidate, in candidate order.
    pub fn first_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|c| self.column(c))
    }

    /// Cell at (row, col). Short rows read as `Empty`.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when every non-blank cell in `col` is numeric and at least one exists.
    pub fn is_numeric_column(&self, col: usize) -> bool {
        let mut seen = false;
        for row in 0..self.rows.len() {
            let cell = self.cell(row, col);
            if cell.is_empty() {
                continue;
            }
            if !cell.is_numeric() {
                return false;
            }
            seen = true;
        }
        seen
    }
}
