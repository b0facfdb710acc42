//! Table grid layout
//!
//! Word tables have no row spans: a cell spanning rows is a `restart` cell followed by
//! `continue` placeholders in the same grid column of the following rows. This module
//! computes where those placeholders go and pads ragged rows to a rectangular grid.

use crate::model::{TableCellElement, TableRowElement};

/// One slot of a laid-out row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell<'a> {
    /// A real cell, spanning `col_span` grid columns
    Origin(&'a TableCellElement),
    /// Placeholder continuing a row span from above
    Continuation { col_span: u32 },
    /// Empty cell padding a short row
    Filler,
}

impl GridCell<'_> {
    pub fn width(&self) -> usize {
        match self {
            GridCell::Origin(cell) => cell.col_span.max(1) as usize,
            GridCell::Continuation { col_span } => (*col_span).max(1) as usize,
            GridCell::Filler => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid<'a> {
    pub columns: usize,
    pub rows: Vec<Vec<GridCell<'a>>>,
}

/// Rows still covered by a row span, per grid column.
#[derive(Default)]
struct Carry {
    remaining: Vec<u32>,
    /// Column span of the merge that starts at this column, 0 elsewhere
    origin_span: Vec<u32>,
}

impl Carry {
    fn ensure(&mut self, columns: usize) {
        if self.remaining.len() < columns {
            self.remaining.resize(columns, 0);
            self.origin_span.resize(columns, 0);
        }
    }

    fn pending_from(&self, col: usize) -> bool {
        self.remaining.iter().skip(col).any(|rows| *rows > 0)
    }

    /// Emit placeholders for spans covering `col` onward; stops at the first free
    /// column unless `to_end` is set.
    fn emit<'a>(&mut self, row: &mut Vec<GridCell<'a>>, mut col: usize, to_end: bool) -> usize {
        while col < self.remaining.len() {
            if self.remaining[col] == 0 {
                if to_end && self.pending_from(col) {
                    row.push(GridCell::Filler);
                    col += 1;
                    continue;
                }
                break;
            }

            let span = self.origin_span[col] as usize;
            if span == 0 {
                // covered by a merge that a later cell overwrote
                self.remaining[col] -= 1;
                row.push(GridCell::Filler);
                col += 1;
                continue;
            }

            let end = (col + span).min(self.remaining.len());
            for rows in &mut self.remaining[col..end] {
                *rows = rows.saturating_sub(1);
            }
            row.push(GridCell::Continuation {
                col_span: span as u32,
            });
            col += span;
        }
        col
    }

    fn place(&mut self, col: usize, cell: &TableCellElement) {
        let span = cell.col_span.max(1) as usize;
        self.ensure(col + span);
        for c in col..col + span {
            self.remaining[c] = cell.row_span.saturating_sub(1);
            self.origin_span[c] = 0;
        }
        if cell.row_span > 1 {
            self.origin_span[col] = span as u32;
        }
    }
}

/// Lay out rows on a rectangular grid.
pub fn layout(rows: &[TableRowElement]) -> TableGrid<'_> {
    let mut carry = Carry::default();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out = Vec::with_capacity(row.cells.len());
        let mut col = 0;
        for cell in &row.cells {
            col = carry.emit(&mut out, col, false);
            carry.place(col, cell);
            out.push(GridCell::Origin(cell));
            col += cell.col_span.max(1) as usize;
        }
        carry.emit(&mut out, col, true);
        grid.push(out);
    }

    let columns = grid
        .iter()
        .map(|row| row.iter().map(GridCell::width).sum::<usize>())
        .max()
        .unwrap_or(0);

    for row in &mut grid {
        let width: usize = row.iter().map(GridCell::width).sum();
        row.extend(std::iter::repeat(GridCell::Filler).take(columns.saturating_sub(width)));
    }

    TableGrid {
        columns,
        rows: grid,
    }
}
