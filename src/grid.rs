use std::collections::VecDeque;

use bitflags::bitflags;

use crate::color::Color;
use crate::cursor::CellAttrs;

/// Default scrollback bound (SPEC_FULL §6); overridable at construction for
/// tests that need a different cap.
pub const MAX_SCROLLBACK: usize = 5000;

bitflags! {
    /// Per-cell flags for wide character tracking.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct CellFlags: u8 {
        /// This cell holds a wide (2-column) character.
        const WIDE_CHAR   = 1 << 0;
        /// This cell is the trailing placeholder of a wide character.
        const WIDE_SPACER = 1 << 1;
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub c: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: CellAttrs,
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            c: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: CellAttrs::empty(),
            flags: CellFlags::empty(),
        }
    }
}

impl Cell {
    /// Create the trailing placeholder cell of a wide character, inheriting
    /// the given background (SPEC_FULL §3 invariant 4).
    pub fn wide_spacer(bg: Color) -> Self {
        Self {
            c: ' ',
            bg,
            flags: CellFlags::WIDE_SPACER,
            ..Default::default()
        }
    }

    /// Reset the cell to its default blank state.
    pub fn clear(&mut self) {
        *self = Cell::default();
    }

    /// Erase the cell using the given background color (blank cells use the
    /// erasing background, never the foreground — ECMA-48).
    pub fn erase(&mut self, bg: Color) {
        self.c = ' ';
        self.fg = Color::Default;
        self.bg = bg;
        self.attrs = CellAttrs::empty();
        self.flags = CellFlags::empty();
    }
}

/// A single row of cells.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cols: u16) -> Self {
        Self {
            cells: vec![Cell::default(); cols as usize],
        }
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    pub fn erase_with_bg(&mut self, bg: Color) {
        for cell in &mut self.cells {
            cell.erase(bg);
        }
    }

    pub fn resize(&mut self, cols: u16) {
        self.cells.resize(cols as usize, Cell::default());
    }

    /// Plain text for this row: cell characters except wide-spacer
    /// placeholders, trailing spaces trimmed (SPEC_FULL §4.11).
    pub fn text(&self) -> String {
        let mut s: String = self
            .cells
            .iter()
            .filter(|c| !c.flags.contains(CellFlags::WIDE_SPACER))
            .map(|c| c.c)
            .collect();
        while s.ends_with(' ') {
            s.pop();
        }
        s
    }
}

/// The terminal grid: visible rows plus scrollback history.
///
/// `rows` holds scrollback followed by the visible window in the last
/// `visible_rows` entries, matching the teacher's representation: scrolling
/// a row off the top of the region is simply leaving it where it is while
/// the visible window slides down over the deque.
pub struct Grid {
    pub rows: VecDeque<Row>,
    pub cols: u16,
    pub visible_rows: u16,
    pub scrollback_limit: usize,
}

impl Grid {
    pub fn new(visible_rows: u16, cols: u16) -> Self {
        Self::with_scrollback_limit(visible_rows, cols, MAX_SCROLLBACK)
    }

    pub fn with_scrollback_limit(visible_rows: u16, cols: u16, scrollback_limit: usize) -> Self {
        let mut rows = VecDeque::with_capacity(visible_rows as usize);
        for _ in 0..visible_rows {
            rows.push_back(Row::new(cols));
        }
        Self {
            rows,
            cols,
            visible_rows,
            scrollback_limit,
        }
    }

    fn visible_offset(&self) -> usize {
        self.rows.len().saturating_sub(self.visible_rows as usize)
    }

    /// Number of rows currently held in scrollback.
    pub fn scrollback_len(&self) -> usize {
        self.visible_offset()
    }

    /// Reference to a visible row by screen-relative index (0 = top).
    pub fn visible_row(&self, row: u16) -> &Row {
        let idx = self.visible_offset() + row as usize;
        &self.rows[idx]
    }

    /// Mutable reference to a visible row by screen-relative index.
    pub fn visible_row_mut(&mut self, row: u16) -> &mut Row {
        let idx = self.visible_offset() + row as usize;
        &mut self.rows[idx]
    }

    /// Write a cell at the given screen-relative position.
    pub fn set_cell(&mut self, row: u16, col: u16, cell: Cell) {
        if col < self.cols && row < self.visible_rows {
            self.visible_row_mut(row).cells[col as usize] = cell;
        }
    }

    /// Scroll `[top, bottom]` up by one line. The top line moves into
    /// scrollback when `top == 0` (only the primary screen calls this with
    /// scrollback capture enabled, via the caller discarding the result);
    /// a blank line is appended at `bottom`. Returns the row that scrolled
    /// off the top of the *visible area*, if any (for scrollback capture by
    /// the caller — discarded entirely while on the alternate screen).
    pub fn scroll_up(&mut self, top: u16, bottom: u16) -> Option<Row> {
        let offset = self.visible_offset();
        let top_idx = offset + top as usize;
        let bottom_idx = offset + bottom as usize;

        if top_idx > bottom_idx || bottom_idx >= self.rows.len() {
            return None;
        }

        let scrolled = if top == 0 {
            let scrolled_row = self.rows[top_idx].clone();
            self.rows.insert(bottom_idx + 1, Row::new(self.cols));
            while self.rows.len() > self.visible_rows as usize + self.scrollback_limit {
                self.rows.pop_front();
            }
            Some(scrolled_row)
        } else {
            self.rows.remove(top_idx);
            self.rows.insert(bottom_idx, Row::new(self.cols));
            None
        };

        scrolled
    }

    /// Scroll `[top, bottom]` down by one line: the bottom line is
    /// discarded, a blank line is inserted at `top`.
    pub fn scroll_down(&mut self, top: u16, bottom: u16) {
        let offset = self.visible_offset();
        let top_idx = offset + top as usize;
        let bottom_idx = offset + bottom as usize;

        if top_idx > bottom_idx || bottom_idx >= self.rows.len() {
            return;
        }

        self.rows.remove(bottom_idx);
        self.rows.insert(top_idx, Row::new(self.cols));
    }

    /// Resize to new dimensions, preserving the overlapping top-left
    /// sub-rectangle cell-for-cell (SPEC_FULL §4.10). Scrollback rows are
    /// kept as-is, not reflowed.
    pub fn resize(&mut self, new_rows: u16, new_cols: u16) {
        for row in self.rows.iter_mut() {
            row.resize(new_cols);
        }

        let current_visible = self.visible_rows as usize;
        let new_visible = new_rows as usize;
        if new_visible > current_visible {
            for _ in 0..(new_visible - current_visible) {
                self.rows.push_back(Row::new(new_cols));
            }
        }

        self.visible_rows = new_rows;
        self.cols = new_cols;

        // A narrower grid may have truncated the spacer half of a wide
        // pair, leaving an orphan on either side; repair every row.
        for row in 0..self.visible_rows {
            self.repair_wide_pairs(row);
        }
    }

    /// Clear any wide/spacer cell on `row` that lost its partner, so
    /// invariant 4 (a wide cell is always immediately followed by its
    /// spacer) holds after a structural shift.
    fn repair_wide_pairs(&mut self, row: u16) {
        if row >= self.visible_rows {
            return;
        }
        let cols = self.cols as usize;
        let r = self.visible_row_mut(row);
        for i in 0..cols {
            if r.cells[i].flags.contains(CellFlags::WIDE_CHAR) {
                let ok = i + 1 < cols && r.cells[i + 1].flags.contains(CellFlags::WIDE_SPACER);
                if !ok {
                    r.cells[i].clear();
                }
            } else if r.cells[i].flags.contains(CellFlags::WIDE_SPACER) {
                let ok = i > 0 && r.cells[i - 1].flags.contains(CellFlags::WIDE_CHAR);
                if !ok {
                    r.cells[i].clear();
                }
            }
        }
    }

    /// Resize for the alternate screen buffer: content is disposable (a
    /// full-screen program always repaints from scratch on SIGWINCH), so
    /// the grid is simply recreated at the new dimensions rather than
    /// preserving overlap.
    pub fn resize_no_scrollback(&mut self, new_rows: u16, new_cols: u16) {
        self.rows.clear();
        for _ in 0..new_rows {
            self.rows.push_back(Row::new(new_cols));
        }
        self.visible_rows = new_rows;
        self.cols = new_cols;
    }

    /// Drop every scrollback row, keeping only the visible window.
    pub fn clear_scrollback(&mut self) {
        let keep = self.visible_rows as usize;
        while self.rows.len() > keep {
            self.rows.pop_front();
        }
    }

    /// Erase cells `[start_col, end_col)` on a row, filling with `bg`.
    pub fn erase_cells(&mut self, row: u16, start_col: u16, end_col: u16, bg: Color) {
        if row >= self.visible_rows {
            return;
        }
        let r = self.visible_row_mut(row);
        let start = start_col as usize;
        let end = (end_col as usize).min(r.cells.len());
        for i in start..end {
            r.cells[i].erase(bg);
        }
        self.repair_wide_pairs(row);
    }

    /// Insert `count` blank cells at `col`, shifting the rest of the row
    /// right and truncating at `cols`.
    pub fn insert_cells(&mut self, row: u16, col: u16, count: u16) {
        if row >= self.visible_rows {
            return;
        }
        let r = self.visible_row_mut(row);
        let col = col as usize;
        let len = r.cells.len();
        let count = (count as usize).min(len.saturating_sub(col));
        for _ in 0..count {
            r.cells.pop();
            r.cells.insert(col, Cell::default());
        }
        self.repair_wide_pairs(row);
    }

    /// Delete `count` cells starting at `col`, shifting the remainder left
    /// and padding the row end with blanks.
    pub fn delete_cells(&mut self, row: u16, col: u16, count: u16) {
        if row >= self.visible_rows {
            return;
        }
        let r = self.visible_row_mut(row);
        let col = col as usize;
        let to_remove = (count as usize).min(r.cells.len().saturating_sub(col));
        for _ in 0..to_remove {
            if col < r.cells.len() {
                r.cells.remove(col);
                r.cells.push(Cell::default());
            }
        }
        self.repair_wide_pairs(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_up_from_top_captures_row_and_bounds_scrollback() {
        let mut grid = Grid::with_scrollback_limit(3, 4, 2);
        grid.set_cell(0, 0, Cell { c: 'a', ..Default::default() });
        let scrolled = grid.scroll_up(0, 2);
        assert_eq!(scrolled.unwrap().cells[0].c, 'a');
        assert_eq!(grid.scrollback_len(), 1);

        for _ in 0..5 {
            grid.scroll_up(0, 2);
        }
        assert!(grid.scrollback_len() <= 2);
    }

    #[test]
    fn insert_and_delete_cells_shift_and_pad() {
        let mut grid = Grid::new(1, 5);
        for i in 0..5u16 {
            grid.set_cell(0, i, Cell { c: (b'a' + i as u8) as char, ..Default::default() });
        }
        grid.insert_cells(0, 1, 2);
        let row = grid.visible_row(0);
        assert_eq!(row.cells[0].c, 'a');
        assert_eq!(row.cells[1].c, ' ');
        assert_eq!(row.cells[2].c, ' ');
        assert_eq!(row.cells[3].c, 'b');
        assert_eq!(row.cells[4].c, 'c');

        grid.delete_cells(0, 0, 2);
        let row = grid.visible_row(0);
        assert_eq!(row.cells[0].c, ' ');
        assert_eq!(row.cells[1].c, 'b');
        assert_eq!(row.cells[row.cells.len() - 1].c, ' ');
    }

    #[test]
    fn resize_preserves_top_left_rectangle() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell(0, 0, Cell { c: 'x', ..Default::default() });
        grid.resize(3, 3);
        assert_eq!(grid.visible_row(0).cells[0].c, 'x');
        assert_eq!(grid.visible_rows, 3);
        assert_eq!(grid.cols, 3);
    }

    #[test]
    fn insert_repairs_a_wide_pair_split_by_the_shift() {
        let mut grid = Grid::new(1, 4);
        grid.set_cell(0, 2, Cell { c: '\u{4e00}', flags: CellFlags::WIDE_CHAR, ..Default::default() });
        grid.set_cell(0, 3, Cell::wide_spacer(Color::Default));

        // Inserting at col 3 pushes the spacer out and leaves an orphan.
        grid.insert_cells(0, 3, 1);
        let row = grid.visible_row(0);
        assert!(!row.cells[2].flags.contains(CellFlags::WIDE_CHAR));
    }

    #[test]
    fn resize_repairs_a_wide_pair_truncated_by_shrinking() {
        let mut grid = Grid::new(1, 4);
        grid.set_cell(0, 2, Cell { c: '\u{4e00}', flags: CellFlags::WIDE_CHAR, ..Default::default() });
        grid.set_cell(0, 3, Cell::wide_spacer(Color::Default));

        grid.resize(1, 3);
        let row = grid.visible_row(0);
        assert!(!row.cells[2].flags.contains(CellFlags::WIDE_CHAR));
    }

    #[test]
    fn erase_repairs_a_wide_pair_split_by_a_partial_erase() {
        let mut grid = Grid::new(1, 4);
        grid.set_cell(0, 2, Cell { c: '\u{4e00}', flags: CellFlags::WIDE_CHAR, ..Default::default() });
        grid.set_cell(0, 3, Cell::wide_spacer(Color::Default));

        grid.erase_cells(0, 3, 4, Color::Default);
        let row = grid.visible_row(0);
        assert!(!row.cells[2].flags.contains(CellFlags::WIDE_CHAR));
    }

    #[test]
    fn row_text_trims_trailing_spaces_and_skips_spacers() {
        let mut row = Row::new(4);
        row.cells[0].c = 'h';
        row.cells[1].c = 'i';
        row.cells[2].c = ' ';
        row.cells[3].flags = CellFlags::WIDE_SPACER;
        assert_eq!(row.text(), "hi");
    }
}
