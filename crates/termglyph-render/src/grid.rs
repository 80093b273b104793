//! Read interface to the terminal screen.

/// Character grid the mesh is built from.
///
/// Row 0 is the top of the screen. Implementations must not change while a
/// mesh is being built from them; callers sharing a live terminal buffer
/// across threads should copy it into a [`GridSnapshot`] first.
pub trait TerminalGrid {
    fn columns(&self) -> usize;

    fn rows(&self) -> usize;

    /// Character at `(column, row)`. `'\0'` marks an empty cell.
    fn char_at(&self, column: usize, row: usize) -> char;
}

/// Owned, row-major copy of a terminal screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    columns: usize,
    rows: usize,
    cells: Vec<char>,
}

impl GridSnapshot {
    /// Empty grid of `columns x rows` cells.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec!['\0'; columns * rows],
        }
    }

    /// Grid filled from text lines, top row first.
    ///
    /// Lines longer than `columns` are truncated and lines past `rows` are
    /// dropped.
    pub fn from_lines<'a>(
        columns: usize,
        rows: usize,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut grid = Self::new(columns, rows);
        for (row, line) in lines.into_iter().take(rows).enumerate() {
            for (column, ch) in line.chars().take(columns).enumerate() {
                grid.set(column, row, ch);
            }
        }
        grid
    }

    /// Copy the current contents of another grid.
    pub fn capture(grid: &(impl TerminalGrid + ?Sized)) -> Self {
        let (columns, rows) = (grid.columns(), grid.rows());
        let mut cells = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(grid.char_at(column, row));
            }
        }
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Store `ch` at `(column, row)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, column: usize, row: usize, ch: char) {
        if column < self.columns && row < self.rows {
            self.cells[row * self.columns + column] = ch;
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill('\0');
    }
}

impl TerminalGrid for GridSnapshot {
    fn columns(&self) -> usize {
        self.columns
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn char_at(&self, column: usize, row: usize) -> char {
        if column >= self.columns || row >= self.rows {
            return '\0';
        }
        self.cells[row * self.columns + column]
    }
}
