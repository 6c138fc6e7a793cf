use crate::{
    cell::Cell,
    piece2::{Piece2, PieceKind2},
};

/// A flat playfield: a runtime-sized grid of [`Cell`]s indexed by
/// `(x, y)` with `y = 0` at the top, plus per-column height and hole
/// caches kept current on every write.
///
/// Freezing a piece and removing it again are exact inverses, caches
/// included, which is what lets the search layer speculate on one shared
/// board instead of cloning it per candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board2 {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    column_heights: Vec<usize>,
    column_holes: Vec<usize>,
}

impl Board2 {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
            column_heights: vec![0; width],
            column_holes: vec![0; width],
        }
    }

    /// Builds a board from an ASCII art string where `#` is an occupied
    /// cell and `.` is empty. Leading/trailing blank lines and per-line
    /// indentation are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the art is empty, ragged, or contains other characters.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let rows: Vec<&str> = art.lines().map(str::trim).filter(|s| !s.is_empty()).collect();
        assert!(!rows.is_empty(), "board art must have at least one row");
        let width = rows[0].len();
        let mut board = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "board art rows must share one width");
            for (x, ch) in row.bytes().enumerate() {
                match ch {
                    b'#' => board.cells[y * width + x] = Cell::Filled(crate::PieceColor::new(0)),
                    b'.' => {}
                    _ => panic!("board art cells must be '#' or '.'"),
                }
            }
        }
        for x in 0..width {
            board.recompute_column(x);
        }
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads a cell. Out-of-range coordinates read as [`Cell::Empty`].
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if !self.contains(x, y) {
            return Cell::Empty;
        }
        #[expect(clippy::cast_sign_loss)]
        let idx = y as usize * self.width + x as usize;
        self.cells[idx]
    }

    /// Writes a cell and refreshes the touched column's caches.
    /// Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if !self.contains(x, y) {
            return;
        }
        #[expect(clippy::cast_sign_loss)]
        let (x, y) = (x as usize, y as usize);
        self.cells[y * self.width + x] = cell;
        self.recompute_column(x);
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        #[expect(clippy::cast_possible_wrap)]
        let inside = x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32;
        inside
    }

    /// True when any of the piece's cells lies outside the board or over
    /// an occupied cell.
    #[must_use]
    pub fn collides(&self, piece: &Piece2) -> bool {
        piece
            .occupied_cells()
            .any(|(x, y)| !self.contains(x, y) || self.cell(x, y).is_occupied())
    }

    /// Creates a piece positioned at the top row, horizontally centered.
    /// The piece is not placed; callers check [`Self::collides`] to detect
    /// a blocked spawn.
    #[must_use]
    pub fn spawn(&self, kind: PieceKind2) -> Piece2 {
        let mut piece = Piece2::new(kind);
        #[expect(clippy::cast_possible_wrap)]
        let x = (self.width as i32 - piece.width() as i32) / 2;
        piece.set_position(x, 0);
        piece
    }

    /// Writes the piece's cells into the board.
    pub fn freeze(&mut self, piece: &Piece2) {
        for (x, y) in piece.occupied_cells() {
            self.set_cell(x, y, Cell::Filled(piece.color()));
        }
    }

    /// Erases the piece's cells, exactly undoing a [`Self::freeze`] of the
    /// same piece at the same position.
    pub fn remove(&mut self, piece: &Piece2) {
        for (x, y) in piece.occupied_cells() {
            self.set_cell(x, y, Cell::Empty);
        }
    }

    /// Counts fully occupied rows without modifying the board.
    #[must_use]
    pub fn count_full_lines(&self) -> usize {
        (0..self.height).filter(|&y| self.row_is_full(y)).count()
    }

    /// Removes every fully occupied row, shifting everything above it down
    /// by one, and returns how many rows were cleared.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            y -= 1;
            if !self.row_is_full(y) {
                continue;
            }
            for shift_y in (1..=y).rev() {
                for x in 0..self.width {
                    self.cells[shift_y * self.width + x] = self.cells[(shift_y - 1) * self.width + x];
                }
            }
            for x in 0..self.width {
                self.cells[x] = Cell::Empty;
            }
            cleared += 1;
            // the shifted-down row may itself be full; re-scan this index
            y += 1;
        }
        if cleared > 0 {
            for x in 0..self.width {
                self.recompute_column(x);
            }
        }
        cleared
    }

    fn row_is_full(&self, y: usize) -> bool {
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .all(|c| c.is_occupied())
    }

    fn recompute_column(&mut self, x: usize) {
        let mut height = 0;
        let mut occupied = 0;
        for y in 0..self.height {
            if self.cells[y * self.width + x].is_occupied() {
                if height == 0 {
                    height = self.height - y;
                }
                occupied += 1;
            }
        }
        self.column_heights[x] = height;
        self.column_holes[x] = height - occupied;
    }

    /// Height of one column, measured from the floor to its topmost
    /// occupied cell; 0 when the column is empty. O(1) cache read.
    #[must_use]
    pub fn height_of_column(&self, x: usize) -> usize {
        self.column_heights[x]
    }

    /// Empty cells below the topmost occupied cell of one column. O(1)
    /// cache read.
    #[must_use]
    pub fn holes_of_column(&self, x: usize) -> usize {
        self.column_holes[x]
    }

    /// Sum of all column heights, where a column's height is measured from
    /// the floor to its topmost occupied cell.
    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        self.column_heights.iter().sum()
    }

    /// Number of empty cells lying below an occupied cell in the same
    /// column.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.column_holes.iter().sum()
    }

    /// Sum of absolute height differences between laterally adjacent
    /// columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        self.column_heights
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]))
            .sum()
    }

    /// Height of the tallest column.
    #[must_use]
    pub fn max_height(&self) -> usize {
        self.column_heights.iter().copied().max().unwrap_or(0)
    }
}
