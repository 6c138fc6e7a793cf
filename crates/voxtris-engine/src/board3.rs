use crate::{
    cell::Cell,
    piece3::{Piece3, PieceKind3},
};

/// A pit playfield: a runtime-sized voxel grid of [`Cell`]s indexed by
/// `(x, y, z)` with `y = 0` at the top, plus per-column height and hole
/// caches (one column per `(x, z)` pair).
///
/// Clearing works on full horizontal planes: when every cell at one `y`
/// level is occupied, the plane is removed and everything above shifts
/// down. Freeze and remove are exact inverses, caches included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board3 {
    width: usize,
    height: usize,
    depth: usize,
    cells: Vec<Cell>,
    column_heights: Vec<usize>,
    column_holes: Vec<usize>,
}

impl Board3 {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        assert!(
            width > 0 && height > 0 && depth > 0,
            "board dimensions must be positive"
        );
        Self {
            width,
            height,
            depth,
            cells: vec![Cell::Empty; width * height * depth],
            column_heights: vec![0; width * depth],
            column_holes: vec![0; width * depth],
        }
    }

    /// Builds a board from ASCII art layers, top layer first; each layer
    /// is depth rows of `#`/`.` across the width, rows separated by
    /// newlines within a layer.
    ///
    /// # Panics
    ///
    /// Panics if the layer shapes disagree or contain other characters.
    #[must_use]
    pub fn from_ascii_layers(layers: &[&str]) -> Self {
        assert!(!layers.is_empty(), "board art must have at least one layer");
        let parse = |layer: &str| -> Vec<Vec<u8>> {
            layer
                .lines()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|row| row.bytes().collect())
                .collect()
        };
        let first = parse(layers[0]);
        let depth = first.len();
        let width = first[0].len();
        let mut board = Self::new(width, layers.len(), depth);
        for (y, layer) in layers.iter().enumerate() {
            let rows = parse(layer);
            assert_eq!(rows.len(), depth, "board art layers must share one depth");
            for (z, row) in rows.iter().enumerate() {
                assert_eq!(row.len(), width, "board art rows must share one width");
                for (x, &ch) in row.iter().enumerate() {
                    match ch {
                        b'#' => {
                            board.cells[(y * depth + z) * width + x] =
                                Cell::Filled(crate::PieceColor::new(0));
                        }
                        b'.' => {}
                        _ => panic!("board art cells must be '#' or '.'"),
                    }
                }
            }
        }
        for x in 0..width {
            for z in 0..depth {
                board.recompute_column(x, z);
            }
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

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Reads a cell. Out-of-range coordinates read as [`Cell::Empty`].
    #[must_use]
    pub fn cell(&self, x: i32, y: i32, z: i32) -> Cell {
        if !self.contains(x, y, z) {
            return Cell::Empty;
        }
        #[expect(clippy::cast_sign_loss)]
        let idx = (y as usize * self.depth + z as usize) * self.width + x as usize;
        self.cells[idx]
    }

    /// Writes a cell and refreshes the touched column's caches.
    /// Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, cell: Cell) {
        if !self.contains(x, y, z) {
            return;
        }
        #[expect(clippy::cast_sign_loss)]
        let (x, y, z) = (x as usize, y as usize, z as usize);
        self.cells[(y * self.depth + z) * self.width + x] = cell;
        self.recompute_column(x, z);
    }

    fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        #[expect(clippy::cast_possible_wrap)]
        let inside = x >= 0
            && x < self.width as i32
            && y >= 0
            && y < self.height as i32
            && z >= 0
            && z < self.depth as i32;
        inside
    }

    /// True when any of the piece's voxels lies outside the board or over
    /// an occupied cell.
    #[must_use]
    pub fn collides(&self, piece: &Piece3) -> bool {
        piece
            .occupied_cells()
            .any(|(x, y, z)| !self.contains(x, y, z) || self.cell(x, y, z).is_occupied())
    }

    /// Creates a piece positioned at the top layer, centered on both
    /// lateral axes. The piece is not placed; callers check
    /// [`Self::collides`] to detect a blocked spawn.
    #[must_use]
    pub fn spawn(&self, kind: PieceKind3) -> Piece3 {
        let mut piece = Piece3::new(kind);
        #[expect(clippy::cast_possible_wrap)]
        let (x, z) = (
            (self.width as i32 - piece.width() as i32) / 2,
            (self.depth as i32 - piece.depth() as i32) / 2,
        );
        piece.set_position(x, 0, z);
        piece
    }

    /// Writes the piece's voxels into the board.
    pub fn freeze(&mut self, piece: &Piece3) {
        for (x, y, z) in piece.occupied_cells() {
            self.set_cell(x, y, z, Cell::Filled(piece.color()));
        }
    }

    /// Erases the piece's voxels, exactly undoing a [`Self::freeze`] of
    /// the same piece at the same position.
    pub fn remove(&mut self, piece: &Piece3) {
        for (x, y, z) in piece.occupied_cells() {
            self.set_cell(x, y, z, Cell::Empty);
        }
    }

    /// Counts fully occupied horizontal planes without modifying the
    /// board.
    #[must_use]
    pub fn count_full_lines(&self) -> usize {
        (0..self.height).filter(|&y| self.plane_is_full(y)).count()
    }

    /// Removes every fully occupied horizontal plane, shifting everything
    /// above it down by one, and returns how many planes were cleared.
    pub fn clear_full_lines(&mut self) -> usize {
        let plane = self.width * self.depth;
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            y -= 1;
            if !self.plane_is_full(y) {
                continue;
            }
            for shift_y in (1..=y).rev() {
                let (upper, lower) = (shift_y * plane, (shift_y - 1) * plane);
                for i in 0..plane {
                    self.cells[upper + i] = self.cells[lower + i];
                }
            }
            for i in 0..plane {
                self.cells[i] = Cell::Empty;
            }
            cleared += 1;
            // the shifted-down plane may itself be full; re-scan this index
            y += 1;
        }
        if cleared > 0 {
            for x in 0..self.width {
                for z in 0..self.depth {
                    self.recompute_column(x, z);
                }
            }
        }
        cleared
    }

    fn plane_is_full(&self, y: usize) -> bool {
        let plane = self.width * self.depth;
        self.cells[y * plane..(y + 1) * plane]
            .iter()
            .all(|c| c.is_occupied())
    }

    fn recompute_column(&mut self, x: usize, z: usize) {
        let mut height = 0;
        let mut occupied = 0;
        for y in 0..self.height {
            if self.cells[(y * self.depth + z) * self.width + x].is_occupied() {
                if height == 0 {
                    height = self.height - y;
                }
                occupied += 1;
            }
        }
        self.column_heights[z * self.width + x] = height;
        self.column_holes[z * self.width + x] = height - occupied;
    }

    /// Height of the `(x, z)` column, measured from the floor to its
    /// topmost occupied cell; 0 when the column is empty. O(1) cache
    /// read.
    #[must_use]
    pub fn height_of_column(&self, x: usize, z: usize) -> usize {
        self.column_heights[z * self.width + x]
    }

    /// Empty cells below the topmost occupied cell of the `(x, z)`
    /// column. O(1) cache read.
    #[must_use]
    pub fn holes_of_column(&self, x: usize, z: usize) -> usize {
        self.column_holes[z * self.width + x]
    }

    /// Sum of all column heights over the `(x, z)` lateral grid.
    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        self.column_heights.iter().sum()
    }

    /// Number of empty cells lying below an occupied cell in the same
    /// vertical column.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.column_holes.iter().sum()
    }

    /// Sum of absolute height differences between adjacent columns along
    /// both lateral axes.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        let mut total = 0;
        for z in 0..self.depth {
            for x in 1..self.width {
                total += self
                    .height_of_column(x - 1, z)
                    .abs_diff(self.height_of_column(x, z));
            }
        }
        for x in 0..self.width {
            for z in 1..self.depth {
                total += self
                    .height_of_column(x, z - 1)
                    .abs_diff(self.height_of_column(x, z));
            }
        }
        total
    }

    /// Height of the tallest column.
    #[must_use]
    pub fn max_height(&self) -> usize {
        self.column_heights.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_from_layers() {
        let board = Board3::from_ascii_layers(&[
            "
            ..
            ..
            ",
            "
            #.
            ..
            ",
            "
            #.
            .#
            ",
        ]);
        // heights over (x, z): (0,0)=2, (1,0)=0, (0,1)=0, (1,1)=1
        assert_eq!(board.aggregate_height(), 3);
        assert_eq!(board.hole_count(), 0);
        assert_eq!(board.max_height(), 2);
        // x pairs: |2-0| (z=0) + |0-1| (z=1); z pairs: |2-0| (x=0) + |0-1| (x=1)
        assert_eq!(board.bumpiness(), 6);
    }

    #[test]
    fn test_per_column_reads_match_metric_caches() {
        let board = Board3::from_ascii_layers(&[
            "
            #.
            ..
            ",
            "
            ..
            ..
            ",
            "
            #.
            .#
            ",
        ]);
        // column (0, 0) is occupied at top and bottom with a gap between
        assert_eq!(board.height_of_column(0, 0), 3);
        assert_eq!(board.holes_of_column(0, 0), 1);
        assert_eq!(board.height_of_column(1, 1), 1);
        assert_eq!(board.holes_of_column(1, 1), 0);
        assert_eq!(board.height_of_column(1, 0), 0);
        assert_eq!(board.aggregate_height(), 4);
        assert_eq!(board.hole_count(), 1);
    }

    #[test]
    fn test_collision_at_bounds() {
        let board = Board3::new(4, 8, 4);
        let mut piece = board.spawn(PieceKind3::O);
        assert!(!board.collides(&piece));

        piece.set_position(-1, 0, 1);
        assert!(board.collides(&piece));
        piece.set_position(3, 0, 1);
        assert!(board.collides(&piece));
        piece.set_position(1, 0, 3);
        assert!(board.collides(&piece));
        piece.set_position(1, 7, 1);
        assert!(!board.collides(&piece));
        piece.set_position(1, 8, 1);
        assert!(board.collides(&piece));
    }

    #[test]
    fn test_freeze_then_remove_restores_board() {
        let mut board = Board3::new(3, 6, 3);
        let baseline = board.clone();

        let mut piece = Piece3::new(PieceKind3::Corner);
        piece.set_position(1, 3, 1);
        board.freeze(&piece);
        assert_eq!(board.aggregate_height(), 3 + 2 + 2);
        assert_ne!(board, baseline);

        board.remove(&piece);
        assert_eq!(board, baseline);
    }

    #[test]
    fn test_clear_full_plane_shifts_layers_down() {
        let mut board = Board3::from_ascii_layers(&[
            "
            ..
            ..
            ",
            "
            #.
            ..
            ",
            "
            ##
            ##
            ",
        ]);
        assert_eq!(board.count_full_lines(), 1);
        assert_eq!(board.clear_full_lines(), 1);
        assert_eq!(
            board,
            Board3::from_ascii_layers(&[
                "
                ..
                ..
                ",
                "
                ..
                ..
                ",
                "
                #.
                ..
                ",
            ])
        );
    }

    #[test]
    fn test_clear_adjacent_full_planes() {
        let mut board = Board3::from_ascii_layers(&[
            "
            .#
            ..
            ",
            "
            ##
            ##
            ",
            "
            ##
            ##
            ",
        ]);
        assert_eq!(board.clear_full_lines(), 2);
        assert_eq!(board.aggregate_height(), 1);
        assert!(board.cell(1, 2, 0).is_occupied());
    }

    #[test]
    fn test_spawn_is_centered() {
        let board = Board3::new(5, 12, 5);
        let piece = board.spawn(PieceKind3::T);
        assert_eq!((piece.x(), piece.y(), piece.z()), (1, 0, 1));
    }
}
