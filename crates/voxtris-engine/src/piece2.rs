use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use crate::{board2::Board2, cell::PieceColor};

/// The seven 2D piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind2 {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl Distribution<PieceKind2> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind2 {
        PieceKind2::ALL[rng.random_range(0..PieceKind2::LEN)]
    }
}

impl PieceKind2 {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
        Self::T,
    ];

    #[must_use]
    pub const fn color(self) -> PieceColor {
        PieceColor::new(self as u8)
    }

    /// Spawn-orientation mask as rows of `#`/`.` characters, minimal
    /// bounding box.
    const fn shape(self) -> &'static [&'static str] {
        match self {
            Self::I => &["####"],
            Self::O => &["##", "##"],
            Self::S => &[".##", "##."],
            Self::Z => &["##.", ".##"],
            Self::J => &["#..", "###"],
            Self::L => &["..#", "###"],
            Self::T => &[".#.", "###"],
        }
    }
}

/// A falling 2D piece: a minimal-bounding-box mask of occupied cells plus
/// an integer board position.
///
/// Rotation produces a re-fitted mask (width and height swap for
/// non-square pieces) and shifts the position so the piece's geometric
/// center stays put. Pieces are plain values; search copies them freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece2 {
    cells: Vec<bool>,
    width: usize,
    height: usize,
    color: PieceColor,
    x: i32,
    y: i32,
}

/// Translational offsets tried, in order, when a rotation collides before
/// the rotation is rolled back.
const KICK_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

impl Piece2 {
    #[must_use]
    pub fn new(kind: PieceKind2) -> Self {
        let shape = kind.shape();
        let height = shape.len();
        let width = shape[0].len();
        let mut cells = vec![false; width * height];
        for (y, row) in shape.iter().enumerate() {
            for (x, ch) in row.bytes().enumerate() {
                cells[y * width + x] = ch == b'#';
            }
        }
        Self {
            cells,
            width,
            height,
            color: kind.color(),
            x: 0,
            y: 0,
        }
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
    pub fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Shifts the position by the given delta. No bounds enforcement at
    /// this layer; callers validate against the board.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let mut moved = self.clone();
        moved.translate(dx, dy);
        moved
    }

    #[must_use]
    pub fn is_cell_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Iterates over the absolute board positions of all occupied cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.local_cells().map(|(dx, dy)| {
            #[expect(clippy::cast_possible_wrap)]
            let abs = (self.x + dx as i32, self.y + dy as i32);
            abs
        })
    }

    pub(crate) fn local_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.cells[y * self.width + x].then_some((x, y)))
        })
    }

    /// Returns the piece rotated 90° about the board normal.
    ///
    /// The mask is re-fitted (width and height swap) and the position is
    /// shifted so the geometric center stays fixed; four rotations in the
    /// same direction restore the piece exactly.
    #[must_use]
    pub fn rotated(&self, reverse: bool) -> Self {
        let (width, height) = (self.height, self.width);
        let mut cells = vec![false; width * height];
        for (x, y) in self.local_cells() {
            let (nx, ny) = if reverse {
                (y, self.width - 1 - x)
            } else {
                (self.height - 1 - y, x)
            };
            cells[ny * width + nx] = true;
        }
        #[expect(clippy::cast_possible_wrap)]
        let (dx, dy) = (
            (self.width as i32 - width as i32) / 2,
            (self.height as i32 - height as i32) / 2,
        );
        Self {
            cells,
            width,
            height,
            color: self.color,
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Rotates in place against a board, trying the fixed kick offsets
    /// before rolling back.
    ///
    /// Returns `true` when the rotation (possibly kicked) was applied and
    /// `false` when it was fully rolled back.
    pub fn rotate_against(&mut self, board: &Board2, reverse: bool) -> bool {
        let rotated = self.rotated(reverse);
        if !board.collides(&rotated) {
            *self = rotated;
            return true;
        }
        for (dx, dy) in KICK_OFFSETS {
            let kicked = rotated.translated(dx, dy);
            if !board.collides(&kicked) {
                *self = kicked;
                return true;
            }
        }
        false
    }

    /// True when both pieces render the same mask, ignoring position.
    #[must_use]
    pub fn same_mask(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }

    /// All mask-distinct orientations reachable by repeated 90° turns.
    ///
    /// Square or symmetric pieces collapse: the O piece yields one
    /// orientation, S/Z/I two, the rest four.
    #[must_use]
    pub fn distinct_orientations(&self) -> ArrayVec<Self, 4> {
        let mut orientations: ArrayVec<Self, 4> = ArrayVec::new();
        orientations.push(self.clone());
        let mut turned = self.clone();
        for _ in 0..3 {
            turned = turned.rotated(false);
            if orientations.iter().all(|o| !o.same_mask(&turned)) {
                orientations.push(turned.clone());
            }
        }
        orientations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_four_times_restores_piece() {
        for kind in PieceKind2::ALL {
            let mut piece = Piece2::new(kind);
            piece.set_position(4, 7);
            let original = piece.clone();
            for _ in 0..4 {
                piece = piece.rotated(false);
            }
            assert_eq!(piece, original, "{kind:?} cw");

            for _ in 0..4 {
                piece = piece.rotated(true);
            }
            assert_eq!(piece, original, "{kind:?} ccw");
        }
    }

    #[test]
    fn test_rotation_swaps_bounding_box() {
        let piece = Piece2::new(PieceKind2::I);
        assert_eq!((piece.width(), piece.height()), (4, 1));

        let rotated = piece.rotated(false);
        assert_eq!((rotated.width(), rotated.height()), (1, 4));
        assert_eq!(rotated.occupied_cells().count(), 4);
    }

    #[test]
    fn test_rotation_round_trip() {
        for kind in PieceKind2::ALL {
            let piece = Piece2::new(kind);
            let back = piece.rotated(false).rotated(true);
            assert_eq!(back, piece, "{kind:?}");
        }
    }

    #[test]
    fn test_distinct_orientations() {
        let counts = [
            (PieceKind2::O, 1),
            (PieceKind2::I, 2),
            (PieceKind2::S, 2),
            (PieceKind2::Z, 2),
            (PieceKind2::J, 4),
            (PieceKind2::L, 4),
            (PieceKind2::T, 4),
        ];
        for (kind, expected) in counts {
            let piece = Piece2::new(kind);
            assert_eq!(piece.distinct_orientations().len(), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_color_preserved_through_rotation() {
        let piece = Piece2::new(PieceKind2::L);
        let color = piece.color();
        assert_eq!(piece.rotated(false).rotated(false).color(), color);
    }

    #[test]
    fn test_wall_kick_resolves_rotation() {
        // Vertical I hugging the left wall: rotating to horizontal pokes
        // through the wall until a kick shifts it right.
        let board = Board2::new(10, 20);
        let mut piece = Piece2::new(PieceKind2::I).rotated(false);
        piece.set_position(0, 8);
        assert!(!board.collides(&piece));

        assert!(piece.rotate_against(&board, false));
        assert!(!board.collides(&piece));
        assert_eq!((piece.width(), piece.height()), (4, 1));
    }

    #[test]
    fn test_rotation_rolls_back_when_blocked() {
        // A 4-wide board cannot hold a horizontal I at x > 0, and every
        // kick offset stays blocked in a 1-cell-wide shaft.
        let board = Board2::from_ascii(
            "
            #.##
            #.##
            #.##
            #.##
            #.##
            ",
        );
        let mut piece = Piece2::new(PieceKind2::I).rotated(false);
        piece.set_position(1, 0);
        assert!(!board.collides(&piece));

        let before = piece.clone();
        assert!(!piece.rotate_against(&board, false));
        assert_eq!(piece, before);
    }
}
