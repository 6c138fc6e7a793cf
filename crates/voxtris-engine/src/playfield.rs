use std::fmt::Debug;

use crate::{board2::Board2, board3::Board3, piece2::PieceKind2, piece3::PieceKind3};

/// The surface shared by [`Board2`] and [`Board3`] that search and
/// training code programs against.
///
/// The two variants stay separate concrete types; generic code picks one
/// via this trait and the compiler rejects any mixing of a piece with a
/// board of the other dimensionality.
pub trait Playfield: Clone + PartialEq + Send + Sync + Debug {
    /// Piece kind drawn by the piece stream.
    type Kind: Copy + Send + Debug;
    /// Falling piece matching this board's dimensionality.
    type Piece: Clone + PartialEq + Send + Sync + Debug;

    /// Creates a piece at the spawn position without placing it.
    fn spawn(&self, kind: Self::Kind) -> Self::Piece;

    /// True when the piece overlaps a wall, the floor, or occupied cells.
    fn collides(&self, piece: &Self::Piece) -> bool;

    /// Writes the piece's cells into the board.
    fn freeze(&mut self, piece: &Self::Piece);

    /// Erases the piece's cells; the exact inverse of [`Self::freeze`].
    fn remove(&mut self, piece: &Self::Piece);

    /// Removes all completed lines (planes in 3D) and returns how many.
    fn clear_full_lines(&mut self) -> usize;

    /// Counts completed lines without modifying the board.
    fn count_full_lines(&self) -> usize;

    fn aggregate_height(&self) -> usize;
    fn hole_count(&self) -> usize;
    fn bumpiness(&self) -> usize;
    fn max_height(&self) -> usize;

    /// Number of rows along the gravity axis.
    fn rows(&self) -> usize;
}

impl Playfield for Board2 {
    type Kind = PieceKind2;
    type Piece = crate::Piece2;

    fn spawn(&self, kind: Self::Kind) -> Self::Piece {
        Board2::spawn(self, kind)
    }

    fn collides(&self, piece: &Self::Piece) -> bool {
        Board2::collides(self, piece)
    }

    fn freeze(&mut self, piece: &Self::Piece) {
        Board2::freeze(self, piece);
    }

    fn remove(&mut self, piece: &Self::Piece) {
        Board2::remove(self, piece);
    }

    fn clear_full_lines(&mut self) -> usize {
        Board2::clear_full_lines(self)
    }

    fn count_full_lines(&self) -> usize {
        Board2::count_full_lines(self)
    }

    fn aggregate_height(&self) -> usize {
        Board2::aggregate_height(self)
    }

    fn hole_count(&self) -> usize {
        Board2::hole_count(self)
    }

    fn bumpiness(&self) -> usize {
        Board2::bumpiness(self)
    }

    fn max_height(&self) -> usize {
        Board2::max_height(self)
    }

    fn rows(&self) -> usize {
        self.height()
    }
}

impl Playfield for Board3 {
    type Kind = PieceKind3;
    type Piece = crate::Piece3;

    fn spawn(&self, kind: Self::Kind) -> Self::Piece {
        Board3::spawn(self, kind)
    }

    fn collides(&self, piece: &Self::Piece) -> bool {
        Board3::collides(self, piece)
    }

    fn freeze(&mut self, piece: &Self::Piece) {
        Board3::freeze(self, piece);
    }

    fn remove(&mut self, piece: &Self::Piece) {
        Board3::remove(self, piece);
    }

    fn clear_full_lines(&mut self) -> usize {
        Board3::clear_full_lines(self)
    }

    fn count_full_lines(&self) -> usize {
        Board3::count_full_lines(self)
    }

    fn aggregate_height(&self) -> usize {
        Board3::aggregate_height(self)
    }

    fn hole_count(&self) -> usize {
        Board3::hole_count(self)
    }

    fn bumpiness(&self) -> usize {
        Board3::bumpiness(self)
    }

    fn max_height(&self) -> usize {
        Board3::max_height(self)
    }

    fn rows(&self) -> usize {
        self.height()
    }
}
