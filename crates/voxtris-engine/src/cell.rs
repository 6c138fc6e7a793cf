/// A single board cell: empty, or filled with the color of the piece that
/// was frozen into it.
///
/// A cell is never partially occupied; freezing writes whole cells and
/// removal writes them back to [`Cell::Empty`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceColor),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !self.is_empty()
    }
}

/// Color tag carried by a piece from creation through every rotation and
/// copy, and written into the board when the piece freezes.
///
/// Colors are indices into a palette owned by whatever renders the board;
/// the engine only guarantees they are preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceColor(u8);

impl PieceColor {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}
