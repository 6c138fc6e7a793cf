use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use crate::{board3::Board3, cell::PieceColor};

/// Rotation axis for 3D pieces. Gravity acts along Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

/// The polycube kinds of the 3D variant: flat relatives of the 2D pieces
/// plus a genuinely three-dimensional corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind3 {
    I2 = 0,
    I3 = 1,
    I4 = 2,
    O = 3,
    L = 4,
    S = 5,
    T = 6,
    Corner = 7,
}

impl Distribution<PieceKind3> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind3 {
        PieceKind3::ALL[rng.random_range(0..PieceKind3::LEN)]
    }
}

impl PieceKind3 {
    /// Number of piece kinds (8).
    pub const LEN: usize = 8;

    pub const ALL: [Self; Self::LEN] = [
        Self::I2,
        Self::I3,
        Self::I4,
        Self::O,
        Self::L,
        Self::S,
        Self::T,
        Self::Corner,
    ];

    #[must_use]
    pub const fn color(self) -> PieceColor {
        PieceColor::new(self as u8)
    }

    /// Spawn-orientation mask as horizontal layers from top to bottom;
    /// each layer lists depth rows of `#`/`.` across the width.
    const fn shape(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::I2 => &[&["##"]],
            Self::I3 => &[&["###"]],
            Self::I4 => &[&["####"]],
            Self::O => &[&["##", "##"]],
            Self::L => &[&["#..", "###"]],
            Self::S => &[&[".##", "##."]],
            Self::T => &[&[".#.", "###"]],
            Self::Corner => &[&["#.", ".."], &["##", "#."]],
        }
    }
}

/// A falling 3D piece: a minimal-bounding-box voxel mask plus an integer
/// board position.
///
/// Local cells index as `(y * depth + z) * width + x`. Rotation is a 90°
/// turn about one axis; the two axes perpendicular to it swap extents and
/// the position shifts to keep the geometric center fixed. There are no
/// kicks in 3D; a blocked rotation rolls back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece3 {
    cells: Vec<bool>,
    width: usize,
    height: usize,
    depth: usize,
    color: PieceColor,
    x: i32,
    y: i32,
    z: i32,
}

impl Piece3 {
    #[must_use]
    pub fn new(kind: PieceKind3) -> Self {
        let shape = kind.shape();
        let height = shape.len();
        let depth = shape[0].len();
        let width = shape[0][0].len();
        let mut cells = vec![false; width * height * depth];
        for (y, layer) in shape.iter().enumerate() {
            for (z, row) in layer.iter().enumerate() {
                for (x, ch) in row.bytes().enumerate() {
                    cells[(y * depth + z) * width + x] = ch == b'#';
                }
            }
        }
        Self {
            cells,
            width,
            height,
            depth,
            color: kind.color(),
            x: 0,
            y: 0,
            z: 0,
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
    pub fn depth(&self) -> usize {
        self.depth
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

    #[must_use]
    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn set_position(&mut self, x: i32, y: i32, z: i32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    pub fn translate(&mut self, dx: i32, dy: i32, dz: i32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32, dz: i32) -> Self {
        let mut moved = self.clone();
        moved.translate(dx, dy, dz);
        moved
    }

    /// Iterates over the absolute board positions of all occupied voxels.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        self.local_cells().map(|(dx, dy, dz)| {
            #[expect(clippy::cast_possible_wrap)]
            let abs = (self.x + dx as i32, self.y + dy as i32, self.z + dz as i32);
            abs
        })
    }

    fn local_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.depth).flat_map(move |z| {
                (0..self.width).filter_map(move |x| {
                    self.cells[(y * self.depth + z) * self.width + x].then_some((x, y, z))
                })
            })
        })
    }

    /// Returns the piece rotated 90° about the given axis.
    ///
    /// Four rotations in the same direction about one axis restore the
    /// piece exactly, position included.
    #[must_use]
    pub fn rotated(&self, axis: Axis, reverse: bool) -> Self {
        let (width, height, depth) = match axis {
            Axis::X => (self.width, self.depth, self.height),
            Axis::Y => (self.depth, self.height, self.width),
            Axis::Z => (self.height, self.width, self.depth),
        };
        let mut cells = vec![false; width * height * depth];
        for (x, y, z) in self.local_cells() {
            let (nx, ny, nz) = match (axis, reverse) {
                (Axis::X, false) => (x, self.depth - 1 - z, y),
                (Axis::X, true) => (x, z, self.height - 1 - y),
                (Axis::Y, false) => (self.depth - 1 - z, y, x),
                (Axis::Y, true) => (z, y, self.width - 1 - x),
                (Axis::Z, false) => (self.height - 1 - y, x, z),
                (Axis::Z, true) => (y, self.width - 1 - x, z),
            };
            cells[(ny * depth + nz) * width + nx] = true;
        }
        #[expect(clippy::cast_possible_wrap)]
        let (dx, dy, dz) = (
            (self.width as i32 - width as i32) / 2,
            (self.height as i32 - height as i32) / 2,
            (self.depth as i32 - depth as i32) / 2,
        );
        Self {
            cells,
            width,
            height,
            depth,
            color: self.color,
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Rotates in place against a board, rolling back when the rotated
    /// piece collides. Returns whether the rotation was applied.
    pub fn rotate_against(&mut self, board: &Board3, axis: Axis, reverse: bool) -> bool {
        let rotated = self.rotated(axis, reverse);
        if board.collides(&rotated) {
            return false;
        }
        *self = rotated;
        true
    }

    /// True when both pieces render the same voxel mask, ignoring
    /// position.
    #[must_use]
    pub fn same_mask(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.depth == other.depth
            && self.cells == other.cells
    }

    /// All mask-distinct orientations reachable by turning the spawn
    /// orientation about a single axis (up to three extra turns per
    /// axis). Axis compositions are not searched.
    #[must_use]
    pub fn distinct_orientations(&self) -> ArrayVec<Self, 12> {
        let mut orientations: ArrayVec<Self, 12> = ArrayVec::new();
        orientations.push(self.clone());
        for axis in Axis::ALL {
            let mut turned = self.clone();
            for _ in 0..3 {
                turned = turned.rotated(axis, false);
                if orientations.iter().all(|o| !o.same_mask(&turned)) {
                    orientations.push(turned.clone());
                }
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
        for kind in PieceKind3::ALL {
            for axis in Axis::ALL {
                for reverse in [false, true] {
                    let mut piece = Piece3::new(kind);
                    piece.set_position(2, 5, 2);
                    let original = piece.clone();
                    for _ in 0..4 {
                        piece = piece.rotated(axis, reverse);
                    }
                    assert_eq!(piece, original, "{kind:?} about {axis:?}");
                }
            }
        }
    }

    #[test]
    fn test_rotation_round_trip() {
        for kind in PieceKind3::ALL {
            for axis in Axis::ALL {
                let piece = Piece3::new(kind);
                let back = piece.rotated(axis, false).rotated(axis, true);
                assert_eq!(back, piece, "{kind:?} about {axis:?}");
            }
        }
    }

    #[test]
    fn test_rotation_swaps_extents() {
        let piece = Piece3::new(PieceKind3::I4);
        assert_eq!((piece.width(), piece.height(), piece.depth()), (4, 1, 1));

        let about_y = piece.rotated(Axis::Y, false);
        assert_eq!(
            (about_y.width(), about_y.height(), about_y.depth()),
            (1, 1, 4)
        );

        let about_z = piece.rotated(Axis::Z, false);
        assert_eq!(
            (about_z.width(), about_z.height(), about_z.depth()),
            (1, 4, 1)
        );
        assert_eq!(about_z.occupied_cells().count(), 4);
    }

    #[test]
    fn test_rotation_preserves_voxel_count() {
        for kind in PieceKind3::ALL {
            let count = Piece3::new(kind).occupied_cells().count();
            for axis in Axis::ALL {
                let rotated = Piece3::new(kind).rotated(axis, false);
                assert_eq!(rotated.occupied_cells().count(), count, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_distinct_orientations_collapse_symmetry() {
        // A 1x1x2 bar has three axis-aligned orientations.
        let orientations = Piece3::new(PieceKind3::I2).distinct_orientations();
        assert_eq!(orientations.len(), 3);

        // The flat square never gains a second orientation about Y.
        let o = Piece3::new(PieceKind3::O);
        let about_y = o.rotated(Axis::Y, false);
        assert!(o.same_mask(&about_y));
    }

    #[test]
    fn test_blocked_rotation_rolls_back() {
        let board = Board3::new(2, 6, 2);
        let mut piece = Piece3::new(PieceKind3::I4).rotated(Axis::Z, false);
        piece.set_position(0, 1, 0);
        assert!(!board.collides(&piece));

        // Turning the vertical bar flat cannot fit a 2-wide pit.
        let before = piece.clone();
        assert!(!piece.rotate_against(&board, Axis::Z, false));
        assert_eq!(piece, before);
    }
}
