use voxtris_engine::{Board2, Board3, Piece2, Piece3, PieceKind2, PieceKind3, Playfield};

/// Enumeration of every reachable resting placement for a piece kind.
///
/// A placement is produced for each distinct orientation and each lateral
/// position where the oriented piece fits at the top of the board, dropped
/// straight down until it rests. Enumeration order is deterministic
/// (orientation turn order, then lateral sweep), which makes first-seen
/// tie-breaking in the selector reproducible.
pub trait EnumeratePlacements: Playfield {
    fn enumerate_placements(&self, kind: Self::Kind) -> Vec<Self::Piece>;
}

impl EnumeratePlacements for Board2 {
    fn enumerate_placements(&self, kind: PieceKind2) -> Vec<Piece2> {
        let mut placements = Vec::new();
        for orientation in self.spawn(kind).distinct_orientations() {
            if orientation.width() > self.width() {
                continue;
            }
            for x in 0..=self.width() - orientation.width() {
                let mut piece = orientation.clone();
                #[expect(clippy::cast_possible_wrap)]
                piece.set_position(x as i32, 0);
                if self.collides(&piece) {
                    continue;
                }
                while !self.collides(&piece.translated(0, 1)) {
                    piece.translate(0, 1);
                }
                if !placements.contains(&piece) {
                    placements.push(piece);
                }
            }
        }
        placements
    }
}

impl EnumeratePlacements for Board3 {
    fn enumerate_placements(&self, kind: PieceKind3) -> Vec<Piece3> {
        let mut placements = Vec::new();
        for orientation in self.spawn(kind).distinct_orientations() {
            if orientation.width() > self.width() || orientation.depth() > self.depth() {
                continue;
            }
            for x in 0..=self.width() - orientation.width() {
                for z in 0..=self.depth() - orientation.depth() {
                    let mut piece = orientation.clone();
                    #[expect(clippy::cast_possible_wrap)]
                    piece.set_position(x as i32, 0, z as i32);
                    if self.collides(&piece) {
                        continue;
                    }
                    while !self.collides(&piece.translated(0, 1, 0)) {
                        piece.translate(0, 1, 0);
                    }
                    if !placements.contains(&piece) {
                        placements.push(piece);
                    }
                }
            }
        }
        placements
    }
}
