use std::thread;

use voxtris_engine::Playfield;

use crate::{placements::EnumeratePlacements, weights::WeightVector};

/// How the selector searches for the next placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Score every placement of the current piece on the shared board.
    #[default]
    SinglePly,
    /// Like [`Self::SinglePly`], but each candidate is scored on a
    /// private board clone on its own thread.
    SinglePlyParallel,
    /// Score every (current, next) placement pair; a candidate's value is
    /// its best pair.
    TwoPly,
}

/// Result of committing one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Placed { cleared_lines: usize },
    /// No placement existed (or the spawn cell was already blocked); the
    /// piece is frozen where it stands and the session ends.
    TopOut,
}

/// Freezes a piece onto a board for the guard's lifetime.
///
/// Dropping the guard removes the piece again, so the board returns to
/// its pre-speculation state on every exit path, early returns included.
pub struct FrozenPiece<'a, F: Playfield> {
    board: &'a mut F,
    piece: F::Piece,
}

impl<'a, F: Playfield> FrozenPiece<'a, F> {
    pub fn new(board: &'a mut F, piece: F::Piece) -> Self {
        board.freeze(&piece);
        Self { board, piece }
    }

    #[must_use]
    pub fn board(&self) -> &F {
        self.board
    }

    pub fn board_mut(&mut self) -> &mut F {
        self.board
    }
}

impl<F: Playfield> Drop for FrozenPiece<'_, F> {
    fn drop(&mut self) {
        self.board.remove(&self.piece);
    }
}

/// Picks and commits placements for a fixed weight vector.
///
/// Ties between equally scored placements go to the candidate seen first;
/// enumeration order is deterministic, so a fixed seed replays the same
/// game.
#[derive(Debug, Clone, Copy)]
pub struct MoveSelector {
    weights: WeightVector,
}

impl MoveSelector {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> WeightVector {
        self.weights
    }

    /// Picks the best placement for `kind`, or `None` when no placement
    /// exists. `next_kind` is consulted only by the two-ply strategy.
    #[must_use]
    pub fn select<F: EnumeratePlacements>(
        &self,
        board: &mut F,
        kind: F::Kind,
        next_kind: F::Kind,
        strategy: SearchStrategy,
    ) -> Option<F::Piece> {
        match strategy {
            SearchStrategy::SinglePly => self.select_one_ply(board, kind),
            SearchStrategy::SinglePlyParallel => self.select_one_ply_parallel(board, kind),
            SearchStrategy::TwoPly => self.select_two_ply(board, kind, next_kind),
        }
    }

    fn select_one_ply<F: EnumeratePlacements>(
        &self,
        board: &mut F,
        kind: F::Kind,
    ) -> Option<F::Piece> {
        let candidates = board.enumerate_placements(kind);
        let mut best: Option<(F::Piece, f64)> = None;
        for candidate in candidates {
            let frozen = FrozenPiece::new(board, candidate.clone());
            let score = self.weights.score_board(frozen.board());
            drop(frozen);
            if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(piece, _)| piece)
    }

    fn select_one_ply_parallel<F: EnumeratePlacements>(
        &self,
        board: &mut F,
        kind: F::Kind,
    ) -> Option<F::Piece> {
        let mut candidates = board.enumerate_placements(kind);
        let mut scores = vec![0.0; candidates.len()];
        let weights = self.weights;
        let board = &*board;
        thread::scope(|scope| {
            for (candidate, slot) in candidates.iter().zip(&mut scores) {
                scope.spawn(move || {
                    let mut probe = board.clone();
                    probe.freeze(candidate);
                    *slot = weights.score_board(&probe);
                });
            }
        });
        // slots are index-aligned with the candidates, so this argmax
        // keeps the same first-seen tie-break as the sequential path
        let mut best: Option<(usize, f64)> = None;
        for (idx, &score) in scores.iter().enumerate() {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| candidates.swap_remove(idx))
    }

    fn select_two_ply<F: EnumeratePlacements>(
        &self,
        board: &mut F,
        kind: F::Kind,
        next_kind: F::Kind,
    ) -> Option<F::Piece> {
        let candidates = board.enumerate_placements(kind);
        let mut best: Option<(F::Piece, f64)> = None;
        for candidate in candidates {
            let mut frozen = FrozenPiece::new(board, candidate.clone());
            let score = self.best_follow_up_score(&mut frozen, next_kind);
            drop(frozen);
            if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(piece, _)| piece)
    }

    /// Best score over all follow-up placements of `next_kind` on top of
    /// the frozen candidate. A candidate that leaves the next piece with
    /// no placement at all loses the game on the following turn, so it
    /// scores negative infinity and wins only when every candidate is
    /// equally dead.
    fn best_follow_up_score<F: EnumeratePlacements>(
        &self,
        frozen: &mut FrozenPiece<'_, F>,
        next_kind: F::Kind,
    ) -> f64 {
        let follow_ups = frozen.board().enumerate_placements(next_kind);
        if follow_ups.is_empty() {
            return f64::NEG_INFINITY;
        }
        let mut best = f64::NEG_INFINITY;
        for follow_up in follow_ups {
            let inner = FrozenPiece::new(frozen.board_mut(), follow_up);
            let score = self.weights.score_board(inner.board());
            if score > best {
                best = score;
            }
        }
        best
    }

    /// Freezes the chosen placement and clears completed lines, or, when
    /// no placement was found, freezes the spawned piece where it stands
    /// and reports a top-out.
    pub fn commit<F: EnumeratePlacements>(
        board: &mut F,
        placement: Option<F::Piece>,
        kind: F::Kind,
    ) -> TurnOutcome {
        match placement {
            Some(piece) => {
                board.freeze(&piece);
                let cleared_lines = board.clear_full_lines();
                TurnOutcome::Placed { cleared_lines }
            }
            None => {
                let piece = board.spawn(kind);
                board.freeze(&piece);
                TurnOutcome::TopOut
            }
        }
    }
}
