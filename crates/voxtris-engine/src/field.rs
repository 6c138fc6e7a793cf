use rand::distr::{Distribution, StandardUniform};

use crate::{
    piece_stream::{PieceSeed, PieceStream},
    playfield::Playfield,
};

/// One game session: a board, its seeded piece stream, and the current
/// and next piece kinds.
///
/// The field never places pieces itself; the search layer decides where
/// the current piece goes and then calls [`Self::advance`].
#[derive(Debug, Clone)]
pub struct GameField<F: Playfield> {
    board: F,
    stream: PieceStream<F::Kind>,
    seed: PieceSeed,
    current: F::Kind,
    next: F::Kind,
}

impl<F: Playfield> GameField<F>
where
    StandardUniform: Distribution<F::Kind>,
{
    /// Starts a session with a freshly drawn seed.
    #[must_use]
    pub fn new(board: F) -> Self {
        Self::with_seed(board, rand::random::<PieceSeed>())
    }

    /// Starts a session replaying the piece sequence of `seed`.
    #[must_use]
    pub fn with_seed(board: F, seed: PieceSeed) -> Self {
        let mut stream = PieceStream::with_seed(seed);
        let current = stream.next_kind();
        let next = stream.next_kind();
        Self {
            board,
            stream,
            seed,
            current,
            next,
        }
    }

    #[must_use]
    pub fn board(&self) -> &F {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut F {
        &mut self.board
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Kind of the piece to place this turn.
    #[must_use]
    pub fn current_kind(&self) -> F::Kind {
        self.current
    }

    /// Kind of the piece after the current one, used by deeper search.
    #[must_use]
    pub fn next_kind(&self) -> F::Kind {
        self.next
    }

    /// Moves to the next turn: the next kind becomes current and a new
    /// next is drawn from the stream.
    pub fn advance(&mut self) {
        self.current = self.next;
        self.next = self.stream.next_kind();
    }
}
