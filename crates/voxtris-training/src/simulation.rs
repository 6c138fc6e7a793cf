use rand::distr::{Distribution, StandardUniform};
use voxtris_engine::{GameField, PieceSeed};
use voxtris_evaluator::{
    EnumeratePlacements, MoveSelector, SearchStrategy, SessionReport, TurnOutcome, play_turn,
};

/// Placements without a clear before a tall stack counts as stuck.
const STUCK_PLACEMENTS: usize = 25;

/// A stack above 70% of the board height combined with no recent clears
/// ends the game early.
const STUCK_HEIGHT_NUM: usize = 7;
const STUCK_HEIGHT_DEN: usize = 10;

/// Plays one training game: turns until top-out, the placement budget, or
/// the stuck cutoff.
///
/// The stuck cutoff fires when no line has cleared in the last
/// [`STUCK_PLACEMENTS`] placements while the stack stands above 70% of
/// the board height; such games burn budget without separating weight
/// vectors any further.
pub fn play_training_game<F>(
    board: F,
    seed: PieceSeed,
    selector: &MoveSelector,
    strategy: SearchStrategy,
    placement_limit: usize,
) -> SessionReport
where
    F: EnumeratePlacements,
    StandardUniform: Distribution<F::Kind>,
{
    let mut field = GameField::with_seed(board, seed);
    let mut report = SessionReport::default();
    let mut placements_since_clear = 0;
    while report.placements < placement_limit {
        match play_turn(&mut field, selector, strategy) {
            TurnOutcome::Placed { cleared_lines } => {
                report.placements += 1;
                report.cleared_lines += cleared_lines;
                if cleared_lines > 0 {
                    placements_since_clear = 0;
                } else {
                    placements_since_clear += 1;
                }
            }
            TurnOutcome::TopOut => {
                report.topped_out = true;
                break;
            }
        }
        let board = field.board();
        if placements_since_clear >= STUCK_PLACEMENTS
            && board.max_height() * STUCK_HEIGHT_DEN > board.rows() * STUCK_HEIGHT_NUM
        {
            break;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use voxtris_engine::Board2;
    use voxtris_evaluator::WeightVector;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([11; 16]);

    #[test]
    fn test_training_game_respects_budget() {
        let selector = MoveSelector::new(WeightVector::default());
        let report = play_training_game(
            Board2::new(10, 20),
            SEED,
            &selector,
            SearchStrategy::SinglePly,
            20,
        );
        assert_eq!(report.placements, 20);
        assert!(!report.topped_out);
    }

    #[test]
    fn test_training_game_is_reproducible() {
        let selector = MoveSelector::new(WeightVector::default());
        let run = || {
            play_training_game(
                Board2::new(10, 20),
                SEED,
                &selector,
                SearchStrategy::SinglePly,
                50,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_stack_seeking_weights_end_early() {
        // Rewarding height makes the agent stack a tower and never clear,
        // so either it tops out or the stuck cutoff fires well before the
        // budget.
        let perverse = WeightVector {
            height: 1.0,
            lines: 0.0,
            bumpiness: 0.0,
            holes: 0.0,
        };
        let selector = MoveSelector::new(perverse);
        let report = play_training_game(
            Board2::new(10, 20),
            SEED,
            &selector,
            SearchStrategy::SinglePly,
            10_000,
        );
        assert!(report.placements < 10_000);
    }
}
