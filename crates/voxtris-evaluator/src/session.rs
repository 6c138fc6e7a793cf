use rand::distr::{Distribution, StandardUniform};
use voxtris_engine::GameField;

use crate::{
    placements::EnumeratePlacements,
    selector::{MoveSelector, SearchStrategy, TurnOutcome},
};

/// Tally of one headless session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    pub cleared_lines: usize,
    pub placements: usize,
    pub topped_out: bool,
}

/// Plays one turn: spawn the current piece, pick a placement, commit it,
/// and advance the field. A blocked spawn freezes the piece in place and
/// tops the session out without searching.
pub fn play_turn<F>(
    field: &mut GameField<F>,
    selector: &MoveSelector,
    strategy: SearchStrategy,
) -> TurnOutcome
where
    F: EnumeratePlacements,
    StandardUniform: Distribution<F::Kind>,
{
    let kind = field.current_kind();
    let spawned = field.board().spawn(kind);
    if field.board().collides(&spawned) {
        field.board_mut().freeze(&spawned);
        return TurnOutcome::TopOut;
    }
    let next_kind = field.next_kind();
    let placement = selector.select(field.board_mut(), kind, next_kind, strategy);
    let outcome = MoveSelector::commit(field.board_mut(), placement, kind);
    if let TurnOutcome::Placed { .. } = outcome {
        field.advance();
    }
    outcome
}

/// Plays turns until the session tops out or `placement_limit` pieces
/// have been placed.
pub fn play_session<F>(
    field: &mut GameField<F>,
    selector: &MoveSelector,
    strategy: SearchStrategy,
    placement_limit: usize,
) -> SessionReport
where
    F: EnumeratePlacements,
    StandardUniform: Distribution<F::Kind>,
{
    let mut report = SessionReport::default();
    while report.placements < placement_limit {
        match play_turn(field, selector, strategy) {
            TurnOutcome::Placed { cleared_lines } => {
                report.placements += 1;
                report.cleared_lines += cleared_lines;
            }
            TurnOutcome::TopOut => {
                report.topped_out = true;
                break;
            }
        }
    }
    report
}
