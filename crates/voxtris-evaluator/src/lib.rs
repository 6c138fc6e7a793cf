//! Placement search for the stacking agent.
//!
//! Given a board and the current piece kind, this crate enumerates every
//! reachable resting placement, scores the board each placement would
//! leave behind with a four-feature linear heuristic, and picks the best
//! one:
//!
//! - [`WeightVector`] - the heuristic's weights, kept at unit length
//! - [`EnumeratePlacements`] - orientation × lateral-position × drop
//!   enumeration for either board variant
//! - [`MoveSelector`] - one-ply (sequential or parallel) and two-ply
//!   search, committing the winner or declaring a top-out
//! - [`play_session`] - the headless spawn/select/commit/advance loop
//!
//! Scoring is speculative: candidates are frozen onto the one shared
//! board, measured, and removed again, so the board is bit-identical
//! before and after every search.

pub use self::{placements::*, selector::*, session::*, weights::*};

mod placements;
mod selector;
mod session;
mod weights;
