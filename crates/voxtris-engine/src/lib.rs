//! Board and piece data model for the 2D and 3D stacking variants.
//!
//! This crate provides the pieces the rest of the system is built on:
//!
//! - [`Board2`] / [`Board3`] - cell grids with collision, freezing, and
//!   line/plane clearing, plus per-column height and hole caches
//! - [`Piece2`] / [`Piece3`] - falling pieces with 90° rotation and
//!   bounding-box re-fit
//! - [`Playfield`] - the surface shared by both board variants that the
//!   evaluator and trainer program against
//! - [`PieceStream`] / [`PieceSeed`] - session-owned, seedable piece
//!   generation
//! - [`GameField`] - board + piece stream + current/next pieces for one
//!   game session
//!
//! The 2D and 3D variants are separate concrete types selected once per
//! session; mixing a piece with a board of the other dimensionality is a
//! compile error rather than a runtime check.
//!
//! # Example
//!
//! ```
//! use voxtris_engine::{Board2, PieceKind2};
//!
//! let mut board = Board2::new(10, 20);
//! let piece = board.spawn(PieceKind2::T);
//! assert!(!board.collides(&piece));
//!
//! board.freeze(&piece);
//! board.remove(&piece);
//! assert_eq!(board.aggregate_height(), 0);
//! ```

pub use self::{
    board2::*, board3::*, cell::*, field::*, piece2::*, piece3::*, piece_stream::*, playfield::*,
};

mod board2;
mod board3;
mod cell;
mod field;
mod piece2;
mod piece3;
mod piece_stream;
mod playfield;
