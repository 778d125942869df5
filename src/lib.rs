// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `chessrules` rules engine.
//!
//! `chessrules` keeps track of the pieces of a single chess game and answers the questions a game loop needs
//! answered: what is on a square, is a move legal, is a square attacked, is a king in check, and is a side
//! checkmated. The [`Board`] owns every piece and is the single authority for all of these; pieces only know
//! how they move.
//!
//! Castling, en passant, promotion and draw rules are not modelled.

pub mod board;
pub mod core;
pub mod piece;

pub use crate::board::{Board, BoardError, Check, Move, MoveError};
pub use crate::piece::{BoardView, Piece, PieceId};
