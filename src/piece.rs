// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pieces, and the narrow view of the board that they need in order to decide how they may move.

use std::fmt;

use derive_more::{Display, From};
use serde::Serialize;

use crate::core::{shape, Color, PieceKind, Square};

/// Read-only occupancy information. This is all a piece needs to know about the board to answer whether
/// a move is shape-legal.
pub trait BoardView {
    /// Returns the color of the live piece on the given square, if any.
    fn occupant(&self, square: Square) -> Option<Color>;
}

/// Stable identity of a piece for the lifetime of a board. Ids are handed out in setup order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize)]
#[display(fmt = "#{}", _0)]
pub struct PieceId(usize);

impl PieceId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A single chess piece. Pieces are owned by a [`Board`](crate::Board), which is the only thing that moves or
/// captures them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Piece {
    id: PieceId,
    color: Color,
    kind: PieceKind,
    square: Square,
    captured: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, color: Color, kind: PieceKind, square: Square) -> Piece {
        Piece {
            id,
            color,
            kind,
            square,
            captured: false,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn is_live(&self) -> bool {
        !self.captured
    }

    /// Returns whether this piece's movement pattern allows it to go from `origin` to `destination`, ignoring
    /// whether doing so would leave its king in check.
    pub fn is_shape_legal<V: BoardView + ?Sized>(
        &self,
        origin: Square,
        destination: Square,
        view: &V,
    ) -> bool {
        shape::is_shape_legal(self.kind, self.color, origin, destination, view)
    }

    /// Returns whether this piece, from where it stands now, could move to `destination`.
    pub fn can_reach<V: BoardView + ?Sized>(&self, destination: Square, view: &V) -> bool {
        self.is_shape_legal(self.square, destination, view)
    }

    pub(crate) fn relocate(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn mark_captured(&mut self) {
        self.captured = true;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.kind.as_char();
        match self.color {
            Color::White => write!(f, "{}", c.to_ascii_uppercase()),
            Color::Black => write!(f, "{}", c),
        }
    }
}
