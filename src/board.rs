// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, trace};

use crate::{
    core::{self, *},
    piece::{BoardView, Piece, PieceId},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("{color} {kind} cannot move from {from} to {to}")]
    IllegalShape {
        color: Color,
        kind: PieceKind,
        from: Square,
        to: Square,
    },
    #[error("moving from {from} to {to} would leave the {color} king in check")]
    SelfCheck {
        color: Color,
        from: Square,
        to: Square,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A square was required to hold a piece, but it was empty.
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("{0} is already occupied")]
    Occupied(Square),
    #[error("board is already populated")]
    AlreadyPopulated,
    #[error("no live {0} king on the board")]
    NoKing(Color),
    #[error(transparent)]
    InvalidMove(#[from] MoveError),
}

/// The outcome of a positive check test: which king is in check, and one piece giving that check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Check {
    /// The square of the king that is in check.
    pub king: Square,
    /// The first attacker found, in the board's piece order. In the case of double check, the other
    /// attacker is not reported.
    pub attacker: PieceId,
}

/// A piece moving from one square to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A chessboard: the owner of every piece in a game and the authority on whether squares are attacked and
/// kings are in check or checkmated.
///
/// Every piece that ever existed in the game stays in the board's piece list; captured pieces are marked
/// as such and take no further part in any query. None of the queries on a board cache anything, so asking
/// the same question twice without moving anything always gives the same answer.
///
/// A board is not internally synchronized. To share one between threads, put the whole board behind a
/// single `Mutex`.
#[derive(Clone, Debug, Default)]
pub struct Board {
    pieces: Vec<Piece>,
}

//
// Setup
//

impl Board {
    /// Creates a new, empty board.
    pub fn new() -> Board {
        Board { pieces: Vec::new() }
    }

    /// Creates a board with all 32 pieces on their starting squares.
    pub fn start_position() -> Board {
        let mut board = Board::new();
        board.populate();
        board
    }

    /// Places all 32 pieces on their starting squares. Only an empty board may be initialized.
    pub fn initialize(&mut self) -> Result<(), BoardError> {
        if !self.pieces.is_empty() {
            return Err(BoardError::AlreadyPopulated);
        }

        self.populate();
        Ok(())
    }

    fn populate(&mut self) {
        for file in core::files() {
            for color in core::colors() {
                self.push(color, PieceKind::Pawn, Square::of(color.pawn_rank(), file));
            }
        }

        let layout: [(PieceKind, &[File]); 5] = [
            (PieceKind::Rook, &[FILE_A, FILE_H]),
            (PieceKind::Knight, &[FILE_B, FILE_G]),
            (PieceKind::Bishop, &[FILE_C, FILE_F]),
            (PieceKind::Queen, &[FILE_D]),
            (PieceKind::King, &[FILE_E]),
        ];
        for (kind, files) in layout {
            for color in core::colors() {
                for &file in files {
                    self.push(color, kind, Square::of(color.back_rank(), file));
                }
            }
        }
    }

    /// Adds a piece to the board, returning its id. Fails if the square already holds a live piece.
    pub fn add_piece(
        &mut self,
        kind: PieceKind,
        color: Color,
        square: Square,
    ) -> Result<PieceId, BoardError> {
        if self.is_occupied(square) {
            return Err(BoardError::Occupied(square));
        }

        Ok(self.push(color, kind, square))
    }

    fn push(&mut self, color: Color, kind: PieceKind, square: Square) -> PieceId {
        let id = PieceId::from(self.pieces.len());
        self.pieces.push(Piece::new(id, color, kind, square));
        id
    }
}

//
// Lookup
//

impl Board {
    /// Every piece created for this game, captured or not, in setup order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn live_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(|p| p.is_live())
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Returns the live piece on the given square, if there is one.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.live_pieces().find(|p| p.square() == square)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Returns whether the piece on `square` is of the given color. The square must be occupied; asking
    /// about an empty square is an error rather than a `false`.
    pub fn is_occupied_by_color(&self, square: Square, color: Color) -> Result<bool, BoardError> {
        self.piece_at(square)
            .map(|p| p.color() == color)
            .ok_or(BoardError::EmptySquare(square))
    }

    /// Returns the live king of the given color.
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.live_pieces()
            .find(|p| p.color() == color && p.kind() == PieceKind::King)
    }

    fn locate(&self, square: Square) -> Option<usize> {
        self.pieces
            .iter()
            .position(|p| p.is_live() && p.square() == square)
    }
}

impl BoardView for Board {
    fn occupant(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|p| p.color())
    }
}

/// A view of a board in which one square is taken to hold a piece of the given color, whatever is actually
/// there. Attack queries look through this so that a pawn attacks the squares it could capture on, and
/// not the squares it could push to.
struct Defended<'a> {
    board: &'a Board,
    square: Square,
    color: Color,
}

impl BoardView for Defended<'_> {
    fn occupant(&self, square: Square) -> Option<Color> {
        if square == self.square {
            Some(self.color)
        } else {
            self.board.occupant(square)
        }
    }
}

//
// Capture and move execution
//

impl Board {
    /// Removes whatever live piece is on the given square from play, returning it.
    pub fn capture(&mut self, square: Square) -> Option<Piece> {
        let captured = self.take(square);
        if let Some(piece) = captured {
            info!(%piece, %square, color = %piece.color(), kind = %piece.kind(), "piece captured");
        }

        captured
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        let mut first = None;
        while let Some(index) = self.locate(square) {
            self.pieces[index].mark_captured();
            first.get_or_insert(self.pieces[index]);
        }

        first
    }

    /// Moves the piece on `from` to `to`, capturing anything on `to`. The move must fit the piece's
    /// movement pattern and must not leave the mover's king in check.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<Piece>, BoardError> {
        let piece = *self.piece_at(from).ok_or(BoardError::EmptySquare(from))?;
        self.validate(&piece, to)?;
        debug!(%piece, %from, %to, "move");
        let captured = self.capture(to);
        self.pieces[piece.id().index()].relocate(to);
        Ok(captured)
    }

    /// Moves the piece on `from` to `to` without any legality checks, capturing anything on `to`.
    pub fn force_move(&mut self, from: Square, to: Square) -> Result<Option<Piece>, BoardError> {
        let piece = *self.piece_at(from).ok_or(BoardError::EmptySquare(from))?;
        if from == to {
            return Ok(None);
        }

        debug!(%piece, %from, %to, "forced move");
        let captured = self.capture(to);
        self.pieces[piece.id().index()].relocate(to);
        Ok(captured)
    }

    /// Returns whether the piece on `from` may legally move to `to`.
    pub fn is_legal_move(&self, from: Square, to: Square) -> Result<bool, BoardError> {
        let piece = self.piece_at(from).ok_or(BoardError::EmptySquare(from))?;
        match self.validate(piece, to) {
            Ok(()) => Ok(true),
            Err(BoardError::InvalidMove(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn validate(&self, piece: &Piece, to: Square) -> Result<(), BoardError> {
        let from = piece.square();
        if !piece.can_reach(to, self) {
            return Err(MoveError::IllegalShape {
                color: piece.color(),
                kind: piece.kind(),
                from,
                to,
            }
            .into());
        }

        if self.exposes_king(piece.id(), to)? {
            return Err(MoveError::SelfCheck {
                color: piece.color(),
                from,
                to,
            }
            .into());
        }

        Ok(())
    }

    /// Plays the move on a scratch copy of the board and reports whether the mover's king is attacked
    /// afterwards. The board itself is left untouched.
    fn exposes_king(&self, id: PieceId, to: Square) -> Result<bool, BoardError> {
        let color = self.pieces[id.index()].color();
        let mut scratch = self.clone();
        scratch.take(to);
        scratch.pieces[id.index()].relocate(to);
        Ok(scratch.check(color)?.is_some())
    }
}

//
// Attacks, check and checkmate
//

impl Board {
    /// Returns every live piece not of `color` that attacks `square`, in setup order.
    ///
    /// A piece attacks `square` if its shape rules let it move there from where it stands, judged as
    /// though `square` held a piece of `color`. On a square that already holds a piece of `color`, such
    /// as an occupied king square, this is exactly `is_shape_legal(piece.square(), square)`. It differs
    /// from that rule in two places: on an empty square a pawn attacks its forward diagonals and not its
    /// push square, and a square holding one of the attacker's own pieces counts as attacked.
    pub fn attackers(&self, square: Square, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        let view = Defended {
            board: self,
            square,
            color,
        };
        self.live_pieces()
            .filter(move |p| p.color() != color && p.can_reach(square, &view))
    }

    /// Returns whether any live piece not of `color` attacks `square`. See [`Board::attackers`] for how
    /// this differs from plain shape legality on empty squares and on squares the attacker occupies.
    pub fn is_square_attacked(&self, square: Square, color: Color) -> bool {
        self.attackers(square, color).next().is_some()
    }

    /// Returns whether some piece of `color` could capture the piece giving check to its king, going by
    /// movement patterns alone. False when the king is not in check. A capture found here may still
    /// leave the king attacked by another piece; `is_checkmate` is the full test.
    pub fn can_capture_checker(&self, color: Color) -> Result<bool, BoardError> {
        let check = match self.check(color)? {
            Some(check) => check,
            None => return Ok(false),
        };

        let checker = &self.pieces[check.attacker.index()];
        Ok(self
            .attackers(checker.square(), checker.color())
            .next()
            .is_some())
    }

    /// Tests whether the king of the given color is in check, returning the king's square and an attacker
    /// if it is.
    pub fn check(&self, color: Color) -> Result<Option<Check>, BoardError> {
        let king = self.king(color).ok_or(BoardError::NoKing(color))?;
        let check = self
            .attackers(king.square(), color)
            .next()
            .map(|attacker| Check {
                king: king.square(),
                attacker: attacker.id(),
            });
        Ok(check)
    }

    pub fn is_king_in_check(&self, color: Color) -> Result<bool, BoardError> {
        let check = self.check(color)?;
        if let Some(check) = check {
            debug!(%color, king = %check.king, attacker = %check.attacker, "king in check");
        }

        Ok(check.is_some())
    }

    /// Returns every move the given color could make that fits the moving piece's pattern and does not
    /// leave its own king in check.
    pub fn legal_moves(&self, color: Color) -> Result<Vec<Move>, BoardError> {
        self.legal_move_iter(color).collect()
    }

    /// Returns whether the given color has at least one legal move. Stops at the first one found.
    pub fn has_legal_move(&self, color: Color) -> Result<bool, BoardError> {
        match self.legal_move_iter(color).next() {
            Some(Ok(mov)) => {
                trace!(%color, %mov, "escape found");
                Ok(true)
            }
            Some(Err(e)) => Err(e),
            None => Ok(false),
        }
    }

    fn legal_move_iter(
        &self,
        color: Color,
    ) -> impl Iterator<Item = Result<Move, BoardError>> + '_ {
        self.live_pieces()
            .filter(move |p| p.color() == color)
            .flat_map(move |piece| {
                core::squares()
                    .filter(move |&to| piece.can_reach(to, self))
                    .filter_map(move |to| match self.exposes_king(piece.id(), to) {
                        Ok(true) => None,
                        Ok(false) => Some(Ok(Move::new(piece.square(), to))),
                        Err(e) => Some(Err(e)),
                    })
            })
    }

    /// Returns whether the given color is checkmated: its king is in check and none of its pieces has a
    /// move that gets the king out of check.
    #[instrument(level = "debug", skip(self))]
    pub fn is_checkmate(&self, color: Color) -> Result<bool, BoardError> {
        if self.check(color)?.is_none() {
            return Ok(false);
        }

        let mate = !self.has_legal_move(color)?;
        debug!(%color, mate, "checkmate test");
        Ok(mate)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
