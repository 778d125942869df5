// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Movement shapes for each kind of piece. A move is "shape-legal" if it fits the way the piece moves,
//! considering only the occupancy of the board and never whether the move would leave a king in check.

use lazy_static::lazy_static;

use crate::core::*;
use crate::piece::BoardView;

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

struct LeaperTable {
    table: [SquareSet; 64],
}

impl LeaperTable {
    fn new(deltas: &[(i8, i8)]) -> LeaperTable {
        let mut lt = LeaperTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            lt.table[sq.0 as usize] = deltas
                .iter()
                .filter_map(|&(df, dr)| sq.offset(df, dr))
                .collect();
        }

        lt
    }

    fn targets(&self, sq: Square) -> SquareSet {
        self.table[sq.0 as usize]
    }
}

lazy_static! {
    static ref KING_TABLE: LeaperTable = LeaperTable::new(&KING_DELTAS);
    static ref KNIGHT_TABLE: LeaperTable = LeaperTable::new(&KNIGHT_DELTAS);
}

pub fn king_targets(sq: Square) -> SquareSet {
    KING_TABLE.targets(sq)
}

pub fn knight_targets(sq: Square) -> SquareSet {
    KNIGHT_TABLE.targets(sq)
}

/// Returns whether a piece of the given kind and color can move from `origin` to `destination` on the
/// board seen through `view`.
pub fn is_shape_legal<V: BoardView + ?Sized>(
    kind: PieceKind,
    color: Color,
    origin: Square,
    destination: Square,
    view: &V,
) -> bool {
    if origin == destination || view.occupant(destination) == Some(color) {
        return false;
    }

    let (df, dr) = deltas(origin, destination);
    match kind {
        PieceKind::King => king_targets(origin).contains(destination),
        PieceKind::Knight => knight_targets(origin).contains(destination),
        PieceKind::Rook => (df == 0 || dr == 0) && ray_clear(origin, destination, view),
        PieceKind::Bishop => df.abs() == dr.abs() && ray_clear(origin, destination, view),
        PieceKind::Queen => {
            (df == 0 || dr == 0 || df.abs() == dr.abs()) && ray_clear(origin, destination, view)
        }
        PieceKind::Pawn => pawn_shape(color, origin, destination, df, dr, view),
    }
}

fn deltas(origin: Square, destination: Square) -> (i8, i8) {
    (
        destination.file().as_u8() as i8 - origin.file().as_u8() as i8,
        destination.rank().as_u8() as i8 - origin.rank().as_u8() as i8,
    )
}

/// Walks from `origin` towards `destination` one square at a time, returning false if anything stands in
/// between. The caller guarantees the two squares share a rank, file or diagonal.
fn ray_clear<V: BoardView + ?Sized>(origin: Square, destination: Square, view: &V) -> bool {
    let (df, dr) = deltas(origin, destination);
    let (step_file, step_rank) = (df.signum(), dr.signum());
    let mut cursor = origin.offset(step_file, step_rank);
    while let Some(sq) = cursor {
        if sq == destination {
            return true;
        }

        if view.occupant(sq).is_some() {
            return false;
        }

        cursor = sq.offset(step_file, step_rank);
    }

    false
}

fn pawn_shape<V: BoardView + ?Sized>(
    color: Color,
    origin: Square,
    destination: Square,
    df: i8,
    dr: i8,
    view: &V,
) -> bool {
    let forward = color.forward();
    let target_empty = view.occupant(destination).is_none();
    match (df.abs(), dr) {
        (0, dr) if dr == forward => target_empty,
        (0, dr) if dr == 2 * forward => {
            // Double pushes only from the starting rank, and only over an empty square.
            origin.rank() == color.pawn_rank()
                && target_empty
                && origin
                    .offset(0, forward)
                    .map_or(false, |mid| view.occupant(mid).is_none())
        }
        // Own pieces were already excluded, so an occupied target holds an enemy.
        (1, dr) if dr == forward => !target_empty,
        _ => false,
    }
}
