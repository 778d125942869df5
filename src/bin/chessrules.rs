// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{anyhow, bail, Context};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;
use structopt::StructOpt;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use chessrules::{
    core::{Color, Square},
    Board, Check, Move, Piece,
};

/// Plays moves on a chessboard from the starting position and reports check and checkmate.
#[derive(Debug, StructOpt)]
struct Options {
    /// Moves to play, as pairs of squares. Sides alternate, starting with White: `e2 e4 e7 e5`.
    #[structopt(name = "SQUARES")]
    squares: Vec<String>,

    /// Number of random legal moves to play after the given ones. Stops early on checkmate.
    #[structopt(long, default_value = "0")]
    random: u32,

    /// Seed for the random move picker.
    #[structopt(long)]
    seed: Option<u64>,

    /// Print the final report as JSON instead of a board diagram.
    #[structopt(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    moves: Vec<Move>,
    side_to_move: Color,
    pieces: Vec<Piece>,
    white: SideReport,
    black: SideReport,
}

#[derive(Serialize)]
struct SideReport {
    check: Option<Check>,
    checkmate: bool,
}

impl SideReport {
    fn of(board: &Board, color: Color) -> anyhow::Result<SideReport> {
        Ok(SideReport {
            check: board.check(color)?,
            checkmate: board.is_checkmate(color)?,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("CHESSRULES_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let options = Options::from_args();
    if options.squares.len() % 2 != 0 {
        bail!("moves must be given as pairs of squares");
    }

    let mut board = Board::start_position();
    let mut side = Color::White;
    let mut played = vec![];
    for pair in options.squares.chunks(2) {
        let from: Square = pair[0]
            .parse()
            .with_context(|| format!("bad square {:?}", pair[0]))?;
        let to: Square = pair[1]
            .parse()
            .with_context(|| format!("bad square {:?}", pair[1]))?;
        if !board.is_occupied(from) {
            bail!("no piece on {}", from);
        }

        if !board.is_occupied_by_color(from, side)? {
            bail!("it is {}'s turn to move, but {} holds a {} piece", side, from, side.toggle());
        }

        board
            .move_piece(from, to)
            .with_context(|| format!("cannot play {}{}", from, to))?;
        played.push(Move::new(from, to));
        side = side.toggle();
    }

    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    for _ in 0..options.random {
        if board.is_checkmate(side)? {
            break;
        }

        let moves = board.legal_moves(side)?;
        let mov = match moves.choose(&mut rng) {
            Some(&mov) => mov,
            None => {
                warn!(%side, "no legal moves, stopping");
                break;
            }
        };

        info!(%side, %mov, "random move");
        board
            .move_piece(mov.from, mov.to)
            .map_err(|e| anyhow!("generated move {} was rejected: {}", mov, e))?;
        played.push(mov);
        side = side.toggle();
    }

    let report = Report {
        moves: played,
        side_to_move: side,
        pieces: board.live_pieces().copied().collect(),
        white: SideReport::of(&board, Color::White)?,
        black: SideReport::of(&board, Color::Black)?,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", board);
    println!(
        "{:<16} {}",
        "Moves:",
        report
            .moves
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("{:<16} {}", "Side to move:", report.side_to_move);
    println!("{:<16} {}", "White:", status(&board, &report.white));
    println!("{:<16} {}", "Black:", status(&board, &report.black));

    Ok(())
}

fn status(board: &Board, side: &SideReport) -> String {
    match side.check {
        _ if side.checkmate => "checkmated".to_owned(),
        Some(check) => match board.piece(check.attacker) {
            Some(attacker) => format!(
                "in check from the {} on {}",
                attacker.kind(),
                attacker.square()
            ),
            None => format!("in check from {}", check.attacker),
        },
        None => "safe".to_owned(),
    }
}
