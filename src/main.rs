//! Command line front end for inspecting positions and counting move trees.
//!
//! Usage: cargo run --release -- perft --depth 5 --parallel
//!        cargo run --release -- show --fen "<fen>" e2e4 e7e5

use std::time::Instant;

use chessboard_core::perft::{perft, perft_divide, perft_parallel};
use chessboard_core::{Board, Move, STARTING_POSITION_FEN};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use itertools::Itertools;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chessboard_core")]
#[command(about = "Inspect chess positions and count legal move trees")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Position to start from
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Depth in plies
        #[arg(short, long, default_value_t = 5)]
        depth: u8,

        /// Print the node count below each root move
        #[arg(long)]
        divide: bool,

        /// Spread root moves over all cores
        #[arg(long, conflicts_with = "divide")]
        parallel: bool,
    },
    /// Play moves from a position and print the result
    Show {
        /// Position to start from
        #[arg(long, default_value = STARTING_POSITION_FEN)]
        fen: String,

        /// Moves in UCI notation, e.g. e2e4 e7e8q
        moves: Vec<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chessboard_core=info".into()),
        )
        .init();

    match Args::parse().command {
        Command::Perft {
            fen,
            depth,
            divide,
            parallel,
        } => run_perft(&fen, depth, divide, parallel),
        Command::Show { fen, moves } => run_show(&fen, &moves),
    }
}

fn run_perft(fen: &str, depth: u8, divide: bool, parallel: bool) -> Result<()> {
    let mut board = Board::from_fen(fen)?;
    let start = Instant::now();

    let nodes: u64 = if divide {
        let divided = perft_divide(&mut board, depth);
        for (mv, nodes) in &divided {
            println!("{}: {}", mv, nodes);
        }
        divided.iter().map(|(_, n)| n).sum()
    } else if parallel {
        perft_parallel(&board, depth)
    } else {
        perft(&mut board, depth)
    };

    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
    info!(depth, nodes, ?elapsed, nps, "perft finished");
    println!();
    println!("Nodes searched: {}", nodes);
    Ok(())
}

fn run_show(fen: &str, moves: &[String]) -> Result<()> {
    let mut board = Board::from_fen(fen)?;
    for text in moves {
        let mv: Move = text.parse()?;
        if board.piece_at(mv.from).is_none() {
            bail!("no piece on {} in {}", mv.from, board.to_fen(true, true));
        }
        if !board.do_move(mv, true) {
            bail!("illegal move {} in {}", mv, board.to_fen(true, true));
        }
    }

    board.draw_to_terminal();
    println!();
    println!("FEN:    {}", board.to_fen(true, true));
    println!("Key:    {:016x}", board.zobrist_key());
    println!("Check:  {}", board.is_king_attacked());
    match board.status() {
        Some(status) => println!("Status: {:?}", status),
        None => println!(
            "Moves:  {}",
            board.legal_moves().iter().map(|m| m.to_uci()).join(" ")
        ),
    }
    Ok(())
}
