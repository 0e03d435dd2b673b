//! Move path enumeration, used to check the move generator against known node counts.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::board::Board;
use crate::types::Move;

/// Count the leaf nodes of the legal move tree `depth` plies deep.
///
/// The board is walked with do/undo and is left as it was found.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.do_move(mv, false);
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

/// Node count below each root move, in generation order.
pub fn perft_divide(board: &mut Board, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut divided = Vec::new();
    for mv in board.legal_moves() {
        board.do_move(mv, false);
        let nodes = perft(board, depth - 1);
        board.undo_move();
        debug!(%mv, nodes, "divide");
        divided.push((mv, nodes));
    }
    divided
}

/// Same count as [`perft`], with the root moves spread over the rayon thread pool.
///
/// Each root move is searched on its own clone of the board.
pub fn perft_parallel(board: &Board, depth: u8) -> u64 {
    if depth <= 1 {
        return perft(&mut board.clone(), depth);
    }

    let nodes: u64 = board
        .legal_moves()
        .into_par_iter()
        .map(|mv| {
            let mut child = board.clone();
            child.do_move(mv, false);
            perft(&mut child, depth - 1)
        })
        .sum();
    info!(depth, nodes, threads = rayon::current_num_threads(), "parallel perft done");
    nodes
}
