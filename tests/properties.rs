//! Properties checked over positions reached by random play from the standard start
//! and from a few sharper positions.

use chessboard_core::bitboard::{BitboardIter, ATTACK_TABLES};
use chessboard_core::{Board, Color, Move, PieceType, Square};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const START_FENS: [&str; 4] = [
    chessboard_core::STARTING_POSITION_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

/// Play up to `plies` random legal moves, returning the board and a snapshot before each move.
fn random_walk(fen: &str, seed: u64, plies: usize) -> (Board, Vec<Board>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::from_fen(fen).unwrap();
    let mut snapshots = Vec::new();
    for _ in 0..plies {
        let moves = board.legal_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        snapshots.push(board.clone());
        assert!(board.do_move(mv, true), "{} rejected in {}", mv, board);
    }
    (board, snapshots)
}

/// Squares a piece of `piece_type` on `from` attacks, looked up from its own square.
fn forward_attacks(piece_type: PieceType, from: Square, color: Color, occupied: u64) -> u64 {
    match piece_type {
        PieceType::Pawn => ATTACK_TABLES.pawn_attacks(from, color),
        PieceType::Knight => ATTACK_TABLES.knight_attacks(from),
        PieceType::Bishop => ATTACK_TABLES.bishop_attacks(from, occupied),
        PieceType::Rook => ATTACK_TABLES.rook_attacks(from, occupied),
        PieceType::Queen => ATTACK_TABLES.queen_attacks(from, occupied),
        PieceType::King => ATTACK_TABLES.king_attacks(from),
    }
}

fn position() -> impl Strategy<Value = (usize, u64, usize)> {
    (0..START_FENS.len(), any::<u64>(), 0usize..120)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn incremental_hash_matches_full_hash((fen, seed, plies) in position()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::from_fen(START_FENS[fen]).unwrap();
        for _ in 0..plies {
            prop_assert_eq!(board.incremental_hash_key(), board.zobrist_key());
            prop_assert!(board.is_consistent());
            let moves = board.legal_moves();
            let Some(&mv) = moves.choose(&mut rng) else {
                break;
            };
            board.do_move(mv, false);
        }
        prop_assert_eq!(board.incremental_hash_key(), board.zobrist_key());
    }

    #[test]
    fn undo_restores_every_position((fen, seed, plies) in position()) {
        let (mut board, snapshots) = random_walk(START_FENS[fen], seed, plies);
        prop_assert_eq!(board.undo_stack_len(), snapshots.len());
        for snapshot in snapshots.iter().rev() {
            board.undo_move();
            prop_assert_eq!(&board, snapshot);
            prop_assert_eq!(board.history(), snapshot.history());
            prop_assert_eq!(board.incremental_hash_key(), snapshot.incremental_hash_key());
        }
        prop_assert_eq!(board.undo_stack_len(), 0);
    }

    #[test]
    fn fen_round_trip((fen, seed, plies) in position()) {
        let (board, _) = random_walk(START_FENS[fen], seed, plies);
        let text = board.to_fen(true, false);
        let reloaded = Board::from_fen(&text).unwrap();
        prop_assert_eq!(&reloaded, &board);
        prop_assert_eq!(reloaded.to_fen(true, false), text);
        prop_assert_eq!(reloaded.to_fen(true, true), board.to_fen(true, true));
    }

    #[test]
    fn legal_moves_never_leave_king_in_check((fen, seed, plies) in position()) {
        let (mut board, _) = random_walk(START_FENS[fen], seed, plies);
        let side = board.side_to_move();
        let pseudo = board.pseudo_legal_moves();
        for mv in board.legal_moves() {
            prop_assert!(pseudo.contains(&mv));
            prop_assert!(board.is_move_legal(mv, true));
            prop_assert!(board.do_move(mv, false));
            let king = board.king_square(side).unwrap();
            prop_assert!(!board.is_square_attacked_by(king, side.other_color()));
            board.undo_move();
        }
        for mv in pseudo {
            if !board.is_move_legal(mv, false) {
                prop_assert!(board.do_move(mv, false));
                let king = board.king_square(side).unwrap();
                prop_assert!(board.is_square_attacked_by(king, side.other_color()));
                board.undo_move();
            }
        }
    }

    #[test]
    fn captures_are_a_subset_of_moves((fen, seed, plies) in position()) {
        let (board, _) = random_walk(START_FENS[fen], seed, plies);
        let all = board.pseudo_legal_moves();
        let enemy = board.color_bb(board.side_to_move().other_color());
        for mv in board.pseudo_legal_captures() {
            prop_assert!(all.contains(&mv));
            let en_passant = board.en_passant_target() == Some(mv.to) && board.en_passant().is_some();
            prop_assert!(enemy & mv.to.bb() != 0 || en_passant, "{} is not a capture", mv);
        }
    }

    #[test]
    fn every_attacker_attacks_the_square((fen, seed, plies) in position()) {
        let (board, _) = random_walk(START_FENS[fen], seed, plies);
        let occupied = board.occupied();
        for sq in Square::ALL {
            for color in Color::ALL {
                let attackers = board.square_attacked_by(sq, color);
                prop_assert_eq!(attackers & !board.color_bb(color), 0);
                prop_assert_eq!(attackers != 0, board.is_square_attacked_by(sq, color));
                for from in BitboardIter(attackers) {
                    let piece = board.piece_at(from).unwrap();
                    prop_assert_eq!(piece.color, color);
                    let forward = forward_attacks(piece.piece_type, from, color, occupied);
                    prop_assert_ne!(forward & sq.bb(), 0, "{:?} on {} does not reach {}", piece, from, sq);
                }
                for from in BitboardIter(board.color_bb(color)) {
                    let piece = board.piece_at(from).unwrap();
                    if forward_attacks(piece.piece_type, from, color, occupied) & sq.bb() != 0 {
                        prop_assert_ne!(attackers & from.bb(), 0, "{:?} on {} missed as attacker of {}", piece, from, sq);
                    }
                }
            }
        }
    }
}

#[test]
fn long_random_games_stay_consistent() {
    for seed in 0..20u64 {
        let (mut board, snapshots) = random_walk(START_FENS[0], seed, 300);
        assert_eq!(board.incremental_hash_key(), board.zobrist_key());
        assert!(board.is_consistent());
        while board.undo_stack_len() > 0 {
            board.undo_move();
        }
        if let Some(first) = snapshots.first() {
            assert_eq!(&board, first);
        }
    }
}

#[test]
fn null_move_is_reversible() {
    let (mut board, _) = random_walk(START_FENS[1], 7, 10);
    if board.is_king_attacked() {
        return;
    }
    let before = board.clone();
    board.do_null_move();
    assert_ne!(board.side_to_move(), before.side_to_move());
    assert_eq!(board.en_passant_target(), None);
    assert_eq!(board.incremental_hash_key(), board.zobrist_key());
    assert_eq!(board.undo_move(), Move::NULL);
    assert_eq!(board, before);
}
