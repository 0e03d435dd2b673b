//! Terminal and draw detection on top of the legal move generator.

use crate::bitboard::{DARK_SQUARES, LIGHT_SQUARES};
use crate::board::Board;
use crate::types::{Color, PieceType, Status};

impl Board {
    /// Side to move is in check and has no legal move.
    pub fn is_mated(&self) -> bool {
        self.is_king_attacked() && !self.has_legal_move()
    }

    /// Side to move is not in check and has no legal move.
    pub fn is_stalemate(&self) -> bool {
        !self.is_king_attacked() && !self.has_legal_move()
    }

    /// Whether the current position occurred `n` times counting itself.
    ///
    /// Only positions with the same side to move (every second entry) inside the
    /// half-move-clock window are compared, since nothing before the last capture or
    /// pawn move can repeat. Without history this always returns false.
    pub fn is_repetition(&self, n: usize) -> bool {
        if n <= 1 {
            return true;
        }
        let Some(&current) = self.history.last() else {
            return false;
        };
        let last = self.history.len() - 1;
        let window = last.min(self.halfmove_clock as usize);

        let mut seen = 0;
        for back in (2..=window).step_by(2) {
            if self.history[last - back] == current {
                seen += 1;
                if seen >= n - 1 {
                    return true;
                }
            }
        }
        false
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.is_repetition(3)
    }

    /// Neither side has enough material left to give mate.
    ///
    /// Any pawn, rook or queen is enough. Otherwise the position is dead with at most one
    /// minor piece on the board, or with bishops only when they all stand on one square color.
    /// Knight against knight or bishop, and bishops on opposite colors, count as sufficient:
    /// a mate is still reachable with cooperating play.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawn = self.piece_type_bb(PieceType::Pawn)
            | self.piece_type_bb(PieceType::Rook)
            | self.piece_type_bb(PieceType::Queen);
        if heavy_or_pawn != 0 {
            return false;
        }

        let knights = self.piece_type_bb(PieceType::Knight);
        let bishops = self.piece_type_bb(PieceType::Bishop);
        if (knights | bishops).count_ones() <= 1 {
            return true;
        }

        knights == 0 && (bishops & LIGHT_SQUARES == 0 || bishops & DARK_SQUARES == 0)
    }

    /// Draw by threefold repetition, insufficient material, the fifty move rule or stalemate.
    pub fn is_draw(&self) -> bool {
        self.is_threefold_repetition()
            || self.is_insufficient_material()
            || self.halfmove_clock >= 100
            || self.is_stalemate()
    }

    /// The result of the game if it is over, `None` while play continues.
    pub fn status(&self) -> Option<Status> {
        if !self.has_legal_move() {
            return Some(if self.is_king_attacked() {
                Status::Checkmate(self.side_to_move.other_color())
            } else {
                Status::Stalemate
            });
        }
        if self.is_insufficient_material() {
            Some(Status::InsufficientMaterial)
        } else if self.is_threefold_repetition() {
            Some(Status::ThreefoldRepetition)
        } else if self.halfmove_clock >= 100 {
            Some(Status::FiftyMoveRule)
        } else {
            None
        }
    }

    fn piece_type_bb(&self, piece_type: PieceType) -> u64 {
        self.pieces(Color::White, piece_type) | self.pieces(Color::Black, piece_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Move, Square};

    fn play(board: &mut Board, moves: &[&str]) {
        for uci in moves {
            let mv = Move::from_uci(uci).unwrap();
            assert!(board.do_move(mv, true), "move {} rejected", uci);
        }
    }

    #[test]
    fn test_fools_mate() {
        let mut b = Board::new();
        play(&mut b, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(b.is_king_attacked());
        assert!(b.is_mated());
        assert!(!b.is_stalemate());
        assert!(!b.is_draw());
        assert_eq!(b.status(), Some(Status::Checkmate(Color::Black)));
    }

    #[test]
    fn test_stalemate() {
        let b = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!b.is_king_attacked());
        assert!(b.is_stalemate());
        assert!(!b.is_mated());
        assert!(b.is_draw());
        assert_eq!(b.status(), Some(Status::Stalemate));
    }

    #[test]
    fn test_start_position_is_not_over() {
        let b = Board::new();
        assert!(!b.is_mated());
        assert!(!b.is_stalemate());
        assert!(!b.is_insufficient_material());
        assert!(!b.is_draw());
        assert_eq!(b.status(), None);
    }

    #[test]
    fn test_insufficient_material() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1", true),
            // bishops on c1 and f8 are both dark squared
            ("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
            // c1 dark, c8 light
            ("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/1NN1K3 w - - 0 1", false),
            ("4kn2/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("4kn2/8/8/8/8/8/8/1N2K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", false),
            ("3qk3/8/8/8/8/8/8/4K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let b = Board::from_fen(fen).unwrap();
            assert_eq!(b.is_insufficient_material(), expected, "{}", fen);
        }

        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(b.is_draw());
        assert_eq!(b.status(), Some(Status::InsufficientMaterial));
    }

    #[test]
    fn test_threefold_repetition_on_third_occurrence() {
        let mut b = Board::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        play(&mut b, &shuffle);
        // start position seen twice
        assert!(b.is_repetition(2));
        assert!(!b.is_threefold_repetition());
        assert!(!b.is_draw());

        play(&mut b, &shuffle[..3]);
        assert!(!b.is_threefold_repetition());

        play(&mut b, &shuffle[3..]);
        assert!(b.is_threefold_repetition());
        assert!(b.is_draw());
        assert_eq!(b.status(), Some(Status::ThreefoldRepetition));

        b.undo_move();
        assert!(!b.is_threefold_repetition());
    }

    #[test]
    fn test_repetition_needs_history() {
        let mut b = Board::with_options(crate::board::BoardOptions {
            track_history: false,
        });
        b.load_fen(crate::board::STARTING_POSITION_FEN).unwrap();
        play(&mut b, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        play(&mut b, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert!(!b.is_repetition(2));
        assert!(!b.is_threefold_repetition());
        assert!(b.is_repetition(1));
    }

    #[test]
    fn test_repetition_window_is_bounded_by_halfmove_clock() {
        let mut b = Board::new();
        play(&mut b, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert!(b.is_repetition(2));
        // a pawn move resets the clock, earlier positions can no longer repeat
        play(&mut b, &["e2e4", "e7e5", "g1f3", "g8f6", "f3g1", "f6g8"]);
        assert_eq!(b.halfmove_clock(), 4);
        assert!(b.is_repetition(2));
        assert!(!b.is_threefold_repetition());
    }

    #[test]
    fn test_fifty_move_rule() {
        let mut b = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert!(!b.is_draw());
        assert!(b.do_move(Move::new(Square::A1, Square::A2), true));
        assert_eq!(b.halfmove_clock(), 100);
        assert!(b.is_draw());
        assert_eq!(b.status(), Some(Status::FiftyMoveRule));
    }

    #[test]
    fn test_mate_beats_fifty_move_rule() {
        // back rank mate delivered on the hundredth half move
        let mut b = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80").unwrap();
        assert!(b.do_move(Move::new(Square::A1, Square::A8), true));
        assert!(b.is_mated());
        assert_eq!(b.status(), Some(Status::Checkmate(Color::White)));
    }
}
