//! Attack queries and move legality.
//!
//! Legality is decided without playing the move: the occupancy after the move is
//! computed as a bitboard and the king square is probed for attackers under it. That
//! catches direct checks, discovered checks through the vacated square, and the en
//! passant case where two pawns leave the same rank at once.

use crate::bitboard::{BitboardIter, ATTACK_TABLES};
use crate::board::{castle_squares, Board};
use crate::types::{CastleRight, Color, Move, Piece, PieceType, Square, PIECES_CAN_PROMOTE_TO};

impl Board {
    /// Pieces of `side` attacking `sq` when the board occupancy is `occupied`.
    ///
    /// Pieces whose square is not in `occupied` are treated as captured.
    pub fn square_attacked_by_with_occupancy(&self, sq: Square, side: Color, occupied: u64) -> u64 {
        let t = &ATTACK_TABLES;
        let queens = self.pieces(side, PieceType::Queen);
        let attackers = (t.pawn_attacks(sq, side.other_color()) & self.pieces(side, PieceType::Pawn))
            | (t.knight_attacks(sq) & self.pieces(side, PieceType::Knight))
            | (t.king_attacks(sq) & self.pieces(side, PieceType::King))
            | (t.bishop_attacks(sq, occupied) & (self.pieces(side, PieceType::Bishop) | queens))
            | (t.rook_attacks(sq, occupied) & (self.pieces(side, PieceType::Rook) | queens));
        attackers & occupied
    }

    /// Pieces of `side` attacking `sq`
    #[inline]
    pub fn square_attacked_by(&self, sq: Square, side: Color) -> u64 {
        self.square_attacked_by_with_occupancy(sq, side, self.occupied())
    }

    #[inline]
    pub fn is_square_attacked_by(&self, sq: Square, side: Color) -> bool {
        self.square_attacked_by(sq, side) != 0
    }

    /// Pieces of `side` and type `piece_type` attacking `sq`
    pub fn square_attacked_by_piece_type(&self, sq: Square, side: Color, piece_type: PieceType) -> u64 {
        let t = &ATTACK_TABLES;
        let occupied = self.occupied();
        let attacks = match piece_type {
            PieceType::Pawn => t.pawn_attacks(sq, side.other_color()),
            PieceType::Knight => t.knight_attacks(sq),
            PieceType::Bishop => t.bishop_attacks(sq, occupied),
            PieceType::Rook => t.rook_attacks(sq, occupied),
            PieceType::Queen => t.queen_attacks(sq, occupied),
            PieceType::King => t.king_attacks(sq),
        };
        attacks & self.pieces(side, piece_type)
    }

    /// Enemy pieces giving check to the side to move
    pub fn checkers(&self) -> u64 {
        match self.king_square(self.side_to_move) {
            Some(king) => self.square_attacked_by(king, self.side_to_move.other_color()),
            None => 0,
        }
    }

    /// Is the king of the side to move in check
    pub fn is_king_attacked(&self) -> bool {
        self.checkers() != 0
    }

    /// Whether `mv` can be played without leaving the mover's king in check.
    ///
    /// Without `full_validation` the move must already be pseudo-legal, as produced by
    /// the move generator. With it, the move is first checked against the piece's
    /// movement rules, side to move, promotion and castling requirements.
    ///
    /// # Panics
    ///
    /// With `full_validation`, if there is no piece on the origin square.
    pub fn is_move_legal(&self, mv: Move, full_validation: bool) -> bool {
        let Some(piece) = self.piece_at(mv.from) else {
            if full_validation {
                panic!("no piece on {} to play {}", mv.from, mv);
            }
            return false;
        };
        if full_validation && !self.is_structurally_valid(mv, piece) {
            return false;
        }

        let side = piece.color;
        let other = side.other_color();

        let king_sq = if piece.piece_type == PieceType::King {
            if self.is_square_attacked_by(mv.to, other) {
                return false;
            }
            mv.to
        } else {
            match self.king_square(side) {
                Some(sq) => sq,
                None => return true,
            }
        };

        let mut occupied = (self.occupied() ^ mv.from.bb()) | mv.to.bb();
        let mut captured = mv.to.bb();
        if piece.piece_type == PieceType::Pawn {
            if let Some(pawn_sq) = self.en_passant_capture_square(mv) {
                occupied ^= pawn_sq.bb();
                captured |= pawn_sq.bb();
            }
        }

        self.square_attacked_by_with_occupancy(king_sq, other, occupied) & !captured == 0
    }

    fn is_structurally_valid(&self, mv: Move, piece: Piece) -> bool {
        let side = self.side_to_move;
        if piece.color != side || mv.from == mv.to {
            return false;
        }
        if matches!(self.piece_at(mv.to), Some(target) if target.color == side) {
            return false;
        }

        let promotes = piece.piece_type == PieceType::Pawn && mv.to.rank() == side.promotion_rank();
        match mv.promotion {
            Some(p) => {
                if !promotes || p.color != side || !PIECES_CAN_PROMOTE_TO.contains(&p.piece_type) {
                    return false;
                }
            }
            None if promotes => return false,
            None => {}
        }

        if piece.piece_type == PieceType::King {
            for flank in [CastleRight::KingSide, CastleRight::QueenSide] {
                let cs = castle_squares(side, flank);
                if mv.from == cs.king_from && mv.to == cs.king_to {
                    return self.castle_allowed(side, flank);
                }
            }
        }

        self.pseudo_legal_targets(mv.from, piece) & mv.to.bb() != 0
    }

    /// All castling preconditions for `color` on `flank`: right held, king and rook
    /// in place, nothing between them, king not in check and not crossing an
    /// attacked square.
    pub(crate) fn castle_allowed(&self, color: Color, flank: CastleRight) -> bool {
        let cs = castle_squares(color, flank);
        let other = color.other_color();
        self.castle_right(color).allows(flank)
            && self.piece_at(cs.king_from) == Some(Piece::new(color, PieceType::King))
            && self.piece_at(cs.rook_from) == Some(Piece::new(color, PieceType::Rook))
            && self.occupied() & cs.path == 0
            && !self.is_square_attacked_by(cs.king_from, other)
            && BitboardIter(cs.transit).all(|sq| !self.is_square_attacked_by(sq, other))
    }

    /// Whether a pawn of `capturer` can legally take the pawn on `pawn_sq` by moving to
    /// `target`.
    ///
    /// Each capturing pawn is tried on its own: both pawns leave their squares, which
    /// can open a rank toward the king that a single removal would not.
    pub(crate) fn en_passant_capturable(&self, capturer: Color, target: Square, pawn_sq: Square) -> bool {
        let victim = capturer.other_color();
        if self.piece_at(pawn_sq) != Some(Piece::new(victim, PieceType::Pawn))
            || self.piece_at(target).is_some()
        {
            return false;
        }

        let candidates =
            ATTACK_TABLES.pawn_attacks(target, victim) & self.pieces(capturer, PieceType::Pawn);
        let Some(king_sq) = self.king_square(capturer) else {
            return candidates != 0;
        };

        BitboardIter(candidates).any(|from| {
            let occupied = (self.occupied() ^ from.bb() ^ pawn_sq.bb()) | target.bb();
            self.square_attacked_by_with_occupancy(king_sq, victim, occupied) == 0
        })
    }
}
