//! Pseudo-legal and legal move generation.

use crate::bitboard::{BitboardIter, ATTACK_TABLES};
use crate::board::{castle_squares, Board};
use crate::types::*;

/// Upper bound on the number of moves in any legal chess position
const MAX_MOVES: usize = 218;

/// Pseudo-legal move generation for one side.
///
/// Moves obey piece movement and never capture a friendly piece, but may leave the
/// mover's own king in check. Castling is only generated when all its preconditions
/// hold, including the attacked-square checks.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    color: Color,
    moves: Vec<Move>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, color: Color) -> Self {
        Self {
            board,
            color,
            moves: Vec::with_capacity(MAX_MOVES),
        }
    }

    pub fn collect(mut self) -> Vec<Move> {
        self.generate_pawn_moves(false);
        for piece_type in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
            PieceType::King,
        ] {
            self.generate_piece_moves(piece_type, !0);
        }
        self.generate_castling_moves();
        self.moves
    }

    /// Only moves that remove an enemy piece, en passant and capturing promotions included
    pub fn collect_captures(mut self) -> Vec<Move> {
        let enemy = self.board.color_bb(self.color.other_color());
        self.generate_pawn_moves(true);
        for piece_type in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
            PieceType::King,
        ] {
            self.generate_piece_moves(piece_type, enemy);
        }
        self.moves
    }

    fn generate_piece_moves(&mut self, piece_type: PieceType, target_mask: u64) {
        let piece = Piece::new(self.color, piece_type);
        for from in BitboardIter(self.board.piece_bb(piece)) {
            let targets = self.board.pseudo_legal_targets(from, piece) & target_mask;
            for to in BitboardIter(targets) {
                self.moves.push(Move::new(from, to));
            }
        }
    }

    fn generate_pawn_moves(&mut self, captures_only: bool) {
        let piece = Piece::new(self.color, PieceType::Pawn);
        let enemy = self.board.color_bb(self.color.other_color());
        let en_passant = self.board.en_passant_target_if_capturable();
        let promotion_rank = self.color.promotion_rank();

        for from in BitboardIter(self.board.piece_bb(piece)) {
            let mut targets = self.board.pseudo_legal_targets(from, piece);
            if captures_only {
                targets &= enemy | en_passant.map_or(0, |sq| sq.bb());
            }
            for to in BitboardIter(targets) {
                if to.rank() == promotion_rank {
                    for promo_type in PIECES_CAN_PROMOTE_TO {
                        self.moves
                            .push(Move::with_promotion(from, to, Piece::new(self.color, promo_type)));
                    }
                } else {
                    self.moves.push(Move::new(from, to));
                }
            }
        }
    }

    fn generate_castling_moves(&mut self) {
        for flank in [CastleRight::KingSide, CastleRight::QueenSide] {
            if self.board.castle_allowed(self.color, flank) {
                let cs = castle_squares(self.color, flank);
                self.moves.push(Move::new(cs.king_from, cs.king_to));
            }
        }
    }
}

impl Board {
    /// Destination squares for `piece` standing on `from`, castling excluded
    pub(crate) fn pseudo_legal_targets(&self, from: Square, piece: Piece) -> u64 {
        let t = &ATTACK_TABLES;
        let occupied = self.occupied();
        let own = self.color_bb(piece.color);
        match piece.piece_type {
            PieceType::Pawn => {
                let mut capturable = self.color_bb(piece.color.other_color());
                if piece.color == self.side_to_move {
                    if let Some(target) = self.en_passant_target_if_capturable() {
                        capturable |= target.bb();
                    }
                }
                t.pawn_moves(from, piece.color, occupied)
                    | (t.pawn_attacks(from, piece.color) & capturable)
            }
            PieceType::Knight => t.knight_attacks(from) & !own,
            PieceType::Bishop => t.bishop_attacks(from, occupied) & !own,
            PieceType::Rook => t.rook_attacks(from, occupied) & !own,
            PieceType::Queen => t.queen_attacks(from, occupied) & !own,
            PieceType::King => t.king_attacks(from) & !own,
        }
    }

    /// The en passant landing square, when a capture there is possible
    pub(crate) fn en_passant_target_if_capturable(&self) -> Option<Square> {
        self.en_passant.and(self.en_passant_target)
    }

    /// All pseudo-legal moves for the side to move
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new(self, self.side_to_move).collect()
    }

    /// Pseudo-legal captures for the side to move
    pub fn pseudo_legal_captures(&self) -> Vec<Move> {
        MoveGenerator::new(self, self.side_to_move).collect_captures()
    }

    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|&m| self.is_move_legal(m, false));
        moves
    }

    /// Whether the side to move has at least one legal move
    pub fn has_legal_move(&self) -> bool {
        self.pseudo_legal_moves()
            .into_iter()
            .any(|m| self.is_move_legal(m, false))
    }
}
