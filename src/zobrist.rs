use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitboard::BitboardIter;
use crate::board::Board;
use crate::types::{CastleRight, Color, File, Piece, Square};

const ZOBRIST_SEED: u64 = 49_109_794_719;

/// Zobrist hashing keys for chess positions.
/// These are pseudo-random u64 values XORed together to create a unique hash for each position.
pub struct ZobristKeys {
    /// One key per (piece, square): indexed as pieces[piece.index()][square]
    pub pieces: [[u64; 64]; 12],
    /// One key per (color, castle right value), `CastleRight::None` included
    pub castle_rights: [[u64; 4]; 2],
    /// Keys for the file of the pawn that can be taken en passant
    pub en_passant: [u64; 8],
    /// One key per side to move
    pub side_to_move: [u64; 2],
}

impl ZobristKeys {
    /// Draw every key from a `StdRng` seeded with a fixed value, so hashes are
    /// reproducible from run to run.
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut pieces = [[0u64; 64]; 12];
        for piece in pieces.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut castle_rights = [[0u64; 4]; 2];
        for side in castle_rights.iter_mut() {
            for key in side.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut en_passant = [0u64; 8];
        for key in en_passant.iter_mut() {
            *key = rng.gen();
        }

        let side_to_move = [rng.gen(), rng.gen()];

        ZobristKeys {
            pieces,
            castle_rights,
            en_passant,
            side_to_move,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.index()][sq.index()]
    }

    #[inline(always)]
    pub fn castle_key(&self, color: Color, right: CastleRight) -> u64 {
        self.castle_rights[color.index()][right.index()]
    }

    #[inline(always)]
    pub fn en_passant_key(&self, file: File) -> u64 {
        self.en_passant[file.index()]
    }

    #[inline(always)]
    pub fn side_key(&self, color: Color) -> u64 {
        self.side_to_move[color.index()]
    }

    /// Recompute the hash of a position from scratch.
    ///
    /// The en passant key only contributes when the pawn that just advanced two squares
    /// can really be captured, so positions differing only in an unusable en passant
    /// square hash the same.
    pub fn full_hash(&self, board: &Board) -> u64 {
        let mut hash = 0;
        for piece in Piece::ALL {
            for sq in BitboardIter(board.piece_bb(piece)) {
                hash ^= self.piece_key(piece, sq);
            }
        }
        for color in Color::ALL {
            hash ^= self.castle_key(color, board.castle_right(color));
        }
        if let Some(sq) = board.en_passant() {
            hash ^= self.en_passant_key(sq.file());
        }
        hash ^ self.side_key(board.side_to_move())
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global static Zobrist keys (initialized once)
pub static ZOBRIST_KEYS: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
