//! Bitboard primitives and precomputed attack tables.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63.
//!
//! Sliding attacks are resolved without walking rays. Each square stores the full line
//! through it along its rank, file, diagonal and anti-diagonal (the square itself excluded).
//! Blockers on a line are split into those below and above the slider's index; the
//! nearest blocker on each side bounds an index range, and the visible attack set is the
//! part of the line inside that inclusive range. Squares on one line are ordered by index,
//! so a contiguous index range never leaks onto another part of the same line.

use crate::types::{Color, Square};

pub const EMPTY: u64 = 0;
pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_H: u64 = FILE_A << 7;
pub const RANK_1: u64 = 0xFF;
pub const RANK_2: u64 = RANK_1 << 8;
pub const RANK_7: u64 = RANK_1 << 48;
pub const RANK_8: u64 = RANK_1 << 56;

/// b1, d1, ..., a2, c2, ...: squares where file + rank is odd
pub const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;
pub const DARK_SQUARES: u64 = !LIGHT_SQUARES;

/// Convert a square index to a bitboard with that single bit set
#[inline(always)]
pub const fn sq_to_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Index of the least significant set bit. `bb` must be non-zero.
#[inline(always)]
pub const fn bit_scan_forward(bb: u64) -> u8 {
    bb.trailing_zeros() as u8
}

/// Index of the most significant set bit. `bb` must be non-zero.
#[inline(always)]
pub const fn bit_scan_reverse(bb: u64) -> u8 {
    63 - bb.leading_zeros() as u8
}

/// Iterate over set bits in a bitboard, lowest square first
pub struct BitboardIter(pub u64);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1; // Clear the lowest set bit
            Some(Square::from_index(sq))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

/// Precomputed attack tables
pub struct AttackTables {
    /// Knight attacks for each square
    pub knight: [u64; 64],
    /// King attacks for each square
    pub king: [u64; 64],
    /// Pawn captures for each color and square: pawn_attacks[color as usize][square]
    pub pawn_attacks: [[u64; 64]; 2],
    /// Single square pawn advance for each color and square
    pub pawn_push: [[u64; 64]; 2],
    /// Full rank through each square, excluding the square
    pub rank_lines: [u64; 64],
    /// Full file through each square, excluding the square
    pub file_lines: [u64; 64],
    /// Full a1-h8 direction diagonal through each square, excluding the square
    pub diagonals: [u64; 64],
    /// Full h1-a8 direction diagonal through each square, excluding the square
    pub anti_diagonals: [u64; 64],
    /// All bits with index in `min(a, b)..=max(a, b)`
    pub bits_between: [[u64; 64]; 64],
}

impl AttackTables {
    /// Initialize all attack tables at compile time
    #[rustfmt::skip]
    pub const fn new() -> Self {
        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];
        let mut pawn_attacks = [[0u64; 64]; 2];
        let mut pawn_push = [[0u64; 64]; 2];
        let mut rank_lines = [0u64; 64];
        let mut file_lines = [0u64; 64];
        let mut diagonals = [0u64; 64];
        let mut anti_diagonals = [0u64; 64];
        let mut bits_between = [[0u64; 64]; 64];

        // (rank_delta, file_delta)
        const KNIGHT_DELTAS: [(i8, i8); 8] = [
            (-2, -1), (-2, 1), (-1, -2), (-1, 2),
            (1, -2), (1, 2), (2, -1), (2, 1),
        ];

        const KING_DELTAS: [(i8, i8); 8] = [
            (-1, -1), (-1, 0), (-1, 1),
            (0, -1),           (0, 1),
            (1, -1),  (1, 0),  (1, 1),
        ];

        let mut sq: u8 = 0;
        while sq < 64 {
            let rank = (sq >> 3) as i8; // 0-7
            let file = (sq & 7) as i8; // 0-7
            let own = 1u64 << sq;

            let mut i = 0;
            while i < 8 {
                let (dr, df) = KNIGHT_DELTAS[i];
                let nr = rank + dr;
                let nf = file + df;
                if nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                    knight[sq as usize] |= 1u64 << ((nr * 8 + nf) as u32);
                }
                i += 1;
            }

            i = 0;
            while i < 8 {
                let (dr, df) = KING_DELTAS[i];
                let nr = rank + dr;
                let nf = file + df;
                if nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                    king[sq as usize] |= 1u64 << ((nr * 8 + nf) as u32);
                }
                i += 1;
            }

            // White pawns move up the board, black pawns down
            if rank < 7 {
                pawn_push[0][sq as usize] = 1u64 << (sq + 8);
                if file > 0 {
                    pawn_attacks[0][sq as usize] |= 1u64 << (sq + 7);
                }
                if file < 7 {
                    pawn_attacks[0][sq as usize] |= 1u64 << (sq + 9);
                }
            }
            if rank > 0 {
                pawn_push[1][sq as usize] = 1u64 << (sq - 8);
                if file > 0 {
                    pawn_attacks[1][sq as usize] |= 1u64 << (sq - 9);
                }
                if file < 7 {
                    pawn_attacks[1][sq as usize] |= 1u64 << (sq - 7);
                }
            }

            rank_lines[sq as usize] = (RANK_1 << (rank as u32 * 8)) & !own;
            file_lines[sq as usize] = (FILE_A << file as u32) & !own;

            let mut other: u8 = 0;
            while other < 64 {
                let r = (other >> 3) as i8;
                let f = (other & 7) as i8;
                if other != sq {
                    if r - f == rank - file {
                        diagonals[sq as usize] |= 1u64 << other;
                    }
                    if r + f == rank + file {
                        anti_diagonals[sq as usize] |= 1u64 << other;
                    }
                }

                let (lo, hi) = if sq < other { (sq, other) } else { (other, sq) };
                bits_between[sq as usize][other as usize] =
                    (u64::MAX >> (63 - hi)) & (u64::MAX << lo);
                other += 1;
            }

            sq += 1;
        }

        AttackTables {
            knight,
            king,
            pawn_attacks,
            pawn_push,
            rank_lines,
            file_lines,
            diagonals,
            anti_diagonals,
            bits_between,
        }
    }

    /// Attacks along one full line through `sq`, bounded by the nearest blocker on each side
    #[inline]
    pub fn line_attacks(&self, line: u64, sq: Square, occupied: u64) -> u64 {
        let blockers = line & occupied;
        if blockers == 0 {
            return line;
        }

        let below = sq.bb() - 1;
        let lower = blockers & below;
        let upper = blockers & !below;
        let minor = if lower == 0 { 0 } else { bit_scan_reverse(lower) };
        let major = if upper == 0 { 63 } else { bit_scan_forward(upper) };

        line & self.bits_between[minor as usize][major as usize]
    }

    /// Get rook attacks from a square given occupied squares
    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: u64) -> u64 {
        self.line_attacks(self.rank_lines[sq.index()], sq, occupied)
            | self.line_attacks(self.file_lines[sq.index()], sq, occupied)
    }

    /// Get bishop attacks from a square given occupied squares
    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: u64) -> u64 {
        self.line_attacks(self.diagonals[sq.index()], sq, occupied)
            | self.line_attacks(self.anti_diagonals[sq.index()], sq, occupied)
    }

    /// Get queen attacks from a square given occupied squares
    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: u64) -> u64 {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }

    #[inline(always)]
    pub fn knight_attacks(&self, sq: Square) -> u64 {
        self.knight[sq.index()]
    }

    #[inline(always)]
    pub fn king_attacks(&self, sq: Square) -> u64 {
        self.king[sq.index()]
    }

    /// Squares a pawn of `color` on `sq` captures on
    #[inline(always)]
    pub fn pawn_attacks(&self, sq: Square, color: Color) -> u64 {
        self.pawn_attacks[color.index()][sq.index()]
    }

    /// Non-capturing pawn advances: one square, or two from the starting rank when both
    /// squares are empty
    #[inline]
    pub fn pawn_moves(&self, sq: Square, color: Color, occupied: u64) -> u64 {
        let single = self.pawn_push[color.index()][sq.index()] & !occupied;
        if single == 0 {
            return 0;
        }
        let start_rank = match color {
            Color::White => RANK_2,
            Color::Black => RANK_7,
        };
        if sq.bb() & start_rank == 0 {
            return single;
        }
        let double = self.pawn_push[color.index()][bit_scan_forward(single) as usize] & !occupied;
        single | double
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Global precomputed attack tables
pub static ATTACK_TABLES: AttackTables = AttackTables::new();

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use Square::*;

    /// Classical ray walk used as a reference for the line algorithm
    fn slider_attacks_slow(sq: Square, occupied: u64, directions: &[(i32, i32)]) -> u64 {
        let rank = sq.rank().index() as i32;
        let file = sq.file().index() as i32;
        let mut attacks = 0u64;

        for &(dr, df) in directions {
            let mut r = rank + dr;
            let mut f = file + df;
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let target = 1u64 << (r * 8 + f);
                attacks |= target;
                if occupied & target != 0 {
                    break;
                }
                r += dr;
                f += df;
            }
        }
        attacks
    }

    fn rook_attacks_slow(sq: Square, occupied: u64) -> u64 {
        slider_attacks_slow(sq, occupied, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
    }

    fn bishop_attacks_slow(sq: Square, occupied: u64) -> u64 {
        slider_attacks_slow(sq, occupied, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
    }

    #[test]
    fn test_knight_attacks() {
        // Knight on e4 should attack d2, f2, c3, g3, c5, g5, d6, f6
        let attacks = ATTACK_TABLES.knight_attacks(E4);
        for target in [D2, F2, C3, G3, C5, G5, D6, F6] {
            assert!(attacks & target.bb() != 0, "missing {target}");
        }
        assert_eq!(attacks.count_ones(), 8);
    }

    #[test]
    fn test_knight_corner() {
        // Knight on a1 should only attack b3 and c2
        let attacks = ATTACK_TABLES.knight_attacks(A1);
        assert_eq!(attacks, C2.bb() | B3.bb());
    }

    #[test]
    fn test_king_attacks() {
        assert_eq!(ATTACK_TABLES.king_attacks(E4).count_ones(), 8);
        assert_eq!(ATTACK_TABLES.king_attacks(A1).count_ones(), 3);
        assert_eq!(ATTACK_TABLES.king_attacks(H5).count_ones(), 5);
    }

    #[test]
    fn test_pawn_attacks() {
        // White pawn on e4 attacks d5 and f5
        assert_eq!(ATTACK_TABLES.pawn_attacks(E4, Color::White), D5.bb() | F5.bb());
        // Black pawn on e5 attacks d4 and f4
        assert_eq!(ATTACK_TABLES.pawn_attacks(E5, Color::Black), D4.bb() | F4.bb());
        // Edge pawns only attack inward
        assert_eq!(ATTACK_TABLES.pawn_attacks(A2, Color::White), B3.bb());
        assert_eq!(ATTACK_TABLES.pawn_attacks(H7, Color::Black), G6.bb());
    }

    #[test]
    fn test_pawn_moves() {
        let t = &ATTACK_TABLES;
        assert_eq!(t.pawn_moves(E2, Color::White, 0), E3.bb() | E4.bb());
        assert_eq!(t.pawn_moves(E3, Color::White, 0), E4.bb());
        assert_eq!(t.pawn_moves(D7, Color::Black, 0), D6.bb() | D5.bb());
        // Blocked on the double step
        assert_eq!(t.pawn_moves(E2, Color::White, E4.bb()), E3.bb());
        // Blocked directly in front: no double step either
        assert_eq!(t.pawn_moves(E2, Color::White, E3.bb()), 0);
        assert_eq!(t.pawn_moves(D7, Color::Black, D6.bb()), 0);
    }

    #[test]
    fn test_lines_exclude_origin() {
        for sq in Square::ALL {
            let i = sq.index();
            let t = &ATTACK_TABLES;
            assert_eq!(t.rank_lines[i].count_ones(), 7);
            assert_eq!(t.file_lines[i].count_ones(), 7);
            for line in [t.rank_lines[i], t.file_lines[i], t.diagonals[i], t.anti_diagonals[i]] {
                assert_eq!(line & sq.bb(), 0);
            }
        }
        assert_eq!(ATTACK_TABLES.diagonals[A1.index()].count_ones(), 7);
        assert_eq!(ATTACK_TABLES.anti_diagonals[A1.index()], 0);
    }

    #[test]
    fn test_bits_between() {
        let t = &ATTACK_TABLES;
        assert_eq!(t.bits_between[0][63], u64::MAX);
        assert_eq!(t.bits_between[5][5], sq_to_bb(5));
        assert_eq!(t.bits_between[2][4], sq_to_bb(2) | sq_to_bb(3) | sq_to_bb(4));
        assert_eq!(t.bits_between[4][2], t.bits_between[2][4]);
    }

    #[test]
    fn test_rook_attacks_empty_board() {
        // Should attack 14 squares (7 on rank, 7 on file)
        assert_eq!(ATTACK_TABLES.rook_attacks(E4, 0).count_ones(), 14);
    }

    #[test]
    fn test_rook_attacks_with_blockers() {
        // Rook on e4, with pieces on e2 and g4
        let occupied = E2.bb() | G4.bb();
        let attacks = ATTACK_TABLES.rook_attacks(E4, occupied);

        // Should include e2 and g4 (can capture), but not squares beyond
        assert!(attacks & E2.bb() != 0);
        assert!(attacks & G4.bb() != 0);
        assert!(attacks & E1.bb() == 0);
        assert!(attacks & H4.bb() == 0);
        assert_eq!(attacks, rook_attacks_slow(E4, occupied));
    }

    #[test]
    fn test_bishop_attacks_empty_board() {
        assert_eq!(ATTACK_TABLES.bishop_attacks(E4, 0).count_ones(), 13);
    }

    #[test]
    fn test_bishop_attacks_with_blockers() {
        // Bishop on e4, with pieces on c2 and g6
        let occupied = C2.bb() | G6.bb();
        let attacks = ATTACK_TABLES.bishop_attacks(E4, occupied);

        assert!(attacks & C2.bb() != 0);
        assert!(attacks & G6.bb() != 0);
        assert!(attacks & B1.bb() == 0);
        assert!(attacks & H7.bb() == 0);
    }

    #[test]
    fn test_queen_attacks() {
        // 14 rook + 13 bishop
        assert_eq!(ATTACK_TABLES.queen_attacks(E4, 0).count_ones(), 27);
    }

    #[test]
    fn test_bitboard_iter() {
        let bb = A1.bb() | H1.bb() | H8.bb();
        let squares: Vec<Square> = BitboardIter(bb).collect();
        assert_eq!(squares, vec![A1, H1, H8]);
        assert_eq!(BitboardIter(bb).len(), 3);
    }

    #[test]
    fn test_square_colors() {
        assert_eq!(LIGHT_SQUARES & A1.bb(), 0);
        assert_ne!(LIGHT_SQUARES & B1.bb(), 0);
        assert_ne!(LIGHT_SQUARES & A2.bb(), 0);
        for sq in Square::ALL {
            assert_eq!(LIGHT_SQUARES & sq.bb() != 0, sq.is_light());
        }
    }

    #[test]
    fn test_line_algorithm_matches_classical() {
        let mut rng = StdRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);

        for sq in Square::ALL {
            for _ in 0..64 {
                let occupied = rng.gen::<u64>() & rng.gen::<u64>();
                assert_eq!(
                    ATTACK_TABLES.rook_attacks(sq, occupied),
                    rook_attacks_slow(sq, occupied),
                    "Rook mismatch at sq={sq}, occ={occupied:#x}"
                );
                assert_eq!(
                    ATTACK_TABLES.bishop_attacks(sq, occupied),
                    bishop_attacks_slow(sq, occupied),
                    "Bishop mismatch at sq={sq}, occ={occupied:#x}"
                );
            }
        }
    }
}
