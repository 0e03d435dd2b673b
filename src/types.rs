//! Geometry primitives: colors, piece types, pieces, files, ranks, squares,
//! castling rights and moves.
//!
//! Squares are indexed rank-major: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Parse the side-to-move field of a FEN string.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    #[inline(always)]
    pub const fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// The rank this side's king and rooks start on
    pub const fn back_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// The rank pawns of this side promote on
    pub const fn promotion_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Case-insensitive notation letter to piece type
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// A piece identity: side and type. Absence of a piece is `Option::None`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const WHITE_PAWN: Piece = Piece::new(Color::White, PieceType::Pawn);
    pub const WHITE_KNIGHT: Piece = Piece::new(Color::White, PieceType::Knight);
    pub const WHITE_BISHOP: Piece = Piece::new(Color::White, PieceType::Bishop);
    pub const WHITE_ROOK: Piece = Piece::new(Color::White, PieceType::Rook);
    pub const WHITE_QUEEN: Piece = Piece::new(Color::White, PieceType::Queen);
    pub const WHITE_KING: Piece = Piece::new(Color::White, PieceType::King);
    pub const BLACK_PAWN: Piece = Piece::new(Color::Black, PieceType::Pawn);
    pub const BLACK_KNIGHT: Piece = Piece::new(Color::Black, PieceType::Knight);
    pub const BLACK_BISHOP: Piece = Piece::new(Color::Black, PieceType::Bishop);
    pub const BLACK_ROOK: Piece = Piece::new(Color::Black, PieceType::Rook);
    pub const BLACK_QUEEN: Piece = Piece::new(Color::Black, PieceType::Queen);
    pub const BLACK_KING: Piece = Piece::new(Color::Black, PieceType::King);

    /// All twelve pieces, ordered by `index()`
    pub const ALL: [Piece; 12] = [
        Piece::WHITE_PAWN,
        Piece::WHITE_KNIGHT,
        Piece::WHITE_BISHOP,
        Piece::WHITE_ROOK,
        Piece::WHITE_QUEEN,
        Piece::WHITE_KING,
        Piece::BLACK_PAWN,
        Piece::BLACK_KNIGHT,
        Piece::BLACK_BISHOP,
        Piece::BLACK_ROOK,
        Piece::BLACK_QUEEN,
        Piece::BLACK_KING,
    ];

    #[inline(always)]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { color, piece_type }
    }

    /// Slot of this piece in per-piece tables (0..12)
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.color.index() * 6 + self.piece_type.index()
    }

    /// FEN letter: uppercase for white, lowercase for black
    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, piece_type))
    }

    pub fn to_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Figurine (unicode) notation symbol
    pub fn to_symbol(&self) -> &'static str {
        let is_white = self.color == Color::White;
        match self.piece_type {
            PieceType::Pawn => {
                if is_white {
                    "♙"
                } else {
                    "♟"
                }
            }
            PieceType::Rook => {
                if is_white {
                    "♖"
                } else {
                    "♜"
                }
            }
            PieceType::Knight => {
                if is_white {
                    "♘"
                } else {
                    "♞"
                }
            }
            PieceType::Bishop => {
                if is_white {
                    "♗"
                } else {
                    "♝"
                }
            }
            PieceType::Queen => {
                if is_white {
                    "♕"
                } else {
                    "♛"
                }
            }
            PieceType::King => {
                if is_white {
                    "♔"
                } else {
                    "♚"
                }
            }
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_char(c: char) -> Option<File> {
        match c {
            'a'..='h' => Some(File::ALL[(c as u8 - b'a') as usize]),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Rank {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_char(c: char) -> Option<Rank> {
        match c {
            '1'..='8' => Some(Rank::ALL[(c as u8 - b'1') as usize]),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

#[rustfmt::skip]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    #[rustfmt::skip]
    pub const ALL: [Square; 64] = {
        use Square::*;
        [
            A1, B1, C1, D1, E1, F1, G1, H1,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A8, B8, C8, D8, E8, F8, G8, H8,
        ]
    };

    /// Square for an index in 0..64. Panics on larger indices.
    #[inline(always)]
    pub const fn from_index(index: u8) -> Square {
        Square::ALL[index as usize]
    }

    pub const fn try_from_index(index: i32) -> Option<Square> {
        if index >= 0 && index < 64 {
            Some(Square::ALL[index as usize])
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square::ALL[rank.index() * 8 + file.index()]
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Bitboard with only this square set
    #[inline(always)]
    pub const fn bb(&self) -> u64 {
        1u64 << (*self as u8)
    }

    #[inline(always)]
    pub const fn file(&self) -> File {
        File::ALL[self.index() & 7]
    }

    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank::ALL[self.index() >> 3]
    }

    /// Light squares are those where file + rank is odd (a1 is dark)
    pub const fn is_light(&self) -> bool {
        (self.file().index() + self.rank().index()) % 2 == 1
    }

    /// The square one step toward the opponent for a pawn of `color`
    pub const fn forward(&self, color: Color) -> Option<Square> {
        match color {
            Color::White => Square::try_from_index(self.index() as i32 + 8),
            Color::Black => Square::try_from_index(self.index() as i32 - 8),
        }
    }

    pub fn from_algebraic(s: &str) -> Result<Square, ParseError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => match (File::from_char(f), Rank::from_char(r)) {
                (Some(file), Some(rank)) => Ok(Square::new(file, rank)),
                _ => Err(ParseError::Square(s.to_string())),
            },
            _ => Err(ParseError::Square(s.to_string())),
        }
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file().to_char(), self.rank().to_char())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().to_char(), self.rank().to_char())
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

/// Castling availability for one side.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CastleRight {
    None,
    KingSide,
    QueenSide,
    KingAndQueenSide,
}

impl CastleRight {
    pub const ALL: [CastleRight; 4] = [
        CastleRight::None,
        CastleRight::KingSide,
        CastleRight::QueenSide,
        CastleRight::KingAndQueenSide,
    ];

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub const fn from_flags(king_side: bool, queen_side: bool) -> CastleRight {
        match (king_side, queen_side) {
            (true, true) => CastleRight::KingAndQueenSide,
            (true, false) => CastleRight::KingSide,
            (false, true) => CastleRight::QueenSide,
            (false, false) => CastleRight::None,
        }
    }

    pub const fn has_king_side(&self) -> bool {
        matches!(self, CastleRight::KingSide | CastleRight::KingAndQueenSide)
    }

    pub const fn has_queen_side(&self) -> bool {
        matches!(self, CastleRight::QueenSide | CastleRight::KingAndQueenSide)
    }

    /// Whether this right covers the given flank (`KingSide` or `QueenSide`)
    pub const fn allows(&self, flank: CastleRight) -> bool {
        match flank {
            CastleRight::KingSide => self.has_king_side(),
            CastleRight::QueenSide => self.has_queen_side(),
            _ => false,
        }
    }

    pub const fn without_king_side(&self) -> CastleRight {
        CastleRight::from_flags(false, self.has_queen_side())
    }

    pub const fn without_queen_side(&self) -> CastleRight {
        CastleRight::from_flags(self.has_king_side(), false)
    }
}

/// A move from one square to another, with the piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Move {
    /// Placeholder recorded for null moves; from and to coincide.
    pub const NULL: Move = Move {
        from: Square::A1,
        to: Square::A1,
        promotion: None,
    };

    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn with_promotion(from: Square, to: Square, promotion: Piece) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    /// Parse coordinate notation such as `e2e4` or `e7e8q`.
    ///
    /// The promotion piece takes its color from the destination rank.
    pub fn from_uci(s: &str) -> Result<Move, ParseError> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ParseError::Move(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2]).map_err(|_| ParseError::Move(s.to_string()))?;
        let to = Square::from_algebraic(&s[2..4]).map_err(|_| ParseError::Move(s.to_string()))?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => {
                let piece_type = PieceType::from_char(c)
                    .filter(|pt| PIECES_CAN_PROMOTE_TO.contains(pt))
                    .ok_or_else(|| ParseError::Move(s.to_string()))?;
                let color = match to.rank() {
                    Rank::R8 => Color::White,
                    Rank::R1 => Color::Black,
                    _ => return Err(ParseError::Move(s.to_string())),
                };
                Some(Piece::new(color, piece_type))
            }
        };
        Ok(Move {
            from,
            to,
            promotion,
        })
    }

    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.piece_type.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// Contains the winning side
    Checkmate(Color),
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    InsufficientMaterial,
}
