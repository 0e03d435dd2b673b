use thiserror::Error;

/// Reasons a FEN string can be rejected by [`crate::board::Board::load_fen`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 4 to 6 space separated fields, found {0}")]
    FieldCount(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 squares: {text:?}")]
    BadRank { rank: usize, text: String },

    #[error("unknown piece symbol {0:?}")]
    UnknownPiece(char),

    #[error("invalid side to move {0:?}")]
    SideToMove(String),

    #[error("invalid castling availability {0:?}")]
    Castling(String),

    #[error("invalid en passant square {0:?}")]
    EnPassant(String),

    #[error("invalid {field} counter {value:?}")]
    Counter { field: &'static str, value: String },
}

/// Errors parsing coordinate text for squares and moves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square {0:?}")]
    Square(String),

    #[error("invalid move {0:?}")]
    Move(String),
}
