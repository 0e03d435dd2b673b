//! Chess position state, move execution and rule enforcement on bitboards.
//!
//! The central type is [`Board`]: a mutable position that applies and reverts moves,
//! generates pseudo-legal and legal moves, and answers check, mate and draw queries.
//! Positions are identified by an incrementally maintained Zobrist hash.

pub mod bitboard;
pub mod board;
pub mod error;
pub mod legality;
pub mod movegen;
pub mod perft;
pub mod status;
pub mod types;
pub mod zobrist;

pub use board::{Board, BoardEvent, BoardListener, BoardOptions, STARTING_POSITION_FEN};
pub use error::{FenError, ParseError};
pub use types::{CastleRight, Color, File, Move, Piece, PieceType, Rank, Square, Status};
