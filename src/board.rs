//! Position state and the move executor.
//!
//! A [`Board`] keeps three synchronized views of the pieces (one bitboard per piece,
//! one per color, and a square to piece lookup) plus the rule state needed to continue
//! the game. Every change to the pieces goes through [`Board::set_piece`] and
//! [`Board::unset_piece`], which also fold the change into the running Zobrist hash.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::bitboard::bit_scan_forward;
use crate::error::FenError;
use crate::types::{CastleRight, Color, File, Move, Piece, PieceType, Rank, Square};
use crate::zobrist::ZOBRIST_KEYS;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    /// Record the hash of every position reached. Repetition detection needs it.
    pub track_history: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        BoardOptions {
            track_history: true,
        }
    }
}

/// Information needed to take back one move or null move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoInfo {
    /// The move that was made, `Move::NULL` for a null move
    pub mv: Move,
    /// The piece that moved, `None` for a null move
    pub moving_piece: Option<Piece>,
    /// Captured piece and the square it stood on (differs from the destination en passant)
    pub captured: Option<(Piece, Square)>,
    /// Flank the king castled to, if the move was a castle
    pub castle: Option<CastleRight>,
    pub side_to_move: Color,
    pub castle_rights: [CastleRight; 2],
    pub en_passant_target: Option<Square>,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Previous Zobrist hash
    pub zobrist_hash: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A move was executed
    Move(Move),
    /// A move was taken back
    Undo(Move),
    /// A position was loaded from FEN
    Load,
}

/// Observer of board mutations.
///
/// Listeners are called synchronously after the mutation completed, in registration order.
pub trait BoardListener: Send + Sync {
    fn on_event(&self, event: &BoardEvent, board: &Board);
}

impl<F> BoardListener for F
where
    F: Fn(&BoardEvent, &Board) + Send + Sync,
{
    fn on_event(&self, event: &BoardEvent, board: &Board) {
        self(event, board)
    }
}

/// Squares involved in castling to one flank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleSquares {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook, all of which must be empty
    pub path: u64,
    /// Squares the king crosses or lands on, none of which may be attacked
    pub transit: u64,
}

/// Castling geometry for `color` on `flank`, which is `KingSide` or `QueenSide`
pub const fn castle_squares(color: Color, flank: CastleRight) -> CastleSquares {
    let rank = color.back_rank();
    let b = Square::new(File::B, rank);
    let c = Square::new(File::C, rank);
    let d = Square::new(File::D, rank);
    let f = Square::new(File::F, rank);
    let g = Square::new(File::G, rank);
    match flank {
        CastleRight::KingSide => CastleSquares {
            king_from: Square::new(File::E, rank),
            king_to: g,
            rook_from: Square::new(File::H, rank),
            rook_to: f,
            path: f.bb() | g.bb(),
            transit: f.bb() | g.bb(),
        },
        _ => CastleSquares {
            king_from: Square::new(File::E, rank),
            king_to: c,
            rook_from: Square::new(File::A, rank),
            rook_to: d,
            path: b.bb() | c.bb() | d.bb(),
            transit: c.bb() | d.bb(),
        },
    }
}

pub struct Board {
    pub(crate) piece_bb: [u64; 12],
    pub(crate) color_bb: [u64; 2],
    pub(crate) occupation: [Option<Piece>; 64],
    // who's move it is
    pub(crate) side_to_move: Color,
    pub(crate) castle_rights: [CastleRight; 2],
    // square a capturing pawn lands on
    pub(crate) en_passant_target: Option<Square>,
    // square of the pawn that can be captured; only set when the capture is legal
    pub(crate) en_passant: Option<Square>,
    // number of half moves since last capture or pawn advance
    pub(crate) halfmove_clock: u32,
    // starts at 1, and gets incremented after every black move
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) options: BoardOptions,
    pub(crate) history: Vec<u64>,
    pub(crate) undo_stack: Vec<UndoInfo>,
    listeners: Vec<Arc<dyn BoardListener>>,
}

impl Board {
    /// The standard starting position
    pub fn new() -> Board {
        Board::from_fen(STARTING_POSITION_FEN).expect("starting position FEN is valid")
    }

    /// A board with no pieces, white to move
    pub fn empty() -> Board {
        Board::with_options(BoardOptions::default())
    }

    pub fn with_options(options: BoardOptions) -> Board {
        let mut board = Board {
            piece_bb: [0; 12],
            color_bb: [0; 2],
            occupation: [None; 64],
            side_to_move: Color::White,
            castle_rights: [CastleRight::None; 2],
            en_passant_target: None,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            options,
            history: Vec::new(),
            undo_stack: Vec::new(),
            listeners: Vec::new(),
        };
        board.clear();
        board
    }

    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::empty();
        board.load_fen(fen)?;
        Ok(board)
    }

    /// Remove all pieces and reset the rule state. Listeners and options are kept.
    pub fn clear(&mut self) {
        self.piece_bb = [0; 12];
        self.color_bb = [0; 2];
        self.occupation = [None; 64];
        self.side_to_move = Color::White;
        self.castle_rights = [CastleRight::None; 2];
        self.en_passant_target = None;
        self.en_passant = None;
        self.halfmove_clock = 0;
        self.fullmove_number = 1;
        self.hash = ZOBRIST_KEYS.full_hash(self);
        self.undo_stack.clear();
        self.history.clear();
        if self.options.track_history {
            self.history.push(self.hash);
        }
    }

    // ------------------------------------------------------------------
    // Accessors

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.occupation[sq.index()]
    }

    #[inline(always)]
    pub fn piece_bb(&self, piece: Piece) -> u64 {
        self.piece_bb[piece.index()]
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, piece_type: PieceType) -> u64 {
        self.piece_bb[Piece::new(color, piece_type).index()]
    }

    #[inline(always)]
    pub fn color_bb(&self, color: Color) -> u64 {
        self.color_bb[color.index()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> u64 {
        self.color_bb[0] | self.color_bb[1]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castle_right(&self, color: Color) -> CastleRight {
        self.castle_rights[color.index()]
    }

    /// Square a pawn would land on when capturing en passant. Set after every double
    /// step, even when no capture is possible.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Square of the pawn that can legally be captured en passant right now
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn options(&self) -> BoardOptions {
        self.options
    }

    /// Hashes of all positions since the last load, current position last
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Number of moves that can be taken back
    pub fn undo_stack_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.undo_stack.last().map(|u| u.mv)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces(color, PieceType::King);
        if kings == 0 {
            None
        } else {
            Some(Square::from_index(bit_scan_forward(kings)))
        }
    }

    /// The running hash, updated with every mutation
    #[inline(always)]
    pub fn incremental_hash_key(&self) -> u64 {
        self.hash
    }

    /// The hash recomputed from scratch
    pub fn zobrist_key(&self) -> u64 {
        ZOBRIST_KEYS.full_hash(self)
    }

    // ------------------------------------------------------------------
    // Mutation primitives

    /// Place `piece` on an empty square
    pub fn set_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(
            self.occupation[sq.index()].is_none(),
            "{sq} is already occupied"
        );
        let bb = sq.bb();
        self.piece_bb[piece.index()] |= bb;
        self.color_bb[piece.color.index()] |= bb;
        self.occupation[sq.index()] = Some(piece);
        self.hash ^= ZOBRIST_KEYS.piece_key(piece, sq);
    }

    /// Remove `piece` from the square it stands on
    pub fn unset_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert_eq!(self.occupation[sq.index()], Some(piece));
        let bb = sq.bb();
        self.piece_bb[piece.index()] &= !bb;
        self.color_bb[piece.color.index()] &= !bb;
        self.occupation[sq.index()] = None;
        self.hash ^= ZOBRIST_KEYS.piece_key(piece, sq);
    }

    fn set_castle_right(&mut self, color: Color, right: CastleRight) {
        let keys = &*ZOBRIST_KEYS;
        self.hash ^= keys.castle_key(color, self.castle_rights[color.index()]);
        self.castle_rights[color.index()] = right;
        self.hash ^= keys.castle_key(color, right);
    }

    /// Rights of `color` once its rook on `sq` has moved or been captured
    fn rights_without_rook_on(&self, color: Color, sq: Square) -> CastleRight {
        let rights = self.castle_rights[color.index()];
        let back_rank = color.back_rank();
        if sq == Square::new(File::H, back_rank) {
            rights.without_king_side()
        } else if sq == Square::new(File::A, back_rank) {
            rights.without_queen_side()
        } else {
            rights
        }
    }

    // ------------------------------------------------------------------
    // FEN

    /// Replace the position with the one described by `fen`.
    ///
    /// On error the board is left cleared.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.clear();
        if let Err(e) = self.parse_fen(fen) {
            debug!(fen, error = %e, "rejected FEN");
            self.clear();
            return Err(e);
        }

        self.hash = ZOBRIST_KEYS.full_hash(self);
        self.history.clear();
        if self.options.track_history {
            self.history.push(self.hash);
        }
        debug_assert!(self.is_consistent());
        debug!(fen, hash = self.hash, "loaded position");

        self.notify(BoardEvent::Load);
        Ok(())
    }

    fn parse_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (i, text) in ranks.iter().enumerate() {
            let rank = Rank::ALL[7 - i];
            let bad_rank = || FenError::BadRank {
                rank: 8 - i,
                text: text.to_string(),
            };
            let mut file = 0usize;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 {
                        return Err(bad_rank());
                    }
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::UnknownPiece(c))?;
                    if file >= 8 {
                        return Err(bad_rank());
                    }
                    self.set_piece(piece, Square::new(File::ALL[file], rank));
                    file += 1;
                }
                if file > 8 {
                    return Err(bad_rank());
                }
            }
            if file != 8 {
                return Err(bad_rank());
            }
        }

        self.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if fields[2] != "-" {
            // K, Q, k, q
            let mut flags = [false; 4];
            for c in fields[2].chars() {
                let i = match c {
                    'K' => 0,
                    'Q' => 1,
                    'k' => 2,
                    'q' => 3,
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                };
                if flags[i] {
                    return Err(FenError::Castling(fields[2].to_string()));
                }
                flags[i] = true;
            }
            self.castle_rights = [
                CastleRight::from_flags(flags[0], flags[1]),
                CastleRight::from_flags(flags[2], flags[3]),
            ];
        }

        if fields[3] != "-" {
            let bad_ep = || FenError::EnPassant(fields[3].to_string());
            let target = Square::from_algebraic(fields[3]).map_err(|_| bad_ep())?;
            let expected_rank = match self.side_to_move {
                Color::White => Rank::R6,
                Color::Black => Rank::R3,
            };
            if target.rank() != expected_rank {
                return Err(bad_ep());
            }
            let pawn_sq = target
                .forward(self.side_to_move.other_color())
                .ok_or_else(bad_ep)?;
            self.en_passant_target = Some(target);
            if self.en_passant_capturable(self.side_to_move, target, pawn_sq) {
                self.en_passant = Some(pawn_sq);
            }
        }

        self.halfmove_clock = parse_counter(fields.get(4), "halfmove", 0)?;
        self.fullmove_number = parse_counter(fields.get(5), "fullmove", 1)?;
        Ok(())
    }

    /// Serialize the position.
    ///
    /// With `only_en_passant_if_capturable` the en passant square is written only when
    /// a pawn can legally take en passant; otherwise it is written after every double step.
    pub fn to_fen(&self, include_counters: bool, only_en_passant_if_capturable: bool) -> String {
        let placement = Rank::ALL
            .iter()
            .rev()
            .map(|&rank| {
                let mut row = String::new();
                let mut empty = 0;
                for file in File::ALL {
                    match self.piece_at(Square::new(file, rank)) {
                        Some(piece) => {
                            if empty > 0 {
                                row.push_str(&empty.to_string());
                                empty = 0;
                            }
                            row.push(piece.to_char());
                        }
                        None => empty += 1,
                    }
                }
                if empty > 0 {
                    row.push_str(&empty.to_string());
                }
                row
            })
            .join("/");

        let white = self.castle_right(Color::White);
        let black = self.castle_right(Color::Black);
        let castling: String = [
            (white.has_king_side(), 'K'),
            (white.has_queen_side(), 'Q'),
            (black.has_king_side(), 'k'),
            (black.has_queen_side(), 'q'),
        ]
        .iter()
        .filter(|(held, _)| *held)
        .map(|(_, c)| *c)
        .collect();
        let castling = if castling.is_empty() {
            "-".to_string()
        } else {
            castling
        };

        let en_passant = match self.en_passant_target {
            Some(target) if !only_en_passant_if_capturable || self.en_passant.is_some() => {
                target.to_string()
            }
            _ => "-".to_string(),
        };

        let mut fen = format!(
            "{} {} {} {}",
            placement,
            self.side_to_move.to_char(),
            castling,
            en_passant
        );
        if include_counters {
            fen = format!("{} {} {}", fen, self.halfmove_clock, self.fullmove_number);
        }
        fen
    }

    // ------------------------------------------------------------------
    // Move execution

    /// Flank of a castle if `mv` by `piece` is one: the king moves two files from its
    /// home square, the right is held and the rook is in place.
    pub(crate) fn castle_flank(&self, mv: Move, piece: Piece) -> Option<CastleRight> {
        if piece.piece_type != PieceType::King {
            return None;
        }
        let color = piece.color;
        [CastleRight::KingSide, CastleRight::QueenSide]
            .into_iter()
            .find(|&flank| {
                let cs = castle_squares(color, flank);
                mv.from == cs.king_from
                    && mv.to == cs.king_to
                    && self.castle_right(color).allows(flank)
                    && self.piece_at(cs.rook_from) == Some(Piece::new(color, PieceType::Rook))
            })
    }

    /// Square of the pawn removed by `mv` if it is an en passant capture
    pub(crate) fn en_passant_capture_square(&self, mv: Move) -> Option<Square> {
        match (self.en_passant_target, self.en_passant) {
            (Some(target), Some(pawn_sq)) if target == mv.to => Some(pawn_sq),
            _ => None,
        }
    }

    /// Execute `mv`, returning false without touching the board if it is rejected.
    ///
    /// Without `full_validation` the move is trusted to be pseudo-legal; moving from an
    /// empty square is then a no-op that returns false.
    ///
    /// # Panics
    ///
    /// With `full_validation`, if the origin square is empty.
    pub fn do_move(&mut self, mv: Move, full_validation: bool) -> bool {
        if full_validation && !self.is_move_legal(mv, true) {
            trace!(%mv, "rejected illegal move");
            return false;
        }
        let Some(moving_piece) = self.piece_at(mv.from) else {
            trace!(%mv, "no piece on origin square");
            return false;
        };

        let keys = &*ZOBRIST_KEYS;
        let side = self.side_to_move;
        let other = side.other_color();
        let is_pawn = moving_piece.piece_type == PieceType::Pawn;

        let castle = self.castle_flank(mv, moving_piece);
        let captured = match (castle, is_pawn) {
            (Some(_), _) => None,
            (None, true) => match self.en_passant_capture_square(mv) {
                Some(sq) => self.piece_at(sq).map(|p| (p, sq)),
                None => self.piece_at(mv.to).map(|p| (p, mv.to)),
            },
            (None, false) => self.piece_at(mv.to).map(|p| (p, mv.to)),
        };

        self.undo_stack.push(UndoInfo {
            mv,
            moving_piece: Some(moving_piece),
            captured,
            castle,
            side_to_move: side,
            castle_rights: self.castle_rights,
            en_passant_target: self.en_passant_target,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist_hash: self.hash,
        });

        self.hash ^= keys.side_key(side);
        if let Some(sq) = self.en_passant {
            self.hash ^= keys.en_passant_key(sq.file());
        }
        self.en_passant = None;
        self.en_passant_target = None;

        match moving_piece.piece_type {
            PieceType::King => {
                if let Some(flank) = castle {
                    let cs = castle_squares(side, flank);
                    let rook = Piece::new(side, PieceType::Rook);
                    self.unset_piece(rook, cs.rook_from);
                    self.set_piece(rook, cs.rook_to);
                }
                if self.castle_right(side) != CastleRight::None {
                    self.set_castle_right(side, CastleRight::None);
                }
            }
            PieceType::Rook => {
                let narrowed = self.rights_without_rook_on(side, mv.from);
                if narrowed != self.castle_right(side) {
                    self.set_castle_right(side, narrowed);
                }
            }
            _ => {}
        }
        if let Some((piece, sq)) = captured {
            if piece.piece_type == PieceType::Rook {
                let narrowed = self.rights_without_rook_on(other, sq);
                if narrowed != self.castle_right(other) {
                    self.set_castle_right(other, narrowed);
                }
            }
        }

        if let Some((piece, sq)) = captured {
            self.unset_piece(piece, sq);
        }
        self.unset_piece(moving_piece, mv.from);
        let placed = match mv.promotion {
            Some(promoted) if is_pawn => promoted,
            _ => moving_piece,
        };
        self.set_piece(placed, mv.to);

        if captured.is_some() || is_pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if side == Color::Black {
            self.fullmove_number += 1;
        }

        if is_pawn && mv.from.rank().index().abs_diff(mv.to.rank().index()) == 2 {
            let target = Square::from_index(((mv.from.index() + mv.to.index()) / 2) as u8);
            self.en_passant_target = Some(target);
            if self.en_passant_capturable(other, target, mv.to) {
                self.en_passant = Some(mv.to);
                self.hash ^= keys.en_passant_key(mv.to.file());
            }
        }

        self.side_to_move = other;
        self.hash ^= keys.side_key(other);
        if self.options.track_history {
            self.history.push(self.hash);
        }
        debug_assert_eq!(self.hash, self.zobrist_key(), "hash out of sync after {mv}");
        trace!(%mv, hash = self.hash, "move");

        self.notify(BoardEvent::Move(mv));
        true
    }

    /// Pass the turn without moving a piece
    pub fn do_null_move(&mut self) {
        let keys = &*ZOBRIST_KEYS;
        let side = self.side_to_move;

        self.undo_stack.push(UndoInfo {
            mv: Move::NULL,
            moving_piece: None,
            captured: None,
            castle: None,
            side_to_move: side,
            castle_rights: self.castle_rights,
            en_passant_target: self.en_passant_target,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist_hash: self.hash,
        });

        self.hash ^= keys.side_key(side);
        if let Some(sq) = self.en_passant {
            self.hash ^= keys.en_passant_key(sq.file());
        }
        self.en_passant = None;
        self.en_passant_target = None;

        self.halfmove_clock += 1;
        if side == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = side.other_color();
        self.hash ^= keys.side_key(self.side_to_move);
        if self.options.track_history {
            self.history.push(self.hash);
        }
        debug_assert_eq!(self.hash, self.zobrist_key());
        trace!(hash = self.hash, "null move");
    }

    /// Take back the last move or null move and return it.
    ///
    /// # Panics
    ///
    /// If there is nothing to take back.
    pub fn undo_move(&mut self) -> Move {
        let Some(undo) = self.undo_stack.pop() else {
            panic!("undo_move called with no move to take back");
        };
        let mv = undo.mv;

        if let Some(piece) = undo.moving_piece {
            if let Some(placed) = self.piece_at(mv.to) {
                self.unset_piece(placed, mv.to);
            }
            self.set_piece(piece, mv.from);
            if let Some(flank) = undo.castle {
                let cs = castle_squares(piece.color, flank);
                let rook = Piece::new(piece.color, PieceType::Rook);
                self.unset_piece(rook, cs.rook_to);
                self.set_piece(rook, cs.rook_from);
            }
            if let Some((captured, sq)) = undo.captured {
                self.set_piece(captured, sq);
            }
        }

        self.side_to_move = undo.side_to_move;
        self.castle_rights = undo.castle_rights;
        self.en_passant_target = undo.en_passant_target;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.zobrist_hash;
        if self.options.track_history {
            self.history.pop();
        }
        debug_assert_eq!(self.hash, self.zobrist_key(), "hash out of sync undoing {mv}");
        debug!(%mv, hash = self.hash, "undo");

        self.notify(BoardEvent::Undo(mv));
        mv
    }

    // ------------------------------------------------------------------
    // Listeners

    pub fn add_listener(&mut self, listener: Arc<dyn BoardListener>) {
        self.listeners.push(listener);
    }

    /// Unregister a listener previously passed to `add_listener`. Returns whether it was found.
    pub fn remove_listener(&mut self, listener: &Arc<dyn BoardListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    fn notify(&self, event: BoardEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let listeners = self.listeners.clone();
        for listener in listeners.iter() {
            listener.on_event(&event, self);
        }
    }

    // ------------------------------------------------------------------
    // Debugging

    /// Check that bitboards and the square lookup agree
    pub fn is_consistent(&self) -> bool {
        let mut union = 0u64;
        for piece in Piece::ALL {
            let bb = self.piece_bb(piece);
            if union & bb != 0 {
                return false;
            }
            union |= bb;
        }
        if union != self.occupied() || self.color_bb[0] & self.color_bb[1] != 0 {
            return false;
        }
        Square::ALL.iter().all(|&sq| match self.occupation[sq.index()] {
            Some(piece) => self.piece_bb(piece) & sq.bb() != 0,
            None => union & sq.bb() == 0,
        })
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::new();

        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL {
                let symbol = match self.piece_at(Square::new(file, *rank)) {
                    Some(piece) => piece.to_symbol(),
                    None => ".",
                };
                string.push(' ');
                string.push_str(symbol);
            }
            string.push('\n');
        }
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

fn parse_counter(field: Option<&&str>, name: &'static str, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::Counter {
            field: name,
            value: text.to_string(),
        }),
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Clone for Board {
    /// Deep copy of the position, history and undo stack. Listeners are not copied.
    fn clone(&self) -> Self {
        Board {
            piece_bb: self.piece_bb,
            color_bb: self.color_bb,
            occupation: self.occupation,
            side_to_move: self.side_to_move,
            castle_rights: self.castle_rights,
            en_passant_target: self.en_passant_target,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            options: self.options,
            history: self.history.clone(),
            undo_stack: self.undo_stack.clone(),
            listeners: Vec::new(),
        }
    }
}

impl PartialEq for Board {
    /// Positions are equal when pieces and rule state match; history is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.piece_bb == other.piece_bb
            && self.color_bb == other.color_bb
            && self.occupation == other.occupation
            && self.side_to_move == other.side_to_move
            && self.castle_rights == other.castle_rights
            && self.en_passant_target == other.en_passant_target
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.hash == other.hash
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen(true, true))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen(true, false))
            .field("hash", &format!("{:#018x}", self.hash))
            .field("undo_stack_len", &self.undo_stack.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
