use crate::board::Color;
use crate::movegen::{CastleSide, Move};
use crate::piece::{Piece, PieceId};
use crate::position::EnPassant;
use crate::square::Square;

/// A piece taken off the board, kept so the capture can be reversed. For en
/// passant `square` differs from the capturing move's destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub piece: Piece,
    pub square: Square,
}

/// Everything needed to reverse a plain move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Capture>,
    pub first_move: bool,
    pub promoted: bool,
    pub double_step: bool,
    pub prev_turn: Color,
    pub prev_checks: [bool; 2],
    pub prev_en_passant: Option<EnPassant>,
}

/// Everything needed to reverse a castle. Both pieces were unmoved before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastleRecord {
    pub side: CastleSide,
    pub king: PieceId,
    pub rook: PieceId,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    pub prev_turn: Color,
    pub prev_checks: [bool; 2],
    pub prev_en_passant: Option<EnPassant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Move,
    Castle,
}

/// One entry of the turn log. Entries are pushed by `Position::make`,
/// popped by `Position::unmake` and never edited in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Move(MoveRecord),
    Castle(CastleRecord),
}

impl Turn {
    pub fn kind(&self) -> TurnKind {
        match self {
            Turn::Move(_) => TurnKind::Move,
            Turn::Castle(_) => TurnKind::Castle,
        }
    }

    pub fn mover(&self) -> Color {
        match self {
            Turn::Move(record) => record.piece.color(),
            Turn::Castle(record) => record.king.color(),
        }
    }

    pub fn as_move(&self) -> Move {
        match self {
            Turn::Move(record) => Move::step(record.from, record.to),
            Turn::Castle(record) => Move::Castle(record.side),
        }
    }

    pub fn captured(&self) -> Option<&Capture> {
        match self {
            Turn::Move(record) => record.captured.as_ref(),
            Turn::Castle(_) => None,
        }
    }
}
