use thiserror::Error;

use crate::attacks::is_square_attacked;
use crate::board::{Color, Kind};
use crate::movegen::{zone, CastleSide, Move};
use crate::piece::PieceId;
use crate::position::Position;
use crate::square::Square;

/// Why a move was refused. Messages are meant to be shown to a player
/// as they are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("origin and destination are the same square")]
    SameSquare,
    #[error("there is no piece on {0}")]
    Empty(Square),
    #[error("the piece on {0} belongs to {1}")]
    NotYours(Square, Color),
    #[error("kings cannot be captured")]
    KingCapture,
    #[error("a {kind} cannot move from {from} to {to}")]
    OutOfZone { kind: Kind, from: Square, to: Square },
    #[error("that move would leave the {0} king in check")]
    SelfCheck(Color),
    #[error("{0} has no king to castle with")]
    NoKing(Color),
    #[error("the king has already moved")]
    KingMoved,
    #[error("there is no {0} rook to castle with")]
    RookMissing(CastleSide),
    #[error("the {0} rook has already moved")]
    RookMoved(CastleSide),
    #[error("the king and the {0} rook are not lined up for castling")]
    CastleGeometry(CastleSide),
    #[error("{0} is between the king and the rook")]
    CastleBlocked(Square),
    #[error("cannot castle out of check")]
    CastleInCheck,
    #[error("the king would pass through or land on attacked {0}")]
    CastleThroughCheck(Square),
}

/// Where the king and rook start and end for one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CastlePlan {
    pub king: PieceId,
    pub rook: PieceId,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

impl Position {
    /// Whether `color` may play `mv` now. Probing a plain move makes and
    /// unmakes it, so the position is unchanged on return.
    pub fn check(&mut self, color: Color, mv: Move) -> Result<(), IllegalMove> {
        match mv {
            Move::Step { from, to } => self.check_step(color, from, to),
            Move::Castle(side) => self.check_castle(color, side),
        }
    }

    pub fn is_legal(&mut self, color: Color, mv: Move) -> bool {
        self.check(color, mv).is_ok()
    }

    pub fn check_step(&mut self, color: Color, from: Square, to: Square) -> Result<(), IllegalMove> {
        if from == to {
            return Err(IllegalMove::SameSquare);
        }
        let piece = self.piece_at(from).ok_or(IllegalMove::Empty(from))?;
        if piece.color != color {
            return Err(IllegalMove::NotYours(from, piece.color));
        }
        if self.piece_at(to).is_some_and(|target| target.kind == Kind::King) {
            return Err(IllegalMove::KingCapture);
        }
        if !zone(self, piece).contains(&to) {
            return Err(IllegalMove::OutOfZone {
                kind: piece.kind,
                from,
                to,
            });
        }

        // Try it, read the mover's check flag, take it back
        let mv = Move::step(from, to);
        self.make(color, mv);
        let exposed = self.in_check(color);
        self.unmake_checked(mv);

        if exposed {
            Err(IllegalMove::SelfCheck(color))
        } else {
            Ok(())
        }
    }

    pub fn check_castle(&self, color: Color, side: CastleSide) -> Result<(), IllegalMove> {
        let plan = self.castle_plan(color, side)?;
        let enemy = color.opposite();
        if is_square_attacked(self, plan.king_from, enemy) {
            return Err(IllegalMove::CastleInCheck);
        }
        for square in [plan.rook_to, plan.king_to] {
            if is_square_attacked(self, square, enemy) {
                return Err(IllegalMove::CastleThroughCheck(square));
            }
        }
        Ok(())
    }

    /// Castling preconditions that don't involve attacks: both pieces
    /// present and unmoved, on one rank, far enough apart, nothing between.
    pub(crate) fn castle_plan(&self, color: Color, side: CastleSide) -> Result<CastlePlan, IllegalMove> {
        let player = self.player(color);
        let king = player.king_piece().ok_or(IllegalMove::NoKing(color))?;
        if king.has_moved {
            return Err(IllegalMove::KingMoved);
        }
        let king_from = king.square.ok_or(IllegalMove::NoKing(color))?;

        let corner = Square::new(side.rook_file(), color.home_rank()).ok_or(IllegalMove::CastleGeometry(side))?;
        let rook = player
            .piece(PieceId::new(color, Kind::Rook, corner))
            .ok_or(IllegalMove::RookMissing(side))?;
        if rook.has_moved {
            return Err(IllegalMove::RookMoved(side));
        }
        let rook_from = rook.square.ok_or(IllegalMove::RookMissing(side))?;

        if rook_from.rank() != king_from.rank() || rook_from.file().abs_diff(king_from.file()) < 3 {
            return Err(IllegalMove::CastleGeometry(side));
        }
        let step: i8 = if rook_from.file() > king_from.file() { 1 } else { -1 };

        let mut current = king_from.offset(step, 0);
        while let Some(square) = current.filter(|&s| s != rook_from) {
            if !self.board().is_empty(square) {
                return Err(IllegalMove::CastleBlocked(square));
            }
            current = square.offset(step, 0);
        }

        let (Some(rook_to), Some(king_to)) = (king_from.offset(step, 0), king_from.offset(2 * step, 0)) else {
            return Err(IllegalMove::CastleGeometry(side));
        };

        Ok(CastlePlan {
            king: king.id,
            rook: rook.id,
            king_from,
            king_to,
            rook_from,
            rook_to,
        })
    }

    /// Every move `color` could legally play, plain moves in piece order
    /// followed by castles.
    pub fn legal_moves(&mut self, color: Color) -> Vec<Move> {
        let candidates = self.candidates(color);
        candidates
            .into_iter()
            .filter(|&mv| self.is_legal(color, mv))
            .collect()
    }

    pub fn has_legal_move(&mut self, color: Color) -> bool {
        let candidates = self.candidates(color);
        candidates.into_iter().any(|mv| self.is_legal(color, mv))
    }

    fn candidates(&self, color: Color) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .player(color)
            .pieces
            .values()
            .filter_map(|piece| piece.square.map(|from| (from, piece)))
            .flat_map(|(from, piece)| {
                zone(self, piece)
                    .into_iter()
                    .map(move |to| Move::step(from, to))
            })
            .collect();
        moves.push(Move::Castle(CastleSide::King));
        moves.push(Move::Castle(CastleSide::Queen));
        moves
    }
}

/// Count leaf positions `depth` plies below `position`, walking the tree
/// with make/unmake.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let color = position.turn();
    let moves = position.legal_moves(color);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        position.make(color, mv);
        nodes += perft(position, depth - 1);
        position.unmake_checked(mv);
    }
    nodes
}
