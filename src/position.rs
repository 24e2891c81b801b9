use std::fmt;

use tracing::trace;

use crate::attacks;
use crate::board::{Board, Color, Kind};
use crate::movegen::{pawn_rank, CastleSide, Move};
use crate::piece::{Piece, PieceId};
use crate::player::Player;
use crate::square::Square;
use crate::turn::{Capture, CastleRecord, MoveRecord, Turn};

const BACK_RANK: [Kind; 8] = [
    Kind::Rook,
    Kind::Knight,
    Kind::Bishop,
    Kind::Queen,
    Kind::King,
    Kind::Bishop,
    Kind::Knight,
    Kind::Rook,
];

/// The pawn that double-stepped on the previous turn, capturable en passant
/// by an enemy pawn standing beside it for exactly one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    pub pawn: PieceId,
    pub square: Square,
}

/// The whole mutable game arena: board, both players, side to move, en
/// passant state and the turn log that makes every change reversible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    players: [Player; 2],
    turn: Color,
    en_passant: Option<EnPassant>,
    history: Vec<Turn>,
}

impl Position {
    /// An empty board with `turn` to move.
    pub fn empty(turn: Color) -> Self {
        Self {
            board: Board::new(),
            players: [Player::new(Color::White), Player::new(Color::Black)],
            turn,
            en_passant: None,
            history: Vec::new(),
        }
    }

    /// The standard 32-piece starting position, white to move.
    pub fn standard() -> Self {
        let mut position = Self::empty(Color::White);
        for color in Color::BOTH {
            for file in 1..=8 {
                let kind = BACK_RANK[(file - 1) as usize];
                for (kind, rank) in [(kind, color.home_rank()), (Kind::Pawn, pawn_rank(color))] {
                    if let Some(origin) = Square::new(file, rank) {
                        position.add_piece(Piece::new(PieceId::new(color, kind, origin)));
                    }
                }
            }
        }
        position.refresh_checks();
        position
    }

    /// Place a new piece on the square its id names.
    pub(crate) fn add_piece(&mut self, piece: Piece) {
        let Some(square) = piece.square else {
            panic!("{} added without a square", piece.id);
        };
        let displaced = self.board.place(square, piece.id);
        assert!(displaced.is_none(), "{} added onto occupied {}", piece.id, square);
        self.players[piece.color.index()].adopt(piece);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.player(id.color()).piece(id)
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.get(square).and_then(|id| self.piece(id))
    }

    pub fn glyph_at(&self, square: Square) -> Option<char> {
        self.piece_at(square).map(Piece::glyph)
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.player(color).in_check
    }

    fn checks(&self) -> [bool; 2] {
        [self.players[0].in_check, self.players[1].in_check]
    }

    pub(crate) fn refresh_checks(&mut self) {
        let white = attacks::is_king_in_check(self, Color::White);
        let black = attacks::is_king_in_check(self, Color::Black);
        self.players[0].in_check = white;
        self.players[1].in_check = black;
    }

    /// Apply `mv` for `color` without checking legality, pushing a turn log
    /// entry. Callers must only pass moves the legality layer accepted, or
    /// undo immediately (as the legality check does).
    pub fn make(&mut self, color: Color, mv: Move) {
        match mv {
            Move::Step { from, to } => self.make_step(color, from, to),
            Move::Castle(side) => self.make_castle(color, side),
        }
    }

    fn make_step(&mut self, color: Color, from: Square, to: Square) {
        let Some(id) = self.board.get(from) else {
            panic!("no piece on {} to move", from);
        };
        assert_eq!(id.color(), color, "{} moved out of turn", id);
        let kind = self.players[color.index()].piece_mut(id).kind;

        // A pawn stepping diagonally onto an empty square takes en passant
        let en_passant = kind == Kind::Pawn && from.file() != to.file() && self.board.is_empty(to);
        let victim_square = if en_passant { to.with_rank(from.rank()) } else { to };
        let victim = if en_passant {
            let Some(victim) = self.board.take(victim_square) else {
                panic!("en passant from {} to {} without a victim", from, to);
            };
            Some(victim)
        } else {
            self.board.get(to)
        };
        let captured = victim.map(|victim| {
            assert_ne!(victim.color(), color, "{} captures its own {}", id, victim);
            Capture {
                piece: self.players[victim.color().index()].release(victim),
                square: victim_square,
            }
        });

        self.board.take(from);
        self.board.place(to, id);

        let piece = self.players[color.index()].piece_mut(id);
        piece.square = Some(to);
        let promoted = piece.kind == Kind::Pawn && to.rank() == color.last_rank();
        if promoted {
            piece.kind = Kind::Queen;
        }
        let first_move = !piece.has_moved;
        piece.has_moved = true;

        let double_step = kind == Kind::Pawn && from.rank().abs_diff(to.rank()) == 2;
        let prev_en_passant = self.en_passant.take();
        if double_step {
            self.en_passant = Some(EnPassant { pawn: id, square: to });
        }

        let prev_checks = self.checks();
        let prev_turn = self.turn;
        self.refresh_checks();
        self.turn = color.opposite();

        trace!(piece = %id, %from, %to, captured = captured.is_some(), promoted, "made move");
        self.history.push(Turn::Move(MoveRecord {
            piece: id,
            from,
            to,
            captured,
            first_move,
            promoted,
            double_step,
            prev_turn,
            prev_checks,
            prev_en_passant,
        }));
    }

    fn make_castle(&mut self, color: Color, side: CastleSide) {
        let plan = match self.castle_plan(color, side) {
            Ok(plan) => plan,
            Err(reason) => panic!("castle executed while illegal: {}", reason),
        };

        self.board.take(plan.king_from);
        self.board.take(plan.rook_from);
        self.board.place(plan.king_to, plan.king);
        self.board.place(plan.rook_to, plan.rook);
        for (id, square) in [(plan.king, plan.king_to), (plan.rook, plan.rook_to)] {
            let piece = self.players[color.index()].piece_mut(id);
            piece.square = Some(square);
            piece.has_moved = true;
        }

        let prev_en_passant = self.en_passant.take();
        let prev_checks = self.checks();
        let prev_turn = self.turn;
        self.refresh_checks();
        self.turn = color.opposite();

        trace!(%color, %side, "made castle");
        self.history.push(Turn::Castle(CastleRecord {
            side,
            king: plan.king,
            rook: plan.rook,
            king_from: plan.king_from,
            king_to: plan.king_to,
            rook_from: plan.rook_from,
            rook_to: plan.rook_to,
            prev_turn,
            prev_checks,
            prev_en_passant,
        }));
    }

    /// Pop the newest log entry and restore the position it was made from.
    /// Panics on an empty log.
    pub fn unmake(&mut self) -> Turn {
        let Some(turn) = self.history.pop() else {
            panic!("unmake called with an empty turn log");
        };
        match &turn {
            Turn::Move(record) => self.undo_step(record),
            Turn::Castle(record) => self.undo_castle(record),
        }
        turn
    }

    /// Unmake, asserting the newest entry is `mv`.
    pub fn unmake_checked(&mut self, mv: Move) -> Turn {
        match self.history.last() {
            Some(turn) if turn.as_move() == mv => {}
            Some(turn) => panic!("expected to unmake {} but the log holds {}", mv, turn.as_move()),
            None => panic!("expected to unmake {} but the turn log is empty", mv),
        }
        self.unmake()
    }

    fn undo_step(&mut self, record: &MoveRecord) {
        let color = record.piece.color();
        let moved = self.board.take(record.to);
        assert_eq!(moved, Some(record.piece), "turn log out of sync at {}", record.to);
        let displaced = self.board.place(record.from, record.piece);
        assert!(displaced.is_none(), "turn log out of sync at {}", record.from);

        let piece = self.players[color.index()].piece_mut(record.piece);
        piece.square = Some(record.from);
        if record.promoted {
            piece.kind = Kind::Pawn;
        }
        if record.first_move {
            piece.has_moved = false;
        }

        if let Some(capture) = &record.captured {
            let mut victim = capture.piece.clone();
            victim.square = Some(capture.square);
            let displaced = self.board.place(capture.square, victim.id);
            assert!(displaced.is_none(), "captured {} restored onto occupied {}", victim.id, capture.square);
            self.players[victim.color.index()].adopt(victim);
        }

        if record.double_step {
            assert_eq!(
                self.en_passant.map(|ep| ep.pawn),
                Some(record.piece),
                "en passant state out of sync with {}",
                record.piece
            );
        }
        self.restore(record.prev_turn, record.prev_checks, record.prev_en_passant);
    }

    fn undo_castle(&mut self, record: &CastleRecord) {
        let color = record.king.color();
        assert_eq!(self.board.take(record.king_to), Some(record.king), "turn log out of sync at {}", record.king_to);
        assert_eq!(self.board.take(record.rook_to), Some(record.rook), "turn log out of sync at {}", record.rook_to);
        self.board.place(record.king_from, record.king);
        self.board.place(record.rook_from, record.rook);
        for (id, square) in [(record.king, record.king_from), (record.rook, record.rook_from)] {
            let piece = self.players[color.index()].piece_mut(id);
            piece.square = Some(square);
            piece.has_moved = false;
        }

        self.restore(record.prev_turn, record.prev_checks, record.prev_en_passant);
    }

    fn restore(&mut self, turn: Color, checks: [bool; 2], en_passant: Option<EnPassant>) {
        self.turn = turn;
        self.players[0].in_check = checks[0];
        self.players[1].in_check = checks[1];
        self.en_passant = en_passant;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (1..=8).rev() {
            write!(f, "{} ", rank)?;
            for file in 1..=8 {
                let glyph = Square::new(file, rank)
                    .and_then(|square| self.glyph_at(square))
                    .unwrap_or('·');
                write!(f, " {}", glyph)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   A B C D E F G H")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::Setup;
    use crate::turn::TurnKind;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_setup() {
        let position = Position::standard();
        assert_eq!(position.player(Color::White).pieces.len(), 16);
        assert_eq!(position.player(Color::Black).pieces.len(), 16);
        assert_eq!(position.piece_at(sq("D1")).unwrap().kind, Kind::Queen);
        assert_eq!(position.piece_at(sq("E8")).unwrap().kind, Kind::King);
        assert_eq!(position.player(Color::Black).king_square(), Some(sq("E8")));
        assert_eq!(position.piece_at(sq("A1")).unwrap().id.to_string(), "R-A1");
        assert_eq!(position.turn(), Color::White);
        assert!(position.history().is_empty());
    }

    #[test]
    fn test_board_and_pieces_agree() {
        let position = Position::standard();
        for (square, id) in position.board().occupied() {
            assert_eq!(position.piece(id).unwrap().square, Some(square));
        }
    }

    #[test]
    fn test_plain_move_and_unmake() {
        let mut position = Position::standard();
        let before = position.clone();

        position.make(Color::White, Move::step(sq("G1"), sq("F3")));
        let knight = position.piece_at(sq("F3")).unwrap();
        assert_eq!(knight.id.to_string(), "N-G1");
        assert!(knight.has_moved);
        assert!(position.board().is_empty(sq("G1")));
        assert_eq!(position.turn(), Color::Black);

        position.unmake_checked(Move::step(sq("G1"), sq("F3")));
        assert_eq!(position, before);
    }

    #[test]
    fn test_capture_removes_and_restores_victim() {
        let mut position = Setup::new()
            .white(["R-A1", "K-E1"])
            .black(["N-A6", "K-E8"])
            .build()
            .unwrap();
        let before = position.clone();

        position.make(Color::White, Move::step(sq("A1"), sq("A6")));
        assert_eq!(position.player(Color::Black).pieces.len(), 1);
        let capture = position.history()[0].captured().unwrap();
        assert_eq!(capture.piece.id.to_string(), "N-A6");
        assert_eq!(capture.piece.square, None);
        assert_eq!(capture.square, sq("A6"));

        position.unmake();
        assert_eq!(position, before);
    }

    #[test]
    fn test_en_passant_capture_removes_pawn_beside() {
        let mut position = Setup::new()
            .white(["P-E5", "K-E1"])
            .black(["P-D7", "K-E8"])
            .turn(Color::Black)
            .build()
            .unwrap();
        position.make(Color::Black, Move::step(sq("D7"), sq("D5")));
        assert_eq!(position.en_passant().map(|ep| ep.square), Some(sq("D5")));
        let before = position.clone();

        position.make(Color::White, Move::step(sq("E5"), sq("D6")));
        assert!(position.board().is_empty(sq("D5")));
        assert!(position.player(Color::Black).count(Kind::Pawn) == 0);
        assert_eq!(position.history()[1].captured().unwrap().square, sq("D5"));
        assert_eq!(position.en_passant(), None);

        position.unmake();
        assert_eq!(position, before);
    }

    #[test]
    fn test_unmaking_double_step_restores_earlier_window() {
        let mut position = Setup::new()
            .white(["P-G2", "K-E1"])
            .black(["P-D7", "K-E8"])
            .turn(Color::Black)
            .build()
            .unwrap();
        position.make(Color::Black, Move::step(sq("D7"), sq("D5")));
        position.make(Color::White, Move::step(sq("G2"), sq("G4")));
        assert_eq!(position.en_passant().map(|ep| ep.square), Some(sq("G4")));

        position.unmake();
        assert_eq!(position.en_passant().map(|ep| ep.square), Some(sq("D5")));
        assert_eq!(position.en_passant().map(|ep| ep.pawn.to_string()), Some("P-D7".to_string()));
    }

    #[test]
    #[should_panic(expected = "en passant state out of sync")]
    fn test_unmake_double_step_with_lost_window_panics() {
        let mut position = Position::standard();
        position.make(Color::White, Move::step(sq("E2"), sq("E4")));
        position.en_passant = None;
        position.unmake();
    }

    #[test]
    fn test_promotion_and_unmake() {
        let mut position = Setup::new().white(["P-B7", "K-E1"]).black(["K-H5"]).build().unwrap();
        let before = position.clone();

        position.make(Color::White, Move::step(sq("B7"), sq("B8")));
        let queen = position.piece_at(sq("B8")).unwrap();
        assert_eq!(queen.kind, Kind::Queen);
        assert_eq!(queen.id.to_string(), "P-B7");

        position.unmake();
        assert_eq!(position, before);
        assert_eq!(position.piece_at(sq("B7")).unwrap().kind, Kind::Pawn);
    }

    #[test]
    fn test_castle_and_unmake() {
        let mut position = Setup::new()
            .white(["K-E1", "R-A1", "R-H1"])
            .black(["K-E8"])
            .build()
            .unwrap();
        let before = position.clone();

        position.make(Color::White, Move::Castle(CastleSide::King));
        assert_eq!(position.history()[0].kind(), TurnKind::Castle);
        assert_eq!(position.piece_at(sq("G1")).unwrap().kind, Kind::King);
        assert_eq!(position.piece_at(sq("F1")).unwrap().id.to_string(), "R-H1");
        position.unmake_checked(Move::Castle(CastleSide::King));
        assert_eq!(position, before);

        position.make(Color::White, Move::Castle(CastleSide::Queen));
        assert_eq!(position.piece_at(sq("C1")).unwrap().kind, Kind::King);
        assert_eq!(position.piece_at(sq("D1")).unwrap().id.to_string(), "R-A1");
        assert!(position.board().is_empty(sq("A1")));
        position.unmake();
        assert_eq!(position, before);
    }

    #[test]
    fn test_check_flags_follow_moves() {
        let mut position = Setup::new()
            .white(["R-A1", "K-H1"])
            .black(["K-E8"])
            .build()
            .unwrap();
        position.make(Color::White, Move::step(sq("A1"), sq("E1")));
        assert!(position.in_check(Color::Black));
        assert!(!position.in_check(Color::White));
        position.unmake();
        assert!(!position.in_check(Color::Black));
    }

    #[test]
    #[should_panic(expected = "empty turn log")]
    fn test_unmake_empty_log_panics() {
        Position::standard().unmake();
    }

    #[test]
    #[should_panic(expected = "expected to unmake")]
    fn test_unmake_wrong_entry_panics() {
        let mut position = Position::standard();
        position.make(Color::White, Move::step(sq("E2"), sq("E4")));
        position.unmake_checked(Move::Castle(CastleSide::King));
    }

    #[test]
    fn test_render_has_labels_and_glyphs() {
        let text = Position::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("8 "));
        assert!(lines[0].contains('♖'));
        assert!(lines[7].contains('♚'));
        assert_eq!(lines[8].trim(), "A B C D E F G H");
    }
}
