use crate::board::{Color, Kind};
use crate::piece::Piece;
use crate::position::Position;

/// Non-king material below which a side counts as being in the endgame.
pub const ENDGAME_MATERIAL: i32 = 1300;

/// Material plus piece-square evaluation. Tables are written from White's
/// side of the board, row 0 being rank 8; Black reads them mirrored.
#[derive(Debug, Clone)]
pub struct Evaluator {
    // Piece values
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    pub king_value: i32,

    // Positional bonuses
    pub pawn_position_bonus: [[i32; 8]; 8],
    pub knight_position_bonus: [[i32; 8]; 8],
    pub bishop_position_bonus: [[i32; 8]; 8],
    pub rook_position_bonus: [[i32; 8]; 8],
    pub queen_position_bonus: [[i32; 8]; 8],
    pub king_position_bonus: [[i32; 8]; 8],
    pub king_endgame_position_bonus: [[i32; 8]; 8],
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 100,
            knight_value: 320,
            bishop_value: 330,
            rook_value: 500,
            queen_value: 900,
            king_value: 20000,

            // Pawn position bonuses (encourages central control and advancement)
            pawn_position_bonus: [
                [0, 0, 0, 0, 0, 0, 0, 0],
                [50, 50, 50, 50, 50, 50, 50, 50],
                [10, 10, 20, 30, 30, 20, 10, 10],
                [5, 5, 10, 25, 25, 10, 5, 5],
                [0, 0, 0, 20, 20, 0, 0, 0],
                [5, -5, -10, 0, 0, -10, -5, 5],
                [5, 10, 10, -20, -20, 10, 10, 5],
                [0, 0, 0, 0, 0, 0, 0, 0],
            ],

            // Knight position bonuses (encourages central control)
            knight_position_bonus: [
                [-50, -40, -30, -30, -30, -30, -40, -50],
                [-40, -20, 0, 0, 0, 0, -20, -40],
                [-30, 0, 10, 15, 15, 10, 0, -30],
                [-30, 5, 15, 20, 20, 15, 5, -30],
                [-30, 0, 15, 20, 20, 15, 0, -30],
                [-30, 5, 10, 15, 15, 10, 5, -30],
                [-40, -20, 0, 5, 5, 0, -20, -40],
                [-50, -40, -30, -30, -30, -30, -40, -50],
            ],

            // Bishop position bonuses (encourages central control and long diagonals)
            bishop_position_bonus: [
                [-20, -10, -10, -10, -10, -10, -10, -20],
                [-10, 0, 0, 0, 0, 0, 0, -10],
                [-10, 0, 5, 10, 10, 5, 0, -10],
                [-10, 5, 5, 10, 10, 5, 5, -10],
                [-10, 0, 10, 10, 10, 10, 0, -10],
                [-10, 10, 10, 10, 10, 10, 10, -10],
                [-10, 5, 0, 0, 0, 0, 5, -10],
                [-20, -10, -10, -10, -10, -10, -10, -20],
            ],

            // Rook position bonuses (encourages open files and central control)
            rook_position_bonus: [
                [0, 0, 0, 0, 0, 0, 0, 0],
                [5, 10, 10, 10, 10, 10, 10, 5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [0, 0, 0, 5, 5, 0, 0, 0],
            ],

            // Queen position bonuses (encourages central control and mobility)
            queen_position_bonus: [
                [-20, -10, -10, -5, -5, -10, -10, -20],
                [-10, 0, 0, 0, 0, 0, 0, -10],
                [-10, 0, 5, 5, 5, 5, 0, -10],
                [-5, 0, 5, 5, 5, 5, 0, -5],
                [0, 0, 5, 5, 5, 5, 0, -5],
                [-10, 5, 5, 5, 5, 5, 0, -10],
                [-10, 0, 5, 0, 0, 0, 0, -10],
                [-20, -10, -10, -5, -5, -10, -10, -20],
            ],

            // King position bonuses (encourages safety in opening/middlegame)
            king_position_bonus: [
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-20, -30, -30, -40, -40, -30, -30, -20],
                [-10, -20, -20, -20, -20, -20, -20, -10],
                [20, 20, 0, 0, 0, 0, 20, 20],
                [20, 30, 10, 0, 0, 10, 30, 20],
            ],

            // King position bonuses for endgame (encourages centralization)
            king_endgame_position_bonus: [
                [-50, -40, -30, -20, -20, -30, -40, -50],
                [-30, -20, -10, 0, 0, -10, -20, -30],
                [-30, -10, 20, 30, 30, 20, -10, -30],
                [-30, -10, 30, 40, 40, 30, -10, -30],
                [-30, -10, 30, 40, 40, 30, -10, -30],
                [-30, -10, 20, 30, 30, 20, -10, -30],
                [-30, -30, 0, 0, 0, 0, -30, -30],
                [-50, -30, -30, -30, -30, -30, -30, -50],
            ],
        }
    }

    /// Score of `position` for `color`: its pieces minus the opponent's,
    /// negated when `color` is the minimizing side.
    pub fn evaluate(&self, position: &Position, color: Color, maximizing: bool) -> i32 {
        let endgame = self.is_endgame(position);
        let own = self.side_score(position, color, endgame);
        let opponent = self.side_score(position, color.opposite(), endgame);
        let offset = if maximizing { 1 } else { -1 };
        offset * (own - opponent)
    }

    fn side_score(&self, position: &Position, color: Color, endgame: bool) -> i32 {
        position
            .player(color)
            .pieces
            .values()
            .map(|piece| self.piece_score(piece, endgame))
            .sum()
    }

    fn piece_score(&self, piece: &Piece, endgame: bool) -> i32 {
        let Some(square) = piece.square else {
            return 0;
        };
        let (row, file) = square.table_index();
        let row = match piece.color {
            Color::White => row,
            Color::Black => 7 - row,
        };

        let position_bonus = match piece.kind {
            Kind::Pawn => self.pawn_position_bonus[row][file],
            Kind::Knight => self.knight_position_bonus[row][file],
            Kind::Bishop => self.bishop_position_bonus[row][file],
            Kind::Rook => self.rook_position_bonus[row][file],
            Kind::Queen => self.queen_position_bonus[row][file],
            Kind::King => if endgame {
                self.king_endgame_position_bonus[row][file]
            } else {
                self.king_position_bonus[row][file]
            },
        };

        self.value(piece.kind) + position_bonus
    }

    pub fn value(&self, kind: Kind) -> i32 {
        match kind {
            Kind::Pawn => self.pawn_value,
            Kind::Knight => self.knight_value,
            Kind::Bishop => self.bishop_value,
            Kind::Rook => self.rook_value,
            Kind::Queen => self.queen_value,
            Kind::King => self.king_value,
        }
    }

    /// Endgame once either side is short on material, or once every side
    /// still holding a queen has no rook and at most one minor piece.
    pub fn is_endgame(&self, position: &Position) -> bool {
        let low_material = Color::BOTH.iter().any(|&color| {
            let material: i32 = position
                .player(color)
                .pieces
                .values()
                .filter(|piece| piece.kind != Kind::King)
                .map(|piece| self.value(piece.kind))
                .sum();
            material < ENDGAME_MATERIAL
        });
        if low_material {
            return true;
        }

        Color::BOTH.iter().all(|&color| {
            let player = position.player(color);
            player.count(Kind::Queen) == 0
                || (player.count(Kind::Rook) == 0
                    && player.count(Kind::Knight) + player.count(Kind::Bishop) <= 1)
        })
    }
}
