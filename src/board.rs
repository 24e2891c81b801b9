use std::fmt;

use crate::piece::PieceId;
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Rank step a pawn of this color advances by.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank the pieces start on.
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }

    /// Rank a pawn promotes on.
    pub fn last_rank(self) -> u8 {
        self.opposite().home_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Piece kind, ordered by value from pawn up to king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Pawn,
        Kind::Knight,
        Kind::Bishop,
        Kind::Rook,
        Kind::Queen,
        Kind::King,
    ];

    pub const COUNT: i32 = 6;

    /// Position in the pawn < knight < ... < king ordering.
    pub fn order(self) -> i32 {
        match self {
            Kind::Pawn => 0,
            Kind::Knight => 1,
            Kind::Bishop => 2,
            Kind::Rook => 3,
            Kind::Queen => 4,
            Kind::King => 5,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Kind::Pawn => 'P',
            Kind::Knight => 'N',
            Kind::Bishop => 'B',
            Kind::Rook => 'R',
            Kind::Queen => 'Q',
            Kind::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<Kind> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Kind::Pawn),
            'N' => Some(Kind::Knight),
            'B' => Some(Kind::Bishop),
            'R' => Some(Kind::Rook),
            'Q' => Some(Kind::Queen),
            'K' => Some(Kind::King),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Pawn => "pawn",
            Kind::Knight => "knight",
            Kind::Bishop => "bishop",
            Kind::Rook => "rook",
            Kind::Queen => "queen",
            Kind::King => "king",
        };
        write!(f, "{}", name)
    }
}

/// The 8x8 grid. A cell names the piece standing on it; the piece itself
/// lives in its owner's collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Option<PieceId>; 8]; 8],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, square: Square) -> Option<PieceId> {
        self.cells[(square.rank() - 1) as usize][(square.file() - 1) as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Put `id` on `square`, returning whatever was displaced.
    pub fn place(&mut self, square: Square, id: PieceId) -> Option<PieceId> {
        self.cell_mut(square).replace(id)
    }

    /// Empty `square`, returning the piece that stood there.
    pub fn take(&mut self, square: Square) -> Option<PieceId> {
        self.cell_mut(square).take()
    }

    /// Occupied squares with their occupants, rank by rank from A1.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, PieceId)> + '_ {
        Square::all().filter_map(move |square| self.get(square).map(|id| (square, id)))
    }

    fn cell_mut(&mut self, square: Square) -> &mut Option<PieceId> {
        &mut self.cells[(square.rank() - 1) as usize][(square.file() - 1) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_place_and_take() {
        let mut board = Board::new();
        let rook = PieceId::new(Color::White, Kind::Rook, sq("A1"));
        let pawn = PieceId::new(Color::Black, Kind::Pawn, sq("B7"));

        assert_eq!(board.place(sq("C3"), rook), None);
        assert_eq!(board.get(sq("C3")), Some(rook));
        assert_eq!(board.place(sq("C3"), pawn), Some(rook));
        assert_eq!(board.take(sq("C3")), Some(pawn));
        assert!(board.is_empty(sq("C3")));
        assert_eq!(board.take(sq("C3")), None);
    }

    #[test]
    fn test_occupied_lists_every_piece_once() {
        let mut board = Board::new();
        board.place(sq("H8"), PieceId::new(Color::Black, Kind::King, sq("E8")));
        board.place(sq("A1"), PieceId::new(Color::White, Kind::King, sq("E1")));
        let occupied: Vec<_> = board.occupied().map(|(square, _)| square).collect();
        assert_eq!(occupied, vec![sq("A1"), sq("H8")]);
    }

    #[test]
    fn test_color_geometry() {
        assert_eq!(Color::White.forward(), 1);
        assert_eq!(Color::Black.forward(), -1);
        assert_eq!(Color::White.last_rank(), 8);
        assert_eq!(Color::Black.last_rank(), 1);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn test_kind_letters_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_letter(kind.letter()), Some(kind));
        }
        assert_eq!(Kind::from_letter('x'), None);
        assert!(Kind::Pawn.order() < Kind::King.order());
    }
}
