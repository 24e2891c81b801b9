use std::collections::BTreeMap;

use crate::board::{Color, Kind};
use crate::piece::{Piece, PieceId};
use crate::square::Square;

/// One side's pieces. A piece is in `pieces` exactly while it is on the
/// board; captured pieces travel in the turn log instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub color: Color,
    pub pieces: BTreeMap<PieceId, Piece>,
    pub king: Option<PieceId>,
    pub in_check: bool,
}

impl Player {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            pieces: BTreeMap::new(),
            king: None,
            in_check: false,
        }
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn king_piece(&self) -> Option<&Piece> {
        self.king.and_then(|id| self.pieces.get(&id))
    }

    pub fn king_square(&self) -> Option<Square> {
        self.king_piece().and_then(|king| king.square)
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.pieces.values().filter(|piece| piece.kind == kind).count()
    }

    /// Insert a piece into the collection. Codes must stay unique.
    pub(crate) fn adopt(&mut self, piece: Piece) {
        assert_eq!(piece.color, self.color, "{} adopted by the wrong player", piece.id);
        if piece.kind == Kind::King {
            self.king.get_or_insert(piece.id);
        }
        let previous = self.pieces.insert(piece.id, piece);
        assert!(previous.is_none(), "piece code collision in {} collection", self.color);
    }

    /// Remove a captured piece, returning it with its square cleared.
    pub(crate) fn release(&mut self, id: PieceId) -> Piece {
        let Some(mut piece) = self.pieces.remove(&id) else {
            panic!("{} is not in the {} collection", id, self.color);
        };
        piece.square = None;
        piece
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        let color = self.color;
        match self.pieces.get_mut(&id) {
            Some(piece) => piece,
            None => panic!("{} is not in the {} collection", id, color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(color: Color, code: &str) -> PieceId {
        PieceId::parse(color, code).unwrap()
    }

    #[test]
    fn test_adopting_a_king_sets_the_handle() {
        let mut player = Player::new(Color::White);
        player.adopt(Piece::new(id(Color::White, "P-E2")));
        assert_eq!(player.king, None);
        player.adopt(Piece::new(id(Color::White, "K-E1")));
        assert_eq!(player.king, Some(id(Color::White, "K-E1")));
        assert_eq!(player.king_square(), Some("E1".parse().unwrap()));
    }

    #[test]
    fn test_release_clears_square() {
        let mut player = Player::new(Color::Black);
        player.adopt(Piece::new(id(Color::Black, "N-B8")));
        let knight = player.release(id(Color::Black, "N-B8"));
        assert_eq!(knight.square, None);
        assert!(player.pieces.is_empty());
    }

    #[test]
    #[should_panic(expected = "collision")]
    fn test_duplicate_code_panics() {
        let mut player = Player::new(Color::White);
        player.adopt(Piece::new(id(Color::White, "R-A1")));
        player.adopt(Piece::new(id(Color::White, "R-A1")));
    }
}
