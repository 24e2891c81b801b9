use thiserror::Error;

use crate::board::{Color, Kind};
use crate::piece::{Piece, PieceCodeError, PieceId};
use crate::position::Position;
use crate::square::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error(transparent)]
    Code(#[from] PieceCodeError),
    #[error("piece code {0} is listed twice")]
    Duplicate(PieceId),
    #[error("{0} is already occupied")]
    Occupied(Square),
    #[error("{0} has more than one king")]
    ExtraKing(Color),
}

/// Seeds a non-standard position from piece codes such as `K-E1`. Each
/// piece is placed on the square its code names; pieces not listed are
/// absent, and every seeded piece counts as unmoved.
#[derive(Debug, Clone)]
pub struct Setup {
    codes: [Vec<String>; 2],
    turn: Color,
}

impl Default for Setup {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup {
    pub fn new() -> Self {
        Self {
            codes: [Vec::new(), Vec::new()],
            turn: Color::White,
        }
    }

    pub fn white<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pieces(Color::White, codes)
    }

    pub fn black<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pieces(Color::Black, codes)
    }

    pub fn pieces<I, S>(mut self, color: Color, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes[color.index()].extend(codes.into_iter().map(Into::into));
        self
    }

    /// Build from a color-to-codes map, the shape debug seeds arrive in.
    pub fn from_map<M, S>(map: M) -> Self
    where
        M: IntoIterator<Item = (Color, Vec<S>)>,
        S: Into<String>,
    {
        map.into_iter()
            .fold(Self::new(), |setup, (color, codes)| setup.pieces(color, codes))
    }

    pub fn turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }

    pub fn build(&self) -> Result<Position, SetupError> {
        let mut position = Position::empty(self.turn);
        for color in Color::BOTH {
            for code in &self.codes[color.index()] {
                let id = PieceId::parse(color, code)?;
                if position.piece(id).is_some() {
                    return Err(SetupError::Duplicate(id));
                }
                if !position.board().is_empty(id.origin()) {
                    return Err(SetupError::Occupied(id.origin()));
                }
                if id.kind() == Kind::King && position.player(color).king.is_some() {
                    return Err(SetupError::ExtraKing(color));
                }
                position.add_piece(Piece::new(id));
            }
        }
        position.refresh_checks();
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_pieces_land_on_their_codes() {
        let position = Setup::new()
            .white(["K-E1", "q-d4"])
            .black(["K-E8"])
            .turn(Color::Black)
            .build()
            .unwrap();
        let queen = position.piece_at("D4".parse().unwrap()).unwrap();
        assert_eq!(queen.kind, Kind::Queen);
        assert_eq!(queen.color, Color::White);
        assert!(!queen.has_moved);
        assert_eq!(position.turn(), Color::Black);
        assert_eq!(position.player(Color::White).pieces.len(), 2);
        assert_eq!(position.board().occupied().count(), 3);
    }

    #[test]
    fn test_check_flags_computed_on_build() {
        let position = Setup::new().white(["K-E1"]).black(["R-E7", "K-A8"]).build().unwrap();
        assert!(position.in_check(Color::White));
        assert!(!position.in_check(Color::Black));
    }

    #[test]
    fn test_from_map() {
        let position = Setup::from_map([
            (Color::White, vec!["K-A1", "P-B2"]),
            (Color::Black, vec!["K-H8"]),
        ])
        .build()
        .unwrap();
        assert_eq!(position.player(Color::White).count(Kind::Pawn), 1);
        assert_eq!(position.player(Color::Black).king_square(), Some("H8".parse().unwrap()));
    }

    #[test]
    fn test_rejected_seeds() {
        assert!(matches!(
            Setup::new().white(["K-E1", "K-E1"]).build(),
            Err(SetupError::Duplicate(_))
        ));
        assert_eq!(
            Setup::new().white(["K-E1"]).black(["Q-E1"]).build(),
            Err(SetupError::Occupied("E1".parse().unwrap()))
        );
        assert_eq!(
            Setup::new().white(["K-E1", "K-D1"]).build(),
            Err(SetupError::ExtraKing(Color::White))
        );
        assert!(matches!(
            Setup::new().white(["X-E1"]).build(),
            Err(SetupError::Code(PieceCodeError::Kind('X')))
        ));
        assert!(matches!(
            Setup::new().white(["K-E9"]).build(),
            Err(SetupError::Code(PieceCodeError::Square(_)))
        ));
    }
}
