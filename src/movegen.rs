use std::fmt;

use crate::board::{Color, Kind};
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

pub const STRAIGHT: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (-1, 2), (2, -1),
    (1, -2), (-2, 1), (-1, -2), (-2, -1),
];
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1), (1, -1), (-1, 1), (-1, -1),
    (1, 0), (-1, 0), (0, 1), (0, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// File of the rook that castles on this side.
    pub fn rook_file(self) -> u8 {
        match self {
            CastleSide::King => 8,
            CastleSide::Queen => 1,
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CastleSide::King => write!(f, "king side"),
            CastleSide::Queen => write!(f, "queen side"),
        }
    }
}

/// A move as the outside world names it: a piece going from one square to
/// another, or a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Step { from: Square, to: Square },
    Castle(CastleSide),
}

impl Move {
    pub fn step(from: Square, to: Square) -> Self {
        Move::Step { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Move::Step { from, to } => write!(f, "{}{}", from, to),
            Move::Castle(CastleSide::King) => write!(f, "O-O"),
            Move::Castle(CastleSide::Queen) => write!(f, "O-O-O"),
        }
    }
}

/// Squares `piece` could move to, ignoring whether its own king would be
/// left in check. Blocking and capture rules apply; a square holding an
/// enemy king is included, the legality layer rejects it.
pub fn zone(position: &Position, piece: &Piece) -> Vec<Square> {
    let Some(origin) = piece.square else {
        return Vec::new();
    };

    match piece.kind {
        Kind::Pawn => pawn_zone(position, piece.color, origin, piece.has_moved),
        Kind::Knight => leaper_zone(position, piece.color, origin, &KNIGHT_OFFSETS),
        Kind::Bishop => slider_zone(position, piece.color, origin, &DIAGONAL),
        Kind::Rook => slider_zone(position, piece.color, origin, &STRAIGHT),
        Kind::Queen => {
            let mut squares = slider_zone(position, piece.color, origin, &STRAIGHT);
            squares.extend(slider_zone(position, piece.color, origin, &DIAGONAL));
            squares
        }
        Kind::King => leaper_zone(position, piece.color, origin, &KING_OFFSETS),
    }
}

fn slider_zone(position: &Position, color: Color, origin: Square, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut squares = Vec::new();
    for &(df, dr) in directions {
        let mut current = origin.offset(df, dr);
        while let Some(square) = current {
            match position.board().get(square) {
                None => squares.push(square),
                Some(occupant) => {
                    if occupant.color() != color {
                        squares.push(square);
                    }
                    break;
                }
            }
            current = square.offset(df, dr);
        }
    }
    squares
}

fn leaper_zone(position: &Position, color: Color, origin: Square, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(df, dr)| origin.offset(df, dr))
        .filter(|&square| {
            position
                .board()
                .get(square)
                .map_or(true, |occupant| occupant.color() != color)
        })
        .collect()
}

fn pawn_zone(position: &Position, color: Color, origin: Square, has_moved: bool) -> Vec<Square> {
    let board = position.board();
    let forward = color.forward();
    let starting = !has_moved && origin.rank() == pawn_rank(color);
    let mut squares = Vec::new();

    // Pushes
    if let Some(one) = origin.offset(0, forward).filter(|&s| board.is_empty(s)) {
        squares.push(one);
        if starting {
            if let Some(two) = origin.offset(0, 2 * forward).filter(|&s| board.is_empty(s)) {
                squares.push(two);
            }
        }
    }

    // Captures, including en passant against a pawn that just double-stepped
    for side in [-1, 1] {
        let Some(target) = origin.offset(side, forward) else {
            continue;
        };
        match board.get(target) {
            Some(occupant) if occupant.color() != color => squares.push(target),
            Some(_) => {}
            None => {
                let beside = origin.offset(side, 0);
                let en_passant = position.en_passant().is_some_and(|ep| {
                    ep.pawn.color() != color && Some(ep.square) == beside
                });
                if en_passant {
                    squares.push(target);
                }
            }
        }
    }

    squares
}

/// Rank a pawn of `color` starts the game on.
pub fn pawn_rank(color: Color) -> u8 {
    (color.home_rank() as i8 + color.forward()) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::Setup;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn zone_of(position: &Position, at: &str) -> Vec<String> {
        let piece = position.piece_at(sq(at)).unwrap();
        let mut squares: Vec<String> = zone(position, piece).iter().map(|s| s.to_string()).collect();
        squares.sort();
        squares
    }

    #[test]
    fn test_starting_knight_and_pawn() {
        let position = Position::standard();
        assert_eq!(zone_of(&position, "G1"), vec!["F3", "H3"]);
        assert_eq!(zone_of(&position, "E2"), vec!["E3", "E4"]);
        assert_eq!(zone_of(&position, "E7"), vec!["E5", "E6"]);
        assert!(zone_of(&position, "A1").is_empty());
        assert!(zone_of(&position, "D1").is_empty());
    }

    #[test]
    fn test_rook_stops_at_blockers() {
        let position = Setup::new()
            .white(["R-D4", "P-D6", "K-A1"])
            .black(["N-F4", "K-H8"])
            .build()
            .unwrap();
        assert_eq!(
            zone_of(&position, "D4"),
            vec!["A4", "B4", "C4", "D1", "D2", "D3", "D5", "E4", "F4"]
        );
    }

    #[test]
    fn test_bishop_and_queen_rays() {
        let position = Setup::new()
            .white(["B-A1", "Q-H1", "K-E3"])
            .black(["P-C3", "K-E8"])
            .build()
            .unwrap();
        assert_eq!(zone_of(&position, "A1"), vec!["B2", "C3"]);
        let queen = zone_of(&position, "H1");
        assert_eq!(queen.len(), 6 + 7 + 7);
        assert!(queen.contains(&"A8".to_string()));
        assert!(!queen.contains(&"A1".to_string()));
    }

    #[test]
    fn test_leapers_skip_friends_and_edges() {
        let position = Setup::new()
            .white(["N-A1", "P-B3", "K-H1"])
            .black(["P-C2", "K-H8"])
            .build()
            .unwrap();
        assert_eq!(zone_of(&position, "A1"), vec!["C2"]);
        assert_eq!(zone_of(&position, "H1"), vec!["G1", "G2", "H2"]);
    }

    #[test]
    fn test_pawn_blocked_and_captures() {
        let position = Setup::new()
            .white(["P-E2", "K-A1"])
            .black(["N-E3", "P-D3", "P-F3", "K-H8"])
            .build()
            .unwrap();
        assert_eq!(zone_of(&position, "E2"), vec!["D3", "F3"]);

        let position = Setup::new()
            .white(["P-E2", "K-A1"])
            .black(["N-E4", "K-H8"])
            .build()
            .unwrap();
        assert_eq!(zone_of(&position, "E2"), vec!["E3"]);
    }

    #[test]
    fn test_en_passant_only_against_double_step() {
        let mut position = Setup::new()
            .white(["P-E5", "K-A1"])
            .black(["P-D7", "P-F6", "K-H8"])
            .turn(Color::Black)
            .build()
            .unwrap();

        position.make(Color::Black, Move::step(sq("F6"), sq("F5")));
        position.make(Color::White, Move::step(sq("A1"), sq("A2")));
        position.make(Color::Black, Move::step(sq("D7"), sq("D5")));
        // F5 stepped once, D5 twice
        assert_eq!(zone_of(&position, "E5"), vec!["D6", "E6"]);
    }

    #[test]
    fn test_double_step_needs_unmoved_pawn_on_start_rank() {
        let mut position = Setup::new()
            .white(["P-C2", "P-G4", "K-A1"])
            .black(["K-H8"])
            .build()
            .unwrap();
        assert_eq!(zone_of(&position, "C2"), vec!["C3", "C4"]);
        assert_eq!(zone_of(&position, "G4"), vec!["G5"]);

        position.make(Color::White, Move::step(sq("C2"), sq("C3")));
        position.make(Color::Black, Move::step(sq("H8"), sq("H7")));
        assert_eq!(zone_of(&position, "C3"), vec!["C4"]);
    }
}
