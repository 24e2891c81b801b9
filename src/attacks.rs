//! Attack detection by scanning outward from the target square. The
//! opponent's move list is never generated here, so the legality layer can
//! call into this without recursing into itself.

use crate::board::{Color, Kind};
use crate::movegen::{DIAGONAL, KING_OFFSETS, KNIGHT_OFFSETS, STRAIGHT};
use crate::position::Position;
use crate::square::Square;

/// Whether any piece of color `by` attacks `square`.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    // Pawns of `by` capture toward their forward direction, so look back.
    let behind = -by.forward();
    if holds(position, square.offset(-1, behind), by, &[Kind::Pawn])
        || holds(position, square.offset(1, behind), by, &[Kind::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(position, square.offset(df, dr), by, &[Kind::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(position, square.offset(df, dr), by, &[Kind::King]))
    {
        return true;
    }

    let rays = [
        (&STRAIGHT, [Kind::Rook, Kind::Queen]),
        (&DIAGONAL, [Kind::Bishop, Kind::Queen]),
    ];
    for (directions, sliders) in rays {
        for &(df, dr) in directions {
            if holds(position, first_occupied(position, square, df, dr), by, &sliders) {
                return true;
            }
        }
    }

    false
}

/// Whether `color`'s king is attacked. A side without a king is never in
/// check.
pub fn is_king_in_check(position: &Position, color: Color) -> bool {
    match position.player(color).king_square() {
        Some(square) => is_square_attacked(position, square, color.opposite()),
        None => false,
    }
}

fn holds(position: &Position, target: Option<Square>, by: Color, kinds: &[Kind]) -> bool {
    target
        .and_then(|s| position.piece_at(s))
        .is_some_and(|piece| piece.color == by && kinds.contains(&piece.kind))
}

fn first_occupied(position: &Position, from: Square, df: i8, dr: i8) -> Option<Square> {
    let mut current = from.offset(df, dr);
    while let Some(square) = current {
        if !position.board().is_empty(square) {
            return Some(square);
        }
        current = square.offset(df, dr);
    }
    None
}
