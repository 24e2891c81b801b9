use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::board::{Color, Kind};
use crate::square::{Square, SquareError};

/// Stable identity of a piece, generated once from its color, its kind at
/// creation and the square it started on. A white rook that starts on A1
/// is `R-A1` for the rest of the game, and a pawn keeps its `P-` code
/// after promoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    color: Color,
    kind: Kind,
    origin: Square,
}

impl PieceId {
    pub fn new(color: Color, kind: Kind, origin: Square) -> Self {
        Self {
            color,
            kind,
            origin,
        }
    }

    pub fn color(self) -> Color {
        self.color
    }

    /// Kind the piece was created as.
    pub fn kind(self) -> Kind {
        self.kind
    }

    pub fn origin(self) -> Square {
        self.origin
    }

    /// Parse a code such as `K-E1` for a piece of the given color.
    pub fn parse(color: Color, code: &str) -> Result<Self, PieceCodeError> {
        let mut parts = code.trim().splitn(2, '-');
        let (letter, square) = match (parts.next(), parts.next()) {
            (Some(letter), Some(square)) if letter.chars().count() == 1 => (letter, square),
            _ => return Err(PieceCodeError::Malformed(code.to_string())),
        };
        let letter = letter.chars().next().unwrap_or_default();
        let kind = Kind::from_letter(letter).ok_or(PieceCodeError::Kind(letter))?;
        let origin = Square::from_str(square)?;
        Ok(Self::new(color, kind, origin))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.kind.letter(), self.origin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PieceCodeError {
    #[error("piece code {0:?} is not of the form K-E1")]
    Malformed(String),
    #[error("unknown piece letter {0:?}")]
    Kind(char),
    #[error(transparent)]
    Square(#[from] SquareError),
}

/// A piece and its mutable state. Captured pieces leave their owner's
/// collection and have no square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub kind: Kind,
    pub square: Option<Square>,
    pub has_moved: bool,
}

impl Piece {
    /// A fresh, unmoved piece standing on the square its id names.
    pub fn new(id: PieceId) -> Self {
        Self {
            id,
            color: id.color(),
            kind: id.kind(),
            square: Some(id.origin()),
            has_moved: false,
        }
    }

    pub fn glyph(&self) -> char {
        glyph(self.color, self.kind)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

pub fn glyph(color: Color, kind: Kind) -> char {
    match (color, kind) {
        (Color::White, Kind::Pawn) => '♟',
        (Color::White, Kind::Knight) => '♞',
        (Color::White, Kind::Bishop) => '♝',
        (Color::White, Kind::Rook) => '♜',
        (Color::White, Kind::Queen) => '♛',
        (Color::White, Kind::King) => '♚',
        (Color::Black, Kind::Pawn) => '♙',
        (Color::Black, Kind::Knight) => '♘',
        (Color::Black, Kind::Bishop) => '♗',
        (Color::Black, Kind::Rook) => '♖',
        (Color::Black, Kind::Queen) => '♕',
        (Color::Black, Kind::King) => '♔',
    }
}
