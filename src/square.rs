use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A board coordinate. Files and ranks both run 1..=8, so `A1` is (1, 1)
/// and `H8` is (8, 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("input needs to be two characters, e.g. D2 (got {0:?})")]
    Length(String),
    #[error("invalid file {0:?}, expected A-H")]
    File(char),
    #[error("invalid rank {0:?}, expected 1-8")]
    Rank(char),
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Shift by a file/rank delta, `None` once it leaves the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, rank by rank starting from A1.
    pub fn all() -> impl Iterator<Item = Square> {
        (1..=8u8).flat_map(|rank| (1..=8u8).map(move |file| Square { file, rank }))
    }

    /// Same file, different rank. `rank` must already be on the board.
    pub(crate) fn with_rank(self, rank: u8) -> Self {
        debug_assert!((1..=8).contains(&rank));
        Self { file: self.file, rank }
    }

    /// Row/column into a white-oriented 8x8 table (row 0 is rank 8).
    pub(crate) fn table_index(self) -> (usize, usize) {
        ((8 - self.rank) as usize, (self.file - 1) as usize)
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 2 {
            return Err(SquareError::Length(s.to_string()));
        }

        let file = match chars[0].to_ascii_uppercase() {
            c @ 'A'..='H' => c as u8 - b'A' + 1,
            c => return Err(SquareError::File(c)),
        };
        let rank = match chars[1] {
            c @ '1'..='8' => c as u8 - b'0',
            c => return Err(SquareError::Rank(c)),
        };

        Ok(Square { file, rank })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.file - 1) as char, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let square: Square = "e4".parse().unwrap();
        assert_eq!((square.file(), square.rank()), (5, 4));
        assert_eq!(square.to_string(), "E4");
        assert_eq!("A1".parse::<Square>().unwrap(), Square::new(1, 1).unwrap());
        assert_eq!("H8".parse::<Square>().unwrap(), Square::new(8, 8).unwrap());
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!("E".parse::<Square>(), Err(SquareError::Length("E".into())));
        assert_eq!("I4".parse::<Square>(), Err(SquareError::File('I')));
        assert_eq!("E9".parse::<Square>(), Err(SquareError::Rank('9')));
        assert_eq!("E0".parse::<Square>(), Err(SquareError::Rank('0')));
    }

    #[test]
    fn test_offsets_stay_on_board() {
        let a1 = Square::new(1, 1).unwrap();
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(7, 7), Square::new(8, 8));
        assert_eq!(Square::new(8, 4).unwrap().offset(1, 0), None);
        assert_eq!(Square::new(0, 4), None);
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_table_index_is_white_oriented() {
        assert_eq!("A8".parse::<Square>().unwrap().table_index(), (0, 0));
        assert_eq!("H1".parse::<Square>().unwrap().table_index(), (7, 7));
        assert_eq!("E2".parse::<Square>().unwrap().table_index(), (6, 4));
    }
}
