use std::{fmt::Display, str::FromStr};

use array_macro::array;

use crate::error::ChessError;

pub const BOARD_SIZE: u8 = 8;

/// Every square, ordered a1, b1, ... h1, a2, ... h8
pub static ALL_POSITIONS: [Position; 64] = array![i => Position { file: (i % 8) as u8, rank: (i / 8) as u8 }; 64];

/// A square on the board. File 0 is the a-file and rank 0 is the first rank.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Default)]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    pub fn new(file: u8, rank: u8) -> Option<Position> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Position { file, rank })
        } else {
            None
        }
    }

    pub fn parse(notation: &str) -> Result<Position, ChessError> {
        let invalid = || ChessError::InvalidPosition(String::from(notation));

        let bytes = notation.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file = match bytes[0] {
            b'a'..=b'h' => bytes[0] - b'a',
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => bytes[1] - b'1',
            _ => return Err(invalid()),
        };

        Ok(Position { file, rank })
    }

    pub fn from_index(index: usize) -> Option<Position> {
        ALL_POSITIONS.get(index).copied()
    }

    #[inline]
    pub fn index(&self) -> usize {
        (self.rank * BOARD_SIZE + self.file) as usize
    }

    #[inline]
    pub fn file(&self) -> u8 {
        self.file
    }

    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn to_notation(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }

    /// Signed (file, rank) distance from self to other
    pub fn delta(&self, other: &Position) -> (i8, i8) {
        (
            other.file as i8 - self.file as i8,
            other.rank as i8 - self.rank as i8,
        )
    }

    /// The square `file_diff` files and `rank_diff` ranks away, if it is still on the board
    pub fn offset(&self, file_diff: i8, rank_diff: i8) -> Option<Position> {
        let file = self.file.checked_add_signed(file_diff)?;
        let rank = self.rank.checked_add_signed(rank_diff)?;
        Position::new(file, rank)
    }

    pub fn is_diagonal(&self, other: &Position) -> bool {
        let (df, dr) = self.delta(other);
        df != 0 && df.abs() == dr.abs()
    }

    pub fn is_straight(&self, other: &Position) -> bool {
        let (df, dr) = self.delta(other);
        (df == 0) != (dr == 0)
    }

    pub fn is_knight_shape(&self, other: &Position) -> bool {
        let (df, dr) = self.delta(other);
        matches!((df.abs(), dr.abs()), (1, 2) | (2, 1))
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({self})")
    }
}
