use std::fmt::Display;

use crate::error::ChessError;

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for white (towards rank 8), -1 for black
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank pawns of this color start on, zero based
    #[inline]
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opposite()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Material value used for the score of a side. Kings do not count.
    pub fn score(self) -> f64 {
        match self {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 2.5,
            PieceKind::Bishop => 3.0,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => 0.0,
        }
    }

    /// Uppercase letter, the way white pieces are written in FEN
    pub fn notation(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_notation(c: char) -> Result<PieceKind, ChessError> {
        match c.to_ascii_uppercase() {
            'P' => Ok(PieceKind::Pawn),
            'N' => Ok(PieceKind::Knight),
            'B' => Ok(PieceKind::Bishop),
            'R' => Ok(PieceKind::Rook),
            'Q' => Ok(PieceKind::Queen),
            'K' => Ok(PieceKind::King),
            _ => Err(ChessError::UnknownPiece(c)),
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        write!(f, "{name}")
    }
}

/// A piece is a plain value. The board cell holding it is its only owner.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.kind.score()
    }

    /// FEN letter, uppercase for white and lowercase for black
    pub fn notation(&self) -> char {
        match self.color {
            Color::White => self.kind.notation(),
            Color::Black => self.kind.notation().to_ascii_lowercase(),
        }
    }

    pub fn from_notation(c: char) -> Result<Piece, ChessError> {
        let kind = PieceKind::from_notation(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Ok(Piece { color, kind })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}
