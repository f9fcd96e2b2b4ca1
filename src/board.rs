use std::fmt::{Debug, Display};

use crate::{
    error::ChessError,
    piece::{Color, Piece, PieceKind},
    position::{ALL_POSITIONS, BOARD_SIZE, Position},
};

pub static STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Squares indexed by rank * 8 + file, a1 first
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Board {
        Board { squares: [None; 64] }
    }

    pub fn initial() -> Board {
        let mut board = Board::empty();

        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.squares[file as usize] = Some(Piece::new(Color::White, *kind));
            board.squares[(8 + file) as usize] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.squares[(48 + file) as usize] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.squares[(56 + file) as usize] = Some(Piece::new(Color::Black, *kind));
        }

        board
    }

    /// Reads the piece placement field of a FEN. Anything after the first space is ignored.
    pub fn from_fen(fen: &str) -> Result<Board, ChessError> {
        let invalid = |reason: String| ChessError::InvalidFen(reason);

        if !fen.is_ascii() {
            return Err(invalid(String::from("Expected FEN to only contain ASCII characters")));
        }

        let placement = fen.split_ascii_whitespace().next().unwrap_or("");
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(invalid(format!(
                "Expected piece placement to have 8 ranks but it had {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();

        // FEN lists rank 8 first
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = BOARD_SIZE - 1 - i as u8;
            let mut file: u8 = 0;

            for c in rank_str.chars() {
                match c {
                    '1'..='8' => {
                        file += c as u8 - b'0';
                    }
                    _ => {
                        let piece = Piece::from_notation(c).map_err(|_| {
                            invalid(format!(
                                "Encountered unexpected character {c} while processing piece placement"
                            ))
                        })?;
                        let position = Position::new(file, rank)
                            .ok_or_else(|| invalid(format!("Rank {} has more than 8 files", rank + 1)))?;
                        board.place(position, piece)?;
                        file += 1;
                    }
                }

                if file > BOARD_SIZE {
                    return Err(invalid(format!("Rank {} has more than 8 files", rank + 1)));
                }
            }

            if file != BOARD_SIZE {
                return Err(invalid(format!("Rank {} describes {file} files instead of 8", rank + 1)));
            }
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut result = String::new();

        for rank in (0..BOARD_SIZE).rev() {
            let mut empty_run = 0;
            for file in 0..BOARD_SIZE {
                match self.squares[(rank * BOARD_SIZE + file) as usize] {
                    Some(piece) => {
                        if empty_run > 0 {
                            result.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        result.push(piece.notation());
                    }
                    None => empty_run += 1,
                }
            }

            if empty_run > 0 {
                result.push((b'0' + empty_run) as char);
            }
            if rank > 0 {
                result.push('/');
            }
        }

        result
    }

    #[inline]
    pub fn piece_at(&self, position: Position) -> Option<Piece> {
        self.squares[position.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.squares[position.index()].is_none()
    }

    /// Puts a piece on an empty square. Only for setting up positions, moves go through `move_piece`.
    pub fn place(&mut self, position: Position, piece: Piece) -> Result<(), ChessError> {
        let square = &mut self.squares[position.index()];
        if square.is_some() {
            return Err(ChessError::OccupiedSquare(position.to_notation()));
        }

        *square = Some(piece);
        Ok(())
    }

    pub fn remove(&mut self, position: Position) -> Option<Piece> {
        self.squares[position.index()].take()
    }

    /// Relocates whatever is on source to target and returns what was on target.
    /// Does not check legality, `move_piece` does that before calling this.
    pub(crate) fn write_move(&mut self, source: Position, target: Position) -> Option<Piece> {
        let moving = self.squares[source.index()].take();
        std::mem::replace(&mut self.squares[target.index()], moving)
    }

    /// True when every square strictly between source and target is empty.
    /// Only meaningful for straight or diagonal lines, anything else is never clear.
    pub fn is_path_clear(&self, source: Position, target: Position) -> bool {
        if !source.is_straight(&target) && !source.is_diagonal(&target) {
            return false;
        }

        let (df, dr) = source.delta(&target);
        let step = (df.signum(), dr.signum());
        let mut cur = source;
        loop {
            cur = match cur.offset(step.0, step.1) {
                Some(p) => p,
                None => return false,
            };

            if cur == target {
                return true;
            }
            if !self.is_empty_at(cur) {
                return false;
            }
        }
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.color == color && piece.kind == PieceKind::King)
            .map(|(position, _)| position)
    }

    /// Occupied squares in index order
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        ALL_POSITIONS
            .iter()
            .filter_map(|p| self.squares[p.index()].map(|piece| (*p, piece)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // a1 in the bottom left like viewing the board as white
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE {
                let c = match self.squares[(rank * BOARD_SIZE + file) as usize] {
                    Some(piece) => piece.notation(),
                    None => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }

        write!(f, "  abcdefgh")
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("piece_count", &self.piece_count())
            .finish()?;

        write!(f, "\n{self}")
    }
}
