use log::debug;

use crate::{board::Board, error::ChessError, move_generator::generate_path, piece::Piece, position::Position};

/// One requested move. Lives only as long as the validation of that move.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MoveRequest {
    pub source: Position,
    pub target: Position,
}

impl MoveRequest {
    pub fn new(source: Position, target: Position) -> MoveRequest {
        MoveRequest { source, target }
    }

    /// Both squares are parsed before anything looks at a board
    pub fn parse(source: &str, target: &str) -> Result<MoveRequest, ChessError> {
        Ok(MoveRequest {
            source: Position::parse(source)?,
            target: Position::parse(target)?,
        })
    }
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.source, self.target)
    }
}

impl Board {
    /// Moves the piece on source to target if its strategy allows it, returning the captured piece.
    /// The board is untouched when an error is returned.
    pub fn move_piece(&mut self, source: Position, target: Position) -> Result<Option<Piece>, ChessError> {
        let Some(piece) = self.piece_at(source) else {
            return Err(ChessError::NoPieceAtSource(source.to_notation()));
        };

        if !generate_path(self, source).contains(&target) {
            return Err(ChessError::IllegalMove {
                from: source.to_notation(),
                to: target.to_notation(),
            });
        }

        let captured = self.write_move(source, target);
        match captured {
            Some(c) => debug!("{piece} {source} takes {c} on {target}"),
            None => debug!("{piece} {source}-{target}"),
        }

        Ok(captured)
    }
}
