use thiserror::Error;

use crate::piece::Color;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("'{0}' is not a square on the board")]
    InvalidPosition(String),

    #[error("There is no piece on {0}")]
    NoPieceAtSource(String),

    #[error("It is {expected}'s turn but the piece on {square} is {actual}")]
    WrongTurn { square: String, expected: Color, actual: Color },

    #[error("The piece on {from} cannot move to {to}")]
    IllegalMove { from: String, to: String },

    #[error("No game with id {0}")]
    GameNotFound(u64),

    #[error("'{0}' is not a usable game id")]
    InvalidGameId(String),

    #[error("The game has already finished")]
    GameAlreadyFinished,

    #[error("The game has not been started yet")]
    GameNotStarted,

    #[error("'{0}' is not a piece notation")]
    UnknownPiece(char),

    #[error("'{0}' is not a game phase")]
    UnknownPhase(String),

    #[error("Game name '{0}' must be between 1 and 12 characters")]
    InvalidGameName(String),

    #[error("A game named '{0}' already exists")]
    DuplicateGameName(String),

    #[error("Square {0} holds more than one piece")]
    OccupiedSquare(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
}

/// How a failure is reported to whoever sent the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    InvalidPosition,
    IllegalMove,
    NotFound,
    BadRequest,
}

impl ChessError {
    pub fn failure(&self) -> Failure {
        match self {
            ChessError::InvalidPosition(_) => Failure::InvalidPosition,
            ChessError::NoPieceAtSource(_) | ChessError::WrongTurn { .. } | ChessError::IllegalMove { .. } => {
                Failure::IllegalMove
            }
            ChessError::GameNotFound(_) => Failure::NotFound,
            ChessError::GameAlreadyFinished
            | ChessError::GameNotStarted
            | ChessError::InvalidGameId(_)
            | ChessError::UnknownPiece(_)
            | ChessError::UnknownPhase(_)
            | ChessError::InvalidGameName(_)
            | ChessError::DuplicateGameName(_)
            | ChessError::OccupiedSquare(_)
            | ChessError::InvalidFen(_) => Failure::BadRequest,
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::InvalidPosition => write!(f, "invalid position"),
            Failure::IllegalMove => write!(f, "illegal move"),
            Failure::NotFound => write!(f, "not found"),
            Failure::BadRequest => write!(f, "bad request"),
        }
    }
}
