pub mod board;
pub mod commands;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod manager;
pub mod move_generator;
pub mod moves;
pub mod piece;
pub mod position;
pub mod registry;

pub use board::{Board, STARTING_FEN};
pub use error::{ChessError, Failure};
pub use evaluate::Scores;
pub use game::{GameState, MoveOutcome, Phase};
pub use moves::MoveRequest;
pub use piece::{Color, Piece, PieceKind};
pub use position::Position;
pub use registry::{GameRegistry, GameSnapshot, PieceRecord};
