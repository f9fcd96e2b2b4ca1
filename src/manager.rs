//! Lifecycle of a single game. Holds no state of its own, callers pass the game in.

use crate::{
    error::ChessError,
    evaluate::Scores,
    game::{GameState, MoveOutcome},
    moves::MoveRequest,
    piece::Color,
};

pub fn create() -> GameState {
    GameState::start()
}

/// Plays one move. A game that has not started yet is started by its first move,
/// and stays unstarted if that move is rejected.
pub fn make_move(game: &mut GameState, request: MoveRequest) -> Result<MoveOutcome, ChessError> {
    let mut next = game.clone();
    next.begin()?;
    let outcome = next.apply_move(request)?;
    *game = next;

    Ok(outcome)
}

pub fn scores(game: &GameState) -> Scores {
    game.board().scores()
}

pub fn is_finished(game: &GameState) -> bool {
    game.is_finished()
}

pub fn next_turn(game: &GameState) -> Option<Color> {
    game.next_turn()
}
