use std::{fmt::Display, str::FromStr};

use log::{debug, info};

use crate::{
    board::Board,
    error::ChessError,
    moves::MoveRequest,
    piece::{Color, Piece, PieceKind},
};

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Phase {
    Ready,
    WhiteTurn,
    BlackTurn,
    End,
}

impl Phase {
    pub fn turn_of(color: Color) -> Phase {
        match color {
            Color::White => Phase::WhiteTurn,
            Color::Black => Phase::BlackTurn,
        }
    }

    /// The color allowed to move, if any
    pub fn active_color(self) -> Option<Color> {
        match self {
            Phase::WhiteTurn => Some(Color::White),
            Phase::BlackTurn => Some(Color::Black),
            Phase::Ready | Phase::End => None,
        }
    }

    /// Name stored alongside a saved game
    pub fn label(self) -> &'static str {
        match self {
            Phase::Ready => "Ready",
            Phase::WhiteTurn => "WhiteTurn",
            Phase::BlackTurn => "BlackTurn",
            Phase::End => "End",
        }
    }
}

impl FromStr for Phase {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ready" => Ok(Phase::Ready),
            "WhiteTurn" => Ok(Phase::WhiteTurn),
            "BlackTurn" => Ok(Phase::BlackTurn),
            "End" => Ok(Phase::End),
            _ => Err(ChessError::UnknownPhase(String::from(s))),
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MoveOutcome {
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub phase: Phase,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GameState {
    board: Board,
    phase: Phase,
}

impl GameState {
    pub fn start() -> GameState {
        GameState {
            board: Board::initial(),
            phase: Phase::Ready,
        }
    }

    /// Used when loading a saved game or a custom setup
    pub fn from_parts(board: Board, phase: Phase) -> GameState {
        GameState { board, phase }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ready becomes white's turn. A game already in progress is left as is.
    pub fn begin(&mut self) -> Result<(), ChessError> {
        match self.phase {
            Phase::Ready => {
                self.phase = Phase::WhiteTurn;
                Ok(())
            }
            Phase::WhiteTurn | Phase::BlackTurn => Ok(()),
            Phase::End => Err(ChessError::GameAlreadyFinished),
        }
    }

    pub fn apply_move(&mut self, request: MoveRequest) -> Result<MoveOutcome, ChessError> {
        let active = match self.phase {
            Phase::Ready => return Err(ChessError::GameNotStarted),
            Phase::End => return Err(ChessError::GameAlreadyFinished),
            Phase::WhiteTurn => Color::White,
            Phase::BlackTurn => Color::Black,
        };

        let Some(moved) = self.board.piece_at(request.source) else {
            return Err(ChessError::NoPieceAtSource(request.source.to_notation()));
        };

        if moved.color != active {
            return Err(ChessError::WrongTurn {
                square: request.source.to_notation(),
                expected: active,
                actual: moved.color,
            });
        }

        let captured = self.board.move_piece(request.source, request.target)?;

        self.phase = match captured {
            Some(c) if c.kind == PieceKind::King => {
                info!("{active} captured the {} king with {request}", active.opposite());
                Phase::End
            }
            _ => Phase::turn_of(active.opposite()),
        };
        debug!("{request} played, phase is now {}", self.phase);

        Ok(MoveOutcome {
            moved,
            captured,
            phase: self.phase,
        })
    }

    /// Stops the game. Ending an ended game does nothing.
    pub fn end(&mut self) -> Result<(), ChessError> {
        match self.phase {
            Phase::Ready => Err(ChessError::GameNotStarted),
            _ => {
                self.phase = Phase::End;
                Ok(())
            }
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::End
    }

    pub fn next_turn(&self) -> Option<Color> {
        self.phase.active_color()
    }

    /// The side whose king is still standing once the other king was taken
    pub fn winner(&self) -> Option<Color> {
        if !self.is_finished() {
            return None;
        }

        match (
            self.board.king_position(Color::White),
            self.board.king_position(Color::Black),
        ) {
            (Some(_), None) => Some(Color::White),
            (None, Some(_)) => Some(Color::Black),
            _ => None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::start()
    }
}

#[cfg(test)]
mod game_tests {
    use crate::position::Position;

    use super::*;

    fn request(source: &str, target: &str) -> MoveRequest {
        MoveRequest::parse(source, target).unwrap()
    }

    fn started() -> GameState {
        let mut game = GameState::start();
        game.begin().unwrap();
        game
    }

    #[test]
    pub fn start_is_ready_with_full_board() {
        let game = GameState::start();

        assert_eq!(Phase::Ready, game.phase());
        assert_eq!(&Board::initial(), game.board());
        assert!(!game.is_finished());
        assert_eq!(None, game.next_turn());
    }

    #[test]
    pub fn moves_are_refused_before_begin() {
        let mut game = GameState::start();

        assert_eq!(Err(ChessError::GameNotStarted), game.apply_move(request("a2", "a4")));
        assert_eq!(GameState::start(), game);
    }

    #[test]
    pub fn white_double_step_hands_turn_to_black() {
        let mut game = started();

        let outcome = game.apply_move(request("a2", "a4")).unwrap();

        assert_eq!(Phase::BlackTurn, outcome.phase);
        assert_eq!(None, outcome.captured);
        assert_eq!(Phase::BlackTurn, game.phase());
        assert_eq!(Some(Color::Black), game.next_turn());
    }

    #[test]
    pub fn turns_alternate_strictly() {
        let mut game = started();

        for (source, target, expected) in [
            ("e2", "e4", Phase::BlackTurn),
            ("e7", "e5", Phase::WhiteTurn),
            ("g1", "f3", Phase::BlackTurn),
            ("b8", "c6", Phase::WhiteTurn),
        ] {
            assert_eq!(expected, game.apply_move(request(source, target)).unwrap().phase);
        }
    }

    #[test]
    pub fn wrong_color_is_refused_without_mutation() {
        let mut game = started();
        let before = game.clone();

        assert_eq!(
            Err(ChessError::WrongTurn {
                square: String::from("a7"),
                expected: Color::White,
                actual: Color::Black
            }),
            game.apply_move(request("a7", "a5"))
        );
        assert_eq!(before, game);

        game.apply_move(request("a2", "a3")).unwrap();
        let before = game.clone();
        assert!(matches!(
            game.apply_move(request("b2", "b3")),
            Err(ChessError::WrongTurn { .. })
        ));
        assert_eq!(before, game);
    }

    #[test]
    pub fn illegal_move_keeps_phase() {
        let mut game = started();

        assert!(matches!(
            game.apply_move(request("a2", "b2")),
            Err(ChessError::IllegalMove { .. })
        ));
        assert_eq!(Phase::WhiteTurn, game.phase());
        assert_eq!(&Board::initial(), game.board());
    }

    #[test]
    pub fn empty_source_is_reported_before_turn() {
        let mut game = started();

        assert_eq!(
            Err(ChessError::NoPieceAtSource(String::from("e5"))),
            game.apply_move(request("e5", "e6"))
        );
    }

    #[test]
    pub fn capturing_the_king_ends_the_game() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4RK2").unwrap();
        let mut game = GameState::from_parts(board, Phase::WhiteTurn);

        let outcome = game.apply_move(request("e1", "e8")).unwrap();

        assert_eq!(Some(Piece::new(Color::Black, PieceKind::King)), outcome.captured);
        assert_eq!(Phase::End, outcome.phase);
        assert!(game.is_finished());
        assert_eq!(Some(Color::White), game.winner());
        assert_eq!(Err(ChessError::GameAlreadyFinished), game.apply_move(request("f1", "f2")));
    }

    #[test]
    pub fn ordinary_capture_does_not_end_the_game() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/q3RK2").unwrap();
        let mut game = GameState::from_parts(board, Phase::BlackTurn);

        let outcome = game.apply_move(request("a1", "e1")).unwrap();

        assert_eq!(Some(Piece::new(Color::White, PieceKind::Rook)), outcome.captured);
        assert_eq!(Phase::WhiteTurn, game.phase());
        assert_eq!(None, game.winner());
        assert_eq!(
            Some(Piece::new(Color::Black, PieceKind::Queen)),
            game.board().piece_at(Position::parse("e1").unwrap())
        );
    }

    #[test]
    pub fn end_is_idempotent() {
        let mut game = started();

        game.end().unwrap();
        assert_eq!(Phase::End, game.phase());
        game.end().unwrap();
        assert_eq!(Phase::End, game.phase());
        assert!(game.is_finished());
        assert_eq!(None, game.winner());
        assert_eq!(Err(ChessError::GameAlreadyFinished), game.begin());
    }

    #[test]
    pub fn end_before_begin_is_refused() {
        let mut game = GameState::start();

        assert_eq!(Err(ChessError::GameNotStarted), game.end());
        assert_eq!(Phase::Ready, game.phase());
    }

    #[test]
    pub fn phase_labels_round_trip() {
        for phase in [Phase::Ready, Phase::WhiteTurn, Phase::BlackTurn, Phase::End] {
            assert_eq!(phase, phase.label().parse().unwrap());
        }

        assert_eq!(
            Err(ChessError::UnknownPhase(String::from("Paused"))),
            "Paused".parse::<Phase>()
        );
    }
}
