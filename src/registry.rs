use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::{
    board::Board,
    error::ChessError,
    evaluate::Scores,
    game::{GameState, MoveOutcome, Phase},
    manager,
    moves::MoveRequest,
    piece::{Color, Piece, PieceKind},
    position::Position,
};

const MAX_NAME_CHARS: usize = 12;

/// One occupied square the way it is written to storage
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PieceRecord {
    pub file: u8,
    pub rank: u8,
    pub kind: PieceKind,
    pub color: Color,
}

/// Everything needed to store a game and load it back. Scores are not stored.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GameSnapshot {
    pub id: u64,
    pub name: String,
    pub phase: String,
    pub pieces: Vec<PieceRecord>,
}

impl GameSnapshot {
    pub fn capture(id: u64, name: &str, game: &GameState) -> GameSnapshot {
        GameSnapshot {
            id,
            name: String::from(name),
            phase: String::from(game.phase().label()),
            pieces: game
                .board()
                .pieces()
                .map(|(position, piece)| PieceRecord {
                    file: position.file(),
                    rank: position.rank(),
                    kind: piece.kind,
                    color: piece.color,
                })
                .collect(),
        }
    }

    pub fn to_game(&self) -> Result<GameState, ChessError> {
        let phase: Phase = self.phase.parse()?;
        let mut board = Board::empty();

        for record in &self.pieces {
            let position = Position::new(record.file, record.rank)
                .ok_or_else(|| ChessError::InvalidPosition(format!("{},{}", record.file, record.rank)))?;
            board.place(position, Piece::new(record.color, record.kind))?;
        }

        Ok(GameState::from_parts(board, phase))
    }
}

#[derive(Debug, Clone)]
struct StoredGame {
    name: String,
    state: GameState,
}

/// Games kept in memory by id. Every mutating call takes `&mut self`, so one move at a time per registry.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: BTreeMap<u64, StoredGame>,
    next_id: u64,
}

impl GameRegistry {
    pub fn new() -> GameRegistry {
        GameRegistry {
            games: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn create(&mut self, name: &str) -> Result<u64, ChessError> {
        self.insert(name, manager::create())
    }

    /// A new game starting from the piece placement of a FEN instead of the usual setup
    pub fn create_from_fen(&mut self, name: &str, fen: &str) -> Result<u64, ChessError> {
        let board = Board::from_fen(fen)?;
        self.insert(name, GameState::from_parts(board, Phase::Ready))
    }

    fn insert(&mut self, name: &str, state: GameState) -> Result<u64, ChessError> {
        let name = self.validate_name(name, None)?;

        let id = self.next_id.max(1);
        self.next_id = id.checked_add(1).ok_or_else(|| ChessError::InvalidGameId(id.to_string()))?;
        info!("Created game {id} '{name}'");
        self.games.insert(id, StoredGame { name, state });

        Ok(id)
    }

    /// Trimmed name if it fits and no other game uses it. `replacing` is the id whose name may be reused.
    fn validate_name(&self, name: &str, replacing: Option<u64>) -> Result<String, ChessError> {
        let name = name.trim();
        let length = name.chars().count();
        if length == 0 || length > MAX_NAME_CHARS {
            return Err(ChessError::InvalidGameName(String::from(name)));
        }

        if self
            .games
            .iter()
            .any(|(id, g)| Some(*id) != replacing && g.name == name)
        {
            return Err(ChessError::DuplicateGameName(String::from(name)));
        }

        Ok(String::from(name))
    }

    pub fn load(&self, id: u64) -> Result<&GameState, ChessError> {
        self.games.get(&id).map(|g| &g.state).ok_or(ChessError::GameNotFound(id))
    }

    fn load_mut(&mut self, id: u64) -> Result<&mut GameState, ChessError> {
        self.games
            .get_mut(&id)
            .map(|g| &mut g.state)
            .ok_or(ChessError::GameNotFound(id))
    }

    pub fn name(&self, id: u64) -> Result<&str, ChessError> {
        self.games
            .get(&id)
            .map(|g| g.name.as_str())
            .ok_or(ChessError::GameNotFound(id))
    }

    pub fn begin(&mut self, id: u64) -> Result<Phase, ChessError> {
        let game = self.load_mut(id)?;
        game.begin()?;
        Ok(game.phase())
    }

    /// Squares are parsed before the game is looked up
    pub fn make_move(&mut self, id: u64, source: &str, target: &str) -> Result<MoveOutcome, ChessError> {
        let request = MoveRequest::parse(source, target)?;
        let game = self.load_mut(id)?;
        if game.is_finished() {
            return Err(ChessError::GameAlreadyFinished);
        }

        match manager::make_move(game, request) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!("Game {id} rejected {request}: {e}");
                Err(e)
            }
        }
    }

    pub fn scores(&self, id: u64) -> Result<Scores, ChessError> {
        Ok(manager::scores(self.load(id)?))
    }

    pub fn end(&mut self, id: u64) -> Result<Phase, ChessError> {
        let game = self.load_mut(id)?;
        game.end()?;
        info!("Game {id} ended");
        Ok(game.phase())
    }

    /// Puts the pieces back and waits for a new first move
    pub fn reset(&mut self, id: u64) -> Result<(), ChessError> {
        let game = self.load_mut(id)?;
        *game = manager::create();
        debug!("Game {id} reset");
        Ok(())
    }

    /// (id, name, phase) ordered by id
    pub fn list(&self) -> Vec<(u64, &str, Phase)> {
        self.games
            .iter()
            .map(|(id, g)| (*id, g.name.as_str(), g.state.phase()))
            .collect()
    }

    pub fn snapshot(&self, id: u64) -> Result<GameSnapshot, ChessError> {
        let stored = self.games.get(&id).ok_or(ChessError::GameNotFound(id))?;
        Ok(GameSnapshot::capture(id, &stored.name, &stored.state))
    }

    /// Loads a stored game, replacing any game with the same id. The name follows the same rules as `create`.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<(), ChessError> {
        let following = snapshot
            .id
            .checked_add(1)
            .ok_or_else(|| ChessError::InvalidGameId(snapshot.id.to_string()))?;
        let name = self.validate_name(&snapshot.name, Some(snapshot.id))?;
        let state = snapshot.to_game()?;

        self.games.insert(snapshot.id, StoredGame { name, state });
        self.next_id = self.next_id.max(following);
        debug!("Restored game {}", snapshot.id);

        Ok(())
    }
}
