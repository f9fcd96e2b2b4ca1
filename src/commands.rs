use log::{debug, error, trace};
use regex::Regex;

use crate::{
    error::ChessError,
    game::Phase,
    manager,
    registry::GameRegistry,
};

pub enum CommandResult {
    /// Lines to show the user
    Output(Vec<String>),
    Quit,
}

pub struct CommandInterface {
    registry: GameRegistry,
    id_command: Regex,
    new_command: Regex,
    move_command: Regex,
}

impl Default for CommandInterface {
    fn default() -> Self {
        CommandInterface::new(GameRegistry::new())
    }
}

impl CommandInterface {
    pub fn new(registry: GameRegistry) -> CommandInterface {
        CommandInterface {
            registry,
            id_command: Regex::new(r"^(show|begin|score|end|reset)\s+([0-9]+)$").unwrap(),
            new_command: Regex::new(r"^new\s+(\S+)(?:\s+(.+))?$").unwrap(),
            move_command: Regex::new(r"^move\s+([0-9]+)\s+(\S+)\s+(\S+)$").unwrap(),
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn process_command(&mut self, cmd: &str) -> CommandResult {
        let cmd = cmd.trim();
        debug!("Received cmd string '{cmd}'");

        let result = match cmd {
            "" => Ok(Vec::new()),
            "quit" => return CommandResult::Quit,
            "games" => Ok(self.list_games()),
            _ => {
                if let Some(captures) = self.move_command.captures(cmd) {
                    self.run_move(&captures[1], &captures[2], &captures[3])
                } else if let Some(captures) = self.id_command.captures(cmd) {
                    self.run_id_command(&captures[1], &captures[2])
                } else if let Some(captures) = self.new_command.captures(cmd) {
                    self.run_new(&captures[1], captures.get(2).map(|m| m.as_str()))
                } else {
                    error!("Unknown cmd '{cmd}'");
                    Ok(vec![format!("unknown command: {cmd}")])
                }
            }
        };

        match result {
            Ok(lines) => CommandResult::Output(lines),
            Err(e) => {
                debug!("cmd '{cmd}' failed: {e:?}");
                CommandResult::Output(vec![format!("error ({}): {e}", e.failure())])
            }
        }
    }

    fn list_games(&self) -> Vec<String> {
        let games = self.registry.list();
        if games.is_empty() {
            return vec![String::from("no games")];
        }

        games
            .into_iter()
            .map(|(id, name, phase)| format!("{id} {name} {phase}"))
            .collect()
    }

    fn run_new(&mut self, name: &str, fen: Option<&str>) -> Result<Vec<String>, ChessError> {
        let id = match fen {
            Some(f) => self.registry.create_from_fen(name, f)?,
            None => self.registry.create(name)?,
        };

        Ok(vec![format!("created game {id} {name}")])
    }

    fn run_move(&mut self, id: &str, source: &str, target: &str) -> Result<Vec<String>, ChessError> {
        let id = parse_id(id)?;
        let outcome = self.registry.make_move(id, source, target)?;
        trace!("Board after move: {:?}", self.registry.load(id)?.board());

        let mut lines = Vec::new();
        match outcome.captured {
            Some(captured) => lines.push(format!("{} {source} takes {captured} on {target}", outcome.moved)),
            None => lines.push(format!("{} {source}-{target}", outcome.moved)),
        }

        let game = self.registry.load(id)?;
        if manager::is_finished(game) {
            match game.winner() {
                Some(color) => lines.push(format!("game over, {color} wins")),
                None => lines.push(String::from("game over")),
            }
        } else {
            lines.push(format!("next {}", outcome.phase));
        }

        Ok(lines)
    }

    fn run_id_command(&mut self, verb: &str, id: &str) -> Result<Vec<String>, ChessError> {
        let id = parse_id(id)?;

        match verb {
            "show" => {
                let game = self.registry.load(id)?;
                let mut lines = vec![format!("{id} {} {}", self.registry.name(id)?, game.phase())];
                lines.extend(game.board().to_string().lines().map(String::from));
                if let Some(color) = manager::next_turn(game) {
                    lines.push(format!("{color} to move"));
                }
                Ok(lines)
            }
            "begin" => Ok(vec![format!("{id} {}", self.registry.begin(id)?)]),
            "score" => {
                let scores = self.registry.scores(id)?;
                let leader = match scores.leader() {
                    Some(color) => format!("{color} leads"),
                    None => String::from("even"),
                };
                Ok(vec![format!("{scores}, {leader}")])
            }
            "end" => Ok(vec![format!("{id} {}", self.registry.end(id)?)]),
            "reset" => {
                self.registry.reset(id)?;
                Ok(vec![format!("{id} {}", Phase::Ready)])
            }
            _ => unreachable!("id command regex only matches known verbs"),
        }
    }
}

fn parse_id(id: &str) -> Result<u64, ChessError> {
    // the regexes only let digits through, so this fails on overflow alone
    id.parse::<u64>().map_err(|_| ChessError::InvalidGameId(String::from(id)))
}

#[cfg(test)]
mod commands_tests {
    use super::*;

    fn run(cli: &mut CommandInterface, cmd: &str) -> Vec<String> {
        match cli.process_command(cmd) {
            CommandResult::Output(lines) => lines,
            CommandResult::Quit => panic!("Unexpected quit for '{cmd}'"),
        }
    }

    #[test]
    pub fn full_session() {
        let mut cli = CommandInterface::default();

        assert_eq!(vec!["no games"], run(&mut cli, "games"));
        assert_eq!(vec!["created game 1 title"], run(&mut cli, "new title"));
        assert_eq!(vec!["1 title Ready"], run(&mut cli, "games"));
        assert_eq!(vec!["white 38.0 black 38.0, even"], run(&mut cli, "score 1"));
        assert_eq!(vec!["white pawn a2-a4", "next BlackTurn"], run(&mut cli, "move 1 a2 a4"));
        assert_eq!(vec!["black pawn b7-b5", "next WhiteTurn"], run(&mut cli, "move 1 b7 b5"));
        assert_eq!(
            vec!["white pawn a4 takes black pawn on b5", "next BlackTurn"],
            run(&mut cli, "move 1 a4 b5")
        );
        assert_eq!(vec!["white 37.0 black 37.0, even"], run(&mut cli, "score 1"));
        assert_eq!(vec!["1 End"], run(&mut cli, "end 1"));
        assert_eq!(
            vec!["error (bad request): The game has already finished"],
            run(&mut cli, "move 1 a7 a6")
        );
        assert!(matches!(cli.process_command("quit"), CommandResult::Quit));
    }

    #[test]
    pub fn errors_are_reported_by_failure_class() {
        let mut cli = CommandInterface::default();
        run(&mut cli, "new title");

        assert_eq!(
            vec!["error (invalid position): 'a9' is not a square on the board"],
            run(&mut cli, "move 1 a9 b7")
        );
        assert_eq!(
            vec!["error (illegal move): The piece on a2 cannot move to b2"],
            run(&mut cli, "move 1 a2 b2")
        );
        assert_eq!(vec!["error (not found): No game with id 7"], run(&mut cli, "score 7"));
        assert_eq!(vec!["unknown command: fly 1"], run(&mut cli, "fly 1"));
        assert!(run(&mut cli, "").is_empty());
    }

    #[test]
    pub fn oversized_id_is_echoed_back() {
        let mut cli = CommandInterface::default();

        assert_eq!(
            vec!["error (bad request): '99999999999999999999' is not a usable game id"],
            run(&mut cli, "score 99999999999999999999")
        );
        assert_eq!(
            vec!["error (bad request): '18446744073709551616' is not a usable game id"],
            run(&mut cli, "move 18446744073709551616 a2 a4")
        );
    }

    #[test]
    pub fn new_accepts_a_full_fen() {
        let mut cli = CommandInterface::default();

        assert_eq!(
            vec!["created game 1 full"],
            run(&mut cli, "new full rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        );
        assert_eq!(vec!["white 38.0 black 38.0, even"], run(&mut cli, "score 1"));
        assert_eq!(
            vec!["error (bad request): Invalid FEN: Expected piece placement to have 8 ranks but it had 2"],
            run(&mut cli, "new broken 8/8 w - - 0 1")
        );
    }

    #[test]
    pub fn show_renders_the_board() {
        let mut cli = CommandInterface::default();
        run(&mut cli, "new title");

        let lines = run(&mut cli, "show 1");

        assert_eq!("1 title Ready", lines[0]);
        assert_eq!("8 rnbqkbnr", lines[1]);
        assert_eq!("  abcdefgh", lines[9]);
    }

    #[test]
    pub fn custom_position_to_king_capture() {
        let mut cli = CommandInterface::default();

        assert_eq!(vec!["created game 1 endgame"], run(&mut cli, "new endgame 4k3/8/8/8/8/8/8/4RK2"));
        assert_eq!(vec!["1 WhiteTurn"], run(&mut cli, "begin 1"));
        assert_eq!(
            vec!["white rook e1 takes black king on e8", "game over, white wins"],
            run(&mut cli, "move 1 e1 e8")
        );
        assert!(cli.registry().load(1).unwrap().is_finished());
        assert_eq!(vec!["1 Ready"], run(&mut cli, "reset 1"));
    }
}
