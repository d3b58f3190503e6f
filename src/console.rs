use crate::board::Position;
use crate::difficulty::Difficulty;
use crate::game::Game;
use crate::movegen::GameStatus;
use anyhow::{anyhow, bail, Context, Result};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use tracing::warn;

const HELP: &str = "\
commands:
  board                     show the board
  status                    game status and side to move
  moves <square>            legal destinations of the piece on <square>
  move <from> <to>          play a move (also: move e2e4, or just e2e4)
  go                        let the computer move for the side on move
  undo                      take back your last move and the reply
  difficulty [name]         show or set the difficulty (easy, medium, hard)
  difficulty <depth> <p>    custom search depth and randomness
  history                   list the moves played
  new                       start a new game
  quit                      leave
";

/// Line-oriented text front end over a [`Game`].
pub struct Console {
    game: Game,
}

impl Console {
    pub fn new(game: Game) -> Self {
        Console { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        writeln!(stdout, "{}\n{}", self.game.board(), self.status_line())?;
        if self.game.is_computer_to_move() {
            write!(stdout, "{}", self.reply()?)?;
        }
        stdout.flush()?;

        while reader.read_line(&mut line).context("failed to read from stdin")? > 0 {
            let command = line.trim();
            if command == "quit" || command == "exit" {
                break;
            }

            match self.handle_command(command) {
                Ok(response) => write!(stdout, "{}", response)?,
                Err(err) => {
                    warn!(command, error = %err, "command failed");
                    writeln!(stdout, "error: {:#}", err)?;
                }
            }

            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((&head, args)) = parts.split_first() else {
            return Ok(String::new());
        };

        match head {
            "help" | "?" => Ok(HELP.to_string()),
            "board" | "show" => Ok(format!("{}\n", self.game.board())),
            "status" => Ok(format!("{}\n", self.status_line())),
            "moves" => self.handle_moves(args),
            "move" => self.handle_move(args),
            "go" => self.handle_go(),
            "undo" => self.handle_undo(),
            "difficulty" => self.handle_difficulty(args),
            "history" => Ok(self.handle_history()),
            "new" | "newgame" => {
                self.game.reset();
                let mut out = format!("{}\n{}\n", self.game.board(), self.status_line());
                if self.game.is_computer_to_move() {
                    out.push_str(&self.reply()?);
                }
                Ok(out)
            }
            "quit" | "exit" => Ok(String::new()),
            other if parse_move(other).is_some() => self.handle_move(&parts),
            other => Err(anyhow!("unknown command {:?}, try 'help'", other)),
        }
    }

    fn handle_moves(&self, args: &[&str]) -> Result<String> {
        let square = args.first().context("usage: moves <square>")?;
        let from: Position = square.parse()?;
        let destinations = self.game.legal_destinations(from);
        if destinations.is_empty() {
            return Ok(format!("{}: no legal moves\n", from));
        }

        let list: Vec<String> = destinations.iter().map(|p| p.to_string()).collect();
        Ok(format!("{}: {}\n", from, list.join(" ")))
    }

    fn handle_move(&mut self, args: &[&str]) -> Result<String> {
        let (from, to) = match args {
            [joined] => parse_move(joined).context("expected a move like e2e4")?,
            [from, to] => (from.parse()?, to.parse()?),
            _ => bail!("usage: move <from> <to>"),
        };

        let mv = self.game.play(from, to)?;
        let mut out = format!("you played {}\n", mv);
        if self.game.is_computer_to_move() {
            out.push_str(&self.reply()?);
        } else {
            writeln!(out, "{}\n{}", self.game.board(), self.status_line())?;
        }
        Ok(out)
    }

    fn handle_go(&mut self) -> Result<String> {
        let mut out = String::new();
        let mv = self.game.computer_turn()?;
        writeln!(out, "computer played {}", mv)?;
        writeln!(out, "{}\n{}", self.game.board(), self.status_line())?;
        Ok(out)
    }

    fn reply(&mut self) -> Result<String> {
        self.handle_go().context("computer could not move")
    }

    fn handle_undo(&mut self) -> Result<String> {
        let plies = self.game.undo()?;
        Ok(format!(
            "took back {} ply(s)\n{}\n{}\n",
            plies,
            self.game.board(),
            self.status_line()
        ))
    }

    fn handle_difficulty(&mut self, args: &[&str]) -> Result<String> {
        let difficulty = match args {
            [] => return Ok(format!("difficulty: {}\n", self.game.difficulty())),
            [name] => name.parse::<Difficulty>()?,
            [depth, randomness] => {
                let depth = depth.parse().context("depth must be a positive integer")?;
                let randomness = randomness.parse().context("randomness must be a number")?;
                Difficulty::new("Custom", depth, randomness)?
            }
            _ => bail!("usage: difficulty [name | <depth> <randomness>]"),
        };

        self.game.set_difficulty(difficulty);
        Ok(format!("difficulty: {}\n", self.game.difficulty()))
    }

    fn handle_history(&self) -> String {
        let mut out = String::new();
        for (i, pair) in self.game.history().chunks(2).enumerate() {
            let _ = write!(out, "{:>3}. {}", i + 1, pair[0]);
            if let Some(reply) = pair.get(1) {
                let _ = write!(out, "  {}", reply);
            }
            out.push('\n');
        }
        if out.is_empty() {
            out.push_str("no moves yet\n");
        }
        out
    }

    fn status_line(&self) -> String {
        let to_move = self.game.to_move();
        let who = if to_move == self.game.human() { "you" } else { "computer" };
        let mut line = match self.game.status() {
            GameStatus::Checkmate => format!("checkmate, {} wins", to_move.opposite()),
            GameStatus::Stalemate => "stalemate, draw".to_string(),
            status => format!("{} to move ({}), {}", to_move, who, status),
        };
        if let Some(mv) = self.game.last_move() {
            let _ = write!(line, "; last move {}", mv);
        }
        line
    }
}

/// Parses coordinate notation like `e2e4`.
fn parse_move(s: &str) -> Option<(Position, Position)> {
    if s.len() != 4 || !s.is_ascii() {
        return None;
    }
    let from = s[0..2].parse().ok()?;
    let to = s[2..4].parse().ok()?;
    Some((from, to))
}
