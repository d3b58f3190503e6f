//! A human-versus-computer game session.
//!
//! The chess core itself is stateless; this is the thin layer that owns
//! the current board, whose turn it is, the move history and the undo
//! stack, and drives the search when the computer is on move.

use tracing::info;

use crate::board::{Board, Color, Position};
use crate::difficulty::Difficulty;
use crate::error::{ChessError, ChessResult};
use crate::movegen::{GameStatus, Move, MoveGenerator};
use crate::search::Search;

pub struct Game {
    board: Board,
    to_move: Color,
    human: Color,
    difficulty: Difficulty,
    history: Vec<Move>,
    snapshots: Vec<(Board, Color)>,
    move_generator: MoveGenerator,
    search: Search,
}

impl Game {
    pub fn new(human: Color, difficulty: Difficulty) -> Self {
        Self::with_search(human, difficulty, Search::new())
    }

    pub fn with_search(human: Color, difficulty: Difficulty, search: Search) -> Self {
        Self {
            board: Board::new(),
            to_move: Color::White,
            human,
            difficulty,
            history: Vec::new(),
            snapshots: Vec::new(),
            move_generator: MoveGenerator::new(),
            search,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(difficulty = %difficulty, "difficulty changed");
        self.difficulty = difficulty;
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn status(&self) -> GameStatus {
        self.move_generator.game_status(&self.board, self.to_move)
    }

    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    pub fn is_computer_to_move(&self) -> bool {
        self.to_move != self.human && !self.is_over()
    }

    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        self.move_generator.legal_destinations(&self.board, from)
    }

    /// Plays a human move.
    pub fn play(&mut self, from: Position, to: Position) -> ChessResult<Move> {
        let status = self.status();
        if status.is_over() {
            return Err(ChessError::GameOver(status));
        }

        let piece = self.board.get(from).ok_or(ChessError::EmptySquare(from))?;
        if piece.color != self.to_move || self.to_move != self.human {
            return Err(ChessError::NotYourPiece(from));
        }
        if !self.legal_destinations(from).contains(&to) {
            return Err(ChessError::IllegalMove { from, to });
        }

        self.commit(from, to)
    }

    /// Lets the computer pick and play a move for the side on move.
    pub fn computer_turn(&mut self) -> ChessResult<Move> {
        let status = self.status();
        if status.is_over() {
            return Err(ChessError::GameOver(status));
        }

        let candidate = self
            .search
            .select_move(&self.board, self.to_move, &self.difficulty)
            .ok_or(ChessError::NoLegalMoves(self.to_move))?;
        self.commit(candidate.from, candidate.to)
    }

    fn commit(&mut self, from: Position, to: Position) -> ChessResult<Move> {
        let (board, mv) = self.board.make_move(from, to)?;
        let previous = std::mem::replace(&mut self.board, board);
        self.snapshots.push((previous, self.to_move));
        self.history.push(mv);
        self.to_move = self.to_move.opposite();

        info!(
            mv = %mv,
            ply = self.history.len(),
            status = %self.status(),
            "move played"
        );
        Ok(mv)
    }

    /// Takes back the human's last move together with the computer's
    /// reply. Returns the number of plies removed.
    pub fn undo(&mut self) -> ChessResult<usize> {
        if self.snapshots.is_empty() {
            return Err(ChessError::NothingToUndo);
        }

        let wanted = if self.to_move == self.human { 2 } else { 1 };
        let plies = wanted.min(self.snapshots.len());
        for _ in 0..plies {
            if let Some((board, to_move)) = self.snapshots.pop() {
                self.board = board;
                self.to_move = to_move;
                self.history.pop();
            }
        }

        info!(plies, remaining = self.history.len(), "moves taken back");
        Ok(plies)
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = Color::White;
        self.history.clear();
        self.snapshots.clear();
        info!(human = %self.human, "new game");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn game() -> Game {
        Game::with_search(
            Color::White,
            Difficulty::new("Test", 1, 0.0).unwrap(),
            Search::with_seed(11),
        )
    }

    #[test]
    fn human_move_then_computer_reply() {
        let mut game = game();
        let mv = game.play(sq("e2"), sq("e4")).unwrap();
        assert_eq!(mv.to_string(), "e2-e4");
        assert_eq!(game.to_move(), Color::Black);
        assert!(game.is_computer_to_move());

        let reply = game.computer_turn().unwrap();
        assert_eq!(reply.piece.color, Color::Black);
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn rejects_bad_requests() {
        let mut game = game();
        assert_eq!(
            game.play(sq("e4"), sq("e5")),
            Err(ChessError::EmptySquare(sq("e4")))
        );
        assert_eq!(
            game.play(sq("e7"), sq("e5")),
            Err(ChessError::NotYourPiece(sq("e7")))
        );
        assert_eq!(
            game.play(sq("e2"), sq("e5")),
            Err(ChessError::IllegalMove { from: sq("e2"), to: sq("e5") })
        );
        assert_eq!(game.board(), &Board::new());
        assert!(game.history().is_empty());
    }

    #[test]
    fn undo_takes_back_a_full_turn() {
        let mut game = game();
        assert_eq!(game.undo(), Err(ChessError::NothingToUndo));

        game.play(sq("d2"), sq("d4")).unwrap();
        game.computer_turn().unwrap();
        assert_eq!(game.undo(), Ok(2));
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.to_move(), Color::White);

        game.play(sq("d2"), sq("d4")).unwrap();
        assert_eq!(game.undo(), Ok(1));
        assert!(game.history().is_empty());
    }

    #[test]
    fn computer_can_open_as_white() {
        let mut game = Game::with_search(Color::Black, Difficulty::easy(), Search::with_seed(2));
        assert!(game.is_computer_to_move());
        let mv = game.computer_turn().unwrap();
        assert_eq!(mv.piece.color, Color::White);

        game.reset();
        assert!(game.history().is_empty());
        assert_eq!(game.to_move(), Color::White);
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut game = Game::with_search(Color::White, Difficulty::easy(), Search::with_seed(4));
        game.play(sq("f2"), sq("f3")).unwrap();
        game.commit(sq("e7"), sq("e5")).unwrap();
        game.play(sq("g2"), sq("g4")).unwrap();
        game.commit(sq("d8"), sq("h4")).unwrap();

        assert_eq!(game.status(), GameStatus::Checkmate);
        assert!(!game.is_computer_to_move());
        assert_eq!(
            game.play(sq("a2"), sq("a3")),
            Err(ChessError::GameOver(GameStatus::Checkmate))
        );
    }
}
