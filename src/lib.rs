pub mod board;
pub mod console;
pub mod difficulty;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod search;

pub use board::{Board, Color, Piece, PieceType, Position};
pub use difficulty::Difficulty;
pub use error::{ChessError, ChessResult};
pub use movegen::{GameStatus, Move, MoveCandidate, MoveGenerator};
pub use search::Search;

/// The standard starting position.
pub fn initial_board() -> Board {
    Board::new()
}

/// Squares the piece on `from` may legally move to. Empty if the square
/// is empty or the piece has no legal move.
pub fn legal_destinations(board: &Board, from: Position) -> Vec<Position> {
    MoveGenerator::new().legal_destinations(board, from)
}

/// Applies a move and returns the new board with its record. Fails if
/// `from` is empty, `to` is off the board or `to == from`; `board` is
/// never modified.
pub fn apply_move(board: &Board, from: Position, to: Position) -> ChessResult<(Board, Move)> {
    board.make_move(from, to)
}

pub fn classify(board: &Board, to_move: Color) -> GameStatus {
    MoveGenerator::new().game_status(board, to_move)
}

/// The computer's choice for `color`, or `None` if it has no legal move.
pub fn computer_move(board: &Board, color: Color, difficulty: &Difficulty) -> Option<MoveCandidate> {
    Search::new().select_move(board, color, difficulty)
}
