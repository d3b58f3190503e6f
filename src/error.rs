//! Error types for the chess core and the game session built on it.

use crate::board::{Color, Position};
use crate::movegen::GameStatus;

/// Errors that can occur while applying moves or configuring a game
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChessError {
    /// A move was requested from a square with no piece on it
    #[error("no piece at {0}")]
    EmptySquare(Position),

    /// A square outside the 8x8 grid was used as a destination
    #[error("position ({}, {}) is off the board", .0.row, .0.col)]
    OffBoard(Position),

    /// The destination is not a legal move for the selected piece
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    /// The selected piece belongs to the side not on move
    #[error("the piece at {0} belongs to the other side")]
    NotYourPiece(Position),

    /// The game has already ended
    #[error("the game is over ({0})")]
    GameOver(GameStatus),

    /// The side asked to move has nothing legal to play
    #[error("{0} has no legal moves")]
    NoLegalMoves(Color),

    #[error("nothing to undo")]
    NothingToUndo,

    /// Square notation could not be parsed
    #[error("invalid square {0:?}, expected a1..h8")]
    InvalidSquare(String),

    #[error("unknown difficulty {0:?}, expected easy, medium or hard")]
    UnknownDifficulty(String),

    /// A difficulty tier with out-of-range parameters
    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),
}

/// Result type alias for chess operations
pub type ChessResult<T> = Result<T, ChessError>;
