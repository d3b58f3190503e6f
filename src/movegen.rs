use std::fmt;

use crate::board::{Board, Color, Piece, PieceType, Position};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1),
    (-1, -2), (-1, 2),
    (1, -2), (1, 2),
    (2, -1), (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// A committed move. `piece` is the mover as it was before the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured_piece: Option<Piece>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured_piece.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)
    }
}

/// A `from`/`to` pair produced by the generator, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveCandidate {
    pub from: Position,
    pub to: Position,
}

impl MoveCandidate {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for MoveCandidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            GameStatus::Playing => "playing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        };
        write!(f, "{}", name)
    }
}

/// Move rules and terminal-state detection.
///
/// There are two generator entry points. `pseudo_legal_destinations`
/// follows movement and occupancy rules only and is what the attack scan
/// uses. `legal_destinations` additionally drops moves that leave the
/// mover's king attacked; it calls the attack scan, never itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn pseudo_legal_destinations(&self, board: &Board, from: Position) -> Vec<Position> {
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };

        match piece.kind {
            PieceType::Pawn => self.pawn_moves(board, from, piece.color),
            PieceType::Knight => self.step_moves(board, from, piece.color, &KNIGHT_OFFSETS),
            PieceType::Bishop => self.slide_moves(board, from, piece.color, &DIAGONAL),
            PieceType::Rook => self.slide_moves(board, from, piece.color, &ORTHOGONAL),
            PieceType::Queen => {
                let mut moves = self.slide_moves(board, from, piece.color, &ORTHOGONAL);
                moves.extend(self.slide_moves(board, from, piece.color, &DIAGONAL));
                moves
            }
            PieceType::King => self.step_moves(board, from, piece.color, &KING_OFFSETS),
        }
    }

    pub fn legal_destinations(&self, board: &Board, from: Position) -> Vec<Position> {
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };

        self.pseudo_legal_destinations(board, from)
            .into_iter()
            .filter(|&to| !self.leaves_king_attacked(board, from, to, piece.color))
            .collect()
    }

    /// Every legal move for `color`, in row-major order of the moving piece.
    pub fn legal_moves(&self, board: &Board, color: Color) -> Vec<MoveCandidate> {
        board
            .pieces(color)
            .flat_map(|(from, _)| {
                self.legal_destinations(board, from)
                    .into_iter()
                    .map(move |to| MoveCandidate::new(from, to))
            })
            .collect()
    }

    pub fn has_legal_move(&self, board: &Board, color: Color) -> bool {
        board
            .pieces(color)
            .any(|(from, _)| !self.legal_destinations(board, from).is_empty())
    }

    fn pawn_moves(&self, board: &Board, from: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        let dir = color.forward();

        if let Some(one) = from.offset(dir, 0).filter(|&sq| board.get(sq).is_none()) {
            moves.push(one);
            if from.row == color.pawn_start_row() {
                if let Some(two) = from.offset(2 * dir, 0).filter(|&sq| board.get(sq).is_none()) {
                    moves.push(two);
                }
            }
        }

        for dc in [-1, 1] {
            if let Some(target) = from.offset(dir, dc) {
                if board.get(target).is_some_and(|p| p.color != color) {
                    moves.push(target);
                }
            }
        }

        moves
    }

    fn step_moves(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        offsets: &[(i8, i8)],
    ) -> Vec<Position> {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| board.get(to).map_or(true, |p| p.color != color))
            .collect()
    }

    fn slide_moves(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        directions: &[(i8, i8)],
    ) -> Vec<Position> {
        let mut moves = Vec::new();
        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(next) = current.offset(dr, dc) {
                match board.get(next) {
                    None => moves.push(next),
                    Some(blocker) => {
                        if blocker.color != color {
                            moves.push(next);
                        }
                        break;
                    }
                }
                current = next;
            }
        }
        moves
    }

    /// True if any piece of `attacker` could pseudo-legally move to `square`.
    pub fn is_square_attacked(&self, board: &Board, square: Position, attacker: Color) -> bool {
        board
            .pieces(attacker)
            .any(|(from, _)| self.pseudo_legal_destinations(board, from).contains(&square))
    }

    /// A board without a king of `color` is never in check.
    pub fn is_in_check(&self, board: &Board, color: Color) -> bool {
        match board.find_king(color) {
            Some(king) => self.is_square_attacked(board, king, color.opposite()),
            None => false,
        }
    }

    pub fn is_checkmate(&self, board: &Board, color: Color) -> bool {
        self.is_in_check(board, color) && !self.has_legal_move(board, color)
    }

    pub fn is_stalemate(&self, board: &Board, color: Color) -> bool {
        !self.is_in_check(board, color) && !self.has_legal_move(board, color)
    }

    /// Status of the position with `to_move` on move.
    pub fn game_status(&self, board: &Board, to_move: Color) -> GameStatus {
        let in_check = self.is_in_check(board, to_move);
        let can_move = self.has_legal_move(board, to_move);
        match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Playing,
        }
    }

    fn leaves_king_attacked(&self, board: &Board, from: Position, to: Position, color: Color) -> bool {
        match board.make_move(from, to) {
            Ok((after, _)) => self.is_in_check(&after, color),
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: Board, square: &str, kind: PieceType, color: Color) -> Board {
        let pos = square.parse().unwrap();
        board.with_piece(pos, Some(Piece::new(kind, color)))
    }

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn pawn_double_step_needs_clear_path() {
        let generator = MoveGenerator::new();
        let board = place(Board::new(), "e3", PieceType::Knight, Color::Black);
        assert!(generator.pseudo_legal_destinations(&board, sq("e2")).is_empty());

        let board = place(Board::new(), "e4", PieceType::Knight, Color::Black);
        assert_eq!(generator.pseudo_legal_destinations(&board, sq("e2")), vec![sq("e3")]);
    }

    #[test]
    fn pawn_captures_only_opponents() {
        let generator = MoveGenerator::new();
        let board = Board::empty();
        let board = place(board, "d4", PieceType::Pawn, Color::White);
        let board = place(board, "c5", PieceType::Rook, Color::Black);
        let board = place(board, "e5", PieceType::Rook, Color::White);

        let moves = generator.pseudo_legal_destinations(&board, sq("d4"));
        assert_eq!(moves, vec![sq("d5"), sq("c5")]);
    }

    #[test]
    fn black_pawn_moves_down_the_board() {
        let generator = MoveGenerator::new();
        let moves = generator.pseudo_legal_destinations(&Board::new(), sq("d7"));
        assert_eq!(moves, vec![sq("d6"), sq("d5")]);
    }

    #[test]
    fn knight_in_corner() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "a1", PieceType::Knight, Color::White);
        let mut moves = generator.pseudo_legal_destinations(&board, sq("a1"));
        moves.sort_by_key(|p| (p.row, p.col));
        assert_eq!(moves, vec![sq("b3"), sq("c2")]);
    }

    #[test]
    fn rook_ray_stops_at_blockers() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "d4", PieceType::Rook, Color::White);
        let board = place(board, "d6", PieceType::Pawn, Color::Black);
        let board = place(board, "f4", PieceType::Pawn, Color::White);

        let moves = generator.pseudo_legal_destinations(&board, sq("d4"));
        assert!(moves.contains(&sq("d6")));
        assert!(!moves.contains(&sq("d7")));
        assert!(moves.contains(&sq("e4")));
        assert!(!moves.contains(&sq("f4")));
        // 1 right, 3 left, 3 down, 2 up
        assert_eq!(moves.len(), 9);
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "d4", PieceType::Queen, Color::White);
        assert_eq!(generator.pseudo_legal_destinations(&board, sq("d4")).len(), 27);
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "e1", PieceType::King, Color::White);
        let board = place(board, "d8", PieceType::Rook, Color::Black);

        let moves = generator.legal_destinations(&board, sq("e1"));
        assert!(!moves.iter().any(|p| p.col == 3));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "e1", PieceType::King, Color::White);
        let board = place(board, "e2", PieceType::Bishop, Color::White);
        let board = place(board, "e8", PieceType::Rook, Color::Black);

        assert_eq!(generator.pseudo_legal_destinations(&board, sq("e2")).len(), 9);
        assert!(generator.legal_destinations(&board, sq("e2")).is_empty());
    }

    #[test]
    fn empty_square_has_no_moves() {
        let generator = MoveGenerator::new();
        assert!(generator.legal_destinations(&Board::new(), sq("e4")).is_empty());
        assert!(generator.legal_destinations(&Board::new(), Position::new(9, 9)).is_empty());
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "a1", PieceType::Queen, Color::Black);
        assert!(!generator.is_in_check(&board, Color::White));
        assert_eq!(generator.game_status(&board, Color::White), GameStatus::Stalemate);
    }

    #[test]
    fn check_with_escape() {
        let generator = MoveGenerator::new();
        let board = place(Board::empty(), "e1", PieceType::King, Color::White);
        let board = place(board, "e8", PieceType::Rook, Color::Black);

        assert!(generator.is_in_check(&board, Color::White));
        assert!(!generator.is_checkmate(&board, Color::White));
        assert_eq!(generator.game_status(&board, Color::White), GameStatus::Check);
    }
}
