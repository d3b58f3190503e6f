use crate::board::{Board, Color, PieceType, Position};
use crate::movegen::MoveGenerator;

const CENTER_SQUARES: [Position; 4] = [
    Position::new(3, 3),
    Position::new(3, 4),
    Position::new(4, 3),
    Position::new(4, 4),
];

/// Static scoring of a position. Scores are in pawns, higher is better for
/// the color being evaluated.
#[derive(Debug, Clone)]
pub struct Evaluator {
    // Piece values
    pub pawn_value: f64,
    pub knight_value: f64,
    pub bishop_value: f64,
    pub rook_value: f64,
    pub queen_value: f64,
    pub king_value: f64,

    // Positional terms
    pub center_occupation_bonus: f64,
    pub doubled_pawn_penalty: f64,
    pub check_bonus: f64,

    move_generator: MoveGenerator,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 1.0,
            knight_value: 3.0,
            bishop_value: 3.0,
            rook_value: 5.0,
            queen_value: 9.0,
            king_value: 0.0,

            center_occupation_bonus: 0.3,
            doubled_pawn_penalty: 0.2,
            check_bonus: 0.5,

            move_generator: MoveGenerator::new(),
        }
    }

    pub fn evaluate(&self, board: &Board, color: Color) -> f64 {
        self.material(board, color)
            + self.center_control(board, color)
            + self.pawn_structure(board, color)
            + self.king_safety(board, color)
    }

    pub fn piece_value(&self, kind: PieceType) -> f64 {
        match kind {
            PieceType::Pawn => self.pawn_value,
            PieceType::Knight => self.knight_value,
            PieceType::Bishop => self.bishop_value,
            PieceType::Rook => self.rook_value,
            PieceType::Queen => self.queen_value,
            PieceType::King => self.king_value,
        }
    }

    fn material(&self, board: &Board, color: Color) -> f64 {
        board
            .occupied()
            .map(|(_, piece)| sign(piece.color, color) * self.piece_value(piece.kind))
            .sum()
    }

    fn center_control(&self, board: &Board, color: Color) -> f64 {
        CENTER_SQUARES
            .iter()
            .filter_map(|&sq| board.get(sq))
            .map(|piece| sign(piece.color, color) * self.center_occupation_bonus)
            .sum()
    }

    /// Doubled pawns cost their owner: our own doubled files lower the
    /// score, the opponent's raise it.
    fn pawn_structure(&self, board: &Board, color: Color) -> f64 {
        let mut files = [[0u32; 8]; 2];
        for (pos, piece) in board.occupied() {
            if piece.kind == PieceType::Pawn {
                let side = if piece.color == Color::White { 0 } else { 1 };
                files[side][pos.col as usize] += 1;
            }
        }

        let doubled = |side: usize| -> f64 {
            files[side]
                .iter()
                .filter(|&&count| count > 1)
                .map(|&count| self.doubled_pawn_penalty * (count - 1) as f64)
                .sum()
        };

        let (own, other) = match color {
            Color::White => (doubled(0), doubled(1)),
            Color::Black => (doubled(1), doubled(0)),
        };
        other - own
    }

    fn king_safety(&self, board: &Board, color: Color) -> f64 {
        let mut score = 0.0;
        if self.move_generator.is_in_check(board, color) {
            score -= self.check_bonus;
        }
        if self.move_generator.is_in_check(board, color.opposite()) {
            score += self.check_bonus;
        }
        score
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn sign(owner: Color, perspective: Color) -> f64 {
    if owner == perspective {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    const EPS: f64 = 1e-9;

    fn place(board: Board, square: &str, kind: PieceType, color: Color) -> Board {
        board.with_piece(square.parse().unwrap(), Some(Piece::new(kind, color)))
    }

    #[test]
    fn initial_position_is_balanced() {
        let evaluator = Evaluator::new();
        let board = Board::new();
        assert!(evaluator.evaluate(&board, Color::White).abs() < EPS);
        assert!(evaluator.evaluate(&board, Color::Black).abs() < EPS);
    }

    #[test]
    fn material_counts_for_both_sides() {
        let evaluator = Evaluator::new();
        let board = place(Board::empty(), "a8", PieceType::King, Color::Black);
        let board = place(board, "h1", PieceType::King, Color::White);
        let board = place(board, "b1", PieceType::Rook, Color::White);
        let board = place(board, "g8", PieceType::Knight, Color::Black);

        assert!((evaluator.evaluate(&board, Color::White) - 2.0).abs() < EPS);
        assert!((evaluator.evaluate(&board, Color::Black) + 2.0).abs() < EPS);
    }

    #[test]
    fn center_occupation() {
        let evaluator = Evaluator::new();
        let board = place(Board::empty(), "e4", PieceType::Knight, Color::White);
        let board = place(board, "d5", PieceType::Knight, Color::Black);
        let board = place(board, "d4", PieceType::Knight, Color::White);

        // 3 + 3 - 3 material, 0.3 + 0.3 - 0.3 center
        assert!((evaluator.evaluate(&board, Color::White) - 3.3).abs() < EPS);
    }

    #[test]
    fn doubled_pawns_penalize_their_owner() {
        let evaluator = Evaluator::new();
        let board = place(Board::empty(), "a2", PieceType::Pawn, Color::Black);
        let board = place(board, "a3", PieceType::Pawn, Color::Black);
        let board = place(board, "a6", PieceType::Pawn, Color::Black);
        let board = place(board, "h6", PieceType::Pawn, Color::White);
        let board = place(board, "h7", PieceType::Pawn, Color::White);

        // material: black +1; black doubled 0.4, white doubled 0.2
        let black = evaluator.evaluate(&board, Color::Black);
        let white = evaluator.evaluate(&board, Color::White);
        assert!((black - (1.0 - 0.4 + 0.2)).abs() < EPS);
        assert!((white + black).abs() < EPS);
    }

    #[test]
    fn check_term() {
        let evaluator = Evaluator::new();
        let board = place(Board::empty(), "e1", PieceType::King, Color::White);
        let board = place(board, "e8", PieceType::King, Color::Black);
        let board = place(board, "e6", PieceType::Rook, Color::White);

        // black is in check from the rook
        assert!((evaluator.evaluate(&board, Color::White) - 5.5).abs() < EPS);
        assert!((evaluator.evaluate(&board, Color::Black) + 5.5).abs() < EPS);
    }
}
