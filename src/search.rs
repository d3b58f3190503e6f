use crate::board::{Board, Color};
use crate::difficulty::Difficulty;
use crate::evaluation::Evaluator;
use crate::movegen::{MoveCandidate, MoveGenerator};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Score of a mated side, from the root's point of view.
pub const MATE_SCORE: f64 = 10000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub best: Option<MoveCandidate>,
    pub score: f64,
    pub nodes: u64,
}

/// Depth-limited minimax with alpha-beta pruning.
///
/// Scores are always from the root color's perspective: the root side
/// maximizes, the opponent minimizes. Among equal scores the first move in
/// generation order wins.
pub struct Search {
    evaluator: Evaluator,
    move_generator: MoveGenerator,
    rng: StdRng,
    pruning: bool,
    stop: Option<Arc<AtomicBool>>,
    nodes_searched: u64,
}

impl Search {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A search whose random choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            evaluator: Evaluator::new(),
            move_generator: MoveGenerator::new(),
            rng,
            pruning: true,
            stop: None,
            nodes_searched: 0,
        }
    }

    /// Cooperative cancellation. The flag is only read between root moves,
    /// so a stopped search still returns the best move found so far.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn set_pruning(&mut self, enabled: bool) {
        self.pruning = enabled;
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Picks the computer's move for `color`, or `None` if it has no legal
    /// move. With probability `difficulty.randomness` a uniformly random
    /// legal move is played without searching.
    pub fn select_move(
        &mut self,
        board: &Board,
        color: Color,
        difficulty: &Difficulty,
    ) -> Option<MoveCandidate> {
        let moves = self.move_generator.legal_moves(board, color);
        if moves.is_empty() {
            debug!(%color, "no legal moves to choose from");
            return None;
        }

        if difficulty.randomness > 0.0 && self.rng.gen::<f64>() < difficulty.randomness {
            let mv = moves.choose(&mut self.rng).copied();
            debug!(%color, difficulty = %difficulty.name, mv = ?mv, "playing a random move");
            return mv;
        }

        let outcome = self.search(board, color, difficulty.search_depth);
        match outcome.best {
            Some(mv) => Some(mv),
            None => {
                debug!(%color, "search found no move, falling back to a random one");
                moves.choose(&mut self.rng).copied()
            }
        }
    }

    /// Runs the search to `depth` plies and reports the best root move.
    pub fn search(&mut self, board: &Board, color: Color, depth: u32) -> SearchOutcome {
        self.nodes_searched = 0;
        let start_time = Instant::now();

        if depth == 0 {
            self.nodes_searched = 1;
            return SearchOutcome {
                best: None,
                score: self.evaluator.evaluate(board, color),
                nodes: 1,
            };
        }

        let moves = self.move_generator.legal_moves(board, color);
        if moves.is_empty() {
            self.nodes_searched = 1;
            return SearchOutcome {
                best: None,
                score: self.dead_end_score(board, color, true),
                nodes: 1,
            };
        }

        let mut best_move = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for (i, mv) in moves.into_iter().enumerate() {
            if i > 0 && self.is_stopped() {
                debug!(searched = i, "search stopped early");
                break;
            }

            let Ok((next, _)) = board.make_move(mv.from, mv.to) else {
                continue;
            };
            let score = self.minimax(&next, depth - 1, color, false, alpha, beta);
            trace!(mv = %mv, score, "root move scored");

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
        }

        self.nodes_searched += 1;
        debug!(
            %color,
            depth,
            nodes = self.nodes_searched,
            score = best_score,
            best = ?best_move.map(|mv| mv.to_string()),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "search finished"
        );

        SearchOutcome {
            best: best_move,
            score: best_score,
            nodes: self.nodes_searched,
        }
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        root: Color,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        self.nodes_searched += 1;

        if depth == 0 {
            return self.evaluator.evaluate(board, root);
        }

        let side = if maximizing { root } else { root.opposite() };
        let moves = self.move_generator.legal_moves(board, side);
        if moves.is_empty() {
            return self.dead_end_score(board, side, maximizing);
        }

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for mv in moves {
                let Ok((next, _)) = board.make_move(mv.from, mv.to) else {
                    continue;
                };
                let score = self.minimax(&next, depth - 1, root, false, alpha, beta);
                best = best.max(score);
                alpha = alpha.max(score);
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for mv in moves {
                let Ok((next, _)) = board.make_move(mv.from, mv.to) else {
                    continue;
                };
                let score = self.minimax(&next, depth - 1, root, true, alpha, beta);
                best = best.min(score);
                beta = beta.min(score);
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// `side` has no legal move: mate is scored against whoever is mated,
    /// stalemate is zero.
    fn dead_end_score(&self, board: &Board, side: Color, maximizing: bool) -> f64 {
        if !self.move_generator.is_in_check(board, side) {
            0.0
        } else if maximizing {
            -MATE_SCORE
        } else {
            MATE_SCORE
        }
    }

    fn is_stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}
