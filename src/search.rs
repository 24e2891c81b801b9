use std::cmp::Reverse;

use tracing::debug;

use crate::board::{Color, Kind};
use crate::evaluation::Evaluator;
use crate::movegen::Move;
use crate::position::Position;

/// Score of a checkmate. It does not shrink with depth, so a slow mate
/// scores the same as a fast one.
pub const MATE_SCORE: i32 = 1_000_000;

const INFINITY: i32 = MATE_SCORE + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u32,
    pub alpha_beta: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            alpha_beta: true,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_alpha_beta(mut self, alpha_beta: bool) -> Self {
        self.alpha_beta = alpha_beta;
        self
    }
}

pub struct Search {
    evaluator: Evaluator,
    config: SearchConfig,
    nodes_searched: u64,
}

impl Search {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            evaluator: Evaluator::new(),
            config,
            nodes_searched: 0,
        }
    }

    /// Pick a move for `color`, searching the configured depth with
    /// `color` as the maximizing side.
    pub fn find_best_move(&mut self, position: &mut Position, color: Color) -> (i32, Option<Move>) {
        self.nodes_searched = 0;
        let (score, best) = self.minimax(position, color, self.config.depth, true);
        debug!(
            %color,
            depth = self.config.depth,
            nodes = self.nodes_searched,
            score,
            best = ?best.map(|mv| mv.to_string()),
            "search finished"
        );
        (score, best)
    }

    /// Minimax value of `position` with `color` to move, plus the move
    /// that reaches it. Scores are always from the root side's point of
    /// view: the maximizing side wants them high.
    pub fn minimax(&mut self, position: &mut Position, color: Color, depth: u32, maximizing: bool) -> (i32, Option<Move>) {
        self.search(position, color, depth, maximizing, -INFINITY, INFINITY)
    }

    fn search(
        &mut self,
        position: &mut Position,
        color: Color,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        let moves = if depth > 0 {
            let moves = position.legal_moves(color);
            self.order_moves(position, moves)
        } else {
            Vec::new()
        };
        let locked = if depth > 0 {
            moves.is_empty()
        } else {
            !position.has_legal_move(color)
        };

        if depth == 0 || locked {
            self.nodes_searched += 1;
            let score = match (locked, position.in_check(color)) {
                (true, true) if maximizing => -MATE_SCORE,
                (true, true) => MATE_SCORE,
                (true, false) => 0,
                (false, _) => self.evaluator.evaluate(position, color, maximizing),
            };
            return (score, None);
        }

        let opponent = color.opposite();
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for mv in moves {
            position.make(color, mv);
            let (score, _) = self.search(position, opponent, depth - 1, !maximizing, alpha, beta);
            position.unmake_checked(mv);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                if self.config.alpha_beta && best_score >= beta {
                    break;
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                if self.config.alpha_beta && best_score <= alpha {
                    break;
                }
                beta = beta.min(best_score);
            }
        }

        (best_score, best_move)
    }

    /// Captures first, best MVV-LVA score first, then everything else in
    /// the order given. En passant and castles count as non-captures.
    pub fn order_moves(&self, position: &Position, moves: Vec<Move>) -> Vec<Move> {
        let mut captures = Vec::new();
        let mut quiet = Vec::new();
        for mv in moves {
            match capture_score(position, mv) {
                Some(score) => captures.push((score, mv)),
                None => quiet.push(mv),
            }
        }

        captures.sort_by_key(|&(score, _)| Reverse(score));
        captures.into_iter().map(|(_, mv)| mv).chain(quiet).collect()
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.config.depth = depth;
    }

    pub fn set_alpha_beta(&mut self, alpha_beta: bool) {
        self.config.alpha_beta = alpha_beta;
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Leaf and terminal nodes scored by the last search.
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

pub fn mvv_lva(victim: Kind, aggressor: Kind) -> i32 {
    Kind::COUNT * victim.order() - (Kind::COUNT - 1 - aggressor.order())
}

fn capture_score(position: &Position, mv: Move) -> Option<i32> {
    let Move::Step { from, to } = mv else {
        return None;
    };
    let victim = position.piece_at(to)?;
    let aggressor = position.piece_at(from)?;
    Some(mvv_lva(victim.kind, aggressor.kind))
}
