use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::board::{Color, Kind};
use crate::legality::IllegalMove;
use crate::movegen::{CastleSide, Move};
use crate::position::Position;
use crate::search::{Search, SearchConfig};
use crate::square::Square;
use crate::turn::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    /// Winner by checkmate.
    Checkmate(Color),
    Stalemate,
    /// Neither side has enough material left to mate.
    Draw,
    /// Winner after the other side forfeited.
    Forfeited(Color),
}

impl GameState {
    pub fn is_over(self) -> bool {
        self != GameState::InProgress
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameState::Checkmate(winner) | GameState::Forfeited(winner) => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameState::InProgress => write!(f, "in progress"),
            GameState::Checkmate(winner) => write!(f, "checkmate, {} wins", winner),
            GameState::Stalemate => write!(f, "stalemate"),
            GameState::Draw => write!(f, "draw by insufficient material"),
            GameState::Forfeited(winner) => write!(f, "{} forfeited, {} wins", winner.opposite(), winner),
        }
    }
}

/// Why the game refused a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
    #[error("the game is over ({0})")]
    GameOver(GameState),
    #[error("there is no turn to undo")]
    NothingToUndo,
    #[error("a forfeited game cannot be undone")]
    Forfeited,
    #[error("{0} has no legal moves")]
    NoLegalMoves(Color),
}

/// A game between two sides: a position plus whose turn it is and whether
/// the game has ended. Every command checks the turn and the state, so a
/// finished game accepts nothing but undo.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    state: GameState,
    last_error: Option<Rejection>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::standard())
    }

    /// Start from any position, typically a seeded one. The state is
    /// computed straight away, so a seed can already be mate.
    pub fn from_position(position: Position) -> Self {
        let mut game = Self {
            position,
            state: GameState::InProgress,
            last_error: None,
        };
        game.update_state();
        game
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Reason the most recent `attempt*` call failed, cleared on success.
    pub fn last_error(&self) -> Option<&Rejection> {
        self.last_error.as_ref()
    }

    pub fn attempt_move(&mut self, from: Square, to: Square) -> bool {
        self.attempt(Move::step(from, to))
    }

    pub fn attempt_castle(&mut self, side: CastleSide) -> bool {
        self.attempt(Move::Castle(side))
    }

    /// Play `mv` for the side to move, remembering the reason on failure.
    pub fn attempt(&mut self, mv: Move) -> bool {
        match self.play(mv) {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(rejection) => {
                trace!(%mv, reason = %rejection, "move rejected");
                self.last_error = Some(rejection);
                false
            }
        }
    }

    pub fn play(&mut self, mv: Move) -> Result<(), Rejection> {
        self.ensure_in_progress()?;
        let color = self.position.turn();
        self.position.check(color, mv)?;
        self.position.make(color, mv);
        debug!(%color, %mv, "turn played");
        self.update_state();
        Ok(())
    }

    pub fn legal_moves_for(&mut self, color: Color) -> Vec<Move> {
        self.position.legal_moves(color)
    }

    /// Take back the last turn. Works on finished games too, except
    /// forfeits.
    pub fn unmake_turn(&mut self) -> Result<Turn, Rejection> {
        if let GameState::Forfeited(_) = self.state {
            return Err(Rejection::Forfeited);
        }
        if self.position.history().is_empty() {
            return Err(Rejection::NothingToUndo);
        }
        let turn = self.position.unmake();
        debug!(color = %turn.mover(), mv = %turn.as_move(), "turn undone");
        self.update_state();
        Ok(turn)
    }

    /// The side to move gives up.
    pub fn forfeit(&mut self) -> Result<(), Rejection> {
        self.ensure_in_progress()?;
        self.state = GameState::Forfeited(self.turn().opposite());
        info!(state = %self.state, "game over");
        Ok(())
    }

    pub fn random_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Move, Rejection> {
        self.ensure_in_progress()?;
        let color = self.turn();
        let moves = self.position.legal_moves(color);
        let mv = *moves.choose(rng).ok_or(Rejection::NoLegalMoves(color))?;
        self.play(mv)?;
        Ok(mv)
    }

    /// Let the search pick and play a move. A depth of zero would only
    /// evaluate the position, so the search looks at least one ply ahead.
    pub fn engine_move(&mut self, config: &SearchConfig) -> Result<Move, Rejection> {
        self.ensure_in_progress()?;
        let color = self.turn();
        let mut search = Search::new(config.with_depth(config.depth.max(1)));
        let (_, best) = search.find_best_move(&mut self.position, color);
        let mv = best.ok_or(Rejection::NoLegalMoves(color))?;
        self.play(mv)?;
        Ok(mv)
    }

    pub fn glyph_at(&self, square: Square) -> Option<char> {
        self.position.glyph_at(square)
    }

    pub fn render_text(&self) -> String {
        self.position.to_string()
    }

    fn ensure_in_progress(&self) -> Result<(), Rejection> {
        if self.state.is_over() {
            Err(Rejection::GameOver(self.state))
        } else {
            Ok(())
        }
    }

    fn update_state(&mut self) {
        let color = self.position.turn();
        self.state = if !self.position.has_legal_move(color) {
            if self.position.in_check(color) {
                GameState::Checkmate(color.opposite())
            } else {
                GameState::Stalemate
            }
        } else if insufficient_material(&self.position) {
            GameState::Draw
        } else {
            GameState::InProgress
        };

        if self.state.is_over() {
            info!(state = %self.state, turns = self.position.history().len(), "game over");
        }
    }
}

/// Neither side can mate: no pawns, rooks or queens anywhere and at most
/// one minor piece per side. Seeds missing a king never qualify.
pub fn insufficient_material(position: &Position) -> bool {
    let kings = Color::BOTH
        .iter()
        .all(|&color| position.player(color).king_piece().is_some());
    kings && Color::BOTH.iter().all(|&color| {
        let player = position.player(color);
        let heavy = [Kind::Pawn, Kind::Rook, Kind::Queen]
            .iter()
            .any(|&kind| player.count(kind) > 0);
        !heavy && player.count(Kind::Knight) + player.count(Kind::Bishop) <= 1
    })
}
