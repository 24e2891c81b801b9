pub mod attacks;
pub mod board;
pub mod evaluation;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod piece;
pub mod player;
pub mod position;
pub mod search;
pub mod setup;
pub mod square;
pub mod turn;

pub use board::{Board, Color, Kind};
pub use game::{Game, GameState, Rejection};
pub use legality::{perft, IllegalMove};
pub use movegen::{CastleSide, Move};
pub use piece::{Piece, PieceId};
pub use position::Position;
pub use search::{Search, SearchConfig, MATE_SCORE};
pub use setup::{Setup, SetupError};
pub use square::{Square, SquareError};
