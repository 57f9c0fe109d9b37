//! The rule engine: movement, check and checkmate.
//!
//! Every operation works on a [`Board`](crate::board::Board) value or a copy
//! of one; nothing here holds state between calls.

mod check;
pub mod directions;
mod legality;

pub use check::{
    CheckState, GameStatus, MissingKing, evaluate, find_escape, in_check, in_checkmate,
    in_stalemate,
};
pub use legality::{
    IllegalReason, Move, MoveError, NotationError, Played, is_legal, make_move, parse_notation,
};
