use std::fmt;

use super::legality::{Move, check_movement, is_legal};
use crate::board::{Board, Color, Square};

/// A check query was made on a board without one of the kings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("board has no {0} king")]
pub struct MissingKing(pub Color);

/// Which kings are attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckState {
    pub white: bool,
    pub black: bool,
}

impl CheckState {
    #[inline]
    pub const fn is_checked(self, color: Color) -> bool {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

/// Result of a position after a move, consumed by the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Continue,
    /// The given side is in check.
    Check(Color),
    /// The given side is checkmated.
    Checkmate(Color),
    /// The given side is to move, is not in check, and has no legal move.
    Stalemate(Color),
}

impl GameStatus {
    /// True when play cannot continue.
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate(_) | GameStatus::Stalemate(_))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Continue => Ok(()),
            GameStatus::Check(color) => write!(f, "{color} is in check!"),
            GameStatus::Checkmate(color) => {
                write!(f, "{color} is in checkmate! {} wins!", color.opponent())
            }
            GameStatus::Stalemate(color) => write!(f, "{color} has no legal move: stalemate."),
        }
    }
}

fn king_squares(board: &Board) -> Result<(Square, Square), MissingKing> {
    let white = board
        .king_square(Color::White)
        .ok_or(MissingKing(Color::White))?;
    let black = board
        .king_square(Color::Black)
        .ok_or(MissingKing(Color::Black))?;
    Ok((white, black))
}

/// Determine whether either king is attacked.
///
/// Every piece is tried as an attacker against the enemy king with the
/// movement rules only; the self-check guard is skipped.
pub fn in_check(board: &Board) -> Result<CheckState, MissingKing> {
    let (white_king, black_king) = king_squares(board)?;
    let mut state = CheckState::default();

    for square in Square::all() {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };
        let (target, found) = match piece.color {
            Color::White => (black_king, &mut state.black),
            Color::Black => (white_king, &mut state.white),
        };
        if *found {
            continue;
        }
        let attack = Move::new(board, square, target, piece.color);
        *found = check_movement(&attack).is_ok();

        if state.white && state.black {
            break;
        }
    }
    Ok(state)
}

/// Find any legal move for `color` that leaves its king safe.
///
/// Tries every origin holding a `color` piece against every other square.
/// Each trial plays on its own copy of `board`.
pub fn find_escape(board: &Board, color: Color) -> Result<Option<(Square, Square)>, MissingKing> {
    king_squares(board)?;

    for from in board.squares_of(color) {
        for to in Square::all().filter(|to| *to != from) {
            let trial = Move::new(board, from, to, color);
            if is_legal(&trial).is_err() {
                continue;
            }
            let mut scratch = *board;
            scratch.relocate(from, to);
            if !in_check(&scratch)?.is_checked(color) {
                return Ok(Some((from, to)));
            }
        }
    }
    Ok(None)
}

/// True when `color` is in check and has no move that escapes it.
///
/// A side that is not in check is never mated; see [`in_stalemate`].
pub fn in_checkmate(board: &Board, color: Color) -> Result<bool, MissingKing> {
    if !in_check(board)?.is_checked(color) {
        return Ok(false);
    }
    Ok(find_escape(board, color)?.is_none())
}

/// True when `color` is not in check but has no legal move.
pub fn in_stalemate(board: &Board, color: Color) -> Result<bool, MissingKing> {
    if in_check(board)?.is_checked(color) {
        return Ok(false);
    }
    Ok(find_escape(board, color)?.is_none())
}

/// Classify the position after a move, with `to_move` the side about to play.
pub fn evaluate(board: &Board, to_move: Color) -> Result<GameStatus, MissingKing> {
    let check = in_check(board)?;
    for color in [Color::White, Color::Black] {
        if check.is_checked(color) {
            return Ok(if in_checkmate(board, color)? {
                GameStatus::Checkmate(color)
            } else {
                GameStatus::Check(color)
            });
        }
    }
    if in_stalemate(board, to_move)? {
        return Ok(GameStatus::Stalemate(to_move));
    }
    Ok(GameStatus::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::make_move;
    use test_case::test_case;

    fn board(layout: &str) -> Board {
        Board::parse(layout).expect("test layout is valid")
    }

    #[test_case("5R2/8/4k3/8/8/r2K4/8/8", true, false; "rook checks white")]
    #[test_case("4R3/6r1/3k4/8/8/5r1K/8/7q", true, false; "white mated")]
    #[test_case("4r2R/8/3K4/8/8/7k/8/6Q1", false, true; "queen checks black")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", false, false; "start")]
    #[test_case("4k3/8/8/8/8/8/3p4/4K3", true, false; "pawn checks diagonally")]
    #[test_case("4k3/8/8/8/8/4p3/8/4K3", false, false; "pawn does not check forward")]
    #[test_case("4k3/8/8/8/8/3n4/8/4K3", true, false; "knight")]
    #[test_case("4k3/8/8/8/8/8/8/r2PK3", false, false; "blocked rook")]
    fn detects_check(layout: &str, white: bool, black: bool) {
        assert_eq!(in_check(&board(layout)), Ok(CheckState { white, black }));
    }

    #[test]
    fn check_requires_both_kings() {
        assert_eq!(
            in_check(&board("8/8/8/8/8/8/8/4K3")),
            Err(MissingKing(Color::Black))
        );
        assert_eq!(
            in_check(&board("4k3/8/8/8/8/8/8/8")),
            Err(MissingKing(Color::White))
        );
        assert_eq!(
            in_checkmate(&board("8/8/8/8/8/8/8/8"), Color::White),
            Err(MissingKing(Color::White))
        );
    }

    #[test]
    fn detects_checkmate() {
        let b = board("4R3/6r1/3k4/8/8/5r1K/8/7q");
        assert_eq!(in_checkmate(&b, Color::White), Ok(true));
        assert_eq!(evaluate(&b, Color::White), Ok(GameStatus::Checkmate(Color::White)));
    }

    #[test]
    fn check_with_escape_is_not_mate() {
        let b = board("5R2/8/4k3/8/8/r2K4/8/8");
        assert_eq!(in_checkmate(&b, Color::White), Ok(false));
        assert!(find_escape(&b, Color::White).unwrap().is_some());
        assert_eq!(evaluate(&b, Color::White), Ok(GameStatus::Check(Color::White)));
    }

    #[test]
    fn black_in_check_can_escape() {
        let b = board("4r2R/8/3K4/8/8/7k/8/6Q1");
        assert_eq!(in_checkmate(&b, Color::Black), Ok(false));
    }

    #[test]
    fn fools_mate() {
        let mut b = Board::standard();
        let moves = [
            ("f2f3", Color::White),
            ("e7e5", Color::Black),
            ("g2g4", Color::White),
            ("d8h4", Color::Black),
        ];
        for (notation, color) in moves {
            make_move(&mut b, notation, color).expect("fool's mate move is legal");
        }
        assert_eq!(
            in_check(&b),
            Ok(CheckState {
                white: true,
                black: false
            })
        );
        assert_eq!(in_checkmate(&b, Color::White), Ok(true));
    }

    #[test]
    fn detects_stalemate() {
        // Black king in the corner boxed in by the queen.
        let b = board("7k/5Q2/6K1/8/8/8/8/8");
        assert_eq!(in_check(&b).map(|c| c.black), Ok(false));
        assert_eq!(in_stalemate(&b, Color::Black), Ok(true));
        assert_eq!(in_checkmate(&b, Color::Black), Ok(false));
        assert_eq!(evaluate(&b, Color::Black), Ok(GameStatus::Stalemate(Color::Black)));
        assert_eq!(in_stalemate(&b, Color::White), Ok(false));
    }

    #[test]
    fn quiet_position_continues() {
        assert_eq!(in_checkmate(&Board::standard(), Color::White), Ok(false));
        assert_eq!(in_checkmate(&Board::standard(), Color::Black), Ok(false));
        assert_eq!(
            evaluate(&Board::standard(), Color::White),
            Ok(GameStatus::Continue)
        );
    }

    #[test]
    fn status_messages() {
        assert_eq!(
            GameStatus::Checkmate(Color::White).to_string(),
            "White is in checkmate! Black wins!"
        );
        assert_eq!(GameStatus::Check(Color::Black).to_string(), "Black is in check!");
        assert!(GameStatus::Stalemate(Color::Black).is_over());
        assert!(!GameStatus::Check(Color::Black).is_over());
    }
}
