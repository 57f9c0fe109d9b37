use std::fmt;

use super::check::{MissingKing, in_check};
use super::directions::{Motion, directions, motion};
use crate::board::{Board, Cell, Color, Piece, PieceKind, Square, square_from_chars};

/// Error when move text is not a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected 4 characters like \"e2e4\", found {0}")]
    Length(usize),
    #[error("\"{0}\" names a square off the board")]
    OutOfBounds(String),
    #[error("\"{0}\" is reserved and cannot be a move")]
    Reserved(String),
}

/// Why a piece cannot make the requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// The displacement is not one of the piece's vectors.
    Shape,
    /// Another piece stands on the line to the destination.
    Blocked,
    /// A pawn advanced two squares after leaving its home rank.
    PawnDoubleStep,
    PawnDiagonalWithoutCapture,
    PawnStraightCapture,
    PawnBackwards,
    /// A pawn's two-square advance would hop over a piece.
    PawnPathBlocked,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IllegalReason::Shape => "it does not move that way",
            IllegalReason::Blocked => "the path is blocked",
            IllegalReason::PawnDoubleStep => {
                "pawns only advance two squares from their starting rank"
            }
            IllegalReason::PawnDiagonalWithoutCapture => "pawns only move diagonally to capture",
            IllegalReason::PawnStraightCapture => "pawns cannot capture straight ahead",
            IllegalReason::PawnBackwards => "pawns cannot move backwards",
            IllegalReason::PawnPathBlocked => "the square in front is occupied",
        })
    }
}

/// A rejected move. The board is never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("bad move notation: {0}")]
    BadNotation(#[from] NotationError),
    #[error("{square} does not hold a {mover} piece")]
    WrongColorOrigin { square: Square, mover: Color },
    #[error("cannot capture your own piece on {0}")]
    CannotCaptureOwnPiece(Square),
    #[error("{piece} cannot move from {from} to {to}: {reason}")]
    IllegalPieceMove {
        piece: PieceKind,
        from: Square,
        to: Square,
        reason: IllegalReason,
    },
    #[error("move would leave the {0} king in check")]
    SelfCheckNotAllowed(Color),
    #[error(transparent)]
    MissingKing(#[from] MissingKing),
}

/// A candidate move, alive only while it is being validated.
///
/// Carries its own copy of the board so the self-check test can play the
/// move without touching the caller's board.
#[derive(Debug, Clone)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Contents of `from` when the move was built.
    pub start: Cell,
    /// Contents of `to` before the move.
    pub end: Cell,
    pub mover: Color,
    pub snapshot: Board,
}

impl Move {
    pub fn new(board: &Board, from: Square, to: Square, mover: Color) -> Self {
        Self {
            from,
            to,
            start: board.get(from),
            end: board.get(to),
            mover,
            snapshot: *board,
        }
    }

    #[inline]
    fn delta(&self) -> (i8, i8) {
        (
            self.to.file() as i8 - self.from.file() as i8,
            self.to.rank() as i8 - self.from.rank() as i8,
        )
    }

    fn illegal(&self, piece: Piece, reason: IllegalReason) -> MoveError {
        MoveError::IllegalPieceMove {
            piece: piece.kind,
            from: self.from,
            to: self.to,
            reason,
        }
    }
}

/// A move that has been applied to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Played {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl fmt::Display for Played {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Parse `<file><rank><file><rank>` after removing all whitespace.
///
/// `"e2 e4"` and `"e2e4"` are equivalent. The tokens `q` and `quit` are never
/// moves.
pub fn parse_notation(text: &str) -> Result<(Square, Square), NotationError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.eq_ignore_ascii_case("q") || compact.eq_ignore_ascii_case("quit") {
        return Err(NotationError::Reserved(compact));
    }

    let chars: Vec<char> = compact.chars().collect();
    let [from_file, from_rank, to_file, to_rank] = chars[..] else {
        return Err(NotationError::Length(chars.len()));
    };
    let from = square_from_chars(from_file, from_rank)
        .map_err(|_| NotationError::OutOfBounds(compact.clone()))?;
    let to = square_from_chars(to_file, to_rank)
        .map_err(|_| NotationError::OutOfBounds(compact.clone()))?;
    Ok((from, to))
}

/// Validate `notation` for `mover` and apply it to `board`.
pub fn make_move(board: &mut Board, notation: &str, mover: Color) -> Result<Played, MoveError> {
    let (from, to) = parse_notation(notation)?;
    let candidate = Move::new(board, from, to, mover);

    let piece = match validate(&candidate) {
        Ok(piece) => piece,
        Err(err) => {
            log::debug!("rejected {notation:?} for {mover}: {err}");
            return Err(err);
        }
    };

    let played = Played {
        from,
        to,
        piece,
        captured: candidate.end.piece(),
    };
    board.relocate(from, to);
    log::debug!("{mover} played {played}");
    Ok(played)
}

/// Full legality check, including the rule that a move may not leave the
/// mover's own king attacked.
pub fn is_legal(candidate: &Move) -> Result<(), MoveError> {
    validate(candidate).map(|_| ())
}

/// [`is_legal`], returning the piece that moves.
fn validate(candidate: &Move) -> Result<Piece, MoveError> {
    let piece = check_movement(candidate)?;

    let mut trial = candidate.snapshot;
    trial.relocate(candidate.from, candidate.to);
    if in_check(&trial)?.is_checked(candidate.mover) {
        return Err(MoveError::SelfCheckNotAllowed(candidate.mover));
    }
    Ok(piece)
}

/// Ownership, capture color and piece movement, without the self-check guard.
/// Returns the moving piece.
///
/// Check detection is built on this, so it must not consult check detection.
pub(crate) fn check_movement(candidate: &Move) -> Result<Piece, MoveError> {
    let piece = match candidate.start {
        Cell::Occupied(piece) if piece.color == candidate.mover => piece,
        _ => {
            return Err(MoveError::WrongColorOrigin {
                square: candidate.from,
                mover: candidate.mover,
            });
        }
    };

    if let Cell::Occupied(target) = candidate.end
        && target.color == candidate.mover
    {
        return Err(MoveError::CannotCaptureOwnPiece(candidate.to));
    }

    match piece.kind {
        PieceKind::Pawn => check_pawn(candidate, piece)?,
        PieceKind::Knight
        | PieceKind::Bishop
        | PieceKind::Rook
        | PieceKind::Queen
        | PieceKind::King => {}
    }

    match motion(piece.kind) {
        Motion::Jump => match_jump(candidate, piece)?,
        Motion::Slide => match_slide(candidate, piece)?,
    }
    Ok(piece)
}

/// Pawn direction and distance rules. These run before vector matching,
/// which cannot tell a first two-square advance from a later one.
fn check_pawn(candidate: &Move, pawn: Piece) -> Result<(), MoveError> {
    let (dfile, drank) = candidate.delta();
    let capturing = !candidate.end.is_empty();

    if drank.abs() == 2 && candidate.from.rank() != pawn.color.pawn_home_rank() {
        return Err(candidate.illegal(pawn, IllegalReason::PawnDoubleStep));
    }
    if dfile != 0 && !capturing {
        return Err(candidate.illegal(pawn, IllegalReason::PawnDiagonalWithoutCapture));
    }
    if dfile == 0 && capturing {
        return Err(candidate.illegal(pawn, IllegalReason::PawnStraightCapture));
    }
    if drank != 0 && drank.signum() != pawn.color.forward() {
        return Err(candidate.illegal(pawn, IllegalReason::PawnBackwards));
    }
    if drank.abs() == 2
        && dfile == 0
        && let Some(skipped) = candidate.from.offset(0, pawn.color.forward())
        && !candidate.snapshot.get(skipped).is_empty()
    {
        return Err(candidate.illegal(pawn, IllegalReason::PawnPathBlocked));
    }
    Ok(())
}

/// Legal iff the displacement is exactly one of the piece's vectors.
fn match_jump(candidate: &Move, piece: Piece) -> Result<(), MoveError> {
    if directions(piece.kind, piece.color).contains(&candidate.delta()) {
        Ok(())
    } else {
        Err(candidate.illegal(piece, IllegalReason::Shape))
    }
}

/// Walk each vector from the origin until the destination, the edge, or the
/// first occupied square.
fn match_slide(candidate: &Move, piece: Piece) -> Result<(), MoveError> {
    let delta = candidate.delta();
    let mut blocked = false;

    for &(dfile, drank) in directions(piece.kind, piece.color) {
        let mut cursor = candidate.from.offset(dfile, drank);
        while let Some(square) = cursor {
            if square == candidate.to {
                return Ok(());
            }
            if !candidate.snapshot.get(square).is_empty() {
                blocked |= on_ray(delta, (dfile, drank));
                break;
            }
            cursor = square.offset(dfile, drank);
        }
    }

    let reason = if blocked {
        IllegalReason::Blocked
    } else {
        IllegalReason::Shape
    };
    Err(candidate.illegal(piece, reason))
}

/// Whether `delta` is a positive multiple of the unit vector `step`.
fn on_ray(delta: (i8, i8), step: (i8, i8)) -> bool {
    let steps = if step.0 != 0 {
        delta.0 / step.0
    } else {
        delta.1 / step.1
    };
    steps > 0 && delta == (steps * step.0, steps * step.1)
}
