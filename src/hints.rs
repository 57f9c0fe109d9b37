use crate::board::{Board, Square};
use crate::rules::{Move, is_legal};

/// Kind of highlight for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareHint {
    /// The piece being asked about
    Origin,
    /// Legal destination on an empty square
    Destination,
    /// Legal destination that captures an opponent piece
    Capture,
}

/// Squares to highlight when a player asks where a piece can go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardHints {
    squares: Vec<(Square, SquareHint)>,
}

impl BoardHints {
    /// Create empty hints (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    #[inline]
    pub fn squares(&self) -> &[(Square, SquareHint)] {
        &self.squares
    }

    /// Get the hint for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareHint> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, hint)| *hint)
    }

    /// True when the piece has no legal destination.
    #[inline]
    pub fn has_no_moves(&self) -> bool {
        !self
            .squares
            .iter()
            .any(|(_, hint)| *hint != SquareHint::Origin)
    }
}

impl From<Vec<(Square, SquareHint)>> for BoardHints {
    fn from(squares: Vec<(Square, SquareHint)>) -> Self {
        Self { squares }
    }
}

/// Every square the piece on `from` may legally move to.
///
/// Uses the full legality check, so moves that would leave the owner's king
/// attacked are excluded. An empty origin has no destinations.
pub fn legal_destinations(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    Square::all()
        .filter(|to| is_legal(&Move::new(board, from, *to, piece.color)).is_ok())
        .collect()
}

/// Compute highlights for the piece on `from`.
pub fn compute_hints(board: &Board, from: Square) -> BoardHints {
    if board.get(from).is_empty() {
        return BoardHints::new();
    }
    std::iter::once((from, SquareHint::Origin))
        .chain(legal_destinations(board, from).into_iter().map(|to| {
            if board.get(to).is_empty() {
                (to, SquareHint::Destination)
            } else {
                (to, SquareHint::Capture)
            }
        }))
        .collect::<Vec<_>>()
        .into()
}
