use std::fmt;
use std::str::FromStr;

/// A single square on the board.
///
/// Stored as a file index (0 = 'a', 7 = 'h') and a rank index counted from
/// the top of the printed board:
/// - rank index 0 = rank 8 (Black's back rank)
/// - rank index 7 = rank 1 (White's back rank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a square if both indices are within 0-7.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// File index, 0 = 'a'.
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Rank index, 0 = rank 8.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Position in row-major order starting at a8.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// The file letter ('a'-'h').
    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// The algebraic rank digit (1-8).
    #[inline]
    pub fn rank_digit(self) -> u8 {
        8 - self.rank
    }

    /// Step by a (file, rank-index) delta, returning `None` past the edge.
    pub fn offset(self, dfile: i8, drank: i8) -> Option<Self> {
        let file = self.file as i8 + dfile;
        let rank = self.rank as i8 + drank;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, a8 first, h1 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

/// Error returned when algebraic square text cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    #[error("square must be exactly two characters")]
    WrongLength,
    #[error("file must be between 'a' and 'h'")]
    BadFile,
    #[error("rank must be between 1 and 8")]
    BadRank,
}

/// Parse algebraic notation like "e4" into a Square.
///
/// # Examples
/// ```
/// # use peer_chess::board::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!((square.file(), square.rank()), (4, 4));
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };
        square_from_chars(file, rank)
    }
}

/// Map a file letter and rank digit to a square.
pub(crate) fn square_from_chars(file: char, rank: char) -> Result<Square, SquareParseError> {
    let file = file.to_ascii_lowercase();
    if !('a'..='h').contains(&file) {
        return Err(SquareParseError::BadFile);
    }
    let rank = rank
        .to_digit(10)
        .filter(|r| (1..=8).contains(r))
        .ok_or(SquareParseError::BadRank)?;

    Ok(Square {
        file: file as u8 - b'a',
        rank: 8 - rank as u8,
    })
}

/// Display square in algebraic notation (e.g., "e4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_digit())
    }
}
