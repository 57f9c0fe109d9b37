use std::fmt;
use std::str::FromStr;

mod square;

pub use square::{Square, SquareParseError};
pub(crate) use square::square_from_chars;

/// Layout string of the standard starting position.
pub const STANDARD_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Side of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other side.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank index of this side's pawns before they have moved.
    #[inline]
    pub const fn pawn_home_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Rank-index step of a forward pawn move.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase layout letter.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        })
    }
}

/// A colored piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Parse a layout letter; uppercase is White.
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { kind, color })
    }

    /// Layout letter; uppercase for White.
    pub fn to_char(self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }

    fn glyph(self) -> char {
        match (self.kind, self.color) {
            (PieceKind::Pawn, Color::White) => '♙',
            (PieceKind::Knight, Color::White) => '♘',
            (PieceKind::Bishop, Color::White) => '♗',
            (PieceKind::Rook, Color::White) => '♖',
            (PieceKind::Queen, Color::White) => '♕',
            (PieceKind::King, Color::White) => '♔',
            (PieceKind::Pawn, Color::Black) => '♟',
            (PieceKind::Knight, Color::Black) => '♞',
            (PieceKind::Bishop, Color::Black) => '♝',
            (PieceKind::Rook, Color::Black) => '♜',
            (PieceKind::Queen, Color::Black) => '♛',
            (PieceKind::King, Color::Black) => '♚',
        }
    }
}

/// Contents of one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Cell {
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(piece) => Some(piece),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        Cell::Occupied(piece)
    }
}

/// Error when a layout string does not describe a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout must have 8 ranks separated by '/', found {0}")]
    RankCount(usize),
    #[error("invalid layout character '{0}'")]
    InvalidChar(char),
    #[error("rank {rank} describes {width} squares instead of 8")]
    RankWidth { rank: u8, width: usize },
    #[error("board has no {0} king")]
    MissingKing(Color),
}

/// How [`Board::render`] draws pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphStyle {
    #[default]
    Unicode,
    Ascii,
}

/// The 8×8 grid.
///
/// A plain value: copying it produces an independent board, which the rule
/// engine relies on for trial moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; 64],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Self {
            cells: [Cell::Empty; 64],
        }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            board.cells[file] = Piece::new(kind, Color::Black).into();
            board.cells[8 + file] = Piece::new(Pawn, Color::Black).into();
            board.cells[48 + file] = Piece::new(Pawn, Color::White).into();
            board.cells[56 + file] = Piece::new(kind, Color::White).into();
        }
        board
    }

    /// Parse a slash-delimited layout string, highest rank first.
    ///
    /// Every rank is checked on its own: a short rank is rejected even when a
    /// long rank elsewhere would make the total come out right.
    pub fn parse(layout: &str) -> Result<Self, LayoutError> {
        let ranks: Vec<&str> = layout.split('/').collect();
        if ranks.len() != 8 {
            return Err(LayoutError::RankCount(ranks.len()));
        }

        let mut board = Self::empty();
        for (rank, descriptor) in ranks.into_iter().enumerate() {
            let mut width = 0usize;
            for c in descriptor.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    width += run as usize;
                } else if let Some(piece) = Piece::from_char(c) {
                    if width < 8
                        && let Some(square) = Square::new(width as u8, rank as u8)
                    {
                        board.set(square, Cell::Occupied(piece));
                    }
                    width += 1;
                } else {
                    return Err(LayoutError::InvalidChar(c));
                }
            }
            if width != 8 {
                return Err(LayoutError::RankWidth {
                    rank: 8 - rank as u8,
                    width,
                });
            }
        }
        Ok(board)
    }

    /// Serialize to the layout string format accepted by [`Board::parse`].
    pub fn to_layout(&self) -> String {
        let mut out = String::with_capacity(64 + 7);
        for rank in 0..8u8 {
            if rank > 0 {
                out.push('/');
            }
            let mut run = 0u8;
            for file in 0..8u8 {
                match self.cells[rank as usize * 8 + file as usize] {
                    Cell::Empty => run += 1,
                    Cell::Occupied(piece) => {
                        if run > 0 {
                            out.push((b'0' + run) as char);
                            run = 0;
                        }
                        out.push(piece.to_char());
                    }
                }
            }
            if run > 0 {
                out.push((b'0' + run) as char);
            }
        }
        out
    }

    #[inline]
    pub fn get(&self, square: Square) -> Cell {
        self.cells[square.index()]
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.get(square).piece()
    }

    #[inline]
    pub fn set(&mut self, square: Square, cell: Cell) {
        self.cells[square.index()] = cell;
    }

    /// Move whatever is on `from` to `to`, leaving `from` empty.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let cell = self.get(from);
        self.set(from, Cell::Empty);
        self.set(to, cell);
    }

    /// Squares holding a piece of `color`.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |sq| self.piece_at(*sq).is_some_and(|p| p.color == color))
    }

    /// Where the king of `color` stands.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        Square::all().find(|sq| self.piece_at(*sq) == Some(king))
    }

    /// Fails unless both kings are on the board.
    pub fn require_kings(&self) -> Result<(), LayoutError> {
        for color in [Color::White, Color::Black] {
            if self.king_square(color).is_none() {
                return Err(LayoutError::MissingKing(color));
            }
        }
        Ok(())
    }

    /// Character drawn for one square.
    pub fn symbol(&self, square: Square, style: GlyphStyle) -> char {
        match (self.get(square), style) {
            (Cell::Empty, _) => '·',
            (Cell::Occupied(piece), GlyphStyle::Unicode) => piece.glyph(),
            (Cell::Occupied(piece), GlyphStyle::Ascii) => piece.to_char(),
        }
    }

    /// Draw the grid with rank and file labels.
    pub fn render(&self, style: GlyphStyle) -> String {
        let mut out = String::new();
        out.push_str("    a b c d e f g h\n");
        out.push_str("  ┌─────────────────┐\n");
        for rank in 0..8u8 {
            out.push_str(&format!("{} │", 8 - rank));
            for file in 0..8u8 {
                out.push(' ');
                if let Some(square) = Square::new(file, rank) {
                    out.push(self.symbol(square, style));
                }
            }
            out.push_str(&format!(" │ {}\n", 8 - rank));
        }
        out.push_str("  └─────────────────┘\n");
        out.push_str("    a b c d e f g h\n");
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(GlyphStyle::Unicode))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.to_layout()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sq(text: &str) -> Square {
        text.parse().expect("test square is valid")
    }

    #[test]
    fn standard_round_trips_through_layout() {
        let board = Board::standard();
        assert_eq!(board.to_layout(), STANDARD_LAYOUT);
        assert_eq!(Board::parse(&board.to_layout()), Ok(board));
    }

    #[test]
    fn standard_matches_parsed_layout() {
        assert_eq!(Board::parse(STANDARD_LAYOUT), Ok(Board::standard()));
    }

    #[test]
    fn standard_has_pieces_where_expected() {
        let board = Board::standard();
        assert_eq!(
            board.piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(
            board.piece_at(sq("a2")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert!(board.get(sq("e4")).is_empty());
    }

    #[test_case("8/4pK2/8/qr6/8/8/PPPPPPPP/RNBQ3R"; "sparse")]
    #[test_case("4K3/8/8/8/3q4/8/8/3k4"; "kings and queen")]
    #[test_case("8/8/8/8/8/8/8/8"; "empty")]
    fn accepts_well_formed_layouts(layout: &str) {
        let board = Board::parse(layout).expect("layout should parse");
        assert_eq!(board.to_layout(), layout);
    }

    #[test_case("8/4pK2/8/8/8/PPPPPPPP/RNBQ3R", LayoutError::RankCount(7); "missing rank")]
    #[test_case("8/8/8/8/8/8/8/8/8", LayoutError::RankCount(9); "extra rank")]
    #[test_case("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNQKBNR", LayoutError::RankWidth { rank: 7, width: 7 }; "short rank")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR", LayoutError::RankWidth { rank: 1, width: 9 }; "long rank")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNx", LayoutError::InvalidChar('x'); "bad letter")]
    #[test_case("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR", LayoutError::InvalidChar('9'); "digit nine")]
    #[test_case("rnbqkbnr/pppppppp/08/8/8/8/PPPPPPPP/RNBQKBNR", LayoutError::InvalidChar('0'); "digit zero")]
    fn rejects_malformed_layouts(layout: &str, expected: LayoutError) {
        assert_eq!(Board::parse(layout), Err(expected));
    }

    #[test]
    fn short_rank_is_not_masked_by_long_rank() {
        // 7 + 9 squares would total 64 across the board.
        let result = Board::parse("4pK1/8/8/8/8/8/8/4pK3");
        assert_eq!(
            result,
            Err(LayoutError::RankWidth { rank: 8, width: 7 })
        );
    }

    #[test]
    fn require_kings_reports_missing_side() {
        let board = Board::parse("8/4pK2/8/qr6/8/8/PPPPPPPP/RNBQ3R").unwrap();
        assert_eq!(
            board.require_kings(),
            Err(LayoutError::MissingKing(Color::Black))
        );
        assert_eq!(Board::standard().require_kings(), Ok(()));
    }

    #[test]
    fn copies_are_independent() {
        let original = Board::standard();
        let mut scratch = original;
        scratch.relocate(sq("e2"), sq("e4"));
        assert_ne!(scratch, original);
        assert!(original.get(sq("e4")).is_empty());
    }

    #[test]
    fn render_contains_labels_and_pieces() {
        let ascii = Board::standard().render(GlyphStyle::Ascii);
        assert!(ascii.contains("a b c d e f g h"));
        assert!(ascii.contains("8 │ r n b q k b n r │ 8"));
        assert!(ascii.contains("1 │ R N B Q K B N R │ 1"));

        let unicode = Board::standard().to_string();
        assert!(unicode.contains('♔'));
        assert!(unicode.contains('♚'));
    }
}
