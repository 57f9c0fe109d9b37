use std::io::{self, BufRead, Write};

use crate::board::{Board, Color, GlyphStyle, LayoutError, Square};
use crate::game::{GameEvent, GameOptions, Outcome, SessionError, run_hotseat};
use crate::hints::{BoardHints, SquareHint};
use crate::rules::GameStatus;
use crate::{GameDisplay, MoveInput};

/// Reads moves line by line, prompting with the side to move.
#[derive(Debug)]
pub struct LineInput<R, W> {
    reader: R,
    prompt: W,
}

impl LineInput<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, prompt: W) -> Self {
        Self { reader, prompt }
    }
}

impl<R: BufRead, W: Write> MoveInput for LineInput<R, W> {
    type Error = io::Error;

    fn next_line(&mut self, side: Color) -> Result<Option<String>, Self::Error> {
        write!(self.prompt, "{side} to move> ")?;
        self.prompt.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

/// Prints the board and game messages.
///
/// Hints are drawn on the board with ANSI color-coded squares.
#[derive(Debug)]
pub struct TerminalDisplay<W> {
    out: W,
    style: GlyphStyle,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout(style: GlyphStyle) -> Self {
        Self::new(io::stdout(), style)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, style: GlyphStyle) -> Self {
        Self { out, style }
    }
}

impl<W: Write> GameDisplay for TerminalDisplay<W> {
    type Error = DisplayError;

    fn show(&mut self, board: &Board, event: &GameEvent) -> Result<(), Self::Error> {
        render_event(&mut self.out, board, event, self.style)
    }
}

/// Render one event to any writer. Extracted for testability.
fn render_event(
    w: &mut impl Write,
    board: &Board,
    event: &GameEvent,
    style: GlyphStyle,
) -> Result<(), DisplayError> {
    match event {
        GameEvent::Started => {
            writeln!(w, "♟️  Chess")?;
            writeln!(w)?;
            writeln!(w, "Commands: <from><to> (e.g. e2e4) | hint <square> | q (quit)")?;
            writeln!(w)?;
            write!(w, "{}", board.render(style))?;
        }
        // The input prompt names the side.
        GameEvent::Turn(_) => {}
        GameEvent::Waiting(side) => writeln!(w, "Waiting for {side} to move...")?,
        GameEvent::PeerConnected(peer) => writeln!(w, "Playing against {peer}")?,
        GameEvent::Played { by, played, status } => {
            write!(w, "{}", board.render(style))?;
            writeln!(w, "{by} played {played}")?;
            if *status != GameStatus::Continue {
                writeln!(w, "{status}")?;
            }
        }
        GameEvent::Rejected(err) => writeln!(w, "❌ {err}")?,
        GameEvent::InvalidCommand(message) => writeln!(w, "❌ Invalid command {message}")?,
        GameEvent::Hints(hints) => render_hints(w, board, hints, style)?,
        GameEvent::Finished(outcome) => writeln!(w, "Game over: {outcome}")?,
    }
    w.flush()?;
    Ok(())
}

fn render_hints(
    w: &mut impl Write,
    board: &Board,
    hints: &BoardHints,
    style: GlyphStyle,
) -> Result<(), DisplayError> {
    if hints.squares().is_empty() {
        writeln!(w, "No piece there")?;
        return Ok(());
    }

    for rank in 0..8u8 {
        write!(w, " {} ", 8 - rank)?;
        for square in (0..8u8).filter_map(|file| Square::new(file, rank)) {
            let symbol = board.symbol(square, style);
            write!(w, "{}", format_square(hints.get(square), symbol))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;

    if hints.has_no_moves() {
        writeln!(w, "That piece has no legal move")?;
    }
    Ok(())
}

/// Map a hint to an ANSI-colored cell.
fn format_square(hint: Option<SquareHint>, symbol: char) -> String {
    match hint {
        Some(SquareHint::Destination) => format!("\x1b[44m {symbol} \x1b[0m"),
        Some(SquareHint::Capture) => format!("\x1b[41m {symbol} \x1b[0m"),
        Some(SquareHint::Origin) => format!("\x1b[42m {symbol} \x1b[0m"),
        None => format!(" {symbol} "),
    }
}

/// Error that ends a terminal game.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("invalid starting layout: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Session(#[from] SessionError<io::Error, DisplayError>),
}

/// Play a hotseat game on stdin/stdout.
pub fn run_hotseat_terminal(options: &GameOptions) -> Result<Outcome, TerminalError> {
    let mut game = options.new_game()?;
    let mut input = LineInput::stdin();
    let mut display = TerminalDisplay::stdout(options.glyphs);
    Ok(run_hotseat(&mut game, &mut input, &mut display)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::hints::compute_hints;
    use crate::rules::{MoveError, NotationError};

    fn render_to_string(board: &Board, event: &GameEvent) -> String {
        let mut buf = Vec::new();
        render_event(&mut buf, board, event, GlyphStyle::Ascii)
            .expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    #[test]
    fn line_input_prompts_and_strips_newlines() {
        let mut prompt = Vec::new();
        let mut input = LineInput::new("e2e4\r\n\ne7e5".as_bytes(), &mut prompt);

        assert_eq!(input.next_line(Color::White).unwrap(), Some("e2e4".into()));
        assert_eq!(input.next_line(Color::Black).unwrap(), Some(String::new()));
        assert_eq!(input.next_line(Color::Black).unwrap(), Some("e7e5".into()));
        assert_eq!(input.next_line(Color::White).unwrap(), None);

        let prompt = String::from_utf8(prompt).unwrap();
        assert!(prompt.starts_with("White to move> Black to move> "));
    }

    #[test]
    fn start_shows_board_and_commands() {
        let output = render_to_string(&Board::standard(), &GameEvent::Started);
        assert!(output.contains("hint <square>"));
        assert!(output.contains("8 │ r n b q k b n r │ 8"));
    }

    #[test]
    fn played_move_reports_check() {
        let mut game = Game::new();
        for notation in ["e2e4", "f7f6"] {
            game.play(notation).unwrap();
        }
        let (played, status) = game.play("d1h5").unwrap();
        let event = GameEvent::Played {
            by: Color::White,
            played,
            status,
        };

        let output = render_to_string(game.board(), &event);
        assert!(output.contains("White played d1h5"));
        assert!(output.contains("Black is in check!"));
    }

    #[test]
    fn display_writes_to_borrowed_writer() {
        let mut buf = Vec::new();
        let mut display = TerminalDisplay::new(&mut buf, GlyphStyle::Ascii);
        display
            .show(&Board::standard(), &GameEvent::Waiting(Color::Black))
            .expect("writing to buffer should succeed");

        assert_eq!(String::from_utf8(buf).unwrap(), "Waiting for Black to move...\n");
    }

    #[test]
    fn rejection_shows_reason() {
        let event = GameEvent::Rejected(MoveError::BadNotation(NotationError::Length(3)));
        let output = render_to_string(&Board::standard(), &event);
        assert!(output.starts_with("❌ "));
    }

    #[test]
    fn hints_use_colored_backgrounds() {
        let board = Board::parse("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR").unwrap();
        let event = GameEvent::Hints(compute_hints(&board, "e4".parse().unwrap()));

        let output = render_to_string(&board, &event);
        assert!(output.contains("\x1b[42m P \x1b[0m"), "origin in green");
        assert!(output.contains("\x1b[44m · \x1b[0m"), "destination in blue");
        assert!(output.contains("\x1b[41m p \x1b[0m"), "capture in red");
        assert!(output.contains("a  b  c  d  e  f  g  h"));
    }

    #[test]
    fn hints_for_empty_square() {
        let event = GameEvent::Hints(BoardHints::new());
        let output = render_to_string(&Board::standard(), &event);
        assert_eq!(output, "No piece there\n");
    }
}
