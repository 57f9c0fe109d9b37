use std::fmt;

use crate::board::{Board, Color, GlyphStyle, LayoutError, Square, SquareParseError};
use crate::hints::{BoardHints, compute_hints};
use crate::rules::{GameStatus, MoveError, Played, evaluate, make_move};
use crate::{GameDisplay, MoveInput};

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Starting layout; the standard position when `None`.
    pub layout: Option<String>,
    /// Side that moves first.
    pub first: Color,
    pub glyphs: GlyphStyle,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            layout: None,
            first: Color::White,
            glyphs: GlyphStyle::Unicode,
        }
    }
}

impl GameOptions {
    /// Build the game these options describe.
    pub fn new_game(&self) -> Result<Game, LayoutError> {
        match &self.layout {
            Some(layout) => Game::from_layout(layout, self.first),
            None => Ok(Game::with_turn(Board::standard(), self.first)),
        }
    }
}

/// A board and the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position, White to move.
    #[inline]
    pub fn new() -> Self {
        Self::with_turn(Board::standard(), Color::White)
    }

    fn with_turn(board: Board, turn: Color) -> Self {
        Self { board, turn }
    }

    /// Creates a game from a layout string. Both kings must be present.
    pub fn from_layout(layout: &str, turn: Color) -> Result<Self, LayoutError> {
        Self::from_board(Board::parse(layout)?, turn)
    }

    /// Creates a game from an existing board. Both kings must be present.
    pub fn from_board(board: Board, turn: Color) -> Result<Self, LayoutError> {
        board.require_kings()?;
        Ok(Self::with_turn(board, turn))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Play `notation` for the side to move.
    ///
    /// On success the turn passes to the other side. On failure neither the
    /// board nor the turn changes.
    pub fn play(&mut self, notation: &str) -> Result<(Played, GameStatus), MoveError> {
        let mut next = self.board;
        let played = make_move(&mut next, notation, self.turn)?;
        let status = evaluate(&next, self.turn.opponent())?;

        self.board = next;
        self.turn = self.turn.opponent();
        Ok((played, status))
    }
}

/// A line of player input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `q` or `quit`
    Quit,
    /// `hint <square>`: show where that piece can go
    Hint(Square),
    /// Anything else is handed to the move parser.
    Move(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, SquareParseError> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            return Ok(Command::Quit);
        }
        if let Some(rest) = line.strip_prefix("hint") {
            return rest.trim().parse().map(Command::Hint);
        }
        Ok(Command::Move(line.to_owned()))
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    /// A player quit, or their input ran out.
    Abandoned { by: Color },
}

impl Outcome {
    /// The outcome implied by a status, if the game is over.
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Checkmate(loser) => Some(Outcome::Checkmate {
                winner: loser.opponent(),
            }),
            GameStatus::Stalemate(_) => Some(Outcome::Stalemate),
            GameStatus::Continue | GameStatus::Check(_) => None,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            Outcome::Stalemate | Outcome::Abandoned { .. } => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            Outcome::Stalemate => write!(f, "draw by stalemate"),
            Outcome::Abandoned { by } => write!(f, "{by} left the game"),
        }
    }
}

/// Something the display should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    /// A local player should enter a move.
    Turn(Color),
    /// Waiting on the remote player.
    Waiting(Color),
    PeerConnected(String),
    Played {
        by: Color,
        played: Played,
        status: GameStatus,
    },
    Rejected(MoveError),
    InvalidCommand(String),
    Hints(BoardHints),
    Finished(Outcome),
}

/// Error that stops a session. Rejected moves are not errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<I, D> {
    #[error("failed to read move: {0}")]
    Input(I),
    #[error("failed to update display: {0}")]
    Display(D),
}

/// What the local player did on their turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LocalTurn {
    Played { notation: String, status: GameStatus },
    Quit,
}

/// The two player-facing seams of a session.
pub(crate) struct Frontend<'a, I, D> {
    input: &'a mut I,
    display: &'a mut D,
}

impl<'a, I: MoveInput, D: GameDisplay> Frontend<'a, I, D> {
    pub(crate) fn new(input: &'a mut I, display: &'a mut D) -> Self {
        Self { input, display }
    }

    pub(crate) fn show(
        &mut self,
        board: &Board,
        event: &GameEvent,
    ) -> Result<(), SessionError<I::Error, D::Error>> {
        self.display.show(board, event).map_err(SessionError::Display)
    }

    fn read(&mut self, side: Color) -> Result<Option<String>, SessionError<I::Error, D::Error>> {
        self.input.next_line(side).map_err(SessionError::Input)
    }

    /// Prompt the side to move until it enters a legal move or quits.
    pub(crate) fn local_turn(
        &mut self,
        game: &mut Game,
    ) -> Result<LocalTurn, SessionError<I::Error, D::Error>> {
        let side = game.turn();
        loop {
            let Some(line) = self.read(side)? else {
                return Ok(LocalTurn::Quit);
            };
            if line.trim().is_empty() {
                continue;
            }

            let event = match Command::parse(&line) {
                Ok(Command::Quit) => return Ok(LocalTurn::Quit),
                Ok(Command::Hint(square)) => GameEvent::Hints(compute_hints(game.board(), square)),
                Ok(Command::Move(notation)) => match game.play(&notation) {
                    Ok((played, status)) => {
                        let event = GameEvent::Played {
                            by: side,
                            played,
                            status,
                        };
                        self.show(game.board(), &event)?;
                        return Ok(LocalTurn::Played { notation, status });
                    }
                    Err(err) => GameEvent::Rejected(err),
                },
                Err(err) => GameEvent::InvalidCommand(format!("{line:?}: {err}")),
            };
            self.show(game.board(), &event)?;
        }
    }
}

/// Play a game with both sides at the same input.
///
/// Runs until checkmate, stalemate, or a player quits.
pub fn run_hotseat<I: MoveInput, D: GameDisplay>(
    game: &mut Game,
    input: &mut I,
    display: &mut D,
) -> Result<Outcome, SessionError<I::Error, D::Error>> {
    let mut frontend = Frontend::new(input, display);
    frontend.show(game.board(), &GameEvent::Started)?;

    let outcome = loop {
        let side = game.turn();
        frontend.show(game.board(), &GameEvent::Turn(side))?;

        match frontend.local_turn(game)? {
            LocalTurn::Quit => break Outcome::Abandoned { by: side },
            LocalTurn::Played { status, .. } => {
                if let Some(outcome) = Outcome::from_status(status) {
                    break outcome;
                }
            }
        }
    };

    log::info!("game over: {outcome}");
    frontend.show(game.board(), &GameEvent::Finished(outcome))?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, PieceKind};
    use crate::mock::{RecordingDisplay, ScriptedInput};
    use test_case::test_case;

    fn sq(text: &str) -> Square {
        text.parse().expect("test square is valid")
    }

    #[test_case("q", Command::Quit)]
    #[test_case(" QUIT ", Command::Quit)]
    #[test_case("hint e2", Command::Hint("e2".parse().unwrap()))]
    #[test_case("e2 e4", Command::Move("e2 e4".into()))]
    fn parses_commands(line: &str, expected: Command) {
        assert_eq!(Command::parse(line), Ok(expected));
    }

    #[test]
    fn hint_needs_valid_square() {
        assert!(Command::parse("hint z9").is_err());
    }

    #[test]
    fn play_alternates_turns() {
        let mut game = Game::new();
        game.play("e2e4").expect("legal");
        assert_eq!(game.turn(), Color::Black);
        game.play("e7e5").expect("legal");
        assert_eq!(game.turn(), Color::White);
        assert_eq!(
            game.board().piece_at(sq("e5")),
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
    }

    #[test]
    fn rejected_move_keeps_turn_and_board() {
        let mut game = Game::new();
        let before = game.clone();
        assert!(game.play("e7e5").is_err(), "black cannot move first");
        assert_eq!(game, before);
    }

    #[test]
    fn layout_without_kings_is_refused() {
        assert_eq!(
            Game::from_layout("8/8/8/8/8/8/8/4K3", Color::White),
            Err(LayoutError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn options_build_requested_game() {
        let options = GameOptions {
            layout: Some("4k3/8/8/8/8/8/8/4K3".into()),
            first: Color::Black,
            ..GameOptions::default()
        };
        let game = options.new_game().expect("valid layout");
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.board().to_layout(), "4k3/8/8/8/8/8/8/4K3");

        assert_eq!(GameOptions::default().new_game(), Ok(Game::new()));
    }

    #[test]
    fn hotseat_fools_mate() {
        let mut game = Game::new();
        let mut input = ScriptedInput::from_script("f2f3. e7e5. g2g4. d8h4.").unwrap();
        let mut display = RecordingDisplay::new();

        let outcome = run_hotseat(&mut game, &mut input, &mut display).unwrap();

        assert_eq!(
            outcome,
            Outcome::Checkmate {
                winner: Color::Black
            }
        );
        assert_eq!(display.last(), Some(&GameEvent::Finished(outcome)));
    }

    #[test]
    fn hotseat_reprompts_after_rejection() {
        let mut game = Game::new();
        let mut input = ScriptedInput::from_script("e2e5. e2e4. q.").unwrap();
        let mut display = RecordingDisplay::new();

        let outcome = run_hotseat(&mut game, &mut input, &mut display).unwrap();

        assert_eq!(outcome, Outcome::Abandoned { by: Color::Black });
        assert_eq!(display.rejections(), 1);
        assert_eq!(display.moves_played(), 1);
    }

    #[test]
    fn hotseat_ends_when_input_runs_out() {
        let mut game = Game::new();
        let mut input = ScriptedInput::new();
        let mut display = RecordingDisplay::new();

        let outcome = run_hotseat(&mut game, &mut input, &mut display).unwrap();
        assert_eq!(outcome, Outcome::Abandoned { by: Color::White });
    }

    #[test]
    fn hint_does_not_use_up_turn() {
        let mut game = Game::new();
        let mut input = ScriptedInput::from_script("hint g1. g1f3. q.").unwrap();
        let mut display = RecordingDisplay::new();

        run_hotseat(&mut game, &mut input, &mut display).unwrap();

        let hints = display
            .events()
            .iter()
            .find_map(|event| match event {
                GameEvent::Hints(hints) => Some(hints.clone()),
                _ => None,
            })
            .expect("hint event shown");
        assert_eq!(hints.squares().len(), 3);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn outcome_from_status() {
        assert_eq!(
            Outcome::from_status(GameStatus::Checkmate(Color::White)),
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert_eq!(Outcome::from_status(GameStatus::Check(Color::White)), None);
        assert_eq!(
            Outcome::from_status(GameStatus::Stalemate(Color::Black)).and_then(Outcome::winner),
            None
        );
    }
}
