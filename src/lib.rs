use board::{Board, Color};

pub mod board;
pub mod game;
pub mod hints;
pub mod mock;
pub mod relay;
pub mod report;
pub mod rules;
pub mod terminal;

/// Trait for reading a player's commands.
///
/// Abstracts over the interactive terminal and scripted inputs,
/// providing a uniform interface for the turn loop.
pub trait MoveInput {
    /// Error type for input read failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Read the next line typed by the player controlling `side`.
    ///
    /// Returns `Ok(None)` when the input is exhausted.
    fn next_line(&mut self, side: Color) -> Result<Option<String>, Self::Error>;
}

/// Trait for showing the game to the players.
///
/// Mirrors [`MoveInput`] on the output side of the turn loop.
pub trait GameDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Present `event`, with `board` as the position after it.
    fn show(&mut self, board: &Board, event: &game::GameEvent) -> Result<(), Self::Error>;
}

/// Trait for the text channel between two peers.
///
/// Peer discovery and stream framing live behind this seam; messages are
/// move notation, `quit`, or the nickname exchanged on connect.
pub trait MoveRelay {
    /// Error type for transport failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Send one message to the peer.
    fn send(&mut self, message: &str) -> Result<(), Self::Error>;

    /// Block until the peer's next message. `Ok(None)` once the peer is gone.
    fn receive(&mut self) -> Result<Option<String>, Self::Error>;
}
