//! Two-player games where each side is on a different machine.
//!
//! A [`RelaySession`] drives one side: local turns come from a
//! [`MoveInput`], remote turns arrive as notation over a [`MoveRelay`]. Both
//! peers validate every move against their own copy of the board, so a peer
//! that sends an illegal move ends the session instead of desyncing it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::board::Color;
use crate::game::{Command, Frontend, Game, GameEvent, LocalTurn, Outcome, SessionError};
use crate::rules::MoveError;
use crate::{GameDisplay, MoveInput, MoveRelay};

/// Sent in place of a move when the local player leaves.
const QUIT: &str = "quit";

/// Error from [`ChannelRelay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("peer hung up")]
    Disconnected,
    #[error("no message from peer within {0:?}")]
    Timeout(Duration),
}

/// In-process relay over a pair of channels.
///
/// Stands in for a network stream between two threads.
#[derive(Debug)]
pub struct ChannelRelay {
    outgoing: Sender<String>,
    incoming: Receiver<String>,
    timeout: Option<Duration>,
}

impl ChannelRelay {
    /// Two connected ends.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::channel();
        let (b_tx, b_rx) = mpsc::channel();
        (
            Self {
                outgoing: a_tx,
                incoming: b_rx,
                timeout: None,
            },
            Self {
                outgoing: b_tx,
                incoming: a_rx,
                timeout: None,
            },
        )
    }

    /// Fail a receive that waits longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl MoveRelay for ChannelRelay {
    type Error = ChannelError;

    fn send(&mut self, message: &str) -> Result<(), Self::Error> {
        self.outgoing
            .send(message.to_owned())
            .map_err(|_| ChannelError::Disconnected)
    }

    fn receive(&mut self) -> Result<Option<String>, Self::Error> {
        let Some(timeout) = self.timeout else {
            return Ok(self.incoming.recv().ok());
        };
        match self.incoming.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
            Err(RecvTimeoutError::Timeout) => Err(ChannelError::Timeout(timeout)),
        }
    }
}

/// Error while exchanging nicknames.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError<T> {
    #[error("relay failed: {0}")]
    Transport(T),
    #[error("peer closed the connection before introducing itself")]
    Closed,
}

/// Error that stops a relayed game.
#[derive(Debug, thiserror::Error)]
pub enum RelayError<T, I, D> {
    #[error("relay failed: {0}")]
    Transport(T),
    /// The peer's board has diverged from ours, or the peer is cheating.
    #[error("peer sent illegal move {notation:?}: {source}")]
    PeerMove { notation: String, source: MoveError },
    #[error("{0}")]
    Session(SessionError<I, D>),
}

impl<T, I, D> From<SessionError<I, D>> for RelayError<T, I, D> {
    fn from(err: SessionError<I, D>) -> Self {
        RelayError::Session(err)
    }
}

/// How a relayed game ended, from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    pub outcome: Outcome,
    /// The side this session played.
    pub local: Color,
}

impl RelayOutcome {
    /// `Some(true)` if the local side won, `None` if nobody did.
    pub fn local_won(&self) -> Option<bool> {
        self.outcome.winner().map(|winner| winner == self.local)
    }
}

/// One side of a game between two peers.
#[derive(Debug)]
pub struct RelaySession<R> {
    relay: R,
    peer: String,
    local: Color,
}

impl<R: MoveRelay> RelaySession<R> {
    /// Exchange nicknames with the peer.
    ///
    /// Both sides send first, so neither blocks the other.
    pub fn connect(
        mut relay: R,
        nickname: &str,
        local: Color,
    ) -> Result<Self, HandshakeError<R::Error>> {
        relay.send(nickname).map_err(HandshakeError::Transport)?;
        let peer = relay
            .receive()
            .map_err(HandshakeError::Transport)?
            .ok_or(HandshakeError::Closed)?;
        let peer = peer.trim().to_owned();

        log::info!("connected to {peer}, playing {local}");
        Ok(Self { relay, peer, local })
    }

    /// The peer's nickname.
    #[inline]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    #[inline]
    pub fn local_color(&self) -> Color {
        self.local
    }

    /// Play `game` to the end.
    ///
    /// The peer quitting or hanging up counts as the peer abandoning the
    /// game. Local quits are forwarded before returning.
    pub fn play<I: MoveInput, D: GameDisplay>(
        &mut self,
        game: &mut Game,
        input: &mut I,
        display: &mut D,
    ) -> Result<RelayOutcome, RelayError<R::Error, I::Error, D::Error>> {
        let transport = RelayError::<R::Error, I::Error, D::Error>::Transport;
        let mut frontend = Frontend::new(input, display);
        frontend.show(game.board(), &GameEvent::Started)?;
        frontend.show(game.board(), &GameEvent::PeerConnected(self.peer.clone()))?;

        let outcome = loop {
            let side = game.turn();

            let status = if side == self.local {
                frontend.show(game.board(), &GameEvent::Turn(side))?;
                match frontend.local_turn(game)? {
                    LocalTurn::Quit => {
                        self.relay.send(QUIT).map_err(transport)?;
                        break Outcome::Abandoned { by: side };
                    }
                    LocalTurn::Played { notation, status } => {
                        log::debug!("sending {notation:?}");
                        self.relay.send(&notation).map_err(transport)?;
                        status
                    }
                }
            } else {
                frontend.show(game.board(), &GameEvent::Waiting(side))?;
                let Some(notation) = self.relay.receive().map_err(transport)? else {
                    log::info!("{} disconnected", self.peer);
                    break Outcome::Abandoned { by: side };
                };
                log::debug!("received {notation:?}");
                if matches!(Command::parse(&notation), Ok(Command::Quit)) {
                    break Outcome::Abandoned { by: side };
                }

                match game.play(&notation) {
                    Ok((played, status)) => {
                        let event = GameEvent::Played {
                            by: side,
                            played,
                            status,
                        };
                        frontend.show(game.board(), &event)?;
                        status
                    }
                    Err(source) => {
                        log::warn!("{} sent an illegal move {notation:?}: {source}", self.peer);
                        return Err(RelayError::PeerMove { notation, source });
                    }
                }
            };

            if let Some(outcome) = Outcome::from_status(status) {
                break outcome;
            }
        };

        log::info!("game with {} over: {outcome}", self.peer);
        frontend.show(game.board(), &GameEvent::Finished(outcome))?;
        Ok(RelayOutcome {
            outcome,
            local: self.local,
        })
    }
}
