use std::convert::Infallible;

use crate::GameDisplay;
use crate::board::Board;
use crate::game::GameEvent;

/// Display that keeps every event it is shown, for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    events: Vec<GameEvent>,
    board: Option<Board>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[inline]
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Board passed with the most recent event.
    #[inline]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn rejections(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, GameEvent::Rejected(_)))
            .count()
    }

    pub fn moves_played(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, GameEvent::Played { .. }))
            .count()
    }
}

impl GameDisplay for RecordingDisplay {
    type Error = Infallible;

    fn show(&mut self, board: &Board, event: &GameEvent) -> Result<(), Self::Error> {
        self.board = Some(*board);
        self.events.push(event.clone());
        Ok(())
    }
}
