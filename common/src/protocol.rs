use crate::board::{Coordinate, CoordinateError};
use crate::messages::InboundTag;
use std::fmt;
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum MoveError {
    #[error("Badly formatted coordinates: {0}")]
    Format(#[from] CoordinateError),
    #[error("Cannot submit a move while {0}")]
    WrongState(ProtocolState),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    #[default]
    Start,
    ReadyForTurn,
    WaitingForTurn,
    MakingMove,
    // Terminal. No transition enters it: the server ends a won game with
    // YouWon, which moves straight to End.
    Won,
    End,
}

impl ProtocolState {
    pub const ALL: [ProtocolState; 6] = [
        ProtocolState::Start,
        ProtocolState::ReadyForTurn,
        ProtocolState::WaitingForTurn,
        ProtocolState::MakingMove,
        ProtocolState::Won,
        ProtocolState::End,
    ];
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolState::Start => write!(f, "starting"),
            ProtocolState::ReadyForTurn => write!(f, "ready for a turn"),
            ProtocolState::WaitingForTurn => write!(f, "waiting for a turn"),
            ProtocolState::MakingMove => write!(f, "making a move"),
            ProtocolState::Won => write!(f, "won"),
            ProtocolState::End => write!(f, "ended"),
        }
    }
}

/// The state an inbound tag leads to, or `None` if the server is not
/// allowed to send that tag in `state`.
pub fn transition(state: ProtocolState, tag: InboundTag) -> Option<ProtocolState> {
    use InboundTag::*;
    use ProtocolState::*;
    let next = match (state, tag) {
        (Start, Connected) | (Start, AssignedSymbol) => Start,
        (Start, GameStart) => ReadyForTurn,
        (ReadyForTurn, YourTurn) => MakingMove,
        (ReadyForTurn, WaitTurn) => WaitingForTurn,
        (WaitingForTurn, YourTurn) => MakingMove,
        (WaitingForTurn, OpponentMoved) => WaitingForTurn,
        (WaitingForTurn, YouLost) => End,
        (MakingMove, MoveRejected) => MakingMove,
        (MakingMove, TurnAdvance) => ReadyForTurn,
        (MakingMove, YouWon) => End,
        _ => return None,
    };
    Some(next)
}

/// Gatekeeper for message sequencing. Inbound messages drive every state
/// change; outbound moves are only checked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Protocol {
    state: ProtocolState,
}

impl Protocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    pub fn validate_inbound(&mut self, tag: InboundTag) -> bool {
        match transition(self.state, tag) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    pub fn check_outbound_move(&self, coordinate: &str) -> Result<Coordinate, MoveError> {
        let coordinate = coordinate.parse::<Coordinate>()?;
        if self.state != ProtocolState::MakingMove {
            return Err(MoveError::WrongState(self.state));
        }
        Ok(coordinate)
    }

    pub fn validate_outbound_move(&self, coordinate: &str) -> bool {
        self.check_outbound_move(coordinate).is_ok()
    }
}
