use crate::transport::TransportError;
use common::{BoardError, CodecError, InboundTag, MessageError, ProtocolState};
use thiserror::Error;

/// Everything that ends a session early. None of these are retried: once
/// one occurs the client and server no longer share a view of the game.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Server sent {tag:?} while {state}")]
    Protocol { state: ProtocolState, tag: InboundTag },
    #[error("Could not decode server message: {0}")]
    Codec(#[from] CodecError),
    #[error("Server message has bad parameters: {0}")]
    Message(#[from] MessageError),
    #[error("Connection failed: {0}")]
    Transport(#[from] TransportError),
    #[error("Server closed the connection before the game ended")]
    Disconnected,
    #[error("No more moves available from input")]
    InputClosed,
    #[error("Board out of sync with server: {0}")]
    Board(#[from] BoardError),
    #[error("Out of sync with server: {0}")]
    Desync(&'static str),
}
