mod board;
pub mod messages;
mod protocol;

pub use board::{Board, BoardError, Cell, Coordinate, CoordinateError, Symbol, BOARD_SIZE, ROW_LETTERS};
pub use messages::{
    decode, encode, CodecError, InboundTag, Message, MessageError, OutboundTag, Outcome,
    ServerEvent,
};
pub use protocol::{transition, MoveError, Protocol, ProtocolState};
