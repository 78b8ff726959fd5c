//! Console client for a two-player gomoku server.
//!
//! The server decides move legality, turn order and the winner. This crate
//! keeps the client's side of the conversation in step with it: the
//! [`common::Protocol`] state machine rejects out-of-order messages, and
//! [`session::Session`] mirrors the board and submits moves.

pub mod config;
pub mod error;
pub mod input;
pub mod session;
pub mod transport;
pub mod ui;

pub use error::SessionError;
pub use session::Session;
