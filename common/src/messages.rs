use crate::board::{Coordinate, CoordinateError, Symbol};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MessageError {
    #[error("{tag} takes {expected} value(s), got {actual}")]
    Arity {
        tag: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid board symbol {0:?}")]
    Symbol(String),
    #[error("Invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid message parameters: {0}")]
    Message(#[from] MessageError),
}

/// What a parameter of a given tag must look like.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Param {
    Symbol,
    Coordinate,
}

impl Param {
    fn check(&self, value: &str) -> Result<(), MessageError> {
        match self {
            Param::Symbol => value
                .parse::<Symbol>()
                .map(|_| ())
                .map_err(|_| MessageError::Symbol(value.to_string())),
            Param::Coordinate => value.parse::<Coordinate>().map(|_| ()).map_err(Into::into),
        }
    }
}

pub trait Tag: Copy + fmt::Debug + Serialize + DeserializeOwned {
    fn params(&self) -> &'static [Param];
}

// Server -> client. Wire names are the ones the game server speaks.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InboundTag {
    #[serde(rename = "YOU_ARE_CONNECTED")]
    Connected,
    #[serde(rename = "YOUR_BOARD_SYMBOL")]
    AssignedSymbol,
    #[serde(rename = "START_THE_GAME")]
    GameStart,
    #[serde(rename = "WAIT_FOR_YOUR_TURN")]
    WaitTurn,
    #[serde(rename = "NEW_MOVE")]
    YourTurn,
    #[serde(rename = "INCORRECT_MOVE")]
    MoveRejected,
    #[serde(rename = "NEXT_PLAYER_TURN")]
    TurnAdvance,
    #[serde(rename = "ANOTHER_PLAYER_COORDINATES")]
    OpponentMoved,
    #[serde(rename = "YOU_WON")]
    YouWon,
    #[serde(rename = "YOU_LOST")]
    YouLost,
}

impl InboundTag {
    pub const ALL: [InboundTag; 10] = [
        InboundTag::Connected,
        InboundTag::AssignedSymbol,
        InboundTag::GameStart,
        InboundTag::WaitTurn,
        InboundTag::YourTurn,
        InboundTag::MoveRejected,
        InboundTag::TurnAdvance,
        InboundTag::OpponentMoved,
        InboundTag::YouWon,
        InboundTag::YouLost,
    ];
}

impl Tag for InboundTag {
    fn params(&self) -> &'static [Param] {
        match self {
            InboundTag::AssignedSymbol => &[Param::Symbol],
            InboundTag::OpponentMoved => &[Param::Coordinate],
            _ => &[],
        }
    }
}

// Client -> server
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutboundTag {
    #[serde(rename = "MY_MOVE")]
    MyMove,
}

impl Tag for OutboundTag {
    fn params(&self) -> &'static [Param] {
        match self {
            OutboundTag::MyMove => &[Param::Coordinate],
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct RawMessage<T> {
    command: T,
    #[serde(rename = "additionalValues", default)]
    additional_values: Vec<String>,
}

/// One protocol exchange. Construction checks that the values match what
/// the tag requires, so a `Message` in hand is always well formed.
#[derive(Clone, Debug, PartialEq)]
pub struct Message<T: Tag> {
    tag: T,
    values: Vec<String>,
}

impl<T: Tag> Message<T> {
    pub fn new(tag: T, values: Vec<String>) -> Result<Self, MessageError> {
        let params = tag.params();
        if params.len() != values.len() {
            return Err(MessageError::Arity {
                tag: format!("{:?}", tag),
                expected: params.len(),
                actual: values.len(),
            });
        }
        params
            .iter()
            .zip(values.iter())
            .try_for_each(|(param, value)| param.check(value))?;
        Ok(Message { tag, values })
    }

    pub fn tag(&self) -> T {
        self.tag
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Message<OutboundTag> {
    pub fn my_move(coordinate: Coordinate) -> Self {
        Message {
            tag: OutboundTag::MyMove,
            values: vec![coordinate.to_string()],
        }
    }
}

pub fn encode<T: Tag>(message: &Message<T>) -> Result<String, CodecError> {
    let raw = RawMessage {
        command: message.tag,
        additional_values: message.values.clone(),
    };
    Ok(serde_json::to_string(&raw)?)
}

pub fn decode<T: Tag>(frame: &str) -> Result<Message<T>, CodecError> {
    let raw: RawMessage<T> = serde_json::from_str(frame)?;
    Ok(Message::new(raw.command, raw.additional_values)?)
}

/// Typed view of an inbound message.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ServerEvent {
    Connected,
    AssignedSymbol(Symbol),
    GameStart,
    WaitTurn,
    YourTurn,
    MoveRejected,
    TurnAdvance,
    OpponentMoved(Coordinate),
    YouWon,
    YouLost,
}

impl TryFrom<&Message<InboundTag>> for ServerEvent {
    type Error = MessageError;

    fn try_from(message: &Message<InboundTag>) -> Result<Self, Self::Error> {
        let first = || message.values.first().map(String::as_str).unwrap_or_default();
        let event = match message.tag {
            InboundTag::Connected => ServerEvent::Connected,
            InboundTag::AssignedSymbol => ServerEvent::AssignedSymbol(
                first()
                    .parse()
                    .map_err(|_| MessageError::Symbol(first().to_string()))?,
            ),
            InboundTag::GameStart => ServerEvent::GameStart,
            InboundTag::WaitTurn => ServerEvent::WaitTurn,
            InboundTag::YourTurn => ServerEvent::YourTurn,
            InboundTag::MoveRejected => ServerEvent::MoveRejected,
            InboundTag::TurnAdvance => ServerEvent::TurnAdvance,
            InboundTag::OpponentMoved => ServerEvent::OpponentMoved(first().parse()?),
            InboundTag::YouWon => ServerEvent::YouWon,
            InboundTag::YouLost => ServerEvent::YouLost,
        };
        Ok(event)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    Win,
    Lose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_server_messages() {
        let msg: Message<InboundTag> =
            decode("{\"command\":\"YOU_ARE_CONNECTED\",\"additionalValues\":[]}").unwrap();
        assert_eq!(msg.tag(), InboundTag::Connected);
        assert!(msg.values().is_empty());

        let msg: Message<InboundTag> =
            decode("{\"command\":\"YOUR_BOARD_SYMBOL\",\"additionalValues\":[\"O\"]}").unwrap();
        assert_eq!(
            ServerEvent::try_from(&msg).unwrap(),
            ServerEvent::AssignedSymbol(Symbol::O)
        );

        let msg: Message<InboundTag> = decode(
            "{\"command\":\"ANOTHER_PLAYER_COORDINATES\",\"additionalValues\":[\"J9\"]}",
        )
        .unwrap();
        assert_eq!(
            ServerEvent::try_from(&msg).unwrap(),
            ServerEvent::OpponentMoved("J9".parse().unwrap())
        );

        // additionalValues may be omitted entirely
        let msg: Message<InboundTag> = decode("{\"command\":\"NEW_MOVE\"}").unwrap();
        assert_eq!(msg.tag(), InboundTag::YourTurn);
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        assert!(matches!(
            decode::<InboundTag>("not json"),
            Err(CodecError::Json(_))
        ));
        // Tags are case-sensitive and must be known
        assert!(matches!(
            decode::<InboundTag>("{\"command\":\"new_move\",\"additionalValues\":[]}"),
            Err(CodecError::Json(_))
        ));
        // Outbound tags are not accepted as inbound
        assert!(matches!(
            decode::<InboundTag>("{\"command\":\"MY_MOVE\",\"additionalValues\":[\"A0\"]}"),
            Err(CodecError::Json(_))
        ));
        assert!(matches!(
            decode::<InboundTag>("{\"command\":\"YOUR_BOARD_SYMBOL\",\"additionalValues\":[]}"),
            Err(CodecError::Message(MessageError::Arity { expected: 1, actual: 0, .. }))
        ));
        assert!(matches!(
            decode::<InboundTag>("{\"command\":\"YOUR_BOARD_SYMBOL\",\"additionalValues\":[\"Z\"]}"),
            Err(CodecError::Message(MessageError::Symbol(_)))
        ));
        assert!(matches!(
            decode::<InboundTag>(
                "{\"command\":\"ANOTHER_PLAYER_COORDINATES\",\"additionalValues\":[\"K1\"]}"
            ),
            Err(CodecError::Message(MessageError::Coordinate(_)))
        ));
        assert!(matches!(
            decode::<InboundTag>("{\"command\":\"YOU_WON\",\"additionalValues\":[\"A1\"]}"),
            Err(CodecError::Message(MessageError::Arity { expected: 0, actual: 1, .. }))
        ));
    }

    #[test]
    fn test_encode_my_move() {
        let msg = Message::my_move("A0".parse().unwrap());
        assert_eq!(msg.tag(), OutboundTag::MyMove);
        assert_eq!(msg.values(), ["A0".to_string()]);
        assert_eq!(
            encode(&msg).unwrap(),
            "{\"command\":\"MY_MOVE\",\"additionalValues\":[\"A0\"]}"
        );
        let back: Message<OutboundTag> = decode(&encode(&msg).unwrap()).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_message_new_checks_arity() {
        assert!(Message::new(OutboundTag::MyMove, vec![]).is_err());
        assert!(Message::new(OutboundTag::MyMove, vec!["B2".into(), "B3".into()]).is_err());
        assert!(Message::new(OutboundTag::MyMove, vec!["b2".into()]).is_err());
        assert!(Message::new(OutboundTag::MyMove, vec!["B2".into()]).is_ok());
        assert!(Message::new(InboundTag::GameStart, vec![]).is_ok());
    }
}
