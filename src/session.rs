use crate::error::SessionError;
use crate::input::MoveSource;
use crate::transport::Transport;
use crate::ui::{Presenter, SessionEvent};
use common::{
    decode, encode, Board, Coordinate, InboundTag, Message, Outcome, Protocol, ProtocolState,
    ServerEvent, Symbol,
};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Client side of one game: reads server messages, keeps the local board in
/// step with them and submits moves when it is our turn.
///
/// A session owns its connection and is used for exactly one game.
/// Messages are handled strictly one at a time, and any move a message
/// calls for is sent before the next message is read.
pub struct Session<T, I, P> {
    id: Uuid,
    transport: T,
    input: I,
    presenter: P,
    protocol: Protocol,
    board: Board,
    symbol: Option<Symbol>,
    // Sent to the server but not yet confirmed by it
    pending: Option<Coordinate>,
    outcome: Option<Outcome>,
}

impl<T, I, P> Session<T, I, P>
where
    T: Transport,
    I: MoveSource,
    P: Presenter,
{
    pub fn new(transport: T, input: I, presenter: P) -> Self {
        Session {
            id: Uuid::new_v4(),
            transport,
            input,
            presenter,
            protocol: Protocol::new(),
            board: Board::new(),
            symbol: None,
            pending: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ProtocolState {
        self.protocol.state()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    pub fn pending_move(&self) -> Option<Coordinate> {
        self.pending
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Plays the game to its end. The connection is closed on the way out
    /// whether the game finished or failed.
    pub async fn run(mut self) -> Result<Outcome, SessionError> {
        let span = info_span!("session", id = %self.id);
        async move {
            info!("session started");
            let result = self.play().await;
            if let Err(err) = self.transport.close().await {
                warn!("error closing connection: {}", err);
            }
            match &result {
                Ok(outcome) => info!("game over: {:?}", outcome),
                Err(err) => error!("session aborted: {}", err),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn play(&mut self) -> Result<Outcome, SessionError> {
        loop {
            let message = self.receive().await?;
            // handle may have advanced state before failing
            let (state, tag) = (self.state(), message.tag());
            if let Err(err) = self.handle(message).await {
                warn!("could not handle {:?} in state {:?}: {}", tag, state, err);
                return Err(err);
            }
            if let Some(outcome) = self.outcome {
                return Ok(outcome);
            }
        }
    }

    async fn receive(&mut self) -> Result<Message<InboundTag>, SessionError> {
        let frame = self
            .transport
            .receive()
            .await
            .ok_or(SessionError::Disconnected)??;
        Ok(decode(&frame)?)
    }

    /// Applies one server message. Any error is fatal for the session.
    #[tracing::instrument(skip_all, fields(id = %self.id, tag = ?message.tag()))]
    pub async fn handle(&mut self, message: Message<InboundTag>) -> Result<(), SessionError> {
        let state = self.protocol.state();
        let tag = message.tag();
        if !self.protocol.validate_inbound(tag) {
            return Err(SessionError::Protocol { state, tag });
        }
        debug!("{:?}: {:?} -> {:?}", tag, state, self.protocol.state());

        match ServerEvent::try_from(&message)? {
            ServerEvent::Connected => self.presenter.event(SessionEvent::Connected),
            ServerEvent::AssignedSymbol(symbol) => {
                if self.symbol.is_some() {
                    return Err(SessionError::Desync("board symbol assigned twice"));
                }
                info!("assigned symbol {}", symbol);
                self.symbol = Some(symbol);
                self.presenter.event(SessionEvent::SymbolAssigned(symbol));
            }
            ServerEvent::GameStart => self.presenter.event(SessionEvent::GameStarted),
            ServerEvent::WaitTurn => {
                self.presenter.board(&self.board);
                self.presenter.event(SessionEvent::WaitForTurn);
            }
            ServerEvent::OpponentMoved(coordinate) => {
                let symbol = self.own_symbol()?.opponent();
                self.board.set_cell(coordinate, symbol)?;
                self.presenter.board(&self.board);
                self.presenter.event(SessionEvent::OpponentMoved(coordinate));
            }
            ServerEvent::YourTurn => {
                self.presenter.board(&self.board);
                self.presenter.event(SessionEvent::AwaitingMove);
                self.acquire_move().await?;
            }
            ServerEvent::MoveRejected => {
                let rejected = self
                    .pending
                    .take()
                    .ok_or(SessionError::Desync("move rejected with none pending"))?;
                info!("server rejected move {}", rejected);
                self.presenter.event(SessionEvent::MoveRejected(rejected));
                self.acquire_move().await?;
            }
            ServerEvent::TurnAdvance => {
                let confirmed = self
                    .pending
                    .take()
                    .ok_or(SessionError::Desync("turn advanced with no move pending"))?;
                self.commit(confirmed)?;
                self.presenter.event(SessionEvent::TurnPassed);
            }
            ServerEvent::YouWon => self.finish(Outcome::Win)?,
            ServerEvent::YouLost => self.finish(Outcome::Lose)?,
        }
        Ok(())
    }

    // Prompts until the input yields a move the protocol accepts, then sends
    // it. Bad input is never sent, so it is retried here rather than failing
    // the session.
    async fn acquire_move(&mut self) -> Result<(), SessionError> {
        loop {
            let candidate = self
                .input
                .next_move(&self.board)
                .await
                .ok_or(SessionError::InputClosed)?;
            match self.protocol.check_outbound_move(&candidate) {
                Ok(coordinate) => {
                    self.pending = Some(coordinate);
                    let frame = encode(&Message::my_move(coordinate))?;
                    self.transport.send(frame).await?;
                    info!("sent move {}", coordinate);
                    self.presenter.event(SessionEvent::MoveSent(coordinate));
                    return Ok(());
                }
                Err(reason) => {
                    debug!("refused local input {:?}: {}", candidate, reason);
                    self.presenter.event(SessionEvent::InvalidInput {
                        input: candidate,
                        reason,
                    });
                }
            }
        }
    }

    fn commit(&mut self, coordinate: Coordinate) -> Result<(), SessionError> {
        let symbol = self.own_symbol()?;
        self.board.set_cell(coordinate, symbol)?;
        self.presenter.board(&self.board);
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        if let Some(last) = self.pending.take() {
            self.commit(last)?;
        } else {
            self.presenter.board(&self.board);
        }
        self.outcome = Some(outcome);
        self.presenter.event(SessionEvent::GameOver(outcome));
        Ok(())
    }

    fn own_symbol(&self) -> Result<Symbol, SessionError> {
        self.symbol
            .ok_or(SessionError::Desync("no board symbol has been assigned"))
    }
}
