use async_trait::async_trait;
use common::Board;
use rand::prelude::IteratorRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

/// Where candidate moves come from. Candidates are raw text; the session
/// checks them before anything reaches the server.
#[async_trait]
pub trait MoveSource: Send {
    /// `None` means no more input will ever arrive.
    async fn next_move(&mut self, board: &Board) -> Option<String>;
}

// One candidate per line, passed through as typed
pub struct LineInput<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineInput<R> {
    pub fn new(reader: R) -> Self {
        LineInput {
            lines: reader.lines(),
        }
    }
}

pub type StdinInput = LineInput<BufReader<Stdin>>;

impl Default for StdinInput {
    fn default() -> Self {
        LineInput::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MoveSource for LineInput<R> {
    async fn next_move(&mut self, _board: &Board) -> Option<String> {
        match self.lines.next_line().await {
            // Only the line ending goes; stray spaces reach the coordinate check
            Ok(line) => line.map(|l| l.trim_end_matches('\r').to_string()),
            Err(err) => {
                warn!("Failed to read move: {}", err);
                None
            }
        }
    }
}

// Replays a fixed list of candidates, valid or not
#[derive(Debug, Default)]
pub struct ScriptedInput {
    moves: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl MoveSource for ScriptedInput {
    async fn next_move(&mut self, _board: &Board) -> Option<String> {
        self.moves.pop_front()
    }
}

#[derive(Debug)]
pub struct RandomInput {
    rng: StdRng,
}

impl Default for RandomInput {
    fn default() -> Self {
        RandomInput {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomInput {
    pub fn seeded(seed: u64) -> Self {
        RandomInput {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[async_trait]
impl MoveSource for RandomInput {
    async fn next_move(&mut self, board: &Board) -> Option<String> {
        board
            .empty_cells()
            .choose(&mut self.rng)
            .map(|c| c.to_string())
    }
}
