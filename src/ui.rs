use common::{Board, Coordinate, MoveError, Outcome, Symbol, BOARD_SIZE, ROW_LETTERS};
use std::fmt;
use std::io::{self, Write};
use tracing::warn;

/// Things a player should be told about. Rendering them is up to the
/// presenter; the session never formats text itself.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Connected,
    SymbolAssigned(Symbol),
    GameStarted,
    WaitForTurn,
    OpponentMoved(Coordinate),
    AwaitingMove,
    InvalidInput { input: String, reason: MoveError },
    MoveSent(Coordinate),
    MoveRejected(Coordinate),
    TurnPassed,
    GameOver(Outcome),
}

pub trait Presenter: Send {
    fn event(&mut self, event: SessionEvent);

    fn board(&mut self, board: &Board);
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Connected => write!(f, "Connected to the game server."),
            SessionEvent::SymbolAssigned(symbol) => write!(f, "You are playing {}.", symbol),
            SessionEvent::GameStarted => write!(f, "The game has started."),
            SessionEvent::WaitForTurn => write!(f, "Waiting for your opponent..."),
            SessionEvent::OpponentMoved(c) => write!(f, "Your opponent played {}.", c),
            SessionEvent::AwaitingMove => {
                write!(f, "Your turn. Enter coordinates (row A-J, column 0-9, e.g. B3):")
            }
            SessionEvent::InvalidInput { input, reason } => {
                write!(f, "{:?} was not sent: {}. Try again:", input, reason)
            }
            SessionEvent::MoveSent(c) => write!(f, "Sent {}.", c),
            SessionEvent::MoveRejected(c) => {
                write!(f, "The server refused {}. Pick another cell:", c)
            }
            SessionEvent::TurnPassed => write!(f, "Move accepted. Opponent's turn."),
            SessionEvent::GameOver(Outcome::Win) => write!(f, "You won!"),
            SessionEvent::GameOver(Outcome::Lose) => write!(f, "You lost."),
        }
    }
}

pub fn render_board(board: &Board) -> String {
    let separator = format!("   +{}\n", "---+".repeat(BOARD_SIZE));
    let header = (0..BOARD_SIZE)
        .map(|c| c.to_string())
        .collect::<Vec<String>>()
        .join("   ");
    let mut out = format!("     {}\n", header);
    for (letter, row) in ROW_LETTERS.chars().zip(board.rows()) {
        out.push_str(&separator);
        let cells = row
            .iter()
            .map(|cell| cell.map_or(" ".to_string(), |s| s.to_string()))
            .collect::<Vec<String>>()
            .join(" | ");
        out.push_str(&format!(" {} | {} |\n", letter, cells));
    }
    out.push_str(&separator);
    out
}

// Plain-text presenter for a terminal
pub struct ConsoleUi<W: Write + Send> {
    out: W,
}

impl Default for ConsoleUi<io::Stdout> {
    fn default() -> Self {
        ConsoleUi { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleUi<W> {
    pub fn new(out: W) -> Self {
        ConsoleUi { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Failed to write to console: {}", err);
        }
    }
}

impl<W: Write + Send> Presenter for ConsoleUi<W> {
    fn event(&mut self, event: SessionEvent) {
        self.write(&event.to_string());
    }

    fn board(&mut self, board: &Board) {
        self.write(&render_board(board));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board() {
        let mut board = Board::new();
        board.set_cell("A0".parse().unwrap(), Symbol::X).unwrap();
        board.set_cell("J9".parse().unwrap(), Symbol::O).unwrap();
        let text = render_board(&board);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + 2 * BOARD_SIZE + 1);
        assert_eq!(lines[0], "     0   1   2   3   4   5   6   7   8   9");
        assert_eq!(lines[1], "   +---+---+---+---+---+---+---+---+---+---+");
        assert_eq!(lines[2], " A | X |   |   |   |   |   |   |   |   |   |");
        assert_eq!(lines[20], " J |   |   |   |   |   |   |   |   |   | O |");
    }

    #[test]
    fn test_console_ui_writes_events() {
        let mut ui = ConsoleUi::new(Vec::new());
        ui.event(SessionEvent::SymbolAssigned(Symbol::O));
        ui.event(SessionEvent::InvalidInput {
            input: "K1".to_string(),
            reason: MoveError::Format(common::CoordinateError::Row('K')),
        });
        ui.event(SessionEvent::GameOver(Outcome::Win));
        let text = String::from_utf8(ui.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "You are playing O.");
        assert!(lines[1].starts_with("\"K1\" was not sent"));
        assert_eq!(lines[2], "You won!");
    }
}
