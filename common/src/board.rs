use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const BOARD_SIZE: usize = 10;
pub const ROW_LETTERS: &str = "ABCDEFGHIJ";

#[derive(Error, Clone, Debug, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinate {0:?} must be exactly two characters")]
    Length(String),
    #[error("Row {0:?} is not a letter from A to J")]
    Row(char),
    #[error("Column {0:?} is not a digit")]
    Column(char),
    #[error("Index {0} is outside the board")]
    Index(usize),
}

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Cell {coordinate} already holds {occupant}")]
    Occupied {
        coordinate: Coordinate,
        occupant: Symbol,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn opponent(&self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Symbol::X),
            "O" => Ok(Symbol::O),
            other => Err(format!("Unknown board symbol {:?}", other)),
        }
    }
}

/// A cell address such as `B3`: row letter `A`-`J`, then column digit `0`-`9`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    row: usize,
    col: usize,
}

impl Coordinate {
    // Row-major offset into the flat cell array
    pub fn index(&self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    pub fn from_index(index: usize) -> Result<Self, CoordinateError> {
        if index >= BOARD_SIZE * BOARD_SIZE {
            return Err(CoordinateError::Index(index));
        }
        Ok(Coordinate {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        })
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (letter, digit) = match (chars.next(), chars.next(), chars.next()) {
            (Some(letter), Some(digit), None) => (letter, digit),
            _ => return Err(CoordinateError::Length(s.to_string())),
        };
        let row = ROW_LETTERS
            .find(letter)
            .ok_or(CoordinateError::Row(letter))?;
        let col = digit
            .to_digit(10)
            .ok_or(CoordinateError::Column(digit))? as usize;
        Ok(Coordinate { row, col })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // row is always < BOARD_SIZE, so the slice is a single ASCII letter
        write!(f, "{}{}", &ROW_LETTERS[self.row..=self.row], self.col)
    }
}

pub type Cell = Option<Symbol>;

// Always BOARD_SIZE * BOARD_SIZE cells; only `Default` builds one
#[derive(Clone, Debug, PartialEq)]
pub struct Board(Vec<Cell>);

impl Default for Board {
    fn default() -> Self {
        Board(vec![None; BOARD_SIZE * BOARD_SIZE])
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // Cells are write-once: placing onto an occupied cell means the client
    // and server no longer agree on the game.
    pub fn set_cell(&mut self, coordinate: Coordinate, symbol: Symbol) -> Result<(), BoardError> {
        let cell = &mut self.0[coordinate.index()];
        if let Some(occupant) = cell {
            return Err(BoardError::Occupied {
                coordinate,
                occupant: *occupant,
            });
        }
        *cell = Some(symbol);
        Ok(())
    }

    pub fn get(&self, coordinate: Coordinate) -> Cell {
        self.0[coordinate.index()]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.0.chunks(BOARD_SIZE)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .filter_map(|(idx, _)| Coordinate::from_index(idx).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}
