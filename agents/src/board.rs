use crate::players::Side;
use itertools::Itertools;
use ndarray::prelude::*;
use std::{
    fmt,
    ops::{Deref, DerefMut},
};

pub const BOARD_ROWS: usize = 3;
pub const BOARD_COLS: usize = 3;
pub const EMPTY: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Cross,
    Nought,
    Tie,
    None,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub tiles: Array<char, Dim<[usize; 2]>>,
}

impl Deref for GameState {
    type Target = Array<char, Dim<[usize; 2]>>;
    fn deref(&self) -> &Self::Target {
        &self.tiles
    }
}

impl DerefMut for GameState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tiles
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.iter().collect::<String>())
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            tiles: Array::from_elem((BOARD_ROWS, BOARD_COLS), EMPTY),
        }
    }

    /// Row-major serialization of the nine cells. Two boards with the same
    /// cell contents produce the same key no matter which move order
    /// reached them.
    pub fn to_state_key(&self) -> String {
        self.iter().collect::<String>()
    }

    pub fn draw(&self) {
        println!("* * * * *");
        self.to_string()
            .chars()
            .tuples::<(_, _, _)>()
            .for_each(|a| println!("* {} {} {} *", a.0, a.1, a.2));
        println!("* * * * *");
    }

    /// Every empty cell, in row-major order.
    pub fn available_moves(&self) -> Vec<(usize, usize)> {
        (*self)
            .indexed_iter()
            .filter(|(_index, &value)| value == EMPTY)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.iter().all(|&value| value != EMPTY)
    }

    /// The caller is responsible for only placing into available cells.
    pub fn place(&mut self, side: Side, mv: (usize, usize)) {
        let (row, col) = mv;
        debug_assert!(
            self[[row, col]] == EMPTY,
            "cell ({row}, {col}) is already occupied"
        );
        *self.get_mut([row, col]).unwrap() = side.as_char();
    }

    /// Copy of this state with one tentative placement, for scoring a
    /// candidate move without touching the live board.
    pub fn with_move(&self, side: Side, mv: (usize, usize)) -> GameState {
        let mut next = self.clone();
        next.place(side, mv);
        next
    }

    /// Line checks come first, so a full board that contains a line still
    /// reports the winner rather than a tie.
    pub fn winner(&self) -> Winner {
        if *self == Side::Cross.as_char() {
            return Winner::Cross;
        }
        if *self == Side::Nought.as_char() {
            return Winner::Nought;
        }
        if self.is_full() {
            Winner::Tie
        } else {
            Winner::None
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// True when some row, column or diagonal holds three of the given mark.
impl PartialEq<char> for GameState {
    fn eq(&self, other: &char) -> bool {
        for row in self.rows() {
            if row.fold(true, |acc, x| acc && (x == other)) {
                return true;
            }
        }
        for column in self.columns() {
            if column.fold(true, |acc, x| acc && (x == other)) {
                return true;
            }
        }
        if self.diag().fold(true, |acc, x| acc && (x == other)) {
            return true;
        }
        if self[[0, 2]] == *other && self[[1, 1]] == *other && self[[2, 0]] == *other {
            return true;
        }
        false
    }
}
