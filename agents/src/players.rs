use crate::board::{GameState, BOARD_COLS, BOARD_ROWS, EMPTY};
use crate::config::{DEFAULT_EXPLORATION_RATE, DEFAULT_LEARNING_RATE};
use crate::value_table::ValueTable;
use rand::prelude::SliceRandom;
use rand::{thread_rng, Rng};
use std::io;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Cross,
    Nought,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Cross => Side::Nought,
            Self::Nought => Side::Cross,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Self::Cross => 'X',
            Self::Nought => 'O',
        }
    }
}

/// The per-move and per-game-end contract between the arena and a policy.
/// `choose_move` must return a member of `available`; the arena validates
/// the returned move and performs the placement itself.
pub trait Player {
    fn get_name(&self) -> &str;
    fn choose_move(
        &mut self,
        state: &GameState,
        available: &[(usize, usize)],
        side: Side,
    ) -> (usize, usize);
    fn game_over(&mut self, _score: f32) {}
    /// Called between games; must not erase anything learned.
    fn reset(&mut self) {}
    fn set_exploration_rate(&mut self, _rate: f32) {}
}

#[derive(Debug)]
pub struct LearningPlayer {
    pub name: String,
    pub exploration_rate: f32,
    pub learning_rate: f32,
    pub values: ValueTable,
    trace: Vec<String>,
}

#[derive(Debug)]
pub struct HeuristicPlayer {
    pub name: String,
}

#[derive(Debug)]
pub struct RandomPlayer {
    pub name: String,
}

#[derive(Debug)]
pub struct HumanPlayer {
    pub name: String,
}

impl LearningPlayer {
    pub fn new(name: &str) -> Self {
        Self::with_rates(name, DEFAULT_EXPLORATION_RATE, DEFAULT_LEARNING_RATE)
    }

    pub fn with_rates(name: &str, exploration_rate: f32, learning_rate: f32) -> Self {
        LearningPlayer {
            name: name.to_owned(),
            exploration_rate,
            learning_rate,
            values: ValueTable::new(),
            trace: Vec::new(),
        }
    }

    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }
}

impl Player for LearningPlayer {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        available: &[(usize, usize)],
        side: Side,
    ) -> (usize, usize) {
        let mut rng = thread_rng();
        let mut candidates = available.to_vec();
        candidates.shuffle(&mut rng);

        // Greedy scan over the shuffled candidates; strict `>` keeps the
        // first shuffled move among value ties.
        let mut best_value = f32::NEG_INFINITY;
        let mut action = candidates[0];
        for &mv in &candidates {
            let value = self
                .values
                .value_of(&state.with_move(side, mv).to_state_key());
            if value > best_value {
                best_value = value;
                action = mv;
            }
        }

        if best_value < 0.01 {
            // Nothing promising is known from here; explore uniformly.
            action = *available.choose(&mut rng).unwrap();
        } else if rng.gen_range(0.0..1.0_f32) * best_value <= self.exploration_rate {
            // Value-scaled exploration: the better the greedy choice
            // looks, the less likely it is to be overridden.
            action = *available.choose(&mut rng).unwrap();
        }

        self.trace
            .push(state.with_move(side, action).to_state_key());
        action
    }

    fn game_over(&mut self, score: f32) {
        self.values
            .backpropagate(&self.trace, self.learning_rate, score);
        self.trace.clear();
    }

    fn reset(&mut self) {
        self.trace.clear();
    }

    fn set_exploration_rate(&mut self, rate: f32) {
        self.exploration_rate = rate;
    }
}

impl HeuristicPlayer {
    pub fn new(name: &str) -> Self {
        HeuristicPlayer {
            name: name.to_owned(),
        }
    }
}

impl Player for HeuristicPlayer {
    fn get_name(&self) -> &str {
        &self.name
    }

    /// Center first, then any move completing one of the mover's own lines
    /// (diagonals preferred), then uniform. Does not block the opponent.
    fn choose_move(
        &mut self,
        state: &GameState,
        available: &[(usize, usize)],
        side: Side,
    ) -> (usize, usize) {
        let mut rng = thread_rng();
        if state[[1, 1]] == EMPTY {
            return (1, 1);
        }

        let mark = side.as_char();
        let mut line_completions = Vec::new();

        for i in 0..BOARD_ROWS {
            if state[[i, 0]] == mark && state[[i, 1]] == mark && state[[i, 2]] == EMPTY {
                line_completions.push((i, 2));
            }
            if state[[i, 0]] == mark && state[[i, 2]] == mark && state[[i, 1]] == EMPTY {
                line_completions.push((i, 1));
            }
            if state[[i, 1]] == mark && state[[i, 2]] == mark && state[[i, 0]] == EMPTY {
                line_completions.push((i, 0));
            }
        }

        for j in 0..BOARD_COLS {
            if state[[0, j]] == mark && state[[1, j]] == mark && state[[2, j]] == EMPTY {
                line_completions.push((2, j));
            }
            if state[[0, j]] == mark && state[[2, j]] == mark && state[[1, j]] == EMPTY {
                line_completions.push((1, j));
            }
            if state[[1, j]] == mark && state[[2, j]] == mark && state[[0, j]] == EMPTY {
                line_completions.push((0, j));
            }
        }

        let mut diagonal_completions = Vec::new();

        if state[[0, 0]] == mark && state[[1, 1]] == mark && state[[2, 2]] == EMPTY {
            diagonal_completions.push((2, 2));
        }
        if state[[0, 0]] == mark && state[[2, 2]] == mark && state[[1, 1]] == EMPTY {
            diagonal_completions.push((1, 1));
        }
        if state[[1, 1]] == mark && state[[2, 2]] == mark && state[[0, 0]] == EMPTY {
            diagonal_completions.push((0, 0));
        }
        if state[[2, 0]] == mark && state[[1, 1]] == mark && state[[0, 2]] == EMPTY {
            diagonal_completions.push((0, 2));
        }
        if state[[2, 0]] == mark && state[[0, 2]] == mark && state[[1, 1]] == EMPTY {
            diagonal_completions.push((1, 1));
        }
        if state[[1, 1]] == mark && state[[0, 2]] == mark && state[[2, 0]] == EMPTY {
            diagonal_completions.push((2, 0));
        }

        if let Some(&mv) = diagonal_completions.choose(&mut rng) {
            mv
        } else if let Some(&mv) = line_completions.choose(&mut rng) {
            mv
        } else {
            *available.choose(&mut rng).unwrap()
        }
    }
}

impl RandomPlayer {
    pub fn new(name: &str) -> Self {
        RandomPlayer {
            name: name.to_owned(),
        }
    }
}

impl Player for RandomPlayer {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        available: &[(usize, usize)],
        _side: Side,
    ) -> (usize, usize) {
        if state[[1, 1]] == EMPTY {
            return (1, 1);
        }
        let mut rng = thread_rng();
        *available.choose(&mut rng).unwrap()
    }
}

impl HumanPlayer {
    pub fn new(name: &str) -> Self {
        HumanPlayer {
            name: name.to_owned(),
        }
    }
}

impl Player for HumanPlayer {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        available: &[(usize, usize)],
        side: Side,
    ) -> (usize, usize) {
        fn read_coordinate(prompt: &str) -> Result<usize, io::Error> {
            let mut counter = 0_i32;
            loop {
                if counter > 2 {
                    println!("You tried 3 times");
                    return Err(io::Error::other("wrong input 3 times"));
                }
                println!("{prompt}");
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
                match line.trim().parse::<usize>() {
                    Ok(n) if (1..=3).contains(&n) => return Ok(n - 1),
                    _ => println!("Unknown symbol, please, try again (a number 1, 2 or 3):"),
                }
                counter += 1;
            }
        }

        fn move_from_human(
            state: &GameState,
            available: &[(usize, usize)],
            name: &str,
            side: Side,
        ) -> Result<(usize, usize), io::Error> {
            state.draw();
            println!("{}, you play {}, please, choose your move", name, side.as_char());
            let row = read_coordinate("please, enter the row number (1-3):")?;
            let col = read_coordinate("please, enter the column number (1-3):")?;
            let mv = (row, col);
            if available.contains(&mv) {
                Ok(mv)
            } else {
                Err(io::Error::other(
                    "The square is taken, please, choose another one.",
                ))
            }
        }

        loop {
            match move_from_human(state, available, &self.name, side) {
                Ok(mv) => return mv,
                Err(err) => println!("{err}. Please, try choosing your move again."),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: [[char; 3]; 3]) -> GameState {
        let mut state = GameState::new();
        for (i, row) in rows.iter().enumerate() {
            for (j, &mark) in row.iter().enumerate() {
                *state.get_mut([i, j]).unwrap() = mark;
            }
        }
        state
    }

    #[test]
    fn heuristic_always_takes_an_empty_center() {
        let mut player = HeuristicPlayer::new("Enhanced");
        let state = board_from([['X', 'O', 'X'], ['-', '-', '-'], ['-', '-', '-']]);
        let available = state.available_moves();
        for _ in 0..20 {
            assert_eq!(player.choose_move(&state, &available, Side::Cross), (1, 1));
        }
    }

    #[test]
    fn heuristic_completes_the_only_row_completion() {
        // Cross holds (0,0) and (0,1); Nought's pair in row 1 is not the
        // mover's and must be ignored.
        let mut player = HeuristicPlayer::new("Enhanced");
        let state = board_from([['X', 'X', '-'], ['O', 'O', '-'], ['-', '-', '-']]);
        let available = state.available_moves();
        for _ in 0..20 {
            assert_eq!(player.choose_move(&state, &available, Side::Cross), (0, 2));
        }
    }

    #[test]
    fn heuristic_prefers_diagonal_completions() {
        // Cross can finish the main diagonal at (2,2), the top row at (0,2)
        // or the middle column at (2,1); the diagonal wins.
        let mut player = HeuristicPlayer::new("Enhanced");
        let state = board_from([['X', 'X', '-'], ['O', 'X', '-'], ['O', '-', '-']]);
        let available = state.available_moves();
        for _ in 0..20 {
            assert_eq!(player.choose_move(&state, &available, Side::Cross), (2, 2));
        }
    }

    #[test]
    fn heuristic_falls_back_to_available_moves() {
        let mut player = HeuristicPlayer::new("Enhanced");
        let state = board_from([['-', '-', '-'], ['-', 'O', '-'], ['-', '-', '-']]);
        let available = state.available_moves();
        for _ in 0..20 {
            let mv = player.choose_move(&state, &available, Side::Cross);
            assert!(available.contains(&mv));
        }
    }

    #[test]
    fn random_player_takes_the_center_first() {
        let mut player = RandomPlayer::new("Random");
        let empty = GameState::new();
        assert_eq!(
            player.choose_move(&empty, &empty.available_moves(), Side::Cross),
            (1, 1)
        );

        let taken = board_from([['-', '-', '-'], ['-', 'X', '-'], ['-', '-', '-']]);
        let available = taken.available_moves();
        for _ in 0..20 {
            let mv = player.choose_move(&taken, &available, Side::Nought);
            assert!(available.contains(&mv));
        }
    }

    #[test]
    fn learning_player_with_empty_table_moves_legally() {
        let mut player = LearningPlayer::new("Learning");
        let state = GameState::new();
        let available = state.available_moves();
        for _ in 0..50 {
            let mv = player.choose_move(&state, &available, Side::Cross);
            assert!(available.contains(&mv));
        }
    }

    #[test]
    fn learning_player_trace_grows_per_move_and_resets() {
        let mut player = LearningPlayer::new("Learning");
        let mut state = GameState::new();
        let mut side = Side::Cross;
        for n in 1..=4 {
            let available = state.available_moves();
            let mv = player.choose_move(&state, &available, side);
            state.place(side, mv);
            side = side.other();
            assert_eq!(player.trace_len(), n);
        }
        player.reset();
        assert_eq!(player.trace_len(), 0);
    }

    #[test]
    fn reset_keeps_the_learned_values() {
        let mut player = LearningPlayer::with_rates("Learning", 0.0, 0.5);
        let state = GameState::new();
        let available = state.available_moves();
        player.choose_move(&state, &available, Side::Cross);
        player.game_over(1.0);
        let entries = player.values.len();
        assert!(entries > 0);
        player.reset();
        assert_eq!(player.values.len(), entries);
    }

    #[test]
    fn greedy_choice_follows_the_seeded_table() {
        let mut player = LearningPlayer::with_rates("Learning", 0.0, 0.1);
        let state = board_from([['X', 'O', '-'], ['-', '-', '-'], ['-', '-', '-']]);
        let key = state.with_move(Side::Cross, (2, 2)).to_state_key();
        player.values.insert(key, 0.8);
        let available = state.available_moves();
        for _ in 0..20 {
            assert_eq!(player.choose_move(&state, &available, Side::Cross), (2, 2));
        }
    }

    #[test]
    fn sides_alternate_and_render() {
        assert_eq!(Side::Cross.other(), Side::Nought);
        assert_eq!(Side::Nought.other(), Side::Cross);
        assert_eq!(Side::Cross.as_char(), 'X');
        assert_eq!(Side::Nought.as_char(), 'O');
    }
}
