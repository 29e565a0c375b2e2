use crate::board::{GameState, Winner};
use crate::config::{NUM_GAMES, SILENT, STATS_INTERVAL};
use crate::players::{HeuristicPlayer, HumanPlayer, LearningPlayer, Player, Side};
use anyhow::{anyhow, Error};
use colored::Colorize;
use std::mem;

pub mod board;
pub mod config;
pub mod players;
pub mod value_table;

/// Runs games between two policies and keeps the running score. The `p1`
/// seat plays Cross (the first move) for the current game; `swap_players`
/// rotates the seats together with their counters.
pub struct Arena {
    pub board: GameState,
    pub p1: Box<dyn Player>,
    pub p2: Box<dyn Player>,
    pub wins_p1: u32,
    pub wins_p2: u32,
    pub ties: u32,
    pub games: u32,
}

impl Arena {
    pub fn new(p1: Box<dyn Player>, p2: Box<dyn Player>) -> Self {
        Arena {
            board: GameState::new(),
            p1,
            p2,
            wins_p1: 0,
            wins_p2: 0,
            ties: 0,
            games: 0,
        }
    }

    /// Play one game to completion. Every move a policy returns is checked
    /// against the available list; an out-of-list move aborts the game
    /// with an error instead of corrupting the board.
    pub fn play(&mut self) -> Result<Winner, Error> {
        loop {
            let outcome = Self::half_turn(&mut self.board, self.p1.as_mut(), Side::Cross)?;
            if outcome != Winner::None {
                return Ok(self.finish(outcome));
            }
            let outcome = Self::half_turn(&mut self.board, self.p2.as_mut(), Side::Nought)?;
            if outcome != Winner::None {
                return Ok(self.finish(outcome));
            }
        }
    }

    fn half_turn(
        board: &mut GameState,
        player: &mut dyn Player,
        side: Side,
    ) -> Result<Winner, Error> {
        let available = board.available_moves();
        let mv = player.choose_move(board, &available, side);
        if !available.contains(&mv) {
            return Err(anyhow!(
                "{} returned unavailable move ({}, {})",
                player.get_name(),
                mv.0,
                mv.1
            ));
        }
        board.place(side, mv);
        if !SILENT.with(|s| s.get()) {
            println!(
                "{} is making its move: {}, {}",
                player.get_name(),
                mv.0 + 1,
                mv.1 + 1
            );
            board.draw();
        }
        Ok(board.winner())
    }

    fn finish(&mut self, outcome: Winner) -> Winner {
        self.games += 1;
        let silent = SILENT.with(|s| s.get());
        match outcome {
            Winner::Cross => {
                self.wins_p1 += 1;
                if !silent {
                    println!("{} won!", self.p1.get_name());
                }
                self.p1.game_over(1.0);
                self.p2.game_over(0.0);
            }
            Winner::Nought => {
                self.wins_p2 += 1;
                if !silent {
                    println!("{} won!", self.p2.get_name());
                }
                self.p1.game_over(0.0);
                self.p2.game_over(1.0);
            }
            Winner::Tie => {
                self.ties += 1;
                if !silent {
                    println!("Tie");
                }
                // Tie rewards are asymmetric between the seats.
                self.p1.game_over(0.25);
                self.p2.game_over(0.5);
            }
            Winner::None => unreachable!("finish is only called on terminal outcomes"),
        }
        outcome
    }

    /// Fresh board and a new episode for both players; learned state stays.
    pub fn reset(&mut self) {
        self.board = GameState::new();
        self.p1.reset();
        self.p2.reset();
    }

    pub fn reset_stats(&mut self) {
        self.games = 0;
        self.wins_p1 = 0;
        self.wins_p2 = 0;
        self.ties = 0;
    }

    pub fn swap_players(&mut self) {
        mem::swap(&mut self.p1, &mut self.p2);
        mem::swap(&mut self.wins_p1, &mut self.wins_p2);
    }

    pub fn into_players(self) -> (Box<dyn Player>, Box<dyn Player>) {
        (self.p1, self.p2)
    }

    pub fn draw_stats(&self) {
        if self.games == 0 {
            return;
        }
        let games = self.games as f32;
        let p1_name = if self.wins_p1 > self.wins_p2 {
            self.p1.get_name().green()
        } else {
            self.p1.get_name().red()
        };
        let p2_name = if self.wins_p2 > self.wins_p1 {
            self.p2.get_name().green()
        } else {
            self.p2.get_name().red()
        };
        println!(
            "Wins: {}: {} ({:.1}%), {}: {} ({:.1}%), Ties: {} ({:.1}%)",
            p1_name,
            self.wins_p1,
            self.wins_p1 as f32 / games * 100.0,
            p2_name,
            self.wins_p2,
            self.wins_p2 as f32 / games * 100.0,
            self.ties,
            self.ties as f32 / games * 100.0,
        );
    }
}

/// The main schedule: the seats swap every second game so the first-move
/// advantage alternates, and the statistics print and reset every
/// `STATS_INTERVAL` games.
pub fn play_games_with_swap(
    games: u32,
    p1: Box<dyn Player>,
    p2: Box<dyn Player>,
) -> Result<Arena, Error> {
    let mut arena = Arena::new(p1, p2);
    for game in 0..games {
        arena.play()?;
        arena.reset();
        if game % 2 == 0 && game > 0 {
            arena.swap_players();
        }
        if game % STATS_INTERVAL == 0 && game > 0 {
            arena.draw_stats();
            arena.reset_stats();
        }
    }
    if games % 2 == 0 {
        arena.swap_players();
    }
    arena.draw_stats();
    Ok(arena)
}

/// Fixed seats; plays twice the requested game count.
pub fn play_games(games: u32, p1: Box<dyn Player>, p2: Box<dyn Player>) -> Result<Arena, Error> {
    let mut arena = Arena::new(p1, p2);
    for game in 0..games * 2 {
        arena.play()?;
        arena.reset();
        if game % STATS_INTERVAL == 0 && game > 0 {
            arena.draw_stats();
            arena.reset_stats();
        }
    }
    arena.draw_stats();
    Ok(arena)
}

pub fn train_learning_vs_heuristic() -> Result<(), Error> {
    let learner = Box::new(LearningPlayer::with_rates("Learning 1", 0.1, 0.2));
    let enhanced = Box::new(HeuristicPlayer::new("Enhanced"));
    play_games_with_swap(NUM_GAMES, learner, enhanced)?;
    Ok(())
}

/// Trains an agent for this process run only (nothing is loaded from or
/// saved to disk), then puts it against a human with exploration switched
/// off.
pub fn play_human_vs_learning() -> Result<(), Error> {
    let learner = Box::new(LearningPlayer::with_rates("Learning", 0.1, 0.2));
    let enhanced = Box::new(HeuristicPlayer::new("Enhanced"));
    println!("Training for {NUM_GAMES} games...");
    let arena = play_games_with_swap(NUM_GAMES, learner, enhanced)?;

    let (a, b) = arena.into_players();
    let mut trained = if a.get_name() == "Learning" { a } else { b };
    trained.set_exploration_rate(0.0);

    let human = Box::new(HumanPlayer::new("Human"));
    let mut arena = Arena::new(human, trained);
    SILENT.with(|s| s.set(false));
    let outcome = arena.play()?;
    SILENT.with(|s| s.set(true));
    match outcome {
        Winner::Cross => println!("Congratulations, you have won!"),
        Winner::Nought => println!("Really sorry, you have lost."),
        _ => println!("The game ended in a draw."),
    }
    Ok(())
}
