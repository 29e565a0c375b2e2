use std::cell::Cell;

thread_local! {
    /// Suppresses per-move board drawings and end-of-game announcements;
    /// only the periodic statistics print while set.
    pub static SILENT: Cell<bool> = Cell::new(true);
}

pub const DEFAULT_EXPLORATION_RATE: f32 = 0.12;
pub const DEFAULT_LEARNING_RATE: f32 = 0.1;
pub const DISCOUNT_RATE: f32 = 0.9;

pub const NUM_GAMES: u32 = 100_000;
pub const STATS_INTERVAL: u32 = 10_000;
