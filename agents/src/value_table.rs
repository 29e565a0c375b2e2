use crate::config::DISCOUNT_RATE;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Tabular state-value estimates keyed by the board's state key. Unseen
/// states read as 0.0. The table lives in process memory for the duration
/// of one run and grows by one entry per distinct state the owning player
/// visits as the mover.
#[derive(Debug, Clone)]
pub struct ValueTable {
    values: HashMap<String, f32>,
}

impl Deref for ValueTable {
    type Target = HashMap<String, f32>;
    fn deref(&self) -> &<Self as Deref>::Target {
        &self.values
    }
}

impl DerefMut for ValueTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}

impl ValueTable {
    pub fn new() -> Self {
        ValueTable {
            values: HashMap::with_capacity(8192),
        }
    }

    pub fn value_of(&self, key: &str) -> f32 {
        self.get(key).copied().unwrap_or(0.0)
    }

    /// Backward sweep over one episode, most recent state first. Each
    /// earlier state's target is the already-updated value of the state
    /// that followed it, so the fold must stay sequential.
    pub fn backpropagate(&mut self, trace: &[String], learning_rate: f32, mut score: f32) {
        for key in trace.iter().rev() {
            let value = self.entry(key.clone()).or_insert(0.0);
            *value += learning_rate * (DISCOUNT_RATE * score - *value);
            score = *value;
        }
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_keys_read_as_zero() {
        let table = ValueTable::new();
        assert_eq!(table.value_of("---------"), 0.0);
    }

    #[test]
    fn single_entry_update_matches_the_rule() {
        let mut table = ValueTable::new();
        let trace = vec!["----X----".to_owned()];
        table.backpropagate(&trace, 0.1, 1.0);
        // 0.0 + 0.1 * (0.9 * 1.0 - 0.0)
        assert!((table.value_of("----X----") - 0.09).abs() < 1e-6);
    }

    #[test]
    fn repeated_updates_converge_toward_discounted_score() {
        let mut table = ValueTable::new();
        let trace = vec!["----X----".to_owned()];
        let mut previous = 0.0;
        for _ in 0..200 {
            table.backpropagate(&trace, 0.1, 1.0);
            let current = table.value_of("----X----");
            assert!(current > previous);
            assert!(current <= 0.9);
            previous = current;
        }
        assert!((previous - 0.9).abs() < 1e-3);
    }

    #[test]
    fn earlier_states_chain_on_updated_later_values() {
        let mut table = ValueTable::new();
        let trace = vec!["first".to_owned(), "second".to_owned()];
        table.backpropagate(&trace, 0.5, 1.0);
        let second = table.value_of("second");
        let first = table.value_of("first");
        assert!((second - 0.45).abs() < 1e-6);
        assert!((first - 0.5 * 0.9 * second).abs() < 1e-6);
    }
}
