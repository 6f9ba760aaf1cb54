//! Persistent state manager: per-program cyclic counters and last-trigger
//! timestamps referenced by builtins. Both maps grow monotonically during a
//! run and are reset wholesale only by an explicit `reset()` call.
//!
//! Maps are guarded by `RefCell` rather than threaded as `&mut` through the
//! resolver: these maps are only ever touched from the tick thread, so
//! there is no concurrent access to contend with — interior mutability just
//! lets builtins take `&Context` instead of `&mut Context` through
//! arbitrarily deep resolution recursion.

use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
pub struct StateManager {
    cycles: RefCell<HashMap<String, usize>>,
    triggers: RefCell<HashMap<String, f64>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counter's value *before* incrementing, then advances it
    /// to `(current + 1) mod list_length`. Initialises an absent key to 0.
    pub fn increment_cycle(&self, key: &str, list_length: usize) -> usize {
        if list_length == 0 {
            return 0;
        }
        let mut cycles = self.cycles.borrow_mut();
        let current = *cycles.get(key).unwrap_or(&0);
        cycles.insert(key.to_string(), (current + 1) % list_length);
        current % list_length
    }

    pub fn get_last_trigger(&self, key: &str) -> (f64, bool) {
        match self.triggers.borrow().get(key) {
            Some(&t) => (t, true),
            None => (0.0, false),
        }
    }

    pub fn set_last_trigger(&self, key: &str, t: f64) {
        self.triggers.borrow_mut().insert(key.to_string(), t);
    }

    /// True if there is no record for `key`, or `now - last >= gap`.
    pub fn can_trigger(&self, key: &str, now: f64, gap: f64) -> bool {
        match self.get_last_trigger(key) {
            (_, false) => true,
            (last, true) => now - last >= gap,
        }
    }

    /// Empties both maps; `HashMap::clear` already keeps allocated capacity
    /// around for reuse.
    pub fn reset(&self) {
        self.cycles.borrow_mut().clear();
        self.triggers.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_round_robins_through_indices() {
        let sm = StateManager::new();
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(sm.increment_cycle("k", 3));
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn distinct_keys_have_independent_counters() {
        let sm = StateManager::new();
        assert_eq!(sm.increment_cycle("a", 2), 0);
        assert_eq!(sm.increment_cycle("b", 2), 0);
        assert_eq!(sm.increment_cycle("a", 2), 1);
    }

    #[test]
    fn can_trigger_true_when_absent() {
        let sm = StateManager::new();
        assert!(sm.can_trigger("k", 10.0, 1.0));
    }

    #[test]
    fn can_trigger_false_within_gap() {
        let sm = StateManager::new();
        sm.set_last_trigger("k", 10.0);
        assert!(!sm.can_trigger("k", 10.5, 1.0));
        assert!(sm.can_trigger("k", 11.0, 1.0));
    }

    #[test]
    fn reset_clears_both_maps() {
        let sm = StateManager::new();
        sm.increment_cycle("k", 3);
        sm.set_last_trigger("k", 1.0);
        sm.reset();
        assert_eq!(sm.get_last_trigger("k"), (0.0, false));
        assert_eq!(sm.increment_cycle("k", 3), 0);
    }
}
