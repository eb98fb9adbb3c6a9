//! Insertion Order Module
//!
//! Tracks the order keys were written in, for FIFO overflow eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keys in the order they were last written.
///
/// - Front = oldest write
/// - Back = newest write
///
/// Reads never reorder keys; only writes do.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Write ==
    /// Marks `key` as the newest write.
    ///
    /// A key already present moves to the back: rewriting an entry counts as
    /// a fresh insertion.
    pub fn record_write(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest-written key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Iterate ==
    /// Keys from oldest to newest write.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_oldest_is_first_written() {
        let mut order = InsertionOrder::new();

        order.record_write("a");
        order.record_write("b");
        order.record_write("c");

        assert_eq!(order.peek_oldest(), Some(&"a".to_string()));
        assert_eq!(order.pop_oldest(), Some("a".to_string()));
        assert_eq!(order.pop_oldest(), Some("b".to_string()));
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_rewrite_moves_key_to_newest() {
        let mut order = InsertionOrder::new();

        order.record_write("a");
        order.record_write("b");
        order.record_write("a");

        assert_eq!(order.len(), 2);
        assert_eq!(order.pop_oldest(), Some("b".to_string()));
        assert_eq!(order.pop_oldest(), Some("a".to_string()));
    }

    #[test]
    fn test_pop_empty() {
        let mut order = InsertionOrder::new();
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_remove_and_contains() {
        let mut order = InsertionOrder::new();
        order.record_write("games_{}");
        order.record_write("teams_{}");

        order.remove("games_{}");
        order.remove("nonexistent");

        assert!(!order.contains("games_{}"));
        assert!(order.contains("teams_{}"));
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_iter_oldest_to_newest() {
        let mut order = InsertionOrder::new();
        order.record_write("x");
        order.record_write("y");
        order.record_write("z");

        let keys: Vec<&String> = order.iter().collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_clear() {
        let mut order = InsertionOrder::new();
        order.record_write("x");
        order.clear();
        assert!(order.is_empty());
    }
}
