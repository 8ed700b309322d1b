//! Caption Id Generation
//!
//! Ids are handed out by an injectable generator so that parsing and
//! editing stay deterministic under test.

use crate::core::CaptionId;

/// Source of fresh, never-reused caption ids
pub trait IdGenerator: Send {
    /// Returns an id that has not been returned before
    fn next_id(&mut self) -> CaptionId;
}

/// Default generator backed by ULIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidIdGenerator;

impl IdGenerator for UlidIdGenerator {
    fn next_id(&mut self) -> CaptionId {
        ulid::Ulid::new().to_string()
    }
}

/// Deterministic generator producing `<prefix>_<n>` ids
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 0,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("cap")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> CaptionId {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIdGenerator::new("t");
        assert_eq!(ids.next_id(), "t_0");
        assert_eq!(ids.next_id(), "t_1");
        assert_eq!(ids.next_id(), "t_2");
    }

    #[test]
    fn test_ulid_ids_are_unique() {
        let mut ids = UlidIdGenerator;
        let seen: HashSet<_> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
