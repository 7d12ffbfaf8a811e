use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of opaque identifiers for new categories and links.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

/// Random v4 uuids: unique across runs without any persisted counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable ids (`<prefix>-1`, `<prefix>-2`, ...) for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_do_not_repeat() {
        let ids = UuidGenerator;
        let seen: HashSet<String> = (0..500).map(|_| ids.generate()).collect();
        assert_eq!(seen.len(), 500);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::new("cat");
        assert_eq!(ids.generate(), "cat-1");
        assert_eq!(ids.generate(), "cat-2");
    }
}
