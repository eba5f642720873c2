//! Pending-add queue for names that failed resolution at notification time.
//!
//! A file can be renamed or deleted between the OS queuing an add
//! notification and this engine processing it. Such names wait here and are
//! retried when a later modify or rename event matches them. No expiry:
//! entries persist until matched or the directory is torn down, which is
//! memory-bounded by distinct names.

/// FIFO queue of unresolved add names.
#[derive(Debug, Default)]
pub struct PendingAddQueue {
    names: Vec<String>,
}

impl PendingAddQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Queues a name for a later retry. Duplicates are dropped, keeping the
    /// queue bounded by distinct names.
    pub fn enqueue(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    /// Whether `name` is waiting for resolution.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Removes `name` from the queue, returning whether it was present.
    /// Called once a pending entry has been promoted to a live item.
    pub fn take(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the queued names, in arrival order. Used by the
    /// promote-pending pass after a successful add.
    pub fn snapshot(&self) -> Vec<String> {
        self.names.clone()
    }

    /// Drops every entry. Used on directory change (full reset).
    pub fn clear(&mut self) {
        self.names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_deduplicates() {
        let mut queue = PendingAddQueue::new();
        queue.enqueue("tmp123");
        queue.enqueue("tmp123");
        queue.enqueue("other");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_take_removes_only_match() {
        let mut queue = PendingAddQueue::new();
        queue.enqueue("a");
        queue.enqueue("b");

        assert!(queue.take("a"));
        assert!(!queue.take("a"));
        assert!(queue.contains("b"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_arrival_order() {
        let mut queue = PendingAddQueue::new();
        queue.enqueue("first");
        queue.enqueue("second");
        assert_eq!(queue.snapshot(), ["first", "second"]);
    }
}
