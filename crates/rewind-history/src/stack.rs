//! Bounded per-file history stack.

use crate::OperationRecord;
use std::collections::VecDeque;

/// Ordered records for one file, oldest first, never longer than its capacity.
///
/// Pushing onto a full stack evicts the oldest record.
#[derive(Debug)]
pub struct HistoryStack {
    records: VecDeque<OperationRecord>,
    capacity: usize,
}

impl HistoryStack {
    /// Create an empty stack holding at most `capacity` records.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, returning the records evicted to make room.
    pub fn push(&mut self, record: OperationRecord) -> Vec<OperationRecord> {
        let mut evicted = Vec::new();
        while self.records.len() >= self.capacity {
            match self.records.pop_front() {
                Some(oldest) => evicted.push(oldest),
                None => break,
            }
        }
        self.records.push_back(record);
        evicted
    }

    /// The newest record.
    pub fn peek(&self) -> Option<&OperationRecord> {
        self.records.back()
    }

    /// Remove and return the newest record.
    pub fn pop(&mut self) -> Option<OperationRecord> {
        self.records.pop_back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OperationRecord> + ExactSizeIterator {
        self.records.iter()
    }

    /// Iterate newest to oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &OperationRecord> {
        self.records.iter().rev()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operation, OperationId};

    fn record(id: u64) -> OperationRecord {
        OperationRecord::new(OperationId(id), Operation::create(format!("v{id}")))
    }

    #[test]
    fn test_push_within_capacity() {
        let mut stack = HistoryStack::new(3);
        assert!(stack.push(record(1)).is_empty());
        assert!(stack.push(record(2)).is_empty());
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek().unwrap().id, OperationId(2));
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut stack = HistoryStack::new(3);
        for id in 1..=5 {
            stack.push(record(id));
        }

        assert_eq!(stack.len(), 3);
        let ids: Vec<u64> = stack.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn test_push_returns_evicted_record() {
        let mut stack = HistoryStack::new(1);
        stack.push(record(1));
        let evicted = stack.push(record(2));
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, OperationId(1));
    }

    #[test]
    fn test_pop_newest_first() {
        let mut stack = HistoryStack::new(10);
        stack.push(record(1));
        stack.push(record(2));

        assert_eq!(stack.pop().unwrap().id, OperationId(2));
        assert_eq!(stack.pop().unwrap().id, OperationId(1));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_iter_newest_first() {
        let mut stack = HistoryStack::new(10);
        for id in 1..=3 {
            stack.push(record(id));
        }
        let ids: Vec<u64> = stack.iter_newest_first().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut stack = HistoryStack::new(0);
        stack.push(record(1));
        stack.push(record(2));
        assert_eq!(stack.capacity(), 1);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek().unwrap().id, OperationId(2));
    }
}
