//! Pending task queue

use crate::task::Task;
use std::collections::VecDeque;

/// FIFO list of tasks waiting for the drain loop.
///
/// No priority, no deduplication and no capacity bound: insertion order is
/// the only ordering.
#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, task: Task) {
        self.pending.push_back(task);
    }

    /// Next task in insertion order, or `None` when empty. Never blocks.
    pub fn dequeue_next(&mut self) -> Option<Task> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskKind;

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new();
        for id in ["a", "b", "c"] {
            queue.enqueue(Task::new(id, id, TaskKind::Terminal));
        }
        assert_eq!(queue.len(), 3);

        let order: Vec<String> = std::iter::from_fn(|| queue.dequeue_next())
            .map(|t| t.id().to_string())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_dequeue_returns_none() {
        let mut queue = TaskQueue::new();
        assert!(queue.dequeue_next().is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut queue = TaskQueue::new();
        queue.enqueue(Task::new("same", "first", TaskKind::Desktop));
        queue.enqueue(Task::new("same", "second", TaskKind::Desktop));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue_next().unwrap().description(), "first");
    }
}
