use crate::domain::transaction::TransactionRequest;
use crate::error::{BankError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Unbounded multi-producer multi-consumer FIFO of pending requests.
///
/// Consumers park on a [`Notify`] while the queue is open and empty.
/// Closing wins over queued items: once `close` runs, `take` returns
/// `None` even if a backlog remains, so shutdown abandons undequeued work
/// instead of racing producers.
#[derive(Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<TransactionRequest>>,
    notify: Notify,
    closed: AtomicBool,
}

impl WorkQueue {
    /// Creates an open, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `request`. Never blocks on capacity; fails once the queue
    /// has been closed.
    pub fn submit(&self, request: TransactionRequest) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BankError::ShutDown);
        }
        self.items.lock().push_back(request);
        self.notify.notify_one();
        Ok(())
    }

    /// Dequeues the next request, waiting while the queue is open and
    /// empty. Returns `None` once the queue has been closed.
    pub async fn take(&self) -> Option<TransactionRequest> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                // Pass the wakeup on so every parked consumer drains out.
                self.notify.notify_one();
                return None;
            }
            if let Some(request) = self.items.lock().pop_front() {
                return Some(request);
            }
            self.notify.notified().await;
        }
    }

    /// Closes the queue: parked and future `take` calls return `None`,
    /// later `submit` calls fail.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
        // notify_waiters reaches only already-parked consumers; one stored
        // permit catches a consumer between its flag check and parking.
        self.notify.notify_one();
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    fn deposit(account: u32) -> TransactionRequest {
        TransactionRequest::Deposit {
            account,
            amount: dec!(1),
        }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = WorkQueue::new();
        queue.submit(deposit(1)).unwrap();
        queue.submit(deposit(2)).unwrap();
        queue.submit(deposit(3)).unwrap();

        assert_eq!(queue.take().await, Some(deposit(1)));
        assert_eq!(queue.take().await, Some(deposit(2)));
        assert_eq!(queue.take().await, Some(deposit(3)));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_take_after_close_returns_none() {
        let queue = WorkQueue::new();
        queue.close();
        assert_eq!(queue.take().await, None);
    }

    #[tokio::test]
    async fn test_close_abandons_backlog() {
        let queue = WorkQueue::new();
        queue.submit(deposit(1)).unwrap();
        queue.submit(deposit(2)).unwrap();
        queue.close();

        assert_eq!(queue.take().await, None);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_after_close_rejected() {
        let queue = WorkQueue::new();
        queue.close();
        assert!(matches!(queue.submit(deposit(1)), Err(BankError::ShutDown)));
    }

    #[tokio::test]
    async fn test_close_wakes_parked_consumers() {
        let queue = Arc::new(WorkQueue::new());

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move { queue.take().await })
            })
            .collect();

        // Let the consumers park before closing.
        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.close();

        for consumer in consumers {
            assert_eq!(consumer.await.unwrap(), None);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_producers_all_drain() {
        let queue = Arc::new(WorkQueue::new());

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move {
                    for account in 0..25 {
                        queue.submit(deposit(account)).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.await.unwrap();
        }

        assert_eq!(queue.len(), 100);
        for _ in 0..100 {
            assert!(queue.take().await.is_some());
        }
        assert!(queue.is_empty());
    }
}
