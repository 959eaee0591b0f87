//! One bounded task-pool abstraction used at both nesting levels: the run
//! pool (concurrent pipeline runs) and the shared scoring pool. Pools are
//! created once at startup and shared, never per run.
//!
//! Backpressure is explicit: `spawn` returns immediately, but the spawned
//! task waits on a pool permit before doing any work. A task sleeping (for
//! example, scoring backoff) holds only its own permit.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct TaskPool {
    permits: Arc<Semaphore>,
}

impl TaskPool {
    pub fn new(size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size)),
        }
    }

    /// Spawn a task onto the pool. Returns immediately; the task itself
    /// blocks until a permit is free and releases it on completion.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permits = self.permits.clone();
        tokio::spawn(async move {
            // The semaphore lives as long as the pool and is never closed.
            let _permit = permits.acquire_owned().await.expect("pool semaphore closed");
            fut.await
        })
    }

    /// Permits currently free; used by tests and logging.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
