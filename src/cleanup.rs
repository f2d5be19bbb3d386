use log::debug;
use std::sync::Mutex;
use tokio::task::JoinSet;

/// Bounded pool of outstanding filesystem teardown operations.
///
/// Directory and file closes (and partial-upload removals) can stall on slow
/// media; sessions hand them off here instead of waiting. When every slot is
/// busy the operation runs to completion before `submit` returns, so callers
/// never fail and correctness never depends on the pool draining.
pub struct CleanupPool {
    slots: Mutex<JoinSet<()>>,
    capacity: usize,
}

impl CleanupPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(JoinSet::new()),
            capacity,
        }
    }

    /// Runs `op` on the blocking pool, detached if a slot is free.
    pub async fn submit<F>(&self, op: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let overflow = {
            let mut slots = self.slots.lock().unwrap();
            Self::reap(&mut slots);
            if slots.len() < self.capacity {
                slots.spawn_blocking(op);
                None
            } else {
                Some(op)
            }
        };
        if let Some(op) = overflow {
            debug!("cleanup pool full, running operation inline");
            let _ = tokio::task::spawn_blocking(op).await;
        }
    }

    /// Reclaims slots whose operation has finished. Called opportunistically,
    /// at minimum once per accept-loop iteration.
    pub fn poll(&self) {
        let mut slots = self.slots.lock().unwrap();
        Self::reap(&mut slots);
    }

    /// Number of operations still in flight.
    pub fn outstanding(&self) -> usize {
        let mut slots = self.slots.lock().unwrap();
        Self::reap(&mut slots);
        slots.len()
    }

    fn reap(slots: &mut JoinSet<()>) {
        while let Some(result) = slots.try_join_next() {
            if let Err(e) = result {
                debug!("cleanup operation aborted: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    #[tokio::test]
    async fn submitted_operations_run() {
        let pool = CleanupPool::new(2);
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        pool.submit(move || flag.store(true, Ordering::SeqCst)).await;

        for _ in 0..50 {
            if pool.outstanding() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(pool.outstanding(), 0);
    }

    #[tokio::test]
    async fn full_pool_falls_back_to_inline_execution() {
        let pool = CleanupPool::new(2);

        // Occupy every slot with an operation parked on a channel.
        let mut releases = Vec::new();
        for _ in 0..2 {
            let (tx, rx) = mpsc::channel::<()>();
            releases.push(tx);
            pool.submit(move || {
                let _ = rx.recv();
            })
            .await;
        }
        assert_eq!(pool.outstanding(), 2);

        // The next submission must complete before returning.
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        pool.submit(move || flag.store(true, Ordering::SeqCst)).await;
        assert!(ran.load(Ordering::SeqCst));

        drop(releases);
        for _ in 0..50 {
            if pool.outstanding() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pool.outstanding(), 0);
    }
}
