//! Background fetch execution.
//!
//! Fetch commands run on a small pool of worker threads fed through a
//! channel; callers get a [`FetchHandle`] back immediately and block on it
//! only when they need the bytes. Command failures are captured into the
//! handle — a worker never dies because a remote call failed — and
//! cancellation is a first-class, non-error outcome.
//!
//! # Architecture
//!
//! ```text
//! caller ── submit(cmd) ──> queue ──> worker 1..N
//!    │                                   │
//!    └── FetchHandle::wait() <── resolve ┘
//! ```
//!
//! No relative completion order is guaranteed across commands; callers
//! correlate by handle.

use crate::error::{FetchError, FetchResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Terminal outcome of a fetch.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The command completed and produced a value.
    Ready(T),
    /// The fetch was cancelled; no value was (or will be) delivered.
    Cancelled,
}

#[derive(Debug)]
enum HandleState<T> {
    Pending,
    Ready(FetchResult<T>),
    Cancelled,
    Taken,
}

#[derive(Debug)]
struct HandleInner<T> {
    state: Mutex<HandleState<T>>,
    ready: Condvar,
    cancelled: AtomicBool,
}

/// Handle to one background fetch.
///
/// Cloning shares the handle; the result itself is delivered once, to the
/// first successful [`wait`](FetchHandle::wait).
#[derive(Debug)]
pub struct FetchHandle<T> {
    inner: Arc<HandleInner<T>>,
}

impl<T> Clone for FetchHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchHandle<T> {
    fn new() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                state: Mutex::new(HandleState::Pending),
                ready: Condvar::new(),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Requests cancellation. Idempotent; a result computed after this
    /// call is discarded rather than delivered.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let mut state = self.lock_state();
        if matches!(*state, HandleState::Pending) {
            *state = HandleState::Cancelled;
            self.inner.ready.notify_all();
        }
    }

    /// Liveness flag: `true` once [`cancel`](Self::cancel) was called.
    /// Consumers about to hand results onward check this first.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Blocks until the fetch resolves.
    pub fn wait(&self) -> FetchResult<FetchOutcome<T>> {
        match self.wait_inner(None)? {
            Some(outcome) => Ok(outcome),
            // No deadline was set, so the wait cannot expire.
            None => unreachable!("unbounded wait timed out"),
        }
    }

    /// Blocks until the fetch resolves or `timeout` expires (`None`).
    pub fn wait_timeout(&self, timeout: Duration) -> FetchResult<Option<FetchOutcome<T>>> {
        self.wait_inner(Some(timeout))
    }

    fn wait_inner(&self, timeout: Option<Duration>) -> FetchResult<Option<FetchOutcome<T>>> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut state = self.lock_state();
        loop {
            match &*state {
                HandleState::Pending => {}
                HandleState::Cancelled => return Ok(Some(FetchOutcome::Cancelled)),
                HandleState::Taken => return Err(FetchError::Taken),
                HandleState::Ready(_) => {
                    let taken = std::mem::replace(&mut *state, HandleState::Taken);
                    let HandleState::Ready(result) = taken else {
                        // Just matched Ready above.
                        unreachable!()
                    };
                    return result.map(|value| Some(FetchOutcome::Ready(value)));
                }
            }
            match (timeout, deadline) {
                (Some(_), Some(deadline)) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(None);
                    }
                    state = match self.inner.ready.wait_timeout(state, remaining) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => {
                            self.inner.state.clear_poison();
                            poisoned.into_inner().0
                        }
                    };
                }
                _ => {
                    state = match self.inner.ready.wait(state) {
                        Ok(guard) => guard,
                        Err(poisoned) => {
                            self.inner.state.clear_poison();
                            poisoned.into_inner()
                        }
                    };
                }
            }
        }
    }

    /// Runs `command` on the worker, honoring cancellation on both sides
    /// of the call.
    fn run<F>(&self, command: F)
    where
        F: FnOnce() -> FetchResult<T>,
    {
        if self.is_cancelled() {
            self.resolve(HandleState::Cancelled);
            return;
        }
        let result = command();
        if self.is_cancelled() {
            tracing::debug!("discarding result of cancelled fetch");
            self.resolve(HandleState::Cancelled);
        } else {
            if let Err(error) = &result {
                tracing::debug!(%error, "fetch command failed");
            }
            self.resolve(HandleState::Ready(result));
        }
    }

    fn resolve(&self, resolved: HandleState<T>) {
        let mut state = self.lock_state();
        if matches!(*state, HandleState::Pending) {
            *state = resolved;
            self.inner.ready.notify_all();
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, HandleState<T>> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.inner.state.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

/// Pool of worker threads executing fetch commands.
#[derive(Debug)]
pub struct FetchExecutor {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl FetchExecutor {
    /// Spawns a pool of `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        let (sender, receiver) = channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let workers = (0..workers.max(1))
            .map(|_| {
                let receiver = Arc::clone(&receiver);
                thread::spawn(move || worker_loop(&receiver))
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Enqueues a fetch command and returns its handle.
    pub fn submit<T, F>(&self, command: F) -> FetchHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> FetchResult<T> + Send + 'static,
    {
        let handle = FetchHandle::new();
        let worker_handle = handle.clone();
        let job: Job = Box::new(move || worker_handle.run(command));
        let delivered = match &self.sender {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        };
        if !delivered {
            handle.resolve(HandleState::Ready(Err(FetchError::Disconnected)));
        }
        handle
    }
}

impl Drop for FetchExecutor {
    fn drop(&mut self) {
        // Closing the queue lets the workers drain and exit.
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(receiver: &Mutex<Receiver<Job>>) {
    loop {
        let job = {
            let guard = match receiver.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.recv()
        };
        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_delivers_result() {
        let executor = FetchExecutor::new(2);
        let handle = executor.submit(|| Ok(vec![1u8, 2, 3]));
        assert_eq!(
            handle.wait().unwrap(),
            FetchOutcome::Ready(vec![1u8, 2, 3])
        );
    }

    #[test]
    fn test_command_error_reaches_waiter_and_pool_survives() {
        let executor = FetchExecutor::new(1);
        let failing = executor.submit::<Vec<u8>, _>(|| Err(FetchError::data_source("boom")));
        assert!(matches!(
            failing.wait(),
            Err(FetchError::DataSource { .. })
        ));
        // The same single worker still serves later commands.
        let ok = executor.submit(|| Ok(7u32));
        assert_eq!(ok.wait().unwrap(), FetchOutcome::Ready(7));
    }

    #[test]
    fn test_cancel_before_run_discards_command() {
        let executor = FetchExecutor::new(1);
        // Occupy the only worker so the next command stays queued.
        let blocker = executor.submit(|| {
            thread::sleep(Duration::from_millis(60));
            Ok(())
        });
        let cancelled = executor.submit(|| Ok(1u8));
        cancelled.cancel();
        assert_eq!(cancelled.wait().unwrap(), FetchOutcome::Cancelled);
        assert_eq!(blocker.wait().unwrap(), FetchOutcome::Ready(()));
    }

    #[test]
    fn test_cancel_during_run_discards_result() {
        let executor = FetchExecutor::new(1);
        let handle = executor.submit(|| {
            thread::sleep(Duration::from_millis(60));
            Ok(99u8)
        });
        thread::sleep(Duration::from_millis(10));
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(handle.wait().unwrap(), FetchOutcome::Cancelled);
    }

    #[test]
    fn test_wait_timeout() {
        let executor = FetchExecutor::new(1);
        let handle = executor.submit(|| {
            thread::sleep(Duration::from_millis(80));
            Ok(5u8)
        });
        assert!(
            handle
                .wait_timeout(Duration::from_millis(10))
                .unwrap()
                .is_none()
        );
        assert_eq!(
            handle.wait().unwrap(),
            FetchOutcome::Ready(5)
        );
    }

    #[test]
    fn test_second_wait_reports_taken() {
        let executor = FetchExecutor::new(1);
        let handle = executor.submit(|| Ok(1u8));
        let twin = handle.clone();
        assert_eq!(handle.wait().unwrap(), FetchOutcome::Ready(1));
        assert!(matches!(twin.wait(), Err(FetchError::Taken)));
    }

    #[test]
    fn test_parallel_commands_all_complete() {
        let executor = FetchExecutor::new(4);
        let handles: Vec<_> = (0..16u32)
            .map(|i| executor.submit(move || Ok(i * i)))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let i = i as u32;
            assert_eq!(handle.wait().unwrap(), FetchOutcome::Ready(i * i));
        }
    }
}
