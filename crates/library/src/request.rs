//! Deferred, cancellable operations with a completion callback.
//!
//! A [`Request`] is created suspended. [`start`](Request::start) spawns it on
//! the current Tokio runtime; [`cancel`](Request::cancel) stops it and
//! guarantees the completion never runs. The completion runs at most once,
//! on the runtime's worker, and never sees a cancellation.

use crate::error::{ErrorKind, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type Operation<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;
type Completion<T> = Box<dyn FnOnce(Result<T>) + Send + 'static>;

enum Stage<T> {
    Suspended(Operation<T>),
    Running,
    Finished,
    Cancelled,
}

struct Inner<T> {
    stage: Mutex<Stage<T>>,
    completion: Mutex<Option<Completion<T>>>,
    cancel: CancellationToken,
}

/// Handle to an operation that has not necessarily started yet.
///
/// Dropping the handle does not cancel a started operation.
pub struct Request<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Send + 'static> Request<T> {
    /// Wrap `operation`. Cancelling the request also cancels `cancel`, so an
    /// operation that watches the same token can stop between steps.
    pub(crate) fn new(
        operation: impl Future<Output = Result<T>> + Send + 'static,
        cancel: CancellationToken,
        completion: impl FnOnce(Result<T>) + Send + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                stage: Mutex::new(Stage::Suspended(Box::pin(operation))),
                completion: Mutex::new(Some(Box::new(completion))),
                cancel,
            }),
        }
    }

    /// Begin the operation on the current Tokio runtime.
    ///
    /// Returns `false` if the request was already started, finished or
    /// cancelled, or if there is no runtime to start it on.
    pub fn start(&self) -> bool {
        let mut stage = lock(&self.inner.stage);
        let Stage::Suspended(_) = &*stage else {
            return false;
        };
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!(error = %err, "cannot start request outside of a Tokio runtime");
                return false;
            },
        };
        let Stage::Suspended(operation) = std::mem::replace(&mut *stage, Stage::Running) else {
            return false;
        };
        drop(stage);

        let inner = Arc::clone(&self.inner);
        runtime.spawn(async move {
            let result = tokio::select! {
                biased;
                () = inner.cancel.cancelled() => Err(exn::Exn::from(ErrorKind::Cancelled)),
                result = operation => result,
            };
            inner.finish(result);
        });
        true
    }

    /// Stop the operation and drop its completion without running it.
    ///
    /// Returns `false` if the request has already finished or was already
    /// cancelled. Cancelling a suspended request means it can never start.
    pub fn cancel(&self) -> bool {
        let mut stage = lock(&self.inner.stage);
        if matches!(*stage, Stage::Finished | Stage::Cancelled) {
            return false;
        }
        // Dropping a suspended operation here is what stops it from ever running.
        *stage = Stage::Cancelled;
        drop(stage);
        lock(&self.inner.completion).take();
        self.inner.cancel.cancel();
        debug!("request cancelled");
        true
    }

    pub fn is_finished(&self) -> bool {
        matches!(*lock(&self.inner.stage), Stage::Finished)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(*lock(&self.inner.stage), Stage::Cancelled)
    }
}

impl<T> Inner<T> {
    fn finish(&self, result: Result<T>) {
        {
            let mut stage = lock(&self.stage);
            if matches!(*stage, Stage::Cancelled) {
                return;
            }
            *stage = Stage::Finished;
        }
        // A cancellation nobody asked for through `cancel()` (the token was
        // shared and cancelled elsewhere) is still a cancellation.
        if let Err(err) = &result
            && **err == ErrorKind::Cancelled
        {
            lock(&self.completion).take();
            return;
        }
        let completion = lock(&self.completion).take();
        if let Some(completion) = completion {
            completion(result);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn counted<T: Send + 'static>(
        operation: impl Future<Output = Result<T>> + Send + 'static,
    ) -> (Request<T>, Arc<AtomicUsize>, oneshot::Receiver<Result<T>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (sender, receiver) = oneshot::channel();
        let counter = Arc::clone(&calls);
        let request = Request::new(operation, CancellationToken::new(), move |result| {
            counter.fetch_add(1, Ordering::SeqCst);
            _ = sender.send(result);
        });
        (request, calls, receiver)
    }

    #[tokio::test]
    async fn test_created_suspended() {
        let (request, calls, _receiver) = counted(async { Ok(1) });
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!request.is_finished());
    }

    #[tokio::test]
    async fn test_completion_runs_once() {
        let (request, calls, receiver) = counted(async { Ok(7) });
        assert!(request.start());
        assert!(!request.start());
        assert_eq!(receiver.await.unwrap().unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(request.is_finished());
        assert!(!request.cancel());
        assert!(!request.start());
    }

    #[tokio::test]
    async fn test_failure_is_delivered() {
        let (request, _calls, receiver) = counted::<()>(async { Err(exn::Exn::from(ErrorKind::HttpStatusFailure(503))) });
        assert!(request.start());
        let err = receiver.await.unwrap().unwrap_err();
        assert_eq!(*err, ErrorKind::HttpStatusFailure(503));
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let (request, calls, receiver) = counted(async { Ok(()) });
        assert!(request.cancel());
        assert!(!request.cancel());
        assert!(!request.start());
        assert!(request.is_cancelled());
        // The completion (and its sender) was dropped without being called.
        assert!(receiver.await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_running() {
        let (request, calls, receiver) = counted(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        assert!(request.start());
        tokio::task::yield_now().await;
        assert!(request.cancel());
        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(receiver.await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!request.is_finished());
    }

    #[tokio::test]
    async fn test_external_cancellation_is_not_delivered() {
        let cancel = CancellationToken::new();
        let (sender, receiver) = oneshot::channel::<Result<()>>();
        let request = Request::new(std::future::pending(), cancel.clone(), move |result| {
            _ = sender.send(result);
        });
        assert!(request.start());
        cancel.cancel();
        assert!(receiver.await.is_err());
        assert!(request.is_finished());
    }

    #[test]
    fn test_start_without_runtime() {
        let (request, _calls, _receiver) = counted(async { Ok(()) });
        assert!(!request.start());
        // Still suspended, so it can be cancelled.
        assert!(request.cancel());
    }
}
