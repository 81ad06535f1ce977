//! Bounded-concurrency work queue.
//!
//! [`TaskQueue`] runs submitted items through a shared [`Processor`],
//! spawning workers on demand up to a concurrency bound. Items may be
//! submitted from outside or from inside a running processor via
//! [`QueueHandle`]. The traversal engine is built on top of this module,
//! but it stands on its own for any fan-out workload.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::ScourError;
use crate::limit::Limit;

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Handles one queued item at a time.
///
/// A single processor instance is shared by every worker, so it is called
/// concurrently up to the queue's bound. The `queue` handle accepts
/// follow-up submissions; work discovered while processing keeps the
/// queue alive until it too has drained.
///
/// # Thread Safety
///
/// `Send + Sync` are required — the processor is shared across worker
/// tasks.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use scour::queue::{Processor, QueueHandle, TaskQueue};
/// use scour::{Limit, ScourError};
///
/// struct Shout;
///
/// #[async_trait]
/// impl Processor<String> for Shout {
///     async fn process(&self, item: &String, _queue: &QueueHandle<String>) -> Result<(), ScourError> {
///         println!("{}", item.to_uppercase());
///         Ok(())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ScourError> {
/// let queue = TaskQueue::new(Limit::Finite(2), Shout);
/// queue.submit("hello".to_string());
/// queue.submit("world".to_string());
/// queue.complete().await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Processor<T>: Send + Sync {
    /// Process one item, optionally submitting more through `queue`.
    async fn process(&self, item: &T, queue: &QueueHandle<T>) -> Result<(), ScourError>;
}

// ---------------------------------------------------------------------------
// Recover
// ---------------------------------------------------------------------------

/// Intercepts processing failures before they stop the queue.
///
/// Without a recover seam, the first failed item stops the queue and
/// [`TaskQueue::complete`] resolves with that error. With one, each
/// failure is offered here first: return `Ok` to absorb it and keep
/// draining, or `Err` to stop the queue with your own error instead.
///
/// Plain closures taking `(&ScourError, &T)` implement this trait and
/// absorb every failure.
#[async_trait]
pub trait Recover<T>: Send + Sync {
    /// Absorb (`Ok`) or escalate (`Err`) one failure.
    async fn recover(&self, error: ScourError, item: &T) -> Result<(), ScourError>;
}

#[async_trait]
impl<F, T> Recover<T> for F
where
    F: Fn(&ScourError, &T) + Send + Sync,
    T: Sync,
{
    async fn recover(&self, error: ScourError, item: &T) -> Result<(), ScourError> {
        self(&error, item);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct State<T> {
    pending: VecDeque<T>,
    running: usize,
    stopped: bool,
    settle:  Option<oneshot::Sender<Result<(), ScourError>>>,
}

struct Inner<T> {
    concurrency: Limit,
    processor:   Arc<dyn Processor<T>>,
    recover:     Option<Arc<dyn Recover<T>>>,
    state:       Mutex<State<T>>,
}

impl<T> Inner<T> {
    fn state(&self) -> MutexGuard<'_, State<T>> {
        // No user code runs under this lock, so a poisoned guard still
        // holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn submit_item<T>(inner: &Arc<Inner<T>>, item: T)
where
    T: Send + Sync + 'static,
{
    let mut state = inner.state();
    if state.stopped || state.settle.is_none() {
        debug!("submission ignored; queue already settled");
        return;
    }
    state.pending.push_back(item);
    if inner.concurrency > state.running {
        state.running += 1;
        drop(state);
        tokio::spawn(run_worker(Arc::clone(inner)));
    }
}

async fn run_worker<T>(inner: Arc<Inner<T>>)
where
    T: Send + Sync + 'static,
{
    let handle = QueueHandle { inner: Arc::clone(&inner) };
    loop {
        // Pop-or-retire is one critical section: a submission happens
        // either before the pop (this worker sees it) or after the
        // retirement below (the submitter spawns a fresh worker).
        let item = {
            let mut state = inner.state();
            match state.pending.pop_front() {
                Some(item) => item,
                None => {
                    state.running -= 1;
                    if state.running == 0 && !state.stopped {
                        if let Some(settle) = state.settle.take() {
                            debug!("queue drained");
                            let _ = settle.send(Ok(()));
                        }
                    }
                    return;
                }
            }
        };

        let failure = match inner.processor.process(&item, &handle).await {
            Ok(()) => None,
            Err(error) => match &inner.recover {
                Some(recover) => {
                    warn!(%error, "item failed; consulting recover hook");
                    recover.recover(error, &item).await.err()
                }
                None => Some(error),
            },
        };

        if let Some(error) = failure {
            warn!(%error, "stopping queue after unrecovered failure");
            let mut state = inner.state();
            state.stopped = true;
            state.pending.clear();
            if let Some(settle) = state.settle.take() {
                let _ = settle.send(Err(error));
            }
            state.running -= 1;
            return;
        }
    }
}

// ---------------------------------------------------------------------------
// TaskQueue
// ---------------------------------------------------------------------------

/// An async work queue with a fixed concurrency bound.
///
/// Submitting an item appends it to the backlog and spawns a worker if
/// fewer than `concurrency` are running. Each worker pops items until the
/// backlog is empty, then retires; the last worker to retire settles the
/// queue and [`complete`](TaskQueue::complete) resolves. Submissions made
/// during processing (through the [`QueueHandle`] each processor call
/// receives) extend the same lifecycle, so completion means the queue
/// drained *including* everything discovered along the way.
///
/// On an unrecovered failure the queue stops: the backlog is dropped,
/// in-flight items finish without effect, and `complete` resolves with
/// the error. A [`Recover`] seam installed at construction can absorb
/// failures instead.
pub struct TaskQueue<T> {
    inner:  Arc<Inner<T>>,
    settle: oneshot::Receiver<Result<(), ScourError>>,
}

impl<T> TaskQueue<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a queue that stops at the first processing failure.
    ///
    /// `concurrency` is taken as given: `Limit::Finite(0)` admits no
    /// workers, so callers validate before constructing.
    pub fn new<P>(concurrency: Limit, processor: P) -> Self
    where
        P: Processor<T> + 'static,
    {
        Self::build(concurrency, Arc::new(processor), None)
    }

    /// Creates a queue that offers every failure to `recover` first.
    pub fn with_recover<P, R>(concurrency: Limit, processor: P, recover: R) -> Self
    where
        P: Processor<T> + 'static,
        R: Recover<T> + 'static,
    {
        Self::build(concurrency, Arc::new(processor), Some(Arc::new(recover) as _))
    }

    fn build(
        concurrency: Limit,
        processor: Arc<dyn Processor<T>>,
        recover: Option<Arc<dyn Recover<T>>>,
    ) -> Self {
        let (sender, receiver) = oneshot::channel();
        let inner = Arc::new(Inner {
            concurrency,
            processor,
            recover,
            state: Mutex::new(State {
                pending: VecDeque::new(),
                running: 0,
                stopped: false,
                settle:  Some(sender),
            }),
        });
        Self { inner, settle: receiver }
    }

    /// Submits an item for processing.
    ///
    /// Ignored once the queue has settled or stopped.
    pub fn submit(&self, item: T) {
        submit_item(&self.inner, item);
    }

    /// Returns a cloneable handle for submitting from elsewhere.
    pub fn handle(&self) -> QueueHandle<T> {
        QueueHandle { inner: Arc::clone(&self.inner) }
    }

    /// Waits for the queue to settle.
    ///
    /// Resolves `Ok` when every submitted item (including those submitted
    /// during processing) has been handled, or `Err` with the first
    /// unrecovered failure. A queue that never saw a submission never
    /// settles, and this future never resolves for it.
    pub async fn complete(self) -> Result<(), ScourError> {
        // Holding `inner` keeps the settle sender alive until the
        // outcome arrives.
        let Self { inner: _inner, settle } = self;
        settle.await.expect("queue settled without sending an outcome")
    }
}

// ---------------------------------------------------------------------------
// QueueHandle
// ---------------------------------------------------------------------------

/// Submits items into a running [`TaskQueue`].
///
/// Handles are handed to every [`Processor::process`] call and can be
/// cloned freely. They hold the queue open only in the sense that their
/// submissions are accepted while it runs; a handle kept after the queue
/// settles turns submissions into no-ops.
pub struct QueueHandle<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueueHandle<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> QueueHandle<T>
where
    T: Send + Sync + 'static,
{
    /// Submits an item for processing.
    ///
    /// Ignored once the queue has settled or stopped.
    pub fn submit(&self, item: T) {
        submit_item(&self.inner, item);
    }
}
