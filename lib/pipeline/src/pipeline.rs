use crate::error::PipelineError;
use crate::pending::{PendingResult, pending};
use crate::traits::Sink;
use futures::{Stream, StreamExt};
use std::future::Future;
use tokio::task::JoinHandle;

/// What [`SerializedPipeline::deliver`] does with the rest of the chain once
/// an item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop delivering, abort the remaining producer tasks and propagate the
    /// error. Items consumed before the failure stay consumed.
    #[default]
    Abort,
    /// Keep delivering the remaining items in order; the first error is
    /// reported once the chain has drained.
    Continue,
}

struct Entry<T> {
    result: PendingResult<T>,
    task: JoinHandle<()>,
}

/// Runs independent producers concurrently and feeds their results to a
/// single sink strictly in submission order.
///
/// Each call to [`produce`](Self::produce) spawns the producer's task
/// immediately, so production of item `i + 1` never waits for item `i`.
/// Delivery walks the chain of [`PendingResult`]s in submission order, which
/// is what serializes access to the sink: only one `consume` call is ever in
/// flight, and item `i`'s call completes before item `i + 1`'s begins, even
/// when item `i + 1` finished producing first.
///
/// Dropping the pipeline before [`deliver`](Self::deliver) abandons it: no
/// further `consume` calls happen, already-detached producer tasks run to
/// completion and publish into dropped slots harmlessly.
pub struct SerializedPipeline<T> {
    chain: Vec<Entry<T>>,
    policy: FailurePolicy,
}

impl<T: Send + 'static> SerializedPipeline<T> {
    /// Creates an empty pipeline with the default [`FailurePolicy::Abort`].
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of items submitted so far.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Submits a producer; its task starts running immediately.
    ///
    /// Must be called within a Tokio runtime.
    pub fn produce<P>(&mut self, producer: P)
    where
        P: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let index = self.chain.len();
        let (slot, result) = pending();
        let task = tokio::spawn(async move {
            match producer.await {
                Ok(value) => {
                    tracing::trace!(index, "producer finished");
                    slot.publish(value);
                }
                Err(cause) => {
                    tracing::debug!(index, "producer failed: {cause:#}");
                    slot.fail(cause);
                }
            }
        });
        self.chain.push(Entry { result, task });
    }

    /// Submits a synchronous producer, run on the blocking thread pool.
    ///
    /// Useful for CPU-bound work that would otherwise stall the runtime.
    pub fn produce_blocking<F>(&mut self, producer: F)
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        self.produce(async move {
            match tokio::task::spawn_blocking(producer).await {
                Ok(outcome) => outcome,
                Err(err) => Err(anyhow::anyhow!("blocking producer panicked: {err}")),
            }
        });
    }

    /// Delivers every produced value to `sink`, strictly in submission order.
    ///
    /// Suspends only on the head of the chain; producers further down keep
    /// running concurrently in the meantime. Returns the number of items
    /// consumed on success.
    pub async fn deliver<S: Sink<T>>(self, mut sink: S) -> Result<usize, PipelineError> {
        let policy = self.policy;
        let mut entries = self.chain.into_iter().enumerate();
        let mut consumed = 0usize;
        let mut first_error: Option<PipelineError> = None;

        while let Some((index, entry)) = entries.next() {
            let error = match entry.result.wait().await {
                Ok(value) => match sink.consume(value).await {
                    Ok(()) => {
                        tracing::trace!(index, "item consumed");
                        consumed += 1;
                        continue;
                    }
                    Err(cause) => PipelineError::ConsumeFailed { index, cause },
                },
                Err(cause) => PipelineError::ItemFailed { index, cause },
            };

            tracing::debug!(index, "pipeline failed: {error:#}");
            match policy {
                FailurePolicy::Abort => {
                    for (_, rest) in entries {
                        rest.task.abort();
                    }
                    return Err(error);
                }
                FailurePolicy::Continue => {
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(consumed),
        }
    }

    /// Turns the pipeline into a stream of results in submission order.
    ///
    /// An alternative to [`deliver`](Self::deliver) for callers that prefer
    /// stream combinators over a [`Sink`]. Dropping the stream abandons the
    /// remaining items without consuming them.
    pub fn into_stream(self) -> impl Stream<Item = Result<T, PipelineError>> + Send {
        futures::stream::iter(self.chain.into_iter().enumerate()).then(|(index, entry)| async move {
            entry
                .result
                .wait()
                .await
                .map_err(|cause| PipelineError::ItemFailed { index, cause })
        })
    }
}

impl<T: Send + 'static> Default for SerializedPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Submits an ordered batch of producers and delivers to `sink` in one call.
///
/// Equivalent to building a [`SerializedPipeline`] by hand with the default
/// failure policy.
pub async fn submit<T, P, I, S>(producers: I, sink: S) -> Result<usize, PipelineError>
where
    T: Send + 'static,
    I: IntoIterator<Item = P>,
    P: Future<Output = anyhow::Result<T>> + Send + 'static,
    S: Sink<T>,
{
    let mut pipeline = SerializedPipeline::new();
    for producer in producers {
        pipeline.produce(producer);
    }
    pipeline.deliver(sink).await
}
