use anyhow::Result;
use async_trait::async_trait;

/// The serialized end of a pipeline.
///
/// `consume` is invoked exactly once per item, in submission order; the
/// pipeline guarantees only one call is in flight at a time, so the sink may
/// hold exclusive resources (a file handle, a connection) without locking.
#[async_trait]
pub trait Sink<T>: Send {
    /// Applies one produced value to the sink.
    async fn consume(&mut self, value: T) -> Result<()>;
}

/// Adapter turning a plain closure into a [`Sink`].
///
/// Created by [`sink_fn`].
#[derive(Debug)]
pub struct FnSink<F>(F);

/// Wraps a `FnMut(T) -> Result<()>` closure as a [`Sink`].
pub fn sink_fn<F>(f: F) -> FnSink<F> {
    FnSink(f)
}

#[async_trait]
impl<T, F> Sink<T> for FnSink<F>
where
    T: Send + 'static,
    F: FnMut(T) -> Result<()> + Send,
{
    async fn consume(&mut self, value: T) -> Result<()> {
        (self.0)(value)
    }
}
