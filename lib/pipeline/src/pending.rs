use tokio::sync::oneshot;

/// Creates a connected [`ResultSlot`] / [`PendingResult`] pair.
///
/// The slot is handed to whichever task computes the value; the pending
/// result stays with whoever needs to wait for it.
pub fn pending<T>() -> (ResultSlot<T>, PendingResult<T>) {
    let (tx, rx) = oneshot::channel();
    (ResultSlot { tx }, PendingResult { rx })
}

/// Write half of a single-assignment result container.
///
/// Exactly one of [`publish`](Self::publish) or [`fail`](Self::fail) may be
/// called; both consume the slot. Dropping the slot without publishing marks
/// the result as failed, so waiters are released even if the producing task
/// panics or is aborted.
#[derive(Debug)]
pub struct ResultSlot<T> {
    tx: oneshot::Sender<anyhow::Result<T>>,
}

impl<T> ResultSlot<T> {
    /// Publishes the computed value, waking the waiter if there is one.
    ///
    /// If the corresponding [`PendingResult`] was already dropped the value
    /// is discarded.
    pub fn publish(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Marks the result as failed, carrying the producer's error.
    pub fn fail(self, cause: anyhow::Error) {
        let _ = self.tx.send(Err(cause));
    }
}

/// Read half of a single-assignment result container.
///
/// Readable only once written; [`wait`](Self::wait) consumes the handle, so
/// the value is read at most once.
#[derive(Debug)]
pub struct PendingResult<T> {
    rx: oneshot::Receiver<anyhow::Result<T>>,
}

impl<T> PendingResult<T> {
    /// Suspends until the value is published, then returns it.
    ///
    /// Returns an error if the producer failed, or if its [`ResultSlot`] was
    /// dropped before publishing anything.
    pub async fn wait(self) -> anyhow::Result<T> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(anyhow::anyhow!(
                "producer terminated without publishing a result"
            )),
        }
    }
}
