//! Single-writer persistence queue.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use market_kv::{JsonStore, KeyValueStore};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::cart::Cart;
use crate::error::{CartError, WriteError};

/// A cart snapshot waiting to be written.
pub(crate) struct WriteJob {
    pub revision: u64,
    pub cart: Arc<Cart>,
    pub done: oneshot::Sender<Result<(), WriteError>>,
}

/// Channels the writer reports through.
pub(crate) struct WriterReport {
    /// Every write failure.
    pub errors: broadcast::Sender<WriteError>,
    /// Highest revision whose write has finished, successfully or not.
    pub completed: watch::Sender<u64>,
}

/// Drain `jobs` until every sender is gone.
///
/// Jobs that queued up behind a slow write are collapsed: only the newest
/// snapshot is written and its outcome is reported to all of them.
pub(crate) async fn run<S>(
    store: JsonStore<S>,
    key: String,
    mut jobs: mpsc::UnboundedReceiver<WriteJob>,
    report: WriterReport,
) where
    S: KeyValueStore,
{
    while let Some(mut job) = jobs.recv().await {
        let mut superseded = Vec::new();
        while let Ok(next) = jobs.try_recv() {
            superseded.push(std::mem::replace(&mut job, next).done);
        }

        let result = store
            .set_json(&key, job.cart.as_ref())
            .await
            .map_err(|e| WriteError {
                revision: job.revision,
                message: e.to_string(),
            });

        match &result {
            Ok(()) => tracing::debug!(
                key = %key,
                revision = job.revision,
                lines = job.cart.len(),
                coalesced = superseded.len(),
                "cart persisted"
            ),
            Err(e) => {
                tracing::error!(
                    key = %key,
                    revision = job.revision,
                    error = %e.message,
                    "cart write failed"
                );
                // No subscribers is fine.
                let _ = report.errors.send(e.clone());
            }
        }

        report.completed.send_replace(job.revision);
        for done in superseded {
            let _ = done.send(result.clone());
        }
        let _ = job.done.send(result);
    }

    tracing::debug!(key = %key, "cart writer stopped");
}

/// Completion of a cart mutation's write.
///
/// Resolves once the write carrying the mutation has finished. Dropping it
/// does not cancel the write.
#[derive(Debug)]
pub struct PendingWrite {
    revision: Option<u64>,
    rx: Option<oneshot::Receiver<Result<(), WriteError>>>,
}

impl PendingWrite {
    pub(crate) fn queued(revision: u64, rx: oneshot::Receiver<Result<(), WriteError>>) -> Self {
        Self {
            revision: Some(revision),
            rx: Some(rx),
        }
    }

    /// A write that was never needed because the mutation changed nothing.
    pub(crate) fn noop() -> Self {
        Self {
            revision: None,
            rx: None,
        }
    }

    /// Whether the mutation left the cart unchanged.
    pub fn is_noop(&self) -> bool {
        self.rx.is_none()
    }

    /// Cart revision this write carries, if any.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }
}

impl Future for PendingWrite {
    type Output = Result<(), CartError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(Ok(()));
        };

        Pin::new(rx).poll(cx).map(|outcome| match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(CartError::Persist(e)),
            Err(_) => Err(CartError::WriterClosed),
        })
    }
}
