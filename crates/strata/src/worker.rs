//! Background layout runs.

use crate::cancel::CancellationToken;
use crate::error::{LayoutError, Result};
use crate::layout::{LayoutOutcome, SugiyamaLayout};
use futures::FutureExt;
use futures::channel::oneshot;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use strata_graph::DirectedGraph;

/// Runs layouts on a background thread, one live run at a time.
///
/// Submitting a new graph cancels the run started by the previous `submit`.
pub struct LayoutWorker<V, E> {
    layout: Arc<SugiyamaLayout<V, E>>,
    current: Option<CancellationToken>,
}

impl<V, E> LayoutWorker<V, E>
where
    V: Clone + Eq + Hash + Debug + Send + 'static,
    E: Clone + Eq + Hash + Debug + Send + 'static,
{
    pub fn new(layout: SugiyamaLayout<V, E>) -> Self {
        Self {
            layout: Arc::new(layout),
            current: None,
        }
    }

    pub fn submit<G>(&mut self, graph: G) -> LayoutHandle<V, E>
    where
        G: DirectedGraph<Vertex = V, Edge = E> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let (tx, rx) = oneshot::channel();
        let layout = Arc::clone(&self.layout);
        let run_token = token.clone();
        let spawned = std::thread::Builder::new()
            .name("strata-layout".to_string())
            .spawn(move || {
                let result = layout.run(&graph, &run_token);
                // The handle may already be gone.
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn layout thread");
        }
        LayoutHandle { rx, token }
    }

    /// Cancels the most recent run, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

/// Resolves to the result of one submitted run.
///
/// A worker thread that died without answering resolves to [`LayoutError::WorkerLost`]. Once the
/// handle's token is cancelled it never resolves to coordinates.
pub struct LayoutHandle<V, E> {
    rx: oneshot::Receiver<Result<LayoutOutcome<V, E>>>,
    token: CancellationToken,
}

impl<V, E> LayoutHandle<V, E> {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl<V, E> Future for LayoutHandle<V, E> {
    type Output = Result<LayoutOutcome<V, E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.poll_unpin(cx) {
            // Cancelled after the run's last check; the coordinates are stale.
            Poll::Ready(Ok(Ok(LayoutOutcome::Completed(_)))) if self.token.is_cancelled() => {
                Poll::Ready(Ok(LayoutOutcome::Cancelled))
            }
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(LayoutError::WorkerLost)),
            Poll::Pending => Poll::Pending,
        }
    }
}
