//! Tracks how far an exchange has got, so the first-byte deadline is only
//! armed once the request is fully on the wire.
//!
//! The connector is wrapped in [`ConnectTracking`], which marks the current
//! exchange connected (TCP and TLS done) when it hands back a connection.
//! Request bodies are streamed through [`TrackedBody`], which marks the
//! exchange sent when hyper has taken the last chunk. Connections are not
//! pooled, so the connector runs inside the task that owns the exchange and
//! can find its [`ExchangeProgress`] in a task-local.

use reqwest::Body;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tower::{Layer, Service};

const BODY_CHUNK_SIZE: usize = 64 * 1024;

tokio::task_local! {
    static EXCHANGE: ExchangeProgress;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Phase {
    Connecting,
    SendingBody,
    AwaitingResponse,
}

/// Writer side, shared by the connector and the request body
#[derive(Debug, Clone)]
pub(crate) struct ExchangeProgress {
    phase: Arc<watch::Sender<Phase>>,
    has_body: bool,
}

/// Reader side, held by the exchange
pub(crate) struct PhaseWatch {
    phase: watch::Receiver<Phase>,
}

impl ExchangeProgress {
    pub(crate) fn start(has_body: bool) -> (Self, PhaseWatch) {
        let (sender, receiver) = watch::channel(Phase::Connecting);
        (
            Self {
                phase: Arc::new(sender),
                has_body,
            },
            PhaseWatch { phase: receiver },
        )
    }

    /// Run `exchange` with this progress visible to the connector
    pub(crate) async fn scope<F: Future>(self, exchange: F) -> F::Output {
        EXCHANGE.scope(self, exchange).await
    }

    fn connected(&self) {
        let next = if self.has_body {
            Phase::SendingBody
        } else {
            Phase::AwaitingResponse
        };
        self.advance(next);
    }

    fn body_sent(&self) {
        self.advance(Phase::AwaitingResponse);
    }

    fn advance(&self, next: Phase) {
        self.phase.send_if_modified(|phase| {
            if *phase < next {
                *phase = next;
                true
            } else {
                false
            }
        });
    }
}

impl PhaseWatch {
    /// Resolves once the whole request has been handed to the connection
    pub(crate) async fn request_sent(&mut self) {
        let reached = self
            .phase
            .wait_for(|phase| *phase == Phase::AwaitingResponse)
            .await
            .is_ok();
        if !reached {
            // Every writer is gone without the request going out; the send
            // future settles the exchange on its own.
            std::future::pending::<()>().await;
        }
    }
}

/// Connector layer marking the current exchange connected
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConnectTracking;

impl<S> Layer<S> for ConnectTracking {
    type Service = ConnectTracked<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ConnectTracked { inner }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConnectTracked<S> {
    inner: S,
}

impl<S, R> Service<R> for ConnectTracked<S>
where
    S: Service<R>,
    S::Response: Send + 'static,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, destination: R) -> Self::Future {
        let progress = EXCHANGE.try_with(ExchangeProgress::clone).ok();
        let connecting = self.inner.call(destination);
        Box::pin(async move {
            let connection = connecting.await?;
            if let Some(progress) = progress {
                progress.connected();
            }
            Ok(connection)
        })
    }
}

/// Request body that reports when its last chunk has been taken
pub(crate) struct TrackedBody {
    chunks: VecDeque<Vec<u8>>,
    progress: ExchangeProgress,
}

impl TrackedBody {
    pub(crate) fn new(bytes: Vec<u8>, progress: ExchangeProgress) -> Self {
        let chunks = bytes
            .chunks(BODY_CHUNK_SIZE)
            .map(<[u8]>::to_vec)
            .collect();
        Self { chunks, progress }
    }

    pub(crate) fn into_body(self) -> Body {
        Body::wrap_stream(self)
    }
}

impl futures_util::Stream for TrackedBody {
    type Item = Result<Vec<u8>, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.chunks.pop_front() {
            Some(chunk) => Poll::Ready(Some(Ok(chunk))),
            None => {
                self.progress.body_sent();
                Poll::Ready(None)
            }
        }
    }
}
