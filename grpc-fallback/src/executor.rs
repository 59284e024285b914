//! # HTTP Executor Seam
//!
//! The transport never performs I/O itself; it delegates every exchange to
//! an injected [`HttpExecutor`]. This module defines that seam, the
//! [`ExecuteOptions`] handed to it per call, the two-sided failure type
//! [`ExecuteError`], and two implementations:
//!
//! * [`ReqwestExecutor`] — the production executor over a `reqwest::Client`,
//!   with a process-wide shared client as the default.
//! * [`ExecutorFn`] — adapts an async closure into an executor, in the
//!   spirit of `tower::service_fn`. The test suite mocks the network through
//!   this.
use crate::BoxError;
use bytes::Bytes;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

/// Per-call options interpreted by the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Call deadline in seconds. Fractional values are permitted.
    pub timeout: Option<f64>,
    /// Executor-specific options, passed through by the transport untouched.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Failure of a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The server replied, but with an error status. The full response is
    /// preserved so the transport can translate it.
    #[error("server replied with HTTP {}", .0.status())]
    Response(http::Response<Bytes>),
    /// No response was received (DNS failure, connection refused, timeout
    /// without a reply, ...).
    #[error("transport failure: '{0}'")]
    Transport(#[source] BoxError),
}

/// An asynchronous HTTP request executor.
///
/// Takes a well-formed request (method, URI, headers, body) plus per-call
/// options, and resolves to a response or rejects with an [`ExecuteError`].
pub trait HttpExecutor: Send + Sync {
    fn execute(
        &self,
        request: http::Request<Bytes>,
        options: ExecuteOptions,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ExecuteError>>;
}

/// Adapts an async closure into an [`HttpExecutor`].
pub fn executor_fn<F>(f: F) -> ExecutorFn<F> {
    ExecutorFn(f)
}

/// An [`HttpExecutor`] backed by a closure. See [`executor_fn`].
#[derive(Clone)]
pub struct ExecutorFn<F>(F);

impl<F, Fut> HttpExecutor for ExecutorFn<F>
where
    F: Fn(http::Request<Bytes>, ExecuteOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<http::Response<Bytes>, ExecuteError>> + Send + 'static,
{
    fn execute(
        &self,
        request: http::Request<Bytes>,
        options: ExecuteOptions,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ExecuteError>> {
        Box::pin((self.0)(request, options))
    }
}

/// The production executor, backed by `reqwest`.
///
/// Non-success statuses are surfaced as [`ExecuteError::Response`] so the
/// transport can translate the error body; client-level failures become
/// [`ExecuteError::Transport`].
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Returns an executor over the process-wide shared client.
    pub fn shared() -> Self {
        static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
        Self::new(CLIENT.get_or_init(reqwest::Client::new).clone())
    }
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::shared()
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(
        &self,
        request: http::Request<Bytes>,
        options: ExecuteOptions,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ExecuteError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let (parts, body) = request.into_parts();

            let mut builder = client
                .request(parts.method, parts.uri.to_string())
                .headers(parts.headers)
                .body(body);
            if let Some(seconds) = options.timeout {
                builder = builder.timeout(Duration::from_secs_f64(seconds));
            }

            let reply = builder
                .send()
                .await
                .map_err(|e| ExecuteError::Transport(Box::new(e)))?;

            let status = reply.status();
            let headers = reply.headers().clone();
            let body = reply
                .bytes()
                .await
                .map_err(|e| ExecuteError::Transport(Box::new(e)))?;

            let mut response = http::Response::new(body);
            *response.status_mut() = status;
            *response.headers_mut() = headers;

            if status.is_success() {
                Ok(response)
            } else {
                Err(ExecuteError::Response(response))
            }
        })
    }
}
