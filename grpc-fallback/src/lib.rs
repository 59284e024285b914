//! # gRPC Fallback Transport
//!
//! `grpc-fallback` implements a fallback transport for unary gRPC calls in
//! environments where a full streaming gRPC stack is unavailable or
//! disallowed (restrictive proxies, HTTP/1.1-only networks).
//!
//! Instead of gRPC framing over HTTP/2, each call becomes a single plain
//! HTTP/1.1 POST to `https://<host>[:<port>]/$rpc/<fully.qualified.Method>`
//! with a protobuf-encoded body and `Content-Type: application/x-protobuf`.
//! Responses and errors are adapted back into the call abstraction: the body
//! decodes into the expected response message, and failures surface as a
//! uniform error carrying a canonical [`tonic::Code`].
//!
//! ## Key Components
//!
//! * **[`FallbackTransport`]:** The main entry point. Composes the request,
//!   delegates to an injected HTTP executor, and translates the outcome.
//! * **[`Call`] & [`CallOptions`]:** The per-invocation descriptor and its
//!   configuration bag (timeout, response-metadata callback, executor
//!   pass-through options).
//! * **[`HttpExecutor`]:** The seam to the actual HTTP client. A
//!   [`ReqwestExecutor`] over a process-wide `reqwest::Client` is the
//!   default; [`executor_fn`] adapts any async closure, which is how the
//!   test suite mocks the network.
//!
//! ## Dynamic messages
//!
//! Payloads are [`prost_reflect::DynamicMessage`] values, so the transport
//! needs no compile-time knowledge of the protobuf schema: the expected
//! response shape travels with the call as a
//! [`prost_reflect::MessageDescriptor`] and an empty instance is constructed
//! and merged from the response bytes.
//!
//! ## Error taxonomy
//!
//! * [`CallError::Decode`] — the success-path body does not match the
//!   expected response shape.
//! * [`CallError::Status`] — a remote-reported failure, either a protobuf
//!   status payload decoded from the error body or an HTTP status code
//!   mapped through a fixed table.
//! * [`CallError::Transport`] — an executor failure with no HTTP response
//!   at all (DNS, connect, timeout without a reply); the original boxed
//!   error is propagated unchanged and can be downcast.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect`, and `tonic` to ensure
//! that consumers use compatible versions of these underlying dependencies.
pub mod call;
pub mod executor;
pub mod status;
pub mod transport;

pub use call::{Call, CallOptions, MetadataCallback};
pub use executor::{ExecuteError, ExecuteOptions, ExecutorFn, HttpExecutor, ReqwestExecutor, executor_fn};
pub use status::{RemoteStatus, RpcStatusError};
pub use transport::{BuildError, CallError, FallbackTransport};

// Re-exports
pub use prost;
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
