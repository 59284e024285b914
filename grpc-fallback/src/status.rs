//! # Remote Status Translation
//!
//! Servers speaking the fallback protocol report failures either as a
//! protobuf-encoded status payload in the error body, or as a bare HTTP
//! status code. This module decodes the former ([`RemoteStatus`]), maps the
//! latter through a fixed table, and folds both into the uniform
//! [`RpcStatusError`] callers branch on.
use bytes::Bytes;
use tonic::Code;

/// Structured status payload optionally present in an error response body.
///
/// Wire-compatible with `google.rpc.Status`, encoded in the same protobuf
/// format as RPC messages.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RemoteStatus {
    /// Canonical status code, numeric form.
    #[prost(int32, tag = "1")]
    pub code: i32,
    /// Developer-facing error message.
    #[prost(string, tag = "2")]
    pub message: String,
    /// Machine-readable detail entries.
    #[prost(message, repeated, tag = "3")]
    pub details: Vec<prost_types::Any>,
}

/// Uniform error for remote-reported failures.
///
/// Produced either from a decoded [`RemoteStatus`] or, when the error body
/// is not a decodable status payload, from the HTTP status code mapped to a
/// canonical [`Code`] with the raw body and the decode failure kept as
/// context.
#[derive(Debug, thiserror::Error)]
#[error("RPC failed with status {:?}: '{message}'", .code)]
pub struct RpcStatusError {
    code: Code,
    message: String,
    details: Vec<prost_types::Any>,
    raw_body: Option<Bytes>,
    #[source]
    source: Option<prost::DecodeError>,
}

impl RpcStatusError {
    pub(crate) fn from_remote_status(status: RemoteStatus) -> Self {
        Self {
            code: Code::from(status.code),
            message: status.message,
            details: status.details,
            raw_body: None,
            source: None,
        }
    }

    pub(crate) fn from_http_fallback(
        status: http::StatusCode,
        body: Bytes,
        source: prost::DecodeError,
    ) -> Self {
        Self {
            code: http_status_to_code(status),
            message: status.to_string(),
            details: Vec::new(),
            raw_body: Some(body),
            source: Some(source),
        }
    }

    /// The canonical status code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured detail entries, when the server sent a status payload.
    pub fn details(&self) -> &[prost_types::Any] {
        &self.details
    }

    /// The raw error body, kept when it was not a decodable status payload.
    pub fn raw_body(&self) -> Option<&Bytes> {
        self.raw_body.as_ref()
    }
}

/// Maps an HTTP status code to a canonical RPC code.
///
/// Used only when the error body is not a decodable [`RemoteStatus`].
pub fn http_status_to_code(status: http::StatusCode) -> Code {
    match status.as_u16() {
        400 => Code::InvalidArgument,
        401 => Code::Unauthenticated,
        403 => Code::PermissionDenied,
        404 => Code::NotFound,
        409 => Code::Aborted,
        429 => Code::ResourceExhausted,
        499 => Code::Cancelled,
        500 => Code::Internal,
        501 => Code::Unimplemented,
        503 => Code::Unavailable,
        504 => Code::DeadlineExceeded,
        _ => Code::Unknown,
    }
}
