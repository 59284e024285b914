//! # Fallback Transport
//!
//! This module implements the transport contract: [`FallbackTransport`]
//! turns a [`Call`] into a single HTTP/1.1 POST against the service's
//! `/$rpc/` endpoint, hands it to the injected [`HttpExecutor`], and
//! translates the outcome back into a decoded message or a typed error.
//!
//! ## Wire contract
//!
//! * **URI**: `https://<host>[:<port>]/$rpc/<fully.qualified.Method>` —
//!   exact and case-sensitive; the `$rpc` segment is a literal recognized by
//!   server-side fallback endpoints.
//! * **Headers**: configuration-supplied common headers, plus a mandatory
//!   `Content-Type: application/x-protobuf`, plus the token `grpc-web`
//!   appended to `x-goog-api-client` — the signal that fallback semantics
//!   apply, independent of the actual payload framing.
//! * **Body**: the protobuf encoding of the request message. POST, always.
use crate::call::{Call, CallOptions};
use crate::executor::{ExecuteError, HttpExecutor, ReqwestExecutor};
use crate::status::{RemoteStatus, RpcStatusError};
use crate::BoxError;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::uri::Authority;
use http::{HeaderMap, HeaderName, Method, Uri};
use prost::Message;
use prost_reflect::DynamicMessage;
use std::str::FromStr;
use tracing::debug;

const API_CLIENT_HEADER: HeaderName = HeaderName::from_static("x-goog-api-client");
const FALLBACK_TOKEN: &str = "grpc-web";
const CONTENT_TYPE_PROTOBUF: &str = "application/x-protobuf";

/// Errors that can occur when building a [`FallbackTransport`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid service address '{address}': '{source}'")]
    InvalidAddress {
        address: String,
        source: http::uri::InvalidUri,
    },
}

/// Errors surfaced by a single unary call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("RPC method name must not be empty")]
    EmptyMethod,
    #[error("Invalid RPC method name '{method}': '{source}'")]
    InvalidMethod {
        method: String,
        source: http::uri::InvalidUri,
    },
    #[error("Invalid value for header '{name}': '{source}'")]
    InvalidHeader {
        name: HeaderName,
        source: http::header::InvalidHeaderValue,
    },
    /// The success-path response body is not a valid encoding of the
    /// expected response shape.
    #[error("Failed to decode response body: '{0}'")]
    Decode(#[from] prost::DecodeError),
    /// A remote-reported failure, or an HTTP error mapped to a canonical
    /// code. This is the variant callers branch on.
    #[error(transparent)]
    Status(#[from] RpcStatusError),
    /// Executor failure with no HTTP response attached. The original error
    /// is propagated unchanged and can be downcast.
    #[error("Transport failure: '{0}'")]
    Transport(#[source] BoxError),
}

/// A unary-only RPC transport over plain HTTP/1.1 POST requests.
///
/// Holds only immutable configuration after construction (service
/// authority, common headers, executor reference), so it is safe for
/// concurrent use by multiple callers. Each call is independent: no
/// retries, no caching, no shared mutable state.
#[derive(Debug, Clone)]
pub struct FallbackTransport<E = ReqwestExecutor> {
    authority: Authority,
    common_headers: HeaderMap,
    executor: E,
}

impl FallbackTransport<ReqwestExecutor> {
    /// Builds a transport for `address` (`host[:port]`) using the
    /// process-wide shared HTTP client.
    pub fn build(address: &str) -> Result<Self, BuildError> {
        Self::with_executor(address, ReqwestExecutor::shared())
    }
}

impl<E> FallbackTransport<E>
where
    E: HttpExecutor,
{
    /// Builds a transport for `address` (`host[:port]`) with an injected
    /// executor.
    pub fn with_executor(address: &str, executor: E) -> Result<Self, BuildError> {
        let authority =
            Authority::from_str(address).map_err(|source| BuildError::InvalidAddress {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            authority,
            common_headers: HeaderMap::new(),
            executor,
        })
    }

    /// Sets the common headers merged into every request.
    pub fn with_common_headers(mut self, headers: HeaderMap) -> Self {
        self.common_headers = headers;
        self
    }

    /// Starts a unary call: single request, single response.
    ///
    /// Resolves to the decoded response message, or fails with exactly one
    /// [`CallError`]:
    ///
    /// * `Decode` — the response body does not match `call.response_type`.
    /// * `Status` — the server reported a failure, either as a status
    ///   payload in the error body or as a bare HTTP error code.
    /// * `Transport` — the executor failed without a response; the original
    ///   error is passed through unchanged.
    pub async fn start_unary_call(
        &self,
        call: &Call,
        options: CallOptions,
    ) -> Result<DynamicMessage, CallError> {
        let request = self.build_request(call)?;
        debug!(method = %call.method, uri = %request.uri(), "starting fallback unary call");

        match self.executor.execute(request, options.execute_options()).await {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                if let Some(callback) = options.metadata_callback.as_ref() {
                    callback(&parts.headers);
                }

                let mut message = DynamicMessage::new(call.response_type.clone());
                message.merge(body)?;
                Ok(message)
            }
            Err(ExecuteError::Response(response)) => {
                debug!(method = %call.method, status = %response.status(), "translating error response");
                Err(translate_error_response(response))
            }
            // No server reply to translate: the original failure is the
            // caller's to inspect.
            Err(ExecuteError::Transport(err)) => Err(CallError::Transport(err)),
        }
    }

    fn build_request(&self, call: &Call) -> Result<http::Request<Bytes>, CallError> {
        if call.method.is_empty() {
            return Err(CallError::EmptyMethod);
        }

        let uri = format!("https://{}/$rpc/{}", self.authority, call.method);
        let uri = Uri::from_str(&uri).map_err(|source| CallError::InvalidMethod {
            method: call.method.clone(),
            source,
        })?;

        let mut request = http::Request::new(Bytes::from(call.message.encode_to_vec()));
        *request.method_mut() = Method::POST;
        *request.uri_mut() = uri;

        let headers = request.headers_mut();
        headers.extend(self.common_headers.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_PROTOBUF));
        append_api_client_token(headers)?;

        Ok(request)
    }
}

/// Appends the fallback token to `x-goog-api-client`, preserving any
/// existing tokens (across all values of the header) in order.
fn append_api_client_token(headers: &mut HeaderMap) -> Result<(), CallError> {
    let mut tokens: Vec<&str> = headers
        .get_all(&API_CLIENT_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .collect();
    tokens.push(FALLBACK_TOKEN);
    let merged = tokens.join(" ");

    let value = HeaderValue::from_str(&merged).map_err(|source| CallError::InvalidHeader {
        name: API_CLIENT_HEADER,
        source,
    })?;
    headers.insert(&API_CLIENT_HEADER, value);
    Ok(())
}

/// Translates a failure that carries an HTTP response.
///
/// The body is first tried as a [`RemoteStatus`] payload; if it does not
/// decode, the HTTP status code is mapped through the fixed table and the
/// raw body plus the decode failure are kept as context.
fn translate_error_response(response: http::Response<Bytes>) -> CallError {
    let (parts, body) = response.into_parts();
    match RemoteStatus::decode(body.clone()) {
        Ok(status) => CallError::Status(RpcStatusError::from_remote_status(status)),
        Err(source) => {
            CallError::Status(RpcStatusError::from_http_fallback(parts.status, body, source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_token_when_header_is_absent() {
        let mut headers = HeaderMap::new();
        append_api_client_token(&mut headers).unwrap();
        assert_eq!(headers[&API_CLIENT_HEADER], "grpc-web");
    }

    #[test]
    fn appends_token_after_existing_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(
            &API_CLIENT_HEADER,
            HeaderValue::from_static("gl-rust/1.89 gapic/0.1.0"),
        );
        append_api_client_token(&mut headers).unwrap();
        assert_eq!(
            headers[&API_CLIENT_HEADER],
            "gl-rust/1.89 gapic/0.1.0 grpc-web"
        );
    }

    #[test]
    fn folds_multiple_header_values_in_order() {
        let mut headers = HeaderMap::new();
        headers.append(&API_CLIENT_HEADER, HeaderValue::from_static("gl-rust/1.89"));
        headers.append(&API_CLIENT_HEADER, HeaderValue::from_static("gccl/2.0"));
        append_api_client_token(&mut headers).unwrap();
        assert_eq!(
            headers[&API_CLIENT_HEADER],
            "gl-rust/1.89 gccl/2.0 grpc-web"
        );
    }

    #[test]
    fn rejects_invalid_service_addresses() {
        let err = FallbackTransport::build("https://not-an-authority").unwrap_err();
        assert!(matches!(err, BuildError::InvalidAddress { .. }));
    }

    #[test]
    fn accepts_host_with_port() {
        let transport = FallbackTransport::build("example.googleapis.com:8443").unwrap();
        assert_eq!(
            transport.authority.as_str(),
            "example.googleapis.com:8443"
        );
    }
}
