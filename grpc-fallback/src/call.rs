//! # Call Descriptors
//!
//! The data structures a caller (typically a generated client stub) hands to
//! the transport: the [`Call`] itself and its per-invocation
//! [`CallOptions`].
use crate::executor::ExecuteOptions;
use prost_reflect::{DynamicMessage, MessageDescriptor};
use std::fmt;

/// Callback invoked with the response header map, for out-of-band metadata
/// delivery.
pub type MetadataCallback = Box<dyn Fn(&http::HeaderMap) + Send + Sync>;

/// An outbound unary RPC descriptor.
///
/// Immutable for the duration of one invocation; the transport consumes it
/// read-only.
#[derive(Debug, Clone)]
pub struct Call {
    /// The fully qualified RPC name (e.g., `my.package.Service.Method`).
    pub method: String,
    /// The outbound request payload.
    pub message: DynamicMessage,
    /// Descriptor of the expected response shape. An empty instance is
    /// constructed from it and the response bytes are merged in.
    pub response_type: MessageDescriptor,
}

impl Call {
    pub fn new(
        method: impl Into<String>,
        message: DynamicMessage,
        response_type: MessageDescriptor,
    ) -> Self {
        Self {
            method: method.into(),
            message,
            response_type,
        }
    }
}

/// Per-invocation configuration bag.
///
/// Only the recognized options below exist; the [`ExecuteOptions`] escape
/// hatch carries anything else through to the executor untouched.
#[derive(Default)]
pub struct CallOptions {
    /// Call deadline in milliseconds, converted to a fractional-seconds
    /// `timeout` on the derived executor options.
    pub timeout_millis: Option<u64>,
    /// Invoked exactly once with the response headers, before the body is
    /// decoded, whenever the executor resolves with a response.
    pub metadata_callback: Option<MetadataCallback>,
    /// Base options handed to the executor. A derived `timeout` is the only
    /// key the transport sets on top of these.
    pub fallback_options: ExecuteOptions,
}

impl CallOptions {
    /// Derives the options handed to the HTTP executor for one call.
    pub(crate) fn execute_options(&self) -> ExecuteOptions {
        let mut options = self.fallback_options.clone();
        if let Some(millis) = self.timeout_millis {
            options.timeout = Some(millis as f64 / 1000.0);
        }
        options
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("timeout_millis", &self.timeout_millis)
            .field("metadata_callback", &self.metadata_callback.is_some())
            .field("fallback_options", &self.fallback_options)
            .finish()
    }
}
