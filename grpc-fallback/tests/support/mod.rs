#![allow(dead_code)]
use bytes::Bytes;
use grpc_fallback::prost::Message;
use grpc_fallback::prost_reflect::{DynamicMessage, MessageDescriptor, Value};

/// Builds an `echo` message with its `message` field set.
pub fn dynamic(descriptor: MessageDescriptor, text: &str) -> DynamicMessage {
    let mut message = DynamicMessage::new(descriptor);
    message.set_field_by_name("message", Value::String(text.to_string()));
    message
}

pub fn encode(message: &DynamicMessage) -> Bytes {
    Bytes::from(message.encode_to_vec())
}

/// The `message` field of an `echo` message.
pub fn text(message: &DynamicMessage) -> String {
    message
        .get_field_by_name("message")
        .expect("message field")
        .as_str()
        .expect("string field")
        .to_string()
}

pub fn http_response(status: u16, body: Bytes) -> http::Response<Bytes> {
    let mut response = http::Response::new(body);
    *response.status_mut() = http::StatusCode::from_u16(status).expect("valid status code");
    response
}
