//! Protobuf descriptors for a tiny `echo` package, used by the
//! `grpc-fallback` test suite.
//!
//! The descriptors are built programmatically from `prost_types` structs so
//! the tests need neither `protoc` nor a build script:
//!
//! ```proto
//! syntax = "proto3";
//! package echo;
//!
//! message EchoRequest  { string message = 1; }
//! message EchoResponse { string message = 1; }
//! ```
use prost_reflect::{DescriptorPool, MessageDescriptor};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use std::sync::OnceLock;

/// The descriptor pool holding the `echo` package.
pub fn descriptor_pool() -> &'static DescriptorPool {
    static POOL: OnceLock<DescriptorPool> = OnceLock::new();
    POOL.get_or_init(|| {
        let file = FileDescriptorProto {
            name: Some("echo.proto".to_string()),
            package: Some("echo".to_string()),
            message_type: vec![string_message("EchoRequest"), string_message("EchoResponse")],
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };
        let set = FileDescriptorSet { file: vec![file] };
        DescriptorPool::from_file_descriptor_set(set).expect("valid echo descriptors")
    })
}

pub fn echo_request() -> MessageDescriptor {
    message_descriptor("echo.EchoRequest")
}

pub fn echo_response() -> MessageDescriptor {
    message_descriptor("echo.EchoResponse")
}

fn message_descriptor(full_name: &str) -> MessageDescriptor {
    descriptor_pool()
        .get_message_by_name(full_name)
        .expect("message registered in the echo pool")
}

fn string_message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: vec![FieldDescriptorProto {
            name: Some("message".to_string()),
            number: Some(1),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::String as i32),
            json_name: Some("message".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}
