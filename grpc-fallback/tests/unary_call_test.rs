use bytes::Bytes;
use grpc_fallback::{Call, CallError, CallOptions, FallbackTransport, executor_fn};
use http::HeaderMap;
use http::header::HeaderValue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mod support;

fn echo_call() -> Call {
    Call::new(
        "echo.EchoService.Echo",
        support::dynamic(echo_descriptors::echo_request(), "hello"),
        echo_descriptors::echo_response(),
    )
}

fn replying_executor(status: u16, body: Bytes) -> impl grpc_fallback::HttpExecutor {
    executor_fn(move |_request, _options| {
        let body = body.clone();
        async move {
            let mut response = support::http_response(status, body);
            response
                .headers_mut()
                .insert("x-request-id", HeaderValue::from_static("abc-123"));
            Ok::<_, grpc_fallback::ExecuteError>(response)
        }
    })
}

#[tokio::test]
async fn resolves_to_the_decoded_response_message() {
    let body = support::encode(&support::dynamic(
        echo_descriptors::echo_response(),
        "hello back",
    ));
    let transport =
        FallbackTransport::with_executor("example.googleapis.com", replying_executor(200, body))
            .unwrap();

    let response = transport
        .start_unary_call(&echo_call(), CallOptions::default())
        .await
        .unwrap();

    assert_eq!(support::text(&response), "hello back");
}

#[tokio::test]
async fn invokes_the_metadata_callback_once_with_the_response_headers() {
    let body = support::encode(&support::dynamic(echo_descriptors::echo_response(), "ok"));
    let transport =
        FallbackTransport::with_executor("example.googleapis.com", replying_executor(200, body))
            .unwrap();

    let invocations = Arc::new(AtomicUsize::new(0));
    let seen_headers: Arc<Mutex<Option<HeaderMap>>> = Arc::new(Mutex::new(None));
    let counter = invocations.clone();
    let slot = seen_headers.clone();
    let options = CallOptions {
        metadata_callback: Some(Box::new(move |headers| {
            counter.fetch_add(1, Ordering::SeqCst);
            *slot.lock().unwrap() = Some(headers.clone());
        })),
        ..Default::default()
    };

    transport
        .start_unary_call(&echo_call(), options)
        .await
        .unwrap();

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    let headers = seen_headers.lock().unwrap().take().unwrap();
    assert_eq!(headers["x-request-id"], "abc-123");
}

#[tokio::test]
async fn metadata_callback_runs_even_when_the_body_fails_to_decode() {
    // Header delivery happens before decoding, so a bad body must not
    // suppress it.
    let transport = FallbackTransport::with_executor(
        "example.googleapis.com",
        replying_executor(200, Bytes::from_static(b"\xff\xff\xff")),
    )
    .unwrap();

    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = invocations.clone();
    let options = CallOptions {
        metadata_callback: Some(Box::new(move |_headers| {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
        ..Default::default()
    };

    let err = transport
        .start_unary_call(&echo_call(), options)
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Decode(_)));
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn surfaces_a_decode_error_for_a_malformed_success_body() {
    let transport = FallbackTransport::with_executor(
        "example.googleapis.com",
        replying_executor(200, Bytes::from_static(b"<html>not protobuf</html>")),
    )
    .unwrap();

    let err = transport
        .start_unary_call(&echo_call(), CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Decode(_)));
}
