//! Note: `DemoHttpServer` exists to exercise protofetch clients. It serves the
//! `demo.Calculator` table over both wire modes and has no authentication.

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use example_protofetch_rpc_service_definition::{
    AddRequest, AddResponse, CountRequest, CountResponse, EchoRequest, EchoResponse,
    MultRequest, MultResponse, WhoAmIRequest, WhoAmIResponse, calculator,
};
use futures::{StreamExt, stream};
use protofetch::frame::{FrameCodec, FrameStreamReassembler};
use protofetch_rpc_service::{
    RpcMessage, RpcMethod, RpcMethodDescriptor,
    constants::{CONTENT_TYPE_BUFFERED, CONTENT_TYPE_PREFIXED, TRACE_HEADER, TRACE_HEADER_FORCE},
};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

/// Size of the body chunks a streamed response is cut into when the method
/// does not pace its messages.
const DEFAULT_CHUNK_SIZE: usize = 4096;

const ADD: u64 = calculator::Add::DESCRIPTOR.method_id;
const MULT: u64 = calculator::Mult::DESCRIPTOR.method_id;
const ECHO: u64 = calculator::Echo::DESCRIPTOR.method_id;
const WHO_AM_I: u64 = calculator::WhoAmI::DESCRIPTOR.method_id;
const COUNT: u64 = calculator::Count::DESCRIPTOR.method_id;

/// An HTTP server answering `POST [/<region>]/rpc/<Service>/<Method>`.
///
/// Clones share the same request counter.
#[derive(Clone)]
pub struct DemoHttpServer {
    state: Arc<ServerState>,
}

struct ServerState {
    request_count: AtomicUsize,
    chunk_size: usize,
}

/// Request metadata the `WhoAmI` method reflects back to the caller.
struct CallHeaders {
    had_credentials: bool,
    forced_trace: bool,
}

/// Messages produced by one call and the pause before each of them.
struct Reply {
    messages: Vec<Vec<u8>>,
    interval: Duration,
}

impl Default for DemoHttpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoHttpServer {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Cuts unpaced streamed responses into body chunks of `chunk_size`
    /// bytes, ignoring frame boundaries.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            state: Arc::new(ServerState {
                request_count: AtomicUsize::new(0),
                chunk_size: chunk_size.max(1),
            }),
        }
    }

    /// Number of RPC requests received so far.
    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/rpc/{service}/{method}", post(handle_rpc))
            .route("/{region}/rpc/{service}/{method}", post(handle_region_rpc))
            .with_state(Arc::clone(&self.state))
    }

    /// Serves on a pre-bound listener until the task is dropped.
    pub async fn serve_with_listener(
        &self,
        listener: TcpListener,
    ) -> Result<SocketAddr, axum::BoxError> {
        let address = listener.local_addr()?;
        tracing::info!("Demo server running on {:?}", address);
        axum::serve(listener, self.router()).await?;
        Ok(address)
    }
}

async fn handle_rpc(
    State(state): State<Arc<ServerState>>,
    Path((service, method)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.dispatch(&service, &method, &headers, body).await
}

async fn handle_region_rpc(
    State(state): State<Arc<ServerState>>,
    Path((region, service, method)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    tracing::debug!(region, "Regional request");
    state.dispatch(&service, &method, &headers, body).await
}

impl ServerState {
    async fn dispatch(
        &self,
        service: &str,
        method: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Response {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let full_name = format!("{}/{}", service, method);
        let Some(descriptor) = calculator::METHODS
            .iter()
            .find(|descriptor| descriptor.full_name == full_name)
        else {
            return (StatusCode::NOT_FOUND, format!("unknown method {}", full_name))
                .into_response();
        };

        let prefixed = headers
            .get(header::CONTENT_TYPE)
            .is_some_and(|value| value == CONTENT_TYPE_PREFIXED);

        if descriptor.server_streaming && !prefixed {
            return (
                StatusCode::BAD_REQUEST,
                format!("{} requires {}", full_name, CONTENT_TYPE_PREFIXED),
            )
                .into_response();
        }

        let request = if prefixed {
            match unwrap_request_frame(&body) {
                Ok(request) => request,
                Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            }
        } else {
            body.to_vec()
        };

        let call_headers = CallHeaders {
            had_credentials: headers.contains_key(header::COOKIE),
            forced_trace: headers
                .get(TRACE_HEADER)
                .is_some_and(|value| value == TRACE_HEADER_FORCE),
        };

        let reply = match handle_method(descriptor, &request, &call_headers) {
            Ok(reply) => reply,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };

        if prefixed {
            self.framed_response(reply)
        } else {
            buffered_response(reply)
        }
    }

    fn framed_response(&self, reply: Reply) -> Response {
        let mut frames = Vec::with_capacity(reply.messages.len());
        for message in &reply.messages {
            match FrameCodec::encode(message) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
                }
            }
        }

        let body = if reply.interval.is_zero() {
            let bytes = frames.concat();
            let chunks: Vec<Vec<u8>> = bytes
                .chunks(self.chunk_size)
                .map(|chunk| chunk.to_vec())
                .collect();

            Body::from_stream(stream::iter(chunks.into_iter().map(Ok::<_, io::Error>)))
        } else {
            let interval = reply.interval;
            Body::from_stream(stream::iter(frames).then(move |frame| async move {
                tokio::time::sleep(interval).await;
                Ok::<_, io::Error>(frame)
            }))
        };

        with_content_type(Response::new(body), CONTENT_TYPE_PREFIXED)
    }
}

fn buffered_response(reply: Reply) -> Response {
    let body = reply.messages.into_iter().next().unwrap_or_default();
    with_content_type(Response::new(Body::from(body)), CONTENT_TYPE_BUFFERED)
}

fn with_content_type(mut response: Response, content_type: &'static str) -> Response {
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Extracts the single message a prefixed request body carries.
fn unwrap_request_frame(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut reassembler = FrameStreamReassembler::new();
    let mut messages = Vec::new();

    reassembler
        .push_bytes(body, |message| messages.push(message))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    reassembler
        .finish()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    match <[Vec<u8>; 1]>::try_from(messages) {
        Ok([message]) => Ok(message),
        Err(messages) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected one request frame, got {}", messages.len()),
        )),
    }
}

fn handle_method(
    descriptor: &RpcMethodDescriptor,
    request: &[u8],
    call_headers: &CallHeaders,
) -> io::Result<Reply> {
    let mut interval = Duration::ZERO;

    let messages = match descriptor.method_id {
        ADD => {
            let request = AddRequest::decode_message(request)?;
            let result = request.numbers.iter().sum();
            vec![AddResponse { result }.encode_message()?]
        }
        MULT => {
            let request = MultRequest::decode_message(request)?;
            let result = request.numbers.iter().product();
            vec![MultResponse { result }.encode_message()?]
        }
        ECHO => {
            let request = EchoRequest::decode_message(request)?;
            vec![
                EchoResponse {
                    payload: request.payload,
                }
                .encode_message()?,
            ]
        }
        WHO_AM_I => {
            let request = WhoAmIRequest::decode_message(request)?;
            vec![
                WhoAmIResponse {
                    context: request.context,
                    had_credentials: call_headers.had_credentials,
                    forced_trace: call_headers.forced_trace,
                }
                .encode_message()?,
            ]
        }
        COUNT => {
            let request = CountRequest::decode_message(request)?;
            interval = Duration::from_millis(u64::from(request.interval_ms));

            (0..request.count)
                .map(|index| {
                    CountResponse {
                        index,
                        payload: vec![(index % 256) as u8; request.payload_len as usize],
                    }
                    .encode_message()
                })
                .collect::<io::Result<Vec<_>>>()?
        }
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("no handler for {}", descriptor.full_name),
            ));
        }
    };

    Ok(Reply { messages, interval })
}
