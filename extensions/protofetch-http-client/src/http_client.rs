use crate::RpcHttpClientConfig;
use crate::config::normalize_prefix;
use protofetch::frame::{FrameCodec, FrameStreamReassembler, ReassemblyError, reassemble_stream};
use protofetch_rpc_service::{
    RpcMethodDescriptor,
    constants::{CONTENT_TYPE_BUFFERED, CONTENT_TYPE_PREFIXED, TRACE_HEADER, TRACE_HEADER_FORCE},
};
use protofetch_rpc_service_caller::{RpcCallerError, RpcCompletionEvents, RpcTransport};
use reqwest::cookie::CookieStore;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use std::error::Error;
use std::io;
use std::sync::Arc;

/// Issues protofetch calls as HTTP POST requests.
///
/// Cheap to clone: clones and [`for_region`](Self::for_region) views share
/// the connection pool, the configuration and the completion bus.
#[derive(Clone)]
pub struct RpcHttpClient {
    http: reqwest::Client,
    config: Arc<RpcHttpClientConfig>,
    server_prefix: String,
    completion_events: RpcCompletionEvents,
}

impl RpcHttpClient {
    pub fn new(config: RpcHttpClientConfig) -> Result<Self, RpcCallerError> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            RpcCallerError::Connection(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self::with_http_client(http, config))
    }

    /// Uses an existing `reqwest::Client` (and its connection pool).
    pub fn with_http_client(http: reqwest::Client, config: RpcHttpClientConfig) -> Self {
        Self {
            http,
            server_prefix: config.server_prefix.clone(),
            config: Arc::new(config),
            completion_events: RpcCompletionEvents::new(),
        }
    }

    /// A view of this client that sends its calls to `prefix`.
    pub fn for_region(&self, prefix: impl Into<String>) -> Self {
        Self {
            server_prefix: prefix.into(),
            ..self.clone()
        }
    }

    pub fn server_prefix(&self) -> &str {
        &self.server_prefix
    }

    pub fn config(&self) -> &RpcHttpClientConfig {
        &self.config
    }

    /// Bus announcing the method name of every call that reached the server.
    ///
    /// Calls that never connected, were rejected up front or were canceled
    /// are not announced.
    pub fn completion_events(&self) -> &RpcCompletionEvents {
        &self.completion_events
    }

    fn url_for(&self, method: &RpcMethodDescriptor) -> String {
        format!("{}{}", normalize_prefix(&self.server_prefix), method.path())
    }

    fn includes_credentials(&self) -> bool {
        self.config.is_region_prefix(&self.server_prefix)
    }

    fn attach_credentials(
        &self,
        builder: reqwest::RequestBuilder,
        url: &reqwest::Url,
    ) -> reqwest::RequestBuilder {
        let cookies = self
            .config
            .cookie_jar
            .as_ref()
            .and_then(|jar| jar.cookies(url));

        match cookies {
            Some(cookies) => builder.header(COOKIE, cookies),
            None => builder,
        }
    }

    /// Stores cookies a credentialed response sets, as a browser would.
    fn store_credentials(&self, response: &reqwest::Response) {
        if let Some(jar) = &self.config.cookie_jar {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            jar.set_cookies(&mut set_cookies, response.url());
        }
    }

    /// Sends the request and waits for the response head.
    async fn send(
        &self,
        method: &RpcMethodDescriptor,
        request: Vec<u8>,
    ) -> Result<reqwest::Response, SendError> {
        let streaming = self.config.streaming_http_enabled;
        let url = self.url_for(method);

        let url = reqwest::Url::parse(&url).map_err(|e| {
            SendError::NotSent(RpcCallerError::Connection(format!(
                "invalid URL {}: {}",
                url, e
            )))
        })?;

        let (content_type, body) = if streaming {
            let frame = FrameCodec::encode(&request).map_err(|e| {
                SendError::NotSent(RpcCallerError::Encode(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    e,
                )))
            })?;
            (CONTENT_TYPE_PREFIXED, frame)
        } else {
            (CONTENT_TYPE_BUFFERED, request)
        };

        tracing::debug!(method = method.full_name, %url, streaming, "Dispatching RPC request");

        let mut builder = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, content_type)
            .body(body);

        if self.config.trace_debug.is_forced() {
            builder = builder.header(TRACE_HEADER, TRACE_HEADER_FORCE);
        }

        if self.includes_credentials() {
            builder = self.attach_credentials(builder, &url);
        }

        builder.send().await.map_err(|e| {
            let error = RpcCallerError::Connection(error_chain(&e));
            tracing::error!(method = method.full_name, %url, "Request failed: {}", error);

            if e.is_connect() || e.is_builder() {
                SendError::NotSent(error)
            } else {
                SendError::Sent(error)
            }
        })
    }

    /// Checks the status and delivers the body as one or more messages.
    async fn read_response(
        &self,
        method: &RpcMethodDescriptor,
        response: reqwest::Response,
        on_message: &mut (dyn FnMut(Vec<u8>) + Send),
    ) -> Result<(), RpcCallerError> {
        if self.includes_credentials() {
            self.store_credentials(&response);
        }

        let status = response.status().as_u16();
        if !(200..400).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(method = method.full_name, status, "RPC returned an error status");
            return Err(RpcCallerError::HttpStatus { status, body });
        }

        if self.config.streaming_http_enabled {
            let reassembler = FrameStreamReassembler::with_max_frame_size(self.config.max_frame_size);
            let body = std::pin::pin!(response.bytes_stream());

            let delivered = reassemble_stream(body, reassembler, |message| on_message(message))
                .await
                .map_err(|e| match e {
                    ReassemblyError::Source(e) => {
                        tracing::error!(method = method.full_name, "Response stream failed: {}", e);
                        RpcCallerError::Connection(error_chain(&e))
                    }
                    ReassemblyError::Frame(e) => RpcCallerError::MalformedStream(e),
                })?;

            tracing::trace!(method = method.full_name, delivered, "Response stream ended");
        } else {
            let bytes = response.bytes().await.map_err(|e| {
                tracing::error!(method = method.full_name, "Reading response failed: {}", e);
                RpcCallerError::Connection(error_chain(&e))
            })?;

            on_message(bytes.to_vec());
        }

        Ok(())
    }
}

/// Failure before a response head arrived.
enum SendError {
    /// No connection was made, so the server never saw the call.
    NotSent(RpcCallerError),
    /// The request may have reached the server.
    Sent(RpcCallerError),
}

/// Renders an error with all of its sources, e.g.
/// `error sending request: client error (Connect): tcp connect error`.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

#[async_trait::async_trait]
impl RpcTransport for RpcHttpClient {
    async fn invoke(
        &self,
        method: &RpcMethodDescriptor,
        request: Vec<u8>,
        on_message: &mut (dyn FnMut(Vec<u8>) + Send),
    ) -> Result<(), RpcCallerError> {
        if method.server_streaming && !self.config.streaming_http_enabled {
            tracing::warn!(
                method = method.full_name,
                "Server-streaming call rejected: streaming HTTP is disabled"
            );
            return Err(RpcCallerError::StreamingDisabled {
                method: method.full_name.to_string(),
            });
        }

        let result = match self.send(method, request).await {
            Ok(response) => self.read_response(method, response, on_message).await,
            Err(SendError::NotSent(error)) => return Err(error),
            Err(SendError::Sent(error)) => Err(error),
        };

        // Dropped (canceled) calls never get here.
        self.completion_events.publish(method.full_name);

        result
    }
}
