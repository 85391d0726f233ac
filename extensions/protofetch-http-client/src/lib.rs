//! An [`RpcTransport`](protofetch_rpc_service_caller::RpcTransport) that
//! carries calls over plain HTTP POST requests.
//!
//! Each call is sent to `<prefix>/rpc/<Service>/<Method>`. With streaming
//! enabled, request and response bodies are length-prefixed frames and the
//! response is reassembled as it arrives; otherwise both bodies are a single
//! raw message.

mod config;
pub use config::{RpcHttpClientConfig, TraceDebug};

mod http_client;
pub use http_client::RpcHttpClient;
