use crate::{RpcMessage, constants::RPC_PATH_SEGMENT, method_id_hash};

/// Static metadata for one generated RPC method.
///
/// Descriptors are `const` values produced by [`rpc_service!`](crate::rpc_service)
/// and carry everything a transport needs to route a call without looking at
/// the request or response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RpcMethodDescriptor {
    /// Fully qualified service name, e.g. `"demo.Calculator"`.
    pub service: &'static str,
    /// Method name as it appears in the request path, e.g. `"Add"`.
    pub method: &'static str,
    /// `"<service>/<method>"`.
    pub full_name: &'static str,
    /// xxHash3 of `full_name`.
    pub method_id: u64,
    /// Whether the server may answer with zero or more messages.
    pub server_streaming: bool,
}

impl RpcMethodDescriptor {
    pub const fn new(
        service: &'static str,
        method: &'static str,
        full_name: &'static str,
        server_streaming: bool,
    ) -> Self {
        Self {
            service,
            method,
            full_name,
            method_id: method_id_hash(full_name),
            server_streaming,
        }
    }

    /// Request path relative to a server prefix: `/rpc/<service>/<method>`.
    pub fn path(&self) -> String {
        format!("/{}/{}", RPC_PATH_SEGMENT, self.full_name)
    }

    /// Looks a descriptor up in a service table by method name.
    pub fn find<'a>(table: &'a [RpcMethodDescriptor], method: &str) -> Option<&'a Self> {
        table.iter().find(|d| d.method == method)
    }
}

/// A callable RPC method with typed request and response messages.
///
/// Implementations are normally generated by [`rpc_service!`](crate::rpc_service);
/// the provided `encode_*`/`decode_*` functions defer to the messages'
/// [`RpcMessage`] implementations so that the transport only ever sees bytes.
pub trait RpcMethod {
    const DESCRIPTOR: RpcMethodDescriptor;

    type Request: RpcMessage;
    type Response: RpcMessage;

    fn encode_request(request: &Self::Request) -> Result<Vec<u8>, std::io::Error> {
        request.encode_message()
    }

    fn decode_request(bytes: &[u8]) -> Result<Self::Request, std::io::Error> {
        Self::Request::decode_message(bytes)
    }

    fn encode_response(response: &Self::Response) -> Result<Vec<u8>, std::io::Error> {
        response.encode_message()
    }

    fn decode_response(bytes: &[u8]) -> Result<Self::Response, std::io::Error> {
        Self::Response::decode_message(bytes)
    }
}

/// Marker for methods answering with exactly one message.
pub trait RpcUnaryMethod: RpcMethod {}

/// Marker for methods answering with zero or more messages.
pub trait RpcServerStreamingMethod: RpcMethod {}
