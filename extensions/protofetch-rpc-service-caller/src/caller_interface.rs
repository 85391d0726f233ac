use crate::{RpcCallHandle, RpcCallerError, RpcStreamHandle, RpcTransport};
use protofetch_rpc_service::{
    RequestContext, RpcMethod, RpcServerStreamingMethod, RpcUnaryMethod, WithRequestContext,
};
use std::sync::Arc;

/// Defines a generic capability for making RPC calls.
///
/// Any struct that can provide an [`RpcTransport`] and the shared
/// [`RequestContext`] gains typed unary and server-streaming calls for every
/// method generated by `rpc_service!`, without per-method code.
pub trait RpcServiceCallerInterface: Send + Sync {
    type Transport: RpcTransport + 'static;

    // --- METHODS TO BE IMPLEMENTED BY THE STRUCT ---

    fn transport(&self) -> Arc<Self::Transport>;

    fn request_context(&self) -> &RequestContext;

    // --- METHODS PROVIDED AUTOMATICALLY BY THE TRAIT ---

    /// Issues a unary call, returning a cancelable handle that resolves with
    /// the decoded response.
    ///
    /// The shared request context is attached unless `request` already
    /// carries one. If the transport delivers more than one message, the
    /// first one wins.
    fn call_unary<M>(&self, mut request: M::Request) -> RpcCallHandle<M::Response>
    where
        M: RpcUnaryMethod + 'static,
        M::Request: WithRequestContext,
        M::Response: Send + 'static,
    {
        request.merge_request_context(self.request_context());

        match M::encode_request(&request) {
            Ok(encoded) => {
                tracing::debug!(method = M::DESCRIPTOR.full_name, "Calling unary method");
                RpcCallHandle::new(invoke_unary::<M, _>(self.transport(), encoded))
            }
            Err(e) => RpcCallHandle::failed(RpcCallerError::Encode(e)),
        }
    }

    /// Issues a server-streaming call, returning a cancelable stream of
    /// decoded responses.
    fn call_server_streaming<M>(&self, mut request: M::Request) -> RpcStreamHandle<M::Response>
    where
        M: RpcServerStreamingMethod + 'static,
        M::Request: WithRequestContext,
    {
        request.merge_request_context(self.request_context());

        let encoded = match M::encode_request(&request) {
            Ok(encoded) => encoded,
            Err(e) => {
                return RpcStreamHandle::failed(RpcCallerError::Encode(e), M::decode_response);
            }
        };

        tracing::debug!(
            method = M::DESCRIPTOR.full_name,
            "Calling server-streaming method"
        );

        let transport = self.transport();
        let descriptor = M::DESCRIPTOR;

        RpcStreamHandle::new(
            move |tx| async move {
                transport
                    .invoke(&descriptor, encoded, &mut |bytes| {
                        // The receiver only goes away with the handle, which
                        // also drops this future.
                        let _ = tx.unbounded_send(bytes);
                    })
                    .await
            },
            M::decode_response,
        )
    }
}

async fn invoke_unary<M, T>(
    transport: Arc<T>,
    encoded: Vec<u8>,
) -> Result<M::Response, RpcCallerError>
where
    M: RpcMethod,
    T: RpcTransport,
{
    let descriptor = M::DESCRIPTOR;
    let mut response: Option<Vec<u8>> = None;

    transport
        .invoke(&descriptor, encoded, &mut |bytes| {
            if response.is_none() {
                response = Some(bytes);
            } else {
                tracing::warn!(
                    method = descriptor.full_name,
                    "Ignoring extra message on unary call"
                );
            }
        })
        .await?;

    let bytes = response.ok_or_else(|| RpcCallerError::EmptyResponse {
        method: descriptor.full_name.to_string(),
    })?;

    M::decode_response(&bytes).map_err(RpcCallerError::Decode)
}

/// The concrete call adapter: a transport plus the shared request context,
/// both injected at construction.
pub struct RpcServiceCaller<T> {
    transport: Arc<T>,
    request_context: RequestContext,
}

impl<T> RpcServiceCaller<T>
where
    T: RpcTransport + 'static,
{
    pub fn new(transport: Arc<T>, request_context: RequestContext) -> Self {
        Self {
            transport,
            request_context,
        }
    }

    /// Uses the context computed once for this process.
    pub fn with_process_context(transport: Arc<T>) -> Self {
        Self::new(transport, RequestContext::process().clone())
    }
}

impl<T> Clone for RpcServiceCaller<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            request_context: self.request_context.clone(),
        }
    }
}

impl<T> RpcServiceCallerInterface for RpcServiceCaller<T>
where
    T: RpcTransport + 'static,
{
    type Transport = T;

    fn transport(&self) -> Arc<T> {
        Arc::clone(&self.transport)
    }

    fn request_context(&self) -> &RequestContext {
        &self.request_context
    }
}

/// Allows `M::call(&caller, request)` for every unary method.
pub trait RpcCallUnary: RpcUnaryMethod + Sized {
    fn call<C>(caller: &C, request: Self::Request) -> RpcCallHandle<Self::Response>
    where
        C: RpcServiceCallerInterface;
}

impl<M> RpcCallUnary for M
where
    M: RpcUnaryMethod + 'static,
    M::Request: WithRequestContext,
    M::Response: Send + 'static,
{
    fn call<C>(caller: &C, request: Self::Request) -> RpcCallHandle<Self::Response>
    where
        C: RpcServiceCallerInterface,
    {
        caller.call_unary::<M>(request)
    }
}

/// Allows `M::stream(&caller, request)` for every server-streaming method.
pub trait RpcCallServerStreaming: RpcServerStreamingMethod + Sized {
    fn stream<C>(caller: &C, request: Self::Request) -> RpcStreamHandle<Self::Response>
    where
        C: RpcServiceCallerInterface;
}

impl<M> RpcCallServerStreaming for M
where
    M: RpcServerStreamingMethod + 'static,
    M::Request: WithRequestContext,
{
    fn stream<C>(caller: &C, request: Self::Request) -> RpcStreamHandle<Self::Response>
    where
        C: RpcServiceCallerInterface,
    {
        caller.call_server_streaming::<M>(request)
    }
}
