use crate::RpcCallerError;
use protofetch_rpc_service::RpcMethodDescriptor;
use std::sync::Arc;

/// Performs one RPC call over some wire, delivering response messages as
/// they are decoded.
///
/// `on_message` is invoked once per response message, in order, before the
/// returned future resolves. `Ok(())` means the response ended cleanly.
///
/// Dropping the returned future must abort the underlying network operation;
/// the call handles in this crate rely on that for cancellation.
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn invoke(
        &self,
        method: &RpcMethodDescriptor,
        request: Vec<u8>,
        on_message: &mut (dyn FnMut(Vec<u8>) + Send),
    ) -> Result<(), RpcCallerError>;
}

#[async_trait::async_trait]
impl<T> RpcTransport for Arc<T>
where
    T: RpcTransport + ?Sized,
{
    async fn invoke(
        &self,
        method: &RpcMethodDescriptor,
        request: Vec<u8>,
        on_message: &mut (dyn FnMut(Vec<u8>) + Send),
    ) -> Result<(), RpcCallerError> {
        (**self).invoke(method, request, on_message).await
    }
}
