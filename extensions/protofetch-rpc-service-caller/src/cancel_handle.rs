use futures::future::AbortHandle;

/// Cancellation trigger for one call.
///
/// Cloneable so it can be handed to a timeout or UI layer while the call
/// handle itself is being awaited. Canceling is idempotent and has no effect
/// once the call has settled.
#[derive(Debug, Clone)]
pub struct RpcCancelHandle {
    abort_handle: AbortHandle,
}

impl RpcCancelHandle {
    pub(crate) fn new(abort_handle: AbortHandle) -> Self {
        Self { abort_handle }
    }

    pub fn cancel(&self) {
        self.abort_handle.abort();
    }

    pub fn is_canceled(&self) -> bool {
        self.abort_handle.is_aborted()
    }
}
