use crate::{RpcCallerError, RpcCancelHandle};
use futures::FutureExt;
use futures::future::{AbortHandle, Abortable, BoxFuture};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Caller-visible result of a unary call.
///
/// Resolves exactly once, with the decoded response, an error, or
/// [`RpcCallerError::Canceled`]. Dropping the handle or canceling it drops
/// the in-flight request, which aborts the underlying network operation.
#[must_use = "a call handle does nothing unless awaited"]
pub struct RpcCallHandle<T> {
    inner: BoxFuture<'static, Result<T, RpcCallerError>>,
    cancel_handle: RpcCancelHandle,
}

impl<T: Send + 'static> RpcCallHandle<T> {
    pub fn new<F>(call: F) -> Self
    where
        F: Future<Output = Result<T, RpcCallerError>> + Send + 'static,
    {
        let (abort_handle, abort_registration) = AbortHandle::new_pair();

        let inner = Abortable::new(call, abort_registration)
            .map(|result| result.unwrap_or(Err(RpcCallerError::Canceled)))
            .boxed();

        Self {
            inner,
            cancel_handle: RpcCancelHandle::new(abort_handle),
        }
    }

    /// A handle resolving immediately with `error`.
    pub fn failed(error: RpcCallerError) -> Self {
        Self::new(async move { Err(error) })
    }
}

impl<T> RpcCallHandle<T> {
    pub fn cancel(&self) {
        self.cancel_handle.cancel();
    }

    pub fn cancel_handle(&self) -> RpcCancelHandle {
        self.cancel_handle.clone()
    }
}

impl<T> Future for RpcCallHandle<T> {
    type Output = Result<T, RpcCallerError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}
