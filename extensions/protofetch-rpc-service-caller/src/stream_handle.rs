use crate::{RpcCallerError, RpcCancelHandle};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use futures::future::{AbortHandle, Abortable, BoxFuture};
use futures::{FutureExt, Stream, StreamExt};
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

/// How a stream handle reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Failed,
    Canceled,
}

/// Callbacks driven by [`RpcStreamHandle::observe`].
///
/// Exactly one of `on_error`, `on_complete` or `on_canceled` is called, after
/// every `on_message`.
pub trait RpcStreamObserver<T> {
    fn on_message(&mut self, message: T);

    fn on_error(&mut self, error: RpcCallerError);

    fn on_complete(&mut self);

    fn on_canceled(&mut self) {}
}

/// Caller-visible result of a server-streaming call.
///
/// The handle owns the in-flight call and advances it only while it is
/// polled, so the network is read no faster than messages are consumed.
/// It yields each decoded response message, then at most one error, then
/// ends.
#[must_use = "a stream handle does nothing unless polled"]
pub struct RpcStreamHandle<T> {
    driver: Option<BoxFuture<'static, Result<(), RpcCallerError>>>,
    messages: UnboundedReceiver<Vec<u8>>,
    decode: fn(&[u8]) -> Result<T, io::Error>,
    terminal_error: Option<RpcCallerError>,
    is_finished: bool,
    cancel_handle: RpcCancelHandle,
}

impl<T> RpcStreamHandle<T> {
    /// Builds a handle around a call that pushes raw messages into the
    /// provided sender.
    pub fn new<F, Fut>(start: F, decode: fn(&[u8]) -> Result<T, io::Error>) -> Self
    where
        F: FnOnce(UnboundedSender<Vec<u8>>) -> Fut,
        Fut: Future<Output = Result<(), RpcCallerError>> + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let (abort_handle, abort_registration) = AbortHandle::new_pair();

        let driver = Abortable::new(start(tx), abort_registration)
            .map(|result| result.unwrap_or(Err(RpcCallerError::Canceled)))
            .boxed();

        Self {
            driver: Some(driver),
            messages: rx,
            decode,
            terminal_error: None,
            is_finished: false,
            cancel_handle: RpcCancelHandle::new(abort_handle),
        }
    }

    /// A handle that yields `error` and ends, without touching the network.
    pub fn failed(error: RpcCallerError, decode: fn(&[u8]) -> Result<T, io::Error>) -> Self {
        Self::new(move |_tx| async move { Err(error) }, decode)
    }

    pub fn cancel(&self) {
        self.cancel_handle.cancel();
    }

    pub fn cancel_handle(&self) -> RpcCancelHandle {
        self.cancel_handle.clone()
    }

    /// Drives the stream to completion through `observer`.
    pub async fn observe<O>(mut self, mut observer: O) -> StreamOutcome
    where
        O: RpcStreamObserver<T>,
    {
        while let Some(item) = self.next().await {
            match item {
                Ok(message) => observer.on_message(message),
                Err(RpcCallerError::Canceled) => {
                    observer.on_canceled();
                    return StreamOutcome::Canceled;
                }
                Err(error) => {
                    observer.on_error(error);
                    return StreamOutcome::Failed;
                }
            }
        }

        observer.on_complete();
        StreamOutcome::Completed
    }

    fn settle(&mut self, error: RpcCallerError) -> Poll<Option<Result<T, RpcCallerError>>> {
        self.driver = None;
        self.is_finished = true;
        Poll::Ready(Some(Err(error)))
    }
}

impl<T> Stream for RpcStreamHandle<T> {
    type Item = Result<T, RpcCallerError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.is_finished {
            return Poll::Ready(None);
        }

        // Canceling after the call settled changes nothing; before that it
        // wins over any messages still queued.
        if this.driver.is_some() && this.cancel_handle.is_canceled() {
            return this.settle(RpcCallerError::Canceled);
        }

        loop {
            match this.messages.poll_next_unpin(cx) {
                Poll::Ready(Some(bytes)) => {
                    return match (this.decode)(&bytes) {
                        Ok(message) => Poll::Ready(Some(Ok(message))),
                        Err(e) => this.settle(RpcCallerError::Decode(e)),
                    };
                }
                Poll::Ready(None) if this.driver.is_none() => {
                    this.is_finished = true;
                    return match this.terminal_error.take() {
                        Some(error) => Poll::Ready(Some(Err(error))),
                        None => Poll::Ready(None),
                    };
                }
                _ => {}
            }

            let Some(driver) = this.driver.as_mut() else {
                return Poll::Pending;
            };

            match driver.poll_unpin(cx) {
                Poll::Ready(result) => {
                    // Dropping the driver drops its sender, so the receiver
                    // reports the end once the queue is drained.
                    this.driver = None;
                    this.terminal_error = result.err();
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
