mod call_handle;
mod caller_interface;
mod cancel_handle;
mod completion_events;
mod error;
mod stream_handle;
mod transport;

pub use call_handle::RpcCallHandle;
pub use caller_interface::{
    RpcCallServerStreaming, RpcCallUnary, RpcServiceCaller, RpcServiceCallerInterface,
};
pub use cancel_handle::RpcCancelHandle;
pub use completion_events::RpcCompletionEvents;
pub use error::RpcCallerError;
pub use stream_handle::{RpcStreamHandle, RpcStreamObserver, StreamOutcome};
pub use transport::RpcTransport;
