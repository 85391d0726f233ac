pub mod constants;
mod macros;
pub use macros::*;
mod message;
pub use message::RpcMessage;
mod method;
pub use method::{RpcMethod, RpcMethodDescriptor, RpcServerStreamingMethod, RpcUnaryMethod};
mod request_context;
pub use request_context::{RequestContext, WithRequestContext};
