use bitcode::{Decode, Encode};
use protofetch_rpc_service::{RequestContext, RpcMessage, WithRequestContext};
use std::io;

macro_rules! bitcode_message {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RpcMessage for $ty {
                fn encode_message(&self) -> Result<Vec<u8>, io::Error> {
                    Ok(bitcode::encode(self))
                }

                fn decode_message(bytes: &[u8]) -> Result<Self, io::Error> {
                    bitcode::decode::<$ty>(bytes)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
                }
            }
        )*
    };
}

macro_rules! with_request_context {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WithRequestContext for $ty {
                fn request_context(&self) -> Option<&RequestContext> {
                    self.context.as_ref()
                }

                fn set_request_context(&mut self, context: RequestContext) {
                    self.context = Some(context);
                }
            }
        )*
    };
}

#[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
pub struct AddRequest {
    pub context: Option<RequestContext>,
    pub numbers: Vec<f64>,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct AddResponse {
    pub result: f64,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
pub struct MultRequest {
    pub context: Option<RequestContext>,
    pub numbers: Vec<f64>,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct MultResponse {
    pub result: f64,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
pub struct EchoRequest {
    pub context: Option<RequestContext>,
    pub payload: Vec<u8>,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct EchoResponse {
    pub payload: Vec<u8>,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
pub struct WhoAmIRequest {
    pub context: Option<RequestContext>,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct WhoAmIResponse {
    pub context: Option<RequestContext>,
    /// Whether the request arrived with a `Cookie` header.
    pub had_credentials: bool,
    /// Whether the request asked for a forced trace.
    pub forced_trace: bool,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
pub struct CountRequest {
    pub context: Option<RequestContext>,
    pub count: u32,
    pub payload_len: u32,
    /// Delay the server waits before sending each message.
    pub interval_ms: u32,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct CountResponse {
    pub index: u32,
    pub payload: Vec<u8>,
}

bitcode_message!(
    AddRequest,
    AddResponse,
    MultRequest,
    MultResponse,
    EchoRequest,
    EchoResponse,
    WhoAmIRequest,
    WhoAmIResponse,
    CountRequest,
    CountResponse,
);

with_request_context!(AddRequest, MultRequest, EchoRequest, WhoAmIRequest, CountRequest);
