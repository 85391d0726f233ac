mod messages;
pub use messages::*;

use protofetch_rpc_service::rpc_service;

rpc_service! {
    /// Demo arithmetic and echo service used by the example app and tests.
    pub mod calculator = "demo.Calculator" {
        unary Add(AddRequest) -> AddResponse;
        unary Mult(MultRequest) -> MultResponse;
        unary Echo(EchoRequest) -> EchoResponse;
        /// Reports the request context the server received.
        unary WhoAmI(WhoAmIRequest) -> WhoAmIResponse;
        /// Streams `count` messages, each carrying `payload_len` bytes.
        server_streaming Count(CountRequest) -> CountResponse;
    }
}
