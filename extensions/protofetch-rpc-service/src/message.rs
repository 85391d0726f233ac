use std::io;

/// A request or response message as seen by the transport.
///
/// The transport never inspects message contents; it only needs a way to
/// turn a message into bytes and back. Generated service definitions
/// implement this with whatever serializer the service uses.
pub trait RpcMessage: Sized {
    fn encode_message(&self) -> Result<Vec<u8>, io::Error>;

    fn decode_message(bytes: &[u8]) -> Result<Self, io::Error>;
}

/// Raw bytes pass through untouched.
impl RpcMessage for Vec<u8> {
    fn encode_message(&self) -> Result<Vec<u8>, io::Error> {
        Ok(self.clone())
    }

    fn decode_message(bytes: &[u8]) -> Result<Self, io::Error> {
        Ok(bytes.to_vec())
    }
}
