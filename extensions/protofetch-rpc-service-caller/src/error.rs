use protofetch::frame::FrameDecodeError;
use std::fmt;
use std::io;

/// Represents errors that can occur during an RPC call from the perspective of the caller.
#[derive(Debug)]
pub enum RpcCallerError {
    /// The HTTP request could not be completed (DNS, TLS, connection reset).
    Connection(String),
    /// The server answered with a status outside `[200, 400)`.
    /// `body` holds the response text when it could be read.
    HttpStatus { status: u16, body: String },
    /// The response body was not a well-formed sequence of frames.
    MalformedStream(FrameDecodeError),
    /// A server-streaming method was called while streaming HTTP is turned off.
    /// No request was sent.
    StreamingDisabled { method: String },
    /// A unary call finished without producing a response message.
    EmptyResponse { method: String },
    /// The request message could not be serialized.
    Encode(io::Error),
    /// A response message could not be deserialized.
    Decode(io::Error),
    /// The call was canceled through its handle.
    Canceled,
    /// Any other I/O failure.
    Io(io::Error),
}

impl RpcCallerError {
    /// True for [`RpcCallerError::Canceled`], letting callers tell an aborted
    /// call apart from a genuine network failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RpcCallerError::Canceled)
    }
}

impl fmt::Display for RpcCallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallerError::Connection(msg) => write!(f, "Connection error: {}", msg),
            RpcCallerError::HttpStatus { status, body } => {
                write!(f, "HTTP status {}: {}", status, body)
            }
            RpcCallerError::MalformedStream(e) => write!(f, "Malformed stream: {}", e),
            RpcCallerError::StreamingDisabled { method } => write!(
                f,
                "Server-streaming method {} requires streaming HTTP, which is disabled",
                method
            ),
            RpcCallerError::EmptyResponse { method } => {
                write!(f, "No response message received for {}", method)
            }
            RpcCallerError::Encode(e) => write!(f, "Request encode error: {}", e),
            RpcCallerError::Decode(e) => write!(f, "Response decode error: {}", e),
            RpcCallerError::Canceled => write!(f, "RPC call canceled"),
            RpcCallerError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RpcCallerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcCallerError::MalformedStream(e) => Some(e),
            RpcCallerError::Encode(e) | RpcCallerError::Decode(e) | RpcCallerError::Io(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}

impl From<io::Error> for RpcCallerError {
    fn from(e: io::Error) -> Self {
        RpcCallerError::Io(e)
    }
}

impl From<FrameDecodeError> for RpcCallerError {
    fn from(e: FrameDecodeError) -> Self {
        RpcCallerError::MalformedStream(e)
    }
}
