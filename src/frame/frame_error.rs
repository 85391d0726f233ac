use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameEncodeError {
    /// The payload does not fit the 32-bit length field.
    PayloadTooLarge { len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameDecodeError {
    /// Fewer than 5 bytes were handed to the header decoder.
    IncompleteHeader,

    /// The stream ended with 1-4 bytes of a frame header buffered.
    TruncatedHeader { buffered: usize },

    /// The stream ended before the announced payload length was read.
    TruncatedPayload { expected: usize, received: usize },

    /// A header announced a payload larger than the configured maximum.
    FrameTooLarge { len: usize, max: usize },

    /// Bytes were pushed into a reassembler that already failed.
    ReadAfterError,
}

impl fmt::Display for FrameEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameEncodeError::PayloadTooLarge { len } => {
                write!(f, "payload of {} bytes exceeds the u32 length field", len)
            }
        }
    }
}

impl std::error::Error for FrameEncodeError {}

impl fmt::Display for FrameDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDecodeError::IncompleteHeader => write!(f, "incomplete frame header"),
            FrameDecodeError::TruncatedHeader { buffered } => write!(
                f,
                "stream ended inside a frame header ({} of 5 bytes)",
                buffered
            ),
            FrameDecodeError::TruncatedPayload { expected, received } => write!(
                f,
                "stream ended inside a frame payload ({} of {} bytes)",
                received, expected
            ),
            FrameDecodeError::FrameTooLarge { len, max } => {
                write!(f, "frame of {} bytes exceeds the {} byte limit", len, max)
            }
            FrameDecodeError::ReadAfterError => {
                write!(f, "read attempted after a previous decode error")
            }
        }
    }
}

impl std::error::Error for FrameDecodeError {}

/// Failure while pulling a chunked byte source through a reassembler.
#[derive(Debug)]
pub enum ReassemblyError<E> {
    /// The byte source itself failed (e.g. the connection dropped).
    Source(E),
    /// The bytes did not form a valid sequence of frames.
    Frame(FrameDecodeError),
}

impl<E: fmt::Display> fmt::Display for ReassemblyError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReassemblyError::Source(e) => write!(f, "byte source failed: {}", e),
            ReassemblyError::Frame(e) => write!(f, "malformed stream: {}", e),
        }
    }
}

impl<E> std::error::Error for ReassemblyError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReassemblyError::Source(e) => Some(e),
            ReassemblyError::Frame(e) => Some(e),
        }
    }
}

impl<E> From<FrameDecodeError> for ReassemblyError<E> {
    fn from(e: FrameDecodeError) -> Self {
        ReassemblyError::Frame(e)
    }
}
