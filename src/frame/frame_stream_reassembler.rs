use crate::{
    constants::{DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE},
    frame::{FrameCodec, FrameDecodeError},
};

/// Reconstructs discrete message payloads from an unaligned byte stream.
///
/// `FrameStreamReassembler` accepts the response body of a single streaming
/// call exactly as the transport delivers it: chunks of any size, with no
/// alignment to frame boundaries. A chunk may contain nothing, part of a
/// header, the tail of one message and the start of the next, or several
/// whole messages. Every completed payload is handed to the caller's
/// callback exactly once, in arrival order.
///
/// One reassembler belongs to one in-flight call and is never shared.
///
/// ### Termination
///
/// Call [`finish`](Self::finish) once the source reports completion. The
/// stream is well formed only if it ended exactly on a frame boundary;
/// leftover header bytes or a partially filled payload are reported as
/// truncation errors, and the partial message is never delivered.
#[derive(Debug)]
pub struct FrameStreamReassembler {
    state: DecoderState,
    max_frame_size: usize,
}

/// Externally observable phase of a [`FrameStreamReassembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblerState {
    /// Waiting for (the rest of) a 5-byte frame header.
    AwaitingHeader,
    /// A header was decoded and its payload is being filled.
    Accumulating,
    /// A previous chunk failed to decode; no further input is accepted.
    Failed,
}

#[derive(Debug)]
enum DecoderState {
    AwaitingHeader {
        header: [u8; FRAME_HEADER_SIZE],
        filled: usize,
    },
    Accumulating {
        buffer: Vec<u8>,
        expected: usize,
    },
    Failed,
}

impl DecoderState {
    fn awaiting_header() -> Self {
        DecoderState::AwaitingHeader {
            header: [0u8; FRAME_HEADER_SIZE],
            filled: 0,
        }
    }
}

impl Default for FrameStreamReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStreamReassembler {
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Creates a reassembler that rejects any frame whose announced payload
    /// length exceeds `max_frame_size`.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            state: DecoderState::awaiting_header(),
            max_frame_size,
        }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    pub fn state(&self) -> ReassemblerState {
        match self.state {
            DecoderState::AwaitingHeader { .. } => ReassemblerState::AwaitingHeader,
            DecoderState::Accumulating { .. } => ReassemblerState::Accumulating,
            DecoderState::Failed => ReassemblerState::Failed,
        }
    }

    /// Number of bytes held for the frame currently being reconstructed
    /// (header bytes while awaiting a header, payload bytes while
    /// accumulating).
    pub fn buffered_len(&self) -> usize {
        match &self.state {
            DecoderState::AwaitingHeader { filled, .. } => *filled,
            DecoderState::Accumulating { buffer, .. } => buffer.len(),
            DecoderState::Failed => 0,
        }
    }

    /// Consumes one chunk, invoking `on_message` once per payload completed
    /// by it.
    ///
    /// Bytes read past a message boundary are carried into the next header
    /// parse. Returns the number of messages emitted by this chunk.
    pub fn push_bytes<F>(
        &mut self,
        mut bytes: &[u8],
        mut on_message: F,
    ) -> Result<usize, FrameDecodeError>
    where
        F: FnMut(Vec<u8>),
    {
        let mut emitted = 0;

        loop {
            match &mut self.state {
                DecoderState::Failed => return Err(FrameDecodeError::ReadAfterError),

                DecoderState::AwaitingHeader { header, filled } => {
                    if bytes.is_empty() {
                        break;
                    }

                    let take = (FRAME_HEADER_SIZE - *filled).min(bytes.len());
                    header[*filled..*filled + take].copy_from_slice(&bytes[..take]);
                    *filled += take;
                    bytes = &bytes[take..];

                    if *filled < FRAME_HEADER_SIZE {
                        break;
                    }

                    let (len, _) = FrameCodec::decode_header(&header[..])?;

                    if len > self.max_frame_size {
                        tracing::warn!(
                            len,
                            max = self.max_frame_size,
                            "Rejecting oversized frame"
                        );
                        self.state = DecoderState::Failed;
                        return Err(FrameDecodeError::FrameTooLarge {
                            len,
                            max: self.max_frame_size,
                        });
                    }

                    tracing::trace!(len, "Decoded frame header");

                    if len == 0 {
                        self.state = DecoderState::awaiting_header();
                        on_message(Vec::new());
                        emitted += 1;
                    } else {
                        self.state = DecoderState::Accumulating {
                            buffer: Vec::with_capacity(len),
                            expected: len,
                        };
                    }
                }

                DecoderState::Accumulating { buffer, expected } => {
                    if bytes.is_empty() {
                        break;
                    }

                    let take = (*expected - buffer.len()).min(bytes.len());
                    buffer.extend_from_slice(&bytes[..take]);
                    bytes = &bytes[take..];

                    if buffer.len() < *expected {
                        break;
                    }

                    let payload = std::mem::take(buffer);
                    self.state = DecoderState::awaiting_header();
                    on_message(payload);
                    emitted += 1;
                }
            }
        }

        Ok(emitted)
    }

    /// Validates that the stream ended on a frame boundary.
    pub fn finish(self) -> Result<(), FrameDecodeError> {
        match self.state {
            DecoderState::AwaitingHeader { filled: 0, .. } => Ok(()),
            DecoderState::AwaitingHeader { filled, .. } => {
                Err(FrameDecodeError::TruncatedHeader { buffered: filled })
            }
            DecoderState::Accumulating { buffer, expected } => {
                Err(FrameDecodeError::TruncatedPayload {
                    expected,
                    received: buffer.len(),
                })
            }
            DecoderState::Failed => Err(FrameDecodeError::ReadAfterError),
        }
    }
}
