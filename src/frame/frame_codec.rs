use crate::{
    constants::{
        FRAME_FLAG_UNCOMPRESSED, FRAME_HEADER_SIZE, FRAME_LENGTH_FIELD_SIZE, FRAME_LENGTH_OFFSET,
    },
    frame::{FrameDecodeError, FrameEncodeError},
};

/// Provides encoding and decoding functionality for length-prefixed frames.
///
/// A frame wraps exactly one opaque message payload:
///
/// ```text
/// byte 0      : compression flag, always 0
/// bytes 1-4   : payload length, u32 big-endian
/// bytes 5..N  : payload
/// ```
///
/// The codec holds no state. Reconstructing frames from a chunked byte
/// stream is the job of [`FrameStreamReassembler`](crate::frame::FrameStreamReassembler),
/// which only hands complete headers to [`FrameCodec::decode_header`].
pub struct FrameCodec;

impl FrameCodec {
    /// Encodes a single message payload into a frame.
    ///
    /// # Arguments
    ///
    /// * `payload` - The serialized message. It is copied verbatim after the
    ///   5-byte header.
    ///
    /// # Returns
    ///
    /// A vector of `payload.len() + 5` bytes. Fails only if the payload length
    /// does not fit the 32-bit length field.
    pub fn encode(payload: &[u8]) -> Result<Vec<u8>, FrameEncodeError> {
        let len = u32::try_from(payload.len()).map_err(|_| FrameEncodeError::PayloadTooLarge {
            len: payload.len(),
        })?;

        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());

        buf.push(FRAME_FLAG_UNCOMPRESSED);
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(payload);

        Ok(buf)
    }

    /// Decodes a frame header, returning the payload length and the bytes
    /// that follow the header.
    ///
    /// The compression flag in byte 0 is read but not interpreted; this
    /// transport never negotiates compression.
    ///
    /// Returns `FrameDecodeError::IncompleteHeader` if fewer than 5 bytes are
    /// given.
    pub fn decode_header(buf: &[u8]) -> Result<(usize, &[u8]), FrameDecodeError> {
        let (header, rest) = buf
            .split_first_chunk::<FRAME_HEADER_SIZE>()
            .ok_or(FrameDecodeError::IncompleteHeader)?;

        let mut len_bytes = [0u8; FRAME_LENGTH_FIELD_SIZE];
        len_bytes.copy_from_slice(
            &header[FRAME_LENGTH_OFFSET..FRAME_LENGTH_OFFSET + FRAME_LENGTH_FIELD_SIZE],
        );

        Ok((u32::from_be_bytes(len_bytes) as usize, rest))
    }
}
