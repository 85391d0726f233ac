// Frame related constants

/// Size of the leading compression flag byte.
pub const FRAME_FLAG_SIZE: usize = 1;

/// Byte offset of the 4-byte big-endian payload length.
pub const FRAME_LENGTH_OFFSET: usize = 1;

/// Size in bytes of the payload length field (u32).
pub const FRAME_LENGTH_FIELD_SIZE: usize = 4;

/// Total size of the fixed frame header.
/// Computed as: flag byte + length field.
pub const FRAME_HEADER_SIZE: usize = FRAME_FLAG_SIZE + FRAME_LENGTH_FIELD_SIZE; // 1 + 4 = 5

/// The only compression flag this transport ever writes. Per-message
/// compression is not negotiated.
pub const FRAME_FLAG_UNCOMPRESSED: u8 = 0;

/// Upper bound on a single decoded frame payload unless the reassembler is
/// configured otherwise.
///
/// The length field can describe up to 4 GiB; a server that claims more than
/// this is treated as malformed rather than trusted with the allocation.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;
