mod frame_codec;
mod frame_error;
mod frame_stream_reassembler;
mod reassemble_stream;

pub use frame_codec::FrameCodec;
pub use frame_error::{FrameDecodeError, FrameEncodeError, ReassemblyError};
pub use frame_stream_reassembler::{FrameStreamReassembler, ReassemblerState};
pub use reassemble_stream::reassemble_stream;
