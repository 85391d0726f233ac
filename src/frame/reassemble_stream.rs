use crate::frame::{FrameStreamReassembler, ReassemblyError};
use futures::{Stream, StreamExt};

/// Pulls every chunk from `source` through `reassembler`, invoking
/// `on_message` once per completed frame.
///
/// The callback runs inline with the read loop, so the next chunk is not
/// requested until it returns. When the source completes, the reassembler is
/// finished and any truncated trailing frame is reported as an error.
///
/// Returns the number of messages delivered.
pub async fn reassemble_stream<S, B, E, F>(
    mut source: S,
    mut reassembler: FrameStreamReassembler,
    mut on_message: F,
) -> Result<usize, ReassemblyError<E>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    F: FnMut(Vec<u8>),
{
    let mut delivered = 0;

    while let Some(chunk) = source.next().await {
        let chunk = chunk.map_err(ReassemblyError::Source)?;
        delivered += reassembler.push_bytes(chunk.as_ref(), &mut on_message)?;
    }

    reassembler.finish()?;

    Ok(delivered)
}
