use protofetch::frame::{FrameCodec, FrameDecodeError, FrameStreamReassembler, ReassemblerState};

#[test]
fn finish_on_empty_stream_is_clean() {
    let reassembler = FrameStreamReassembler::new();
    assert_eq!(reassembler.finish(), Ok(()));
}

#[test]
fn missing_final_byte_is_truncated_payload() {
    let payload = b"almost complete".to_vec();
    let frame = FrameCodec::encode(&payload).unwrap();

    let mut reassembler = FrameStreamReassembler::new();
    let mut calls = 0;

    reassembler
        .push_bytes(&frame[..frame.len() - 1], |_| calls += 1)
        .unwrap();

    assert_eq!(calls, 0);
    assert_eq!(
        reassembler.finish(),
        Err(FrameDecodeError::TruncatedPayload {
            expected: payload.len(),
            received: payload.len() - 1,
        })
    );
}

#[test]
fn leftover_header_bytes_are_truncated_header() {
    for leftover in 1..5 {
        let mut bytes = FrameCodec::encode(b"ok").unwrap();
        let next = FrameCodec::encode(b"cut").unwrap();
        bytes.extend_from_slice(&next[..leftover]);

        let mut reassembler = FrameStreamReassembler::new();
        let mut messages = vec![];
        reassembler
            .push_bytes(&bytes, |m| messages.push(m))
            .unwrap();

        assert_eq!(messages, vec![b"ok".to_vec()]);
        assert_eq!(
            reassembler.finish(),
            Err(FrameDecodeError::TruncatedHeader { buffered: leftover })
        );
    }
}

#[test]
fn header_only_frame_with_missing_payload_is_truncated() {
    let frame = FrameCodec::encode(&[1, 2, 3]).unwrap();

    let mut reassembler = FrameStreamReassembler::new();
    reassembler.push_bytes(&frame[..5], |_| {}).unwrap();

    assert_eq!(reassembler.state(), ReassemblerState::Accumulating);
    assert!(matches!(
        reassembler.finish(),
        Err(FrameDecodeError::TruncatedPayload {
            expected: 3,
            received: 0
        })
    ));
}

#[test]
fn oversized_frame_is_rejected_before_allocation() {
    let mut reassembler = FrameStreamReassembler::with_max_frame_size(16);
    let header = [0u8, 0, 0, 0, 17];

    let result = reassembler.push_bytes(&header, |_| panic!("no message expected"));

    assert_eq!(
        result,
        Err(FrameDecodeError::FrameTooLarge { len: 17, max: 16 })
    );
    assert_eq!(reassembler.state(), ReassemblerState::Failed);

    // Nothing more is accepted once the stream is known to be bad.
    assert_eq!(
        reassembler.push_bytes(b"more", |_| {}),
        Err(FrameDecodeError::ReadAfterError)
    );
    assert_eq!(reassembler.finish(), Err(FrameDecodeError::ReadAfterError));
}

#[test]
fn frame_at_exact_limit_is_accepted() {
    let payload = vec![9u8; 16];
    let frame = FrameCodec::encode(&payload).unwrap();

    let mut reassembler = FrameStreamReassembler::with_max_frame_size(16);
    let mut messages = vec![];
    reassembler
        .push_bytes(&frame, |m| messages.push(m))
        .unwrap();

    assert_eq!(messages, vec![payload]);
}

#[test]
fn messages_before_an_error_are_still_delivered() {
    let mut bytes = FrameCodec::encode(b"good").unwrap();
    bytes.extend_from_slice(&[0, 0xff, 0xff, 0xff, 0xff]);

    let mut reassembler = FrameStreamReassembler::with_max_frame_size(1024);
    let mut messages = vec![];
    let result = reassembler.push_bytes(&bytes, |m| messages.push(m));

    assert_eq!(messages, vec![b"good".to_vec()]);
    assert!(matches!(
        result,
        Err(FrameDecodeError::FrameTooLarge { .. })
    ));
}
