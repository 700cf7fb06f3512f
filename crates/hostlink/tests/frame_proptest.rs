//! Property tests for the frame codec and the stream decoder.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing, clippy::panic)]

use hostlink::frame::MAX_PAYLOAD;
use hostlink::{create_frame, verify_frame, FrameError, StreamDecoder};
use proptest::prelude::*;

proptest! {
    #[test]
    fn created_frames_always_verify(
        msg_type in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD),
    ) {
        let frame = create_frame(msg_type, &payload).unwrap();
        let verified = verify_frame(&frame).unwrap();
        prop_assert_eq!(verified.msg_type, msg_type);
        prop_assert_eq!(verified.payload, payload.as_slice());
    }

    #[test]
    fn any_single_payload_bit_flip_fails(
        msg_type in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 1..=MAX_PAYLOAD),
        pick in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut frame = create_frame(msg_type, &payload).unwrap();
        let at = 3 + pick.index(payload.len());
        frame[at] ^= 1 << bit;
        let is_crc_mismatch = matches!(
            verify_frame(&frame),
            Err(FrameError::CrcMismatch { .. })
        );
        prop_assert!(is_crc_mismatch);
    }

    #[test]
    fn decoder_never_panics_on_noise(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut dec = StreamDecoder::new();
        let _ = dec.push_slice(&bytes);
    }

    #[test]
    fn decoder_recovers_after_noise(
        noise in prop::collection::vec(any::<u8>(), 0..64),
        value in -1.0e6f64..1.0e6,
    ) {
        let mut dec = StreamDecoder::new();
        dec.push_slice(&noise);
        // A bare terminator plus a full frame's worth of padding flushes any
        // partial frame or line the noise left behind.
        dec.push_slice(&[b'\r'; 40]);
        let frame = hostlink::meter_frame(hostlink::MessageType::Volts, value).unwrap();
        let msg = dec.push_slice(&frame);
        prop_assert_eq!(msg, Some(hostlink::Message::Volts(value)));
    }
}
