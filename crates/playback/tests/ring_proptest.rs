//! Property tests for the drop-oldest ring buffer.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use playback::AudioRingBuffer;
use proptest::prelude::*;

proptest::proptest! {
    #[test]
    fn never_holds_more_than_capacity(samples in prop::collection::vec(any::<i16>(), 0..200)) {
        let rb: AudioRingBuffer<16> = AudioRingBuffer::new();
        for &s in &samples {
            rb.write(s);
            prop_assert!(rb.len() <= 15);
        }
    }

    #[test]
    fn overflow_keeps_the_newest_samples(samples in prop::collection::vec(any::<i16>(), 0..200)) {
        let rb: AudioRingBuffer<16> = AudioRingBuffer::new();
        for &s in &samples {
            rb.write(s);
        }
        let kept = samples.len().min(15);
        let expected = &samples[samples.len() - kept..];
        let got: Vec<i16> = core::iter::from_fn(|| rb.read()).collect();
        prop_assert_eq!(got.as_slice(), expected);
        prop_assert_eq!(rb.evicted(), samples.len() - kept);
    }

    #[test]
    fn interleaved_reads_preserve_order(ops in prop::collection::vec(any::<bool>(), 0..300)) {
        // true = write the next counter value, false = read
        let rb: AudioRingBuffer<8> = AudioRingBuffer::new();
        let mut next = 0i16;
        let mut last_read: Option<i16> = None;
        for op in ops {
            if op {
                rb.write(next);
                next = next.wrapping_add(1);
            } else if let Some(v) = rb.read() {
                if let Some(prev) = last_read {
                    prop_assert!(v > prev);
                }
                last_read = Some(v);
            }
        }
    }
}
