//! Keypad: forward every touch event to the dispatch queue.
//!
//! Posting never blocks. If the dispatcher stalls and the queue fills,
//! further presses are dropped and counted rather than holding up the
//! scanner.

use platform::InputDevice;

use crate::kernel::Kernel;

pub async fn keypad_task<I: InputDevice>(kernel: &Kernel, mut input: I) -> ! {
    loop {
        let event = input.wait_for_event().await;
        kernel.keys.post(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embassy_futures::select::{select, Either};
    use embassy_futures::yield_now;
    use platform::mocks::MockInput;
    use platform::{InputEvent, KeyId};

    #[tokio::test]
    async fn test_events_reach_the_queue_in_order() {
        let kernel = Kernel::new();
        let mut input = MockInput::new();
        input.add_event(InputEvent::KeyPress(KeyId::Digit1)).unwrap();
        input.add_event(InputEvent::KeyLongPress(KeyId::Enter)).unwrap();

        let drain = async {
            while kernel.keys.len() < 2 {
                yield_now().await;
            }
        };
        match select(keypad_task(&kernel, input), drain).await {
            Either::First(never) => match never {},
            Either::Second(()) => {}
        }
        assert_eq!(kernel.keys.try_receive(), Some(InputEvent::KeyPress(KeyId::Digit1)));
        assert_eq!(kernel.keys.try_receive(), Some(InputEvent::KeyLongPress(KeyId::Enter)));
    }
}
