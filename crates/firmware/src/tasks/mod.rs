//! Long-running tasks. Each is an `async fn ... -> !` borrowing the shared
//! [`Kernel`](crate::kernel::Kernel); the board entry point joins them with
//! the dispatcher.
//!
//! | Task              | Runs                        | Owns                  |
//! |-------------------|-----------------------------|-----------------------|
//! | `keypad_task`     | always                      | input device          |
//! | `meter_task` ×2   | Meter / Ohms mode           | ADC (per read)        |
//! | `clock_task`      | Clock mode                  | RTC (per read)        |
//! | `timekeeper_task` | always                      | RTC (per set)         |
//! | `progress_task`   | MusicList mode              |                       |
//! | `player_task`     | on a play request           | audio output, file    |
//! | `host_tx_task`    | always                      | serial TX             |
//! | `host_rx_task`    | until the port closes       | serial RX             |
//! | `notice_task`     | always                      |                       |

pub mod clock;
pub mod host;
pub mod keypad;
pub mod meter;
pub mod music;
pub mod notice;

pub use clock::{clock_task, timekeeper_task};
pub use host::{host_rx_task, host_tx_task};
pub use keypad::keypad_task;
pub use meter::{meter_task, Meter};
pub use music::{player_task, progress_task};
pub use notice::notice_task;
