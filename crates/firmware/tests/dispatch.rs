//! Key dispatch end to end: boot an [`App`] on mock peripherals, press keys
//! and check the register bank, the LCD and the EEPROM image.
//!
//! Run with: cargo test -p firmware --test dispatch

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use firmware::{App, Kernel, Peripherals};
use modes::{Mode, Periodic};
use platform::config::EEPROM_CAPACITY;
use platform::eeprom::{FileEeprom, MockEeprom};
use platform::mocks::{MockAdc, MockCard, MockDisplay};
use platform::{Icon, InputEvent, KeyId, MemorySlot};

type Board = Peripherals<MockDisplay, MockAdc, MockCard>;

fn board() -> Board {
    Peripherals::new(MockDisplay::new(), MockAdc::new(), MockCard::new())
}

async fn line(board: &Board, n: u8) -> String {
    board.display.lock().await.line(n).trim_start().to_string()
}

async fn icon(board: &Board, icon: Icon) -> bool {
    board.display.lock().await.icon(icon)
}

#[tokio::test]
async fn test_add_two_numbers() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Digit2, KeyId::Enter, KeyId::Digit3, KeyId::Add])
        .await;

    assert_eq!(app.state().bank.x(), 5.0);
    assert_eq!(line(&board, 1).await, "5.0000");
}

#[tokio::test]
async fn test_error_gates_keys_until_acknowledged() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Digit1, KeyId::Enter, KeyId::Digit0, KeyId::Divide])
        .await;
    assert!(app.modes().is_gated());
    assert_eq!(line(&board, 0).await, "Math Error");
    assert!(icon(&board, Icon::Error).await);

    // Masked while the error is up.
    app.press_all(&[KeyId::Digit7]).await;
    assert!(app.modes().is_gated());
    assert_eq!(line(&board, 0).await, "Math Error");

    app.press_all(&[KeyId::Enter]).await;
    assert!(!app.modes().is_gated());
    assert!(!icon(&board, Icon::Error).await);
}

#[tokio::test]
async fn test_store_and_recall_a_slot() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Digit7, KeyId::Store, KeyId::Digit4]).await;
    assert_eq!(line(&board, 0).await, "STO 4_");
    app.press_all(&[KeyId::Digit2]).await;

    let slot = MemorySlot::new(42).unwrap();
    assert_eq!(app.state().bank.memory().get(slot), Some(7.0));

    app.press_all(&[KeyId::Digit1, KeyId::Enter, KeyId::Recall, KeyId::Digit4, KeyId::Digit2])
        .await;
    assert_eq!(app.state().bank.x(), 7.0);
    assert_eq!(app.state().bank.y(), 1.0);
}

#[tokio::test]
async fn test_recall_of_an_empty_slot_is_an_error() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Recall, KeyId::Digit0, KeyId::Digit9]).await;
    assert!(app.modes().is_gated());
    assert_eq!(line(&board, 0).await, "Memory Empty");
}

#[tokio::test]
async fn test_toggle_base_lights_hex() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Digit2, KeyId::Digit5, KeyId::Digit5]).await;
    app.handle(InputEvent::KeyLongPress(KeyId::Point)).await;

    assert!(icon(&board, Icon::Hex).await);
    assert_eq!(app.state().bank.x(), 255.0);
    assert_eq!(line(&board, 1).await, "0xFF");

    app.press_all(&[KeyId::Shift, KeyId::Point]).await;
    assert!(!icon(&board, Icon::Hex).await);
    assert!(!icon(&board, Icon::Shift).await);
}

#[tokio::test]
async fn test_mode_key_moves_the_periodic_work() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Mode]).await;
    assert_eq!(app.mode(), Mode::Clock);
    assert!(kernel.periodic(Periodic::ClockRefresh).is_running());

    app.press_all(&[KeyId::Mode, KeyId::Mode]).await;
    assert_eq!(app.mode(), Mode::Meter);
    assert!(!kernel.periodic(Periodic::ClockRefresh).is_running());
    assert!(kernel.periodic(Periodic::VoltSample).is_running());
    assert!(icon(&board, Icon::Volts).await);

    app.press_all(&[KeyId::Mode]).await;
    assert_eq!(app.mode(), Mode::Ohms);
    assert!(!kernel.periodic(Periodic::VoltSample).is_running());
    assert!(kernel.periodic(Periodic::OhmSample).is_running());
    assert!(!icon(&board, Icon::Volts).await);
    assert!(icon(&board, Icon::Ohms).await);

    // Digits mean nothing outside the calculator.
    app.press_all(&[KeyId::Digit4]).await;
    assert!(app.state().bank.pending_text().is_none());

    app.press_all(&[KeyId::Back]).await;
    assert_eq!(app.mode(), Mode::Calculator);
    assert!(!kernel.periodic(Periodic::OhmSample).is_running());
}

#[tokio::test]
async fn test_music_select_requests_the_track() {
    let kernel = Kernel::new();
    let mut card = MockCard::new();
    card.add_file("NOTES.TXT", vec![0; 4]);
    card.add_file("TUNE.WAV", vec![0; 64]);
    let board = Peripherals::new(MockDisplay::new(), MockAdc::new(), card);
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    for _ in 0..6 {
        app.press_all(&[KeyId::Mode]).await;
    }
    assert_eq!(app.mode(), Mode::MusicList);
    assert_eq!(line(&board, 0).await, "TUNE.WAV");
    assert_eq!(line(&board, 1).await, "64 B");

    app.press_all(&[KeyId::Enter]).await;
    let requested = kernel.play_requests.try_take().unwrap();
    assert_eq!(requested.as_str(), "TUNE.WAV");
}

#[tokio::test]
async fn test_leaving_music_drops_an_unplayed_selection() {
    let kernel = Kernel::new();
    let mut card = MockCard::new();
    card.add_file("TUNE.WAV", vec![0; 64]);
    let board = Peripherals::new(MockDisplay::new(), MockAdc::new(), card);
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    for _ in 0..6 {
        app.press_all(&[KeyId::Mode]).await;
    }
    assert_eq!(app.mode(), Mode::MusicList);

    // No player task is running, so the request stays queued until Back.
    app.press_all(&[KeyId::Enter, KeyId::Back]).await;
    assert_eq!(app.mode(), Mode::Calculator);
    assert!(kernel.play_requests.try_take().is_none());
}

#[tokio::test]
async fn test_sleep_saves_and_boot_restores() {
    let kernel = Kernel::new();
    let board = board();
    let mut app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    app.press_all(&[KeyId::Digit1, KeyId::Digit2, KeyId::Enter, KeyId::Digit3, KeyId::Add])
        .await;
    // Wake key, consumed by the sleep path.
    assert!(kernel.keys.post(InputEvent::KeyPress(KeyId::Digit9)));
    app.sleep().await;

    assert!(app.store().write_count() > 0);
    assert!(kernel.keys.is_empty());
    assert!(app.state().bank.pending_text().is_none());
    assert_eq!(line(&board, 1).await, "15.0000");

    let mut image = MockEeprom::<512>::new();
    image.contents_mut().copy_from_slice(app.store().contents());
    let kernel = Kernel::new();
    let board = self::board();
    let restored = App::boot(&kernel, &board, image).await;
    assert_eq!(restored.state().bank.x(), 15.0);
    assert_eq!(restored.mode(), Mode::Calculator);
    assert_eq!(line(&board, 1).await, "15.0000");
}

#[tokio::test]
async fn test_blank_image_boots_with_defaults() {
    let kernel = Kernel::new();
    let board = board();
    let app = App::boot(&kernel, &board, MockEeprom::<512>::new()).await;

    assert_eq!(app.mode(), Mode::Calculator);
    assert_eq!(app.state().bank.x(), 0.0);
    assert!(app.modes().accepts(KeyId::Digit1));
    assert!(!kernel.periodic(Periodic::ClockRefresh).is_running());
}

#[tokio::test]
async fn test_memory_survives_a_restart_from_an_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eeprom.bin");

    {
        let kernel = Kernel::new();
        let board = board();
        let store = FileEeprom::open(&path, EEPROM_CAPACITY).unwrap();
        let mut app = App::boot(&kernel, &board, store).await;
        app.press_all(&[KeyId::Digit6, KeyId::Store, KeyId::Digit0, KeyId::Digit3])
            .await;
        assert!(kernel.keys.post(InputEvent::KeyPress(KeyId::Enter)));
        app.sleep().await;
    }

    let kernel = Kernel::new();
    let board = board();
    let store = FileEeprom::open(&path, EEPROM_CAPACITY).unwrap();
    let app = App::boot(&kernel, &board, store).await;
    let slot = MemorySlot::new(3).unwrap();
    assert_eq!(app.state().bank.memory().get(slot), Some(6.0));
    assert_eq!(app.state().bank.x(), 6.0);
}
