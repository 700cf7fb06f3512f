//! The dispatch task: owns the calculator state and the mode manager, and
//! turns key events into state changes and screens.
//!
//! Periodic work (meters, clock, music progress) runs in its own tasks; the
//! dispatcher only starts and quiesces it through [`ModeManager`].

pub mod browser;
mod calc;
pub mod hooks;
pub mod screen;
pub mod setup;
mod slot;

use embassy_futures::select::{select, Either};
use embassy_time::Timer;
use embedded_storage::Storage as NonVolatileStore;
use modes::{lookup, Command, Mode, ModeManager, ShiftState, Transition};
use platform::{Display, Icon, InputEvent, KeyId, Storage};
use rpn::{AngleUnit, CalculatorState, NumericBase};

use crate::alarm::AlarmEditor;
use crate::fmt::{debug, info, warn};
use crate::kernel::{Kernel, Peripherals, TrackName};
use crate::notice::Notice;

use browser::{Browser, Filter};
use hooks::KernelHooks;
use setup::SetupEditor;
use slot::SlotEntry;

pub struct App<'a, D, A, S, E> {
    kernel: &'a Kernel,
    peripherals: &'a Peripherals<D, A, S>,
    store: E,
    state: CalculatorState,
    modes: ModeManager,
    shift: ShiftState,
    slot: Option<SlotEntry>,
    setup: SetupEditor,
    alarm: AlarmEditor,
    browser: Browser,
}

impl<'a, D, A, S, E> App<'a, D, A, S, E>
where
    D: Display,
    S: Storage,
    E: NonVolatileStore,
{
    /// Restore persisted state, bring up the saved mode and draw it.
    pub async fn boot(kernel: &'a Kernel, peripherals: &'a Peripherals<D, A, S>, mut store: E) -> Self {
        let (state, load_error) = persist::load_or_default(&mut store);
        let (modes, mode_error) = ModeManager::from_settings(&state.settings);
        let mut app = Self {
            kernel,
            peripherals,
            store,
            state,
            modes,
            shift: ShiftState::Off,
            slot: None,
            setup: SetupEditor::new(),
            alarm: AlarmEditor::open(kernel.alarm()),
            browser: Browser::new(Filter::All),
        };
        kernel.set_verbosity(app.state.settings.verbosity);
        if let Some(e) = load_error {
            warn!("settings unreadable, using defaults: {}", e);
            app.notify(Notice::SettingsReset);
        }
        if let Some(e) = mode_error {
            warn!("restored mode rejected: {}", e);
        }
        info!("boot into {}", app.modes.current().title());

        app.sync_indicators().await;
        let mut hooks = app.hooks();
        app.modes.start(&mut hooks).await;
        app.on_enter().await;
        app
    }

    /// Dispatch keys forever, going to sleep when the current mode's
    /// inactivity timer runs out.
    pub async fn run(mut self) -> ! {
        loop {
            let timeout = self
                .state
                .settings
                .timers
                .get(self.modes.current().timer())
                .seconds();
            let event = match timeout {
                Some(secs) => {
                    match select(self.kernel.keys.receive(), Timer::after_secs(u64::from(secs))).await {
                        Either::First(event) => Some(event),
                        Either::Second(()) => None,
                    }
                }
                None => Some(self.kernel.keys.receive().await),
            };
            match event {
                Some(event) => self.handle(event).await,
                None => {
                    info!("inactivity timeout in {}", self.modes.current().title());
                    self.sleep().await;
                }
            }
        }
    }

    /// Apply one key event.
    pub async fn handle(&mut self, event: InputEvent) {
        let (key, long) = match event {
            InputEvent::KeyPress(key) => (key, false),
            InputEvent::KeyLongPress(key) => (key, true),
        };
        if !self.modes.accepts(key) {
            debug!("{} masked in {}", key.legend(), self.modes.current().title());
            return;
        }
        if self.modes.is_gated() {
            self.acknowledge().await;
            return;
        }

        let shift = if long { ShiftState::On } else { self.shift };
        let Some(command) = lookup(key, shift, self.modes.current()) else {
            debug!("{} unbound in {}", key.legend(), self.modes.current().title());
            return;
        };
        if command != Command::Shift && self.shift == ShiftState::On {
            self.set_shift(ShiftState::Off).await;
        }
        self.execute(command).await;
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Shift => {
                let next = match self.shift {
                    ShiftState::Off => ShiftState::On,
                    ShiftState::On => ShiftState::Off,
                };
                self.set_shift(next).await;
            }
            Command::NextMode => self.switch_mode(self.modes.current().next()).await,
            Command::Setup => self.switch_mode(Mode::Setup).await,
            Command::Sleep => self.sleep().await,
            Command::Cancel => self.leave_mode().await,
            Command::Up | Command::Down | Command::Select | Command::ToggleArmed => {
                self.navigate(command).await;
            }
            other => self.calculate(other).await,
        }
    }

    /// Power down: stop periodic work, save, blank the LCD, then wait for any
    /// key (which is consumed) and restore the mode.
    pub async fn sleep(&mut self) {
        info!("sleep");
        let mut hooks = self.hooks();
        self.modes.suspend(&mut hooks).await;
        if self.kernel.is_player_busy() {
            self.kernel.stop_playback().await;
        }
        self.slot = None;
        self.shift = ShiftState::Off;
        self.save();
        screen::blank(&self.peripherals.display).await;

        let _wake = self.kernel.keys.receive().await;
        info!("wake");
        self.sync_indicators().await;
        self.modes.start(&mut hooks).await;
        self.redraw().await;
    }

    // ── Modes ───────────────────────────────────────────────────────────

    fn hooks(&self) -> KernelHooks<'a, D> {
        KernelHooks::new(self.kernel, &self.peripherals.display)
    }

    async fn switch_mode(&mut self, target: Mode) {
        let mut hooks = self.hooks();
        match self.modes.enter(&mut hooks, target).await {
            Ok(Transition::Unchanged) => {}
            Ok(Transition::Changed { from }) => {
                self.on_leave(from);
                self.on_enter().await;
            }
            Err(e) => warn!("mode change refused: {}", e),
        }
    }

    /// Cancel: back to the calculator.
    async fn leave_mode(&mut self) {
        let from = self.modes.current();
        if from == Mode::Calculator {
            return;
        }
        let mut hooks = self.hooks();
        match self.modes.exit(&mut hooks, None).await {
            Ok(_) => {
                self.on_leave(from);
                self.on_enter().await;
            }
            Err(e) => warn!("mode exit refused: {}", e),
        }
    }

    fn on_leave(&mut self, from: Mode) {
        match from {
            Mode::Setup => self.save(),
            Mode::Calculator => self.slot = None,
            _ => {}
        }
    }

    async fn on_enter(&mut self) {
        let mode = self.modes.current();
        match mode {
            Mode::Setup => self.setup.rewind(),
            Mode::Alarm => self.alarm = AlarmEditor::open(self.kernel.alarm()),
            Mode::FileList => self.open_browser(Filter::All).await,
            Mode::MusicList => self.open_browser(Filter::Wav).await,
            _ => {}
        }
        self.notify(Notice::ModeTitle(mode));
        self.redraw().await;
    }

    async fn open_browser(&mut self, filter: Filter) {
        let result = {
            let mut card = self.peripherals.card.lock().await;
            self.browser.first(filter, &mut *card).await
        };
        if result.is_err() {
            warn!("card listing failed");
            self.notify(Notice::CardError);
        }
    }

    /// Draw the current mode's screen from scratch.
    async fn redraw(&mut self) {
        let peripherals = self.peripherals;
        let display = &peripherals.display;
        match self.modes.current() {
            Mode::Calculator => self.draw_calculator().await,
            Mode::Setup => {
                let (label, value) = self.setup.lines(&self.state.settings);
                screen::show(display, label, &value).await;
            }
            Mode::Alarm => {
                let (top, bottom) = self.alarm.lines();
                screen::show(display, top, &bottom).await;
            }
            Mode::FileList | Mode::MusicList => {
                let (top, bottom) = self.browser.lines();
                screen::show(display, &top, &bottom).await;
            }
            mode @ (Mode::Clock | Mode::Meter | Mode::Ohms) => {
                screen::show(display, mode.title(), "").await;
            }
        }
    }

    // ── List and editor keys ────────────────────────────────────────────

    async fn navigate(&mut self, command: Command) {
        match self.modes.current() {
            Mode::Setup => self.navigate_setup(command).await,
            Mode::Alarm => {
                match command {
                    Command::Up => self.alarm.up(),
                    Command::Down => self.alarm.down(),
                    Command::Select => self.alarm.next_field(),
                    Command::ToggleArmed => self.alarm.toggle_armed(),
                    _ => return,
                }
                self.kernel.set_alarm(self.alarm.alarm());
                self.redraw().await;
            }
            Mode::FileList | Mode::MusicList => self.navigate_list(command).await,
            Mode::Meter | Mode::Ohms if command == Command::Select => {
                self.push_reading().await;
            }
            mode => debug!("{:?} ignored in {}", command, mode.title()),
        }
    }

    async fn navigate_setup(&mut self, command: Command) {
        match command {
            Command::Up | Command::Down => {
                let settings = &mut self.state.settings;
                if self.setup.adjust(settings, command == Command::Up) {
                    self.state.bank.invalidate_text();
                }
                self.kernel.set_verbosity(settings.verbosity);
                self.sync_indicators().await;
            }
            Command::Select => self.setup.next_field(),
            _ => return,
        }
        self.redraw().await;
    }

    async fn navigate_list(&mut self, command: Command) {
        let result = {
            let mut card = self.peripherals.card.lock().await;
            match command {
                Command::Up => self.browser.prev(&mut *card).await,
                Command::Down => self.browser.next(&mut *card).await,
                _ => Ok(()),
            }
        };
        if result.is_err() {
            warn!("card listing failed");
            self.notify(Notice::CardError);
        }
        if command == Command::Select && self.modes.current() == Mode::MusicList {
            self.play_selected().await;
        }
        self.redraw().await;
    }

    async fn play_selected(&mut self) {
        let Some(entry) = self.browser.selected().filter(|e| e.is_wav()) else {
            return;
        };
        let mut name = TrackName::new();
        if name.push_str(&entry.name).is_err() {
            self.notify(Notice::TrackFailed);
            return;
        }
        if self.kernel.is_player_busy() {
            self.kernel.stop_playback().await;
        }
        info!("play {}", name.as_str());
        self.kernel.play_requests.signal(name);
    }

    // ── Shared helpers ──────────────────────────────────────────────────

    async fn set_shift(&mut self, shift: ShiftState) {
        self.shift = shift;
        screen::set_icon(&self.peripherals.display, Icon::Shift, shift == ShiftState::On).await;
    }

    /// Base and angle annunciators follow the settings.
    async fn sync_indicators(&self) {
        let settings = &self.state.settings;
        let display = &self.peripherals.display;
        screen::set_icon(display, Icon::Hex, settings.base == NumericBase::Hex).await;
        screen::set_icon(display, Icon::Radians, settings.angle == AngleUnit::Radians).await;
    }

    async fn acknowledge(&mut self) {
        if self.modes.acknowledge() {
            debug!("error acknowledged");
            screen::set_icon(&self.peripherals.display, Icon::Error, false).await;
            self.redraw().await;
        }
    }

    fn notify(&self, notice: Notice) {
        self.kernel.notify(notice);
    }

    /// Write the state blob. Truncated memory is only logged.
    fn save(&mut self) {
        self.modes.store_into(&mut self.state.settings);
        match persist::save(&self.state, &mut self.store) {
            Ok(encoded) => {
                if encoded.dropped > 0 {
                    debug!("{} memory slots did not fit", encoded.dropped);
                }
                debug!("saved {} bytes", encoded.len);
            }
            Err(e) => {
                warn!("settings save failed: {}", e);
                self.notify(Notice::SaveFailed);
            }
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn modes(&self) -> &ModeManager {
        &self.modes
    }

    pub fn shift(&self) -> ShiftState {
        self.shift
    }

    pub fn store(&self) -> &E {
        &self.store
    }

    /// Press `keys` in order, as the keypad task would deliver them.
    pub async fn press_all(&mut self, keys: &[KeyId]) {
        for &key in keys {
            self.handle(InputEvent::KeyPress(key)).await;
        }
    }
}
