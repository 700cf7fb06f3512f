//! Mode-change side effects, wired to the kernel.

use modes::{Mode, ModeContext};
use platform::{Display, Icon};

use super::screen;
use crate::fmt::debug;
use crate::kernel::{Kernel, Shared};

pub struct KernelHooks<'a, D> {
    kernel: &'a Kernel,
    display: &'a Shared<D>,
}

impl<'a, D> KernelHooks<'a, D> {
    pub fn new(kernel: &'a Kernel, display: &'a Shared<D>) -> Self {
        Self { kernel, display }
    }
}

impl<D: Display> ModeContext for KernelHooks<'_, D> {
    async fn quiesce(&mut self, mode: Mode) {
        if mode == Mode::MusicList {
            // A selection the player has not picked up yet dies with the list.
            self.kernel.play_requests.reset();
            if self.kernel.is_player_busy() {
                self.kernel.stop_playback().await;
            }
        }
        if let Some(periodic) = mode.periodic() {
            self.kernel.periodic(periodic).quiesce().await;
            debug!("{} quiesced", mode.title());
        }
    }

    async fn resume(&mut self, mode: Mode) {
        if let Some(periodic) = mode.periodic() {
            self.kernel.periodic(periodic).resume();
        }
    }

    async fn decorate(&mut self, icon: Icon, on: bool) {
        screen::set_icon(self.display, icon, on).await;
    }
}
