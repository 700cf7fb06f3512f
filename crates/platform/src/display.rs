//! Character LCD abstraction

/// Display driver trait for the two-line character LCD.
///
/// The display bus is shared between the key-dispatch task and the mode
/// periodic tasks; callers serialise access through a mutex and hold it for
/// one logical update only.
pub trait Display {
    /// Error type for display operations
    type Error: core::fmt::Debug;

    /// Blank both text lines (icons are left untouched)
    fn clear(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Write `text` starting at `line`/`col`, clipped at the right edge
    fn write_text(
        &mut self,
        line: u8,
        col: u8,
        text: &str,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Select the cursor style
    fn set_cursor(
        &mut self,
        mode: CursorMode,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Switch a status icon on or off
    fn set_icon(
        &mut self,
        icon: Icon,
        on: bool,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Cursor styles supported by the LCD controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CursorMode {
    /// No cursor
    Hidden,
    /// Static underline at the entry position
    Underline,
    /// Blinking block at the entry position
    Blink,
}

/// Status icons in the LCD annunciator row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Icon {
    /// Shift key latched
    Shift = 0,
    /// Hexadecimal base active
    Hex,
    /// Radians angle unit active
    Radians,
    /// Clock mode
    Clock,
    /// Alarm mode / alarm armed
    Alarm,
    /// Volt meter mode
    Volts,
    /// Ohm meter mode
    Ohms,
    /// SD card browser
    Card,
    /// Music playback
    Note,
    /// Setup mode
    Setup,
    /// Error waiting for acknowledgment
    Error,
}

impl Icon {
    /// Number of icons in the annunciator row.
    pub const COUNT: usize = 11;

    /// Every icon, in annunciator order.
    pub const ALL: [Icon; Self::COUNT] = [
        Icon::Shift,
        Icon::Hex,
        Icon::Radians,
        Icon::Clock,
        Icon::Alarm,
        Icon::Volts,
        Icon::Ohms,
        Icon::Card,
        Icon::Note,
        Icon::Setup,
        Icon::Error,
    ];

    /// Short label used by text-mode displays (simulator, logs).
    pub const fn label(self) -> &'static str {
        match self {
            Icon::Shift => "SHIFT",
            Icon::Hex => "HEX",
            Icon::Radians => "RAD",
            Icon::Clock => "CLK",
            Icon::Alarm => "ALM",
            Icon::Volts => "V",
            Icon::Ohms => "OHM",
            Icon::Card => "SD",
            Icon::Note => "PLAY",
            Icon::Setup => "SET",
            Icon::Error => "ERR",
        }
    }
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error
    #[error("Display communication error")]
    Communication,
    /// Display busy
    #[error("Display is busy")]
    Busy,
    /// Line or column outside the LCD geometry
    #[error("Display position out of bounds")]
    OutOfBounds,
}
