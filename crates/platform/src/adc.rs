//! Analog-to-digital converter abstraction (volt/ohm meter front end)

/// The single shared ADC.
///
/// Only one conversion sequence may run at a time; the firmware wraps the
/// driver in a mutex held for exactly one `read` call.
pub trait Adc {
    /// Error type
    type Error: core::fmt::Debug;

    /// Average `avg_count` conversions on `channel` and return the pin voltage.
    fn read(
        &mut self,
        channel: AdcChannel,
        avg_count: u8,
    ) -> impl core::future::Future<Output = Result<f64, Self::Error>>;
}

/// Meter input channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// Voltage probe, behind the input divider
    Volts,
    /// Unknown resistor in series with the reference resistor
    Ohms,
    /// Battery monitor
    Battery,
}
