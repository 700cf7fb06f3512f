//! Volt and ohm meters: sample the ADC, show the value, publish it.

use embassy_time::Duration;
use hostlink::MessageType;
use modes::Periodic;
use platform::config::{
    ADC_REFERENCE_VOLTS, METER_AVERAGE_COUNT, OHM_REFERENCE_RESISTOR, VOLT_DIVIDER_RATIO,
};
use platform::{Adc, AdcChannel, Display};

use crate::app::screen::{self, clip, format_line, right_aligned, Line};
use crate::fmt::warn;
use crate::kernel::{run_periodic, Kernel, PeriodicJob, Peripherals, Reading};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Meter {
    Volts,
    Ohms,
}

impl Meter {
    pub const fn periodic(self) -> Periodic {
        match self {
            Self::Volts => Periodic::VoltSample,
            Self::Ohms => Periodic::OhmSample,
        }
    }

    const fn channel(self) -> AdcChannel {
        match self {
            Self::Volts => AdcChannel::Volts,
            Self::Ohms => AdcChannel::Ohms,
        }
    }

    const fn kind(self) -> MessageType {
        match self {
            Self::Volts => MessageType::Volts,
            Self::Ohms => MessageType::Ohms,
        }
    }

    /// Convert the pin voltage. `None` for an open ohm input.
    pub fn scale(self, pin_volts: f64) -> Option<f64> {
        match self {
            Self::Volts => Some(pin_volts * VOLT_DIVIDER_RATIO),
            Self::Ohms => {
                let across_reference = ADC_REFERENCE_VOLTS - pin_volts;
                (across_reference > 0.0)
                    .then(|| OHM_REFERENCE_RESISTOR * pin_volts / across_reference)
            }
        }
    }

    /// Reading text for the bottom line.
    pub fn text(self, value: Option<f64>) -> Line {
        let line = match (self, value) {
            (Self::Volts, Some(v)) => format_line(format_args!("{:.3} V", v)),
            (Self::Ohms, Some(r)) if r < 1_000.0 => format_line(format_args!("{:.1} Ohm", r)),
            (Self::Ohms, Some(r)) if r < 1_000_000.0 => {
                format_line(format_args!("{:.3} kOhm", r / 1_000.0))
            }
            (Self::Ohms, Some(r)) => format_line(format_args!("{:.3} MOhm", r / 1_000_000.0)),
            (_, None) => clip("OPEN"),
        };
        right_aligned(&line)
    }
}

pub struct MeterJob<'a, D, A, S> {
    meter: Meter,
    kernel: &'a Kernel,
    peripherals: &'a Peripherals<D, A, S>,
}

impl<'a, D, A, S> MeterJob<'a, D, A, S> {
    pub fn new(meter: Meter, kernel: &'a Kernel, peripherals: &'a Peripherals<D, A, S>) -> Self {
        Self {
            meter,
            kernel,
            peripherals,
        }
    }
}

impl<D: Display, A: Adc, S> PeriodicJob for MeterJob<'_, D, A, S> {
    async fn tick(&mut self) {
        let pin = {
            let mut adc = self.peripherals.adc.lock().await;
            adc.read(self.meter.channel(), METER_AVERAGE_COUNT).await
        };
        let Ok(pin) = pin else {
            warn!("{:?} ADC read failed", self.meter);
            screen::show_line(&self.peripherals.display, 1, "ADC error").await;
            return;
        };
        let value = self.meter.scale(pin);
        screen::show_line(&self.peripherals.display, 1, &self.meter.text(value)).await;
        if let Some(value) = value {
            self.kernel.publish(Reading {
                kind: self.meter.kind(),
                value,
            });
        }
    }
}

/// One instance per meter; idle until its mode resumes it.
pub async fn meter_task<D: Display, A: Adc, S>(
    meter: Meter,
    kernel: &Kernel,
    peripherals: &Peripherals<D, A, S>,
) -> ! {
    let periodic = meter.periodic();
    let mut job = MeterJob::new(meter, kernel, peripherals);
    run_periodic(
        kernel.periodic(periodic),
        Duration::from_millis(periodic.period_ms()),
        &mut job,
    )
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use platform::mocks::{MockAdc, MockCard, MockDisplay};

    #[test]
    fn test_volt_divider() {
        assert_eq!(Meter::Volts.scale(1.0), Some(VOLT_DIVIDER_RATIO));
    }

    #[test]
    fn test_ohms_divider_and_open_input() {
        let half = Meter::Ohms.scale(ADC_REFERENCE_VOLTS / 2.0).unwrap();
        assert!((half - OHM_REFERENCE_RESISTOR).abs() < 1e-9);
        assert_eq!(Meter::Ohms.scale(ADC_REFERENCE_VOLTS), None);
        assert_eq!(Meter::Ohms.text(None).trim(), "OPEN");
    }

    #[test]
    fn test_ohm_ranges() {
        assert_eq!(Meter::Ohms.text(Some(470.0)).trim(), "470.0 Ohm");
        assert_eq!(Meter::Ohms.text(Some(4_700.0)).trim(), "4.700 kOhm");
        assert_eq!(Meter::Ohms.text(Some(2_200_000.0)).trim(), "2.200 MOhm");
    }

    #[tokio::test]
    async fn test_tick_shows_and_publishes() {
        let kernel = Kernel::new();
        let mut adc = MockAdc::new();
        adc.set(AdcChannel::Volts, 0.5);
        let peripherals = Peripherals::new(MockDisplay::new(), adc, MockCard::new());
        let mut job = MeterJob::new(Meter::Volts, &kernel, &peripherals);

        job.tick().await;

        assert_eq!(peripherals.display.lock().await.line(1).trim(), "5.500 V");
        let reading = kernel.latest_reading().unwrap();
        assert_eq!(reading.kind, MessageType::Volts);
        assert_eq!(reading.value, 5.5);
        assert_eq!(peripherals.adc.lock().await.read_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_read_publishes_nothing() {
        let kernel = Kernel::new();
        let mut adc = MockAdc::new();
        adc.fail(true);
        let peripherals = Peripherals::new(MockDisplay::new(), adc, MockCard::new());
        MeterJob::new(Meter::Ohms, &kernel, &peripherals).tick().await;

        assert_eq!(peripherals.display.lock().await.line(1).trim(), "ADC error");
        assert!(kernel.latest_reading().is_none());
    }
}
