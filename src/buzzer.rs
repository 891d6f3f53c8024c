//! Piezo buzzer manager
//!
//! Bit-bangs a square wave on a GPIO pin. The face treats enable/disable as
//! powering the peripheral; playing while disabled is a no-op.

use esp_hal::delay::Delay;
use esp_hal::gpio::Output;

/// Chime pitch.
const CHIME_FREQ_HZ: u32 = 2048;

/// Piezo buzzer on a plain GPIO pin.
pub struct Buzzer<'d> {
    pin: Output<'d>,
    delay: Delay,
    enabled: bool,
}

impl<'d> Buzzer<'d> {
    pub fn new(mut pin: Output<'d>, delay: Delay) -> Self {
        pin.set_low();
        Self {
            pin,
            delay,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.pin.set_low();
    }

    /// Two short beeps. Blocks for roughly 275 ms.
    pub fn play_signal(&mut self) {
        if !self.enabled {
            return;
        }
        self.beep(CHIME_FREQ_HZ, 100);
        self.delay.delay_millis(75);
        self.beep(CHIME_FREQ_HZ, 100);
    }

    /// Square wave at `freq_hz` for `duration_ms`.
    fn beep(&mut self, freq_hz: u32, duration_ms: u32) {
        let half_period_us = 500_000 / freq_hz;
        let cycles = duration_ms * freq_hz / 1000;
        for _ in 0..cycles {
            self.pin.set_high();
            self.delay.delay_micros(half_period_us);
            self.pin.set_low();
            self.delay.delay_micros(half_period_us);
        }
    }
}
