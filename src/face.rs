//! The timetable face and the host contract that drives it.

use defmt::Format;

use crate::datetime::{DateTime, MINUTES_SHIFT, SECONDS_SHIFT};
use crate::schedule::{self, ClassCode};

/// Events the host pump delivers to a face.
#[derive(Clone, Copy, PartialEq, Eq, Format)]
pub enum Event {
    /// The face just came to the foreground.
    Activate,
    /// One second elapsed.
    Tick,
    /// Low-energy refresh; the face must redraw everything.
    LowEnergyUpdate,
    /// Mode button released.
    ModeButtonUp,
    /// Light button pressed.
    LightButtonDown,
    /// Alarm button held for a long press.
    AlarmLongPress,
    /// Background wake-up the face asked for.
    BackgroundTask,
}

/// Services the host provides to a face.
pub trait Host {
    fn date_time(&self) -> DateTime;
    fn display_label(&mut self, label: &str);
    fn tick_indicator_running(&self) -> bool;
    fn stop_tick_indicator(&mut self);
    fn illuminate_led(&mut self);
    fn buzzer_enabled(&self) -> bool;
    fn enable_buzzer(&mut self);
    fn disable_buzzer(&mut self);
    /// Play the chime. Blocks for roughly 275 ms.
    fn play_signal(&mut self);
    fn move_to_next_face(&mut self);
}

// Sentinel: no field of a real packed date-time can match.
const NEVER_RENDERED: u32 = u32::MAX;

/// The timetable face. Shows the class scheduled for the current weekday
/// and lesson period, and optionally chimes at the top of each hour.
pub struct TimetableFace {
    signal_enabled: bool,
    face_index: u8,
    previous_date_time: u32,
}

impl TimetableFace {
    pub fn new(face_index: u8) -> Self {
        Self {
            signal_enabled: false,
            face_index,
            previous_date_time: NEVER_RENDERED,
        }
    }

    /// This face's slot in the host's face list.
    pub fn face_index(&self) -> u8 {
        self.face_index
    }

    pub fn signal_enabled(&self) -> bool {
        self.signal_enabled
    }

    /// Called when the face comes to the foreground.
    pub fn activate(&mut self, host: &mut impl Host) {
        if host.tick_indicator_running() {
            host.stop_tick_indicator();
        }
        // Ensures the next render rewrites every field.
        self.previous_date_time = NEVER_RENDERED;
    }

    /// Handle one event. Returns false when the host should stop
    /// propagating it.
    pub fn on_event(&mut self, event: Event, host: &mut impl Host) -> bool {
        match event {
            Event::Activate | Event::Tick | Event::LowEnergyUpdate => {
                self.render(event, host);
            }
            Event::ModeButtonUp => {
                host.move_to_next_face();
                return false;
            }
            Event::LightButtonDown => host.illuminate_led(),
            Event::AlarmLongPress => {
                self.signal_enabled = !self.signal_enabled;
                defmt::info!(
                    "hourly chime {}",
                    if self.signal_enabled { "on" } else { "off" }
                );
            }
            Event::BackgroundTask => self.chime(host),
        }
        true
    }

    /// Called when the face leaves the foreground. No teardown needed.
    pub fn resign(&mut self, _host: &mut impl Host) {}

    /// True when the host should wake this face at the top of the hour.
    pub fn wants_background_task(&self, host: &impl Host) -> bool {
        self.signal_enabled && host.date_time().minute == 0
    }

    fn render(&mut self, event: Event, host: &mut impl Host) {
        let date_time = host.date_time();
        let packed = date_time.packed();
        let previous = self.previous_date_time;
        self.previous_date_time = packed;

        // The label only shows hour-level data; skip the redraw when nothing
        // above the seconds (then minutes) field moved. A low-energy update
        // always redraws.
        if event != Event::LowEnergyUpdate {
            if packed >> SECONDS_SHIFT == previous >> SECONDS_SHIFT {
                return;
            }
            if packed >> MINUTES_SHIFT == previous >> MINUTES_SHIFT {
                return;
            }
        }

        let weekday = date_time.iso8601_weekday() - 1;
        let (class, period) = match schedule::period_for(date_time.hour) {
            Some(period) => (
                schedule::class_at(period, weekday).unwrap_or(ClassCode::NoLesson),
                period,
            ),
            // Outside lesson hours (and on weekends) there is nothing to
            // look up; show the no-lesson label.
            None => (ClassCode::NoLesson, 0),
        };
        let label = schedule::format_label(class, period);
        host.display_label(&label);
    }

    fn chime(&mut self, host: &mut impl Host) {
        if host.buzzer_enabled() {
            // Face is in the foreground, the peripheral is already powered.
            host.play_signal();
        } else {
            host.enable_buzzer();
            host.play_signal();
            host.disable_buzzer();
        }
    }
}
