//! The weekly timetable and its display labels.

use alloc::format;
use alloc::string::String;
use defmt::Format;

/// Lesson periods per day, periods 0..=5.
pub const PERIODS: usize = 6;
/// School days per week, Monday..=Friday.
pub const SCHOOL_DAYS: usize = 5;
/// Wall-clock hour of period 0.
pub const FIRST_PERIOD_HOUR: u8 = 8;

/// Which class a timetable slot belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Format)]
#[repr(u8)]
pub enum ClassCode {
    NoLesson = 0,
    Class3D = 1,
    Class3G = 2,
    Class4D = 3,
}

impl ClassCode {
    /// Two-character display name.
    pub const fn name(self) -> &'static str {
        match self {
            ClassCode::NoLesson => "NL",
            ClassCode::Class3D => "3D",
            ClassCode::Class3G => "3G",
            ClassCode::Class4D => "4D",
        }
    }
}

use ClassCode::{Class3D as D3, Class3G as G3, Class4D as D4, NoLesson as NL};

/// Period-major timetable: `TIMETABLE[period][weekday]`.
pub const TIMETABLE: [[ClassCode; SCHOOL_DAYS]; PERIODS] = [
    [D4, G3, NL, NL, NL],
    [D4, G3, NL, NL, NL],
    [G3, NL, D3, D3, NL],
    [NL, D4, D3, D3, G3],
    [NL, D3, NL, G3, D4],
    [NL, D3, D4, G3, D4],
];

/// Lesson period for a wall-clock hour, if one is in session.
pub const fn period_for(hour: u8) -> Option<u8> {
    if hour >= FIRST_PERIOD_HOUR && hour < FIRST_PERIOD_HOUR + PERIODS as u8 {
        Some(hour - FIRST_PERIOD_HOUR)
    } else {
        None
    }
}

/// Bounds-checked timetable lookup. `weekday` counts from 0 = Monday;
/// weekends fall outside the table and return `None`.
pub fn class_at(period: u8, weekday: u8) -> Option<ClassCode> {
    TIMETABLE
        .get(period as usize)?
        .get(weekday as usize)
        .copied()
}

/// Display label: class name twice, two-digit period suffix.
pub fn format_label(class: ClassCode, period: u8) -> String {
    let name = class.name();
    format!("{name}  {name}{period:02}")
}
