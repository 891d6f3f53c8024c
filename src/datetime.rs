//! Calendar time with RTC-register-style packing
//!
//! The packed form puts the fastest-moving field in the lowest bits, so a
//! right shift answers "did anything at or above this field change" in one
//! compare.

use defmt::Format;

/// Year that packs to zero.
pub const REFERENCE_YEAR: u16 = 2020;

/// Right shift that drops the seconds field from a packed value.
pub const SECONDS_SHIFT: u32 = 6;
/// Right shift that drops the seconds and minutes fields.
pub const MINUTES_SHIFT: u32 = 12;

/// A Gregorian calendar date and wall-clock time.
#[derive(Clone, Copy, PartialEq, Eq, Format)]
pub struct DateTime {
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
}

impl DateTime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Pack into one register-style word:
    /// second(6) | minute(6) | hour(5) | day(5) | month(4) | year-2020(6).
    pub fn packed(&self) -> u32 {
        (self.second as u32)
            | (self.minute as u32) << 6
            | (self.hour as u32) << 12
            | (self.day as u32) << 17
            | (self.month as u32) << 22
            | ((self.year - REFERENCE_YEAR) as u32) << 26
    }

    /// ISO 8601 weekday number, 1 = Monday .. 7 = Sunday.
    pub fn iso8601_weekday(&self) -> u8 {
        iso8601_weekday(self.year, self.month, self.day)
    }

    /// Advance one second, rolling over through the calendar.
    pub fn tick(&mut self) {
        self.second += 1;
        if self.second < 60 {
            return;
        }
        self.second = 0;
        self.minute += 1;
        if self.minute < 60 {
            return;
        }
        self.minute = 0;
        self.hour += 1;
        if self.hour < 24 {
            return;
        }
        self.hour = 0;
        self.day += 1;
        if self.day <= days_in_month(self.year, self.month) {
            return;
        }
        self.day = 1;
        self.month += 1;
        if self.month <= 12 {
            return;
        }
        self.month = 1;
        self.year += 1;
    }
}

fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// ISO 8601 weekday for a Gregorian date, 1 = Monday .. 7 = Sunday.
pub fn iso8601_weekday(year: u16, month: u8, day: u8) -> u8 {
    // Zeller's congruence; January and February count as months 13 and 14
    // of the previous year.
    let (y, m) = if month < 3 {
        (year - 1, month as u32 + 12)
    } else {
        (year, month as u32)
    };
    let k = (y % 100) as u32;
    let j = (y / 100) as u32;
    let h = (day as u32 + (13 * (m + 1)) / 5 + k + k / 4 + j / 4 + 5 * j) % 7;
    // h counts from Saturday = 0; rotate so Monday = 1.
    ((h + 5) % 7 + 1) as u8
}
