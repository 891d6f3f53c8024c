//! Timetable watch face firmware library
//!
//! A segment-display watch face: looks up a fixed weekly class timetable by
//! the current weekday and hour, renders the class label, and can sound an
//! hourly chime. The board side (clock, display, buttons, buzzer) drives the
//! face through the [`face::Host`] contract.

#![no_std]

extern crate alloc;

pub mod buzzer;
pub mod datetime;
pub mod face;
pub mod schedule;
pub mod segment_display;

pub use datetime::DateTime;
pub use face::{Event, Host, TimetableFace};
pub use schedule::ClassCode;
pub use segment_display::{SegmentConfig, SegmentDisplay, Segments};
