//! Timetable face test suite using embedded-test
//!
//! You can run this using `cargo test` as usual.

#![no_std]
#![no_main]

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

#[cfg(test)]
#[embedded_test::tests]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use defmt::{assert, assert_eq};
    use timetable::datetime::{DateTime, iso8601_weekday};
    use timetable::face::{Event, Host, TimetableFace};
    use timetable::schedule::{self, ClassCode};
    use timetable::segment_display::Segments;

    /// Records every host call the face makes.
    struct MockHost {
        now: DateTime,
        labels: Vec<String>,
        tick_indicator: bool,
        led_requests: u32,
        buzzer_enabled: bool,
        buzzer_power_ons: u32,
        signals_played: u32,
        face_advances: u32,
    }

    impl MockHost {
        fn at(now: DateTime) -> Self {
            Self {
                now,
                labels: Vec::new(),
                tick_indicator: true,
                led_requests: 0,
                buzzer_enabled: false,
                buzzer_power_ons: 0,
                signals_played: 0,
                face_advances: 0,
            }
        }
    }

    impl Host for MockHost {
        fn date_time(&self) -> DateTime {
            self.now
        }

        fn display_label(&mut self, label: &str) {
            self.labels.push(String::from(label));
        }

        fn tick_indicator_running(&self) -> bool {
            self.tick_indicator
        }

        fn stop_tick_indicator(&mut self) {
            self.tick_indicator = false;
        }

        fn illuminate_led(&mut self) {
            self.led_requests += 1;
        }

        fn buzzer_enabled(&self) -> bool {
            self.buzzer_enabled
        }

        fn enable_buzzer(&mut self) {
            self.buzzer_enabled = true;
            self.buzzer_power_ons += 1;
        }

        fn disable_buzzer(&mut self) {
            self.buzzer_enabled = false;
        }

        fn play_signal(&mut self) {
            self.signals_played += 1;
        }

        fn move_to_next_face(&mut self) {
            self.face_advances += 1;
        }
    }

    // 2026-08-31 is a Monday.
    fn monday_at(hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime::new(2026, 8, 31, hour, minute, second)
    }

    #[init]
    fn init() {
        let _ = esp_hal::init(esp_hal::Config::default());

        rtt_target::rtt_init_defmt!();

        esp_alloc::heap_allocator!(size: 64 * 1024);
    }

    #[test]
    fn timetable_lookup_matches_table() {
        assert!(schedule::class_at(0, 0) == Some(ClassCode::Class4D));
        assert!(schedule::class_at(0, 1) == Some(ClassCode::Class3G));
        assert!(schedule::class_at(0, 2) == Some(ClassCode::NoLesson));
        assert!(schedule::class_at(2, 2) == Some(ClassCode::Class3D));
        assert!(schedule::class_at(3, 4) == Some(ClassCode::Class3G));
        assert!(schedule::class_at(5, 4) == Some(ClassCode::Class4D));

        // Out-of-range periods and weekends are not in the table.
        assert!(schedule::class_at(6, 0).is_none());
        assert!(schedule::class_at(0, 5).is_none());
        assert!(schedule::class_at(0, 6).is_none());
    }

    #[test]
    fn period_maps_school_hours_only() {
        assert!(schedule::period_for(7).is_none());
        assert_eq!(schedule::period_for(8), Some(0));
        assert_eq!(schedule::period_for(13), Some(5));
        assert!(schedule::period_for(14).is_none());
        assert!(schedule::period_for(0).is_none());
        assert!(schedule::period_for(23).is_none());
    }

    #[test]
    fn label_has_name_twice_and_two_digit_suffix() {
        let label = schedule::format_label(ClassCode::Class3G, 3);
        assert_eq!(label.as_str(), "3G  3G03");

        let label = schedule::format_label(ClassCode::NoLesson, 0);
        assert_eq!(label.as_str(), "NL  NL00");

        for period in 0..6u8 {
            let label = schedule::format_label(ClassCode::Class4D, period);
            assert_eq!(label.len(), 8);
            assert_eq!(label.matches("4D").count(), 2);
        }
    }

    #[test]
    fn weekday_matches_iso8601() {
        assert_eq!(iso8601_weekday(2026, 8, 31), 1); // Monday
        assert_eq!(iso8601_weekday(2026, 8, 29), 6); // Saturday
        assert_eq!(iso8601_weekday(2022, 1, 1), 6); // Saturday
        assert_eq!(iso8601_weekday(2000, 2, 29), 2); // Tuesday
        assert_eq!(iso8601_weekday(2026, 9, 6), 7); // Sunday
    }

    #[test]
    fn renders_current_class_on_tick() {
        // Monday 10:xx is period 2, class 3G.
        let mut host = MockHost::at(monday_at(10, 15, 0));
        let mut face = TimetableFace::new(0);

        face.activate(&mut host);
        assert!(face.on_event(Event::Tick, &mut host));

        assert_eq!(host.labels.len(), 1);
        assert_eq!(host.labels[0].as_str(), "3G  3G02");
    }

    #[test]
    fn skips_redraw_until_the_hour_changes() {
        let mut host = MockHost::at(monday_at(9, 0, 0));
        let mut face = TimetableFace::new(0);

        face.activate(&mut host);
        face.on_event(Event::Tick, &mut host);
        assert_eq!(host.labels.len(), 1);

        // Same second, next second, next minute: nothing the label shows
        // changed, so no redraw.
        face.on_event(Event::Tick, &mut host);
        host.now.tick();
        face.on_event(Event::Tick, &mut host);
        host.now = monday_at(9, 1, 0);
        face.on_event(Event::Tick, &mut host);
        assert_eq!(host.labels.len(), 1);

        // Next hour redraws.
        host.now = monday_at(10, 0, 0);
        face.on_event(Event::Tick, &mut host);
        assert_eq!(host.labels.len(), 2);
    }

    #[test]
    fn activation_forces_full_redraw() {
        let mut host = MockHost::at(monday_at(9, 30, 0));
        let mut face = TimetableFace::new(0);

        face.activate(&mut host);
        face.on_event(Event::Activate, &mut host);
        assert_eq!(host.labels.len(), 1);

        // Re-activating resets the render cache even though time is
        // unchanged.
        face.resign(&mut host);
        face.activate(&mut host);
        face.on_event(Event::Activate, &mut host);
        assert_eq!(host.labels.len(), 2);
    }

    #[test]
    fn activation_stops_tick_indicator() {
        let mut host = MockHost::at(monday_at(9, 0, 0));
        let mut face = TimetableFace::new(0);

        assert!(host.tick_indicator);
        face.activate(&mut host);
        assert!(!host.tick_indicator);
    }

    #[test]
    fn low_energy_update_always_redraws() {
        let mut host = MockHost::at(monday_at(11, 5, 0));
        let mut face = TimetableFace::new(0);

        face.activate(&mut host);
        face.on_event(Event::Tick, &mut host);
        face.on_event(Event::LowEnergyUpdate, &mut host);
        assert_eq!(host.labels.len(), 2);
    }

    #[test]
    fn out_of_range_hours_show_no_lesson() {
        // 07:xx on a school day: before the first period.
        let mut host = MockHost::at(monday_at(7, 0, 0));
        let mut face = TimetableFace::new(0);
        face.activate(&mut host);
        face.on_event(Event::Tick, &mut host);
        assert_eq!(host.labels[0].as_str(), "NL  NL00");

        // Saturday during school hours: weekday out of table range.
        let mut host = MockHost::at(DateTime::new(2026, 8, 29, 10, 0, 0));
        let mut face = TimetableFace::new(0);
        face.activate(&mut host);
        face.on_event(Event::Tick, &mut host);
        assert_eq!(host.labels[0].as_str(), "NL  NL02");
    }

    #[test]
    fn mode_button_advances_face_and_stops_propagation() {
        let mut host = MockHost::at(monday_at(9, 0, 0));
        let mut face = TimetableFace::new(0);

        assert!(!face.on_event(Event::ModeButtonUp, &mut host));
        assert_eq!(host.face_advances, 1);
    }

    #[test]
    fn light_button_requests_illumination() {
        let mut host = MockHost::at(monday_at(9, 0, 0));
        let mut face = TimetableFace::new(0);

        assert!(face.on_event(Event::LightButtonDown, &mut host));
        assert_eq!(host.led_requests, 1);
    }

    #[test]
    fn background_task_wanted_iff_signal_on_and_minute_zero() {
        let mut host = MockHost::at(monday_at(9, 0, 0));
        let mut face = TimetableFace::new(0);

        // Chime off by default.
        assert!(!face.wants_background_task(&host));

        face.on_event(Event::AlarmLongPress, &mut host);
        assert!(face.signal_enabled());
        assert!(face.wants_background_task(&host));

        host.now = monday_at(9, 5, 0);
        assert!(!face.wants_background_task(&host));

        // Toggling again turns the chime back off.
        face.on_event(Event::AlarmLongPress, &mut host);
        host.now = monday_at(9, 0, 0);
        assert!(!face.wants_background_task(&host));
    }

    #[test]
    fn chime_powers_buzzer_only_in_background() {
        let mut face = TimetableFace::new(0);

        // Background: the buzzer is off and must be powered around the beep.
        let mut host = MockHost::at(monday_at(9, 0, 0));
        face.on_event(Event::BackgroundTask, &mut host);
        assert_eq!(host.signals_played, 1);
        assert_eq!(host.buzzer_power_ons, 1);
        assert!(!host.buzzer_enabled);

        // Foreground: already powered, just beep.
        let mut host = MockHost::at(monday_at(9, 0, 0));
        host.buzzer_enabled = true;
        face.on_event(Event::BackgroundTask, &mut host);
        assert_eq!(host.signals_played, 1);
        assert_eq!(host.buzzer_power_ons, 0);
        assert!(host.buzzer_enabled);
    }

    #[test]
    fn datetime_tick_rolls_over_calendar() {
        let mut t = DateTime::new(2026, 12, 31, 23, 59, 59);
        t.tick();
        assert!(t == DateTime::new(2027, 1, 1, 0, 0, 0));

        let mut t = DateTime::new(2028, 2, 28, 23, 59, 59);
        t.tick();
        assert!(t == DateTime::new(2028, 2, 29, 0, 0, 0));

        let mut t = DateTime::new(2027, 2, 28, 23, 59, 59);
        t.tick();
        assert!(t == DateTime::new(2027, 3, 1, 0, 0, 0));
    }

    #[test]
    fn packed_is_monotonic_across_a_tick() {
        let mut t = DateTime::new(2026, 8, 31, 9, 59, 59);
        let before = t.packed();
        t.tick();
        assert!(t.packed() > before);

        // Shift thresholds: a second change vanishes above SECONDS_SHIFT,
        // a minute change above MINUTES_SHIFT.
        let a = DateTime::new(2026, 8, 31, 9, 10, 11).packed();
        let b = DateTime::new(2026, 8, 31, 9, 10, 12).packed();
        let c = DateTime::new(2026, 8, 31, 9, 11, 11).packed();
        assert_eq!(a >> timetable::datetime::SECONDS_SHIFT, b >> timetable::datetime::SECONDS_SHIFT);
        assert_eq!(a >> timetable::datetime::MINUTES_SHIFT, c >> timetable::datetime::MINUTES_SHIFT);
        assert!(a >> timetable::datetime::SECONDS_SHIFT != c >> timetable::datetime::SECONDS_SHIFT);
    }

    #[test]
    fn every_label_char_has_a_glyph() {
        for c in "0123456789 NLDG34".chars() {
            assert!(Segments::from_char(c).is_some());
        }
        assert!(Segments::from_char('?').is_none());
    }
}
