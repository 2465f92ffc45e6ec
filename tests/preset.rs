mod tests {
    use myrtio_pulse_composer::{
        CIE_MAX, Duration, Instant, PatternId, PatternSlot, PulseDriver, Scheduler,
        VirtualClock,
        preset::{
            AUTONOMOUS_BADGE, AUTONOMOUS_BADGE_CHANNELS, BUTTON_BADGE, BUTTON_BADGE_CHANNELS,
        },
        sim::{SimPlatform, SimPulseTimer, SimTickCounter},
    };

    #[test]
    fn test_button_badge_modes() {
        let slots = BUTTON_BADGE.pattern_slots();
        let ids: Vec<PatternId> = slots.iter().map(PatternSlot::id).collect();
        assert_eq!(ids, [PatternId::Beat, PatternId::Breathe]);
        assert_eq!(BUTTON_BADGE.channel_count(), BUTTON_BADGE_CHANNELS);
        assert!(BUTTON_BADGE.scheduler.button.is_some());
        assert_eq!(
            BUTTON_BADGE.patterns.beat.dead_zone,
            Duration::from_millis(31)
        );
    }

    #[test]
    fn test_autonomous_badge_has_no_button() {
        assert!(AUTONOMOUS_BADGE.scheduler.button.is_none());
        assert_eq!(AUTONOMOUS_BADGE.pattern_slots().len(), 1);
        assert_eq!(AUTONOMOUS_BADGE.channel_count(), AUTONOMOUS_BADGE_CHANNELS);

        // Periods are close but never equal
        let periods = AUTONOMOUS_BADGE.patterns.beat.periods;
        for pair in periods.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[1].as_micros() - pair[0].as_micros() < 20_000);
        }
    }

    #[test]
    fn test_autonomous_badge_runs() {
        let preset = AUTONOMOUS_BADGE;
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, AUTONOMOUS_BADGE_CHANNELS> = Scheduler::new(
            PulseDriver::new(SimPulseTimer::new(4), &preset.scheduler.pulse),
            VirtualClock::new(&counter, preset.clock),
            SimPlatform::new(),
            preset.pattern_slots(),
            &preset.scheduler,
        );

        scheduler.cycle().unwrap();
        assert_eq!(scheduler.frame(), &[0, 0, 0]);

        let mut lit = false;
        for _ in 0..200 {
            // A few hundred microseconds awake per cycle
            counter.advance(48 * 300);
            scheduler.cycle().unwrap();
            lit |= scheduler.frame().iter().any(|duty| *duty > 0);
            assert!(scheduler.frame().iter().all(|duty| *duty <= CIE_MAX));
        }
        assert!(lit);
        assert_eq!(
            scheduler.now(),
            Instant::from_micros(201 * 16_000 + 200 * 300)
        );
    }

    #[test]
    fn test_button_badge_runs_inverted() {
        let preset = BUTTON_BADGE;
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, BUTTON_BADGE_CHANNELS> = Scheduler::new(
            PulseDriver::new(SimPulseTimer::new(4), &preset.scheduler.pulse),
            VirtualClock::new(&counter, preset.clock),
            SimPlatform::new(),
            preset.pattern_slots(),
            &preset.scheduler,
        );

        scheduler.cycle().unwrap();
        // Dark frame on active-low wiring
        for channel in 0..BUTTON_BADGE_CHANNELS {
            assert_eq!(scheduler.driver().timer().compare(channel), Some(1023));
        }
    }
}
