mod tests {
    use myrtio_pulse_composer::{
        BeatPattern, BreathePattern, ButtonConfig, ButtonPin, CIE_MAX, ClockConfig,
        DriverError, Duration, Fault, Instant, Level, PatternId, PatternSlot, PinId, Polarity,
        Pull, PulseConfig, PulseDriver, Scheduler, SchedulerConfig, SchedulerState, TimeUnit,
        VirtualClock,
        sim::{PinMode, SimButtonLine, SimPlatform, SimPulseTimer, SimTickCounter},
    };

    static PINS: [PinId; 3] = [0x32, 0x01, 0x23];

    static PERIODS: [Duration; 3] = [
        Duration::from_millis(500),
        Duration::from_millis(505),
        Duration::from_millis(510),
    ];

    const SLEEP: Duration = Duration::from_millis(17);

    const MILLIS: ClockConfig = ClockConfig {
        ticks_per_unit: 1,
        unit: TimeUnit::Millis,
    };

    fn config() -> SchedulerConfig {
        SchedulerConfig {
            pulse: PulseConfig {
                period: 1024,
                prescale: 0,
                polarity: Polarity::ActiveHigh,
                poll_budget: 100,
            },
            sleep_duration: SLEEP,
            pwm_pins: &PINS,
            button: None,
        }
    }

    fn beat() -> PatternSlot {
        BeatPattern::new(&PERIODS, Duration::from_millis(31)).into()
    }

    fn driver(timer: SimPulseTimer) -> PulseDriver<SimPulseTimer> {
        PulseDriver::new(timer, &config().pulse)
    }

    #[test]
    fn test_init_configures_hardware() {
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );
        assert_eq!(scheduler.state(), SchedulerState::Init);
        assert_eq!(scheduler.step(), Ok(SchedulerState::Running));

        let pins = scheduler.platform().pins();
        assert_eq!(pins.len(), 3);
        assert!(pins.iter().all(|(_, mode)| *mode == PinMode::PwmOutput));
        assert_eq!(pins[0].0, 0x32);
        assert_eq!(scheduler.platform().inits(), 1);
        assert!(scheduler.driver().is_configured());
        assert_eq!(scheduler.driver().timer().period(), 1024);
        assert_eq!(scheduler.now(), Instant::from_millis(0));
    }

    #[test]
    fn test_first_frame_is_dark_and_peak_follows() {
        let counter = SimTickCounter::new();
        counter.set(9_000);
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );

        scheduler.step().unwrap();
        assert_eq!(scheduler.step(), Ok(SchedulerState::Sleeping));
        assert_eq!(scheduler.frame(), &[0, 0, 0]);
        assert_eq!(scheduler.driver().timer().pulse_count(), 1);

        // Hardware counter moves while awake
        counter.advance(250);
        scheduler.step().unwrap();
        assert_eq!(scheduler.now(), Instant::from_millis(267));

        counter.set(9_250);
        let mut fresh: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );
        fresh.step().unwrap();
        counter.advance(250);
        fresh.step().unwrap();
        assert_eq!(fresh.frame()[0], CIE_MAX);
        assert_eq!(fresh.driver().timer().compare(0), Some(CIE_MAX));
    }

    #[test]
    fn test_sleep_accounting_has_no_drift() {
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );

        for k in 1..=1000u64 {
            scheduler.cycle().unwrap();
            assert_eq!(scheduler.now(), Instant::from_millis(17 * k));
        }
        assert_eq!(scheduler.cycles(), 1000);
        assert_eq!(scheduler.platform().sleeps(), 1000);
        assert_eq!(scheduler.driver().timer().pulse_count(), 1000);
        // One init plus one clock restore per wake-up
        assert_eq!(scheduler.platform().inits(), 1001);
    }

    #[test]
    fn test_stuck_pulse_is_fatal() {
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3).stuck()),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );
        scheduler.step().unwrap();
        assert_eq!(
            scheduler.step(),
            Err(Fault::Pulse(DriverError::Timeout { polls: 100 }))
        );
    }

    #[test]
    #[should_panic(expected = "hard reset requested")]
    fn test_run_resets_on_fault() {
        let counter = SimTickCounter::new();
        let scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3).stuck()),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );
        scheduler.run();
    }

    #[test]
    fn test_frame_wider_than_timer() {
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(2)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        );
        assert_eq!(
            scheduler.step(),
            Err(Fault::TooManyChannels {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_no_patterns() {
        let counter = SimTickCounter::new();
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            core::iter::empty(),
            &config(),
        );
        assert_eq!(scheduler.step(), Err(Fault::NoPatterns));
        assert!(scheduler.active_pattern().is_none());
    }

    #[test]
    fn test_button_without_pin_faults() {
        let counter = SimTickCounter::new();
        let line = SimButtonLine::new();
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat()],
            &config(),
        )
        .with_button(line.button());
        assert_eq!(scheduler.step(), Err(Fault::ButtonPinMissing));
        assert_eq!(
            Fault::ButtonPinMissing.to_string(),
            "button attached but no button pin configured"
        );
    }

    #[test]
    fn test_button_switches_pattern_and_restarts_phase() {
        let counter = SimTickCounter::new();
        let line = SimButtonLine::new();
        let config = SchedulerConfig {
            button: Some(ButtonPin {
                pin: 0x21,
                pull: Pull::Up,
                config: ButtonConfig {
                    pressed: Level::Low,
                    debounce: Duration::from_millis(30),
                },
            }),
            ..config()
        };
        let mut scheduler: Scheduler<_, _, _, _, 3> = Scheduler::new(
            driver(SimPulseTimer::new(3)),
            VirtualClock::new(&counter, MILLIS),
            SimPlatform::new(),
            [beat(), BreathePattern::new(Duration::from_millis(3_000)).into()],
            &config,
        )
        .with_button(line.button());

        scheduler.cycle().unwrap();
        scheduler.cycle().unwrap();
        assert_eq!(
            scheduler.platform().pins().last(),
            Some(&(0x21, PinMode::Input(Pull::Up)))
        );
        assert_eq!(scheduler.now(), Instant::from_millis(34));

        line.set(Level::Low);
        scheduler.cycle().unwrap();
        scheduler.cycle().unwrap();
        assert_eq!(scheduler.active_index(), 0);
        assert_eq!(scheduler.now(), Instant::from_millis(68));

        scheduler.cycle().unwrap();
        assert_eq!(scheduler.active_index(), 1);
        assert_eq!(
            scheduler.active_pattern().map(PatternSlot::id),
            Some(PatternId::Breathe)
        );
        // Epoch restarted at the switch, then one sleep
        assert_eq!(scheduler.now(), Instant::from_millis(17));
        assert_eq!(scheduler.frame(), &[0, 0, 0]);

        for _ in 0..10 {
            scheduler.cycle().unwrap();
        }
        let frame = scheduler.frame();
        assert!(frame[0] > 0);
        assert!(frame.iter().all(|duty| *duty == frame[0]));
    }
}
