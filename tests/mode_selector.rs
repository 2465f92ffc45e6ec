mod tests {
    use myrtio_pulse_composer::{
        ButtonConfig, Duration, Instant, Level, ModeSelector, NoButton, sim::SimButtonLine,
    };

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_press_is_debounced() {
        let line = SimButtonLine::new();
        let mut selector = ModeSelector::new(line.button(), 2, &ButtonConfig::default());
        assert_eq!(selector.poll(at(0)), None);

        line.set(Level::Low);
        assert_eq!(selector.poll(at(10)), None);
        assert_eq!(selector.poll(at(20)), None);
        assert_eq!(selector.poll(at(40)), Some(1));
        assert_eq!(selector.stable_level(), Level::Low);

        // Holding the button does not repeat
        assert_eq!(selector.poll(at(50)), None);
        assert_eq!(selector.poll(at(500)), None);
        assert_eq!(selector.current(), 1);
    }

    #[test]
    fn test_release_then_press_wraps_around() {
        let line = SimButtonLine::new();
        let mut selector = ModeSelector::new(line.button(), 2, &ButtonConfig::default());

        line.set(Level::Low);
        selector.poll(at(0));
        assert_eq!(selector.poll(at(30)), Some(1));

        line.set(Level::High);
        assert_eq!(selector.poll(at(60)), None);
        assert_eq!(selector.poll(at(95)), None);
        assert_eq!(selector.stable_level(), Level::High);

        line.set(Level::Low);
        assert_eq!(selector.poll(at(100)), None);
        assert_eq!(selector.poll(at(130)), Some(0));
    }

    #[test]
    fn test_bounce_restarts_window() {
        let line = SimButtonLine::new();
        let mut selector = ModeSelector::new(line.button(), 3, &ButtonConfig::default());

        line.set(Level::Low);
        selector.poll(at(10));
        line.set(Level::High);
        selector.poll(at(15));
        line.set(Level::Low);
        selector.poll(at(20));

        assert_eq!(selector.poll(at(45)), None);
        assert_eq!(selector.poll(at(50)), Some(1));
    }

    #[test]
    fn test_held_at_boot_does_not_switch() {
        let line = SimButtonLine::new();
        line.set(Level::Low);
        let mut selector = ModeSelector::new(line.button(), 2, &ButtonConfig::default());
        assert_eq!(selector.poll(at(0)), None);
        assert_eq!(selector.poll(at(100)), None);
        assert_eq!(selector.current(), 0);
    }

    #[test]
    fn test_active_high_button() {
        let line = SimButtonLine::new();
        line.set(Level::Low);
        let config = ButtonConfig {
            pressed: Level::High,
            debounce: Duration::from_millis(5),
        };
        let mut selector = ModeSelector::new(line.button(), 4, &config);

        line.set(Level::High);
        selector.poll(at(0));
        assert_eq!(selector.poll(at(5)), Some(1));
    }

    #[test]
    fn test_rebase_after_epoch_reset() {
        let line = SimButtonLine::new();
        let mut selector = ModeSelector::new(line.button(), 2, &ButtonConfig::default());

        line.set(Level::Low);
        selector.poll(at(1_000));
        // Clock restarted from zero
        selector.rebase(at(0));
        assert_eq!(selector.poll(at(29)), None);
        assert_eq!(selector.poll(at(30)), Some(1));
    }

    #[test]
    fn test_no_button_never_selects() {
        let mut selector = ModeSelector::new(NoButton, 2, &ButtonConfig::default());
        for ms in 0..100 {
            assert_eq!(selector.poll(at(ms * 10)), None);
        }
    }
}
