mod tests {
    use myrtio_pulse_composer::cie::{CIE_MAX, CIE_STEPS, CIE_TABLE, cie_lookup};

    #[test]
    fn test_cie_endpoints() {
        assert_eq!(cie_lookup(0), 0);
        assert_eq!(cie_lookup(255), 1023);
        assert_eq!(cie_lookup(255), CIE_MAX);
        assert_eq!(CIE_STEPS, 1024);
    }

    #[test]
    fn test_cie_monotonic() {
        for linear in 1..=255u8 {
            assert!(
                cie_lookup(linear) >= cie_lookup(linear - 1),
                "curve drops at {linear}"
            );
        }
    }

    #[test]
    fn test_cie_is_perceptual() {
        // Half the linear input is far less than half the duty
        assert!(cie_lookup(128) < CIE_MAX / 4);
        assert_eq!(CIE_TABLE.len(), 256);
    }
}
