use proptest::prelude::*;

use slipday::roster::{ATTENDANCES_PER_SLIP, PersonRecord, earned, earned_at_rate};

fn record(earned: u32, used: u32, dropped: bool) -> PersonRecord {
    PersonRecord {
        earned,
        used,
        dropped,
        tracked: true,
        ..PersonRecord::new("id:1", "Jane Doe", "1")
    }
}

proptest! {
    #[test]
    fn test_earned_is_floor_division(count in 0u32..10_000) {
        let slips = earned(count);
        prop_assert!(slips * ATTENDANCES_PER_SLIP <= count);
        prop_assert!(count < (slips + 1) * ATTENDANCES_PER_SLIP);
    }

    #[test]
    fn test_earned_is_monotonic(count in 0u32..10_000, rate in 1u32..20) {
        prop_assert!(earned_at_rate(count, rate) <= earned_at_rate(count + 1, rate));
    }

    #[test]
    fn test_consume_never_overdraws(earned in 0u32..50, used in 0u32..50, n in 1u32..60) {
        let used = used.min(earned);
        let mut rec = record(earned, used, false);
        let before = rec.clone();
        match rec.consume(n) {
            Ok(()) => {
                prop_assert_eq!(rec.used, used + n);
                prop_assert!(rec.used <= rec.earned);
            }
            Err(_) => {
                prop_assert!(n > before.available());
                prop_assert_eq!(rec, before);
            }
        }
    }

    #[test]
    fn test_refund_floors_at_zero(used in 0u32..50, n in 0u32..100) {
        let mut rec = record(100, used, false);
        rec.refund(n);
        prop_assert_eq!(rec.used, used.saturating_sub(n));
    }

    #[test]
    fn test_dropping_clamps_used(earned in 0u32..50, used in 0u32..100) {
        let mut rec = record(earned, used, false);
        rec.set_dropped(true);
        prop_assert!(rec.used <= rec.earned);
        prop_assert_eq!(rec.available(), earned.saturating_sub(used));
    }
}
