use proptest::prelude::*;

use wise_types::{Moment, Timestamp};

fn moment() -> impl Strategy<Value = Moment> {
    (1u64..1_000_000, 0u32..64, 0u32..8).prop_map(|(b, t, o)| Moment::new(b, t, o))
}

proptest! {
    /// Moment ordering is the lexicographic ordering of its coordinates.
    #[test]
    fn moment_order_is_lexicographic(a in moment(), b in moment()) {
        let ta = (a.block_num, a.transaction_num, a.operation_num);
        let tb = (b.block_num, b.transaction_num, b.operation_num);
        prop_assert_eq!(a.cmp(&b), ta.cmp(&tb));
    }

    /// Exactly one of a < b, a == b, a > b holds.
    #[test]
    fn moment_order_is_strict_and_total(a in moment(), b in moment()) {
        let relations = [a < b, a == b, a > b];
        prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
    }

    /// Moment ordering is transitive.
    #[test]
    fn moment_order_is_transitive(a in moment(), b in moment(), c in moment()) {
        if a < b && b < c {
            prop_assert!(a < c);
        }
    }

    /// NEVER sorts before every real moment.
    #[test]
    fn never_precedes_real_moments(m in moment()) {
        prop_assert!(Moment::NEVER < m);
        prop_assert!(!m.is_never());
    }

    /// Moment JSON roundtrip.
    #[test]
    fn moment_json_roundtrip(m in moment()) {
        let encoded = serde_json::to_string(&m).unwrap();
        let decoded: Moment = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, m);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Chain-format rendering parses back to the same second.
    #[test]
    fn timestamp_chain_string_roundtrip(secs in 0u64..4_000_000_000) {
        let ts = Timestamp::new(secs);
        prop_assert_eq!(Timestamp::parse(&ts.to_chain_string()).unwrap(), ts);
    }
}
