use edc_map::similarity;
use proptest::prelude::*;

proptest! {
    #[test]
    fn similarity_is_symmetric(a in ".*", b in ".*") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn similarity_stays_in_unit_interval(a in ".*", b in ".*") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "out of range: {}", score);
    }

    #[test]
    fn self_similarity_is_one(a in ".*") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }
}
