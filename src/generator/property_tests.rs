//! Property tests for sequence generation

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SequenceTable;
use crate::generator::{Order, SequenceSpec};
use crate::trainer::Algorithm;

proptest! {
    #[test]
    fn prop_size_and_range_hold(
        seed in any::<u64>(),
        size in 1..=30usize,
        min in -50..=50i64,
        width in 0..=200i64,
        distinct in any::<bool>(),
    ) {
        let max = min + width;
        let spec = SequenceSpec {
            size,
            min_value: min,
            max_value: max,
            distinct,
            order: Order::Shuffled,
        };
        let result = spec.generate(&mut StdRng::seed_from_u64(seed));

        if distinct && (width + 1) < size as i64 {
            prop_assert!(result.is_err());
        } else {
            let values = result.unwrap();
            prop_assert_eq!(values.len(), size);
            prop_assert!(values.iter().all(|v| (min..=max).contains(v)));
            if distinct {
                let mut sorted = values.clone();
                sorted.sort_unstable();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), size);
            }
        }
    }

    #[test]
    fn prop_default_search_sequences_are_strictly_ascending(
        seed in any::<u64>(),
        size in 1..=20usize,
    ) {
        let table = SequenceTable::default();
        let spec = SequenceSpec::for_algorithm(
            Algorithm::BinarySearch,
            size,
            table.profile(Algorithm::BinarySearch),
        );
        let values = spec.generate(&mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
    }
}
