use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use xchange_fx::{CurrencyRegistry, ExchangeRateStore, UniformRateGenerator};

fn registry(seed: u64) -> CurrencyRegistry {
    let store = ExchangeRateStore::with_generator(Arc::new(UniformRateGenerator::seeded(seed)));
    CurrencyRegistry::new(Arc::new(store))
}

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Remove(String),
}

fn code() -> impl Strategy<Value = String> {
    // Small alphabet so removes and duplicate adds actually hit.
    "[a-dA-D]{1,2}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => code().prop_map(Op::Add),
        1 => code().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn graph_complete_and_symmetric(seed in any::<u64>(), codes in prop::collection::vec(code(), 0..12)) {
        let registry = registry(seed);
        for code in &codes {
            registry.add_currency(code).unwrap();
        }

        let tracked = registry.list_currencies();
        let distinct: HashSet<String> = codes.iter().map(|c| c.to_uppercase()).collect();
        prop_assert_eq!(tracked.len(), distinct.len());

        for a in &tracked {
            for b in &tracked {
                let forward = registry.store().get_rate(a.code(), b.code()).unwrap();
                let backward = registry.store().get_rate(b.code(), a.code()).unwrap();
                prop_assert!((forward * backward - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn drawn_rates_in_range(seed in any::<u64>(), codes in prop::collection::vec(code(), 2..10)) {
        let registry = registry(seed);
        for code in &codes {
            registry.add_currency(code).unwrap();
        }

        for rate in registry.store().list_all_rates() {
            let inverse = registry.store().get(&rate.pair.inverse()).unwrap();
            let drawn = if (0.5..2.0).contains(&rate.rate) { rate.rate } else { inverse.rate };
            prop_assert!((0.5..2.0).contains(&drawn));
        }
    }

    #[test]
    fn mutations_keep_graph_exact(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..40)) {
        let registry = registry(seed);
        let mut expected: HashSet<String> = HashSet::new();

        for op in ops {
            match op {
                Op::Add(code) => {
                    registry.add_currency(&code).unwrap();
                    expected.insert(code.to_uppercase());
                }
                Op::Remove(code) => {
                    let was_tracked = expected.remove(&code.to_uppercase());
                    prop_assert_eq!(registry.remove_currency(&code).is_ok(), was_tracked);
                }
            }
        }

        let tracked: HashSet<String> = registry
            .list_currencies()
            .iter()
            .map(|c| c.code().to_string())
            .collect();
        prop_assert_eq!(&tracked, &expected);

        let n = expected.len();
        prop_assert_eq!(registry.store().len(), n * n.saturating_sub(1));
        for rate in registry.store().list_all_rates() {
            prop_assert!(expected.contains(rate.from().code()));
            prop_assert!(expected.contains(rate.to().code()));
        }
    }
}
