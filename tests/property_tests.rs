use hearth::cluster::euclidean;
use hearth::knn::{classify, NearestNeighborVoter};
use hearth::FeatureVector;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn pool() -> impl Strategy<Value = Vec<(FeatureVector, usize)>> {
    prop::collection::vec(
        (prop::collection::vec(-10.0f64..10.0, 3), 0usize..4),
        1..30,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(v, l)| (FeatureVector::new(v), l))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_label_comes_from_pool(
        candidates in pool(),
        query in prop::collection::vec(-10.0f64..10.0, 3),
        k in 1usize..8
    ) {
        let query = FeatureVector::new(query);
        // Skip the rare pool made only of exact echoes.
        if let Ok(label) = classify(&query, &candidates, k) {
            prop_assert!(candidates.iter().any(|(_, l)| *l == label));
        }
    }

    #[test]
    fn prop_order_independent(
        candidates in pool(),
        query in prop::collection::vec(-10.0f64..10.0, 3),
        k in 1usize..8,
        seed in any::<u64>()
    ) {
        let query = FeatureVector::new(query);
        let mut shuffled = candidates.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(
            classify(&query, &candidates, k),
            classify(&query, &shuffled, k)
        );
    }

    #[test]
    fn prop_heap_bounded_by_k(
        candidates in pool(),
        query in prop::collection::vec(-10.0f64..10.0, 3),
        k in 1usize..40
    ) {
        let query = FeatureVector::new(query);
        if let Ok(nearest) = NearestNeighborVoter::new(k).nearest(&query, &candidates) {
            let usable = candidates
                .iter()
                .filter(|(v, _)| euclidean(query.as_slice(), v.as_slice()) > 0.0)
                .count();
            prop_assert_eq!(nearest.len(), k.min(usable));
            prop_assert!(nearest.windows(2).all(|w| w[0].distance <= w[1].distance));
            prop_assert!(nearest.iter().all(|n| n.distance > 0.0));
        }
    }
}
