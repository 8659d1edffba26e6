use rand::{seq::SliceRandom, Rng};

/// Picks up to `count` distinct candidates uniformly at random.
///
/// This is a partial Fisher-Yates shuffle over a copy of `candidates`, so the result is a
/// permutation of the whole input whenever `count` covers it.
pub fn select_winners<T: Clone, R: Rng + ?Sized>(
    candidates: &[T],
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut pool = candidates.to_vec();
    let (picked, _) = pool.partial_shuffle(rng, count);
    picked.to_vec()
}

/// Reactors that may win: everyone but the bot, which reacts to its own post.
pub fn eligible(reactors: Vec<u64>, self_id: u64) -> Vec<u64> {
    let mut candidates = Vec::with_capacity(reactors.len());
    for reactor in reactors {
        if reactor != self_id && !candidates.contains(&reactor) {
            candidates.push(reactor);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn empty_candidates_give_no_winners() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_winners::<u64, _>(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn zero_count_gives_no_winners() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_winners(&[1_u64, 2, 3], 0, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_winners() {
        let candidates: Vec<u64> = (0..50).collect();
        let first = select_winners(&candidates, 5, &mut StdRng::seed_from_u64(99));
        let second = select_winners(&candidates, 5, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn every_candidate_can_win() {
        let candidates = [1_u64, 2, 3];
        let mut seen = HashSet::new();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            seen.extend(select_winners(&candidates, 1, &mut rng));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn bot_and_duplicate_reactions_are_not_eligible() {
        assert_eq!(eligible(vec![5, 1, 2, 5, 1, 3], 5), vec![1, 2, 3]);
        assert!(eligible(vec![5], 5).is_empty());
    }

    proptest! {
        #[test]
        fn winners_are_a_duplicate_free_subset(
            candidates in prop::collection::hash_set(any::<u64>(), 0..64),
            count in 0_usize..80,
            seed in any::<u64>(),
        ) {
            let candidates: Vec<u64> = candidates.into_iter().collect();
            let winners = select_winners(&candidates, count, &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(winners.len(), count.min(candidates.len()));
            let unique: HashSet<u64> = winners.iter().copied().collect();
            prop_assert_eq!(unique.len(), winners.len());
            prop_assert!(winners.iter().all(|winner| candidates.contains(winner)));

            if count >= candidates.len() {
                let mut sorted_winners = winners.clone();
                let mut sorted_candidates = candidates.clone();
                sorted_winners.sort_unstable();
                sorted_candidates.sort_unstable();
                prop_assert_eq!(sorted_winners, sorted_candidates);
            }
        }
    }
}
