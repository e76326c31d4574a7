use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::model::Sample;

/// Positives followed by negatives, then a uniform Fisher-Yates shuffle.
/// Row identity is the position in the returned `Vec`.
pub fn assemble<R: Rng + ?Sized>(positives: &[Sample], negatives: &[Sample], rng: &mut R) -> Vec<Sample> {
    let mut all = Vec::with_capacity(positives.len() + negatives.len());
    all.extend_from_slice(positives);
    all.extend_from_slice(negatives);
    all.shuffle(rng);
    all
}

/// Shuffle RNG: seeded when `seed` is given, OS entropy otherwise.
pub fn shuffle_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &Sample) -> (String, u64, u8) {
        (s.sequence.clone(), s.label.to_bits(), s.kind as u8)
    }

    fn pools() -> (Vec<Sample>, Vec<Sample>) {
        let positives = (0..20)
            .map(|i| Sample::active(format!("K{i}"), i as f64))
            .collect();
        let negatives = vec![Sample::inactive("AAC"), Sample::inactive("GGW")];
        (positives, negatives)
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let (pos, neg) = pools();
        let out = assemble(&pos, &neg, &mut shuffle_rng(None));
        assert_eq!(out.len(), pos.len() + neg.len());

        let mut expected: Vec<_> = pos.iter().chain(neg.iter()).map(key).collect();
        let mut actual: Vec<_> = out.iter().map(key).collect();
        expected.sort();
        actual.sort();
        assert_eq!(expected, actual);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let (pos, neg) = pools();
        let a = assemble(&pos, &neg, &mut shuffle_rng(Some(7)));
        let b = assemble(&pos, &neg, &mut shuffle_rng(Some(7)));
        assert_eq!(a, b);
    }

    #[test]
    fn cross_pool_duplicates_both_survive() {
        let pos = vec![Sample::active("AAC", 3.0)];
        let neg = vec![Sample::inactive("AAC")];
        let out = assemble(&pos, &neg, &mut shuffle_rng(Some(1)));
        assert_eq!(out.iter().filter(|s| s.sequence == "AAC").count(), 2);
    }

    #[test]
    fn empty_pools_assemble_to_empty() {
        assert!(assemble(&[], &[], &mut shuffle_rng(Some(0))).is_empty());
    }
}
