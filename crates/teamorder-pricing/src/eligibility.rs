//! Minimum-quantity gate applied before tier resolution.

use crate::aggregate::Counts;

/// Whether combinations below the configured minimum are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinimumPolicy {
    /// Combinations below the minimum are excluded from invoicing.
    #[default]
    Enforce,
    /// Every combination is eligible. Preview only; never used to invoice.
    Bypass,
}

/// Disjoint split of the batch counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub eligible: Counts,
    pub excluded: Counts,
}

/// Splits `counts` into combinations meeting `minimum` and the rest.
#[must_use]
pub fn filter_by_minimum(counts: &Counts, minimum: u32, policy: MinimumPolicy) -> Partition {
    let mut partition = Partition::default();
    for (key, &count) in counts {
        if policy == MinimumPolicy::Bypass || count >= minimum {
            partition.eligible.insert(key.clone(), count);
        } else {
            partition.excluded.insert(key.clone(), count);
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use teamorder_core::ProductColorKey;

    use super::*;

    fn counts(entries: &[(&str, &str, u32)]) -> Counts {
        entries
            .iter()
            .map(|(p, c, n)| (ProductColorKey::new(*p, *c), *n))
            .collect()
    }

    #[test]
    fn splits_on_minimum() {
        let input = counts(&[("Jacket", "Black", 10), ("Jacket", "Navy", 3)]);
        let partition = filter_by_minimum(&input, 6, MinimumPolicy::Enforce);
        assert_eq!(partition.eligible, counts(&[("Jacket", "Black", 10)]));
        assert_eq!(partition.excluded, counts(&[("Jacket", "Navy", 3)]));
    }

    #[test]
    fn count_equal_to_minimum_is_eligible() {
        let input = counts(&[("Vest", "Black", 6)]);
        let partition = filter_by_minimum(&input, 6, MinimumPolicy::Enforce);
        assert_eq!(partition.eligible.len(), 1);
        assert!(partition.excluded.is_empty());
    }

    #[test]
    fn bypass_makes_everything_eligible() {
        let input = counts(&[("Jacket", "Black", 10), ("Jacket", "Navy", 1)]);
        let partition = filter_by_minimum(&input, 6, MinimumPolicy::Bypass);
        assert_eq!(partition.eligible, input);
        assert!(partition.excluded.is_empty());
    }

    proptest! {
        #[test]
        fn partition_is_exhaustive_and_disjoint(
            raw in prop::collection::btree_map("[A-D]", 0u32..20, 0..8),
            minimum in 0u32..20,
        ) {
            let input: Counts = raw
                .into_iter()
                .map(|(color, n)| (ProductColorKey::new("Jacket", color), n))
                .collect();
            let partition = filter_by_minimum(&input, minimum, MinimumPolicy::Enforce);
            prop_assert_eq!(partition.eligible.len() + partition.excluded.len(), input.len());
            for key in input.keys() {
                let in_eligible = partition.eligible.contains_key(key);
                let in_excluded = partition.excluded.contains_key(key);
                prop_assert!(in_eligible != in_excluded);
            }
        }
    }
}
