//! Weighted random choice over `(value, weight)` tables.

use crate::RandomSource;

/// Picks one value from a table of `(value, weight)` pairs.
///
/// Draws `r` uniformly in `[0, total_weight)` and walks the table in order,
/// subtracting each weight until `r` goes negative. If floating point
/// rounding walks off the end of the table, the last entry is returned.
/// Entries with non-positive weight are never chosen.
///
/// Returns `None` only when the table is empty or has no positive weight.
pub fn pick_weighted<T: Copy, R: RandomSource + ?Sized>(
    options: &[(T, f64)],
    rng: &mut R,
) -> Option<T> {
    let total: f64 = options
        .iter()
        .map(|(_, weight)| weight.max(0.0))
        .sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = rng.next_unit() * total;
    for (value, weight) in options {
        if *weight <= 0.0 {
            continue;
        }
        remaining -= weight;
        if remaining < 0.0 {
            return Some(*value);
        }
    }

    options
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0.0)
        .map(|(value, _)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeededSource, SequenceSource};

    const TABLE: &[(char, f64)] = &[('a', 1.0), ('b', 2.0), ('c', 1.0)];

    #[test]
    fn walks_table_in_order() {
        // total = 4: [0,1) -> a, [1,3) -> b, [3,4) -> c
        let mut rng = SequenceSource::new([0.0, 0.24, 0.25, 0.74, 0.75, 0.99]);
        let picks: Vec<char> = (0..6)
            .map(|_| pick_weighted(TABLE, &mut rng).unwrap())
            .collect();
        assert_eq!(picks, vec!['a', 'a', 'b', 'b', 'c', 'c']);
    }

    #[test]
    fn exhausted_table_returns_last_option() {
        // A draw of exactly 1.0 never happens with a real source but
        // exercises the fall-through.
        let mut rng = SequenceSource::constant(1.0);
        assert_eq!(pick_weighted(TABLE, &mut rng), Some('c'));
    }

    #[test]
    fn zero_weight_options_are_skipped() {
        let table = [('x', 0.0), ('y', 1.0), ('z', 0.0)];
        let mut rng = SeededSource::default();
        for _ in 0..100 {
            assert_eq!(pick_weighted(&table, &mut rng), Some('y'));
        }
    }

    #[test]
    fn empty_or_weightless_tables_yield_none() {
        let mut rng = SequenceSource::constant(0.5);
        assert_eq!(pick_weighted::<char, _>(&[], &mut rng), None);
        assert_eq!(pick_weighted(&[('x', 0.0)], &mut rng), None);
    }

    #[test]
    fn frequencies_follow_weights() {
        let mut rng = SeededSource::from_seed_u64(7);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match pick_weighted(TABLE, &mut rng) {
                Some('a') => counts[0] += 1,
                Some('b') => counts[1] += 1,
                Some('c') => counts[2] += 1,
                other => panic!("unexpected pick {other:?}"),
            }
        }
        assert!(counts[1] > counts[0], "b should dominate: {counts:?}");
        assert!(counts[1] > counts[2], "b should dominate: {counts:?}");
        assert!(counts[0] > 2000 && counts[2] > 2000, "{counts:?}");
    }
}
