//! Majority voting over repeated samples.
//!
//! A value wins outright only with a strict majority (`count * 2 > n`).
//! Without one, the result is drawn uniformly from *all* samples, so a
//! minority outlier can be picked even when two leaders are tied.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use rand::Rng;

/// Return the strict-majority item of `items`, or a uniformly random item
/// from the whole slice when no item holds a strict majority.
///
/// # Panics
///
/// Panics if `items` is empty. Callers must never vote over an empty
/// collection.
pub fn majority_vote<T, R>(items: &[T], rng: &mut R) -> T
where
    T: Eq + Hash + Clone,
    R: Rng,
{
    assert!(!items.is_empty(), "majority_vote called with no items");

    let mut counts: HashMap<&T, usize> = HashMap::with_capacity(items.len());
    for item in items {
        *counts.entry(item).or_default() += 1;
    }

    if let Some((leader, count)) = counts.into_iter().max_by_key(|&(_, count)| count) {
        if count * 2 > items.len() {
            return leader.clone();
        }
    }

    items[rng.gen_range(0..items.len())].clone()
}

/// Vote each key independently across a collection of key/value records.
///
/// Every key seen in any record appears in the result; its value is the
/// [`majority_vote`] over the values recorded for that key.
pub fn vote_per_key<K, V, I, M, R>(records: I, rng: &mut R) -> BTreeMap<K, V>
where
    I: IntoIterator<Item = M>,
    M: IntoIterator<Item = (K, V)>,
    K: Ord,
    V: Eq + Hash + Clone,
    R: Rng,
{
    let mut columns: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for record in records {
        for (key, value) in record {
            columns.entry(key).or_default().push(value);
        }
    }

    columns
        .into_iter()
        .map(|(key, values)| {
            let winner = majority_vote(&values, rng);
            (key, winner)
        })
        .collect()
}
