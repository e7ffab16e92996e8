//! Grouping and counting helpers over filtered records.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Percentage of items satisfying `pred`, `None` for an empty input.
pub fn percentage<T, F>(items: &[T], pred: F) -> Option<f64>
where
    F: Fn(&T) -> bool,
{
    if items.is_empty() {
        return None;
    }
    let hits = items.iter().filter(|item| pred(item)).count();
    Some(hits as f64 / items.len() as f64 * 100.0)
}

/// Mean of `value` per distinct `key`, keys ascending.
pub fn group_mean<T, K, KF, VF>(items: &[T], key: KF, value: VF) -> Vec<(K, f64)>
where
    K: Ord,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for item in items {
        let entry = groups.entry(key(item)).or_insert((0.0, 0));
        entry.0 += value(item);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

/// Occurrences per distinct key, keys ascending.
pub fn histogram<T, K, KF>(items: &[T], key: KF) -> Vec<(K, usize)>
where
    K: Ord,
    KF: Fn(&T) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Occurrences per distinct key, most frequent first.
///
/// Keys with equal counts keep the order in which they first appeared.
pub fn value_counts<T, K, KF>(items: &[T], key: KF) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    KF: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
    }
    // sort_by is stable, so ties stay in first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
