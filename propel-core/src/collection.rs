//! Sized collection generators.
//!
//! Every builder draws a target size uniformly from `[min, max]` and then
//! that many elements from the element generator. Shrinking keeps a strictly
//! shorter prefix; element values themselves are not shrunk.

use crate::gen::Gen;
use crate::shrink::{shorter_lengths, Shrinks};
use std::collections::{BTreeMap, BTreeSet};

fn check_bounds(min: usize, max: usize) {
    assert!(min <= max, "collection generator requires min <= max");
}

impl<T> Gen<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    /// Generate a vector whose length lies in `[min, max]`.
    ///
    /// Shrinks to prefixes that are strictly shorter but not shorter than
    /// `min`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn seq_of(element: Gen<T>, min: usize, max: usize) -> Self {
        check_bounds(min, max);
        Gen::new(move |rng| {
            let len = rng.draw_range(min, max);
            element.samples(rng).take(len).collect()
        })
        .with_shrink(move |items: &Vec<T>| {
            let items = items.clone();
            Shrinks::new(shorter_lengths(min, items.len()).map(move |n| items[..n].to_vec()))
        })
    }

    /// Generate a vector of exactly `len` elements. Does not shrink.
    pub fn fixed_seq_of(element: Gen<T>, len: usize) -> Self {
        Gen::new(move |rng| element.samples(rng).take(len).collect())
    }
}

impl<T> Gen<BTreeSet<T>>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    /// Generate a set of at most `max` elements.
    ///
    /// The target size is drawn from `[min, max]` and exactly that many
    /// elements are drawn; duplicates collapse, so the result may be smaller
    /// than the target (or than `min`) when the element domain is small.
    /// Generation never retries.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn set_of(element: Gen<T>, min: usize, max: usize) -> Self {
        check_bounds(min, max);
        Gen::new(move |rng| {
            let len = rng.draw_range(min, max);
            element.samples(rng).take(len).collect()
        })
        .with_shrink(move |set: &BTreeSet<T>| {
            let items: Vec<T> = set.iter().cloned().collect();
            Shrinks::new(
                shorter_lengths(min, items.len())
                    .map(move |n| items[..n].iter().cloned().collect()),
            )
        })
    }
}

impl<K, V> Gen<BTreeMap<K, V>>
where
    K: Ord + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Generate a map of at most `max` entries.
    ///
    /// Sizing works as for [`Gen::set_of`]; a later entry with an already
    /// drawn key replaces the earlier value.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn map_of(entry: Gen<(K, V)>, min: usize, max: usize) -> Self {
        check_bounds(min, max);
        Gen::new(move |rng| {
            let len = rng.draw_range(min, max);
            entry.samples(rng).take(len).collect()
        })
        .with_shrink(move |map: &BTreeMap<K, V>| {
            let entries: Vec<(K, V)> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            Shrinks::new(
                shorter_lengths(min, entries.len())
                    .map(move |n| entries[..n].iter().cloned().collect()),
            )
        })
    }
}

impl Gen<Vec<u8>> {
    /// Generate a byte string whose length lies in `[min, max]`.
    pub fn bytes(min: usize, max: usize) -> Self {
        Gen::seq_of(Gen::<u8>::any(), min, max)
    }
}
