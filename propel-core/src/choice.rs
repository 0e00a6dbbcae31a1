//! Weighted and uniform choice among alternatives.

use crate::error::{PropelError, Result};
use crate::gen::Gen;
use crate::rng::Rng;
use crate::shrink::Shrinks;
use std::sync::Arc;

/// A generator paired with its selection weight.
#[derive(Clone)]
pub struct WeightedChoice<T> {
    pub weight: usize,
    pub gen: Gen<T>,
}

impl<T> WeightedChoice<T> {
    pub fn new(weight: usize, gen: Gen<T>) -> Self {
        WeightedChoice { weight, gen }
    }
}

/// Non-empty table of alternatives with positive weights.
struct FrequencyTable<T> {
    entries: Vec<WeightedChoice<T>>,
    total: usize,
}

impl<T: 'static> FrequencyTable<T> {
    fn build(choices: Vec<WeightedChoice<T>>) -> Result<Self> {
        let entries: Vec<_> = choices.into_iter().filter(|c| c.weight > 0).collect();
        if entries.is_empty() {
            return Err(PropelError::EmptyGenerator);
        }
        let total = entries
            .iter()
            .try_fold(0usize, |sum, c| sum.checked_add(c.weight))
            .ok_or_else(|| PropelError::InvalidGenerator {
                message: "sum of frequency weights overflows usize".to_string(),
            })?;
        Ok(FrequencyTable { entries, total })
    }

    /// Inverse-CDF pick over the running weight sum.
    fn pick(&self, rng: &mut Rng) -> &Gen<T> {
        let desired = rng.draw_range(1, self.total);
        let mut running = 0;
        for entry in &self.entries {
            if running < desired && desired <= running + entry.weight {
                return &entry.gen;
            }
            running += entry.weight;
        }
        // desired <= total, so the scan above always returns
        &self.entries[self.entries.len() - 1].gen
    }
}

impl<T: 'static> Gen<T> {
    /// Choose among generators with probability proportional to their weights.
    ///
    /// Zero-weight entries are discarded and never selected. Fails with
    /// [`PropelError::EmptyGenerator`] if nothing selectable remains. The
    /// result does not shrink.
    pub fn frequency(choices: Vec<WeightedChoice<T>>) -> Result<Self> {
        let table = FrequencyTable::build(choices)?;
        Ok(Gen::new(move |rng| table.pick(rng).generate(rng)))
    }

    /// Like [`Gen::frequency`], but an empty table is only reported when the
    /// generator is first used.
    ///
    /// # Panics
    ///
    /// `generate` panics if no alternative has a non-zero weight.
    pub fn frequency_unchecked(choices: Vec<WeightedChoice<T>>) -> Self {
        let table = FrequencyTable::build(choices);
        Gen::new(move |rng| match &table {
            Ok(table) => table.pick(rng).generate(rng),
            Err(e) => panic!(
                "{}",
                PropelError::GeneratorFailed {
                    reason: e.to_string()
                }
            ),
        })
    }
}

impl<T> Gen<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Pick uniformly from a fixed list of values.
    ///
    /// Shrinks towards entries earlier in the list. Fails with
    /// [`PropelError::EmptyGenerator`] on an empty list.
    pub fn one_of(values: Vec<T>) -> Result<Self> {
        if values.is_empty() {
            return Err(PropelError::EmptyGenerator);
        }
        Ok(Self::pick_from(Arc::new(values)))
    }

    /// Like [`Gen::one_of`], but an empty list is only reported when the
    /// generator is first used.
    ///
    /// # Panics
    ///
    /// `generate` panics if `values` is empty.
    pub fn one_of_unchecked(values: Vec<T>) -> Self {
        if values.is_empty() {
            return Gen::new(|_rng| {
                panic!(
                    "{}",
                    PropelError::GeneratorFailed {
                        reason: PropelError::EmptyGenerator.to_string()
                    }
                )
            });
        }
        Self::pick_from(Arc::new(values))
    }

    fn pick_from(values: Arc<Vec<T>>) -> Self {
        let candidates = Arc::clone(&values);
        Gen::new(move |rng| values[rng.draw_range(0, values.len() - 1)].clone()).with_shrink(
            move |value| {
                let Some(position) = candidates.iter().position(|v| v == value) else {
                    return Shrinks::empty();
                };
                let values = Arc::clone(&candidates);
                let current = value.clone();
                Shrinks::new(
                    (0..position)
                        .rev()
                        .map(move |i| values[i].clone())
                        .filter(move |v| *v != current),
                )
            },
        )
    }
}
