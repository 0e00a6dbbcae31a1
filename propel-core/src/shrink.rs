//! Shrink candidate streams.

use crate::rng::Uniform;
use std::fmt;
use std::iter;

/// A lazy, finite, non-restartable sequence of shrink candidates derived
/// from one sample.
///
/// Generators order candidates from the most conservative step to the most
/// aggressive one; the runner walks the stream while candidates keep failing.
pub struct Shrinks<T> {
    inner: Box<dyn Iterator<Item = T> + Send>,
}

impl<T: 'static> Shrinks<T> {
    /// A stream with no candidates.
    pub fn empty() -> Self {
        Shrinks {
            inner: Box::new(iter::empty()),
        }
    }

    /// Wrap any sendable iterator of candidates.
    pub fn new<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Shrinks {
            inner: Box::new(candidates.into_iter()),
        }
    }
}

impl<T> Iterator for Shrinks<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }
}

impl<T> fmt::Debug for Shrinks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinks").finish_non_exhaustive()
    }
}

/// Candidates moving from `value` towards `origin`.
///
/// The distance to `origin` shrinks by 1, 2, 4, ... and the last candidate
/// is `origin` itself, so every candidate is strictly closer to `origin`
/// than `value` and the stream is empty when `value == origin`.
pub fn towards<T>(origin: T, value: T) -> Shrinks<T>
where
    T: Uniform + Send + 'static,
{
    let above = value >= origin;
    let distance = if above {
        value.offset_from(origin)
    } else {
        origin.offset_from(value)
    };

    let steps = iter::successors(Some(1u128), |step| step.checked_mul(2))
        .take_while(move |&step| step < distance)
        .map(move |step| {
            if above {
                origin.add_offset(distance - step)
            } else {
                value.add_offset(step)
            }
        });
    let last = (distance > 0).then_some(origin);

    Shrinks::new(steps.chain(last))
}

/// Lengths strictly below `len` and not below `floor`, nearest first.
pub(crate) fn shorter_lengths(floor: usize, len: usize) -> Shrinks<usize> {
    if len <= floor {
        return Shrinks::empty();
    }
    towards(floor, len)
}
