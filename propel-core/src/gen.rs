//! Generator combinators for property-based testing.

use crate::rng::Rng;
use crate::shrink::{towards, Shrinks};
use std::sync::Arc;

type GenerateFn<T> = dyn Fn(&mut Rng) -> T + Send + Sync;
type ShrinkFn<T> = dyn Fn(&T) -> Shrinks<T> + Send + Sync;

/// A generator for test data of type `T`.
///
/// Generators are explicit, first-class values that can be composed
/// using combinator functions. A generator is immutable: every combinator
/// returns a new generator, and cloning one only bumps reference counts.
///
/// Besides producing values, a generator may know how to shrink a value it
/// produced into a finite stream of strictly smaller candidates. Shrinking
/// never consumes randomness.
pub struct Gen<T> {
    generator: Arc<GenerateFn<T>>,
    shrinker: Option<Arc<ShrinkFn<T>>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            generator: Arc::clone(&self.generator),
            shrinker: self.shrinker.clone(),
        }
    }
}

/// A value drawn from one of two generators, see [`Gen::union`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<T: 'static> Gen<T> {
    /// Create a new generator from a function. The generator does not shrink.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Rng) -> T + Send + Sync + 'static,
    {
        Gen {
            generator: Arc::new(f),
            shrinker: None,
        }
    }

    /// Attach a shrink function.
    ///
    /// Every candidate the function yields must be strictly smaller than the
    /// value it was derived from, by whatever size notion the generator uses.
    pub fn with_shrink<S>(self, shrinker: S) -> Self
    where
        S: Fn(&T) -> Shrinks<T> + Send + Sync + 'static,
    {
        Gen {
            generator: self.generator,
            shrinker: Some(Arc::new(shrinker)),
        }
    }

    /// Drop shrink support.
    pub fn without_shrink(self) -> Self {
        Gen {
            generator: self.generator,
            shrinker: None,
        }
    }

    /// Generate a value, consuming randomness from `rng`.
    pub fn generate(&self, rng: &mut Rng) -> T {
        (self.generator)(rng)
    }

    /// Split a value into itself and its shrink candidates.
    pub fn shrink(&self, value: T) -> (T, Shrinks<T>) {
        let candidates = self.candidates(&value);
        (value, candidates)
    }

    /// Shrink candidates for `value`, empty when the generator does not shrink.
    pub fn candidates(&self, value: &T) -> Shrinks<T> {
        match &self.shrinker {
            Some(shrinker) => shrinker(value),
            None => Shrinks::empty(),
        }
    }

    /// Whether this generator has shrink support.
    pub fn can_shrink(&self) -> bool {
        self.shrinker.is_some()
    }

    /// An unbounded lazy sequence of values drawn from `rng`.
    ///
    /// The view borrows `rng` exclusively for its lifetime; truncate it with
    /// `take` or similar.
    pub fn samples<'a>(&'a self, rng: &'a mut Rng) -> Samples<'a, T> {
        Samples { gen: self, rng }
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Gen::new(move |_rng| value.clone())
    }

    /// Map a function over the generated values.
    ///
    /// The result does not shrink: the inner generator's shrink stream cannot
    /// be reached from a `U`. Use [`Gen::map_with_inverse`] when the mapping
    /// can be undone.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        U: 'static,
    {
        Gen::new(move |rng| f(self.generate(rng)))
    }

    /// Map with an inverse, keeping shrink support.
    ///
    /// A value is shrunk by pulling it back through `inverse`, shrinking with
    /// this generator, and pushing every candidate forward through `f`.
    pub fn map_with_inverse<U, F, G>(self, f: F, inverse: G) -> Gen<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        G: Fn(&U) -> T + Send + Sync + 'static,
        U: 'static,
    {
        let f = Arc::new(f);
        let forward = Arc::clone(&f);
        let inner = self.clone();
        Gen::new(move |rng| forward(self.generate(rng))).with_shrink(move |value: &U| {
            let f = Arc::clone(&f);
            Shrinks::new(inner.candidates(&inverse(value)).map(move |t| f(t)))
        })
    }

    /// Bind/flatmap for dependent generation.
    ///
    /// The dependent generator draws from the same `rng` right after this
    /// one. The result does not shrink.
    pub fn bind<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + Send + Sync + 'static,
        U: 'static,
    {
        Gen::new(move |rng| {
            let value = self.generate(rng);
            f(value).generate(rng)
        })
    }

    /// Alias of [`Gen::bind`].
    pub fn flat_map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + Send + Sync + 'static,
        U: 'static,
    {
        self.bind(f)
    }

    /// Filter generated values by a predicate.
    ///
    /// Draws until a value satisfies `predicate`. A predicate that (almost)
    /// never holds makes generation loop forever; keeping the acceptance
    /// rate reasonable is up to the caller. Shrink candidates are the inner
    /// generator's candidates that satisfy `predicate`.
    pub fn filter<P>(self, predicate: P) -> Gen<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let accept = Arc::clone(&predicate);
        let inner = self.clone();
        let filtered = Gen::new(move |rng| loop {
            let value = self.generate(rng);
            if accept(&value) {
                return value;
            }
        });
        if !inner.can_shrink() {
            return filtered;
        }
        filtered.with_shrink(move |value| {
            let predicate = Arc::clone(&predicate);
            Shrinks::new(inner.candidates(value).filter(move |c| predicate(c)))
        })
    }

    /// Choose between this generator and `other` with equal probability.
    ///
    /// Each side keeps its own shrink behaviour, tagged with its case.
    pub fn union<U: 'static>(self, other: Gen<U>) -> Gen<Either<T, U>> {
        let left = self.clone();
        let right = other.clone();
        Gen::new(move |rng| {
            if rng.draw_bool() {
                Either::Left(self.generate(rng))
            } else {
                Either::Right(other.generate(rng))
            }
        })
        .with_shrink(move |value| match value {
            Either::Left(l) => Shrinks::new(left.candidates(l).map(Either::Left)),
            Either::Right(r) => Shrinks::new(right.candidates(r).map(Either::Right)),
        })
    }
}

impl<T> Gen<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Generate pairs, shrinking the first component and then the second.
    pub fn zip<U>(self, other: Gen<U>) -> Gen<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let (first, second) = (self.clone(), other.clone());
        Gen::new(move |rng| {
            let a = self.generate(rng);
            let b = other.generate(rng);
            (a, b)
        })
        .with_shrink(move |(a, b)| {
            let (a1, b1) = (a.clone(), b.clone());
            let lefts = first.candidates(a).map(move |a2| (a2, b1.clone()));
            let rights = second.candidates(b).map(move |b2| (a1.clone(), b2));
            Shrinks::new(lefts.chain(rights))
        })
    }

    /// Generate triples, shrinking one component at a time.
    pub fn zip3<U, V>(self, second: Gen<U>, third: Gen<V>) -> Gen<(T, U, V)>
    where
        U: Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.zip(second.zip(third))
            .map_with_inverse(|(a, (b, c))| (a, b, c), |(a, b, c)| {
                (a.clone(), (b.clone(), c.clone()))
            })
    }
}

/// Infinite lazy view of values drawn from one generator and one source.
pub struct Samples<'a, T> {
    gen: &'a Gen<T>,
    rng: &'a mut Rng,
}

impl<T: 'static> Iterator for Samples<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        Some(self.gen.generate(self.rng))
    }
}

/// Primitive generators.
impl Gen<bool> {
    /// Generate a random boolean, shrinking `true` to `false`.
    pub fn bool() -> Self {
        Gen::new(|rng| rng.draw_bool()).with_shrink(|&value| {
            if value {
                Shrinks::new([false])
            } else {
                Shrinks::empty()
            }
        })
    }
}

impl Gen<()> {
    /// The generator of the unit value.
    pub fn unit() -> Self {
        Gen::constant(())
    }
}

/// Shrink target for a range: zero when it lies inside, else the bound
/// closest to zero.
fn origin_of<T: PartialOrd + Copy>(min: T, max: T, zero: T) -> T {
    if min <= zero && zero <= max {
        zero
    } else if min > zero {
        min
    } else {
        max
    }
}

macro_rules! integer_generators {
    ($($t:ty),* $(,)?) => {
        $(
            impl Gen<$t> {
                /// Generate an integer in `[min, max]`, shrinking towards zero
                /// or the bound closest to it.
                ///
                /// # Panics
                ///
                /// Panics if `min > max`.
                pub fn range(min: $t, max: $t) -> Self {
                    assert!(min <= max, "range generator requires min <= max");
                    let origin = origin_of(min, max, 0 as $t);
                    Gen::new(move |rng| rng.draw_range(min, max))
                        .with_shrink(move |&value| towards(origin, value))
                }

                /// Generate any value of the type.
                pub fn any() -> Self {
                    Self::range(<$t>::MIN, <$t>::MAX)
                }
            }
        )*
    };
}

integer_generators!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Gen<i32> {
    /// Generate a positive integer.
    pub fn positive() -> Self {
        Self::range(1, i32::MAX)
    }

    /// Generate a natural number (including zero).
    pub fn natural() -> Self {
        Self::range(0, i32::MAX)
    }
}
