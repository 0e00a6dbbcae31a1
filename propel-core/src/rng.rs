//! Deterministic random source.
//!
//! [`Rng`] is a xorshift64* generator seeded through a SplitMix64 finaliser.
//! Two sources built from the same seed yield identical draw sequences for
//! their whole lifetime, which is what makes failing runs reproducible.

use crate::data::{splitmix64_mix, Seed};

/// Substitute state for seeds whose mixed value is zero, a fixed point of
/// xorshift.
const NONZERO_STATE: u64 = 0x853c49e6748fea9b;

/// Multiplier of the xorshift64* output scrambler.
const XORSHIFT_STAR_MULTIPLIER: u64 = 0x2545f4914f6cdd1d;

/// Seeded pseudo-random source used by every generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a source from a raw 64-bit seed.
    pub fn new(seed: u64) -> Self {
        let state = splitmix64_mix(seed);
        Rng {
            state: if state == 0 { NONZERO_STATE } else { state },
        }
    }

    /// Create a source from a [`Seed`].
    pub fn from_seed(seed: Seed) -> Self {
        Rng::new(seed.get())
    }

    /// Next raw 64-bit output.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(XORSHIFT_STAR_MULTIPLIER)
    }

    /// Draw a fair boolean.
    #[inline]
    pub fn draw_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Draw uniformly from the closed range `[min, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn draw_range<T: Uniform>(&mut self, min: T, max: T) -> T {
        assert!(min <= max, "draw_range called with min > max");
        let span = max.offset_from(min);
        min.add_offset(self.draw_offset(span))
    }

    /// Draw a float in `[0, 1)` with 53 bits of precision.
    pub fn draw_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.draw_range(0, i);
            items.swap(i, j);
        }
    }

    /// Uniform offset in `[0, span]` by masked rejection.
    fn draw_offset(&mut self, span: u128) -> u128 {
        if span == 0 {
            return 0;
        }
        if span == u128::MAX {
            return self.next_u128();
        }
        let mask = u128::MAX >> span.leading_zeros();
        loop {
            let raw = if mask <= u64::MAX as u128 {
                self.next_u64() as u128
            } else {
                self.next_u128()
            };
            let candidate = raw & mask;
            if candidate <= span {
                return candidate;
            }
        }
    }

    fn next_u128(&mut self) -> u128 {
        let hi = self.next_u64() as u128;
        let lo = self.next_u64() as u128;
        (hi << 64) | lo
    }
}

impl rand::RngCore for Rng {
    fn next_u32(&mut self) -> u32 {
        (Rng::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = Rng::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl rand::SeedableRng for Rng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Rng::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Rng::new(state)
    }
}

/// Integer types [`Rng::draw_range`] can draw.
///
/// Values are mapped onto an unsigned offset from the lower bound so a
/// single drawing routine covers every width and signedness.
pub trait Uniform: Copy + PartialOrd {
    /// Distance from `min` to `self`, assuming `min <= self`.
    fn offset_from(self, min: Self) -> u128;

    /// The value `offset` steps above `self`.
    fn add_offset(self, offset: u128) -> Self;
}

macro_rules! impl_uniform {
    ($(($t:ty, $u:ty)),* $(,)?) => {
        $(
            impl Uniform for $t {
                #[inline]
                fn offset_from(self, min: Self) -> u128 {
                    (self as $u).wrapping_sub(min as $u) as u128
                }

                #[inline]
                fn add_offset(self, offset: u128) -> Self {
                    (self as $u).wrapping_add(offset as $u) as $t
                }
            }
        )*
    };
}

impl_uniform!(
    (u8, u8),
    (u16, u16),
    (u32, u32),
    (u64, u64),
    (u128, u128),
    (usize, usize),
    (i8, u8),
    (i16, u16),
    (i32, u32),
    (i64, u64),
    (i128, u128),
    (isize, usize),
);
