//! Character and string generators.

use crate::gen::Gen;
use crate::rng::Rng;
use crate::shrink::{shorter_lengths, towards, Shrinks};

/// Which characters a text generator may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `U+0000..=U+007F`.
    Ascii,
    /// Space through tilde.
    AsciiPrintable,
    /// `0-9`.
    AsciiNumeric,
    /// `A-Z` and `a-z`.
    AsciiLetters,
    /// `A-Z`.
    AsciiUpper,
    /// `a-z`.
    AsciiLower,
    /// Every Unicode scalar value.
    Unicode,
    /// Scalar values of the Basic Multilingual Plane.
    UnicodeBmp,
}

impl CharClass {
    /// Inclusive code point ranges, in ascending order.
    fn ranges(self) -> &'static [(u32, u32)] {
        match self {
            CharClass::Ascii => &[(0x00, 0x7f)],
            CharClass::AsciiPrintable => &[(0x20, 0x7e)],
            CharClass::AsciiNumeric => &[(0x30, 0x39)],
            CharClass::AsciiLetters => &[(0x41, 0x5a), (0x61, 0x7a)],
            CharClass::AsciiUpper => &[(0x41, 0x5a)],
            CharClass::AsciiLower => &[(0x61, 0x7a)],
            CharClass::Unicode => &[(0x0000, 0xd7ff), (0xe000, 0x10ffff)],
            CharClass::UnicodeBmp => &[(0x0000, 0xd7ff), (0xe000, 0xffff)],
        }
    }

    /// Number of characters in the class.
    pub fn len(self) -> u32 {
        self.ranges().iter().map(|(lo, hi)| hi - lo + 1).sum()
    }

    /// Classes are never empty.
    pub fn is_empty(self) -> bool {
        false
    }

    /// Whether `c` belongs to the class.
    pub fn contains(self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    /// The `index`-th character of the class, in code point order.
    fn nth(self, mut index: u32) -> char {
        for &(lo, hi) in self.ranges() {
            let width = hi - lo + 1;
            if index < width {
                return char::from_u32(lo + index).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
            index -= width;
        }
        char::REPLACEMENT_CHARACTER
    }

    fn index_of(self, c: char) -> Option<u32> {
        let code = c as u32;
        let mut base = 0;
        for &(lo, hi) in self.ranges() {
            if (lo..=hi).contains(&code) {
                return Some(base + code - lo);
            }
            base += hi - lo + 1;
        }
        None
    }

    fn draw(self, rng: &mut Rng) -> char {
        self.nth(rng.draw_range(0, self.len() - 1))
    }
}

impl Gen<char> {
    /// Generate a character of `class`, shrinking towards the class's first
    /// character.
    pub fn char(class: CharClass) -> Self {
        Gen::new(move |rng| class.draw(rng)).with_shrink(move |&c| match class.index_of(c) {
            Some(index) => Shrinks::new(towards(0, index).map(move |i| class.nth(i))),
            None => Shrinks::empty(),
        })
    }
}

impl Gen<String> {
    /// Generate a string of `class` characters whose length in characters
    /// lies in `[min_len, max_len]`.
    ///
    /// Shrinks to strictly shorter character prefixes not shorter than
    /// `min_len`.
    ///
    /// # Panics
    ///
    /// Panics if `min_len > max_len`.
    pub fn string(class: CharClass, min_len: usize, max_len: usize) -> Self {
        assert!(min_len <= max_len, "string generator requires min_len <= max_len");
        Gen::new(move |rng| {
            let len = rng.draw_range(min_len, max_len);
            (0..len).map(|_| class.draw(rng)).collect()
        })
        .with_shrink(move |s: &String| {
            let chars: Vec<char> = s.chars().collect();
            Shrinks::new(
                shorter_lengths(min_len, chars.len()).map(move |n| chars[..n].iter().collect()),
            )
        })
    }

    /// ASCII string with length in `[min_len, max_len]`.
    pub fn ascii(min_len: usize, max_len: usize) -> Self {
        Self::string(CharClass::Ascii, min_len, max_len)
    }

    /// Unicode string with length in `[min_len, max_len]` characters.
    pub fn unicode(min_len: usize, max_len: usize) -> Self {
        Self::string(CharClass::Unicode, min_len, max_len)
    }
}
