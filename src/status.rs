//! Sticky exception flags. Conversions never clear flags, they only raise
//! them. The caller owns the flags object and decides when to clear it.

use bitflags::bitflags;

bitflags! {
    /// The set of exceptions that were raised by one or more operations.
    /// See IEEE754-2019 Section 7 - Default exception handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// A NaN was produced or consumed.
        const INVALID = 0b0001;
        /// The rounded result exceeded the largest finite value.
        const OVERFLOW = 0b0010;
        /// The result was tiny and inexact.
        const UNDERFLOW = 0b0100;
        /// The result was rounded.
        const INEXACT = 0b1000;
    }
}

impl Flags {
    /// Raise the flags in `other`.
    pub fn raise(&mut self, other: Flags) {
        self.insert(other);
    }

    /// Lower all of the flags.
    pub fn clear(&mut self) {
        *self = Flags::empty();
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

#[test]
fn test_sticky_flags() {
    let mut flags = Flags::default();
    assert!(flags.is_empty());
    flags.raise(Flags::INEXACT);
    flags.raise(Flags::OVERFLOW);
    flags.raise(Flags::INEXACT);
    assert_eq!(flags, Flags::INEXACT | Flags::OVERFLOW);
    assert!(!flags.contains(Flags::INVALID));
    flags.clear();
    assert!(flags.is_empty());
}
