//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into flat `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identity of a pedestrian, unique within one simulation session.
    pub struct PedestrianId(u32);
}

typed_id! {
    /// Flat row-major index of a cell in the grid arena
    /// (`index = row * cols + col`).  Pedestrians refer to their cell by
    /// this index rather than holding a reference the grid also owns.
    pub struct CellIndex(u32);
}

// ── PedestrianIdGen ───────────────────────────────────────────────────────────

/// Monotonic source of [`PedestrianId`]s, owned by the simulation session.
///
/// Each session gets its own generator, so concurrent test runs never share
/// id state.  Ids start at 1 and ascend in creation order; the ordering is
/// what makes the per-tick pedestrian scan deterministic.
#[derive(Debug, Clone, Default)]
pub struct PedestrianIdGen {
    next: u32,
}

impl PedestrianIdGen {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Hand out the next id.  Never returns the same id twice.
    #[inline]
    pub fn fresh(&mut self) -> PedestrianId {
        self.next += 1;
        PedestrianId(self.next)
    }

    /// How many ids have been issued so far.
    #[inline]
    pub fn issued(&self) -> u32 {
        self.next
    }
}
