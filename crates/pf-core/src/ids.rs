use core::fmt;
use core::num::NonZeroU32;

/// Declares a compact, stable handle into a plant-owned array.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Handle>` to be pointer-optimized
macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create a handle from a 0-based index by storing index+1.
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            /// Recover the 0-based index.
            pub fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.index())
            }
        }
    };
}

handle!(
    /// Handle of a tank inside a plant.
    TankId,
    "tank"
);

handle!(
    /// Handle of a pipe segment inside a plant. Segment order is fixed at construction.
    SegmentId,
    "segment"
);
