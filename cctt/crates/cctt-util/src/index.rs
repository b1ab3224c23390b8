//! Typed indices into contiguous buffers.
//!
//! Tokens reference each other (pair links, parent links) and those
//! references are cyclic, so they cannot be owning. Instead every token
//! lives in one contiguous vector and links are stored as compact typed
//! indices into it: the buffer owns, the links borrow.

/// Trait for types usable as indices into a vector.
///
/// Implementations must round-trip: `from_usize(i).index() == i` for all
/// valid indices.
///
/// # Examples
///
/// ```
/// use cctt_util::Idx;
///
/// cctt_util::define_idx!(NodeId);
///
/// let id = NodeId::from_usize(3);
/// assert_eq!(id.index(), 3);
/// ```
pub trait Idx: Copy + Eq + PartialEq {
    /// Convert a `usize` position into the index type.
    ///
    /// # Panics
    ///
    /// Panics if `idx` exceeds the capacity of the underlying
    /// representation.
    fn from_usize(idx: usize) -> Self;

    /// Convert the index back to a `usize` for slice indexing.
    fn index(self) -> usize;
}

/// Define a `u32`-backed index type implementing [`Idx`].
#[macro_export]
macro_rules! define_idx {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $crate::Idx for $name {
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize);
                $name(idx as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
