//! Index types. See [`::index_vec`].

pub use index_vec::{Idx, IndexSlice, IndexVec, index_vec};

pub trait GudIndex: Copy + Eq + Ord + core::hash::Hash + Idx {
    const ZERO: Self;

    fn get(self) -> u32;

    fn iter_to(self, to: Self) -> impl Iterator<Item = Self>;
}

/// Creates a new index to use with [`::index_vec`].
#[macro_export]
macro_rules! newtype_index {
    () => {};
    ($(#[$attr:meta])* $vis:vis struct $name:ident; $($rest:tt)*) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $vis struct $name(std::num::NonZero<u32>);

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.get())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.get())
            }
        }

        impl $crate::index::Idx for $name {
            #[inline(always)]
            fn from_usize(value: usize) -> Self {
                let value = u32::try_from(value).expect("index overflowed");
                Self::new(value)
            }

            #[inline(always)]
            fn index(self) -> usize {
                self.get() as usize
            }
        }

        impl $name {
            /// Creates a new `$name` from the given `value`.
            #[inline(always)]
            $vis const fn new(value: u32) -> Self {
                let inner_repr = value.checked_add(1).expect("index overflowed");
                Self(std::num::NonZero::new(inner_repr).expect("inner_repr should never be zero"))
            }

            /// Gets the underlying index value.
            #[inline(always)]
            $vis const fn get(self) -> u32 {
                self.0.get() - 1
            }
        }

        impl $crate::index::GudIndex for $name {
            const ZERO: Self = Self::new(0);

            fn get(self) -> u32 {
                self.get()
            }

            fn iter_to(self, to: Self) -> impl Iterator<Item = Self> {
                let index = <Self as $crate::Idx>::index;
                (index(self)..index(to)).map($crate::Idx::from_usize)
            }
        }

        $crate::newtype_index!($($rest)*);
    };
}

newtype_index! {
    pub struct ContractId;
    pub struct CanonicalTypeId;
}

/// Insertion ordered set backed by an [`IndexVec`]. Lookups are linear, meant for the short
/// member lists of a single bundle.
pub struct IndexLinearSet<I: Idx, V: PartialEq> {
    inner: IndexVec<I, V>,
}

impl<I: Idx, V: PartialEq> IndexLinearSet<I, V> {
    pub fn new() -> Self {
        Self { inner: IndexVec::new() }
    }

    pub fn with_capacity(size: usize) -> Self {
        Self { inner: IndexVec::with_capacity(size) }
    }

    /// Adds `value`, returning its new index or the index it already occupies.
    pub fn add(&mut self, value: V) -> Result<I, I> {
        self.find(&value).map_or(Ok(()), |i| Err(i))?;
        let new_id = self.len_idx();
        self.inner.push(value);
        Ok(new_id)
    }

    pub fn find(&self, value: &V) -> Option<I> {
        self.position(|member| member == value)
    }

    pub fn into_inner(self) -> IndexVec<I, V> {
        self.inner
    }
}

impl<I: Idx, V: PartialEq> Default for IndexLinearSet<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Idx, V: PartialEq> std::ops::Deref for IndexLinearSet<I, V> {
    type Target = IndexVec<I, V>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    newtype_index!(
        struct MyIndex;
    );

    #[test]
    fn test_newtype_index() {
        assert_eq!(MyIndex::new(0).get(), 0);
        assert_eq!(MyIndex::new(1).get(), 1);
        assert_eq!(MyIndex::new(0xFFFF_FF00).get(), 0xFFFF_FF00);
    }

    #[test]
    fn test_index_size() {
        assert_eq!(std::mem::size_of::<MyIndex>(), 4);
        assert_eq!(std::mem::size_of::<Option<MyIndex>>(), 4);
        assert_eq!(std::mem::size_of::<ContractId>(), 4);
        assert_eq!(std::mem::size_of::<Option<CanonicalTypeId>>(), 4);
    }

    #[test]
    fn test_iter_to() {
        let ids: Vec<_> = MyIndex::ZERO.iter_to(MyIndex::new(3)).collect();
        assert_eq!(ids, vec![MyIndex::new(0), MyIndex::new(1), MyIndex::new(2)]);
    }

    #[test]
    fn test_linear_set_keeps_first_position() {
        let mut set: IndexLinearSet<MyIndex, &str> = IndexLinearSet::new();
        assert_eq!(set.add("a"), Ok(MyIndex::new(0)));
        assert_eq!(set.add("b"), Ok(MyIndex::new(1)));
        assert_eq!(set.add("a"), Err(MyIndex::new(0)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_inner().raw, vec!["a", "b"]);
    }
}
