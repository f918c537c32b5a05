//! Fixed-width bitsets describing which component kinds are attached.

use std::fmt;

use crate::component::ComponentId;

/// Maximum count of distinct component kinds in one world.
///
/// One signature bit exists per registered kind, so this bounds
/// registration, not attachment: any number of entities may carry any
/// subset of the registered kinds.
pub const MAX_COMPONENTS: usize = 32;

/// A set of component kinds, one bit per [`ComponentId`].
///
/// Each entity owns the signature of the kinds currently attached to it;
/// each system owns the signature of the kinds it requires. An entity is a
/// member of a system exactly while its signature is a superset of the
/// system's.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u32);

impl Signature {
    /// The signature with no component kinds.
    pub const EMPTY: Self = Self(0);

    /// Returns `true` if no kinds are in this signature.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this signature contains the kind.
    pub const fn test(self, id: ComponentId) -> bool {
        self.0 & Self::bit(id) != 0
    }

    /// Adds a kind to this signature.
    pub fn set(&mut self, id: ComponentId) {
        self.0 |= Self::bit(id);
    }

    /// Removes a kind from this signature.
    pub fn clear(&mut self, id: ComponentId) {
        self.0 &= !Self::bit(id);
    }

    /// Adds a kind and returns `self`.
    pub fn with(mut self, id: ComponentId) -> Self {
        self.set(id);

        self
    }

    /// Returns `true` if every kind in `other` is also in `self`.
    pub const fn is_superset_of(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    const fn bit(id: ComponentId) -> u32 {
        debug_assert!(id.index() < MAX_COMPONENTS);

        1 << id.index()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_test_clear() {
        let mut signature = Signature::EMPTY;

        assert!(signature.is_empty());
        assert!(!signature.test(ComponentId(3)));

        signature.set(ComponentId(3));

        assert!(signature.test(ComponentId(3)));
        assert!(!signature.test(ComponentId(2)));

        signature.clear(ComponentId(3));

        assert!(signature.is_empty());
    }

    #[test]
    fn clearing_an_absent_kind_is_a_no_op() {
        let mut signature = Signature::EMPTY.with(ComponentId(1));

        signature.clear(ComponentId(7));

        assert_eq!(signature, Signature::EMPTY.with(ComponentId(1)));
    }

    #[test]
    fn superset_matching() {
        let a = Signature::EMPTY.with(ComponentId(0));
        let a_b = a.with(ComponentId(1));
        let b_c = Signature::EMPTY.with(ComponentId(1)).with(ComponentId(2));

        assert!(a.is_superset_of(Signature::EMPTY));
        assert!(a.is_superset_of(a));
        assert!(a_b.is_superset_of(a));

        assert!(!a.is_superset_of(a_b));
        assert!(!a_b.is_superset_of(b_c));
    }
}
