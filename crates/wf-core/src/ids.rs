use core::fmt;
use core::num::NonZeroU32;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create an id from a 0-based arena position (stored as position+1).
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            /// Recover the 0-based arena position.
            pub fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.index())
            }
        }
    };
}

arena_id!(
    /// Identity of a node (equipment item) in a flow network.
    ///
    /// `NonZero` storage keeps `Option<NodeId>` the same size as `NodeId`.
    NodeId,
    "n"
);

arena_id!(
    /// Identity of a pipe segment connecting two nodes.
    SegmentId,
    "s"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            assert_eq!(NodeId::from_index(i).index(), i as usize);
            assert_eq!(SegmentId::from_index(i).index(), i as usize);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<NodeId>(),
            core::mem::size_of::<Option<NodeId>>()
        );
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(NodeId::from_index(3).to_string(), "n3");
        assert_eq!(SegmentId::from_index(0).to_string(), "s0");
    }
}
