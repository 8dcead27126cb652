//! A generic monotone dataflow framework: a worklist solver parameterized
//! by an [`Analysis`] and a per-node [`Lattice`] fact.
//!
//! # Theoretical background
//!
//! An analysis defines a lattice of facts and a transfer function over CFG
//! statements. Starting every node at the lattice bottom (except the
//! boundary node, which starts at the analysis's initial fact), the solver
//! repeatedly recomputes a node's incoming fact as the combination of its
//! neighbors' outgoing facts and re-applies the transfer function, until no
//! node's fact changes. Because the lattice has finite height and both
//! `combine` and the transfer function are monotone, this process always
//! terminates at the least fixed point.

pub mod constprop;
pub mod dead_code;
pub mod fact;
pub mod live_vars;
pub mod result;
pub mod solver;

pub use result::DataflowResult;
pub use solver::{Analysis, Direction, solve};

/// A lattice fact combined at CFG merge points.
///
/// For a forward *must* analysis like constant propagation this is a meet
/// (disagreement moves toward top); for a backward *may* analysis like
/// liveness this is a join (any path contributes membership). The solver
/// treats both uniformly as a single confluence operator.
pub trait Lattice: Clone + PartialEq {
    /// The least element: no information yet.
    fn bottom() -> Self;

    /// Combines facts arriving from two different paths into one.
    #[must_use]
    fn combine(&self, other: &Self) -> Self;
}

impl<T: Lattice> Lattice for Option<T> {
    fn bottom() -> Self {
        None
    }

    fn combine(&self, other: &Self) -> Self {
        match (self, other) {
            (None, x) | (x, None) => x.clone(),
            (Some(a), Some(b)) => Some(a.combine(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::fact::Value;

    fn value_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![Just(Value::Undef), (-8i32..8).prop_map(Value::Const), Just(Value::Nac),]
    }

    proptest! {
        #[test]
        fn meet_is_commutative(a in value_strategy(), b in value_strategy()) {
            prop_assert_eq!(a.meet(b), b.meet(a));
        }

        #[test]
        fn meet_is_idempotent(a in value_strategy()) {
            prop_assert_eq!(a.meet(a), a);
        }

        #[test]
        fn undef_is_meet_identity(a in value_strategy()) {
            prop_assert_eq!(a.meet(Value::Undef), a);
        }

        #[test]
        fn nac_absorbs(a in value_strategy()) {
            prop_assert_eq!(a.meet(Value::Nac), Value::Nac);
        }
    }
}
