//! The lattice elements carried by concrete analyses: a three-point integer
//! [`Value`], a [`CPFact`] map of variable to `Value`, and a generic
//! [`SetFact`] for may-analyses like liveness.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use derive_more::Display;

use crate::dataflow::Lattice;
use crate::ir::Var;

/// The constant-propagation abstract value for a single variable:
/// `Undef ⊑ Const(i) ⊑ Nac`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Value {
    /// Not yet known to hold any value (lattice bottom).
    #[display("UNDEF")]
    Undef,
    /// Known to hold exactly this constant on every path reaching here.
    #[display("{_0}")]
    Const(i32),
    /// Not a constant: known to vary across paths (lattice top).
    #[display("NAC")]
    Nac,
}

impl Value {
    /// Combines two values seen along different paths into one.
    #[must_use]
    pub fn meet(self, other: Self) -> Self {
        match (self, other) {
            (Self::Undef, v) | (v, Self::Undef) => v,
            (Self::Nac, _) | (_, Self::Nac) => Self::Nac,
            (Self::Const(a), Self::Const(b)) => {
                if a == b {
                    Self::Const(a)
                } else {
                    Self::Nac
                }
            }
        }
    }

    /// Whether this value is a known constant.
    #[must_use]
    pub const fn as_const(self) -> Option<i32> {
        match self {
            Self::Const(i) => Some(i),
            Self::Undef | Self::Nac => None,
        }
    }
}

/// A map from variable to its [`Value`]; absent entries are implicitly
/// `Undef`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CPFact(BTreeMap<Var, Value>);

impl CPFact {
    /// The value known for `var`, `Undef` if untracked.
    #[must_use]
    pub fn get(&self, var: Var) -> Value {
        self.0.get(&var).copied().unwrap_or(Value::Undef)
    }

    /// Records `value` for `var`, dropping the entry entirely if it is
    /// `Undef` (keeping the map's memory proportional to live knowledge).
    pub fn set(&mut self, var: Var, value: Value) {
        if value == Value::Undef {
            self.0.remove(&var);
        } else {
            self.0.insert(var, value);
        }
    }

    /// Iterates over the variables this fact has non-`Undef` knowledge of.
    pub fn iter(&self) -> impl Iterator<Item = (Var, Value)> + '_ {
        self.0.iter().map(|(&v, &val)| (v, val))
    }
}

impl Lattice for CPFact {
    fn bottom() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (&var, &val) in &other.0 {
            let merged = result.get(var).meet(val);
            result.set(var, merged);
        }
        result
    }
}

impl fmt::Display for CPFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = self.0.iter();
        write!(f, "{{")?;
        if let Some((var, val)) = entries.next() {
            write!(f, "{var}={val}")?;
            for (var, val) in entries {
                write!(f, ", {var}={val}")?;
            }
        }
        write!(f, "}}")
    }
}

/// A set-valued fact for may-analyses: bottom is the empty set, combination
/// is union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFact<T: Ord + Clone>(BTreeSet<T>);

impl<T: Ord + Clone> SetFact<T> {
    /// Whether `item` is a member.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }

    /// Inserts `item`, returning whether it was newly added.
    pub fn insert(&mut self, item: T) -> bool {
        self.0.insert(item)
    }

    /// Removes `item`, returning whether it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        self.0.remove(item)
    }

    /// Iterates over members.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Ord + Clone> Default for SetFact<T> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord + Clone> Lattice for SetFact<T> {
    fn bottom() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_meet_is_commutative_and_has_undef_identity() {
        assert_eq!(Value::Undef.meet(Value::Const(1)), Value::Const(1));
        assert_eq!(Value::Const(1).meet(Value::Undef), Value::Const(1));
        assert_eq!(Value::Const(1).meet(Value::Const(2)), Value::Nac);
        assert_eq!(Value::Const(1).meet(Value::Const(1)), Value::Const(1));
        assert_eq!(Value::Nac.meet(Value::Const(1)), Value::Nac);
    }

    #[test]
    fn cpfact_combine_meets_disagreeing_constants_to_nac() {
        let var = Var::new(crate::ir::MethodId::new(0), 0);
        let mut a = CPFact::bottom();
        a.set(var, Value::Const(1));
        let mut b = CPFact::bottom();
        b.set(var, Value::Const(2));
        assert_eq!(a.combine(&b).get(var), Value::Nac);
    }

    #[test]
    fn cpfact_unset_entry_reads_as_undef() {
        let var = Var::new(crate::ir::MethodId::new(0), 0);
        assert_eq!(CPFact::bottom().get(var), Value::Undef);
    }
}
