//! Integer constant propagation.

use super::fact::{CPFact, Value};
use super::solver::{Analysis, Direction};
use crate::ir::{BinOp, CmpOp, Condition, Method, Operand, Rvalue, Stmt, StmtIndex, Var};
use crate::world::World;

/// A forward must-analysis computing, for every statement, the most precise
/// known value of every `int`-like variable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantPropagation;

impl Analysis for ConstantPropagation {
    type Fact = CPFact;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn boundary_fact(&self, _world: &World, method: &Method) -> CPFact {
        let mut fact = CPFact::bottom();
        for &param in method.params() {
            fact.set(param, Value::Nac);
        }
        if let Some(this_var) = method.this_var() {
            fact.set(this_var, Value::Nac);
        }
        fact
    }

    fn transfer(&self, _world: &World, method: &Method, node: StmtIndex, fact: &CPFact) -> CPFact {
        let mut out = fact.clone();
        match &method.stmts()[node.index()] {
            Stmt::Assign { lhs, rhs } if method.is_int_like(*lhs) => {
                out.set(*lhs, evaluate(rhs, fact));
            }
            Stmt::Invoke { lhs: Some(lhs), .. } if method.is_int_like(*lhs) => {
                out.set(*lhs, Value::Nac);
            }
            _ => {}
        }
        out
    }
}

fn eval_operand(op: Operand, fact: &CPFact) -> Value {
    match op {
        Operand::Var(v) => fact.get(v),
        Operand::Const(c) => Value::Const(c),
    }
}

/// Evaluates an expression's abstract value given the facts known at its
/// statement.
#[must_use]
pub fn evaluate(rhs: &Rvalue, fact: &CPFact) -> Value {
    match rhs {
        Rvalue::Use(op) => eval_operand(*op, fact),
        Rvalue::Binary(op, l, r) => eval_binary(*op, eval_operand(*l, fact), eval_operand(*r, fact)),
        Rvalue::Cmp(cond) => evaluate_condition(cond, fact),
        // A narrowing/widening cast's result depends on a target width this
        // IR does not track; treat conservatively as unknown.
        Rvalue::Cast(_) => Value::Nac,
        Rvalue::New(_) | Rvalue::StaticFieldLoad(_) | Rvalue::InstanceFieldLoad(..) | Rvalue::ArrayLoad(_) => {
            Value::Nac
        }
    }
}

/// Evaluates a [`Condition`] to `Const(0)`/`Const(1)` when both sides are
/// constant.
#[must_use]
pub fn evaluate_condition(cond: &Condition, fact: &CPFact) -> Value {
    let lhs = eval_operand(cond.lhs, fact);
    let rhs = eval_operand(cond.rhs, fact);
    match (lhs, rhs) {
        (Value::Undef, _) | (_, Value::Undef) => Value::Undef,
        (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
        (Value::Const(a), Value::Const(b)) => {
            let result = match cond.op {
                CmpOp::Eq => a == b,
                CmpOp::Ne => a != b,
                CmpOp::Lt => a < b,
                CmpOp::Gt => a > b,
                CmpOp::Le => a <= b,
                CmpOp::Ge => a >= b,
            };
            Value::Const(i32::from(result))
        }
    }
}

fn eval_binary(op: BinOp, lhs: Value, rhs: Value) -> Value {
    match (lhs, rhs) {
        (Value::Undef, _) | (_, Value::Undef) => Value::Undef,
        (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
        (Value::Const(a), Value::Const(b)) => match op {
            BinOp::Add => Value::Const(a.wrapping_add(b)),
            BinOp::Sub => Value::Const(a.wrapping_sub(b)),
            BinOp::Mul => Value::Const(a.wrapping_mul(b)),
            BinOp::Div => {
                if b == 0 {
                    Value::Undef
                } else {
                    Value::Const(a.wrapping_div(b))
                }
            }
            BinOp::Rem => {
                if b == 0 {
                    Value::Undef
                } else {
                    Value::Const(a.wrapping_rem(b))
                }
            }
            BinOp::Shl => Value::Const(a.wrapping_shl(b as u32 & 0x1f)),
            BinOp::Shr => Value::Const(a.wrapping_shr(b as u32 & 0x1f)),
            BinOp::UShr => Value::Const(((a as u32) >> (b as u32 & 0x1f)) as i32),
            BinOp::And => Value::Const(a & b),
            BinOp::Or => Value::Const(a | b),
            BinOp::Xor => Value::Const(a ^ b),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u32) -> Var {
        Var::new(crate::ir::MethodId::new(0), i)
    }

    #[test]
    fn division_by_zero_is_undef_not_a_panic() {
        let fact = CPFact::bottom();
        let value = eval_binary(BinOp::Div, Value::Const(1), Value::Const(0));
        assert_eq!(value, Value::Undef);
        let _ = fact;
    }

    #[test]
    fn disagreeing_constants_become_nac() {
        assert_eq!(Value::Const(1).meet(Value::Const(2)), Value::Nac);
    }

    #[test]
    fn evaluate_propagates_constant_addition() {
        let mut fact = CPFact::bottom();
        fact.set(v(0), Value::Const(2));
        let rhs = Rvalue::Binary(BinOp::Add, Operand::Var(v(0)), Operand::Const(3));
        assert_eq!(evaluate(&rhs, &fact), Value::Const(5));
    }

    #[test]
    fn evaluate_condition_with_nac_operand_is_nac() {
        let mut fact = CPFact::bottom();
        fact.set(v(0), Value::Nac);
        let cond = Condition {
            op: CmpOp::Eq,
            lhs: Operand::Var(v(0)),
            rhs: Operand::Const(1),
        };
        assert_eq!(evaluate_condition(&cond, &fact), Value::Nac);
    }

    #[test]
    fn unsigned_shift_right_zero_fills() {
        assert_eq!(eval_binary(BinOp::UShr, Value::Const(-1), Value::Const(28)), Value::Const(15));
    }
}
