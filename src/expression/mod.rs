//! Formula language for generated shapes and deformations.
//!
//! Expressions are arithmetic over a fixed set of named variables with
//! comparison, logic, ternary, assignment to declared variables and a small
//! library of pure math functions. There are no loops or calls out of the
//! evaluator, so evaluating a compiled expression costs O(size of the tree).
//!
//! ```text
//! (x^2 + y^2 + z^2 < 1) && (type = 35; data = 14; 1)
//! ```

pub mod lexer;
pub mod parser;

use thiserror::Error;

use parser::{BinaryOp, Expr, Parser, UnaryOp};

/// Compilation failure, with the byte offset into the source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("Unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number '{text}' at {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("Unexpected '{found}' at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of expression at {pos}")]
    UnexpectedEnd { pos: usize },

    #[error("Unknown variable '{name}' at {pos}")]
    UnknownVariable { name: String, pos: usize },

    #[error("Unknown function '{name}' at {pos}")]
    UnknownFunction { name: String, pos: usize },

    #[error("Function '{name}' takes {expected} argument(s), got {found} at {pos}")]
    WrongArity { name: String, expected: usize, found: usize, pos: usize },

    #[error("Cannot assign to '{name}' at {pos}")]
    InvalidAssignment { name: String, pos: usize },

    #[error("Expression nested deeper than {max} levels at {pos}")]
    TooDeep { max: usize, pos: usize },
}

/// Tolerance for `~=`, relative to the larger operand
const NEAR_EPSILON: f64 = 1e-7;

/// A compiled expression bound to an ordered list of variable names.
#[derive(Clone, Debug)]
pub struct Expression {
    root: Expr,
    variables: Vec<String>,
}

impl Expression {
    pub fn compile(source: &str, variables: &[&str]) -> Result<Self, ExpressionError> {
        let variables: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
        let tokens = lexer::tokenize(source)?;
        let root = Parser::new(&tokens, &variables, source.len()).parse()?;
        Ok(Self { root, variables })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Slot index of a variable
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    /// Evaluate with `slots` holding the variables in declaration order.
    /// Assignments write back into `slots`. Missing slots read as 0.
    pub fn evaluate(&self, slots: &mut [f64]) -> f64 {
        eval(&self.root, slots)
    }
}

fn truth(v: f64) -> f64 {
    if v != 0.0 { 1.0 } else { 0.0 }
}

fn eval(expr: &Expr, slots: &mut [f64]) -> f64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Var(i) => slots.get(*i).copied().unwrap_or(0.0),
        Expr::Unary(op, inner) => {
            let v = eval(inner, slots);
            match op {
                UnaryOp::Neg => -v,
                UnaryOp::Not => 1.0 - truth(v),
            }
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            if eval(lhs, slots) == 0.0 {
                0.0
            } else {
                truth(eval(rhs, slots))
            }
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            if eval(lhs, slots) != 0.0 {
                1.0
            } else {
                truth(eval(rhs, slots))
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let a = eval(lhs, slots);
            let b = eval(rhs, slots);
            apply_binary(*op, a, b)
        }
        Expr::Ternary(cond, then, otherwise) => {
            if eval(cond, slots) != 0.0 {
                eval(then, slots)
            } else {
                eval(otherwise, slots)
            }
        }
        Expr::Assign(slot, op, value) => {
            let rhs = eval(value, slots);
            let Some(target) = slots.get_mut(*slot) else {
                return rhs;
            };
            *target = match op {
                Some(op) => apply_binary(*op, *target, rhs),
                None => rhs,
            };
            *target
        }
        Expr::Call(function, args) => {
            let mut values = [0.0; 2];
            for (value, arg) in values.iter_mut().zip(args) {
                *value = eval(arg, slots);
            }
            function.apply(&values[..args.len().min(2)])
        }
        Expr::Sequence(items) => {
            let mut last = 0.0;
            for item in items {
                last = eval(item, slots);
            }
            last
        }
    }
}

fn apply_binary(op: BinaryOp, a: f64, b: f64) -> f64 {
    let flag = |c: bool| if c { 1.0 } else { 0.0 };
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Pow => a.powf(b),
        BinaryOp::Eq => flag(a == b),
        BinaryOp::Ne => flag(a != b),
        BinaryOp::Near => flag((a - b).abs() <= NEAR_EPSILON * a.abs().max(b.abs()).max(1.0)),
        BinaryOp::Lt => flag(a < b),
        BinaryOp::Le => flag(a <= b),
        BinaryOp::Gt => flag(a > b),
        BinaryOp::Ge => flag(a >= b),
        BinaryOp::And => flag(a != 0.0 && b != 0.0),
        BinaryOp::Or => flag(a != 0.0 || b != 0.0),
    }
}
