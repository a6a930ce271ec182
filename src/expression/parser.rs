//! Recursive-descent parser from tokens to an expression tree.

use super::lexer::{Token, TokenKind};
use super::ExpressionError;

/// Maximum nesting of sub-expressions
pub const MAX_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    Ne,
    Near,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sqrt,
    Abs,
    Min,
    Max,
    Floor,
    Ceil,
    Round,
    Exp,
    Ln,
    Log10,
    Pow,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "atan2" => Function::Atan2,
            "sqrt" => Function::Sqrt,
            "abs" => Function::Abs,
            "min" => Function::Min,
            "max" => Function::Max,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "round" => Function::Round,
            "exp" => Function::Exp,
            "ln" => Function::Ln,
            "log10" => Function::Log10,
            "pow" => Function::Pow,
            _ => return None,
        };
        Some(f)
    }

    pub fn arity(self) -> usize {
        match self {
            Function::Atan2 | Function::Min | Function::Max | Function::Pow => 2,
            _ => 1,
        }
    }

    pub fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(0.0);
        let b = args.get(1).copied().unwrap_or(0.0);
        match self {
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Asin => a.asin(),
            Function::Acos => a.acos(),
            Function::Atan => a.atan(),
            Function::Atan2 => a.atan2(b),
            Function::Sqrt => a.sqrt(),
            Function::Abs => a.abs(),
            Function::Min => a.min(b),
            Function::Max => a.max(b),
            Function::Floor => a.floor(),
            Function::Ceil => a.ceil(),
            Function::Round => a.round(),
            Function::Exp => a.exp(),
            Function::Ln => a.ln(),
            Function::Log10 => a.log10(),
            Function::Pow => a.powf(b),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Index into the variable slots
    Var(usize),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    /// Compound assignments carry the operator applied to the old value
    Assign(usize, Option<BinaryOp>, Box<Expr>),
    Call(Function, Vec<Expr>),
    Sequence(Vec<Expr>),
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    variables: &'a [String],
    index: usize,
    depth: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], variables: &'a [String], source_len: usize) -> Self {
        Self {
            tokens,
            variables,
            index: 0,
            depth: 0,
            source_len,
        }
    }

    /// Parse the whole token stream. Trailing tokens are an error.
    pub fn parse(mut self) -> Result<Expr, ExpressionError> {
        let expr = self.sequence()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(unexpected(token)),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn peek_symbol(&self) -> Option<&'static str> {
        match self.peek() {
            Some(Token { kind: TokenKind::Symbol(s), .. }) => Some(*s),
            _ => None,
        }
    }

    fn eat(&mut self, symbol: &str) -> bool {
        if self.peek_symbol() == Some(symbol) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, symbol: &str) -> Result<(), ExpressionError> {
        if self.eat(symbol) {
            return Ok(());
        }
        match self.peek() {
            Some(token) => Err(unexpected(token)),
            None => Err(ExpressionError::UnexpectedEnd { pos: self.source_len }),
        }
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.source_len)
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep { max: MAX_DEPTH, pos: self.current_pos() });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn sequence(&mut self) -> Result<Expr, ExpressionError> {
        let mut items = vec![self.assignment()?];
        while self.eat(";") {
            // Trailing semicolon
            if self.peek().is_none() {
                break;
            }
            items.push(self.assignment()?);
        }
        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(Expr::Sequence(items))
        }
    }

    fn assignment(&mut self) -> Result<Expr, ExpressionError> {
        if let (Some(Token { kind: TokenKind::Ident(name), pos }), Some(next)) =
            (self.peek(), self.tokens.get(self.index + 1))
        {
            let op = match &next.kind {
                TokenKind::Symbol("=") => Some(None),
                TokenKind::Symbol("+=") => Some(Some(BinaryOp::Add)),
                TokenKind::Symbol("-=") => Some(Some(BinaryOp::Sub)),
                TokenKind::Symbol("*=") => Some(Some(BinaryOp::Mul)),
                TokenKind::Symbol("/=") => Some(Some(BinaryOp::Div)),
                _ => None,
            };
            if let Some(op) = op {
                let slot = self.variables.iter().position(|v| v == name).ok_or_else(|| {
                    ExpressionError::InvalidAssignment { name: name.clone(), pos: *pos }
                })?;
                self.index += 2;
                self.enter()?;
                let value = self.assignment()?;
                self.leave();
                return Ok(Expr::Assign(slot, op, Box::new(value)));
            }
        }
        self.ternary()
    }

    fn ternary(&mut self) -> Result<Expr, ExpressionError> {
        let cond = self.or()?;
        if !self.eat("?") {
            return Ok(cond);
        }
        self.enter()?;
        let then = self.assignment()?;
        self.expect(":")?;
        let otherwise = self.assignment()?;
        self.leave();
        Ok(Expr::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise)))
    }

    /// One left-associative precedence level
    fn binary_level(
        &mut self,
        ops: &[(&str, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, ExpressionError>,
    ) -> Result<Expr, ExpressionError> {
        let mut lhs = next(self)?;
        // Each fold nests the tree one level deeper on the left
        let mut folds = 0;
        while let Some(op) = self
            .peek_symbol()
            .and_then(|symbol| ops.iter().find(|(s, _)| *s == symbol))
            .map(|(_, op)| *op)
        {
            self.index += 1;
            self.enter()?;
            folds += 1;
            let rhs = next(self)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= folds;
        Ok(lhs)
    }

    fn or(&mut self) -> Result<Expr, ExpressionError> {
        self.binary_level(&[("||", BinaryOp::Or)], Self::and)
    }

    fn and(&mut self) -> Result<Expr, ExpressionError> {
        self.binary_level(&[("&&", BinaryOp::And)], Self::comparison)
    }

    fn comparison(&mut self) -> Result<Expr, ExpressionError> {
        self.binary_level(
            &[
                ("==", BinaryOp::Eq),
                ("!=", BinaryOp::Ne),
                ("~=", BinaryOp::Near),
                ("<", BinaryOp::Lt),
                ("<=", BinaryOp::Le),
                (">", BinaryOp::Gt),
                (">=", BinaryOp::Ge),
            ],
            Self::additive,
        )
    }

    fn additive(&mut self) -> Result<Expr, ExpressionError> {
        self.binary_level(&[("+", BinaryOp::Add), ("-", BinaryOp::Sub)], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Result<Expr, ExpressionError> {
        self.binary_level(
            &[("*", BinaryOp::Mul), ("/", BinaryOp::Div), ("%", BinaryOp::Rem)],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek_symbol() {
            Some("-") => Some(UnaryOp::Neg),
            Some("!") => Some(UnaryOp::Not),
            Some("+") => None,
            _ => return self.power(),
        };
        self.index += 1;
        self.enter()?;
        let operand = self.unary()?;
        self.leave();
        Ok(match op {
            Some(op) => Expr::Unary(op, Box::new(operand)),
            None => operand,
        })
    }

    /// Right-associative, binds tighter than unary minus on its left
    fn power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.primary()?;
        if !self.eat("^") {
            return Ok(base);
        }
        self.enter()?;
        let exponent = self.unary()?;
        self.leave();
        Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)))
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        let Some(token) = self.peek() else {
            return Err(ExpressionError::UnexpectedEnd { pos: self.source_len });
        };
        match &token.kind {
            TokenKind::Number(n) => {
                self.index += 1;
                Ok(Expr::Number(*n))
            }
            TokenKind::Symbol("(") => {
                self.index += 1;
                self.enter()?;
                let inner = self.sequence()?;
                self.leave();
                self.expect(")")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                self.index += 1;
                if self.peek_symbol() == Some("(") {
                    return self.call(name, token.pos);
                }
                if let Some(slot) = self.variables.iter().position(|v| v == name) {
                    return Ok(Expr::Var(slot));
                }
                match name.as_str() {
                    "pi" => Ok(Expr::Number(std::f64::consts::PI)),
                    "e" => Ok(Expr::Number(std::f64::consts::E)),
                    _ => Err(ExpressionError::UnknownVariable { name: name.clone(), pos: token.pos }),
                }
            }
            TokenKind::Symbol(_) => Err(unexpected(token)),
        }
    }

    fn call(&mut self, name: &str, pos: usize) -> Result<Expr, ExpressionError> {
        let function = Function::lookup(name)
            .ok_or_else(|| ExpressionError::UnknownFunction { name: name.to_string(), pos })?;
        self.expect("(")?;
        self.enter()?;
        let mut args = Vec::new();
        if !self.eat(")") {
            loop {
                args.push(self.assignment()?);
                if self.eat(")") {
                    break;
                }
                self.expect(",")?;
            }
        }
        self.leave();
        if args.len() != function.arity() {
            return Err(ExpressionError::WrongArity {
                name: name.to_string(),
                expected: function.arity(),
                found: args.len(),
                pos,
            });
        }
        Ok(Expr::Call(function, args))
    }
}

fn unexpected(token: &Token) -> ExpressionError {
    let found = match &token.kind {
        TokenKind::Number(n) => n.to_string(),
        TokenKind::Ident(name) => name.clone(),
        TokenKind::Symbol(s) => s.to_string(),
    };
    ExpressionError::UnexpectedToken { found, pos: token.pos }
}
