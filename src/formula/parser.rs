//! Formula parser - converts formula strings into an AST.
//!
//! Supports: number literals, variable identifiers (minimum five characters),
//! the reduction calls `max`/`min`/`sum`, and a single binary-operator split
//! per expression. A reduction's argument is a full sub-expression, so
//! `sum(costs_by_unit) / total_supply` and `max(alpha_dps / alpha_cost)` both
//! parse, while chains like `a_var / b_var / c_var` are rejected.

use super::FormulaError;

/// Expression AST. Small on purpose: there is nothing else in the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Ident(String),
    Reduce { func: Reduction, arg: Box<Expr> },
    Binary { op: Op, left: Box<Expr>, right: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Max,
    Min,
    Sum,
}

impl Reduction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "max" => Some(Reduction::Max),
            "min" => Some(Reduction::Min),
            "sum" => Some(Reduction::Sum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Identifiers shorter than this are not variable references. The grammar
/// reserves short names for reduction functions.
pub const MIN_IDENT_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = s
                    .parse::<f64>()
                    .map_err(|_| FormulaError::Parse(format!("bad number `{s}`")))?;
                tokens.push(Token::Number(n));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(s));
            }
            c => {
                return Err(FormulaError::Parse(format!("unexpected character `{c}`")));
            }
        }
    }
    Ok(tokens)
}

/// Parse a formula string into an AST.
pub fn parse(input: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FormulaError::Parse("empty formula".into()));
    }
    let mut pos = 0;
    let expr = parse_expr(&tokens, &mut pos)?;
    if pos != tokens.len() {
        return Err(FormulaError::Parse(
            "trailing tokens after expression".into(),
        ));
    }
    Ok(expr)
}

// expr := operand (op operand)?   -- at most one split per expression
fn parse_expr(tokens: &[Token], pos: &mut usize) -> Result<Expr, FormulaError> {
    let left = parse_operand(tokens, pos)?;

    let op = match tokens.get(*pos) {
        Some(Token::Plus) => Some(Op::Add),
        Some(Token::Minus) => Some(Op::Sub),
        Some(Token::Star) => Some(Op::Mul),
        Some(Token::Slash) => Some(Op::Div),
        _ => None,
    };
    let Some(op) = op else { return Ok(left) };
    *pos += 1;

    let right = parse_operand(tokens, pos)?;
    Ok(Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

// operand := reduction '(' expr ')' | identifier | number
fn parse_operand(tokens: &[Token], pos: &mut usize) -> Result<Expr, FormulaError> {
    match tokens.get(*pos) {
        Some(Token::Number(n)) => {
            *pos += 1;
            Ok(Expr::Number(*n))
        }
        Some(Token::Ident(name)) => {
            *pos += 1;
            if let Some(func) = Reduction::from_name(name) {
                if tokens.get(*pos) != Some(&Token::LParen) {
                    return Err(FormulaError::Parse(format!(
                        "`{name}` must be called with an argument"
                    )));
                }
                *pos += 1;
                let arg = parse_expr(tokens, pos)?;
                if tokens.get(*pos) != Some(&Token::RParen) {
                    return Err(FormulaError::Parse(format!("unclosed `{name}(`")));
                }
                *pos += 1;
                return Ok(Expr::Reduce {
                    func,
                    arg: Box::new(arg),
                });
            }
            if name.len() < MIN_IDENT_LEN {
                return Err(FormulaError::Parse(format!(
                    "identifier `{name}` is shorter than {MIN_IDENT_LEN} characters"
                )));
            }
            Ok(Expr::Ident(name.clone()))
        }
        Some(other) => Err(FormulaError::Parse(format!("unexpected token {other:?}"))),
        None => Err(FormulaError::Parse("expression ended early".into())),
    }
}
