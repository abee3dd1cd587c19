use crate::{error::Error, symbol::SymbolTable};

// ----------------------------------------------------------------------------
// Token

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Int(i64),
    Ident(String),
    Plus,
    Minus,
}

fn tokenize(text: &str) -> Result<Vec<Token>, Error> {
    let malformed = || Error::MalformedExpression(text.to_string());
    let mut tokens = vec![];
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '0'..='9' => {
                let mut num = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_alphanumeric() {
                        break;
                    }
                    num.push(d);
                    chars.next();
                }
                tokens.push(Token::Int(num.parse().map_err(|_| malformed())?));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if !(d.is_ascii_alphanumeric() || d == '_') {
                        break;
                    }
                    name.push(d);
                    chars.next();
                }
                tokens.push(Token::Ident(name));
            }
            _ => return Err(malformed()),
        }
    }
    Ok(tokens)
}

// ----------------------------------------------------------------------------
// Expression

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
}

/// Operand expression of `START`, `ORIGIN` and `EQU`: a single term or one
/// `+`/`-` between two terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Symbol(String),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn parse(text: &str) -> Result<Expr, Error> {
        let malformed = || Error::MalformedExpression(text.to_string());
        let term = |token: &Token| match token {
            Token::Int(v) => Ok(Expr::Int(*v)),
            Token::Ident(name) => Ok(Expr::Symbol(name.clone())),
            _ => Err(malformed()),
        };
        let op = |token: &Token| match token {
            Token::Plus => Ok(BinOp::Add),
            Token::Minus => Ok(BinOp::Sub),
            _ => Err(malformed()),
        };

        match tokenize(text)?.as_slice() {
            [t] => term(t),
            [Token::Minus, Token::Int(v)] => Ok(Expr::Int(-v)),
            [Token::Plus, Token::Int(v)] => Ok(Expr::Int(*v)),
            [lhs, o, rhs] => Ok(Expr::Binary(
                op(o)?,
                Box::new(term(lhs)?),
                Box::new(term(rhs)?),
            )),
            _ => Err(malformed()),
        }
    }

    pub fn eval(&self, symbols: &SymbolTable) -> Result<i64, Error> {
        match self {
            Expr::Int(v) => Ok(*v),
            Expr::Symbol(name) => symbols
                .value_of(name)
                .ok_or_else(|| Error::UnresolvedReference(name.clone())),
            Expr::Binary(op, lhs, rhs) => {
                let (lhs, rhs) = (lhs.eval(symbols)?, rhs.eval(symbols)?);
                let (value, sign) = match op {
                    BinOp::Add => (lhs.checked_add(rhs), '+'),
                    BinOp::Sub => (lhs.checked_sub(rhs), '-'),
                };
                value.ok_or_else(|| Error::MalformedExpression(format!("{lhs} {sign} {rhs}")))
            }
        }
    }
}

/// Parse and evaluate against the symbols known so far.
pub fn evaluate(text: &str, symbols: &SymbolTable) -> Result<i64, Error> {
    Expr::parse(text)?.eval(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn table() -> SymbolTable {
        let mut symbols = SymbolTable::new();
        symbols.define("A", SymbolKind::Label, 100);
        symbols.define("AB", SymbolKind::Label, 7);
        symbols.reference("FWD");
        symbols
    }

    #[test]
    fn integer() {
        assert_eq!(evaluate("42", &table()).ok(), Some(42));
        assert_eq!(evaluate("-3", &table()).ok(), Some(-3));
    }

    #[test]
    fn symbol_plus_minus() {
        assert_eq!(evaluate("A + 1", &table()).ok(), Some(101));
        assert_eq!(evaluate("A-1", &table()).ok(), Some(99));
        assert_eq!(evaluate("AB + A", &table()).ok(), Some(107));
        assert_eq!(evaluate("A", &table()).ok(), Some(100));
    }

    #[test]
    fn no_substring_collision() {
        // `AB` must not be read as `A` followed by `B`.
        assert_eq!(evaluate("AB - 2", &table()).ok(), Some(5));
    }

    #[test]
    fn unresolved() {
        assert!(matches!(
            evaluate("FWD + 1", &table()),
            Err(Error::UnresolvedReference(name)) if name == "FWD"
        ));
        assert!(matches!(
            evaluate("NOPE", &table()),
            Err(Error::UnresolvedReference(_))
        ));
    }

    #[test]
    fn malformed() {
        for text in ["", "A + 1 + 2", "A * 2", "+", "A +", "(A)", "1x"] {
            assert!(
                matches!(evaluate(text, &table()), Err(Error::MalformedExpression(_))),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn overflow_is_malformed() {
        for text in ["9223372036854775807 + 1", "-9223372036854775808 - 1"] {
            assert!(
                matches!(evaluate(text, &table()), Err(Error::MalformedExpression(_))),
                "{text:?} should not overflow"
            );
        }
    }
}
