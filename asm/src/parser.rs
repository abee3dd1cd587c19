use crate::{error::Error, record::Field};
use arch::{
    op::{Arg, Mnemonic},
    psudo::{Decl, Directive},
    reg::{Cond, Reg},
};

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Start(Option<String>),
    End,
    Ltorg,
    Origin(String),
    Equ(String, String),
    Decl {
        symbol: Option<String>,
        kind: Decl,
        value: String,
    },
    Inst {
        symbol: Option<String>,
        mnemonic: Mnemonic,
        field: Field,
        operand: Option<String>,
    },
}

/// A classified line: an optional `label:` prefix and what follows it.
#[derive(Debug)]
pub struct Parsed {
    pub label: Option<String>,
    pub stmt: Result<Option<Stmt>, Error>,
}

pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn symbol(s: &str) -> Result<String, Error> {
    if is_ident(s) {
        Ok(s.to_string())
    } else {
        Err(Error::MalformedStatement(format!("invalid symbol name `{s}`")))
    }
}

impl Parsed {
    pub fn parse(code: &str) -> Parsed {
        // main: MOVER AREG, X
        if let Some((label, rest)) = code.split_once(':') {
            let label = label.trim();
            return match symbol(label) {
                Ok(label) => Parsed {
                    label: Some(label),
                    stmt: Stmt::parse(rest),
                },
                Err(err) => Parsed {
                    label: None,
                    stmt: Err(err),
                },
            };
        }
        Parsed {
            label: None,
            stmt: Stmt::parse(code),
        }
    }
}

impl Stmt {
    pub fn parse(code: &str) -> Result<Option<Stmt>, Error> {
        let code = code.replace(',', " ");
        let words: Vec<&str> = code.split_whitespace().collect();

        let Some((head, args)) = words.split_first() else {
            return Ok(None);
        };

        if let Ok(directive) = Directive::parse(head) {
            return Self::parse_directive(directive, args).map(Some);
        }

        // SIZE EQU A + 1
        if let Some(second) = args.first() {
            if let Ok(Directive::EQU) = Directive::parse(second) {
                let expr = args[1..].join(" ");
                if expr.is_empty() {
                    return Err(Error::MalformedStatement("EQU requires an expression".into()));
                }
                return Ok(Some(Stmt::Equ(symbol(head)?, expr)));
            }
        }

        // DS 3 / A DS 3
        if let Ok(kind) = Decl::parse(head) {
            return Self::parse_decl(None, kind, args).map(Some);
        }
        if let Some(kind) = args.first().and_then(|w| Decl::parse(w).ok()) {
            return Self::parse_decl(Some(symbol(head)?), kind, &args[1..]).map(Some);
        }

        // MOVER AREG, X / LOOP MOVER AREG, X
        if let Ok(mnemonic) = Mnemonic::parse(head) {
            return Self::parse_inst(None, mnemonic, args).map(Some);
        }
        if words.len() >= 3 {
            if let Ok(mnemonic) = Mnemonic::parse(args[0]) {
                return Self::parse_inst(Some(symbol(head)?), mnemonic, &args[1..]).map(Some);
            }
            if is_ident(head) {
                return Err(Error::UnknownDirective(args[0].to_string()));
            }
        }
        Err(Error::UnknownMnemonic(head.to_string()))
    }

    fn parse_directive(directive: Directive, args: &[&str]) -> Result<Stmt, Error> {
        let expr = args.join(" ");
        match (directive, args.is_empty()) {
            (Directive::START, true) => Ok(Stmt::Start(None)),
            (Directive::START, false) => Ok(Stmt::Start(Some(expr))),
            (Directive::END, true) => Ok(Stmt::End),
            (Directive::LTORG, true) => Ok(Stmt::Ltorg),
            (Directive::ORIGIN, false) => Ok(Stmt::Origin(expr)),
            (Directive::ORIGIN, true) => Err(Error::MalformedStatement(
                "ORIGIN requires an expression".into(),
            )),
            (Directive::EQU, _) => Err(Error::MalformedStatement(
                "EQU requires a symbol on the left".into(),
            )),
            (directive, false) => Err(Error::MalformedStatement(format!(
                "{directive} takes no operand"
            ))),
        }
    }

    fn parse_decl(symbol: Option<String>, kind: Decl, args: &[&str]) -> Result<Stmt, Error> {
        match args {
            [value] => Ok(Stmt::Decl {
                symbol,
                kind,
                value: value.to_string(),
            }),
            _ => Err(Error::MalformedStatement(format!(
                "{kind} takes exactly one operand"
            ))),
        }
    }

    fn parse_inst(
        symbol: Option<String>,
        mnemonic: Mnemonic,
        args: &[&str],
    ) -> Result<Stmt, Error> {
        let (shape, field, operand) = match args {
            [] => (Arg::NONE, Field::None, None),
            [mem] => (Arg::MEM, Field::None, Some(mem.to_string())),
            [cond, mem] if mnemonic == Mnemonic::BC => (
                Arg::CONDMEM,
                Field::Cond(
                    Cond::parse(cond).map_err(|_| Error::InvalidRegister(cond.to_string()))?,
                ),
                Some(mem.to_string()),
            ),
            [reg, mem] => (
                Arg::REGMEM,
                Field::Reg(
                    Reg::parse(reg).map_err(|_| Error::InvalidRegister(reg.to_string()))?,
                ),
                Some(mem.to_string()),
            ),
            _ => {
                return Err(Error::MalformedStatement(format!(
                    "too many operands for {mnemonic}"
                )))
            }
        };
        if !mnemonic.arg_field().contains(&shape) {
            return Err(Error::MalformedStatement(format!(
                "invalid operands for {mnemonic}"
            )));
        }
        Ok(Stmt::Inst {
            symbol,
            mnemonic,
            field,
            operand,
        })
    }
}
