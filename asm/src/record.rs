use arch::{
    inst::Class,
    op::Mnemonic,
    reg::{Cond, Reg},
};
use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::error::Error;

/// Move the location counter forward by `by` cells.
pub fn advance(lc: i64, by: i64) -> Result<i64, Error> {
    lc.checked_add(by)
        .ok_or_else(|| Error::MalformedStatement(format!("address out of range: {lc} + {by}")))
}

// ----------------------------------------------------------------------------
// Operand

/// Operand of an intermediate record. Tables are referenced by 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operand {
    None,
    Symbol(usize),
    Literal(usize),
    Const(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => write!(f, "-"),
            Operand::Symbol(idx) => write!(f, "(S,{})", idx),
            Operand::Literal(idx) => write!(f, "(L,{})", idx),
            Operand::Const(v) => write!(f, "(C,{})", v),
        }
    }
}

impl FromStr for Operand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Operand::None);
        }
        let err = || format!("Invalid operand: {s}");
        let (kind, val) = s
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .and_then(|s| s.split_once(','))
            .ok_or_else(err)?;
        match kind {
            "S" => val.parse().map(Operand::Symbol).map_err(|_| err()),
            "L" => val.parse().map(Operand::Literal).map_err(|_| err()),
            "C" => val.parse().map(Operand::Const).map_err(|_| err()),
            _ => Err(err()),
        }
    }
}

// ----------------------------------------------------------------------------
// Register field

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    None,
    Reg(Reg),
    Cond(Cond),
}

impl Field {
    pub fn code(&self) -> Option<u8> {
        match self {
            Field::None => None,
            Field::Reg(reg) => Some(reg.code()),
            Field::Cond(cond) => Some(cond.code()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{:02}", code),
            None => write!(f, "-"),
        }
    }
}

// ----------------------------------------------------------------------------
// Intermediate record

/// Pass 1 output: `[LC] (CLASS,CC) REG OPERAND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Record {
    pub lc: Option<i64>,
    pub class: Class,
    pub field: Field,
    pub operand: Operand,
}

impl Record {
    pub fn new(lc: i64, class: Class, field: Field, operand: Operand) -> Self {
        Record {
            lc: Some(lc),
            class,
            field,
            operand,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lc) = self.lc {
            write!(f, "{} ", lc)?;
        }
        write!(f, "{} {} {}", self.class, self.field, self.operand)
    }
}

impl FromStr for Record {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let (lc, rest) = match words.as_slice() {
            [lc, rest @ ..] if rest.len() == 3 => (
                Some(lc.parse().map_err(|_| format!("Invalid location: {lc}"))?),
                rest,
            ),
            rest if rest.len() == 3 => (None, rest),
            _ => return Err(format!("Invalid record: {s}")),
        };
        let class: Class = rest[0].parse()?;
        let field = match rest[1] {
            "-" => Field::None,
            code => {
                let err = || format!("Invalid field: {code}");
                let code: u8 = code.parse().map_err(|_| err())?;
                match class {
                    Class::IS(Mnemonic::BC) => {
                        Cond::try_from(code).map(Field::Cond).map_err(|_| err())?
                    }
                    _ => Reg::try_from(code).map(Field::Reg).map_err(|_| err())?,
                }
            }
        };
        let operand = rest[2].parse()?;
        Ok(Record {
            lc,
            class,
            field,
            operand,
        })
    }
}

// ----------------------------------------------------------------------------
// Resolved record

/// Pass 2 output: `[LC] CC REG VALUE` with every table reference replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub lc: Option<i64>,
    pub code: u8,
    pub field: Option<u8>,
    pub value: Option<i64>,
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lc) = self.lc {
            write!(f, "{} ", lc)?;
        }
        write!(f, "{:02} ", self.code)?;
        match self.field {
            Some(field) => write!(f, "{:02} ", field)?,
            None => write!(f, "- ")?,
        }
        match self.value {
            Some(value) => write!(f, "{:03}", value),
            None => write!(f, "-"),
        }
    }
}
