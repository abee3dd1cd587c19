use crate::{op::Mnemonic, psudo::Decl, psudo::Directive};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Statement class tag carried by every intermediate record, rendered as
/// `(IS,04)`, `(AD,01)` or `(DL,02)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Class {
    IS(Mnemonic),
    AD(Directive),
    DL(Decl),
}

impl Class {
    pub fn tag(&self) -> &'static str {
        match self {
            Class::IS(_) => "IS",
            Class::AD(_) => "AD",
            Class::DL(_) => "DL",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Class::IS(m) => m.code(),
            Class::AD(d) => d.code(),
            Class::DL(d) => d.code(),
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{:02})", self.tag(), self.code())
    }
}

impl FromStr for Class {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || format!("Invalid class tag: {s}");
        let body = s
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(err)?;
        let (tag, code) = body.split_once(',').ok_or_else(err)?;
        let code: u8 = code.trim().parse().map_err(|_| err())?;
        match tag.trim() {
            "IS" => Mnemonic::try_from(code).map(Class::IS).map_err(|_| err()),
            "AD" => Directive::try_from(code).map(Class::AD).map_err(|_| err()),
            "DL" => Decl::try_from(code).map(Class::DL).map_err(|_| err()),
            _ => Err(err()),
        }
    }
}
