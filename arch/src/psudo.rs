use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Assembler directives (POT). They steer the location counter and the
/// literal pool but never occupy a machine cell themselves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Directive {
    START = 1,
    END = 2,
    ORIGIN = 3,
    EQU = 4,
    LTORG = 5,
}

impl Directive {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(d) => Ok(d),
            Err(_) => Err(format!("Undefined directive: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

/// Declarative statements (DL).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Decl {
    /// Define constant: one cell holding the value.
    DC = 1,
    /// Define storage: N uninitialised cells.
    DS = 2,
}

impl Decl {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(d) => Ok(d),
            Err(_) => Err(format!("Undefined declaration: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Directive::parse("ltorg"), Ok(Directive::LTORG));
    assert_eq!(Directive::ORIGIN.code(), 3);
    assert_eq!(Decl::parse("ds"), Ok(Decl::DS));
    assert!(Decl::parse("DW").is_err());
}
