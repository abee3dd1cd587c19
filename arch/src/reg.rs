use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

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
pub enum Reg {
    AREG = 1,
    BREG = 2,
    CREG = 3,
    DREG = 4,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

/// Condition codes accepted by `BC` in place of a register.
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
pub enum Cond {
    LT = 1,
    LE = 2,
    EQ = 3,
    GT = 4,
    GE = 5,
    ANY = 6,
}

impl Cond {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(c) => Ok(c),
            Err(_) => Err(format!("Unknown condition: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("areg"), Ok(Reg::AREG));
    assert_eq!(Reg::DREG.code(), 4);
    assert!(Reg::parse("EREG").is_err());
    assert_eq!(Cond::parse("any").map(Cond::code), Ok(6));
}
