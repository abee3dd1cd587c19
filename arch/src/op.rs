use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Machine opcode table (MOT).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Mnemonic {
    STOP = 0,
    ADD = 1,
    SUB = 2,
    MULT = 3,
    MOVER = 4,
    MOVEM = 5,
    COMP = 6,
    BC = 7,
    DIV = 8,
    READ = 9,
    PRINT = 10,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(m) => Ok(m),
            Err(_) => Err(format!("Undefined mnemonic: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    NONE,
    MEM,
    REGMEM,
    CONDMEM,
}

impl Mnemonic {
    /// Operand shape expected after the mnemonic.
    pub fn arg_field(&self) -> Vec<Arg> {
        use Mnemonic::*;
        match self {
            STOP => vec![Arg::NONE],
            READ | PRINT => vec![Arg::MEM, Arg::REGMEM],
            BC => vec![Arg::CONDMEM],
            ADD | SUB | MULT | MOVER | MOVEM | COMP | DIV => vec![Arg::REGMEM, Arg::MEM],
        }
    }
}
