//! Two-pass assembler for the teaching machine described by `arch`.
//!
//! Pass 1 assigns addresses, builds the symbol and literal tables and emits
//! intermediate records that refer to the tables by index. Pass 2 replaces
//! those indices by the final addresses.

pub mod error;
pub mod expr;
pub mod line;
pub mod literal;
pub mod macros;
pub mod msg;
pub mod parser;
pub mod pass1;
pub mod pass2;
pub mod record;
pub mod report;
pub mod symbol;

pub use error::Error;
pub use line::Line;
pub use msg::Msgs;
pub use pass1::{pass1, Context};
pub use pass2::{pass2, Assembled};

/// Result of running both passes over one program.
#[derive(Debug)]
pub struct Assembly {
    pub ctx: Context,
    pub lines: Vec<Assembled>,
    pub msgs: Msgs,
}

pub fn assemble(lines: &[Line]) -> Assembly {
    let (ctx, translated, mut msgs) = pass1(lines);
    let (lines, resolve_msgs) = pass2(&ctx, &translated);
    msgs.extend(resolve_msgs);
    Assembly { ctx, lines, msgs }
}

impl Assembly {
    pub fn has_error(&self) -> bool {
        self.msgs.has_error()
    }

    /// `(source, intermediate, machine)` per line; several records of one
    /// line are joined by newlines, failed lines have an empty machine column.
    pub fn rows(&self) -> Vec<(String, String, String)> {
        self.lines
            .iter()
            .map(|a| {
                let intermediate = a
                    .intermediate
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                let machine = match &a.resolved {
                    Ok(res) => res
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join("\n"),
                    Err(_) => String::new(),
                };
                (a.line.raw().trim().to_string(), intermediate, machine)
            })
            .collect()
    }

    /// Resolved records of the whole program in source order.
    pub fn machine_code(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|a| a.resolved.as_ref().ok())
            .flatten()
            .map(|r| r.to_string())
            .collect()
    }
}
