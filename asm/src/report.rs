use crate::{
    error::Error, literal::LiteralPool, macros::MacroTables, symbol::SymbolKind,
    symbol::SymbolTable, Assembly,
};
use color_print::{cformat, cprintln};
use serde::Serialize;

const RULE: &str =
    "+------+------------------------------+--------------------------+------------------+";

/// Combined Source / Intermediate / Machine listing.
pub fn print_listing(asm: &Assembly) {
    let mut path = None;
    for a in &asm.lines {
        if path != Some(a.line.path()) {
            path = Some(a.line.path());
            println!("{}", RULE);
            println!("| {:<82} |", a.line.path());
            println!("{}", RULE);
        }

        let inter: Vec<String> = a.intermediate.iter().map(|r| r.to_string()).collect();
        let machine: Vec<String> = match &a.resolved {
            Ok(res) => res.iter().map(|r| cformat!("<y>{:<16}</>", r.to_string())).collect(),
            Err(_) => vec![cformat!("<r,s>{:<16}</>", "!! unresolved")],
        };
        let rows = inter.len().max(machine.len()).max(1);
        for row in 0..rows {
            let (no, source) = if row == 0 {
                (format!("{:>4}", a.line.no()), a.line.raw().trim().to_string())
            } else {
                (" ".repeat(4), String::new())
            };
            let inter = inter.get(row).map(String::as_str).unwrap_or("");
            let machine = match machine.get(row) {
                Some(m) => m.clone(),
                None => " ".repeat(16),
            };
            cprintln!(
                "| <blue>{}</> | {:<28} | <g>{:<24}</> | {} |",
                no,
                source,
                inter,
                machine
            );
        }
    }
    println!("{}", RULE);
}

pub fn print_symbols(symbols: &SymbolTable) {
    println!("+-[Symbol]-+--------------+------+---------+");
    for (idx, name, sym) in symbols.iter() {
        let kind = match sym.kind {
            SymbolKind::Label => "addr",
            SymbolKind::Equ => "equ",
        };
        match sym.address {
            Some(addr) => {
                cprintln!("| {:>8} | <g>{:<12}</> | {:<4} | {:>7} |", idx, name, kind, addr)
            }
            None => {
                cprintln!("| {:>8} | <r,u>{:<12}</> | {:<4} | {:>7} |", idx, name, "", "")
            }
        }
    }
    println!("+----------+--------------+------+---------+");
}

pub fn print_literals(literals: &LiteralPool) {
    println!("+-[Literal]-+--------------+---------+");
    for (idx, lit) in literals.literals() {
        let addr = lit.address.map(|a| a.to_string()).unwrap_or_default();
        cprintln!("| {:>9} | <c>{:<12}</> | {:>7} |", idx, lit.text, addr);
    }
    println!("+-[Pool]----+--------------+---------+");
    for (idx, first) in literals.pools().iter().enumerate() {
        println!("| {:>9} | #{:<11} | {:>7} |", idx + 1, first, "");
    }
    println!("+-----------+--------------+---------+");
}

pub fn print_macros(tables: &MacroTables) {
    println!("+-[MNT]-+--------------+-----+");
    for (idx, (name, def)) in tables.mnt.iter().enumerate() {
        cprintln!("| {:>5} | <m>{:<12}</> | {:>3} |", idx + 1, name, def.mdt);
    }
    println!("+-[MDT]-+--------------------+");
    for (idx, line) in tables.mdt.iter().enumerate() {
        println!("| {:>5} | {:<18} |", idx + 1, line);
    }
    println!("+-[ALA]-+--------------------+");
    for (idx, arg) in tables.formal.iter().enumerate() {
        println!("| {:>5} | {:<18} |", idx + 1, arg);
    }
    println!("+-[ALA call]-+---------------+");
    for (idx, arg) in tables.actual.iter().enumerate() {
        println!("| {:>10} | {:<13} |", idx + 1, arg);
    }
    println!("+------------+---------------+");
}

// ----------------------------------------------------------------------------
// Listing file

#[derive(Debug, Serialize)]
struct ListingLine<'a> {
    pos: String,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    intermediate: Vec<String>,
    machine: Result<Vec<String>, String>,
}

#[derive(Debug, Serialize)]
pub struct Listing<'a> {
    lines: Vec<ListingLine<'a>>,
    symbols: &'a SymbolTable,
    literals: &'a LiteralPool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    macros: Option<&'a MacroTables>,
}

impl<'a> Listing<'a> {
    pub fn new(asm: &'a Assembly, macros: Option<&'a MacroTables>) -> Self {
        let lines = asm
            .lines
            .iter()
            .map(|a| ListingLine {
                pos: a.line.pos(),
                source: a.line.code(),
                comment: a.line.comment(),
                intermediate: a.intermediate.iter().map(|r| r.to_string()).collect(),
                machine: match &a.resolved {
                    Ok(res) => Ok(res.iter().map(|r| r.to_string()).collect()),
                    Err(err) => Err(err.to_string()),
                },
            })
            .collect();
        Listing {
            lines,
            symbols: &asm.ctx.symbols,
            literals: &asm.ctx.literals,
            unresolved: asm.ctx.symbols.unresolved().collect(),
            macros,
        }
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        serde_yaml::to_string(self).map_err(Error::Listing)
    }

    pub fn write(&self, path: &str) -> Result<(), Error> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|e| Error::FileWrite(path.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, line::from_source};

    #[test]
    fn yaml_listing() {
        let asm = assemble(&from_source("t.asm", "START 5\nREAD X\nX DS 1\nEND"));
        let yaml = Listing::new(&asm, None).to_yaml().unwrap();
        assert!(yaml.contains("t.asm:2"));
        assert!(yaml.contains("5 (IS,09) - (S,1)"));
        assert!(yaml.contains("5 09 - 006"));
        assert!(!yaml.contains("macros"));
        assert!(!yaml.contains("unresolved"));
    }

    #[test]
    fn yaml_listing_keeps_comments_and_unresolved() {
        let src = "START 0\nREAD X ; input\nPRINT Y\nX DS 1\nEND";
        let asm = assemble(&from_source("t.asm", src));
        let yaml = Listing::new(&asm, None).to_yaml().unwrap();
        assert!(yaml.contains("comment:"));
        assert!(yaml.contains("input"));
        assert!(yaml.contains("unresolved:"));
        assert!(yaml.contains("- Y"));
    }
}
