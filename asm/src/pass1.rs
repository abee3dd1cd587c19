use crate::{
    error::Error,
    expr::evaluate,
    line::Line,
    literal::{is_literal, LiteralPool},
    msg::Msgs,
    parser::{is_ident, Parsed, Stmt},
    record::{advance, Field, Operand, Record},
    symbol::{SymbolKind, SymbolTable},
};
use arch::{
    inst::Class,
    op::Mnemonic,
    psudo::{Decl, Directive},
};
use serde::Serialize;

/// State of one assembly run: the location counter and the tables pass 1
/// builds. Pass 2 only reads it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Context {
    pub lc: i64,
    pub symbols: SymbolTable,
    pub literals: LiteralPool,
    #[serde(skip)]
    ended: bool,
}

/// A source line together with the records pass 1 emitted for it.
#[derive(Debug, Clone, Serialize)]
pub struct Translated {
    pub line: Line,
    pub records: Vec<Record>,
}

pub fn pass1(lines: &[Line]) -> (Context, Vec<Translated>, Msgs) {
    let mut ctx = Context::new();
    let mut msgs = Msgs::new();
    let mut out: Vec<Translated> = lines
        .iter()
        .map(|line| Translated {
            line: line.clone(),
            records: ctx.translate(line, &mut msgs),
        })
        .collect();

    if !ctx.is_ended() {
        if let Some(last) = lines.last() {
            msgs.warn("Missing END", last);
        }
        if ctx.literals.pending() > 0 {
            let line = match lines.last() {
                Some(last) => Line::new(last.path(), last.idx() + 1, ""),
                None => Line::new("", 0, ""),
            };
            match ctx.literals.flush(ctx.lc, Directive::END) {
                Ok((records, lc)) => {
                    ctx.lc = lc;
                    msgs.note("Pending literals placed at the end of input", &line);
                    out.push(Translated { line, records });
                }
                Err(err) => msgs.error(err, &line),
            }
        }
    }

    (ctx, out, msgs)
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn translate(&mut self, line: &Line, msgs: &mut Msgs) -> Vec<Record> {
        if self.ended {
            if !line.is_blank() {
                msgs.warn("Statement after END is ignored", line);
            }
            return vec![];
        }

        let Parsed { label, stmt } = Parsed::parse(line.code());
        if let Some(label) = label {
            self.bind(&label, SymbolKind::Label, self.lc, line, msgs);
        }
        let result = match stmt {
            Ok(Some(stmt)) => self.exec(stmt, line, msgs),
            Ok(None) => Ok(vec![]),
            Err(err) => Err(err),
        };
        match result {
            Ok(records) => records,
            Err(err) => {
                msgs.error(err, line);
                vec![]
            }
        }
    }

    fn bind(&mut self, name: &str, kind: SymbolKind, value: i64, line: &Line, msgs: &mut Msgs) {
        let (_, prev) = self.symbols.define(name, kind, value);
        if let Some(prev) = prev {
            msgs.warn(Error::DuplicateDefinition(name.to_string()), line);
            msgs.note(
                format!("Previous value {prev} has been overridden by {value}"),
                line,
            );
        }
    }

    fn exec(&mut self, stmt: Stmt, line: &Line, msgs: &mut Msgs) -> Result<Vec<Record>, Error> {
        match stmt {
            Stmt::Start(expr) => {
                let lc = match expr {
                    Some(expr) => evaluate(&expr, &self.symbols)?,
                    None => 0,
                };
                self.lc = lc;
                Ok(vec![Record {
                    lc: None,
                    class: Class::AD(Directive::START),
                    field: Field::None,
                    operand: Operand::Const(lc),
                }])
            }
            Stmt::End => {
                self.ended = true;
                let (records, lc) = self.literals.flush(self.lc, Directive::END)?;
                self.lc = lc;
                if records.is_empty() {
                    Ok(vec![Record::new(
                        self.lc,
                        Class::AD(Directive::END),
                        Field::None,
                        Operand::None,
                    )])
                } else {
                    Ok(records)
                }
            }
            Stmt::Ltorg => {
                let (records, lc) = self.literals.flush(self.lc, Directive::LTORG)?;
                self.lc = lc;
                Ok(records)
            }
            Stmt::Origin(expr) => {
                self.lc = evaluate(&expr, &self.symbols)?;
                Ok(vec![])
            }
            Stmt::Equ(name, expr) => {
                let value = evaluate(&expr, &self.symbols)?;
                self.bind(&name, SymbolKind::Equ, value, line, msgs);
                Ok(vec![])
            }
            Stmt::Decl {
                symbol,
                kind,
                value,
            } => {
                if let Some(symbol) = symbol {
                    self.bind(&symbol, SymbolKind::Label, self.lc, line, msgs);
                }
                self.decl(kind, &value)
            }
            Stmt::Inst {
                symbol,
                mnemonic,
                field,
                operand,
            } => {
                if let Some(symbol) = symbol {
                    self.bind(&symbol, SymbolKind::Label, self.lc, line, msgs);
                }
                self.inst(mnemonic, field, operand.as_deref())
            }
        }
    }

    fn decl(&mut self, kind: Decl, value: &str) -> Result<Vec<Record>, Error> {
        let lc = self.lc;
        let (operand, size) = match kind {
            _ if is_literal(value) => (Operand::Literal(self.literals.intern(value)?), 1),
            Decl::DC => (Operand::Const(constant(value)?), 1),
            Decl::DS => {
                let size = constant(value)?;
                if size < 0 {
                    return Err(Error::MalformedStatement(format!(
                        "negative storage size `{value}`"
                    )));
                }
                (Operand::Const(size), size)
            }
        };
        self.lc = advance(lc, size)?;
        Ok(vec![Record::new(lc, Class::DL(kind), Field::None, operand)])
    }

    fn inst(
        &mut self,
        mnemonic: Mnemonic,
        field: Field,
        operand: Option<&str>,
    ) -> Result<Vec<Record>, Error> {
        let next = advance(self.lc, 1)?;
        let operand = match operand {
            None => Operand::None,
            Some(text) if is_literal(text) => Operand::Literal(self.literals.intern(text)?),
            Some(text) if is_ident(text) => Operand::Symbol(self.symbols.reference(text)),
            Some(text) => Operand::Const(constant(text)?),
        };
        let record = Record::new(self.lc, Class::IS(mnemonic), field, operand);
        self.lc = next;
        Ok(vec![record])
    }
}

/// Inline constant, optionally quoted: `5` or `'5'`.
fn constant(text: &str) -> Result<i64, Error> {
    text.trim_matches('\'')
        .parse()
        .map_err(|_| Error::MalformedStatement(format!("invalid constant `{text}`")))
}
