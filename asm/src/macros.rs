use crate::{error::Error, line::Line, msg::Msgs, parser::is_ident};
use indexmap::IndexMap;
use serde::Serialize;

/// Macro name table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroDef {
    /// 1-based MDT index of the prototype line.
    pub mdt: usize,
    /// Formal parameters, `&`-prefixed.
    pub params: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MacroTables {
    /// MNT
    pub mnt: IndexMap<String, MacroDef>,
    /// MDT: prototype, body and `MEND` of every definition.
    pub mdt: Vec<String>,
    /// ALA of formal parameters, in definition order.
    pub formal: Vec<String>,
    /// ALA of actual arguments, in call order.
    pub actual: Vec<String>,
}

#[derive(Debug)]
pub struct Expansion {
    pub lines: Vec<Line>,
    pub tables: MacroTables,
    pub msgs: Msgs,
}

fn words(code: &str) -> Vec<String> {
    code.replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_keyword(code: &str, keyword: &str) -> bool {
    code.trim().eq_ignore_ascii_case(keyword)
}

enum State<'a> {
    Outside,
    Prototype(&'a Line),
    Body(String, &'a Line),
}

/// Collect definitions, then expand every call site.
pub fn expand(lines: &[Line]) -> Expansion {
    let mut msgs = Msgs::new();
    let mut tables = MacroTables::default();
    let source = define(lines, &mut tables, &mut msgs);
    let lines = source
        .into_iter()
        .flat_map(|line| call(line, &mut tables, &mut msgs))
        .collect();
    Expansion {
        lines,
        tables,
        msgs,
    }
}

/// Pass 1: fill MNT, MDT and the formal ALA. Returns the lines outside any
/// definition.
fn define<'a>(lines: &'a [Line], tables: &mut MacroTables, msgs: &mut Msgs) -> Vec<&'a Line> {
    let mut state = State::Outside;
    let mut source = vec![];

    for line in lines {
        state = match state {
            State::Outside if is_keyword(line.code(), "MACRO") => State::Prototype(line),
            State::Outside if is_keyword(line.code(), "MEND") => {
                msgs.error(Error::UnexpectedMend, line);
                State::Outside
            }
            State::Outside => {
                source.push(line);
                State::Outside
            }
            State::Prototype(start) if line.is_blank() => State::Prototype(start),
            State::Prototype(start) => {
                let (name, params) = match words(line.code()).split_first() {
                    Some((name, params)) => (name.clone(), params.to_vec()),
                    None => (String::new(), vec![]),
                };
                if !is_ident(&name) {
                    msgs.error(
                        Error::MalformedStatement(format!("invalid macro name `{name}`")),
                        line,
                    );
                }
                for param in &params {
                    if !param.starts_with('&') || !is_ident(&param[1..]) {
                        msgs.error(
                            Error::MalformedStatement(format!("invalid parameter `{param}`")),
                            line,
                        );
                    }
                }
                tables.mdt.push(line.code().to_string());
                tables.formal.extend(params.iter().cloned());
                let def = MacroDef {
                    mdt: tables.mdt.len(),
                    params,
                };
                if tables.mnt.insert(name.clone(), def).is_some() {
                    msgs.warn(Error::DuplicateDefinition(name.clone()), line);
                }
                State::Body(name, start)
            }
            State::Body(name, start) if line.is_blank() => State::Body(name, start),
            State::Body(name, start) => {
                tables.mdt.push(line.code().to_string());
                if is_keyword(line.code(), "MEND") {
                    State::Outside
                } else {
                    State::Body(name, start)
                }
            }
        };
    }

    match state {
        State::Outside => {}
        State::Prototype(start) => msgs.error(Error::UnterminatedMacro(String::new()), start),
        State::Body(name, start) => msgs.error(Error::UnterminatedMacro(name), start),
    }
    source
}

/// Pass 2: expand `line` if it calls a macro, otherwise pass it through.
fn call(line: &Line, tables: &mut MacroTables, msgs: &mut Msgs) -> Vec<Line> {
    let (label, rest) = match line.code().split_once(':') {
        Some((label, rest)) => (Some(label.trim()), rest),
        None => (None, line.code()),
    };
    let args = words(rest);
    let Some((name, args)) = args.split_first() else {
        return vec![line.clone()];
    };
    let Some(def) = tables.mnt.get(name) else {
        return vec![line.clone()];
    };
    if def.params.len() != args.len() {
        msgs.error(
            Error::MacroArity(name.clone(), def.params.len(), args.len()),
            line,
        );
        return vec![];
    }

    let binding: Vec<(&str, &str)> = def
        .params
        .iter()
        .map(String::as_str)
        .zip(args.iter().map(String::as_str))
        .collect();
    let mut out: Vec<Line> = tables.mdt[def.mdt..]
        .iter()
        .take_while(|body| !is_keyword(body, "MEND"))
        .map(|body| Line::new(line.path(), line.idx(), &substitute(body, &binding)))
        .collect();
    if let (Some(label), Some(first)) = (label, out.first_mut()) {
        *first = Line::new(line.path(), line.idx(), &format!("{label}: {}", first.code()));
    }
    tables.actual.extend(args.iter().cloned());
    out
}

/// Replace whole `&NAME` tokens by their bound argument.
fn substitute(text: &str, binding: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let mut end = start + 1;
        while let Some(&(idx, d)) = chars.peek() {
            if !(d.is_ascii_alphanumeric() || d == '_') {
                break;
            }
            end = idx + d.len_utf8();
            chars.next();
        }
        let token = &text[start..end];
        match binding.iter().find(|(formal, _)| *formal == token) {
            Some((_, actual)) => out.push_str(actual),
            None => out.push_str(token),
        }
    }
    out
}
