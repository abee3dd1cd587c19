use crate::{
    error::Error,
    line::Line,
    msg::Msgs,
    pass1::{Context, Translated},
    record::{Operand, Record, Resolved},
};

/// A source line with both its intermediate and its resolved form.
#[derive(Debug)]
pub struct Assembled {
    pub line: Line,
    pub intermediate: Vec<Record>,
    pub resolved: Result<Vec<Resolved>, Error>,
}

impl Record {
    /// Replace table references by the addresses the tables hold now.
    pub fn resolve(&self, ctx: &Context) -> Result<Resolved, Error> {
        let value = match self.operand {
            Operand::None => None,
            Operand::Const(v) => Some(v),
            Operand::Symbol(idx) => match ctx.symbols.get(idx) {
                Some((_, sym)) if sym.address.is_some() => sym.address,
                Some((name, _)) => return Err(Error::UnresolvedReference(name.to_string())),
                None => return Err(Error::UnresolvedReference(self.operand.to_string())),
            },
            Operand::Literal(idx) => match ctx.literals.get(idx) {
                Some(lit) if lit.address.is_some() => lit.address,
                Some(lit) => return Err(Error::UnresolvedReference(lit.text.clone())),
                None => return Err(Error::UnresolvedReference(self.operand.to_string())),
            },
        };
        Ok(Resolved {
            lc: self.lc,
            code: self.class.code(),
            field: self.field.code(),
            value,
        })
    }
}

/// Resolve one record given in its textual intermediate form.
pub fn resolve_text(text: &str, ctx: &Context) -> Result<Resolved, Error> {
    let record: Record = text.parse().map_err(Error::MalformedStatement)?;
    record.resolve(ctx)
}

/// Resolve every line. A line whose references cannot be resolved is
/// reported and yields no output; the rest of the program still resolves.
pub fn pass2(ctx: &Context, lines: &[Translated]) -> (Vec<Assembled>, Msgs) {
    let mut msgs = Msgs::new();
    let out = lines
        .iter()
        .map(|t| {
            let resolved = t
                .records
                .iter()
                .map(|rec| rec.resolve(ctx))
                .collect::<Result<Vec<_>, _>>();
            if let Err(err) = &resolved {
                msgs.error(err, &t.line);
            }
            Assembled {
                line: t.line.clone(),
                intermediate: t.records.clone(),
                resolved,
            }
        })
        .collect();
    (out, msgs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{line::from_source, pass1::pass1};

    fn run(src: &str) -> (Context, Vec<Assembled>, Msgs) {
        let (ctx, translated, _) = pass1(&from_source("test.asm", src));
        let (out, msgs) = pass2(&ctx, &translated);
        (ctx, out, msgs)
    }

    fn machine(out: &Assembled) -> Vec<String> {
        match &out.resolved {
            Ok(res) => res.iter().map(|r| r.to_string()).collect(),
            Err(err) => vec![format!("!{err}")],
        }
    }

    #[test]
    fn forward_reference() {
        let (_, out, msgs) = run("START 10\nMOVER AREG, X\nSTOP\nX DC '3'\nEND");
        assert!(msgs.is_empty());
        assert_eq!(machine(&out[1]), vec!["10 04 01 012"]);
        assert_eq!(machine(&out[3]), vec!["12 01 - 003"]);
        assert_eq!(machine(&out[0]), vec!["01 - 010"]);
    }

    #[test]
    fn unresolved_is_per_line() {
        let (_, out, msgs) = run("START 0\nREAD GHOST\nREAD N\nN DS 1\nEND");
        assert_eq!(msgs.count(crate::msg::Level::Error), 1);
        assert!(matches!(
            &out[1].resolved,
            Err(Error::UnresolvedReference(name)) if name == "GHOST"
        ));
        assert_eq!(machine(&out[2]), vec!["1 09 - 002"]);
    }

    #[test]
    fn empty_records_pass_through() {
        let (_, out, _) = run("START 0\nA EQU 5\n\nEND");
        assert!(matches!(&out[1].resolved, Ok(res) if res.is_empty()));
        assert!(matches!(&out[2].resolved, Ok(res) if res.is_empty()));
    }

    #[test]
    fn textual_form_resolves_the_same() {
        let (ctx, out, _) = run("START 0\nMOVER BREG, '=4'\nEND");
        let text = out[1].intermediate[0].to_string();
        assert_eq!(text, "0 (IS,04) 02 (L,1)");
        assert_eq!(resolve_text(&text, &ctx).unwrap().to_string(), "0 04 02 001");
        assert!(matches!(
            resolve_text("0 (IS,04) 02 (L,9)", &ctx),
            Err(Error::UnresolvedReference(_))
        ));
        assert!(matches!(
            resolve_text("nonsense", &ctx),
            Err(Error::MalformedStatement(_))
        ));
    }
}
