use crate::{
    error::Error,
    record::{advance, Field, Operand, Record},
};
use arch::{inst::Class, psudo::Directive};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    /// Spelling of the first occurrence, e.g. `'=5'`.
    pub text: String,
    pub value: i64,
    pub address: Option<i64>,
}

/// Literal table plus pool table.
///
/// Literals are keyed by value, so `'=5'` and `=5` share one entry. Each
/// flush that allocates at least one literal opens a pool whose boundary is
/// the 1-based index of its first literal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LiteralPool {
    literals: IndexMap<i64, Literal>,
    pools: Vec<usize>,
}

/// Does this operand use the `=` literal marker?
pub fn is_literal(text: &str) -> bool {
    text.contains('=')
}

/// Value of a literal operand written as `'=5'`, `='5'` or `=5`.
pub fn literal_value(text: &str) -> Option<i64> {
    let body = text.trim().trim_matches('\'').strip_prefix('=')?;
    body.trim_matches('\'').parse().ok()
}

impl LiteralPool {
    pub fn new() -> Self {
        LiteralPool {
            literals: IndexMap::new(),
            pools: vec![],
        }
    }

    pub fn intern(&mut self, text: &str) -> Result<usize, Error> {
        let value = literal_value(text)
            .ok_or_else(|| Error::MalformedStatement(format!("invalid literal `{text}`")))?;
        let entry = self.literals.entry(value);
        let idx = entry.index();
        entry.or_insert_with(|| Literal {
            text: text.to_string(),
            value,
            address: None,
        });
        Ok(idx + 1)
    }

    /// Place every pending literal at consecutive addresses from `lc`.
    /// Returns one record per placed literal and the advanced counter.
    pub fn flush(
        &mut self,
        lc: i64,
        directive: Directive,
    ) -> Result<(Vec<Record>, i64), Error> {
        let mut lc = lc;
        let mut first = None;
        let mut records = vec![];
        for (idx, (_, lit)) in self.literals.iter_mut().enumerate() {
            if lit.address.is_some() {
                continue;
            }
            first.get_or_insert(idx + 1);
            lit.address = Some(lc);
            records.push(Record::new(
                lc,
                Class::AD(directive),
                Field::None,
                Operand::Const(lit.value),
            ));
            lc = advance(lc, 1)?;
        }
        if let Some(first) = first {
            self.pools.push(first);
        }
        Ok((records, lc))
    }

    pub fn get(&self, index: usize) -> Option<&Literal> {
        self.literals
            .get_index(index.checked_sub(1)?)
            .map(|(_, lit)| lit)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.literals
            .values()
            .filter(|lit| lit.address.is_none())
            .count()
    }

    pub fn literals(&self) -> impl Iterator<Item = (usize, &Literal)> {
        self.literals
            .values()
            .enumerate()
            .map(|(idx, lit)| (idx + 1, lit))
    }

    pub fn pools(&self) -> &[usize] {
        &self.pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_spellings() {
        assert_eq!(literal_value("'=5'"), Some(5));
        assert_eq!(literal_value("='5'"), Some(5));
        assert_eq!(literal_value("=19"), Some(19));
        assert_eq!(literal_value("'5'"), None);
        assert_eq!(literal_value("'=x'"), None);
    }

    #[test]
    fn intern_is_idempotent() {
        let mut pool = LiteralPool::new();
        let a = pool.intern("'=5'").unwrap();
        let b = pool.intern("'=5'").unwrap();
        let c = pool.intern("=5").unwrap();
        assert_eq!((a, b, c), (1, 1, 1));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.intern("'=7'").unwrap(), 2);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn flush_allocates_pending_only() {
        let mut pool = LiteralPool::new();
        pool.intern("'=1'").unwrap();
        pool.intern("'=2'").unwrap();
        let (records, lc) = pool.flush(200, Directive::LTORG).unwrap();
        assert_eq!(lc, 202);
        assert_eq!(
            records.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            vec!["200 (AD,05) - (C,1)", "201 (AD,05) - (C,2)"]
        );

        // Nothing pending: no records, counter unchanged, no new pool.
        let (records, lc) = pool.flush(202, Directive::LTORG).unwrap();
        assert!(records.is_empty());
        assert_eq!(lc, 202);
        assert_eq!(pool.pools(), &[1]);

        // A reused literal keeps its address; only the new one is placed.
        pool.intern("'=1'").unwrap();
        pool.intern("'=3'").unwrap();
        let (records, lc) = pool.flush(300, Directive::END).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(lc, 301);
        assert_eq!(pool.pools(), &[1, 3]);
        assert_eq!(pool.get(1).and_then(|l| l.address), Some(200));
        assert_eq!(pool.get(3).and_then(|l| l.address), Some(300));
        assert_eq!(pool.pending(), 0);
    }

    #[test]
    fn flush_past_last_address_fails() {
        let mut pool = LiteralPool::new();
        pool.intern("'=1'").unwrap();
        pool.intern("'=2'").unwrap();
        assert!(matches!(
            pool.flush(i64::MAX, Directive::END),
            Err(Error::MalformedStatement(_))
        ));
    }
}
