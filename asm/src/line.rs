use crate::error::Error;
use serde::Serialize;
use std::io::BufRead;

// ----------------------------------------------------------------------------
// Line

/// One physical source line. `code` is the part before `;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    path: String,
    idx: usize,
    raw: String,
    code: String,
    comment: Option<String>,
}

impl Line {
    pub fn new(path: &str, idx: usize, str: &str) -> Self {
        let (code, comment) = match str.split_once(';') {
            Some((code, comment)) => (code.to_string(), Some(comment.to_string())),
            None => (str.to_string(), None),
        };
        Self {
            path: path.to_string(),
            idx,
            raw: str.to_string(),
            code,
            comment,
        }
    }

    pub fn pos(&self) -> String {
        format!("{}:{}", self.path, self.idx + 1)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn no(&self) -> usize {
        self.idx + 1
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn code(&self) -> &str {
        self.code.trim()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.code().is_empty()
    }
}

/// Split in-memory source text into lines attributed to `path`.
pub fn from_source(path: &str, source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::new(path, idx, raw))
        .collect()
}

pub fn read_file(path: &str) -> Result<Vec<Line>, Error> {
    let file = std::fs::File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    std::io::BufReader::new(file)
        .lines()
        .enumerate()
        .map(|(idx, raw)| -> Result<Line, Error> {
            Ok(Line::new(path, idx, &raw.map_err(Error::FileRead)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_is_split_off() {
        let line = Line::new("a.asm", 2, "  MOVER AREG, X ; load x");
        assert_eq!(line.code(), "MOVER AREG, X");
        assert_eq!(line.comment(), Some(" load x"));
        assert_eq!(line.no(), 3);
        assert_eq!(line.pos(), "a.asm:3");
    }

    #[test]
    fn comment_only_line_is_blank() {
        assert!(Line::new("a.asm", 0, "; nothing here").is_blank());
        assert!(Line::new("a.asm", 0, "   ").is_blank());
        assert!(!Line::new("a.asm", 0, "STOP").is_blank());
    }

    #[test]
    fn source_keeps_line_numbers() {
        let lines = from_source("m.asm", "START 100\n\nEND");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].idx(), 2);
        assert_eq!(lines[2].code(), "END");
    }
}
