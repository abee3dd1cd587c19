use crate::line::Line;
use color_print::cprintln;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Note,
}

#[derive(Debug, Clone)]
pub struct Msg {
    pub level: Level,
    pub text: String,
    line: Line,
}

impl Msg {
    pub fn print(&self) {
        match self.level {
            Level::Error => cprintln!("<red,bold>error</>: {}", self.text),
            Level::Warn => cprintln!("<yellow,bold>warn</>: {}", self.text),
            Level::Note => cprintln!("<green,bold>note</>: {}", self.text),
        }
        cprintln!("     <blue>--></> <underline>{}</>", self.line.pos());
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line.no(), self.line.raw());
        cprintln!("      <blue>|</>");
    }
}

/// Diagnostics collected over a whole run.
#[derive(Debug, Clone, Default)]
pub struct Msgs(Vec<Msg>);

impl Msgs {
    pub fn new() -> Self {
        Msgs(vec![])
    }

    fn push(&mut self, level: Level, text: impl ToString, line: &Line) {
        self.0.push(Msg {
            level,
            text: text.to_string(),
            line: line.clone(),
        });
    }

    pub fn error(&mut self, text: impl ToString, line: &Line) {
        self.push(Level::Error, text, line)
    }

    pub fn warn(&mut self, text: impl ToString, line: &Line) {
        self.push(Level::Warn, text, line)
    }

    pub fn note(&mut self, text: impl ToString, line: &Line) {
        self.push(Level::Note, text, line)
    }

    pub fn extend(&mut self, other: Msgs) {
        self.0.extend(other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, level: Level) -> usize {
        self.0.iter().filter(|msg| msg.level == level).count()
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|msg| msg.level == Level::Error)
    }

    pub fn dump(&self) {
        for msg in &self.0 {
            msg.print();
        }
    }
}
