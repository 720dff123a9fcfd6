/// An iterator over lines and linebreaks, handling newlines and carriage
/// returns.
pub struct LineSegments<'a> {
    s: &'a str,
}

impl<'a> LineSegments<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s }
    }
}

impl<'a> Iterator for LineSegments<'a> {
    type Item = LineSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.s.is_empty() {
            return None;
        }

        if let Some(rest) = self.s.strip_prefix("\r\n") {
            self.s = rest;
            return Some(LineSegment::LineBreak);
        }

        if let Some(rest) = self.s.strip_prefix(is_line_break) {
            self.s = rest;
            return Some(LineSegment::LineBreak);
        }

        let next_index = self.s.find(is_line_break).unwrap_or(self.s.len());
        let (line, rest) = self.s.split_at(next_index);
        self.s = rest;

        Some(LineSegment::Line(line))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.s.len()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSegment<'a> {
    Line(&'a str),
    LineBreak,
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\r' | '\n')
}

/// Normalise pasted or typed text for insertion: every kind of line break
/// becomes `\n`, and control characters other than tabs are dropped.
pub fn clean_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for segment in LineSegments::new(s) {
        match segment {
            LineSegment::Line(line) => {
                out.extend(line.chars().filter(|&ch| ch == '\t' || !ch.is_control()))
            }
            LineSegment::LineBreak => out.push('\n'),
        }
    }

    out
}
