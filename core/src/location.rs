#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Location {
    /// The file in which the location is found.
    pub file: String,
    /// The line number of the location (1-based).
    pub line: usize,
    /// The column number of the location (1-based).
    pub column: usize,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(file: String, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// The diagnostic tag attached to failures raised at this location.
    pub fn file_link(&self) -> String {
        file_link(&self.file, self.line)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// `<File "path", line N>`
pub fn file_link(file: &str, line: usize) -> String {
    format!("<File \"{}\", line {}>", file, line)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Span {
    /// The starting location of the span.
    pub start: Location,
    /// The ending location of the span.
    pub end: Location,
}

impl Span {
    /// Creates a new `Span` from two `Location`s.
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Maps byte offsets in a source text to 1-based line/column pairs.
/// Columns count characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    file: String,
    source: String,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(file: &str, source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex {
            file: file.to_string(),
            source: source.to_string(),
            line_starts,
        }
    }

    pub fn location(&self, offset: usize) -> Location {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = match self.source.get(start..offset) {
            Some(prefix) => prefix.chars().count() + 1,
            None => offset - start + 1,
        };
        Location::new(self.file.clone(), line + 1, column)
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.location(start), self.location(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_one_based_lines() {
        let index = LineIndex::new("a.py", "x = 1\ny = 2\n\nz = 3");
        assert_eq!(index.location(0).line, 1);
        assert_eq!(index.location(6).line, 2);
        assert_eq!(index.location(8), Location::new("a.py".into(), 2, 3));
        assert_eq!(index.location(13).line, 4);
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("a.py", "s = \"héllo\" + x\n");
        // `x` sits after a two-byte character.
        let offset = "s = \"héllo\" + ".len();
        assert_eq!(index.location(offset).column, 15);
    }

    #[test]
    fn file_link_matches_diagnostic_tag() {
        let loc = Location::new("/tmp/m.py".into(), 7, 1);
        assert_eq!(loc.file_link(), "<File \"/tmp/m.py\", line 7>");
    }
}
