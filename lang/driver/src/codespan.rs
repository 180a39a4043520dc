use std::fmt;

use turbox_lang_miette_util::codespan::ByteIndex;

use crate::result::DriverError;

/// A position in a file, both components counting from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    /// Counted in characters
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A loaded source file.
#[derive(Debug, Clone)]
pub struct File {
    /// The source code of the file.
    pub source: String,
    /// The starting byte indices in the source code.
    pub line_starts: Vec<ByteIndex>,
}

impl File {
    pub fn new(source: String) -> Self {
        let line_starts: Vec<ByteIndex> = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .map(ByteIndex::from)
            .collect();

        File { source, line_starts }
    }

    /// Zero-based index of the line containing `byte_index`.
    fn line_index(&self, byte_index: ByteIndex) -> usize {
        match self.line_starts.binary_search(&byte_index) {
            // Found the start of a line
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        }
    }

    pub fn location(&self, byte_index: ByteIndex) -> Result<Location, DriverError> {
        let given = byte_index.to_usize();
        if given > self.source.len() {
            return Err(DriverError::IndexTooLarge { given, max: self.source.len() });
        }
        let line_index = self.line_index(byte_index);
        let line_start = self.line_starts[line_index].to_usize();
        let line_src = self
            .source
            .get(line_start..given)
            .ok_or(DriverError::InvalidCharBoundary { given })?;

        Ok(Location { line: line_index + 1, column: line_src.chars().count() + 1 })
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_miette_util::codespan::ByteIndex;

    use super::{File, Location};
    use crate::DriverError;

    #[test]
    fn locations() {
        let file = File::new("ab\ncé\n\nd".to_string());
        assert_eq!(file.location(ByteIndex(0)).unwrap(), Location { line: 1, column: 1 });
        assert_eq!(file.location(ByteIndex(3)).unwrap(), Location { line: 2, column: 1 });
        assert_eq!(file.location(ByteIndex(6)).unwrap(), Location { line: 2, column: 3 });
        assert_eq!(file.location(ByteIndex(7)).unwrap(), Location { line: 3, column: 1 });
        assert_eq!(file.location(ByteIndex(9)).unwrap(), Location { line: 4, column: 2 });
    }

    #[test]
    fn invalid_indices() {
        let file = File::new("é".to_string());
        assert!(matches!(file.location(ByteIndex(1)), Err(DriverError::InvalidCharBoundary { given: 1 })));
        assert!(matches!(file.location(ByteIndex(5)), Err(DriverError::IndexTooLarge { .. })));
    }
}
