use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, Report};
use turbox_lang_ast::Module;
use turbox_lang_miette_util::codespan::Span;
use turbox_lang_parser::{ParseError, parse_module};

use crate::codespan::{File, Location};
use crate::result::DriverError;

/// One input file, loaded once and shared by all stages of a build.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
    file: File,
}

impl Session {
    /// Read `path`, normalising CRLF line endings so that spans and lines agree.
    pub fn load(path: &Path) -> Result<Self, DriverError> {
        if !path.is_file() {
            return Err(DriverError::FileNotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path)
            .map_err(|source| DriverError::Io { path: path.to_path_buf(), source })?;
        log::debug!("Loaded {} ({} bytes)", path.display(), source.len());
        Ok(Self::from_source(path, source.replace("\r\n", "\n")))
    }

    pub fn from_source(path: &Path, source: String) -> Self {
        Session { path: path.to_path_buf(), file: File::new(source) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name, as shown in the header of the generated program.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn source(&self) -> &str {
        &self.file.source
    }

    pub fn parse(&self) -> Result<Module, ParseError> {
        parse_module(&self.file.source)
    }

    /// Where `span` starts, if it lies within the file.
    pub fn location(&self, span: Span) -> Option<Location> {
        self.file.location(span.start()).ok()
    }

    /// Attach the source of this file to a diagnostic so labels render with an excerpt.
    pub fn pretty_error<E>(&self, err: E) -> Report
    where
        E: Diagnostic + Send + Sync + 'static,
    {
        let source = NamedSource::new(self.path.display().to_string(), self.file.source.clone());
        Report::new(err).with_source_code(source)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use turbox_lang_miette_util::codespan::Span;

    use super::Session;
    use crate::result::DriverError;

    #[test]
    fn load_missing_file() {
        let err = Session::load(Path::new("does/not/exist.py")).unwrap_err();
        assert!(matches!(err, DriverError::FileNotFound(_)));
    }

    #[test]
    fn load_normalises_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.py");
        std::fs::write(&path, "x = 1\r\ny = 2\r\n").unwrap();
        let session = Session::load(&path).unwrap();
        assert_eq!(session.source(), "x = 1\ny = 2\n");
        assert_eq!(session.name(), "app.py");
        assert_eq!(session.location(Span::new(6u32, 7u32)).unwrap().line, 2);
    }

    #[test]
    fn parse_errors_render_with_source() {
        let session = Session::from_source(Path::new("broken.py"), "def f(:\n".to_string());
        let err = session.parse().unwrap_err();
        let report = session.pretty_error(err);
        let rendered = crate::render_reports_to_string(&[report], termcolor::ColorChoice::Never);
        assert!(rendered.contains("broken.py"), "{rendered}");
    }
}
