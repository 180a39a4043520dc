use miette::Report;
use termcolor::ColorChoice;

/// Terminal width for pretty-printing error messages.
const TERMINAL_WIDTH: usize = 200;

struct WriteAdapter<'a, O: std::io::Write> {
    inner: &'a mut O,
    error: Option<std::io::Error>,
}

impl<O: std::io::Write> std::fmt::Write for WriteAdapter<'_, O> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|err| {
            self.error = Some(err);
            std::fmt::Error
        })
    }
}

pub fn render_reports_to_string(reports: &[Report], colorize: ColorChoice) -> String {
    let mut output = String::new();
    // Writing to a String cannot fail.
    let _ = render_reports(&mut output, reports, colorize);
    output
}

pub fn render_reports_io<O>(output: &mut O, reports: &[Report], colorize: ColorChoice) -> std::io::Result<()>
where
    O: std::io::Write,
{
    let mut adapter = WriteAdapter { inner: output, error: None };
    match render_reports(&mut adapter, reports, colorize) {
        Ok(()) => Ok(()),
        Err(_) => Err(adapter.error.take().unwrap_or_else(|| std::io::Error::other("failed to render report"))),
    }
}

pub fn render_reports<O>(output: &mut O, reports: &[Report], colorize: ColorChoice) -> std::fmt::Result
where
    O: std::fmt::Write,
{
    let theme = match colorize {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => miette::GraphicalTheme::unicode(),
        ColorChoice::Auto => miette::GraphicalTheme::default(),
        ColorChoice::Never => miette::GraphicalTheme::unicode_nocolor(),
    };
    let handler = miette::GraphicalReportHandler::new_themed(theme).with_width(TERMINAL_WIDTH);

    let mut reports = reports.iter().peekable();
    while let Some(report) = reports.next() {
        handler.render_report(output, report.as_ref())?;
        if reports.peek().is_some() {
            writeln!(output)?;
        }
    }
    Ok(())
}
