//! Diagnostic output for the plugin launcher.
//!
//! Everything here writes to stderr, which is the launcher's log stream.
//! Stdout is left to the launched plugin.
//!
//! Events are emitted with `tracing` and rendered by [`RecordFormat`], so every
//! stderr line has the shape produced by [`format_record`].

use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use std::fmt;
use std::io::{self, IsTerminal};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// Layout of the timestamp that prefixes every log line
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Most verbose `tracing` level that reaches stderr
pub const MAX_LEVEL: LevelFilter = LevelFilter::WARN;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Warn => "warning:",
            Level::Error => "Error:",
        }
    }

    fn colored_tag(self) -> ColoredString {
        match self {
            Level::Warn => self.tag().yellow().bold(),
            Level::Error => self.tag().red().bold(),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Level::Error
        } else {
            Level::Warn
        }
    }
}

/// Render one log line: `<timestamp> <tag> <message>`
pub fn format_record(
    level: Level,
    message: &str,
    timestamp: &DateTime<Local>,
    colorize: bool,
) -> String {
    let timestamp = timestamp.format(TIMESTAMP_FORMAT);
    if colorize {
        format!("{} {} {}", timestamp, level.colored_tag(), message)
    } else {
        format!("{} {} {}", timestamp, level.tag(), message)
    }
}

/// Event formatter that writes each `tracing` event through [`format_record`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormat {
    colorize: bool,
}

impl RecordFormat {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let level = Level::from(*event.metadata().level());
        writeln!(
            writer,
            "{}",
            format_record(level, &message, &Local::now(), self.colorize)
        )
    }
}

/// Subscriber that renders warnings and errors to `make_writer`
pub fn build_subscriber<W>(
    make_writer: W,
    colorize: bool,
) -> tracing_subscriber::fmt::Subscriber<DefaultFields, RecordFormat, LevelFilter, W>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(make_writer)
        .with_max_level(MAX_LEVEL)
        .event_format(RecordFormat::new(colorize))
        .finish()
}

/// Install the stderr subscriber for the whole process.
///
/// Tags are coloured only when stderr is a terminal; colour environment
/// variables are ignored.
pub fn init() -> Result<(), String> {
    let colorize = io::stderr().is_terminal();
    colored::control::set_override(colorize);

    tracing::subscriber::set_global_default(build_subscriber(io::stderr, colorize))
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| io::Error::other("poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            let bytes = self.0.lock().expect("buffer lock").clone();
            String::from_utf8(bytes).expect("log output is utf-8")
        }
    }

    fn fixed_timestamp() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2023, 4, 5, 6, 7, 8)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn test_format_record_error() {
        let line = format_record(
            Level::Error,
            "'/bad/path' could not be started",
            &fixed_timestamp(),
            false,
        );
        assert_eq!(line, "2023/04/05 06:07:08 Error: '/bad/path' could not be started");
    }

    #[test]
    fn test_format_record_warning() {
        let line = format_record(Level::Warn, "x", &fixed_timestamp(), false);
        assert_eq!(line, "2023/04/05 06:07:08 warning: x");
    }

    #[test]
    fn test_format_record_colorized_tag() {
        colored::control::set_override(true);
        let line = format_record(Level::Error, "boom", &fixed_timestamp(), true);
        assert!(line.starts_with("2023/04/05 06:07:08 \u{1b}["));
        assert!(line.contains("Error:"));
        assert!(line.ends_with(" boom"));
    }

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
    }

    #[test]
    fn test_subscriber_renders_events_as_records() {
        let buffer = SharedBuffer::default();
        let sink = buffer.clone();
        let subscriber = build_subscriber(move || sink.clone(), false);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("failed to start '/bad/path': not found");
            tracing::warn!("failed to print usage: broken pipe");
            tracing::info!("not shown");
            tracing::debug!("not shown either");
        });

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "{}", output);
        assert!(lines[0].ends_with(" Error: failed to start '/bad/path': not found"));
        assert!(lines[1].ends_with(" warning: failed to print usage: broken pipe"));

        // "YYYY/MM/DD HH:MM:SS " prefix
        let prefix = &lines[0][..20];
        assert_eq!(prefix.as_bytes()[4], b'/');
        assert_eq!(prefix.as_bytes()[13], b':');
        assert!(!output.contains('\u{1b}'));
    }
}
