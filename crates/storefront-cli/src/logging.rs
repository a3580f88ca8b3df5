use std::io::Write;

use nu_ansi_term::Color::{self, Blue, Magenta, Red, Yellow};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{FmtSpan, Writer},
        FmtContext, FormatEvent, FormatFields, MakeWriter,
    },
    registry::LookupSpan,
};

use crate::{cli::Args, utils::Colored};

/// Pulls the formatted `message` field out of an event; other fields only
/// show up in JSON mode.
#[derive(Default)]
struct Message(Option<String>);

impl tracing::field::Visit for Message {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

/// Tag printed before a message. INFO has none so command output reads clean.
fn level_tag(level: Level) -> Option<(Color, &'static str)> {
    match level {
        Level::TRACE => Some((Magenta, "[TRACE]")),
        Level::DEBUG => Some((Blue, "[DEBUG]")),
        Level::INFO => None,
        Level::WARN => Some((Yellow, "[WARN]")),
        Level::ERROR => Some((Red, "[ERROR]")),
    }
}

pub struct StorefrontFormatter;

impl<S, N> FormatEvent<S, N> for StorefrontFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        if let Some((color, tag)) = level_tag(*event.metadata().level()) {
            write!(writer, "{} ", Colored(color, tag))?;
        }

        let mut message = Message::default();
        event.record(&mut message);
        writeln!(writer, "{}", message.0.unwrap_or_default())
    }
}

/// INFO goes to stdout so listings can be piped; other levels go to stderr.
enum StdWriter {
    Out(std::io::Stdout),
    Err(std::io::Stderr),
}

impl Write for StdWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            StdWriter::Out(out) => out.write(buf),
            StdWriter::Err(err) => err.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            StdWriter::Out(out) => out.flush(),
            StdWriter::Err(err) => err.flush(),
        }
    }
}

struct WriterBuilder;

impl<'a> MakeWriter<'a> for WriterBuilder {
    type Writer = StdWriter;

    fn make_writer(&'a self) -> Self::Writer {
        StdWriter::Out(std::io::stdout())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        if meta.level() == &Level::INFO {
            StdWriter::Out(std::io::stdout())
        } else {
            StdWriter::Err(std::io::stderr())
        }
    }
}

fn filter_level(args: &Args) -> Level {
    if args.quiet {
        Level::ERROR
    } else if args.verbose >= 2 {
        Level::TRACE
    } else if args.verbose == 1 {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

pub fn setup_logging(args: &Args) {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(format!("storefront={}", filter_level(args)))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(WriterBuilder)
        .compact()
        .without_time();

    let subscriber: Box<dyn Subscriber + Send + Sync> = if args.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.event_format(StorefrontFormatter).finish())
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber was already set");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(Level::INFO), None);
        assert_eq!(level_tag(Level::WARN), Some((Yellow, "[WARN]")));
        assert_eq!(level_tag(Level::ERROR), Some((Red, "[ERROR]")));
        assert_eq!(level_tag(Level::TRACE), Some((Magenta, "[TRACE]")));
    }

    #[test]
    fn test_filter_level() {
        let parse = |argv: &[&str]| Args::try_parse_from(argv).unwrap();

        assert_eq!(
            filter_level(&parse(&["storefront", "defconfig"])),
            Level::INFO
        );
        assert_eq!(
            filter_level(&parse(&["storefront", "-v", "defconfig"])),
            Level::DEBUG
        );
        assert_eq!(
            filter_level(&parse(&["storefront", "-vv", "defconfig"])),
            Level::TRACE
        );
        assert_eq!(
            filter_level(&parse(&["storefront", "-q", "-v", "defconfig"])),
            Level::ERROR
        );
    }
}
