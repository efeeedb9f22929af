//! Formatting layers
//!
//! Every layer is boxed over [`Registry`] so the builder can stack any
//! combination of console and file output without one code path per mix.

use std::fs::{self, File};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{Layer, Registry};

use crate::config::{ConsoleConfig, FileConfig, JsonlConfig, RotationStrategy};
use crate::LogError;

/// A type-erased layer over the base registry
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// JSONL formatting layer writing to `writer`
pub fn jsonl_layer<W>(writer: W, jsonl: &JsonlConfig) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(jsonl.include_spans)
        .flatten_event(jsonl.flatten_events)
        .with_file(jsonl.include_location)
        .with_line_number(jsonl.include_location)
        .with_thread_ids(jsonl.include_thread_info)
        .with_thread_names(jsonl.include_thread_info)
        .with_writer(writer)
        .boxed()
}

/// Console layer, pretty or JSONL
pub fn console_layer(console: &ConsoleConfig, jsonl: &JsonlConfig) -> BoxedLayer {
    if console.pretty {
        tracing_subscriber::fmt::layer()
            .with_ansi(console.ansi)
            .with_target(true)
            .boxed()
    } else {
        jsonl_layer(std::io::stdout, jsonl)
    }
}

/// Non-blocking writer for file output
///
/// `Never` truncates a single `<prefix>.log`; the other strategies append to
/// rolling files.
pub fn file_writer(file: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LogError> {
    match file.rotation {
        RotationStrategy::Never => {
            fs::create_dir_all(&file.directory)?;
            let path = file.directory.join(format!("{}.log", file.prefix));
            let handle = File::create(path)?;
            Ok(tracing_appender::non_blocking(handle))
        }
        RotationStrategy::Daily => {
            let appender = RollingFileAppender::new(Rotation::DAILY, &file.directory, &file.prefix);
            Ok(tracing_appender::non_blocking(appender))
        }
        RotationStrategy::Hourly => {
            let appender =
                RollingFileAppender::new(Rotation::HOURLY, &file.directory, &file.prefix);
            Ok(tracing_appender::non_blocking(appender))
        }
    }
}
